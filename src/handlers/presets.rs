use tracing::info;

use crate::catalog::presets::{find_style_preset, load_style_presets, StylePreset};
use crate::db::CustomPreset;
use crate::error::{WardrobeError, WardrobeResult};
use crate::state::AppState;
use crate::wardrobe::emptiness;

#[derive(Debug, Clone)]
pub struct PresetListing {
    pub built_in: Vec<StylePreset>,
    pub custom: Vec<CustomPreset>,
}

pub async fn list_presets(state: &AppState) -> WardrobeResult<PresetListing> {
    Ok(PresetListing {
        built_in: load_style_presets(state.locale())?,
        custom: state.db.list_presets().await?,
    })
}

/// Applies a built-in preset to the session. Only the style fields change.
pub fn apply_style_preset(state: &AppState, id: &str) -> WardrobeResult<StylePreset> {
    let presets = load_style_presets(state.locale())?;
    let preset = find_style_preset(&presets, id)
        .cloned()
        .ok_or_else(|| WardrobeError::UnknownPreset(id.to_string()))?;
    state.update_selections(|selections| selections.apply_style_preset(&preset.selections));
    info!("Applied style preset '{}'", preset.id);
    Ok(preset)
}

/// Replaces the session's selections with a saved snapshot.
pub async fn apply_custom_preset(state: &AppState, id: &str) -> WardrobeResult<CustomPreset> {
    let preset = show_preset(state, id).await?;
    state.update_selections(|selections| *selections = preset.selections.clone());
    info!("Applied custom preset '{}' ({})", preset.name, preset.id);
    Ok(preset)
}

pub async fn save_preset(state: &AppState, name: &str) -> WardrobeResult<CustomPreset> {
    let selections = state.selections();
    if emptiness::is_empty(&selections) {
        return Err(WardrobeError::MissingSelection);
    }
    state.db.save_preset(name, &selections).await
}

pub async fn show_preset(state: &AppState, id: &str) -> WardrobeResult<CustomPreset> {
    state
        .db
        .get_preset(id)
        .await?
        .ok_or_else(|| WardrobeError::UnknownPreset(id.to_string()))
}

pub async fn delete_preset(state: &AppState, id: &str) -> WardrobeResult<()> {
    if state.db.delete_preset(id).await? {
        Ok(())
    } else {
        Err(WardrobeError::UnknownPreset(id.to_string()))
    }
}
