use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CatalogError, Locale};

const STYLE_PRESETS: &str = include_str!("../../data/style_presets.yaml");

/// The three fields a built-in preset sets. Values are canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetSelections {
    pub visual_style: String,
    pub image_style: String,
    pub decade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub selections: PresetSelections,
}

pub fn load_style_presets(locale: Locale) -> Result<Vec<StylePreset>, CatalogError> {
    parse_style_presets(STYLE_PRESETS, locale)
}

fn parse_style_presets(text: &str, locale: Locale) -> Result<Vec<StylePreset>, CatalogError> {
    let mut by_locale: HashMap<Locale, Vec<StylePreset>> = serde_yaml::from_str(text)?;
    Ok(by_locale.remove(&locale).unwrap_or_default())
}

pub fn find_style_preset<'a>(presets: &'a [StylePreset], id: &str) -> Option<&'a StylePreset> {
    presets.iter().find(|preset| preset.id == id)
}
