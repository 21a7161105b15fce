use std::future::Future;
use std::path::Path;

use tracing::{info, warn};

use crate::catalog::{CatalogSet, Locale};
use crate::config::CONFIG;
use crate::error::{WardrobeError, WardrobeResult};
use crate::handlers::{save_generated, SavedResult};
use crate::llm::{self, GenerationError};
use crate::state::AppState;
use crate::utils::language::needs_english_translation;
use crate::utils::timing::{complete_command_timer, start_command_timer};
use crate::wardrobe::{
    compile_prompt, emptiness, CandidatePicker, Gender, RandomPicker, WardrobeSelections,
};

const OUTPUT_PREFIX: &str = "your-style";

/// Selections with every catalog value in the canonical locale. Free text is
/// left as typed.
pub fn canonical_selections(
    catalogs: &CatalogSet,
    locale: Locale,
    selections: &WardrobeSelections,
) -> WardrobeSelections {
    if locale == Locale::CANONICAL {
        return selections.clone();
    }
    catalogs.translation().translate_selections(selections)
}

/// Gate, translate and compile without touching the network. Free-text
/// fields go into the prompt untranslated.
pub fn build_prompt(
    catalogs: &CatalogSet,
    locale: Locale,
    selections: &WardrobeSelections,
    gender: Gender,
    picker: &dyn CandidatePicker,
) -> WardrobeResult<String> {
    if emptiness::is_empty(selections) {
        return Err(WardrobeError::MissingSelection);
    }
    let canonical = canonical_selections(catalogs, locale, selections);
    Ok(compile_prompt(&canonical, gender, picker))
}

/// Runs `translate` over the target age and the fine-tuning text when they
/// are not already English.
pub async fn translate_free_text_with<F, Fut>(
    selections: &mut WardrobeSelections,
    locale: Locale,
    translate: F,
) -> WardrobeResult<()>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, GenerationError>>,
{
    let fields: [(&'static str, &mut String); 2] = [
        ("the target age", &mut selections.image_style.age),
        ("the additional instructions", &mut selections.fine_tuning),
    ];
    for (field, value) in fields {
        if value.trim().is_empty() || !needs_english_translation(value, locale) {
            continue;
        }
        let translated = translate(value.clone())
            .await
            .map_err(|source| WardrobeError::TranslationFailure { field, source })?;
        info!("Translated {} into English", field);
        *value = translated;
    }
    Ok(())
}

async fn run_edit(
    state: &AppState,
    image_path: Option<&Path>,
    prompt_override: Option<String>,
) -> WardrobeResult<SavedResult> {
    let image_path = image_path.ok_or(WardrobeError::MissingImage)?;
    let request_id = state.begin_request();
    let image = llm::load_image(image_path).await?;

    let prompt = match prompt_override {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => {
            let locale = state.locale();
            let selections = state.selections();
            if emptiness::is_empty(&selections) {
                return Err(WardrobeError::MissingSelection);
            }
            let mut canonical = canonical_selections(&state.catalogs, locale, &selections);
            if CONFIG.translate_free_text {
                translate_free_text_with(&mut canonical, locale, |text| async move {
                    llm::translate_to_english(&text).await
                })
                .await?;
            }
            let gender = llm::detect_gender(&image).await;
            compile_prompt(&canonical, gender, &RandomPicker)
        }
    };

    let generated = llm::edit_image(&image, &prompt).await?;
    if !state.is_latest(request_id) {
        warn!("Discarding result of superseded request {}", request_id);
        return Err(WardrobeError::Superseded);
    }
    save_generated(&CONFIG.output_dir, OUTPUT_PREFIX, &generated).await
}

/// Full style-editor flow for the current session: photo in, edited photo
/// written to the output directory.
pub async fn edit_handler(
    state: &AppState,
    image_path: Option<&Path>,
    prompt_override: Option<String>,
) -> WardrobeResult<SavedResult> {
    let input = image_path.map(|path| path.display().to_string());
    let mut timer = start_command_timer("edit", input.as_deref());
    let result = run_edit(state, image_path, prompt_override).await;
    match &result {
        Ok(saved) => complete_command_timer(
            &mut timer,
            "success",
            Some(saved.path.display().to_string()),
        ),
        Err(err) => complete_command_timer(&mut timer, "error", Some(err.key().to_string())),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wardrobe::background::FirstCandidatePicker;
    use crate::wardrobe::selections::FieldPath;

    fn catalogs() -> CatalogSet {
        CatalogSet::load().expect("embedded catalogs")
    }

    #[test]
    fn empty_selections_are_refused() {
        let err = build_prompt(
            &catalogs(),
            Locale::En,
            &WardrobeSelections::default(),
            Gender::Uncertain,
            &FirstCandidatePicker,
        )
        .unwrap_err();
        assert_eq!(err.key(), "missing-selection");
    }

    #[test]
    fn localized_choices_reach_the_prompt_in_english() {
        let catalogs = catalogs();
        let pt = catalogs.catalog(Locale::Pt).options();
        let en = catalogs.catalog(Locale::En).options();
        let mut selections = WardrobeSelections::default();
        selections
            .set_field(&FieldPath::Pose, &pt.pose_options[0].value)
            .unwrap();

        let prompt = build_prompt(
            &catalogs,
            Locale::Pt,
            &selections,
            Gender::Uncertain,
            &FirstCandidatePicker,
        )
        .unwrap();
        assert!(prompt.contains(&en.pose_options[0].value));
        assert!(!prompt.contains(&pt.pose_options[0].value));
    }

    #[tokio::test]
    async fn only_non_english_free_text_is_translated() {
        let mut selections = WardrobeSelections::default();
        selections.image_style.age = "25".to_string();
        selections.fine_tuning =
            "Deixe a jaqueta com uma aparência envelhecida e um pouco mais larga".to_string();

        translate_free_text_with(&mut selections, Locale::Pt, |text| async move {
            Ok(format!("EN({text})"))
        })
        .await
        .unwrap();

        assert_eq!(selections.image_style.age, "25");
        assert!(selections.fine_tuning.starts_with("EN(Deixe"));
    }

    #[tokio::test]
    async fn translation_errors_name_the_field() {
        let mut selections = WardrobeSelections::default();
        selections.fine_tuning = "Por favor, deixe o cabelo mais volumoso e brilhante".to_string();

        let err = translate_free_text_with(&mut selections, Locale::Pt, |_| async {
            Err(GenerationError::Network("offline".to_string()))
        })
        .await
        .unwrap_err();

        assert_eq!(err.key(), "translation-failure");
        assert!(err.to_string().contains("the additional instructions"));
    }

    #[tokio::test]
    async fn missing_photo_is_reported_before_anything_else() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("edit.db").display());
        let db = crate::db::Database::init(&url, "customWardrobePresets")
            .await
            .expect("init database");
        let state = AppState::new(db, catalogs(), Locale::En);

        let err = run_edit(&state, None, None).await.unwrap_err();
        assert_eq!(err.key(), "missing-image");
    }
}
