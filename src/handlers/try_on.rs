use std::path::Path;

use tracing::warn;

use crate::config::CONFIG;
use crate::error::{WardrobeError, WardrobeResult};
use crate::handlers::{save_generated, SavedResult};
use crate::llm;
use crate::state::AppState;
use crate::utils::timing::{complete_command_timer, start_command_timer};

const OUTPUT_PREFIX: &str = "virtual-try-on";

async fn run_try_on(
    state: &AppState,
    person_path: Option<&Path>,
    garment_path: Option<&Path>,
) -> WardrobeResult<SavedResult> {
    let (Some(person_path), Some(garment_path)) = (person_path, garment_path) else {
        return Err(WardrobeError::MissingImage);
    };
    let request_id = state.begin_request();
    let person = llm::load_image(person_path).await?;
    let garment = llm::load_image(garment_path).await?;

    let generated = llm::try_on(&person, &garment).await?;
    if !state.is_latest(request_id) {
        warn!("Discarding try-on result of superseded request {}", request_id);
        return Err(WardrobeError::Superseded);
    }
    save_generated(&CONFIG.output_dir, OUTPUT_PREFIX, &generated).await
}

/// Dresses the person photo in the garment photo and saves the result.
pub async fn try_on_handler(
    state: &AppState,
    person_path: Option<&Path>,
    garment_path: Option<&Path>,
) -> WardrobeResult<SavedResult> {
    let input = match (person_path, garment_path) {
        (Some(person), Some(garment)) => {
            Some(format!("{} + {}", person.display(), garment.display()))
        }
        _ => None,
    };
    let mut timer = start_command_timer("try-on", input.as_deref());
    let result = run_try_on(state, person_path, garment_path).await;
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
    use crate::catalog::{CatalogSet, Locale};
    use crate::db::Database;

    async fn test_state(dir: &tempfile::TempDir) -> AppState {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("try_on.db").display());
        let db = Database::init(&url, "customWardrobePresets")
            .await
            .expect("init database");
        AppState::new(db, CatalogSet::load().expect("catalogs"), Locale::En)
    }

    #[tokio::test]
    async fn both_photos_are_required() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(&dir).await;
        let err = run_try_on(&state, Some(Path::new("me.png")), None)
            .await
            .unwrap_err();
        assert_eq!(err.key(), "missing-image");
    }

    #[tokio::test]
    async fn unreadable_photos_fail_before_any_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = test_state(&dir).await;
        let garment = dir.path().join("garment.txt");
        std::fs::write(&garment, "not an image").expect("write");
        let person = dir.path().join("missing.png");

        let err = run_try_on(&state, Some(&person), Some(&garment))
            .await
            .unwrap_err();
        assert_eq!(err.key(), "io-failure");
    }
}
