use crate::catalog::CatalogError;
use crate::llm::{GenerationError, MediaError};
use crate::wardrobe::selections::SelectionError;

/// Everything a wardrobe operation can fail with, each variant carrying a
/// stable key for callers that branch on the kind of failure.
#[derive(Debug, thiserror::Error)]
pub enum WardrobeError {
    #[error("Please select at least one style option to change.")]
    MissingSelection,
    #[error("Please upload an image first.")]
    MissingImage,
    #[error("Could not translate {field} into English: {source}")]
    TranslationFailure {
        field: &'static str,
        #[source]
        source: GenerationError,
    },
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("preset storage failed: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("stored presets are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no preset with id {0}")]
    UnknownPreset(String),
    #[error("a newer request replaced this one")]
    Superseded,
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl WardrobeError {
    pub fn key(&self) -> &'static str {
        match self {
            WardrobeError::MissingSelection => "missing-selection",
            WardrobeError::MissingImage => "missing-image",
            WardrobeError::TranslationFailure { .. } => "translation-failure",
            WardrobeError::Generation(err) => err.key(),
            WardrobeError::Media(MediaError::InvalidFileType { .. }) => "invalid-file-type",
            WardrobeError::Media(MediaError::Read { .. }) => "io-failure",
            WardrobeError::Selection(_) => "invalid-selection",
            WardrobeError::Catalog(_) => "catalog-failure",
            WardrobeError::Storage(_) | WardrobeError::Serialization(_) => "storage-failure",
            WardrobeError::UnknownPreset(_) => "unknown-preset",
            WardrobeError::Superseded => "superseded",
            WardrobeError::Io(_) => "io-failure",
        }
    }
}

pub type WardrobeResult<T> = Result<T, WardrobeError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn keys_follow_the_failure_taxonomy() {
        assert_eq!(WardrobeError::MissingSelection.key(), "missing-selection");
        assert_eq!(
            WardrobeError::from(GenerationError::ImageBlocked).key(),
            "content-safety-block-image"
        );
        assert_eq!(
            WardrobeError::from(GenerationError::Network("dns".into())).key(),
            "network-failure"
        );
        let invalid = MediaError::InvalidFileType {
            path: PathBuf::from("a.txt"),
            detected: "unknown".into(),
        };
        assert_eq!(WardrobeError::from(invalid).key(), "invalid-file-type");
        let translation = WardrobeError::TranslationFailure {
            field: "fineTuning",
            source: GenerationError::Api("empty".into()),
        };
        assert_eq!(translation.key(), "translation-failure");
    }

    #[test]
    fn user_facing_messages_pass_through() {
        let err = WardrobeError::from(GenerationError::RequestBlocked);
        assert!(err.to_string().starts_with("Your request was blocked"));
        assert_eq!(
            WardrobeError::MissingSelection.to_string(),
            "Please select at least one style option to change."
        );
    }
}
