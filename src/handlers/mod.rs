pub mod editor;
pub mod presets;
pub mod try_on;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::error::WardrobeResult;
use crate::llm::media::extension_for_mime;
use crate::llm::GeneratedImage;

/// A finished generation as it landed on disk.
#[derive(Debug, Clone)]
pub struct SavedResult {
    pub path: PathBuf,
    pub description: String,
}

/// Writes a generated image into `dir` as `{prefix}-{millis}.{ext}`.
pub async fn save_generated(
    dir: &Path,
    prefix: &str,
    image: &GeneratedImage,
) -> WardrobeResult<SavedResult> {
    tokio::fs::create_dir_all(dir).await?;
    let file_name = format!(
        "{}-{}.{}",
        prefix,
        Utc::now().timestamp_millis(),
        extension_for_mime(&image.mime_type)
    );
    let path = dir.join(file_name);
    tokio::fs::write(&path, &image.bytes).await?;
    info!(
        "Saved generated image to {} ({} bytes)",
        path.display(),
        image.bytes.len()
    );
    Ok(SavedResult {
        path,
        description: image.description.clone(),
    })
}
