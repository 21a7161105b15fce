use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Image formats the generative API accepts as inline data.
const SUPPORTED_IMAGE_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
];

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("'{path}' is not a supported image (detected: {detected}). Please use a PNG, JPEG, WEBP or HEIC photo.")]
    InvalidFileType { path: PathBuf, detected: String },
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    if data.len() > 12 {
        let ftyp = &data[4..12];
        if ftyp.starts_with(b"ftyp") {
            let brand = &ftyp[4..8];
            if brand == b"heic" || brand == b"heix" || brand == b"hevc" {
                return Some("image/heic".to_string());
            }
            if brand == b"heif" || brand == b"mif1" {
                return Some("image/heif".to_string());
            }
        }
    }

    infer::get(data).map(|kind| kind.mime_type().to_string())
}

fn normalize_image_mime_type(mime_type: &str) -> String {
    let lowered = mime_type.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        _ => lowered,
    }
}

/// Photo bytes plus the MIME type sent alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl LoadedImage {
    /// Accepts any raster format the API understands. HEIC cannot be decoded
    /// locally, so it is trusted on its signature alone; everything else must
    /// also be recognized by `image`.
    pub fn from_bytes(bytes: Vec<u8>, origin: &Path) -> Result<Self, MediaError> {
        let invalid = |detected: &str| MediaError::InvalidFileType {
            path: origin.to_path_buf(),
            detected: detected.to_string(),
        };

        let Some(detected) = detect_mime_type(&bytes) else {
            return Err(invalid("unknown"));
        };
        let mime_type = normalize_image_mime_type(&detected);
        if !SUPPORTED_IMAGE_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(invalid(&mime_type));
        }
        let is_heif = mime_type == "image/heic" || mime_type == "image/heif";
        if !is_heif && image::guess_format(&bytes).is_err() {
            return Err(invalid(&mime_type));
        }

        debug!(
            "Loaded {} ({}, {} bytes)",
            origin.display(),
            mime_type,
            bytes.len()
        );
        Ok(Self { bytes, mime_type })
    }
}

pub async fn load_image(path: &Path) -> Result<LoadedImage, MediaError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| {
        warn!("Failed to read image {}: {}", path.display(), source);
        MediaError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    LoadedImage::from_bytes(bytes, path)
}

/// File extension matching a MIME type, used when naming saved results.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match normalize_image_mime_type(mime_type).as_str() {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "image/heif" => "heif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn detects_heic_brands_before_infer() {
        let mut data = vec![0, 0, 0, 24];
        data.extend_from_slice(b"ftypheic");
        data.extend_from_slice(&[0; 8]);
        assert_eq!(detect_mime_type(&data).as_deref(), Some("image/heic"));
    }

    #[test]
    fn accepts_a_real_png() {
        let loaded = LoadedImage::from_bytes(png_bytes(), Path::new("me.png")).unwrap();
        assert_eq!(loaded.mime_type, "image/png");
        assert_eq!(extension_for_mime(&loaded.mime_type), "png");
    }

    #[test]
    fn rejects_non_images() {
        let err = LoadedImage::from_bytes(b"%PDF-1.7 not a photo".to_vec(), Path::new("doc.pdf"))
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidFileType { ref detected, .. } if detected == "application/pdf"));

        let err = LoadedImage::from_bytes(b"hello".to_vec(), Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, MediaError::InvalidFileType { ref detected, .. } if detected == "unknown"));
    }

    #[tokio::test]
    async fn load_image_reports_missing_files() {
        let err = load_image(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Read { .. }));
    }

    #[tokio::test]
    async fn load_image_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("photo.png");
        std::fs::write(&path, png_bytes()).expect("write png");
        let loaded = load_image(&path).await.unwrap();
        assert_eq!(loaded.mime_type, "image/png");
    }
}
