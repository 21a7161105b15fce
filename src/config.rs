use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use tracing::warn;

use crate::catalog::Locale;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub logs_dir: PathBuf,
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_image_model: String,
    pub gemini_text_model: String,
    pub gemini_safety_settings: String,
    pub gemini_timeout_seconds: u64,
    pub default_locale: Locale,
    pub presets_storage_key: String,
    pub output_dir: PathBuf,
    pub translate_free_text: bool,
}

pub static CONFIG: Lazy<Config> =
    Lazy::new(|| Config::load().expect("Failed to load configuration"));

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

const DEFAULT_DATABASE_URL: &str = "sqlite://wardrobe.db?mode=rwc";

fn normalize_database_url(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }
    trimmed.to_string()
}

fn normalize_gemini_safety_settings(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "permissive".to_string();
    }

    let lowered = trimmed.to_lowercase();
    match lowered.as_str() {
        "permissive" | "off" | "none" => "permissive".to_string(),
        "standard" => "standard".to_string(),
        _ => {
            warn!(
                "Unknown GEMINI_SAFETY_SETTINGS value '{}'; defaulting to permissive.",
                value
            );
            "permissive".to_string()
        }
    }
}

fn resolve_api_key() -> String {
    let primary = env_string("GEMINI_API_KEY", "");
    if !primary.trim().is_empty() {
        return primary.trim().to_string();
    }
    env_string("API_KEY", "").trim().to_string()
}

fn resolve_default_locale() -> Locale {
    let raw = env_string("DEFAULT_LOCALE", "en");
    Locale::parse(&raw).unwrap_or_else(|| {
        warn!("Unknown DEFAULT_LOCALE value '{}'; defaulting to en.", raw);
        Locale::En
    })
}

impl Config {
    pub fn load() -> Result<Self> {
        let presets_storage_key = env_string("PRESETS_STORAGE_KEY", "customWardrobePresets");
        if presets_storage_key.trim().is_empty() {
            return Err(anyhow!("PRESETS_STORAGE_KEY must not be empty"));
        }

        Ok(Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            logs_dir: PathBuf::from(env_string("LOGS_DIR", "logs")),
            database_url: normalize_database_url(env_string("DATABASE_URL", DEFAULT_DATABASE_URL)),
            gemini_api_key: resolve_api_key(),
            gemini_base_url: env_string(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            )
            .trim_end_matches('/')
            .to_string(),
            gemini_image_model: env_string("GEMINI_IMAGE_MODEL", "gemini-2.5-flash-image"),
            gemini_text_model: env_string("GEMINI_TEXT_MODEL", "gemini-2.5-flash"),
            gemini_safety_settings: normalize_gemini_safety_settings(env_string(
                "GEMINI_SAFETY_SETTINGS",
                "permissive",
            )),
            gemini_timeout_seconds: env_u64("GEMINI_TIMEOUT_SECONDS", 90).max(1),
            default_locale: resolve_default_locale(),
            presets_storage_key: presets_storage_key.trim().to_string(),
            output_dir: PathBuf::from(env_string("OUTPUT_DIR", "outputs")),
            translate_free_text: env_bool("TRANSLATE_FREE_TEXT", true),
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        if self.gemini_api_key.is_empty() {
            return Err(anyhow!(
                "GEMINI_API_KEY (or API_KEY) is required for image generation"
            ));
        }
        Ok(&self.gemini_api_key)
    }
}

pub const GEMINI_PROVIDER: &str = "gemini";

pub const IMAGE_DESCRIPTION_PROMPT: &str = "Describe this image in one short, creative sentence.";

pub const IMAGE_DESCRIPTION_EMPTY_FALLBACK: &str =
    "The AI did not provide a description for this image.";

pub const IMAGE_DESCRIPTION_FAILED_FALLBACK: &str =
    "Your image was created, but we couldn't generate a description for it.";

pub const GENDER_DETECTION_PROMPT: &str = "Look at the main person in this image and classify their apparent gender presentation. Answer with exactly one word: Male, Female, or Uncertain. If there is no person, or you cannot tell, answer Uncertain.";

pub const FREE_TEXT_TRANSLATION_PROMPT: &str = "Translate the following styling instruction into natural English. Keep the meaning, tone and any proper nouns. Reply with the translation only, without quotes or commentary.\n\nText:\n{text}";

pub const TRY_ON_PROMPT: &str = r#"INSTRUCTION: Your task is to perform a virtual try-on.
1.  Analyze the first image, which contains a person.
2.  Analyze the second image, which contains a single clothing item.
3.  Generate a new, photorealistic image where the person from the first image is wearing the clothing item from the second image.

CRITICAL RULES:
- You MUST perfectly preserve the person's identity. Do NOT change their face, facial features, skin tone, hair, or body shape.
- The person's pose and the background from the first image should be maintained as closely as possible.
- The clothing must be realistically adapted to fit the person's body and pose. Discard the background from the clothing image.
- The final output must be a single, cohesive, high-quality photograph."#;
