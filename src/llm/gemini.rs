use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::config::{
    CONFIG, FREE_TEXT_TRANSLATION_PROMPT, GEMINI_PROVIDER, GENDER_DETECTION_PROMPT,
    IMAGE_DESCRIPTION_EMPTY_FALLBACK, IMAGE_DESCRIPTION_FAILED_FALLBACK, IMAGE_DESCRIPTION_PROMPT,
    TRY_ON_PROMPT,
};
use crate::llm::media::LoadedImage;
use crate::utils::timing::log_llm_timing;
use crate::wardrobe::Gender;

const MISSING_IMAGE_MESSAGE: &str = "The API response did not contain an image.";

static GEMINI_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(CONFIG.gemini_timeout_seconds))
        .connect_timeout(Duration::from_secs(15))
        .build()
        .expect("Failed to build HTTP client")
});

/// Why a generation call produced no image. Messages are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Network Error: Please check your internet connection.")]
    Network(String),
    #[error("Your request was blocked as it might violate Google's safety policies. This can happen with prompts that are ambiguous or touch on sensitive topics. Please rephrase your prompt to be more specific and try again.")]
    RequestBlocked,
    #[error("The uploaded image was blocked as it might violate Google's safety policies. Please try using a different image.")]
    ImageBlocked,
    #[error("The model was unable to process the uploaded image. Please try using a different image or re-saving your current one in a standard format like PNG or JPG.")]
    ImageUnprocessable,
    #[error("The model couldn't complete your request. This can sometimes happen with very complex or ambiguous edits. Please try simplifying your request (e.g., change fewer items at once) and try again.")]
    OtherFailure,
    #[error("Image generation failed. Reason: {0}. Please try again.")]
    Unfinished(String),
    #[error("Gemini API Error: {0}")]
    Api(String),
}

impl GenerationError {
    pub fn key(&self) -> &'static str {
        match self {
            GenerationError::Network(_) => "network-failure",
            GenerationError::RequestBlocked => "content-safety-block-request",
            GenerationError::ImageBlocked => "content-safety-block-image",
            GenerationError::ImageUnprocessable => "image-unprocessable",
            GenerationError::OtherFailure => "generation-other-failure",
            GenerationError::Unfinished(_) | GenerationError::Api(_) => "upstream-opaque-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

fn redact_gemini_api_key(text: &str) -> String {
    let key = CONFIG.gemini_api_key.trim();
    if key.is_empty() {
        return text.to_string();
    }
    text.replace(key, "[redacted]")
}

fn build_safety_settings() -> Vec<Value> {
    let profile = CONFIG.gemini_safety_settings.as_str();
    let threshold = match profile {
        "standard" => "BLOCK_MEDIUM_AND_ABOVE",
        "permissive" => "BLOCK_NONE",
        _ => {
            warn!(
                "Unknown GEMINI_SAFETY_SETTINGS value '{}', using permissive defaults.",
                profile
            );
            "BLOCK_NONE"
        }
    };

    vec![
        json!({ "category": "HARM_CATEGORY_HARASSMENT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": threshold }),
        json!({ "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": threshold }),
    ]
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_gemini_parts(parts: &[Value]) -> Vec<Value> {
    parts
        .iter()
        .map(|part| {
            if let Some(text) = part.get("text").and_then(|value| value.as_str()) {
                json!({ "text": truncate_for_log(text, 200) })
            } else if let Some(inline_data) = part.get("inlineData") {
                let mime_type = inline_data
                    .get("mimeType")
                    .and_then(|value| value.as_str())
                    .unwrap_or("unknown");
                let data_len = inline_data
                    .get("data")
                    .and_then(|value| value.as_str())
                    .map(|value| value.len())
                    .unwrap_or(0);
                json!({ "inlineData": { "mimeType": mime_type, "dataLen": data_len } })
            } else {
                json!({ "unknownPart": true })
            }
        })
        .collect()
}

fn summarize_gemini_payload(payload: &Value, label: &str) -> Value {
    let mut summary = Map::new();
    summary.insert("label".to_string(), json!(label));

    if let Some(contents) = payload.get("contents").and_then(|value| value.as_array()) {
        let summarized: Vec<Value> = contents
            .iter()
            .map(|content| {
                let parts = content
                    .get("parts")
                    .and_then(|value| value.as_array())
                    .map(|parts| summarize_gemini_parts(parts))
                    .unwrap_or_default();
                json!({ "parts": parts })
            })
            .collect();
        summary.insert("contents".to_string(), Value::Array(summarized));
    }

    if let Some(config) = payload.get("generationConfig") {
        summary.insert("generationConfig".to_string(), config.clone());
    }

    if let Some(safety) = payload
        .get("safetySettings")
        .and_then(|value| value.as_array())
    {
        summary.insert("safetySettingsCount".to_string(), json!(safety.len()));
    }

    Value::Object(summary)
}

fn candidate_parts(response: &GeminiResponse) -> impl Iterator<Item = &GeminiPart> {
    response
        .candidates
        .iter()
        .flatten()
        .filter_map(|candidate| candidate.content.as_ref())
        .filter_map(|content| content.parts.as_ref())
        .flatten()
}

fn summarize_gemini_response(response: &GeminiResponse) -> Value {
    let mut text_parts = 0usize;
    let mut image_parts = 0usize;
    let mut text_preview = None;

    for part in candidate_parts(response) {
        match part {
            GeminiPart::Text { text } => {
                text_parts += 1;
                if text_preview.is_none() && !text.trim().is_empty() {
                    text_preview = Some(truncate_for_log(text, 200));
                }
            }
            GeminiPart::InlineData { inline_data } => {
                if inline_data.mime_type.starts_with("image/") {
                    image_parts += 1;
                }
            }
            GeminiPart::Other(_) => {}
        }
    }

    let first = response.candidates.as_deref().and_then(|c| c.first());
    json!({
        "candidates": response.candidates.as_ref().map(|candidates| candidates.len()).unwrap_or(0),
        "finishReason": first.and_then(|c| c.finish_reason.clone()),
        "blockReason": response.prompt_feedback.as_ref().and_then(|f| f.block_reason.clone()),
        "textParts": text_parts,
        "imageParts": image_parts,
        "textPreview": text_preview
    })
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

fn inline_image_part(image: &LoadedImage) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type,
            "data": general_purpose::STANDARD.encode(&image.bytes)
        }
    })
}

fn failure_for_reason(reason: &str) -> Option<GenerationError> {
    match reason {
        "SAFETY" => Some(GenerationError::RequestBlocked),
        "IMAGE_SAFETY" => Some(GenerationError::ImageBlocked),
        "NO_IMAGE" => Some(GenerationError::ImageUnprocessable),
        "IMAGE_OTHER" => Some(GenerationError::OtherFailure),
        "STOP" | "" => None,
        other => Some(GenerationError::Unfinished(other.to_string())),
    }
}

/// Explains a response that carried no image. The first candidate's finish
/// reason decides; a prompt-level block is consulted when there is none.
fn generation_failure(response: &GeminiResponse) -> GenerationError {
    let finish_reason = response
        .candidates
        .as_deref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.finish_reason.as_deref());
    if let Some(error) = finish_reason.and_then(failure_for_reason) {
        return error;
    }

    match response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        Some("IMAGE_SAFETY") => GenerationError::ImageBlocked,
        Some(reason) if !reason.is_empty() => GenerationError::RequestBlocked,
        _ => GenerationError::Api(MISSING_IMAGE_MESSAGE.to_string()),
    }
}

/// First inline image of the first candidate, decoded.
fn extract_image(response: &GeminiResponse) -> Result<(Vec<u8>, String), GenerationError> {
    let first = response
        .candidates
        .as_deref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.as_deref())
        .unwrap_or(&[]);

    let inline = first.iter().find_map(|part| match part {
        GeminiPart::InlineData { inline_data } if !inline_data.data.is_empty() => Some(inline_data),
        _ => None,
    });
    let Some(inline) = inline else {
        return Err(generation_failure(response));
    };

    let bytes = general_purpose::STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|err| GenerationError::Api(format!("invalid image data: {err}")))?;
    Ok((bytes, inline.mime_type.clone()))
}

fn extract_text(response: &GeminiResponse) -> String {
    candidate_parts(response)
        .filter_map(|part| match part {
            GeminiPart::Text { text } if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

async fn call_gemini_api(
    model: &str,
    payload: Value,
    label: &str,
) -> Result<GeminiResponse, GenerationError> {
    if CONFIG.gemini_api_key.trim().is_empty() {
        return Err(GenerationError::Api(
            "GEMINI_API_KEY is not configured".to_string(),
        ));
    }

    let url = format!("{}/models/{}:generateContent", CONFIG.gemini_base_url, model);

    if tracing::enabled!(tracing::Level::DEBUG) {
        let payload_summary = summarize_gemini_payload(&payload, label);
        debug!(target: "llm.gemini", model = model, payload = %payload_summary);
    }

    let response = GEMINI_CLIENT
        .post(&url)
        .header("x-goog-api-key", CONFIG.gemini_api_key.trim())
        .json(&payload)
        .send()
        .await
        .map_err(|err| {
            let err_text = redact_gemini_api_key(&err.to_string());
            warn!(
                "Gemini request failed to send: {} (timeout={}, connect={}, status={:?})",
                err_text,
                err.is_timeout(),
                err.is_connect(),
                err.status()
            );
            GenerationError::Network(err_text)
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (message, body_summary) = summarize_error_body(&body);
        warn!("Gemini API error: status={}, body={}", status, body_summary);
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                target: "llm.gemini",
                status = %status,
                body = %truncate_for_log(&body, 4000)
            );
        }
        let detail = message.unwrap_or(body_summary);
        return Err(GenerationError::Api(format!(
            "request failed with status {}: {}",
            status,
            redact_gemini_api_key(&detail)
        )));
    }

    let value = response.json::<GeminiResponse>().await.map_err(|err| {
        let err_text = redact_gemini_api_key(&err.to_string());
        if err.is_timeout() {
            GenerationError::Network(err_text)
        } else {
            GenerationError::Api(format!("unreadable response: {err_text}"))
        }
    })?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let response_summary = summarize_gemini_response(&value);
        debug!(target: "llm.gemini", model = model, response = %response_summary);
    }
    Ok(value)
}

async fn generate_text(parts: Vec<Value>, operation: &str) -> Result<String, GenerationError> {
    let payload = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "safetySettings": build_safety_settings(),
    });
    let model = CONFIG.gemini_text_model.as_str();
    log_llm_timing(GEMINI_PROVIDER, model, operation, None, || async {
        let response = call_gemini_api(model, payload, operation).await?;
        Ok(extract_text(&response))
    })
    .await
}

async fn generate_image(
    images: &[&LoadedImage],
    prompt: &str,
    operation: &str,
) -> Result<(Vec<u8>, String), GenerationError> {
    let mut parts: Vec<Value> = images.iter().map(|image| inline_image_part(image)).collect();
    parts.push(json!({ "text": prompt }));

    let payload = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "responseModalities": ["IMAGE"] },
        "safetySettings": build_safety_settings(),
    });
    let model = CONFIG.gemini_image_model.as_str();
    let metadata = json!({
        "images": images.len(),
        "prompt_chars": prompt.chars().count(),
    });
    log_llm_timing(GEMINI_PROVIDER, model, operation, Some(metadata), || async {
        let response = call_gemini_api(model, payload, operation).await?;
        extract_image(&response)
    })
    .await
}

/// One short sentence about a generated image. Never fails; a fixed
/// sentence stands in when the model gives nothing usable.
pub async fn describe_image(bytes: &[u8], mime_type: &str) -> String {
    let image = LoadedImage {
        bytes: bytes.to_vec(),
        mime_type: mime_type.to_string(),
    };
    let parts = vec![
        inline_image_part(&image),
        json!({ "text": IMAGE_DESCRIPTION_PROMPT }),
    ];
    match generate_text(parts, "describe_image").await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => IMAGE_DESCRIPTION_EMPTY_FALLBACK.to_string(),
        Err(err) => {
            warn!("Image description failed: {}", err);
            IMAGE_DESCRIPTION_FAILED_FALLBACK.to_string()
        }
    }
}

async fn with_description(image: (Vec<u8>, String)) -> GeneratedImage {
    let (bytes, mime_type) = image;
    let description = describe_image(&bytes, &mime_type).await;
    GeneratedImage {
        bytes,
        mime_type,
        description,
    }
}

/// Applies `prompt` to the photo.
pub async fn edit_image(
    image: &LoadedImage,
    prompt: &str,
) -> Result<GeneratedImage, GenerationError> {
    let generated = generate_image(&[image], prompt, "edit_image").await?;
    Ok(with_description(generated).await)
}

/// Dresses the person from the first photo in the garment from the second.
pub async fn try_on(
    person: &LoadedImage,
    garment: &LoadedImage,
) -> Result<GeneratedImage, GenerationError> {
    let generated = generate_image(&[person, garment], TRY_ON_PROMPT, "try_on").await?;
    Ok(with_description(generated).await)
}

/// Apparent gender of the person in the photo; any failure is `Uncertain`.
pub async fn detect_gender(image: &LoadedImage) -> Gender {
    let parts = vec![
        inline_image_part(image),
        json!({ "text": GENDER_DETECTION_PROMPT }),
    ];
    match generate_text(parts, "detect_gender").await {
        Ok(answer) => {
            let gender = Gender::parse(&answer);
            info!("Detected gender: {} (raw answer: {:?})", gender, truncate_for_log(&answer, 40));
            gender
        }
        Err(err) => {
            warn!("Gender detection failed, continuing as Uncertain: {}", err);
            Gender::Uncertain
        }
    }
}

pub async fn translate_to_english(text: &str) -> Result<String, GenerationError> {
    let prompt = FREE_TEXT_TRANSLATION_PROMPT.replace("{text}", text);
    let translated = generate_text(vec![json!({ "text": prompt })], "translate_free_text").await?;
    if translated.is_empty() {
        return Err(GenerationError::Api(
            "the translation response was empty".to_string(),
        ));
    }
    Ok(translated)
}
