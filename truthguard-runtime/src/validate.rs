//! Input validation

use truthguard_core::{ContentKind, MediaFile};
use truthguard_net::validate_http_url;

use crate::{AnalysisError, EngineConfig};

/// Trimmed URL, or an error if it is empty or not an absolute http(s) URL
pub fn validate_url(url: &str) -> Result<url::Url, AnalysisError> {
    if url.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("URL is required".to_string()));
    }
    validate_http_url(url).map_err(|e| AnalysisError::InvalidInput(e.to_string()))
}

pub fn validate_text(text: &str) -> Result<(), AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::InvalidInput("Text content is required".to_string()));
    }
    Ok(())
}

/// Check an uploaded file against the size and type limits for its kind
pub fn validate_media(kind: ContentKind, file: &MediaFile, config: &EngineConfig) -> Result<(), AnalysisError> {
    let (limit, accepted) = match kind {
        ContentKind::Image => (config.max_image_bytes, &config.accepted_image_types),
        ContentKind::Video => (config.max_video_bytes, &config.accepted_video_types),
        ContentKind::Url | ContentKind::Text => {
            return Err(AnalysisError::InvalidInput(format!("{} is not a media kind", kind)))
        }
    };

    if file.bytes.is_empty() {
        return Err(AnalysisError::InvalidInput(format!("{} file is required", capitalize(kind.as_str()))));
    }
    if file.size() > limit {
        return Err(AnalysisError::InvalidInput(format!(
            "{} is {} bytes, over the {} byte limit",
            file.name,
            file.size(),
            limit
        )));
    }
    if !accepted.iter().any(|t| t.eq_ignore_ascii_case(&file.mime_type)) {
        return Err(AnalysisError::InvalidInput(format!(
            "unsupported {} type: {}",
            kind, file.mime_type
        )));
    }
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
