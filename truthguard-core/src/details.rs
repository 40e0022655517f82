//! Structured details extracted from model answers
//!
//! Each type doubles as the fallback handed to the extraction adapter, so
//! every field tolerates being absent in the model's JSON.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clamp_score;
use crate::factors::lenient_score;

/// Article / text metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentMetadata {
    pub title: Option<String>,
    pub source: Option<String>,
    pub publish_date: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub factual_errors: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub misleading_claims: u32,
    pub political_bias: Option<String>,
    pub sentiment: Option<String>,
    pub indian_context: bool,
}

impl ContentMetadata {
    /// Fallback for URL analyses: the domain stands in for title and source
    pub fn fallback_for_domain(domain: &str) -> Self {
        Self {
            title: Some(domain.to_string()),
            source: Some(domain.to_string()),
            publish_date: Some(today()),
            political_bias: Some(UNKNOWN_BIAS.to_string()),
            sentiment: Some(NEUTRAL_SENTIMENT.to_string()),
            ..Default::default()
        }
    }

    /// Fallback for text analyses
    pub fn fallback_for_text() -> Self {
        Self {
            political_bias: Some(UNKNOWN_BIAS.to_string()),
            sentiment: Some(NEUTRAL_SENTIMENT.to_string()),
            ..Default::default()
        }
    }

    pub fn political_bias_or_default(&self) -> String {
        non_empty_or(&self.political_bias, UNKNOWN_BIAS)
    }

    pub fn sentiment_or_default(&self) -> String {
        non_empty_or(&self.sentiment, NEUTRAL_SENTIMENT)
    }
}

pub const UNKNOWN_BIAS: &str = "Unknown";
pub const NEUTRAL_SENTIMENT: &str = "Neutral";

/// Image manipulation details
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageDetails {
    pub manipulation_detected: bool,
    pub manipulated_regions: Vec<String>,
    #[serde(deserialize_with = "percent")]
    pub deepfake_confidence: i32,
    pub original_found: bool,
    pub original_source: Option<String>,
}

/// Video manipulation details
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoDetails {
    pub manipulation_detected: bool,
    #[serde(deserialize_with = "percent")]
    pub deepfake_confidence: i32,
    pub manipulated_elements: Vec<String>,
    pub inconsistencies: Vec<String>,
}

/// Today's date as `YYYY-MM-DD`
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// The trimmed value when present and non-empty, else `default`
pub fn non_empty_or(value: &Option<String>, default: &str) -> String {
    non_empty(value).unwrap_or_else(|| default.to_string())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn percent<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient_score(deserializer).map(clamp_score)
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let score = lenient_score(deserializer)?;
    Ok(score.max(0) as u32)
}
