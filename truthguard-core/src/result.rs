//! Analysis results
//!
//! One record per analysed input, tagged by content kind. All four variants
//! share a [`ResultHeader`] carrying the id, truth score, factors, summary
//! and timestamp; the rest is kind-specific metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{ContentKind, Factor, FactorSet, MisinformationBlock, TrustSummary};

/// Characters of fetched or submitted content kept in `raw_content`
pub const RAW_CONTENT_CHARS: usize = 1000;

/// Characters of submitted text echoed back in text results
pub const TEXT_PREVIEW_CHARS: usize = 100;

/// Coarse credibility label derived from the truth score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credibility {
    High,
    Medium,
    Low,
}

impl Credibility {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 70 => Credibility::High,
            s if s >= 40 => Credibility::Medium,
            _ => Credibility::Low,
        }
    }
}

impl fmt::Display for Credibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Credibility::High => "High",
            Credibility::Medium => "Medium",
            Credibility::Low => "Low",
        };
        f.write_str(label)
    }
}

/// Fields shared by every result kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultHeader {
    pub id: String,
    pub truth_score: i32,
    pub factors: Vec<Factor>,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

impl ResultHeader {
    /// Stamp a fresh id and timestamp onto a blended factor set
    pub fn new(kind: ContentKind, scores: FactorSet, summary: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", kind.as_str(), Uuid::new_v4()),
            truth_score: scores.truth_score,
            factors: scores.factors,
            summary: summary.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlAnalysis {
    #[serde(flatten)]
    pub header: ResultHeader,
    pub url: String,
    pub title: String,
    pub source: String,
    pub publish_date: String,
    pub credibility: Credibility,
    pub source_reputation: String,
    pub factual_errors: u32,
    pub misleading_claims: u32,
    pub political_bias: String,
    pub sentiment: String,
    pub indian_context: bool,
    pub misinformation: MisinformationBlock,
    pub trust_signals: TrustSummary,
    pub primary_analysis: String,
    pub secondary_analysis: String,
    pub raw_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    #[serde(flatten)]
    pub header: ResultHeader,
    /// Preview of the submitted text
    pub text: String,
    pub factual_errors: u32,
    pub misleading_claims: u32,
    pub sentiment: String,
    pub political_bias: String,
    pub misinformation: MisinformationBlock,
    pub primary_analysis: String,
    pub secondary_analysis: String,
    pub raw_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(flatten)]
    pub header: ResultHeader,
    pub filename: String,
    pub manipulation_detected: bool,
    pub deepfake_confidence: i32,
    pub manipulated_regions: Vec<String>,
    pub original_found: bool,
    pub original_source: Option<String>,
    pub vision_analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    #[serde(flatten)]
    pub header: ResultHeader,
    pub filename: String,
    pub manipulation_detected: bool,
    pub deepfake_confidence: i32,
    pub manipulated_elements: Vec<String>,
    pub inconsistencies: Vec<String>,
    pub basic_analysis: String,
}

/// Final analysis record, serialized with a `"type"` tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisResult {
    Url(UrlAnalysis),
    Text(TextAnalysis),
    Image(ImageAnalysis),
    Video(VideoAnalysis),
}

impl AnalysisResult {
    pub fn kind(&self) -> ContentKind {
        match self {
            AnalysisResult::Url(_) => ContentKind::Url,
            AnalysisResult::Text(_) => ContentKind::Text,
            AnalysisResult::Image(_) => ContentKind::Image,
            AnalysisResult::Video(_) => ContentKind::Video,
        }
    }

    pub fn header(&self) -> &ResultHeader {
        match self {
            AnalysisResult::Url(r) => &r.header,
            AnalysisResult::Text(r) => &r.header,
            AnalysisResult::Image(r) => &r.header,
            AnalysisResult::Video(r) => &r.header,
        }
    }

    pub fn id(&self) -> &str {
        &self.header().id
    }

    pub fn truth_score(&self) -> i32 {
        self.header().truth_score
    }

    pub fn factors(&self) -> &[Factor] {
        &self.header().factors
    }

    pub fn summary(&self) -> &str {
        &self.header().summary
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.header().timestamp
    }
}

/// First `max_chars` characters of `content` followed by `...`
pub fn raw_excerpt(content: &str, max_chars: usize) -> String {
    let mut excerpt: String = content.chars().take(max_chars).collect();
    excerpt.push_str("...");
    excerpt
}

/// Like [`raw_excerpt`], but only adds `...` when something was cut
pub fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() > max_chars {
        raw_excerpt(content, max_chars)
    } else {
        content.to_string()
    }
}

/// Character-safe truncation without a marker
pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MisinfoVerdict;

    fn text_result() -> AnalysisResult {
        AnalysisResult::Text(TextAnalysis {
            header: ResultHeader::new(
                ContentKind::Text,
                FactorSet::neutral(ContentKind::Text),
                "Looks fine.",
            ),
            text: preview("short text", TEXT_PREVIEW_CHARS),
            factual_errors: 0,
            misleading_claims: 0,
            sentiment: "Neutral".into(),
            political_bias: "Unknown".into(),
            misinformation: MisinformationBlock::from(&MisinfoVerdict::clear("ok")),
            primary_analysis: "primary".into(),
            secondary_analysis: "secondary".into(),
            raw_content: raw_excerpt("short text", RAW_CONTENT_CHARS),
        })
    }

    #[test]
    fn test_credibility_thresholds() {
        assert_eq!(Credibility::from_score(70), Credibility::High);
        assert_eq!(Credibility::from_score(69), Credibility::Medium);
        assert_eq!(Credibility::from_score(40), Credibility::Medium);
        assert_eq!(Credibility::from_score(39), Credibility::Low);
    }

    #[test]
    fn test_serialized_shape() {
        let result = text_result();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["truthScore"], 50);
        assert_eq!(json["factors"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["misinformation"], serde_json::json!({"detected": false}));
        assert_eq!(json["rawContent"], "short text...");
        assert!(json["id"].as_str().unwrap().starts_with("text-"));
    }

    #[test]
    fn test_accessors() {
        let result = text_result();
        assert_eq!(result.kind(), ContentKind::Text);
        assert_eq!(result.truth_score(), 50);
        assert_eq!(result.summary(), "Looks fine.");
        assert_eq!(result.factors().len(), 4);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ResultHeader::new(ContentKind::Url, FactorSet::neutral(ContentKind::Url), "");
        let b = ResultHeader::new(ContentKind::Url, FactorSet::neutral(ContentKind::Url), "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_excerpts_are_char_safe() {
        let hindi = "झूठी खबर ".repeat(200);
        let excerpt = raw_excerpt(&hindi, RAW_CONTENT_CHARS);
        assert_eq!(excerpt.chars().count(), RAW_CONTENT_CHARS + 3);

        assert_eq!(preview("abc", 100), "abc");
        assert_eq!(preview(&"a".repeat(101), 100), format!("{}...", "a".repeat(100)));
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
