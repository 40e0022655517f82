//! Factor model: named 0-100 sub-scores plus the overall truth score

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::NEUTRAL_SCORE;

/// Kind of content under analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Url,
    Text,
    Image,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Url => "url",
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
        }
    }

    /// The four factors the synthesizer asks for, in order
    pub fn factor_names(&self) -> [&'static str; 4] {
        match self {
            ContentKind::Url => [
                "Source Credibility",
                "Factual Accuracy",
                "Bias Assessment",
                "Manipulation Detection",
            ],
            ContentKind::Text => [
                "Factual Accuracy",
                "Bias Assessment",
                "Manipulation Detection",
                "AI Generation Probability",
            ],
            ContentKind::Image => [
                "Image Quality",
                "Manipulation Detection",
                "Deepfake Probability",
                "Overall Authenticity",
            ],
            ContentKind::Video => [
                "Video Quality",
                "Manipulation Likelihood",
                "Deepfake Probability",
                "Content Authenticity",
            ],
        }
    }

    /// Whether the misinformation classifier applies to this kind
    pub fn uses_misinformation_check(&self) -> bool {
        matches!(self, ContentKind::Url | ContentKind::Text)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named 0-100 sub-score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    #[serde(deserialize_with = "lenient_score")]
    pub score: i32,
}

impl Factor {
    pub fn new(name: impl Into<String>, score: i32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Case-insensitive check against any of the role keywords
    pub fn has_role(&self, roles: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        roles.iter().any(|role| name.contains(role))
    }
}

/// Overall truth score with its ordered factor breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorSet {
    #[serde(deserialize_with = "lenient_score")]
    pub truth_score: i32,
    pub factors: Vec<Factor>,
}

impl FactorSet {
    /// Neutral set for a content kind: every factor and the truth score at 50
    pub fn neutral(kind: ContentKind) -> Self {
        Self {
            truth_score: NEUTRAL_SCORE,
            factors: kind
                .factor_names()
                .iter()
                .map(|name| Factor::new(*name, NEUTRAL_SCORE))
                .collect(),
        }
    }

    /// Index of the first factor matching any of the roles
    pub fn position_of(&self, roles: &[&str]) -> Option<usize> {
        self.factors.iter().position(|f| f.has_role(roles))
    }

    pub fn get(&self, name: &str) -> Option<&Factor> {
        self.factors.iter().find(|f| f.name == name)
    }

    /// True when the truth score and every factor are within [0, 100]
    pub fn in_bounds(&self) -> bool {
        let ok = |s: i32| (0..=100).contains(&s);
        ok(self.truth_score) && self.factors.iter().all(|f| ok(f.score))
    }
}

/// Accept integer, float, or numeric-string scores and round to an integer
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(f64),
        Text(String),
    }

    let value = match RawScore::deserialize(deserializer)? {
        RawScore::Number(n) => n,
        RawScore::Text(s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(serde::de::Error::custom)?,
    };

    if !value.is_finite() {
        return Err(serde::de::Error::custom("score is not a finite number"));
    }
    Ok(value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}
