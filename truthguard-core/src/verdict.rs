//! Misinformation verdicts

use serde::{Deserialize, Serialize};

/// Outcome of the misinformation classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MisinfoVerdict {
    pub is_misinformation: bool,
    /// Keyword-derived confidence (0-100)
    pub confidence: i32,
    pub reason: String,
    /// Indicator phrases found in the analyses
    #[serde(default)]
    pub matched_indicators: Vec<String>,
}

impl MisinfoVerdict {
    /// A negative verdict with zero confidence
    pub fn clear(reason: impl Into<String>) -> Self {
        Self {
            is_misinformation: false,
            confidence: 0,
            reason: reason.into(),
            matched_indicators: Vec::new(),
        }
    }
}

/// Misinformation block embedded in text and URL results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MisinformationBlock {
    Detected {
        detected: bool,
        confidence: i32,
        reason: String,
    },
    NotDetected {
        detected: bool,
    },
}

impl MisinformationBlock {
    pub fn detected(&self) -> bool {
        match self {
            MisinformationBlock::Detected { detected, .. }
            | MisinformationBlock::NotDetected { detected } => *detected,
        }
    }
}

impl From<&MisinfoVerdict> for MisinformationBlock {
    fn from(verdict: &MisinfoVerdict) -> Self {
        if verdict.is_misinformation {
            MisinformationBlock::Detected {
                detected: true,
                confidence: verdict.confidence,
                reason: verdict.reason.clone(),
            }
        } else {
            MisinformationBlock::NotDetected { detected: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_serialization() {
        let positive = MisinfoVerdict {
            is_misinformation: true,
            confidence: 60,
            reason: "Analysis found 3 indicators".to_string(),
            matched_indicators: vec![],
        };
        let block = MisinformationBlock::from(&positive);
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"detected": true, "confidence": 60, "reason": "Analysis found 3 indicators"})
        );

        let negative = MisinformationBlock::from(&MisinfoVerdict::clear("fine"));
        assert_eq!(serde_json::to_value(&negative).unwrap(), json!({"detected": false}));
        assert!(!negative.detected());
    }
}
