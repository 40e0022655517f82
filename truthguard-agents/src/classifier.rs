//! Misinformation Classifier
//!
//! Combines a keyword scan over the model analyses with a one-word YES/NO
//! verification query.
//! - Confidence comes from the keyword scan alone: 20 points per distinct phrase
//! - The verdict is positive when the model says YES or confidence reaches 40
//! - A failed verification call yields a clear verdict, never an error

use tracing::{debug, info, warn};

use truthguard_core::{preview, MisinfoVerdict};

use crate::{ids, AgentError, Persona, PersonaRegistry, SharedBackend};

/// Phrases in an analysis that point toward misinformation
pub const INDICATOR_PHRASES: &[&str] = &[
    "no scientific evidence",
    "lacks credibility",
    "unsubstantiated",
    "misleading",
    "false claim",
    "misinformation",
    "disinformation",
    "unfounded",
    "pseudoscience",
    "not supported by research",
    "factually incorrect",
    "no credible sources",
    "conspiracy",
    "debunked",
    "false",
    "myth",
    "not credible",
    "unsupported",
];

/// Points of confidence per matched indicator
pub const POINTS_PER_INDICATOR: i32 = 20;

/// Confidence at which the verdict is positive regardless of the model
pub const CONFIDENCE_THRESHOLD: i32 = 40;

/// Content shorter than this (after trimming) is not classified
pub const MIN_CONTENT_CHARS: usize = 5;

/// Characters of content shown to the verifier
pub const VERIFY_CONTENT_CHARS: usize = 1000;

const TOO_SHORT_REASON: &str = "Content too short for reliable analysis";
const ACCURATE_REASON: &str = "Content appears factually accurate";

/// Indicator phrases present in the text, case-insensitive, in list order
pub fn find_indicators(analyses: &str) -> Vec<&'static str> {
    let haystack = analyses.to_lowercase();
    INDICATOR_PHRASES
        .iter()
        .copied()
        .filter(|phrase| haystack.contains(phrase))
        .collect()
}

/// Keyword confidence for a number of matched indicators
pub fn indicator_confidence(hits: usize) -> i32 {
    let hits = i32::try_from(hits).unwrap_or(i32::MAX);
    hits.saturating_mul(POINTS_PER_INDICATOR).min(100)
}

/// Misinformation classifier
pub struct MisinformationClassifier {
    backend: SharedBackend,
    persona: Persona,
}

impl MisinformationClassifier {
    pub fn new(backend: SharedBackend, registry: &PersonaRegistry) -> Result<Self, AgentError> {
        let persona = registry.require(ids::MISINFORMATION_VERIFIER)?.clone();
        Ok(Self { backend, persona })
    }

    /// Classify content given the primary and secondary analyses
    pub async fn classify(&self, content: &str, primary: &str, secondary: &str) -> MisinfoVerdict {
        if content.trim().chars().count() < MIN_CONTENT_CHARS {
            return MisinfoVerdict::clear(TOO_SHORT_REASON);
        }

        let combined = format!("{} {}", primary, secondary);
        let matched = find_indicators(&combined);
        let confidence = indicator_confidence(matched.len());
        debug!("Misinformation indicators: {:?} (confidence {})", matched, confidence);

        let findings = if matched.is_empty() {
            "no issues identified".to_string()
        } else {
            format!(
                "this might be misinformation with these issues: {}",
                matched.join(", ")
            )
        };
        let excerpt = preview(content, VERIFY_CONTENT_CHARS);
        let vars = [("content", excerpt.as_str()), ("findings", findings.as_str())];

        let answer = match self
            .backend
            .generate(
                self.persona.system_prompt(),
                &self.persona.render_user(&vars),
                self.persona.max_tokens(),
            )
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Misinformation verification failed: {}", e);
                return MisinfoVerdict::clear(format!("Analysis error: {}", e));
            }
        };

        let said_yes = answer.trim().to_uppercase().contains("YES");
        let is_misinformation = said_yes || confidence >= CONFIDENCE_THRESHOLD;

        let reason = if is_misinformation {
            info!("Misinformation detected with confidence {}", confidence);
            format!(
                "Analysis found {} indicators of misinformation: {}",
                matched.len(),
                matched.join(", ")
            )
        } else {
            ACCURATE_REASON.to_string()
        };

        MisinfoVerdict {
            is_misinformation,
            confidence,
            reason,
            matched_indicators: matched.into_iter().map(str::to_string).collect(),
        }
    }
}
