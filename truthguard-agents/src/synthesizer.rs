//! Factor Synthesizer
//!
//! Asks the model for four named factor scores plus an overall truth score.
//! Always yields a four-factor set: anything else the model returns is
//! replaced by the neutral set for the content kind.

use tracing::{debug, warn};

use truthguard_core::{ContentKind, FactorSet};

use crate::{ids, labelled_sections, request_json_with, AgentError, Persona, PersonaRegistry, SharedBackend};

/// Number of factors the synthesizer must return
pub const FACTOR_COUNT: usize = 4;

/// Factor synthesizer
pub struct FactorSynthesizer {
    backend: SharedBackend,
    persona: Persona,
}

impl FactorSynthesizer {
    pub fn new(backend: SharedBackend, registry: &PersonaRegistry) -> Result<Self, AgentError> {
        let persona = registry.require(ids::FACTOR_SCORER)?.clone();
        Ok(Self { backend, persona })
    }

    /// Score labelled analyses for a content kind. Scores are not clamped here.
    pub async fn synthesize(&self, kind: ContentKind, analyses: &[(&str, &str)]) -> FactorSet {
        let fallback = FactorSet::neutral(kind);
        let factor_list = factor_list(kind);
        let analyses = labelled_sections(analyses);
        let vars = [
            ("subject", subject(kind)),
            ("factor_list", factor_list.as_str()),
            ("analyses", analyses.as_str()),
        ];

        let set = request_json_with(self.backend.as_ref(), &self.persona, &vars, fallback.clone()).await;

        if set.factors.len() != FACTOR_COUNT {
            warn!(
                "Synthesizer returned {} factors for {}, using neutral factors",
                set.factors.len(),
                kind
            );
            return fallback;
        }

        debug!("Synthesized {} truth score {}", kind, set.truth_score);
        set
    }
}

fn subject(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Image => "the image analysis",
        _ => "the analysis",
    }
}

/// Numbered factor names, one per line
fn factor_list(kind: ContentKind) -> String {
    kind.factor_names()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}
