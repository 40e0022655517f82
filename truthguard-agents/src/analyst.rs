//! Analyst Agent
//!
//! Produces the free-text analyses the rest of the pipeline scores:
//! - **Fact check**: primary credibility analysis (primary/fallback backend)
//! - **Media analysis**: manipulation and bias review
//! - **Source reputation**: 2-3 sentence take on the domain
//! - **Vision / video**: forensics notes for uploaded media
//! - **Summary**: 3-4 sentence wrap-up for every content kind

use std::sync::Arc;
use tracing::{debug, info};

use truthguard_core::{ContentKind, MediaFile, TrustSignals};

use crate::{ids, AgentError, PersonaRegistry, SharedBackend, SharedVisionBackend};

/// Join `(label, text)` pairs as `label: text` blocks separated by blank lines
pub fn labelled_sections(sections: &[(&str, &str)]) -> String {
    sections
        .iter()
        .map(|(label, text)| format!("{}: {}", label, text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Analyst agent - runs the free-text model calls
pub struct AnalystAgent {
    /// Backend for the primary fact check (usually a [`crate::FallbackBackend`])
    general: SharedBackend,
    /// Backend for every other text call
    text: SharedBackend,
    vision: SharedVisionBackend,
    registry: Arc<PersonaRegistry>,
}

impl AnalystAgent {
    pub fn new(
        general: SharedBackend,
        text: SharedBackend,
        vision: SharedVisionBackend,
        registry: Arc<PersonaRegistry>,
    ) -> Self {
        Self {
            general,
            text,
            vision,
            registry,
        }
    }

    /// Primary credibility analysis. `url` is `Some` for web pages.
    pub async fn fact_check(&self, url: Option<&str>, excerpt: &str) -> Result<String, AgentError> {
        let id = if url.is_some() {
            ids::URL_FACT_CHECKER
        } else {
            ids::TEXT_FACT_CHECKER
        };
        info!("Running fact check with {}", self.general.model_name());
        self.run_text(&self.general, id, &[("url", url.unwrap_or_default()), ("content", excerpt)])
            .await
    }

    /// Secondary analysis focused on manipulation and bias
    pub async fn media_analysis(&self, url: Option<&str>, excerpt: &str) -> Result<String, AgentError> {
        let id = if url.is_some() {
            ids::URL_MEDIA_ANALYST
        } else {
            ids::TEXT_MEDIA_ANALYST
        };
        self.run_text(&self.text, id, &[("url", url.unwrap_or_default()), ("content", excerpt)])
            .await
    }

    /// Short reputation assessment of a domain, informed by its trust signals
    pub async fn source_reputation(&self, domain: &str, trust: &TrustSignals) -> Result<String, AgentError> {
        let signals = trust.to_pretty_json();
        self.run_text(
            &self.text,
            ids::SOURCE_REPUTATION,
            &[("domain", domain), ("trust_signals", signals.as_str())],
        )
        .await
    }

    /// Forensics notes on an uploaded image
    pub async fn describe_image(&self, image: &MediaFile) -> Result<String, AgentError> {
        let persona = self.registry.require(ids::IMAGE_VISION)?;
        info!("Analyzing image {} with {}", image.name, self.vision.model_name());
        let answer = self
            .vision
            .describe(
                persona.system_prompt(),
                &persona.render_user(&[]),
                image,
                persona.max_tokens(),
            )
            .await?;
        Ok(answer)
    }

    /// Notes on an uploaded video, from its file information only
    pub async fn describe_video(&self, video: &MediaFile) -> Result<String, AgentError> {
        let size = video.size().to_string();
        self.run_text(
            &self.text,
            ids::VIDEO_BASIC,
            &[
                ("filename", video.name.as_str()),
                ("size", size.as_str()),
                ("mime_type", video.mime_type.as_str()),
            ],
        )
        .await
    }

    /// Summary of labelled analyses for a content kind
    pub async fn summarize(&self, kind: ContentKind, analyses: &[(&str, &str)]) -> Result<String, AgentError> {
        let id = match kind {
            ContentKind::Url => ids::URL_SUMMARY,
            ContentKind::Text => ids::TEXT_SUMMARY,
            ContentKind::Image => ids::IMAGE_SUMMARY,
            ContentKind::Video => ids::VIDEO_SUMMARY,
        };
        let analyses = labelled_sections(analyses);
        self.run_text(&self.text, id, &[("analyses", analyses.as_str())]).await
    }

    async fn run_text(
        &self,
        backend: &SharedBackend,
        persona_id: &str,
        vars: &[(&str, &str)],
    ) -> Result<String, AgentError> {
        let persona = self.registry.require(persona_id)?;
        debug!("Running persona: {}", persona.persona.name);

        let answer = backend
            .generate(
                &persona.render_system(vars),
                &persona.render_user(vars),
                persona.max_tokens(),
            )
            .await?;
        Ok(answer)
    }
}
