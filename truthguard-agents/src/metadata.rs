//! Metadata Extractor
//!
//! Pulls structured details out of content and earlier analyses via the JSON
//! adapter. None of these calls fail: each has a fallback value.

use std::sync::Arc;
use tracing::warn;

use truthguard_core::{ContentMetadata, ImageDetails, MediaFile, VideoDetails};

use crate::{ids, request_json_with, PersonaRegistry, SharedBackend};

/// Metadata and media-detail extraction
pub struct MetadataExtractor {
    backend: SharedBackend,
    registry: Arc<PersonaRegistry>,
}

impl MetadataExtractor {
    pub fn new(backend: SharedBackend, registry: Arc<PersonaRegistry>) -> Self {
        Self { backend, registry }
    }

    /// Article metadata for a fetched page. The fallback names the domain.
    pub async fn article_metadata(&self, domain: &str, excerpt: &str) -> ContentMetadata {
        let fallback = ContentMetadata::fallback_for_domain(domain);
        self.extract(ids::URL_METADATA, &[("content", excerpt)], fallback)
            .await
    }

    /// Metadata for submitted text
    pub async fn text_metadata(&self, excerpt: &str) -> ContentMetadata {
        self.extract(ids::TEXT_METADATA, &[("content", excerpt)], ContentMetadata::fallback_for_text())
            .await
    }

    /// Manipulation details from the vision analysis of an image
    pub async fn image_details(&self, vision_analysis: &str) -> ImageDetails {
        self.extract(ids::IMAGE_DETAILS, &[("analysis", vision_analysis)], ImageDetails::default())
            .await
    }

    /// Manipulation details for a video, from its file information
    pub async fn video_details(&self, video: &MediaFile) -> VideoDetails {
        let size = video.size().to_string();
        let vars = [
            ("filename", video.name.as_str()),
            ("size", size.as_str()),
            ("mime_type", video.mime_type.as_str()),
        ];
        self.extract(ids::VIDEO_DETAILS, &vars, VideoDetails::default())
            .await
    }

    async fn extract<T>(&self, persona_id: &str, vars: &[(&str, &str)], fallback: T) -> T
    where
        T: serde::de::DeserializeOwned + Send,
    {
        match self.registry.get(persona_id) {
            Some(persona) => request_json_with(self.backend.as_ref(), persona, vars, fallback).await,
            None => {
                warn!("Persona {} missing, using fallback", persona_id);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedBackend;
    use crate::LlmError;

    fn extractor(backend: Arc<ScriptedBackend>) -> MetadataExtractor {
        MetadataExtractor::new(backend, Arc::new(PersonaRegistry::load_embedded()))
    }

    #[tokio::test]
    async fn test_article_metadata() {
        let answer = r#"{"title": "Monsoon update", "source": "Example News", "publishDate": "2025-06-01",
            "factualErrors": 0, "misleadingClaims": 1, "politicalBias": "None", "sentiment": "Neutral", "indianContext": true}"#;
        let backend = Arc::new(ScriptedBackend::answering(&[answer]));
        let meta = extractor(backend.clone()).article_metadata("example.in", "body").await;

        assert_eq!(meta.title.as_deref(), Some("Monsoon update"));
        assert_eq!(meta.misleading_claims, 1);
        assert!(meta.indian_context);
        assert!(backend.calls()[0].system.starts_with("Extract key metadata from content."));
    }

    #[tokio::test]
    async fn test_article_metadata_falls_back_to_domain() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err(LlmError::EmptyResponse)]));
        let meta = extractor(backend).article_metadata("example.in", "body").await;

        assert_eq!(meta.title.as_deref(), Some("example.in"));
        assert_eq!(meta.political_bias.as_deref(), Some("Unknown"));
    }

    #[tokio::test]
    async fn test_image_details_prompt() {
        let answer = r#"{"manipulationDetected": false, "manipulatedRegions": [], "deepfakeConfidence": 5, "originalFound": false, "originalSource": null}"#;
        let backend = Arc::new(ScriptedBackend::answering(&[answer]));
        let details = extractor(backend.clone()).image_details("Looks untouched").await;

        assert_eq!(details.deepfake_confidence, 5);
        assert_eq!(backend.calls()[0].user, "Initial analysis: Looks untouched");
    }

    #[tokio::test]
    async fn test_video_details_fallback() {
        let backend = Arc::new(ScriptedBackend::answering(&["no idea"]));
        let video = MediaFile::new("clip.webm", "video/webm", vec![0; 3]);
        let details = extractor(backend).video_details(&video).await;
        assert_eq!(details, VideoDetails::default());
    }
}
