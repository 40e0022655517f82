//! Analysis Pipeline
//!
//! One entry point per content kind. Each run checks the cache, gathers the
//! model analyses (independent calls run concurrently), classifies and
//! scores them, blends in the deterministic signals and caches the result.
//!
//! | Kind | Misinformation check | Domain trust | Model calls |
//! |---|---|---|---|
//! | url | yes | yes | fact check, media analysis, reputation, metadata, verify, factors, summary |
//! | text | yes | no | fact check, media analysis, metadata, verify, factors, summary |
//! | image | no | no | vision, details, factors, summary |
//! | video | no | no | file notes, details, factors, summary |

use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use truthguard_agents::{
    AgentError, AnalystAgent, FactorSynthesizer, MetadataExtractor, MisinformationClassifier,
    PersonaRegistry, SharedBackend, SharedVisionBackend,
};
use truthguard_core::{
    blend, non_empty_or, preview, raw_excerpt, today, truncate_chars, AnalysisResult,
    ContentFingerprint, ContentKind, Credibility, ImageAnalysis, MediaFile, MisinformationBlock,
    ResultHeader, TextAnalysis, TrustLists, TrustSignals, UrlAnalysis, VideoAnalysis,
    RAW_CONTENT_CHARS, TEXT_PREVIEW_CHARS,
};
use truthguard_net::{verify_domain_trust, ContentFetcher, DomainProbe, FetchError};

use crate::{validate_media, validate_text, validate_url, EngineConfig, ResultCache};

const PRIMARY_LABEL: &str = "Primary analysis";
const SECONDARY_LABEL: &str = "Secondary analysis";
const REPUTATION_LABEL: &str = "Source reputation";
const TRUST_LABEL: &str = "Technical trust analysis";
const IMAGE_LABEL: &str = "Image analysis";
const VIDEO_LABEL: &str = "Video analysis";

/// Errors that abort an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Llm(#[from] AgentError),
}

/// External collaborators the pipeline talks to
pub struct Services {
    /// Backend for the primary fact check, usually primary/fallback
    pub general: SharedBackend,
    /// Backend for every other text call
    pub text: SharedBackend,
    pub vision: SharedVisionBackend,
    pub fetcher: Arc<dyn ContentFetcher>,
    pub probe: Arc<dyn DomainProbe>,
}

/// The analysis engine
pub struct Analyzer {
    config: EngineConfig,
    lists: Arc<TrustLists>,
    fetcher: Arc<dyn ContentFetcher>,
    probe: Arc<dyn DomainProbe>,
    analyst: AnalystAgent,
    classifier: MisinformationClassifier,
    synthesizer: FactorSynthesizer,
    metadata: MetadataExtractor,
    cache: Arc<ResultCache>,
}

impl Analyzer {
    /// Create an analyzer with the embedded personas
    pub fn new(config: EngineConfig, lists: TrustLists, services: Services) -> Result<Self, AnalysisError> {
        Self::with_registry(config, lists, services, PersonaRegistry::load_embedded())
    }

    /// Create an analyzer with a custom persona registry
    pub fn with_registry(
        config: EngineConfig,
        lists: TrustLists,
        services: Services,
        registry: PersonaRegistry,
    ) -> Result<Self, AnalysisError> {
        let registry = Arc::new(registry);
        let cache = Arc::new(ResultCache::new(config.cache_ttl, config.cache_max_entries));

        Ok(Self {
            classifier: MisinformationClassifier::new(services.text.clone(), &registry)?,
            synthesizer: FactorSynthesizer::new(services.text.clone(), &registry)?,
            metadata: MetadataExtractor::new(services.text.clone(), registry.clone()),
            analyst: AnalystAgent::new(services.general, services.text, services.vision, registry),
            fetcher: services.fetcher,
            probe: services.probe,
            lists: Arc::new(lists),
            config,
            cache,
        })
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start the background sweep of expired cache entries
    pub fn spawn_cache_purge(&self) -> JoinHandle<()> {
        self.cache.clone().spawn_purge_task(self.config.cache_purge_interval)
    }

    /// Domain trust for a URL without any model calls
    pub async fn assess_trust(&self, url: &str) -> Result<TrustSignals, AnalysisError> {
        let parsed = validate_url(url)?;
        Ok(verify_domain_trust(parsed.as_str(), &self.lists, self.probe.as_ref()).await)
    }

    /// Analyze a web page
    pub async fn analyze_url(&self, url: &str) -> Result<AnalysisResult, AnalysisError> {
        let parsed = validate_url(url)?;
        let url = url.trim();
        let domain = parsed.host_str().unwrap_or_default().to_string();

        let key = ContentFingerprint::for_url(url);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        info!("Fetching content from URL: {}", url);
        let content = self.fetcher.fetch(url).await?;
        let excerpt = truncate_chars(&content, self.config.content_excerpt_chars);

        info!("Verifying domain trust and running fact check");
        let (trust, primary) = tokio::join!(
            verify_domain_trust(url, &self.lists, self.probe.as_ref()),
            self.analyst.fact_check(Some(url), excerpt),
        );
        let primary = primary?;
        debug!("Domain trust for {}: {}", domain, trust.score);

        let (secondary, reputation, metadata) = tokio::join!(
            self.analyst.media_analysis(Some(url), excerpt),
            self.analyst.source_reputation(&domain, &trust),
            self.metadata.article_metadata(&domain, excerpt),
        );
        let (secondary, reputation) = (secondary?, reputation?);

        let analyses = [
            (PRIMARY_LABEL, primary.as_str()),
            (SECONDARY_LABEL, secondary.as_str()),
            (REPUTATION_LABEL, reputation.as_str()),
        ];

        info!("Checking for misinformation and scoring factors");
        let (verdict, factors) = tokio::join!(
            self.classifier.classify(&content, &primary, &secondary),
            self.synthesizer.synthesize(ContentKind::Url, &analyses),
        );

        let original_score = factors.truth_score;
        let scores = blend(factors, Some(&verdict), Some(&trust));
        info!(
            "Content score {}, domain trust {}, combined {}",
            original_score, trust.score, scores.truth_score
        );

        let trust_json = trust.to_pretty_json();
        let summary = self
            .analyst
            .summarize(
                ContentKind::Url,
                &[
                    (PRIMARY_LABEL, primary.as_str()),
                    (SECONDARY_LABEL, secondary.as_str()),
                    (REPUTATION_LABEL, reputation.as_str()),
                    (TRUST_LABEL, trust_json.as_str()),
                ],
            )
            .await?;

        let credibility = Credibility::from_score(scores.truth_score);
        let result = AnalysisResult::Url(UrlAnalysis {
            header: ResultHeader::new(ContentKind::Url, scores, summary),
            url: url.to_string(),
            title: non_empty_or(&metadata.title, &domain),
            source: non_empty_or(&metadata.source, &domain),
            publish_date: non_empty_or(&metadata.publish_date, &today()),
            credibility,
            source_reputation: reputation,
            factual_errors: metadata.factual_errors,
            misleading_claims: metadata.misleading_claims,
            political_bias: metadata.political_bias_or_default(),
            sentiment: metadata.sentiment_or_default(),
            indian_context: metadata.indian_context,
            misinformation: MisinformationBlock::from(&verdict),
            trust_signals: trust.summary(),
            primary_analysis: primary,
            secondary_analysis: secondary,
            raw_content: raw_excerpt(&content, RAW_CONTENT_CHARS),
        });

        self.cache.insert(key, result.clone());
        info!("Analysis complete: {}", result.id());
        Ok(result)
    }

    /// Analyze free text
    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        validate_text(text)?;

        let key = ContentFingerprint::for_text(text);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let excerpt = truncate_chars(text, self.config.content_excerpt_chars);

        info!("Running text analyses");
        let (primary, secondary, metadata) = tokio::join!(
            self.analyst.fact_check(None, excerpt),
            self.analyst.media_analysis(None, excerpt),
            self.metadata.text_metadata(excerpt),
        );
        let (primary, secondary) = (primary?, secondary?);
        let analyses = [
            (PRIMARY_LABEL, primary.as_str()),
            (SECONDARY_LABEL, secondary.as_str()),
        ];

        info!("Checking for misinformation and scoring factors");
        let (verdict, factors) = tokio::join!(
            self.classifier.classify(text, &primary, &secondary),
            self.synthesizer.synthesize(ContentKind::Text, &analyses),
        );
        let scores = blend(factors, Some(&verdict), None);

        let summary = self.analyst.summarize(ContentKind::Text, &analyses).await?;

        let result = AnalysisResult::Text(TextAnalysis {
            header: ResultHeader::new(ContentKind::Text, scores, summary),
            text: preview(text, TEXT_PREVIEW_CHARS),
            factual_errors: metadata.factual_errors,
            misleading_claims: metadata.misleading_claims,
            sentiment: metadata.sentiment_or_default(),
            political_bias: metadata.political_bias_or_default(),
            misinformation: MisinformationBlock::from(&verdict),
            primary_analysis: primary,
            secondary_analysis: secondary,
            raw_content: preview(text, RAW_CONTENT_CHARS),
        });

        self.cache.insert(key, result.clone());
        info!("Analysis complete: {}", result.id());
        Ok(result)
    }

    /// Analyze an uploaded image
    pub async fn analyze_image(&self, image: &MediaFile) -> Result<AnalysisResult, AnalysisError> {
        validate_media(ContentKind::Image, image, &self.config)?;

        let key = ContentFingerprint::for_media(ContentKind::Image, image);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        info!("Analyzing image: {}", image.name);
        let vision = self.analyst.describe_image(image).await?;
        let analyses = [(IMAGE_LABEL, vision.as_str())];

        let (details, factors, summary) = tokio::join!(
            self.metadata.image_details(&vision),
            self.synthesizer.synthesize(ContentKind::Image, &analyses),
            self.analyst.summarize(ContentKind::Image, &analyses),
        );
        let summary = summary?;
        let scores = blend(factors, None, None);

        let result = AnalysisResult::Image(ImageAnalysis {
            header: ResultHeader::new(ContentKind::Image, scores, summary),
            filename: image.name.clone(),
            manipulation_detected: details.manipulation_detected,
            deepfake_confidence: details.deepfake_confidence,
            manipulated_regions: details.manipulated_regions,
            original_found: details.original_found,
            original_source: details.original_source,
            vision_analysis: vision,
        });

        self.cache.insert(key, result.clone());
        info!("Analysis complete: {}", result.id());
        Ok(result)
    }

    /// Analyze an uploaded video from its file information
    pub async fn analyze_video(&self, video: &MediaFile) -> Result<AnalysisResult, AnalysisError> {
        validate_media(ContentKind::Video, video, &self.config)?;

        let key = ContentFingerprint::for_media(ContentKind::Video, video);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        info!("Analyzing video: {}", video.name);
        let basic = self.analyst.describe_video(video).await?;
        let analyses = [(VIDEO_LABEL, basic.as_str())];

        let (details, factors, summary) = tokio::join!(
            self.metadata.video_details(video),
            self.synthesizer.synthesize(ContentKind::Video, &analyses),
            self.analyst.summarize(ContentKind::Video, &analyses),
        );
        let summary = summary?;
        let scores = blend(factors, None, None);

        let result = AnalysisResult::Video(VideoAnalysis {
            header: ResultHeader::new(ContentKind::Video, scores, summary),
            filename: video.name.clone(),
            manipulation_detected: details.manipulation_detected,
            deepfake_confidence: details.deepfake_confidence,
            manipulated_elements: details.manipulated_elements,
            inconsistencies: details.inconsistencies,
            basic_analysis: basic,
        });

        self.cache.insert(key, result.clone());
        info!("Analysis complete: {}", result.id());
        Ok(result)
    }
}
