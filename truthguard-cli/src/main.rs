//! TruthGuard CLI
//!
//! Scores URLs, text, images and videos for credibility and prints the
//! analysis as JSON.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use truthguard_agents::{
    create_anthropic_backend, create_backend, create_fallback_backend, create_vision_backend, AnthropicConfig,
    OpenAIBackendConfig, PersonaRegistry, SharedBackend, VisionConfig,
};
use truthguard_core::{AnalysisResult, MediaFile, TrustLists};
use truthguard_net::{verify_domain_trust, HttpFetcher, HttpProbe};
use truthguard_runtime::{Analyzer, EngineConfig, Services};

#[derive(Parser)]
#[command(name = "truthguard")]
#[command(author, version, about = "TruthGuard: credibility scoring for web pages, text and media", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,

    /// Domain lists file (TOML) replacing the builtin lists
    #[arg(long, global = true)]
    lists: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ModelArgs {
    /// OpenAI API key (or set OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY")]
    openai_key: Option<String>,

    /// Perplexity API key for the primary fact check (or set PERPLEXITY_API_KEY env var)
    #[arg(long, env = "PERPLEXITY_API_KEY")]
    perplexity_key: Option<String>,

    /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
    #[arg(long, env = "ANTHROPIC_API_KEY")]
    anthropic_key: Option<String>,

    /// OpenAI model for text analyses
    #[arg(short, long, default_value = "gpt-4o")]
    model: String,

    /// Use Anthropic instead of OpenAI for text analyses
    #[arg(long)]
    anthropic: bool,

    /// Anthropic model, with --anthropic
    #[arg(long, default_value = "claude-sonnet-4-20250514")]
    anthropic_model: String,

    /// Directory of persona TOML files overriding the embedded prompts
    #[arg(long)]
    personas: Option<PathBuf>,

    /// Characters of content sent to the analysis prompts
    #[arg(long, default_value = "4000")]
    excerpt_chars: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a web page
    Url {
        url: String,

        #[command(flatten)]
        models: ModelArgs,
    },

    /// Analyze text (argument, --file, or stdin)
    Text {
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        #[command(flatten)]
        models: ModelArgs,
    },

    /// Analyze an image file
    Image {
        path: PathBuf,

        #[command(flatten)]
        models: ModelArgs,
    },

    /// Analyze a video file (from its file information)
    Video {
        path: PathBuf,

        #[command(flatten)]
        models: ModelArgs,
    },

    /// Evaluate a URL's domain trust only, without model calls
    Trust { url: String },

    /// List the loaded prompt personas
    Personas {
        /// Directory of persona TOML files overriding the embedded prompts
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let lists = match &cli.lists {
        Some(path) => TrustLists::from_path(path)
            .with_context(|| format!("loading domain lists from {}", path.display()))?,
        None => TrustLists::builtin().clone(),
    };

    let json = match cli.command {
        Commands::Trust { url } => {
            let config = EngineConfig::default();
            let probe = HttpProbe::new(&config.probe)?;
            let trust = verify_domain_trust(&url, &lists, &probe).await;
            serde_json::to_string_pretty(&trust)?
        }
        Commands::Personas { dir } => {
            let registry = load_personas(dir.as_deref())?;
            let mut ids = registry.list_ids();
            ids.sort_unstable();
            for id in ids {
                if let Some(persona) = registry.get(id) {
                    println!(
                        "{:<24} {:<12} {:>5} tokens  {}",
                        id,
                        persona.persona.category,
                        persona.max_tokens(),
                        persona.persona.name
                    );
                }
            }
            return Ok(());
        }
        Commands::Url { url, models } => {
            let analyzer = build_analyzer(&models, lists)?;
            render(&analyzer.analyze_url(&url).await?)?
        }
        Commands::Text { text, file, models } => {
            let text = read_text(text, file.as_deref())?;
            let analyzer = build_analyzer(&models, lists)?;
            render(&analyzer.analyze_text(&text).await?)?
        }
        Commands::Image { path, models } => {
            let image = read_media(&path)?;
            let analyzer = build_analyzer(&models, lists)?;
            render(&analyzer.analyze_image(&image).await?)?
        }
        Commands::Video { path, models } => {
            let video = read_media(&path)?;
            let analyzer = build_analyzer(&models, lists)?;
            render(&analyzer.analyze_video(&video).await?)?
        }
    };

    match cli.output {
        Some(path) => {
            fs::write(&path, &json).with_context(|| format!("writing {}", path.display()))?;
            println!("Result saved to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn build_analyzer(models: &ModelArgs, lists: TrustLists) -> Result<Analyzer> {
    let openai_key = models
        .openai_key
        .as_deref()
        .ok_or_else(|| anyhow!("OpenAI API key required. Set OPENAI_API_KEY or use --openai-key"))?;

    let text: SharedBackend = if models.anthropic {
        let key = models.anthropic_key.as_deref().ok_or_else(|| {
            anyhow!("Anthropic API key required. Set ANTHROPIC_API_KEY or use --anthropic-key")
        })?;
        create_anthropic_backend(AnthropicConfig::new(key, &models.anthropic_model))?
    } else {
        create_backend(OpenAIBackendConfig::openai(openai_key, &models.model))?
    };

    // Perplexity leads the fact check when configured, with the text backend behind it
    let general = match models.perplexity_key.as_deref() {
        Some(key) => create_fallback_backend(
            create_backend(OpenAIBackendConfig::perplexity(key))?,
            text.clone(),
        ),
        None => text.clone(),
    };
    info!("Fact check model: {} | Text model: {}", general.model_name(), text.model_name());

    let config = EngineConfig::default().with_excerpt_chars(models.excerpt_chars);
    let services = Services {
        general,
        text,
        vision: create_vision_backend(VisionConfig::openai(openai_key))?,
        fetcher: Arc::new(HttpFetcher::new(&config.http)?),
        probe: Arc::new(HttpProbe::new(&config.probe)?),
    };

    let registry = load_personas(models.personas.as_deref())?;
    Ok(Analyzer::with_registry(config, lists, services, registry)?)
}

fn load_personas(dir: Option<&Path>) -> Result<PersonaRegistry> {
    match dir {
        Some(dir) => PersonaRegistry::load_from_dir(dir)
            .with_context(|| format!("loading personas from {}", dir.display())),
        None => Ok(PersonaRegistry::load_embedded()),
    }
}

fn read_text(text: Option<String>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn read_media(path: &Path) -> Result<MediaFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
    let mime_type = MediaFile::mime_from_extension(&name)
        .ok_or_else(|| anyhow!("cannot tell the media type of {}", name))?;
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    Ok(MediaFile::new(name, mime_type, bytes))
}

fn render(result: &AnalysisResult) -> Result<String> {
    info!("{} analysis {}: truth score {}", result.kind(), result.id(), result.truth_score());
    Ok(serde_json::to_string_pretty(result)?)
}
