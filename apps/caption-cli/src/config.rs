use crate::models::ConcreteModelType;
use caption_styler::{CaptionLength, FailurePolicy, StyleCategory, DEFAULT_BATCH_SIZE, EXPORT_FILE_NAME};
use clap::{Args, Parser};
use photo_filter::{PhotoFilter, FILTERED_IMAGE_FILE_NAME};
use std::path::PathBuf;

/// Caption a photo and rewrite the caption into styled social media captions.
#[derive(Parser, Debug)]
#[command(name = "caption-cli", version, about)]
pub struct Config {
    /// Photo to caption
    pub image: PathBuf,

    /// Caption style: food, travel, animal, aesthetic, funny, romantic or motivational
    #[arg(long, short)]
    pub style: StyleCategory,

    /// Caption length: Short, Medium or Long
    #[arg(long, short, default_value_t = CaptionLength::Short)]
    pub length: CaptionLength,

    /// Filter applied to the saved copy of the photo
    #[arg(long, short, default_value_t = PhotoFilter::Original)]
    pub filter: PhotoFilter,

    /// Number of caption options to generate
    #[arg(long, short, default_value_t = DEFAULT_BATCH_SIZE)]
    pub count: usize,

    /// What to do when one caption fails to generate: abort or skip
    #[arg(long, default_value_t = FailurePolicy::Abort)]
    pub on_failure: FailurePolicy,

    /// Where the captions are exported to
    #[arg(long, short, default_value = EXPORT_FILE_NAME)]
    pub output: PathBuf,

    /// Where the filtered photo is saved to, always as PNG
    #[arg(long, default_value = FILTERED_IMAGE_FILE_NAME)]
    pub filtered_output: PathBuf,

    /// JSON file replacing the built-in emoji and hashtag tables
    #[arg(long, env = "CAPTION_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Seed for reproducible emoji and hashtag picks
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to DIR/app.log instead of stderr
    #[arg(long, env = "CAPTION_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelConfig,
}

#[derive(Args, Debug, Clone)]
pub struct ModelConfig {
    /// Model provider: OpenAI or AzureOpenAI
    #[arg(long, env = "MODEL_TYPE", default_value_t = ConcreteModelType::OpenAI)]
    pub model_type: ConcreteModelType,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1/")]
    pub base_url: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Chat model, or deployment name on Azure, used to rewrite captions
    #[arg(long, env = "TEXT_MODEL", default_value = "gpt-4o-mini")]
    pub text_model: String,

    /// Vision model, or deployment name on Azure, used to describe the photo
    #[arg(long, env = "VISION_MODEL", default_value = "gpt-4o-mini")]
    pub vision_model: String,

    #[arg(long, env = "AZURE_OPENAI_ENDPOINT")]
    pub azure_endpoint: Option<String>,

    #[arg(long, env = "AZURE_OPENAI_API_VERSION", default_value = "2024-02-01")]
    pub azure_api_version: String,

    /// Token limit of each styled caption
    #[arg(long, default_value_t = 60)]
    pub max_tokens: usize,

    #[arg(long, default_value_t = 0.8)]
    pub temperature: f64,

    /// Seconds without requests before a model handle is released
    #[arg(long, default_value_t = 30)]
    pub offload_secs: u64,
}
