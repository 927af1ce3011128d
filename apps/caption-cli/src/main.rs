mod config;
mod export;
mod models;

use crate::{config::Config, models::AIHandler};
use anyhow::Context;
use caption_styler::{
    caption_image, CaptionBatchGenerator, CaptionDecorator, EmojiHashtagCatalog,
    LLMTextGenerator,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // should be before parsing so env backed options can come from .env
    let _ = dotenvy::dotenv();
    let config = Config::parse();

    match &config.log_dir {
        Some(log_dir) => analytics_tracing::init_tracing_to_file(log_dir.clone()),
        None => analytics_tracing::init_tracing_to_stderr(),
    }

    tracing::debug!("config: {:?}", config);

    let catalog = match &config.catalog {
        Some(path) => EmojiHashtagCatalog::from_json_file(path)?,
        None => EmojiHashtagCatalog::builtin(),
    };

    let image = photo_filter::open_image(&config.image)?;
    let filtered = photo_filter::apply(&image, config.filter);
    photo_filter::save_png(&filtered, &config.filtered_output)?;

    let ai_handler = AIHandler::new(&config.model)?;
    tracing::debug!("models: {:?}", ai_handler);

    // the caption always describes the unfiltered photo
    let raw_caption = caption_image(&ai_handler.image_caption, &config.image).await?;

    let text_generator = LLMTextGenerator::new(
        ai_handler.llm.clone(),
        AIHandler::text_params(&config.model, config.seed),
    );
    let mut generator = CaptionBatchGenerator::new(
        Arc::new(text_generator),
        CaptionDecorator::new(Arc::new(catalog)),
    )
    .with_policy(config.on_failure);
    if let Some(seed) = config.seed {
        generator = generator.with_seed(seed);
    }

    let batch = generator
        .generate_batch(&raw_caption, config.style, config.length, config.count)
        .await?;

    export::print_batch(&batch, std::io::stdout().lock())?;
    export::write_export(&batch, &config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    Ok(())
}
