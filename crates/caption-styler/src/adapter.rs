use crate::error::{CaptionError, CaptionResult};
use crate::types::RawCaption;
use ai::{
    llm::{LLMInferenceParams, LLMMessage},
    ImageCaptionInput, ImageCaptionModel, LLMModel,
};
use async_trait::async_trait;
use std::path::Path;

/// One text continuation per call. Output is not repeatable across calls.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[async_trait]
pub trait VisionCaptioner: Send + Sync {
    async fn caption(&self, image_path: &Path) -> anyhow::Result<String>;
}

/// Sends each prompt as a single user message to a chat model.
pub struct LLMTextGenerator {
    llm: LLMModel,
    params: LLMInferenceParams,
}

impl LLMTextGenerator {
    pub fn new(llm: LLMModel, params: LLMInferenceParams) -> Self {
        Self { llm, params }
    }
}

#[async_trait]
impl TextGenerator for LLMTextGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.llm
            .process_single((vec![LLMMessage::user_text(prompt)], self.params.clone()))
            .await
    }
}

#[async_trait]
impl VisionCaptioner for ImageCaptionModel {
    async fn caption(&self, image_path: &Path) -> anyhow::Result<String> {
        self.process_single(ImageCaptionInput {
            image_file_path: image_path.to_path_buf(),
            prompt: None,
        })
        .await
    }
}

/// Caption an image and normalise the result into a [`RawCaption`].
#[tracing::instrument(skip(captioner), err(Debug))]
pub async fn caption_image(
    captioner: &dyn VisionCaptioner,
    image_path: &Path,
) -> CaptionResult<RawCaption> {
    let output = captioner
        .caption(image_path)
        .await
        .map_err(|e| CaptionError::Captioning {
            reason: format!("{}: {:#}", image_path.display(), e),
        })?;

    let raw_caption = RawCaption::from_model_output(&output).map_err(|_| {
        CaptionError::Captioning {
            reason: format!("{}: vision model returned an empty caption", image_path.display()),
        }
    })?;

    tracing::info!("raw caption: {}", raw_caption);

    Ok(raw_caption)
}
