use crate::llm::{openai::OpenAI, LLMChat, LLMInferenceParams, LLMMessage, LLMUserMessage};
use crate::traits::{ImageCaptionInput, ImageCaptionOutput};
use crate::Model;
use anyhow::bail;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CAPTION_PROMPT: &str =
    "Describe the contents of this photo in one short plain sentence. Do not add any commentary.";

/// Image captioning through an OpenAI compatible vision chat endpoint.
pub struct OpenAIVisionCaption {
    client: OpenAI,
    params: LLMInferenceParams,
}

fn mime_from_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

pub(crate) fn image_data_url(path: &Path, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_from_path(path), STANDARD.encode(data))
}

impl OpenAIVisionCaption {
    pub fn new(client: OpenAI, params: LLMInferenceParams) -> Self {
        Self { client, params }
    }

    async fn get_caption(&self, input: ImageCaptionInput) -> anyhow::Result<String> {
        debug!(
            "generating caption for image: {}",
            input.image_file_path.display()
        );

        let data = tokio::fs::read(&input.image_file_path).await?;
        if data.is_empty() {
            bail!("image file {} is empty", input.image_file_path.display());
        }

        let prompt = input
            .prompt
            .unwrap_or_else(|| DEFAULT_CAPTION_PROMPT.to_string());

        let history = vec![LLMMessage::User(vec![
            LLMUserMessage::ImageUrl(image_data_url(&input.image_file_path, &data)),
            LLMUserMessage::Text(prompt),
        ])];

        self.client
            .get_completion(&history, self.params.clone())
            .await
    }
}

impl Model for OpenAIVisionCaption {
    type Item = ImageCaptionInput;
    type Output = ImageCaptionOutput;

    fn batch_size_limit(&self) -> usize {
        1
    }

    async fn process(
        &mut self,
        items: Vec<Self::Item>,
    ) -> anyhow::Result<Vec<anyhow::Result<Self::Output>>> {
        let mut results = vec![];

        for item in items {
            let res = self.get_caption(item).await;
            results.push(res);
        }

        Ok(results)
    }
}
