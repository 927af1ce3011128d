use crate::config::ModelConfig;
use ai::{
    llm::{openai::OpenAI, LLMInferenceParams},
    vision_caption::OpenAIVisionCaption,
    AIModel, ImageCaptionModel, LLMModel,
};
use anyhow::bail;
use std::{fmt, time::Duration};
use strum_macros::{AsRefStr, Display, EnumString};

const VISION_MAX_TOKENS: usize = 100;

#[derive(AsRefStr, Display, EnumString, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum ConcreteModelType {
    OpenAI,
    AzureOpenAI,
}

/// Everything needed to build a chat client for one model.
#[derive(Debug, Clone)]
struct ModelEndpoint {
    model_type: ConcreteModelType,
    base_url: String,
    api_key: String,
    azure_endpoint: Option<String>,
    azure_api_version: String,
    model: String,
}

impl ModelEndpoint {
    fn new(config: &ModelConfig, model: &str) -> Self {
        Self {
            model_type: config.model_type,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            azure_endpoint: config.azure_endpoint.clone(),
            azure_api_version: config.azure_api_version.clone(),
            model: model.to_string(),
        }
    }

    fn model_id(&self) -> String {
        format!("{}:{}", self.model_type, self.model)
    }

    fn client(&self) -> anyhow::Result<OpenAI> {
        match self.model_type {
            ConcreteModelType::OpenAI => OpenAI::new(&self.base_url, &self.api_key, &self.model),
            ConcreteModelType::AzureOpenAI => {
                let Some(azure_endpoint) = self.azure_endpoint.as_deref() else {
                    bail!("azure endpoint is required for model {}", self.model);
                };
                OpenAI::new_azure(
                    azure_endpoint,
                    &self.api_key,
                    &self.model,
                    &self.azure_api_version,
                )
            }
        }
    }
}

/// Model handles shared by the whole run.
#[derive(Clone)]
pub struct AIHandler {
    pub image_caption: ImageCaptionModel,
    pub llm: LLMModel,
}

impl fmt::Debug for AIHandler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AIHandler")
            .field("image_caption", &self.image_caption.model_id())
            .field("llm", &self.llm.model_id())
            .finish()
    }
}

impl AIHandler {
    pub fn new(config: &ModelConfig) -> anyhow::Result<Self> {
        let offload_duration = Duration::from_secs(config.offload_secs);

        Ok(Self {
            image_caption: Self::get_image_caption(config, offload_duration)?,
            llm: Self::get_llm(config, offload_duration)?,
        })
    }

    /// Inference parameters for the caption rewrite.
    pub fn text_params(config: &ModelConfig, seed: Option<u64>) -> LLMInferenceParams {
        LLMInferenceParams {
            temperature: config.temperature,
            seed,
            max_tokens: Some(config.max_tokens),
            ..Default::default()
        }
    }

    fn get_image_caption(
        config: &ModelConfig,
        offload_duration: Duration,
    ) -> anyhow::Result<ImageCaptionModel> {
        let endpoint = ModelEndpoint::new(config, &config.vision_model);

        AIModel::new(
            endpoint.model_id(),
            move || {
                let endpoint = endpoint.clone();
                async move {
                    let params = LLMInferenceParams {
                        temperature: 0.0,
                        max_tokens: Some(VISION_MAX_TOKENS),
                        ..Default::default()
                    };
                    Ok(OpenAIVisionCaption::new(endpoint.client()?, params))
                }
            },
            Some(offload_duration),
        )
    }

    fn get_llm(config: &ModelConfig, offload_duration: Duration) -> anyhow::Result<LLMModel> {
        let endpoint = ModelEndpoint::new(config, &config.text_model);

        AIModel::new(
            endpoint.model_id(),
            move || {
                let endpoint = endpoint.clone();
                async move { endpoint.client() }
            },
            Some(offload_duration),
        )
    }
}

#[cfg(test)]
mod test {
    use super::{ConcreteModelType, ModelEndpoint};
    use std::str::FromStr;

    fn endpoint(model_type: ConcreteModelType, azure_endpoint: Option<&str>) -> ModelEndpoint {
        ModelEndpoint {
            model_type,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "sk-test".to_string(),
            azure_endpoint: azure_endpoint.map(|v| v.to_string()),
            azure_api_version: "2024-02-01".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    #[test]
    fn test_model_type_names() {
        assert_eq!(
            ConcreteModelType::from_str("azureopenai").ok(),
            Some(ConcreteModelType::AzureOpenAI)
        );
        assert_eq!(ConcreteModelType::OpenAI.as_ref(), "OpenAI");
    }

    #[test]
    fn test_client() {
        let client = endpoint(ConcreteModelType::OpenAI, None)
            .client()
            .expect("openai client");
        assert_eq!(client.model(), "gpt-4o-mini");

        let endpoint_without_azure = endpoint(ConcreteModelType::AzureOpenAI, None);
        assert_eq!(endpoint_without_azure.model_id(), "AzureOpenAI:gpt-4o-mini");
        assert!(endpoint_without_azure.client().is_err());

        let client = endpoint(
            ConcreteModelType::AzureOpenAI,
            Some("https://example.openai.azure.com/"),
        )
        .client()
        .expect("azure client");
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
