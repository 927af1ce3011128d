pub mod openai;

use serde::Serialize;

#[derive(Debug, Clone)]
pub enum LLMUserMessage {
    Text(String),
    ImageUrl(String),
}

#[derive(Debug, Clone)]
pub enum LLMMessage {
    System(String),
    User(Vec<LLMUserMessage>),
    Assistant(String),
}

impl LLMMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::User(vec![LLMUserMessage::Text(text.into())])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LLMInferenceParams {
    pub temperature: f64,
    pub seed: Option<u64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<usize>,
}

impl Default for LLMInferenceParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            seed: None,
            top_p: Some(0.9),
            max_tokens: Some(512),
        }
    }
}

pub trait LLMChat {
    fn get_completion(
        &self,
        history: &[LLMMessage],
        params: LLMInferenceParams,
    ) -> impl std::future::Future<Output = anyhow::Result<String>> + Send;
}
