use super::{LLMChat, LLMInferenceParams, LLMMessage, LLMUserMessage};
use crate::{LLMInput, Model};
use anyhow::bail;
use reqwest::{
    self,
    header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE},
    Url,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

pub struct OpenAI {
    base_url: String,
    model: String,
    headers: HeaderMap,
    client: reqwest::Client,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIResponseMessage {
    role: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIResponseChoice {
    index: Option<usize>,
    message: Option<OpenAIResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<OpenAIResponseChoice>,
}

fn message_to_json(message: &LLMMessage) -> Value {
    let (role, content) = match message {
        LLMMessage::System(v) => ("system", json!(v)),
        LLMMessage::User(v) => (
            "user",
            match v.as_slice() {
                // plain text is sent as a string so that text-only servers accept it
                [LLMUserMessage::Text(text)] => json!(text),
                _ => Value::Array(
                    v.iter()
                        .map(|t| match t {
                            LLMUserMessage::ImageUrl(image_url) => {
                                json!({"type": "image_url", "image_url": {"url": image_url}})
                            }
                            LLMUserMessage::Text(text) => {
                                json!({"type": "text", "text": text})
                            }
                        })
                        .collect(),
                ),
            },
        ),
        LLMMessage::Assistant(v) => ("assistant", json!(v)),
    };

    json!({
        "role": role,
        "content": content,
    })
}

fn first_choice_content(response: OpenAIResponse) -> anyhow::Result<String> {
    let choice = match response.choices.into_iter().next() {
        Some(choice) => choice,
        None => bail!("no choices in completion response"),
    };

    if let Some(finish_reason) = &choice.finish_reason {
        tracing::debug!("LLM finish reason: {:?}", finish_reason);
    }

    match choice.message.and_then(|v| v.content) {
        Some(content) => Ok(content),
        None => bail!("completion response has no message content"),
    }
}

impl LLMChat for OpenAI {
    async fn get_completion(
        &self,
        history: &[LLMMessage],
        params: LLMInferenceParams,
    ) -> anyhow::Result<String> {
        let url = self.completion_url()?;
        tracing::debug!("openai url: {:?}", url);

        let body = json!({
            "model": &self.model,
            "messages": history.iter().map(message_to_json).collect::<Vec<Value>>(),
            "stream": false,
            "temperature": params.temperature,
            "seed": params.seed,
            "top_p": params.top_p,
            "max_tokens": params.max_tokens,
        });

        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("completion request failed with status {}: {}", status, text);
        }

        let response: OpenAIResponse = response.json().await?;
        first_choice_content(response)
    }
}

impl Model for OpenAI {
    type Item = LLMInput;
    type Output = String;

    async fn process(
        &mut self,
        items: Vec<Self::Item>,
    ) -> anyhow::Result<Vec<anyhow::Result<Self::Output>>> {
        let mut results = vec![];

        for (history, params) in items {
            results.push(self.get_completion(&history, params).await);
        }

        Ok(results)
    }

    fn batch_size_limit(&self) -> usize {
        1
    }
}

impl OpenAI {
    /// Create a new OpenAI compatible chat completion client.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> anyhow::Result<Self> {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {}", api_key).parse()?);
        headers.insert(CONTENT_TYPE, "application/json".parse()?);

        Ok(Self {
            base_url,
            model: model.to_string(),
            headers,
            client: reqwest::Client::new(),
        })
    }

    pub fn new_azure(
        azure_endpoint: &str,
        api_key: &str,
        deployment_name: &str,
        api_version: &str,
    ) -> anyhow::Result<Self> {
        let base_url = Url::from_str(azure_endpoint)?;
        let mut base_url = base_url.join(&format!("openai/deployments/{}/", deployment_name))?;
        base_url.set_query(Some(&format!("api-version={}", api_version)));

        let mut headers = HeaderMap::new();
        headers.insert("api-key", api_key.parse()?);
        headers.insert(CONTENT_TYPE, "application/json".parse()?);

        Ok(Self {
            base_url: base_url.to_string(),
            model: deployment_name.to_string(),
            headers,
            client: reqwest::Client::new(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completion_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.base_url)?;
        let query = url.query();
        let mut completion_url = url.join("chat/completions")?;
        completion_url.set_query(query);
        Ok(completion_url)
    }
}
