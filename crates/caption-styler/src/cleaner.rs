/// Turns raw generated text into the styled caption text.
///
/// Completion style models return the prompt followed by the continuation,
/// chat models usually return only the answer. Implementations must be
/// idempotent: cleaning already cleaned text changes nothing.
pub trait CaptionCleaner: Send + Sync {
    fn clean(&self, generated: &str, prompt: &str) -> String;
}

/// Removes echoed copies of the prompt and surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptEchoCleaner;

impl CaptionCleaner for PromptEchoCleaner {
    fn clean(&self, generated: &str, prompt: &str) -> String {
        strip_prompt_echo(generated, prompt)
    }
}

pub fn strip_prompt_echo(generated: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        return generated.trim().to_string();
    }

    let mut text = generated.replacen(prompt, "", 1);
    // removing one copy can expose another, keep going until none is left
    while text.contains(prompt) {
        text = text.replacen(prompt, "", 1);
    }

    text.trim().to_string()
}
