use crate::error::{CaptionError, CaptionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Food,
    Travel,
    Animal,
    Aesthetic,
    Funny,
    Romantic,
    Motivational,
}

/// Only ever rendered into the prompt text.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CaptionLength {
    #[default]
    Short,
    Medium,
    Long,
}

/// Literal description of an image as produced by a vision model.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCaption(String);

impl RawCaption {
    pub fn new(text: impl AsRef<str>) -> CaptionResult<Self> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(CaptionError::Captioning {
                reason: "caption is empty".to_string(),
            });
        }
        Ok(Self(text.to_string()))
    }

    /// Upper-case the first character and lower-case the rest, the way
    /// vision model output is presented to the user.
    pub fn from_model_output(text: impl AsRef<str>) -> CaptionResult<Self> {
        let text = text.as_ref().trim();
        let mut chars = text.chars();
        let normalized = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(|c| c.to_lowercase()))
                .collect::<String>(),
            None => String::new(),
        };
        Self::new(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawCaption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Styled caption text with its sampled decorations.
///
/// Rendered as two lines: the text followed by the emojis, then the hashtags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoratedCaption {
    pub text: String,
    pub emojis: [String; 2],
    pub hashtags: [String; 2],
}

impl fmt::Display for DecoratedCaption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}\n{} {}",
            self.text, self.emojis[0], self.emojis[1], self.hashtags[0], self.hashtags[1]
        )
    }
}
