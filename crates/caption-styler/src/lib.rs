//! Turns a raw image caption into a batch of styled, decorated social media
//! captions.
//!
//! The pipeline per batch slot is: build the rewrite prompt, ask the text
//! model, strip the echoed prompt, then decorate with two emojis and two
//! hashtags sampled from the [`EmojiHashtagCatalog`].

mod adapter;
mod batch;
mod catalog;
mod cleaner;
mod decorator;
mod error;
mod prompt;
mod types;

#[cfg(test)]
mod test;

pub use adapter::{caption_image, LLMTextGenerator, TextGenerator, VisionCaptioner};
pub use batch::{
    export_text, BatchSlot, CaptionBatch, CaptionBatchGenerator, FailurePolicy,
    DEFAULT_BATCH_SIZE, EXPORT_FILE_NAME, EXPORT_MIME_TYPE, EXPORT_SEPARATOR,
};
pub use catalog::{EmojiHashtagCatalog, StylePools, MIN_POOL_SIZE};
pub use cleaner::{strip_prompt_echo, CaptionCleaner, PromptEchoCleaner};
pub use decorator::CaptionDecorator;
pub use error::{CaptionError, CaptionResult, DecorationPool};
pub use prompt::build_prompt;
pub use types::{CaptionLength, DecoratedCaption, RawCaption, StyleCategory};
