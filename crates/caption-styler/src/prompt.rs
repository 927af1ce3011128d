use crate::types::{CaptionLength, RawCaption, StyleCategory};

/// Instruction asking the text model to restyle a raw caption.
pub fn build_prompt(raw_caption: &RawCaption, style: StyleCategory, length: CaptionLength) -> String {
    format!(
        "Rewrite this as a {} Instagram caption ({} length): {}",
        style, length, raw_caption
    )
}
