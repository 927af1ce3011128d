use crate::catalog::{EmojiHashtagCatalog, MIN_POOL_SIZE};
use crate::error::{CaptionError, CaptionResult, DecorationPool};
use crate::types::DecoratedCaption;
use rand::{seq::SliceRandom, Rng};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CaptionDecorator {
    catalog: Arc<EmojiHashtagCatalog>,
}

/// Pick two distinct entries, uniformly and without replacement.
fn sample_pair<R: Rng + ?Sized>(
    items: &[String],
    style: &str,
    pool: DecorationPool,
    rng: &mut R,
) -> CaptionResult<[String; 2]> {
    let picked = items
        .choose_multiple(rng, MIN_POOL_SIZE)
        .cloned()
        .collect::<Vec<_>>();

    match <[String; 2]>::try_from(picked) {
        Ok(pair) => Ok(pair),
        Err(_) => Err(CaptionError::Decoration {
            style: style.to_string(),
            index: None,
            pool,
            available: items.len(),
        }),
    }
}

impl CaptionDecorator {
    pub fn new(catalog: Arc<EmojiHashtagCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &EmojiHashtagCatalog {
        &self.catalog
    }

    pub fn decorate(&self, text: &str, style: &str) -> CaptionResult<DecoratedCaption> {
        self.decorate_with(text, style, &mut rand::thread_rng())
    }

    /// Same as [`Self::decorate`] with a caller supplied randomness source.
    pub fn decorate_with<R: Rng + ?Sized>(
        &self,
        text: &str,
        style: &str,
        rng: &mut R,
    ) -> CaptionResult<DecoratedCaption> {
        let emojis = sample_pair(
            self.catalog.emojis_for(style),
            style,
            DecorationPool::Emoji,
            rng,
        )?;
        let hashtags = sample_pair(
            self.catalog.hashtags_for(style),
            style,
            DecorationPool::Hashtag,
            rng,
        )?;

        Ok(DecoratedCaption {
            text: text.to_string(),
            emojis,
            hashtags,
        })
    }
}
