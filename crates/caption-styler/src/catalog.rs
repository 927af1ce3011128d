use crate::error::{CaptionError, CaptionResult, DecorationPool};
use crate::types::StyleCategory;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use strum::IntoEnumIterator;

/// Minimum pool size, captions always carry two emojis and two hashtags.
pub const MIN_POOL_SIZE: usize = 2;

const BUILTIN: &[(StyleCategory, &[&str], &[&str])] = &[
    (
        StyleCategory::Food,
        &["🍕", "🍔", "🍩", "🍫"],
        &["#Foodie", "#Yum", "#InstaFood"],
    ),
    (
        StyleCategory::Travel,
        &["🌍", "✈️", "🌅", "🏞️"],
        &["#Wanderlust", "#TravelGram", "#Adventure"],
    ),
    (
        StyleCategory::Animal,
        &["🐾", "🐶", "🐱", "🦁"],
        &["#DogLife", "#CatVibes", "#Petstagram"],
    ),
    (
        StyleCategory::Aesthetic,
        &["✨", "🌸", "💫", "🌈"],
        &["#Dreamy", "#InstaAesthetic", "#GoodVibesOnly"],
    ),
    (
        StyleCategory::Funny,
        &["😂", "🤣", "😜"],
        &["#LOL", "#GoodTimes", "#MemeVibes"],
    ),
    (
        StyleCategory::Romantic,
        &["💕", "🌹", "😍"],
        &["#LoveVibes", "#Soulmate", "#CoupleGoals"],
    ),
    (
        StyleCategory::Motivational,
        &["🔥", "💯", "🚀"],
        &["#KeepPushing", "#StayStrong", "#Mindset"],
    ),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePools {
    pub emojis: Vec<String>,
    pub hashtags: Vec<String>,
}

/// Emoji and hashtag candidates per style name.
///
/// Lookups are by name so that a style missing from the catalog yields an
/// empty pool instead of an error; the decorator decides what that means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiHashtagCatalog {
    styles: HashMap<String, StylePools>,
}

fn dedup_in_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(Into::into)
        .filter(|v: &String| seen.insert(v.clone()))
        .collect()
}

impl Default for EmojiHashtagCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EmojiHashtagCatalog {
    pub fn empty() -> Self {
        Self {
            styles: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for (style, emojis, hashtags) in BUILTIN {
            catalog.register(
                style.to_string(),
                emojis.iter().copied(),
                hashtags.iter().copied(),
            );
        }
        catalog
    }

    /// Load a catalog from a JSON object of the form
    /// `{"food": {"emojis": [...], "hashtags": [...]}, ...}`.
    ///
    /// The result must still cover every [`StyleCategory`].
    pub fn from_json_file(path: impl AsRef<Path>) -> CaptionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CaptionError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: Self =
            serde_json::from_str(&content).map_err(|source| CaptionError::CatalogParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut catalog = Self::empty();
        for (style, pools) in parsed.styles {
            catalog.register(style, pools.emojis, pools.hashtags);
        }
        catalog.validate()?;

        tracing::debug!("catalog loaded from {}", path.display());

        Ok(catalog)
    }

    /// Register or replace the pools of a style. Duplicate entries are dropped.
    pub fn register<E, H>(
        &mut self,
        style: impl Into<String>,
        emojis: impl IntoIterator<Item = E>,
        hashtags: impl IntoIterator<Item = H>,
    ) where
        E: Into<String>,
        H: Into<String>,
    {
        self.styles.insert(
            style.into(),
            StylePools {
                emojis: dedup_in_order(emojis),
                hashtags: dedup_in_order(hashtags),
            },
        );
    }

    pub fn emojis_for(&self, style: &str) -> &[String] {
        self.styles
            .get(style)
            .map(|v| v.emojis.as_slice())
            .unwrap_or(&[])
    }

    pub fn hashtags_for(&self, style: &str) -> &[String] {
        self.styles
            .get(style)
            .map(|v| v.hashtags.as_slice())
            .unwrap_or(&[])
    }

    /// Check that a style has enough entries in both pools to be decorated.
    pub fn ensure_decoratable(&self, style: &str) -> CaptionResult<()> {
        for (pool, available) in [
            (DecorationPool::Emoji, self.emojis_for(style).len()),
            (DecorationPool::Hashtag, self.hashtags_for(style).len()),
        ] {
            if available < MIN_POOL_SIZE {
                return Err(CaptionError::Decoration {
                    style: style.to_string(),
                    index: None,
                    pool,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Every [`StyleCategory`] must be decoratable.
    pub fn validate(&self) -> CaptionResult<()> {
        StyleCategory::iter().try_for_each(|style| self.ensure_decoratable(style.as_ref()))
    }
}
