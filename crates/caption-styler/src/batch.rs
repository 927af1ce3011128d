use crate::adapter::TextGenerator;
use crate::cleaner::{CaptionCleaner, PromptEchoCleaner};
use crate::decorator::CaptionDecorator;
use crate::error::{CaptionError, CaptionResult};
use crate::prompt::build_prompt;
use crate::types::{CaptionLength, DecoratedCaption, RawCaption, StyleCategory};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumString};

pub const DEFAULT_BATCH_SIZE: usize = 3;

pub const EXPORT_SEPARATOR: &str = "\n\n";
pub const EXPORT_FILE_NAME: &str = "captions.txt";
pub const EXPORT_MIME_TYPE: &str = "text/plain";

/// What to do when the text model fails for one slot of a batch.
///
/// Decoration errors are configuration errors and always abort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug)]
pub enum BatchSlot {
    Caption(DecoratedCaption),
    Failed(CaptionError),
}

impl BatchSlot {
    pub fn caption(&self) -> Option<&DecoratedCaption> {
        match self {
            Self::Caption(v) => Some(v),
            Self::Failed(_) => None,
        }
    }
}

/// Ordered result of one generate request.
#[derive(Debug, Default)]
pub struct CaptionBatch {
    slots: Vec<BatchSlot>,
}

impl CaptionBatch {
    pub fn slots(&self) -> &[BatchSlot] {
        &self.slots
    }

    pub fn captions(&self) -> impl Iterator<Item = &DecoratedCaption> {
        self.slots.iter().filter_map(BatchSlot::caption)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaptionError> {
        self.slots.iter().filter_map(|v| match v {
            BatchSlot::Failed(e) => Some(e),
            BatchSlot::Caption(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn export_text(&self) -> String {
        export_text(self)
    }
}

/// Join the captions of a batch, in order, separated by a blank line.
/// Failed slots are left out, identical captions are kept.
pub fn export_text(batch: &CaptionBatch) -> String {
    batch
        .captions()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(EXPORT_SEPARATOR)
}

pub struct CaptionBatchGenerator {
    generator: Arc<dyn TextGenerator>,
    decorator: CaptionDecorator,
    cleaner: Arc<dyn CaptionCleaner>,
    policy: FailurePolicy,
    rng: StdRng,
}

impl CaptionBatchGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, decorator: CaptionDecorator) -> Self {
        Self {
            generator,
            decorator,
            cleaner: Arc::new(PromptEchoCleaner),
            policy: FailurePolicy::default(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_cleaner(mut self, cleaner: Arc<dyn CaptionCleaner>) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Make decoration reproducible. Text generation stays non-deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Generate `count` decorated captions one after another.
    ///
    /// With [`FailurePolicy::Skip`] a failed generation is recorded in its
    /// slot and the next iteration runs; with [`FailurePolicy::Abort`] the
    /// first failure is returned.
    #[tracing::instrument(skip(self, raw_caption), fields(policy = %self.policy), err(Debug))]
    pub async fn generate_batch(
        &mut self,
        raw_caption: &RawCaption,
        style: StyleCategory,
        length: CaptionLength,
        count: usize,
    ) -> CaptionResult<CaptionBatch> {
        // fail before spending any inference on a style that cannot be decorated
        self.decorator.catalog().ensure_decoratable(style.as_ref())?;

        let prompt = build_prompt(raw_caption, style, length);
        tracing::debug!("prompt: {}", prompt);

        let mut batch = CaptionBatch::default();

        for index in 0..count {
            match self.generate_one(index, &prompt, style).await {
                Ok(caption) => {
                    tracing::info!(index, "caption generated");
                    batch.slots.push(BatchSlot::Caption(caption));
                }
                Err(e) if e.is_generation() && self.policy == FailurePolicy::Skip => {
                    tracing::warn!(index, "skip failed caption: {}", e);
                    batch.slots.push(BatchSlot::Failed(e));
                }
                Err(e) => {
                    tracing::error!(index, "caption batch aborted: {}", e);
                    return Err(e);
                }
            }
        }

        Ok(batch)
    }

    async fn generate_one(
        &mut self,
        index: usize,
        prompt: &str,
        style: StyleCategory,
    ) -> CaptionResult<DecoratedCaption> {
        let generated =
            self.generator
                .generate(prompt)
                .await
                .map_err(|source| CaptionError::Generation {
                    style: style.to_string(),
                    index,
                    source,
                })?;

        let cleaned = self.cleaner.clean(&generated, prompt);
        if cleaned.is_empty() {
            return Err(CaptionError::Generation {
                style: style.to_string(),
                index,
                source: anyhow::anyhow!("generated text is empty after cleaning"),
            });
        }

        self.decorator
            .decorate_with(&cleaned, style.as_ref(), &mut self.rng)
            .map_err(|e| e.at_index(index))
    }
}
