use crate::{
    build_prompt, export_text, BatchSlot, CaptionBatchGenerator, CaptionDecorator, CaptionError,
    CaptionLength, EmojiHashtagCatalog, FailurePolicy, LLMTextGenerator, RawCaption,
    StyleCategory, TextGenerator, DEFAULT_BATCH_SIZE, EXPORT_SEPARATOR,
};
use ai::{
    llm::{LLMInferenceParams, LLMMessage, LLMUserMessage},
    AIModel, LLMInput, Model,
};
use async_trait::async_trait;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

const ANIMAL_EMOJIS: [&str; 4] = ["🐾", "🐶", "🐱", "🦁"];
const ANIMAL_HASHTAGS: [&str; 3] = ["#DogLife", "#CatVibes", "#Petstagram"];

/// Replays scripted responses and records every prompt it receives.
struct ScriptedGenerator {
    responses: Mutex<VecDeque<anyhow::Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(responses: Vec<anyhow::Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(vec![]),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response left")))
    }
}

/// Behaves like a completion model: returns the prompt followed by the continuation.
struct EchoGenerator(&'static str);

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        Ok(format!("{} {}", prompt, self.0))
    }
}

fn batch_generator(generator: Arc<dyn TextGenerator>) -> CaptionBatchGenerator {
    CaptionBatchGenerator::new(
        generator,
        CaptionDecorator::new(Arc::new(EmojiHashtagCatalog::builtin())),
    )
}

fn dog_caption() -> RawCaption {
    RawCaption::new("A dog running on a beach").expect("valid caption")
}

fn texts(items: &[&str]) -> Vec<anyhow::Result<String>> {
    items.iter().map(|v| Ok(v.to_string())).collect()
}

#[test_log::test(tokio::test)]
async fn test_dog_on_beach_scenario() {
    let mut generator =
        batch_generator(Arc::new(EchoGenerator("Best day ever with my furry friend!")));

    let batch = generator
        .generate_batch(
            &dog_caption(),
            StyleCategory::Animal,
            CaptionLength::Short,
            DEFAULT_BATCH_SIZE,
        )
        .await
        .expect("batch");

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.captions().count(), 3);

    for caption in batch.captions() {
        assert_eq!(caption.text, "Best day ever with my furry friend!");
        assert!(caption
            .emojis
            .iter()
            .all(|v| ANIMAL_EMOJIS.contains(&v.as_str())));
        assert!(caption
            .hashtags
            .iter()
            .all(|v| ANIMAL_HASHTAGS.contains(&v.as_str())));
        assert_ne!(caption.emojis[0], caption.emojis[1]);
        assert_ne!(caption.hashtags[0], caption.hashtags[1]);

        let rendered = caption.to_string();
        let (first_line, second_line) = rendered.split_once('\n').expect("two lines");
        assert!(first_line.starts_with("Best day ever with my furry friend! "));
        assert_eq!(second_line.split(' ').count(), 2);
    }
}

#[test_log::test(tokio::test)]
async fn test_prompt_per_iteration() {
    let scripted = ScriptedGenerator::new(texts(&["one", "two", "three"]));
    let mut generator = batch_generator(scripted.clone());

    generator
        .generate_batch(
            &dog_caption(),
            StyleCategory::Travel,
            CaptionLength::Long,
            3,
        )
        .await
        .expect("batch");

    let expected = build_prompt(&dog_caption(), StyleCategory::Travel, CaptionLength::Long);
    assert_eq!(scripted.prompts(), vec![expected; 3]);
}

#[test_log::test(tokio::test)]
async fn test_order_and_export() {
    let scripted = ScriptedGenerator::new(texts(&["first", "second", "third"]));
    let mut generator = batch_generator(scripted).with_seed(1);

    let batch = generator
        .generate_batch(&dog_caption(), StyleCategory::Food, CaptionLength::Medium, 3)
        .await
        .expect("batch");

    let captions = batch.captions().map(|v| v.text.clone()).collect::<Vec<_>>();
    assert_eq!(captions, ["first", "second", "third"]);

    let rendered = batch.captions().map(|v| v.to_string()).collect::<Vec<_>>();
    let exported = export_text(&batch);
    assert_eq!(exported, batch.export_text());
    assert_eq!(
        exported.split(EXPORT_SEPARATOR).collect::<Vec<_>>(),
        rendered
    );
}

#[test_log::test(tokio::test)]
async fn test_export_keeps_duplicates() {
    let scripted = ScriptedGenerator::new(texts(&["same", "same", "same"]));
    // two-entry pools leave only the order of each pair to chance
    let mut catalog = EmojiHashtagCatalog::builtin();
    catalog.register("funny", ["😂", "🤣"], ["#LOL", "#MemeVibes"]);
    let mut generator = CaptionBatchGenerator::new(
        scripted,
        CaptionDecorator::new(Arc::new(catalog)),
    );

    let batch = generator
        .generate_batch(&dog_caption(), StyleCategory::Funny, CaptionLength::Short, 3)
        .await
        .expect("batch");

    let exported = batch.export_text();
    let parts = exported.split(EXPORT_SEPARATOR).collect::<Vec<_>>();
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().all(|v| v.starts_with("same ")));
}

#[test_log::test(tokio::test)]
async fn test_abort_on_generation_failure() {
    let scripted = ScriptedGenerator::new(vec![
        Ok("fine".to_string()),
        Err(anyhow::anyhow!("model timed out")),
        Ok("never requested".to_string()),
    ]);
    let mut generator = batch_generator(scripted.clone()).with_policy(FailurePolicy::Abort);

    let err = generator
        .generate_batch(&dog_caption(), StyleCategory::Animal, CaptionLength::Short, 3)
        .await
        .expect_err("second slot fails");

    match err {
        CaptionError::Generation { style, index, source } => {
            assert_eq!(style, "animal");
            assert_eq!(index, 1);
            assert!(source.to_string().contains("model timed out"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(scripted.prompts().len(), 2);
}

#[test_log::test(tokio::test)]
async fn test_skip_records_failed_slot() {
    let scripted = ScriptedGenerator::new(vec![
        Ok("fine".to_string()),
        Err(anyhow::anyhow!("model timed out")),
        Ok("also fine".to_string()),
    ]);
    let mut generator = batch_generator(scripted).with_policy(FailurePolicy::Skip);

    let batch = generator
        .generate_batch(&dog_caption(), StyleCategory::Animal, CaptionLength::Short, 3)
        .await
        .expect("skip keeps going");

    assert_eq!(batch.len(), 3);
    assert!(matches!(batch.slots()[0], BatchSlot::Caption(_)));
    assert!(matches!(
        batch.slots()[1],
        BatchSlot::Failed(CaptionError::Generation { index: 1, .. })
    ));
    assert!(matches!(batch.slots()[2], BatchSlot::Caption(_)));
    assert_eq!(batch.failures().count(), 1);

    let exported = batch.export_text();
    let parts = exported.split(EXPORT_SEPARATOR).collect::<Vec<_>>();
    assert_eq!(parts.len(), 2);
    assert!(parts[0].starts_with("fine "));
    assert!(parts[1].starts_with("also fine "));
}

#[test_log::test(tokio::test)]
async fn test_empty_after_clean_is_generation_error() {
    let prompt = build_prompt(&dog_caption(), StyleCategory::Animal, CaptionLength::Short);
    let scripted = ScriptedGenerator::new(vec![Ok(format!("  {}  ", prompt))]);
    let mut generator = batch_generator(scripted);

    let err = generator
        .generate_batch(&dog_caption(), StyleCategory::Animal, CaptionLength::Short, 1)
        .await
        .expect_err("nothing left after cleaning");

    assert!(err.is_generation());
    assert!(format!("{}", err).contains("empty after cleaning"));
}

#[test_log::test(tokio::test)]
async fn test_undecoratable_style_fails_before_generation() {
    let scripted = ScriptedGenerator::new(texts(&["unused"]));
    let mut catalog = EmojiHashtagCatalog::builtin();
    catalog.register("travel", ["🌍"], ["#Wanderlust", "#Adventure"]);
    let mut generator =
        CaptionBatchGenerator::new(scripted.clone(), CaptionDecorator::new(Arc::new(catalog)))
            .with_policy(FailurePolicy::Skip);

    let err = generator
        .generate_batch(&dog_caption(), StyleCategory::Travel, CaptionLength::Short, 3)
        .await
        .expect_err("travel pool too small");

    assert!(err.is_decoration());
    assert!(scripted.prompts().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_seeded_decoration_is_reproducible() {
    let mut decorations = vec![];
    for _ in 0..2 {
        let scripted = ScriptedGenerator::new(texts(&["a", "b", "c"]));
        let mut generator = batch_generator(scripted).with_seed(2024);
        let batch = generator
            .generate_batch(
                &dog_caption(),
                StyleCategory::Aesthetic,
                CaptionLength::Short,
                3,
            )
            .await
            .expect("batch");
        decorations.push(batch.export_text());
    }

    assert_eq!(decorations[0], decorations[1]);
}

#[test_log::test(tokio::test)]
async fn test_zero_count() {
    let mut generator = batch_generator(ScriptedGenerator::new(vec![]));
    let batch = generator
        .generate_batch(&dog_caption(), StyleCategory::Food, CaptionLength::Short, 0)
        .await
        .expect("empty batch");

    assert!(batch.is_empty());
    assert_eq!(batch.export_text(), "");
}

/// Chat model double that answers like a completion model would.
struct EchoChat;

impl Model for EchoChat {
    type Item = LLMInput;
    type Output = String;

    async fn process(
        &mut self,
        items: Vec<Self::Item>,
    ) -> anyhow::Result<Vec<anyhow::Result<Self::Output>>> {
        Ok(items
            .into_iter()
            .map(|(history, _)| match history.last() {
                Some(LLMMessage::User(parts)) => match parts.as_slice() {
                    [LLMUserMessage::Text(text)] => {
                        Ok(format!("{}\n\nSalty paws, happy heart.", text))
                    }
                    _ => Err(anyhow::anyhow!("expected a single text part")),
                },
                _ => Err(anyhow::anyhow!("expected a user message")),
            })
            .collect())
    }

    fn batch_size_limit(&self) -> usize {
        1
    }
}

#[test_log::test(tokio::test)]
async fn test_llm_model_pipeline() {
    let llm = AIModel::new("echo-chat", || async { Ok(EchoChat) }, None).expect("llm model");
    let text_generator = LLMTextGenerator::new(llm, LLMInferenceParams::default());
    let mut generator = batch_generator(Arc::new(text_generator));

    let batch = generator
        .generate_batch(&dog_caption(), StyleCategory::Animal, CaptionLength::Short, 3)
        .await
        .expect("batch");

    assert_eq!(batch.captions().count(), 3);
    assert!(batch
        .captions()
        .all(|v| v.text == "Salty paws, happy heart."));
}
