use crate::{
    llm::{LLMInferenceParams, LLMMessage},
    AIModel,
};

pub type LLMInput = (Vec<LLMMessage>, LLMInferenceParams);
pub type LLMModel = AIModel<LLMInput, String>;
