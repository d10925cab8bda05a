use crate::llm::params::{GenerationConfig, SafetySettings};

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Answers should be concise unless the user asks for a detailed explanation. For any technical questions, assume the user has general knowledge in the area and just wants an answer to the question he asked. Keep answers short and correct.";

/// Per-session settings, fixed once the session is created.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub system_instruction: String,
    pub generation: GenerationConfig,
    pub safety: SafetySettings,
}

impl ChatConfig {
    pub fn from_system_prompt(tokens: Option<&[String]>) -> Self {
        let system_instruction = match tokens {
            Some(tokens) if !tokens.is_empty() => tokens.join(" "),
            _ => DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        };

        Self {
            system_instruction,
            generation: GenerationConfig::default(),
            safety: SafetySettings::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::from_system_prompt(None)
    }
}
