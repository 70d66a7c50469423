use crate::core::types::{Direction, PromptMessages};

/// Maps `(text, direction)` to a system + user message pair.
///
/// Implementations are pure and know nothing about providers, so templates
/// can be revised without touching routing.
pub trait PromptBuilder: Send + Sync {
    fn version(&self) -> &'static str;

    fn build(&self, text: &str, direction: Direction) -> PromptMessages;
}

const SYSTEM_PERSONA: &str = "You are a funny but accurate Gen Z translator.";
const SYSTEM_CONSTRAINTS: &str = "Return exactly one sentence containing only the translation. \
     No commentary, no explanations, no alternatives, no surrounding quotation marks.";

const TO_INFORMAL_INSTRUCTION: &str = "Translate the following into Gen Z slang, using current memes, \
     emojis, and abbreviations. Be humorous but clear:";
const TO_FORMAL_INSTRUCTION: &str = "Translate the following Gen Z slang into formal standard English, \
     suitable for academic or adult understanding:";

#[derive(Debug, Clone, Copy, Default)]
pub struct SlangPromptBuilder;

impl PromptBuilder for SlangPromptBuilder {
    fn version(&self) -> &'static str {
        "slang-v2"
    }

    fn build(&self, text: &str, direction: Direction) -> PromptMessages {
        let instruction = match direction {
            Direction::ToInformal => TO_INFORMAL_INSTRUCTION,
            Direction::ToFormal => TO_FORMAL_INSTRUCTION,
        };

        PromptMessages {
            system: format!("{SYSTEM_PERSONA} {SYSTEM_CONSTRAINTS}"),
            user: format!("{instruction}\n\n\"{}\"", text.trim()),
        }
    }
}
