//! Prompt construction for the plugin commands.

/// User text plus an optional system instruction, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub system_instruction: Option<String>,
}

impl Prompt {
    pub fn question(text: &str, system_prompt: &str) -> Self {
        let system_prompt = system_prompt.trim();
        Self {
            text: text.trim().to_string(),
            system_instruction: (!system_prompt.is_empty()).then(|| system_prompt.to_string()),
        }
    }

    /// Wraps `text` with an instruction to translate it into `target`.
    pub fn translation(text: &str, target: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            system_instruction: Some(format!(
                "You are a translation engine. Translate the user's message into the language \
                 identified by \"{target}\". Reply with the translation only: no explanations, \
                 no quotes, no notes. Keep formatting, line breaks, emoji, mentions and URLs \
                 unchanged. If the message is already in that language, return it unchanged."
            )),
        }
    }

    /// Asks for expansions of pinyin-initial abbreviations (e.g. `yyds`).
    pub fn abbreviation(text: &str, candidates: &[String]) -> Self {
        Self {
            text: text.trim().to_string(),
            system_instruction: Some(format!(
                "The user's message contains Chinese internet slang written as pinyin initials. \
                 For each of these abbreviations: {}. Give the most likely Chinese phrase and a \
                 short meaning, one per line, formatted as `abbr: 中文 (meaning)`. \
                 Skip any that are not pinyin abbreviations.",
                candidates.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt() {
        let prompt = Prompt::question("  what is rust?  ", "Be brief.");
        assert_eq!(prompt.text, "what is rust?");
        assert_eq!(prompt.system_instruction.as_deref(), Some("Be brief."));

        let bare = Prompt::question("hi", "   ");
        assert_eq!(bare.system_instruction, None);
    }

    #[test]
    fn test_translation_prompt_names_target() {
        let prompt = Prompt::translation("Hello there", "ja");
        assert_eq!(prompt.text, "Hello there");
        let instruction = prompt.system_instruction.unwrap();
        assert!(instruction.contains("\"ja\""));
        assert!(instruction.contains("translation only"));
    }

    #[test]
    fn test_abbreviation_prompt_lists_candidates() {
        let candidates = vec!["yyds".to_string(), "xswl".to_string()];
        let prompt = Prompt::abbreviation("yyds xswl", &candidates);
        assert!(prompt.system_instruction.unwrap().contains("yyds, xswl"));
    }
}
