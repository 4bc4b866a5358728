use poise::serenity_prelude as serenity;

/// Text of a message including its embeds, used when a command replies to it.
pub fn extract_message_text(message: &serenity::Message) -> String {
    let mut parts = Vec::new();

    let content = message.content.trim();
    if !content.is_empty() {
        parts.push(content.to_string());
    }

    for embed in &message.embeds {
        if let Some(description) = &embed.description {
            let description = description.trim();
            if !description.is_empty() {
                parts.push(description.to_string());
            }
        }

        for field in &embed.fields {
            let value = field.value.trim();
            if !value.is_empty() {
                parts.push(value.to_string());
            }
        }
    }

    parts.join("\n")
}

/// Prefixes every line with a Discord quote marker.
pub fn quote_block(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "> ".to_string();
    }
    trimmed
        .lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_answer(question: &str, answer: &str) -> String {
    format!("{}\n{}", question.trim(), quote_block(answer))
}

pub fn format_translation(original: &str, translation: &str) -> String {
    format!("{}\n{}", translation.trim(), quote_block(original))
}

pub fn format_auto_translations(translations: &[(String, String)]) -> String {
    translations
        .iter()
        .map(|(lang, text)| format!("🌐 **{}**: {}", lang, text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_failure(error: &dyn std::fmt::Display) -> String {
    format!("❌ {}", error)
}

/// Splits `text` into chunks of at most `limit` characters.
///
/// Prefers to break after a newline, then after whitespace, and only splits
/// inside a word when a single word is longer than `limit`.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        // Byte offset just past the `limit`-th char.
        let hard_end = rest
            .char_indices()
            .nth(limit)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let window = &rest[..hard_end];

        let cut = window
            .rfind('\n')
            .map(|idx| idx + 1)
            .or_else(|| {
                window
                    .char_indices()
                    .filter(|(_, c)| c.is_whitespace())
                    .last()
                    .map(|(idx, c)| idx + c.len_utf8())
            })
            .filter(|&idx| idx > 0)
            .unwrap_or(hard_end);

        let (head, tail) = rest.split_at(cut);
        let head = head.trim_end();
        if !head.is_empty() {
            chunks.push(head.to_string());
        }
        rest = tail;
    }

    if !rest.trim().is_empty() || chunks.is_empty() {
        chunks.push(rest.trim_end().to_string());
    }
    chunks
}

/// ASCII letter runs of two or more characters, lowercased and de-duplicated.
pub fn abbreviation_candidates(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for word in strip_markup(text).split(|c: char| !c.is_ascii_alphabetic()) {
        if word.len() < 2 {
            continue;
        }
        let word = word.to_ascii_lowercase();
        if !found.contains(&word) {
            found.push(word);
        }
    }
    found
}

/// Whether anything worth translating remains once links, mentions and
/// custom emoji are removed.
pub fn has_translatable_text(text: &str) -> bool {
    strip_markup(text).chars().any(|c| c.is_alphabetic())
}

fn strip_markup(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| {
            !(word.starts_with("http://")
                || word.starts_with("https://")
                || is_angle_token(word)
                || (word.len() > 2 && word.starts_with(':') && word.ends_with(':')))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<@123>`, `<#123>`, `<:emoji:123>` and similar Discord tokens.
fn is_angle_token(word: &str) -> bool {
    word.starts_with('<')
        && word.ends_with('>')
        && word[1..].starts_with(['@', '#', ':', 'a', 't'])
}
