//! Target language arguments.
//!
//! Accepts either a BCP-47-looking code (`ja`, `zh_cn`, `sr-Latn`) or a
//! free-form language name (`Japanese`). Codes are canonicalized so that the
//! same language is always stored under the same spelling.

use thiserror::Error;

const MAX_LANGUAGE_CHARS: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
    #[error("language must not be empty")]
    Empty,
    #[error("language is too long (max {} characters)", MAX_LANGUAGE_CHARS)]
    TooLong,
    #[error("language contains unsupported character `{0}`")]
    InvalidChar(char),
}

pub fn normalize_language(input: &str) -> Result<String, LanguageError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LanguageError::Empty);
    }
    if trimmed.chars().count() > MAX_LANGUAGE_CHARS {
        return Err(LanguageError::TooLong);
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_')))
    {
        return Err(LanguageError::InvalidChar(bad));
    }

    if looks_like_code(trimmed) {
        Ok(canonical_code(trimmed))
    } else {
        Ok(trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Case-insensitive comparison used when de-duplicating stored targets.
pub fn same_language(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn looks_like_code(input: &str) -> bool {
    let mut subtags = input.split(['-', '_']);
    let Some(primary) = subtags.next() else {
        return false;
    };
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    subtags.all(|tag| (2..=8).contains(&tag.len()) && tag.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn canonical_code(input: &str) -> String {
    input
        .split(['-', '_'])
        .enumerate()
        .map(|(i, tag)| match (i, tag.len()) {
            (0, _) => tag.to_ascii_lowercase(),
            (_, 2) if tag.chars().all(|c| c.is_ascii_alphabetic()) => tag.to_ascii_uppercase(),
            (_, 4) if tag.chars().all(|c| c.is_ascii_alphabetic()) => {
                let lower = tag.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => lower,
                }
            }
            _ => tag.to_ascii_lowercase(),
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_canonicalized() {
        assert_eq!(normalize_language("JA").unwrap(), "ja");
        assert_eq!(normalize_language(" zh_cn ").unwrap(), "zh-CN");
        assert_eq!(normalize_language("sr-latn").unwrap(), "sr-Latn");
        assert_eq!(normalize_language("es-419").unwrap(), "es-419");
    }

    #[test]
    fn test_names_pass_through() {
        assert_eq!(normalize_language("Japanese").unwrap(), "Japanese");
        assert_eq!(
            normalize_language("  Simplified   Chinese ").unwrap(),
            "Simplified Chinese"
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(normalize_language("   "), Err(LanguageError::Empty));
        assert_eq!(
            normalize_language(&"x".repeat(33)),
            Err(LanguageError::TooLong)
        );
        assert_eq!(
            normalize_language("ja; drop"),
            Err(LanguageError::InvalidChar(';'))
        );
    }

    #[test]
    fn test_same_language_ignores_case() {
        assert!(same_language("zh-CN", "zh-cn"));
        assert!(!same_language("zh-CN", "zh-TW"));
    }
}
