use crate::discord_text::{format_failure, format_translation};
use crate::language::normalize_language;
use crate::reply::{self, command_input};
use crate::{Context, Error};
use tracing::{error, info};

/// Translate text, or the replied-to message (`to:ja <text>` picks the language)
#[poise::command(slash_command, prefix_command)]
pub async fn fy(
    ctx: Context<'_>,
    #[description = "Text to translate; start with to:<lang> to choose the language"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    let (to, text) = match text.as_deref() {
        Some(raw) => {
            let (to, rest) = split_target(raw);
            (to.map(str::to_string), Some(rest.to_string()))
        }
        None => (None, None),
    };
    translate_and_reply(ctx, text, to).await
}

async fn translate_and_reply(
    ctx: Context<'_>,
    text: Option<String>,
    to: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();

    let target = match to {
        Some(raw) => match normalize_language(&raw) {
            Ok(lang) => lang,
            Err(e) => {
                ctx.say(format!("❌ Invalid language: {}", e)).await?;
                return Ok(());
            }
        },
        None => data.settings.default_language().await?,
    };

    let Some(text) = command_input(ctx, text) else {
        ctx.say("❌ Please provide text to translate, or reply to a message with `fy`.")
            .await?;
        return Ok(());
    };

    info!(
        "fy from {} in channel {} -> {} ({} chars)",
        ctx.author().name,
        ctx.channel_id(),
        target,
        text.chars().count()
    );

    let handle = reply::start(ctx, "⏳ Translating...").await?;
    let content = match data.relay.translate(&text, &target).await {
        Ok(translation) => format_translation(&text, &translation),
        Err(e) => {
            error!("fy failed: {}", e);
            format_failure(&e)
        }
    };

    reply::finish(ctx, handle, &content).await
}

/// Splits a leading `to:<lang>` token off prefix-command input.
fn split_target(input: &str) -> (Option<&str>, &str) {
    let trimmed = input.trim_start();
    let (first, rest) = match trimmed.find(char::is_whitespace) {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    };

    match first.get(..3) {
        Some(head) if head.eq_ignore_ascii_case("to:") && first.len() > 3 => {
            (Some(&first[3..]), rest.trim())
        }
        _ => (None, input.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("to:ja hello world"), (Some("ja"), "hello world"));
        assert_eq!(split_target("  TO:zh-CN\nline"), (Some("zh-CN"), "line"));
        assert_eq!(split_target("to:fr"), (Some("fr"), ""));
    }

    #[test]
    fn test_split_target_without_prefix() {
        assert_eq!(split_target("today is nice"), (None, "today is nice"));
        assert_eq!(split_target("to: ja hello"), (None, "to: ja hello"));
        assert_eq!(split_target(""), (None, ""));
    }
}
