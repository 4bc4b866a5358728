//! Placeholder-then-edit replies shared by the plugin commands.

use crate::config::DISCORD_MESSAGE_LIMIT;
use crate::discord_text::{extract_message_text, split_message};
use crate::{Context, Error};
use poise::ReplyHandle;
use tracing::debug;

/// Posts a placeholder that [`finish`] later edits with the result.
pub async fn start<'a>(ctx: Context<'a>, placeholder: &str) -> Result<ReplyHandle<'a>, Error> {
    Ok(ctx.say(placeholder).await?)
}

/// Edits the placeholder with `content`; overflow goes out as follow-ups.
pub async fn finish(ctx: Context<'_>, handle: ReplyHandle<'_>, content: &str) -> Result<(), Error> {
    let mut chunks = split_message(content, DISCORD_MESSAGE_LIMIT).into_iter();
    let first = chunks.next().unwrap_or_default();
    handle
        .edit(ctx, poise::CreateReply::default().content(first))
        .await?;

    for chunk in chunks {
        debug!("Sending overflow chunk ({} chars)", chunk.chars().count());
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Text of the message a prefix command replied to, if any.
pub fn replied_text(ctx: Context<'_>) -> Option<String> {
    match ctx {
        poise::Context::Prefix(prefix) => prefix
            .msg
            .referenced_message
            .as_deref()
            .map(extract_message_text)
            .filter(|text| !text.trim().is_empty()),
        _ => None,
    }
}

/// The explicit argument, or else the replied-to message text.
pub fn command_input(ctx: Context<'_>, argument: Option<String>) -> Option<String> {
    argument
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .or_else(|| replied_text(ctx))
}
