use crate::discord_text::{abbreviation_candidates, format_answer, format_failure};
use crate::reply::{self, command_input};
use crate::{Context, Error};
use tracing::{error, info};

const NO_MATCH: &str = "No pinyin abbreviations found.";

/// Explain pinyin-initial abbreviations (reply to a message or pass text)
#[poise::command(slash_command, prefix_command)]
pub async fn guess(
    ctx: Context<'_>,
    #[description = "Text containing abbreviations such as yyds"]
    #[rest]
    text: Option<String>,
) -> Result<(), Error> {
    let Some(text) = command_input(ctx, text) else {
        ctx.say("❌ Reply to a message with `guess`, or pass the text to explain.")
            .await?;
        return Ok(());
    };

    let candidates = abbreviation_candidates(&text);
    if candidates.is_empty() {
        ctx.say(NO_MATCH).await?;
        return Ok(());
    }

    info!(
        "guess from {} in channel {}: {:?}",
        ctx.author().name,
        ctx.channel_id(),
        candidates
    );

    let handle = reply::start(ctx, "⏳ Guessing...").await?;
    let content = match ctx
        .data()
        .relay
        .explain_abbreviations(&text, &candidates)
        .await
    {
        Ok(answer) if answer.trim().is_empty() => NO_MATCH.to_string(),
        Ok(answer) => format_answer(&text, &answer),
        Err(e) => {
            error!("guess failed: {}", e);
            format_failure(&e)
        }
    };

    reply::finish(ctx, handle, &content).await
}
