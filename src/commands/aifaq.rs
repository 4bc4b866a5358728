use crate::discord_text::{format_answer, format_failure};
use crate::reply::{self, command_input};
use crate::{Context, Error};
use tracing::{error, info};

/// Answer a question with Gemini
#[poise::command(slash_command, prefix_command)]
pub async fn aifaq(
    ctx: Context<'_>,
    #[description = "Your question"]
    #[rest]
    question: Option<String>,
) -> Result<(), Error> {
    let Some(question) = command_input(ctx, question) else {
        ctx.say("❌ Please provide a question, or reply to a message with `aifaq`.")
            .await?;
        return Ok(());
    };

    info!(
        "aifaq from {} in channel {} ({} chars)",
        ctx.author().name,
        ctx.channel_id(),
        question.chars().count()
    );

    let handle = reply::start(ctx, "⏳ Thinking...").await?;
    let content = match ctx.data().relay.ask(&question).await {
        Ok(answer) => format_answer(&question, &answer),
        Err(e) => {
            error!("aifaq failed: {}", e);
            format_failure(&e)
        }
    };

    reply::finish(ctx, handle, &content).await
}
