use crate::language::normalize_language;
use crate::{Context, Error};
use tracing::info;

/// Manage automatic translation for this channel
#[poise::command(
    slash_command,
    prefix_command,
    subcommands("add", "remove", "list", "clear"),
    subcommand_required,
    guild_only
)]
pub async fn autofy(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Translate every message in this channel into a language
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "Language code or name, e.g. ja, zh-CN"] language: String,
) -> Result<(), Error> {
    let language = match normalize_language(&language) {
        Ok(lang) => lang,
        Err(e) => {
            ctx.say(format!("❌ Invalid language: {}", e)).await?;
            return Ok(());
        }
    };

    let channel_id = ctx.channel_id();
    let settings = &ctx.data().settings;
    if settings.add_auto_target(channel_id.get(), &language).await? {
        info!(
            "Auto-translate target {} added to channel {} by {}",
            language,
            channel_id,
            ctx.author().name
        );
        let targets = settings.auto_targets(channel_id.get()).await?;
        ctx.say(format!(
            "✅ Messages in this channel will be translated to `{}`. Targets: {}",
            language,
            format_targets(&targets)
        ))
        .await?;
    } else {
        ctx.say(format!("ℹ️ `{}` is already an auto-translate target here.", language))
            .await?;
    }
    Ok(())
}

/// Stop translating this channel into a language
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Language to remove"] language: String,
) -> Result<(), Error> {
    let language = match normalize_language(&language) {
        Ok(lang) => lang,
        Err(e) => {
            ctx.say(format!("❌ Invalid language: {}", e)).await?;
            return Ok(());
        }
    };

    let channel_id = ctx.channel_id();
    if ctx
        .data()
        .settings
        .remove_auto_target(channel_id.get(), &language)
        .await?
    {
        info!(
            "Auto-translate target {} removed from channel {}",
            language, channel_id
        );
        ctx.say(format!("✅ Stopped translating to `{}`.", language))
            .await?;
    } else {
        ctx.say(format!("📭 `{}` is not an auto-translate target here.", language))
            .await?;
    }
    Ok(())
}

/// List auto-translate targets for this channel
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let targets = ctx
        .data()
        .settings
        .auto_targets(ctx.channel_id().get())
        .await?;

    if targets.is_empty() {
        ctx.say("📭 Auto-translate is off in this channel.").await?;
    } else {
        ctx.say(format!("🌐 Auto-translate targets: {}", format_targets(&targets)))
            .await?;
    }
    Ok(())
}

/// Turn off auto-translate for this channel
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn clear(ctx: Context<'_>) -> Result<(), Error> {
    let channel_id = ctx.channel_id();
    if ctx
        .data()
        .settings
        .clear_auto_targets(channel_id.get())
        .await?
    {
        info!("Auto-translate cleared for channel {}", channel_id);
        ctx.say("✅ Auto-translate turned off for this channel.")
            .await?;
    } else {
        ctx.say("📭 Auto-translate was already off here.").await?;
    }
    Ok(())
}

fn format_targets(targets: &[String]) -> String {
    targets
        .iter()
        .map(|t| format!("`{}`", t))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subcommand_needs_manage_messages() {
        let command = autofy();
        assert!(command.guild_only);
        assert_eq!(command.subcommands.len(), 4);
        for sub in &command.subcommands {
            assert!(sub.guild_only, "{} should be guild only", sub.name);
            assert!(
                sub.required_permissions
                    .contains(poise::serenity_prelude::Permissions::MANAGE_MESSAGES),
                "{} should require MANAGE_MESSAGES",
                sub.name
            );
        }
    }

    #[test]
    fn test_format_targets() {
        let targets = vec!["ja".to_string(), "zh-CN".to_string()];
        assert_eq!(format_targets(&targets), "`ja`, `zh-CN`");
    }
}
