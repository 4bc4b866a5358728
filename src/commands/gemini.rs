use crate::language::normalize_language;
use crate::services::settings::{mask_key, Source};
use crate::{Context, Error};
use tracing::{info, warn};

/// Manage the Gemini plugin settings
#[poise::command(
    slash_command,
    prefix_command,
    subcommands("key", "unkey", "lang", "model", "status"),
    subcommand_required
)]
pub async fn gemini(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

async fn say_private(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(text.into())
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Store the Gemini API key after checking it against the API (Owner only)
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn key(
    ctx: Context<'_>,
    #[description = "Gemini API key"] api_key: String,
) -> Result<(), Error> {
    match ctx {
        // Keys typed as prefix commands are visible to everyone in the channel.
        poise::Context::Prefix(prefix) => {
            if let Err(e) = prefix.msg.delete(ctx.serenity_context()).await {
                warn!("Could not delete message carrying an API key: {}", e);
            }
        }
        poise::Context::Application(_) => ctx.defer_ephemeral().await?,
    }

    let api_key = api_key.trim();
    if api_key.is_empty() {
        say_private(ctx, "❌ API key cannot be empty.").await?;
        return Ok(());
    }

    let data = ctx.data();
    let (model, _) = data.settings.model().await?;
    let valid = match data.gemini.validate_key(api_key, &model).await {
        Ok(valid) => valid,
        Err(e) => {
            warn!("Gemini key check failed: {}", e);
            say_private(ctx, format!("❌ Could not reach Gemini to check the key: {}", e)).await?;
            return Ok(());
        }
    };

    if !valid {
        say_private(
            ctx,
            format!("❌ Gemini rejected this key for model `{}`. Nothing was saved.", model),
        )
        .await?;
        return Ok(());
    }

    data.settings.set_api_key(api_key).await?;
    info!("Gemini API key set by {}", ctx.author().name);
    say_private(ctx, format!("✅ Gemini API key saved (`{}`).", mask_key(api_key))).await
}

/// Remove the stored Gemini API key (Owner only)
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn unkey(ctx: Context<'_>) -> Result<(), Error> {
    if ctx.data().settings.clear_api_key().await? {
        info!("Gemini API key removed by {}", ctx.author().name);
        say_private(ctx, "✅ Stored Gemini API key removed.").await
    } else {
        say_private(ctx, "📭 No stored Gemini API key to remove.").await
    }
}

/// Show or set the default translation language
#[poise::command(slash_command, prefix_command)]
pub async fn lang(
    ctx: Context<'_>,
    #[description = "Language code or name, e.g. ja, zh-CN, French"]
    #[rest]
    language: Option<String>,
) -> Result<(), Error> {
    let settings = &ctx.data().settings;

    let Some(language) = language else {
        let current = settings.default_language().await?;
        ctx.say(format!("🌐 Default translation language: `{}`", current))
            .await?;
        return Ok(());
    };

    let language = match normalize_language(&language) {
        Ok(lang) => lang,
        Err(e) => {
            ctx.say(format!("❌ Invalid language: {}", e)).await?;
            return Ok(());
        }
    };

    settings.set_default_language(&language).await?;
    info!("Default language set to {} by {}", language, ctx.author().name);
    ctx.say(format!("✅ Default translation language set to `{}`.", language))
        .await?;
    Ok(())
}

/// Override the Gemini model, or reset it when no name is given (Owner only)
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn model(
    ctx: Context<'_>,
    #[description = "Model name, e.g. gemini-2.0-flash"] name: Option<String>,
) -> Result<(), Error> {
    let settings = &ctx.data().settings;

    match name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
        Some(name) => {
            settings.set_model(&name).await?;
            info!("Gemini model set to {} by {}", name, ctx.author().name);
            ctx.say(format!("✅ Gemini model set to `{}`.", name)).await?;
        }
        None => {
            settings.clear_model().await?;
            let (model, _) = settings.model().await?;
            ctx.say(format!("✅ Model override cleared; using `{}`.", model))
                .await?;
        }
    }
    Ok(())
}

/// Show the current Gemini plugin settings
#[poise::command(slash_command, prefix_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let settings = &data.settings;

    let key_line = match settings.api_key().await? {
        Some((key, Source::Stored)) => {
            let since = settings
                .api_key_updated_at()
                .await?
                .map(|ts| format!(", set <t:{}:R>", ts.timestamp()))
                .unwrap_or_default();
            format!("`{}` (stored{})", mask_key(&key), since)
        }
        Some((key, Source::Environment)) => format!("`{}` (environment)", mask_key(&key)),
        None => "not configured".to_string(),
    };
    let (model, model_source) = settings.model().await?;
    let model_line = match model_source {
        Source::Stored => format!("`{}` (override)", model),
        Source::Environment => format!("`{}`", model),
    };
    let language = settings.default_language().await?;

    say_private(
        ctx,
        format!(
            "🤖 **Gemini plugin status**\nAPI key: {}\nModel: {}\nDefault language: `{}`\nAttempts per request: {}",
            key_line,
            model_line,
            language,
            data.gemini.max_attempts()
        ),
    )
    .await
}
