//! Inline translation of ordinary group messages.
//!
//! Channels opt in with `autofy add <lang>`; every non-command message from a
//! human is then translated into each stored target and answered with one
//! line per language.

use crate::config::DISCORD_MESSAGE_LIMIT;
use crate::discord_text::{format_auto_translations, has_translatable_text, split_message};
use crate::services::relay::RelayService;
use crate::{Data, Error};
use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

/// Whether a message is eligible for auto-translation at all.
///
/// Messages addressed to the bot by mention are commands too, since poise
/// accepts a leading mention as a prefix.
pub fn is_candidate(message: &serenity::Message, prefix: &str, bot_id: u64) -> bool {
    if message.author.bot || message.guild_id.is_none() {
        return false;
    }
    let content = message.content.trim();
    let mention = format!("<@{}>", bot_id);
    let mention_nick = format!("<@!{}>", bot_id);
    !content.is_empty()
        && !content.starts_with(prefix)
        && !content.starts_with(&mention)
        && !content.starts_with(&mention_nick)
        && has_translatable_text(content)
}

/// Translates `text` into each target in order, dropping failures and
/// translations that came back unchanged.
pub async fn translate_all(
    relay: &RelayService,
    text: &str,
    targets: &[String],
) -> Vec<(String, String)> {
    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        match relay.translate(text, target).await {
            Ok(translation) if is_same_text(text, &translation) => {
                debug!("Skipping {} translation identical to the source", target);
            }
            Ok(translation) if translation.trim().is_empty() => {
                debug!("Skipping empty {} translation", target);
            }
            Ok(translation) => results.push((target.clone(), translation)),
            Err(e) => warn!("Auto-translate to {} failed: {}", target, e),
        }
    }
    results
}

fn is_same_text(a: &str, b: &str) -> bool {
    let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    normalize(a) == normalize(b)
}

/// Handle a plain group message for channels with auto-translate targets.
pub async fn handle_message(
    ctx: &serenity::Context,
    new_message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if !is_candidate(new_message, &data.config.command_prefix, data.bot_id) {
        return Ok(());
    }

    let targets = data
        .settings
        .auto_targets(new_message.channel_id.get())
        .await?;
    if targets.is_empty() {
        return Ok(());
    }

    info!(
        "Auto-translating message {} in channel {} into {:?}",
        new_message.id, new_message.channel_id, targets
    );

    let typing = new_message.channel_id.start_typing(&ctx.http);
    let translations = translate_all(&data.relay, &new_message.content, &targets).await;
    drop(typing);

    if translations.is_empty() {
        debug!("No translations to post for message {}", new_message.id);
        return Ok(());
    }

    let content = format_auto_translations(&translations);
    let mut chunks = split_message(&content, DISCORD_MESSAGE_LIMIT).into_iter();
    if let Some(first) = chunks.next() {
        new_message.reply(&ctx.http, first).await?;
    }
    for chunk in chunks {
        new_message.channel_id.say(&ctx.http, chunk).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::db::memory_db;
    use crate::gemini::GeminiClient;
    use crate::services::settings::SettingsService;
    use mockito::{Matcher, Server};
    use std::sync::Arc;

    fn mock_message(content: &str) -> serenity::Message {
        let mut msg = serenity::Message::default();
        msg.id = serenity::MessageId::new(1);
        msg.guild_id = Some(serenity::GuildId::new(10));
        msg.author = serenity::User::default();
        msg.author.id = serenity::UserId::new(2);
        msg.content = content.to_string();
        msg
    }

    const BOT_ID: u64 = 999;

    #[test]
    fn test_is_candidate() {
        assert!(is_candidate(&mock_message("good morning"), ",", BOT_ID));
        assert!(!is_candidate(&mock_message(",fy hello"), ",", BOT_ID));
        assert!(!is_candidate(&mock_message("   "), ",", BOT_ID));
        assert!(!is_candidate(&mock_message("https://example.com"), ",", BOT_ID));

        let mut dm = mock_message("hello");
        dm.guild_id = None;
        assert!(!is_candidate(&dm, ",", BOT_ID));

        let mut from_bot = mock_message("hello");
        from_bot.author.bot = true;
        assert!(!is_candidate(&from_bot, ",", BOT_ID));
    }

    #[test]
    fn test_is_candidate_skips_mention_commands() {
        assert!(!is_candidate(&mock_message("<@999> fy hello world"), ",", BOT_ID));
        assert!(!is_candidate(&mock_message("<@!999> aifaq what is rust"), ",", BOT_ID));
        // Mentioning someone else is ordinary chat.
        assert!(is_candidate(&mock_message("<@123> good morning"), ",", BOT_ID));
        assert!(is_candidate(&mock_message("good morning <@999>"), ",", BOT_ID));
    }

    #[test]
    fn test_is_same_text() {
        assert!(is_same_text("Hello  world", "hello world\n"));
        assert!(!is_same_text("Hello", "Bonjour"));
    }

    #[tokio::test]
    async fn test_translate_all_skips_failures_and_identical() {
        let mut server = Server::new_async().await;
        let ja = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex(r#"\\"ja\\""#.to_string()))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"おはよう"}]}}]}"#)
            .create_async()
            .await;
        let en = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex(r#"\\"en\\""#.to_string()))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Good morning"}]}}]}"#)
            .create_async()
            .await;
        let fr = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex(r#"\\"fr\\""#.to_string()))
            .with_status(500)
            .with_body("internal")
            .expect(3)
            .create_async()
            .await;

        let mut config = test_config();
        config.gemini_api_base_url = server.url();
        config.gemini_api_key = Some("k".to_string());
        let settings = SettingsService::new(Arc::new(memory_db()), &config);
        let relay = RelayService::new(
            settings,
            GeminiClient::new(&config, reqwest::Client::new()),
            "",
        );

        let targets = vec!["ja".to_string(), "en".to_string(), "fr".to_string()];
        let results = translate_all(&relay, "Good morning", &targets).await;

        assert_eq!(results, vec![("ja".to_string(), "おはよう".to_string())]);
        ja.assert_async().await;
        en.assert_async().await;
        fr.assert_async().await;
    }
}
