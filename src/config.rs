use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub owner_id: Option<u64>,
    pub command_prefix: String,
    pub dev_guild_id: Option<u64>,
    pub register_commands: bool,
    pub database_url: String,

    // Gemini endpoint settings
    pub gemini_api_base_url: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_max_attempts: u32,
    pub gemini_retry_delay: Duration,
    pub gemini_timeout: Duration,
    pub gemini_system_prompt: String,

    pub default_language: String,
}

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions in a chat group. \
Answer in the same language as the question. Be concise and accurate, and use Markdown sparingly.";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN must be set"))?,
            owner_id: env::var("OWNER_ID").ok().and_then(|id| id.parse().ok()),
            command_prefix: env::var("COMMAND_PREFIX")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| ",".to_string()),
            dev_guild_id: env::var("DEV_GUILD_ID").ok().and_then(|id| id.parse().ok()),
            register_commands: env::var("REGISTER_COMMANDS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "data/geminibot.db".to_string()),
            gemini_api_base_url: env::var("GEMINI_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_max_attempts: env::var("GEMINI_MAX_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
                .parse::<u32>()
                .unwrap_or(DEFAULT_MAX_ATTEMPTS)
                .max(1),
            gemini_retry_delay: parse_duration_var("GEMINI_RETRY_DELAY", "1s")?,
            gemini_timeout: parse_duration_var("GEMINI_TIMEOUT", "60s")?,
            gemini_system_prompt: env::var("GEMINI_SYSTEM_PROMPT")
                .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string()),
            default_language: env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
        })
    }
}

fn parse_duration_var(name: &str, default: &str) -> anyhow::Result<Duration> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    humantime::parse_duration(raw.trim())
        .map_err(|e| anyhow::anyhow!("{} must be a duration like `1s` or `500ms`: {}", name, e))
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("owner_id", &self.owner_id)
            .field("command_prefix", &self.command_prefix)
            .field("dev_guild_id", &self.dev_guild_id)
            .field("register_commands", &self.register_commands)
            .field("database_url", &self.database_url)
            .field("gemini_api_base_url", &self.gemini_api_base_url)
            .field("gemini_model", &self.gemini_model)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("gemini_max_attempts", &self.gemini_max_attempts)
            .field(
                "gemini_retry_delay",
                &humantime::format_duration(self.gemini_retry_delay).to_string(),
            )
            .field(
                "gemini_timeout",
                &humantime::format_duration(self.gemini_timeout).to_string(),
            )
            .field("gemini_system_prompt", &self.gemini_system_prompt)
            .field("default_language", &self.default_language)
            .finish()
    }
}

/// Discord message limit is 2000 characters
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        discord_token: "test".to_string(),
        owner_id: Some(1),
        command_prefix: ",".to_string(),
        dev_guild_id: None,
        register_commands: false,
        database_url: ":memory:".to_string(),
        gemini_api_base_url: "http://localhost:0".to_string(),
        gemini_model: DEFAULT_MODEL.to_string(),
        gemini_api_key: None,
        gemini_max_attempts: DEFAULT_MAX_ATTEMPTS,
        gemini_retry_delay: Duration::ZERO,
        gemini_timeout: Duration::from_secs(5),
        gemini_system_prompt: "test".to_string(),
        default_language: "en".to_string(),
    }
}
