pub mod autotranslate;
pub mod commands;
pub mod config;
pub mod db;
pub mod discord_text;
pub mod gemini;
pub mod language;
pub mod prompt;
pub mod reply;
pub mod services;
pub mod store;

/// Custom data passed to all commands
pub struct Data {
    pub config: config::Config,
    pub bot_id: u64,
    pub settings: services::settings::SettingsService,
    pub gemini: gemini::GeminiClient,
    pub relay: services::relay::RelayService,
}

impl Data {
    pub fn new(
        config: config::Config,
        db: db::Database,
        http_client: reqwest::Client,
        bot_id: u64,
    ) -> Self {
        let settings =
            services::settings::SettingsService::new(std::sync::Arc::new(db), &config);
        let gemini = gemini::GeminiClient::new(&config, http_client);
        let relay = services::relay::RelayService::new(
            settings.clone(),
            gemini.clone(),
            &config.gemini_system_prompt,
        );

        Self {
            config,
            bot_id,
            settings,
            gemini,
            relay,
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
