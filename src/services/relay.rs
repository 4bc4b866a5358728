use crate::gemini::{GeminiClient, GeminiError};
use crate::prompt::Prompt;
use crate::services::settings::SettingsService;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No Gemini API key is configured. Ask the bot owner to run `gemini key <key>`.")]
    MissingApiKey,

    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error("settings store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// Resolves the key and model from settings and forwards prompts to Gemini.
#[derive(Clone)]
pub struct RelayService {
    settings: SettingsService,
    client: GeminiClient,
    system_prompt: String,
}

impl RelayService {
    pub fn new(settings: SettingsService, client: GeminiClient, system_prompt: &str) -> Self {
        Self {
            settings,
            client,
            system_prompt: system_prompt.to_string(),
        }
    }

    pub async fn ask(&self, question: &str) -> Result<String, RelayError> {
        self.send(&Prompt::question(question, &self.system_prompt))
            .await
    }

    pub async fn translate(&self, text: &str, target: &str) -> Result<String, RelayError> {
        self.send(&Prompt::translation(text, target)).await
    }

    pub async fn explain_abbreviations(
        &self,
        text: &str,
        candidates: &[String],
    ) -> Result<String, RelayError> {
        self.send(&Prompt::abbreviation(text, candidates)).await
    }

    async fn send(&self, prompt: &Prompt) -> Result<String, RelayError> {
        let (api_key, _) = self
            .settings
            .api_key()
            .await?
            .ok_or(RelayError::MissingApiKey)?;
        let (model, _) = self.settings.model().await?;
        debug!("Relaying prompt ({} chars) to {}", prompt.text.chars().count(), model);
        Ok(self.client.generate(&api_key, &model, prompt).await?)
    }
}
