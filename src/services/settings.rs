use crate::config::Config;
use crate::language::same_language;
use crate::store::KvStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub const API_KEY: &str = "gemini.api_key";
pub const API_KEY_UPDATED_AT: &str = "gemini.api_key_updated_at";
pub const DEFAULT_LANGUAGE: &str = "gemini.default_lang";
pub const MODEL: &str = "gemini.model";

pub fn auto_targets_key(chat_id: u64) -> String {
    format!("autofy.{}", chat_id)
}

/// Where a resolved setting came from, shown by `gemini status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Stored,
    Environment,
}

/// Typed access to the plugin settings kept in the host key-value store.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn KvStore>,
    fallback_api_key: Option<String>,
    fallback_language: String,
    fallback_model: String,
    // Serializes read-modify-write of target lists across clones.
    targets_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KvStore>, config: &Config) -> Self {
        Self {
            store,
            fallback_api_key: config.gemini_api_key.clone(),
            fallback_language: config.default_language.clone(),
            fallback_model: config.gemini_model.clone(),
            targets_lock: Arc::new(Mutex::new(())),
        }
    }

    // --- API key ---

    pub async fn api_key(&self) -> anyhow::Result<Option<(String, Source)>> {
        if let Some(key) = self.store.get(API_KEY).await?.filter(|k| !k.is_empty()) {
            return Ok(Some((key, Source::Stored)));
        }
        Ok(self
            .fallback_api_key
            .clone()
            .map(|key| (key, Source::Environment)))
    }

    pub async fn set_api_key(&self, key: &str) -> anyhow::Result<()> {
        self.store.set(API_KEY, key).await?;
        self.store
            .set(API_KEY_UPDATED_AT, &Utc::now().to_rfc3339())
            .await?;
        info!("Gemini API key updated");
        Ok(())
    }

    pub async fn clear_api_key(&self) -> anyhow::Result<bool> {
        self.store.remove(API_KEY_UPDATED_AT).await?;
        self.store.remove(API_KEY).await
    }

    pub async fn api_key_updated_at(&self) -> anyhow::Result<Option<DateTime<Utc>>> {
        let raw = self.store.get(API_KEY_UPDATED_AT).await?;
        Ok(raw
            .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
            .map(|ts| ts.with_timezone(&Utc)))
    }

    // --- Default language ---

    pub async fn default_language(&self) -> anyhow::Result<String> {
        Ok(self
            .store
            .get(DEFAULT_LANGUAGE)
            .await?
            .unwrap_or_else(|| self.fallback_language.clone()))
    }

    pub async fn set_default_language(&self, lang: &str) -> anyhow::Result<()> {
        self.store.set(DEFAULT_LANGUAGE, lang).await
    }

    // --- Model ---

    pub async fn model(&self) -> anyhow::Result<(String, Source)> {
        match self.store.get(MODEL).await? {
            Some(model) if !model.is_empty() => Ok((model, Source::Stored)),
            _ => Ok((self.fallback_model.clone(), Source::Environment)),
        }
    }

    pub async fn set_model(&self, model: &str) -> anyhow::Result<()> {
        self.store.set(MODEL, model).await
    }

    pub async fn clear_model(&self) -> anyhow::Result<bool> {
        self.store.remove(MODEL).await
    }

    // --- Auto-translate targets ---

    pub async fn auto_targets(&self, chat_id: u64) -> anyhow::Result<Vec<String>> {
        let key = auto_targets_key(chat_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(targets) => Ok(targets),
            Err(e) => {
                warn!("Ignoring unreadable auto-translate targets under {}: {}", key, e);
                Ok(Vec::new())
            }
        }
    }

    /// Returns false when the language is already a target.
    pub async fn add_auto_target(&self, chat_id: u64, lang: &str) -> anyhow::Result<bool> {
        let _guard = self.targets_lock.lock().await;
        let mut targets = self.auto_targets(chat_id).await?;
        if targets.iter().any(|t| same_language(t, lang)) {
            return Ok(false);
        }
        targets.push(lang.to_string());
        self.save_auto_targets(chat_id, &targets).await?;
        Ok(true)
    }

    /// Returns false when the language was not a target.
    pub async fn remove_auto_target(&self, chat_id: u64, lang: &str) -> anyhow::Result<bool> {
        let _guard = self.targets_lock.lock().await;
        let mut targets = self.auto_targets(chat_id).await?;
        let before = targets.len();
        targets.retain(|t| !same_language(t, lang));
        if targets.len() == before {
            return Ok(false);
        }
        self.save_auto_targets(chat_id, &targets).await?;
        Ok(true)
    }

    pub async fn clear_auto_targets(&self, chat_id: u64) -> anyhow::Result<bool> {
        let _guard = self.targets_lock.lock().await;
        self.store.remove(&auto_targets_key(chat_id)).await
    }

    async fn save_auto_targets(&self, chat_id: u64, targets: &[String]) -> anyhow::Result<()> {
        let key = auto_targets_key(chat_id);
        if targets.is_empty() {
            self.store.remove(&key).await?;
            return Ok(());
        }
        self.store.set(&key, &serde_json::to_string(targets)?).await
    }
}

/// Masks a key for display. Keys of eight characters or fewer are fully
/// hidden; longer keys show their last four.
pub fn mask_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 8 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count.min(12) - 4), tail)
}
