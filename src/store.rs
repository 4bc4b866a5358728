//! Key-value storage seam between the plugins and the host.
//!
//! Plugins only ever see flat string keys and string values; the host decides
//! where they live. Nothing stored here expires.

use async_trait::async_trait;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    /// Returns whether a value was present.
    async fn remove(&self, key: &str) -> anyhow::Result<bool>;
}
