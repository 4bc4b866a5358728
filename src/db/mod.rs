pub mod schema;

use crate::config::Config;
use crate::store::KvStore;
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        if let Some(parent) = std::path::Path::new(&config.database_url).parent() {
            if !parent.as_os_str().is_empty() && config.database_url != ":memory:" {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&config.database_url)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn execute_init(&self) -> anyhow::Result<()> {
        info!("Database: Initializing schema...");
        let conn = self.lock()?;
        conn.execute_batch(schema::SCHEMA)?;
        debug!("Database: Schema initialized successfully");
        Ok(())
    }

    /// Runs a synchronous database call on the blocking pool.
    pub async fn run_blocking<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || f(&db)).await?
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection lock poisoned"))
    }

    pub fn get_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.lock()?;
        let value: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set_value(&self, key: &str, value: &str) -> anyhow::Result<()> {
        debug!("Database: Setting key {}", key);
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
            (key, value),
        )?;
        Ok(())
    }

    pub fn delete_value(&self, key: &str) -> anyhow::Result<usize> {
        debug!("Database: Deleting key {}", key);
        let conn = self.lock()?;
        let count = conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(count)
    }
}

#[async_trait]
impl KvStore for Database {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |db| db.get_value(&key)).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run_blocking(move |db| db.set_value(&key, &value)).await
    }

    async fn remove(&self, key: &str) -> anyhow::Result<bool> {
        let key = key.to_string();
        let count = self.run_blocking(move |db| db.delete_value(&key)).await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
pub(crate) fn memory_db() -> Database {
    let db = Database::new(&crate::config::test_config()).unwrap();
    db.execute_init().unwrap();
    db
}
