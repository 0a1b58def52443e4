use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DocumentStore, Documentation, StoreError};

/// Key under which the documentation is kept unless configured otherwise
pub const DEFAULT_DOCUMENT_KEY: &str = "api-documentation";

/// In-memory key-value store holding JSON blobs
#[derive(Clone)]
pub struct StateManager {
    state: Arc<RwLock<HashMap<String, Value>>>,
    key: String,
}

impl StateManager {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_DOCUMENT_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(HashMap::new())),
            key: key.into(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let state = self.state.read().await;
        state.get(key).cloned()
    }

    pub async fn set(&self, key: String, value: Value) {
        let mut state = self.state.write().await;
        state.insert(key, value);
    }

    pub async fn delete(&self, key: &str) {
        let mut state = self.state.write().await;
        state.remove(key);
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for StateManager {
    async fn load(&self) -> Result<Option<Documentation>, StoreError> {
        match self.get(&self.key).await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, documentation: &Documentation) -> Result<(), StoreError> {
        let value = serde_json::to_value(documentation)?;
        self.set(self.key.clone(), value).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.delete(&self.key).await;
        Ok(())
    }
}
