use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::adapters::route_generator::generate_routes;
use crate::domain::{DocumentStore, Documentation, StoreError};

/// Generates the API documentation and reads it back from the store
pub struct DocumentationHandler {
    store: Arc<dyn DocumentStore>,
}

impl DocumentationHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Infer routes from `sample` and persist them along with a fresh copy
    /// of the sample as live data. Any previous documentation is replaced.
    pub async fn generate(&self, sample: Value, prefix: &str) -> Result<Documentation, StoreError> {
        let routes = generate_routes(&sample, prefix);
        let documentation = Documentation {
            routes,
            api_prefix: prefix.to_string(),
            json_data: Some(sample.clone()),
            json_structure: sample,
            timestamp: Some(Utc::now()),
        };

        self.store.save(&documentation).await?;
        info!(
            prefix,
            routes = documentation.routes.len(),
            "Generated API documentation"
        );
        Ok(documentation)
    }

    pub async fn load(&self) -> Result<Option<Documentation>, StoreError> {
        self.store.load().await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.clear().await?;
        info!("Cleared API documentation");
        Ok(())
    }

    /// True once a generation produced at least one route
    pub async fn has_documentation(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .load()
            .await?
            .is_some_and(|doc| !doc.routes.is_empty()))
    }

    /// Current live document, if any
    pub async fn live_data(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.store.load().await?.and_then(|doc| doc.json_data))
    }
}
