//! # apisim - JSON sample to mock REST API
//!
//! apisim reads a representative JSON document, infers the CRUD routes a REST
//! API serving that data would expose, and simulates calls against an
//! in-memory copy of the data.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apisim::adapters::api_simulator::ApiSimulator;
//! use apisim::adapters::documentation_handler::DocumentationHandler;
//! use apisim::adapters::state_manager::StateManager;
//! use apisim::domain::{HttpMethod, RequestParams};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(StateManager::new());
//!     let doc = DocumentationHandler::new(store.clone())
//!         .generate(json!({ "users": [{ "id": 1, "name": "Ana" }] }), "/api/v1")
//!         .await?;
//!
//!     let (route, params) = doc
//!         .routes
//!         .match_request(HttpMethod::Get, "/api/v1/users/1")
//!         .expect("route exists");
//!     let response = ApiSimulator::new(store).request(route, &params, None).await;
//!     assert_eq!(response.status, 200);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: routes, documentation, errors and the `DocumentStore` port
//! - **Adapters**: route generation, example synthesis, path resolution,
//!   request simulation and the store implementations
//! - **Config**: settings loading and validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
