//! Error types for the simulator and the document stores

use thiserror::Error;

/// Failure modes of a simulated request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// No documentation (or no live data) has been generated yet
    #[error("Simulateur non initialisé.")]
    NotInitialized,

    /// Missing body or a target that is not a collection
    #[error("{0}")]
    BadRequest(String),

    /// Path resolution or id lookup failed
    #[error("{0}")]
    NotFound(String),

    #[error("Méthode non supportée")]
    MethodNotSupported,
}

impl SimulationError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotInitialized => 503,
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::MethodNotSupported => 405,
        }
    }

    pub(crate) fn body_required() -> Self {
        Self::BadRequest("Corps de requête requis".to_string())
    }

    pub(crate) fn not_a_collection() -> Self {
        Self::BadRequest("La cible n'est pas une collection".to_string())
    }

    pub fn resource_not_found() -> Self {
        Self::NotFound("Ressource non trouvée".to_string())
    }

    pub(crate) fn collection_not_found() -> Self {
        Self::NotFound("Collection non trouvée".to_string())
    }

    pub(crate) fn item_not_found() -> Self {
        Self::NotFound("Élément non trouvé".to_string())
    }
}

/// Errors raised by `DocumentStore` implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist {path}: {reason}")]
    Persist { path: String, reason: String },
}
