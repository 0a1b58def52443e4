use thiserror::Error;

use crate::config::{ApiSettings, Settings, StorageBackend, StorageSettings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_api(&settings.api) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_storage(&settings.storage) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_api(api: &ApiSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if api.prefix.is_empty() {
            errors.push(ValidationError::MissingField("api.prefix".to_string()));
        } else if !api.prefix.starts_with('/') {
            errors.push(ValidationError::InvalidValue {
                field: "api.prefix".to_string(),
                reason: format!("'{}' must start with '/'", api.prefix),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_storage(storage: &StorageSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if storage.key.is_empty() {
            errors.push(ValidationError::MissingField("storage.key".to_string()));
        } else if storage.key.contains(['/', '\\']) || storage.key == ".." {
            errors.push(ValidationError::InvalidValue {
                field: "storage.key".to_string(),
                reason: "Key must not contain path separators".to_string(),
            });
        }

        // The path only matters when documents go to disk
        if storage.backend == StorageBackend::File && storage.path.as_os_str().is_empty() {
            errors.push(ValidationError::MissingField("storage.path".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
