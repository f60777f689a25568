use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::Platform;

/// Parámetros de una auditoría. Se construyen de nuevo en cada envío.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorParams {
    pub feature_name: String,
    pub platform: Platform,
    pub context: String,
}

impl GeneratorParams {
    pub fn new(feature_name: impl Into<String>, platform: Platform, context: impl Into<String>) -> Self {
        Self {
            feature_name: feature_name.into(),
            platform,
            context: context.into(),
        }
    }

    /// Un nombre de funcionalidad vacío (o solo espacios) nunca llega al modelo
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.feature_name.trim().is_empty() {
            return Err(ValidationError::MissingFeatureName);
        }
        Ok(())
    }
}
