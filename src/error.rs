//! Errores de la auditoría
//!
//! Solo dos tipos llegan al usuario:
//! - `ValidationError`: falta el nombre de la funcionalidad, no se llama al modelo
//! - `InvocationError`: cualquier fallo de la llamada remota

/// Entrada del formulario inválida
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("el nombre de la funcionalidad es obligatorio")]
    MissingFeatureName,
}

/// Fallo de la llamada al modelo
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// Error de red o de construcción del cliente
    #[error("error de transporte: {0}")]
    Transport(#[from] reqwest::Error),

    /// El proveedor respondió con un estado no exitoso
    #[error("el proveedor respondió {status}: {body}")]
    Status { status: u16, body: String },

    /// El texto devuelto no es JSON válido
    #[error("JSON mal formado: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// JSON válido pero no es una lista de escenarios
    #[error("forma inesperada de la respuesta: {0}")]
    UnexpectedShape(String),

    /// Un registro no cumple el esquema declarado
    #[error("registro {index} inválido: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Resultado fallido de un envío del formulario
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("ya hay una auditoría en curso")]
    Busy,

    #[error("auditoría cancelada")]
    Cancelled,
}

impl AuditError {
    /// Mensaje que se muestra al usuario. El detalle de la invocación solo va al log.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuditError::Validation(_) => {
                "Requerido: introduce el nombre de la funcionalidad a auditar."
            }
            AuditError::Invocation(_) => {
                "Error crítico: no se pudo comunicar con el motor de auditoría. Revisa la conectividad."
            }
            AuditError::Busy => "Ya hay una auditoría en curso. Espera a que termine.",
            AuditError::Cancelled => "Auditoría cancelada.",
        }
    }
}

/// Configuración incompleta o inválida
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no se encontró la clave API (API_KEY o GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("valor inválido para {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}
