use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nivel de infraestructura sobre el que corre la funcionalidad auditada
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Web,
    Mobile,
    Api,
    Database,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Web,
        Platform::Mobile,
        Platform::Api,
        Platform::Database,
    ];

    /// Valor que se interpola en el prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Web => "Web",
            Platform::Mobile => "Mobile (iOS/Android)",
            Platform::Api => "API",
            Platform::Database => "Database",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
