use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nivel de severidad de un escenario destructivo
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Literal exacto que aparece en el esquema, el prompt y el CSV
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// Etiqueta con icono para la tabla de la terminal
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "💀 Critical",
            Severity::High => "🔥 High",
            Severity::Medium => "⚠️ Medium",
            Severity::Low => "🔹 Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .iter()
            .copied()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| format!("severidad desconocida: '{}'", s))
    }
}
