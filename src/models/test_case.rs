use serde::{Deserialize, Serialize};
use crate::models::Severity;

/// Escenario destructivo devuelto por el modelo. No se modifica tras crearse.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub category: String,
    pub severity: Severity,
    pub description: String,
    pub test_data: String,
    pub expected_result: String,
}
