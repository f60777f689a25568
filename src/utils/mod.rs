pub mod file_operations;
pub mod gemini;
pub mod prompt;
pub mod report;

pub use file_operations::*;
pub use gemini::{GeminiClient, ScenarioGenerator};
pub use prompt::{build_request, AuditRequest};
pub use report::*;
