use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{GeneratorParams, Severity};

/// Categorías que el modelo debe cubrir obligatoriamente
pub const REQUIRED_CATEGORIES: [&str; 5] = [
    "Security & Input",
    "API & Network",
    "Concurrency & State",
    "Business Logic & Edge Cases",
    "Data & Limits",
];

/// Campos obligatorios de cada escenario, con el nombre que usa el JSON
pub const REQUIRED_FIELDS: [&str; 5] = [
    "category",
    "severity",
    "description",
    "testData",
    "expectedResult",
];

pub const SYSTEM_INSTRUCTION: &str = "You are a Principal Software Development Engineer in Test (SDET).
Your job is not to check input fields one by one but to stress-test the whole system architecture.
You reason through four lenses:
1. DISTRIBUTED SYSTEMS (latency, timeouts, race conditions)
2. API CONTRACTS (headers, auth, status codes)
3. BUSINESS LOGIC (impossible states, workflow violations)
4. DATA INTEGRITY (database commits, rollbacks)

You never write happy-path tests. You write destructive tests that expose architectural weaknesses.";

/// Petición lista para enviar al modelo
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuditRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub output_schema: Value,
}

/// Construye la petición de auditoría. Asume que `params` ya fue validado.
pub fn build_request(params: &GeneratorParams) -> AuditRequest {
    AuditRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        prompt: build_prompt(params),
        output_schema: output_schema(),
    }
}

/// Los tres campos se interpolan tal cual, sin escapar
pub fn build_prompt(params: &GeneratorParams) -> String {
    let severities = Severity::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Generate a comprehensive QA test matrix for the following feature:

**Feature:** {feature}
**Platform:** {platform}
**Context:** {context}

**REQUIRED TEST CATEGORIES (cover every one):**
1. 🛡️ **{c1}**: SQL injection, XSS, overflow, nulls, special characters.
2. 🌐 **{c2}**:
   - Handling of HTTP 429 (rate limit), 500 (server error), 503 (service unavailable).
   - Slow network (latency) and request timeouts.
   - Malformed JSON payloads and invalid auth tokens.
3. ⚡ **{c3}**:
   - Race conditions (e.g. double-clicking submit).
   - Idempotency (replaying the same API request).
   - Session expiry in the middle of the flow.
4. 💼 **{c4}**:
   - \"Impossible\" logic (e.g. start date after end date, negative price).
   - Role violations (e.g. a 'Viewer' trying to 'Edit').
5. 💾 **{c5}**:
   - Maximum payload size limits.
   - Emoji and Unicode storage verification.

Return a structured JSON list of test cases. Every item must include: {fields}.
Severity must be one of: {severities}.
Use testData for the specific payload or action and expectedResult for the technical expected result.",
        feature = params.feature_name,
        platform = params.platform.as_str(),
        context = params.context,
        c1 = REQUIRED_CATEGORIES[0],
        c2 = REQUIRED_CATEGORIES[1],
        c3 = REQUIRED_CATEGORIES[2],
        c4 = REQUIRED_CATEGORIES[3],
        c5 = REQUIRED_CATEGORIES[4],
        fields = REQUIRED_FIELDS.join(", "),
        severities = severities,
    )
}

/// Esquema de salida en el formato `responseSchema` de Gemini
pub fn output_schema() -> Value {
    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "category": {
                    "type": "STRING",
                    "description": "One of the required test categories."
                },
                "severity": {
                    "type": "STRING",
                    "enum": severities
                },
                "description": {
                    "type": "STRING",
                    "description": "Destructive scenario description."
                },
                "testData": {
                    "type": "STRING",
                    "description": "Specific payload, input, or system state to simulate."
                },
                "expectedResult": {
                    "type": "STRING",
                    "description": "How the system should fail gracefully or protect itself."
                }
            },
            "required": REQUIRED_FIELDS
        }
    })
}
