use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::GeminiConfig;
use crate::error::InvocationError;
use crate::models::{Severity, TestCase};
use crate::utils::prompt::AuditRequest;

/// Fuente de escenarios. Una llamada por auditoría, sin reintentos ni caché.
#[async_trait]
pub trait ScenarioGenerator: Send + Sync {
    async fn generate(&self, request: &AuditRequest) -> Result<Vec<TestCase>, InvocationError>;
}

/// Cliente de la API `generateContent` de Gemini
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, InvocationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ScenarioGenerator for GeminiClient {
    async fn generate(&self, request: &AuditRequest) -> Result<Vec<TestCase>, InvocationError> {
        let body = request_body(request, self.config.thinking_budget);

        info!(model = %self.config.model, "enviando petición de auditoría");

        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body_text, "el proveedor devolvió un error");
            return Err(InvocationError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let envelope: Value = serde_json::from_str(&body_text)?;
        let text = extract_text(&envelope);
        debug!(chars = text.len(), "respuesta recibida");

        parse_scenarios(&text)
    }
}

/// Cuerpo de la petición: instrucción de sistema, prompt y esquema de salida
pub fn request_body(request: &AuditRequest, thinking_budget: u32) -> Value {
    json!({
        "systemInstruction": {
            "parts": [ { "text": request.system_instruction } ]
        },
        "contents": [
            { "role": "user", "parts": [ { "text": request.prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.output_schema,
            "thinkingConfig": { "thinkingBudget": thinking_budget }
        }
    })
}

/// Concatena el texto del primer candidato, ignorando las partes de razonamiento.
/// Si no hay texto devuelve una cadena vacía.
pub fn extract_text(envelope: &Value) -> String {
    let parts = match envelope
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
    {
        Some(parts) => parts,
        None => return String::new(),
    };

    parts
        .iter()
        .filter(|p| !p.get("thought").and_then(|t| t.as_bool()).unwrap_or(false))
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect()
}

/// Convierte el texto del modelo en escenarios, validando cada registro.
/// Un texto vacío equivale a cero escenarios.
pub fn parse_scenarios(text: &str) -> Result<Vec<TestCase>, InvocationError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let payload: Value = serde_json::from_str(text)?;
    let items = payload.as_array().ok_or_else(|| {
        InvocationError::UnexpectedShape(format!("se esperaba una lista, llegó {}", kind(&payload)))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_record(index, item))
        .collect()
}

fn parse_record(index: usize, item: &Value) -> Result<TestCase, InvocationError> {
    let invalid = |reason: String| InvocationError::InvalidRecord { index, reason };

    let object = item
        .as_object()
        .ok_or_else(|| invalid(format!("se esperaba un objeto, llegó {}", kind(item))))?;

    let field = |name: &str| -> Result<String, InvocationError> {
        match object.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(invalid(format!("'{}' debe ser texto, llegó {}", name, kind(other)))),
            None => Err(invalid(format!("falta el campo '{}'", name))),
        }
    };

    let severity = field("severity")?;
    let severity = severity.parse::<Severity>().map_err(invalid)?;

    Ok(TestCase {
        category: field("category")?,
        severity,
        description: field("description")?,
        test_data: field("testData")?,
        expected_result: field("expectedResult")?,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "un booleano",
        Value::Number(_) => "un número",
        Value::String(_) => "texto",
        Value::Array(_) => "una lista",
        Value::Object(_) => "un objeto",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneratorParams, Platform};
    use crate::utils::prompt::build_request;

    fn record(severity: &str) -> Value {
        json!({
            "category": "API & Network",
            "severity": severity,
            "description": "Replay the same POST twice",
            "testData": "POST /orders with identical Idempotency-Key",
            "expectedResult": "Second call returns the original 201 body"
        })
    }

    #[test]
    fn empty_text_means_no_scenarios() {
        assert!(parse_scenarios("").unwrap().is_empty());
        assert!(parse_scenarios("  \n").unwrap().is_empty());
        assert!(parse_scenarios("[]").unwrap().is_empty());
    }

    #[test]
    fn keeps_return_order() {
        let text = json!([record("Low"), record("Critical"), record("Medium")]).to_string();
        let cases = parse_scenarios(&text).unwrap();

        let severities: Vec<Severity> = cases.iter().map(|c| c.severity).collect();
        assert_eq!(severities, vec![Severity::Low, Severity::Critical, Severity::Medium]);
        assert_eq!(cases[0].test_data, "POST /orders with identical Idempotency-Key");
    }

    #[test]
    fn malformed_json_is_an_invocation_error() {
        assert!(matches!(
            parse_scenarios("[{\"category\": "),
            Err(InvocationError::MalformedJson(_))
        ));
    }

    #[test]
    fn non_array_payload_is_rejected() {
        assert!(matches!(
            parse_scenarios("{\"scenarios\": []}"),
            Err(InvocationError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn missing_field_is_rejected_with_index() {
        let mut incomplete = record("High");
        incomplete.as_object_mut().unwrap().remove("expectedResult");
        let text = json!([record("High"), incomplete]).to_string();

        match parse_scenarios(&text) {
            Err(InvocationError::InvalidRecord { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("expectedResult"));
            }
            other => panic!("se esperaba InvalidRecord, llegó {:?}", other),
        }
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let text = json!([record("Blocker")]).to_string();
        assert!(matches!(
            parse_scenarios(&text),
            Err(InvocationError::InvalidRecord { index: 0, .. })
        ));
    }

    #[test]
    fn non_string_field_is_rejected() {
        let mut wrong = record("Low");
        wrong["testData"] = json!(42);
        let text = json!([wrong]).to_string();
        assert!(matches!(
            parse_scenarios(&text),
            Err(InvocationError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn extracts_text_skipping_thoughts() {
        let envelope = json!({
            "candidates": [ {
                "content": { "parts": [
                    { "text": "pensando...", "thought": true },
                    { "text": "[{\"a\":" },
                    { "text": "1}]" }
                ] }
            } ]
        });
        assert_eq!(extract_text(&envelope), "[{\"a\":1}]");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        assert_eq!(extract_text(&json!({})), "");
        assert_eq!(extract_text(&json!({ "candidates": [] })), "");
    }

    #[test]
    fn request_body_declares_json_schema() {
        let request = build_request(&GeneratorParams::new("Login", Platform::Web, ""));
        let body = request_body(&request, 6000);

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], request.output_schema);
        assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 6000);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], request.system_instruction);
        assert_eq!(body["contents"][0]["parts"][0]["text"], request.prompt);
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::models::{GeneratorParams, Platform};
    use crate::utils::prompt::build_request;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Atiende una única petición con la respuesta indicada
    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Leer cabeceras y cuerpo completos antes de responder
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            if name.eq_ignore_ascii_case("content-length") {
                                value.trim().parse::<usize>().ok()
                            } else {
                                None
                            }
                        })
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> GeminiClient {
        let mut config = GeminiConfig::new("test-key");
        config.base_url = base_url;
        GeminiClient::new(config).unwrap()
    }

    fn request() -> AuditRequest {
        build_request(&GeneratorParams::new("Login", Platform::Web, ""))
    }

    #[tokio::test]
    async fn server_error_becomes_status_error() {
        let base = serve_once("500 Internal Server Error", "{\"error\":\"boom\"}".to_string()).await;

        let result = client_for(base).generate(&request()).await;

        match result {
            Err(InvocationError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("se esperaba Status, llegó {:?}", other),
        }
    }

    #[tokio::test]
    async fn envelope_without_candidates_is_zero_scenarios() {
        let base = serve_once("200 OK", "{\"candidates\":[]}".to_string()).await;

        let cases = client_for(base).generate(&request()).await.unwrap();

        assert!(cases.is_empty());
    }

    #[tokio::test]
    async fn well_formed_envelope_yields_scenarios() {
        let text = json!([{
            "category": "Security & Input",
            "severity": "High",
            "description": "SQL injection in the username",
            "testData": "' OR 1=1 --",
            "expectedResult": "400 and no query executed"
        }])
        .to_string();
        let envelope = json!({ "candidates": [ { "content": { "parts": [ { "text": text } ] } } ] });
        let base = serve_once("200 OK", envelope.to_string()).await;

        let cases = client_for(base).generate(&request()).await.unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].severity, Severity::High);
        assert_eq!(cases[0].test_data, "' OR 1=1 --");
    }

    #[tokio::test]
    async fn malformed_part_text_is_malformed_json() {
        let envelope = json!({
            "candidates": [ { "content": { "parts": [ { "text": "[{\"category\": " } ] } } ]
        });
        let base = serve_once("200 OK", envelope.to_string()).await;

        let result = client_for(base).generate(&request()).await;

        assert!(matches!(result, Err(InvocationError::MalformedJson(_))));
    }

    #[tokio::test]
    async fn closed_port_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(format!("http://{}", addr)).generate(&request()).await;

        assert!(matches!(result, Err(InvocationError::Transport(_))));
    }
}
