//! OpenAI-compatible chat-completions gateway.
//!
//! # Responsibility
//! - Send one system + user message pair to `{base_url}/chat/completions`.
//! - Map every failure mode to `GatewayError::Unavailable`.
//!
//! # Invariants
//! - One HTTP request per call; no retries, no streaming.
//! - Prompt and reply text are never logged, only lengths and timings.

use super::{GatewayError, GatewayResult, ModelGateway};
use crate::config::ModelConfig;
use log::{error, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking HTTP gateway for OpenAI-compatible endpoints.
pub struct HttpGateway {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
    timeout_secs: u64,
}

impl HttpGateway {
    /// Builds a gateway from a validated remote configuration.
    ///
    /// # Errors
    /// - `InvalidConfig` when `base_url` is missing or the config is invalid.
    /// - `InvalidConfig` when the HTTP client cannot be constructed.
    pub fn new(config: &ModelConfig) -> GatewayResult<Self> {
        config
            .validate()
            .map_err(|err| GatewayError::InvalidConfig(err.to_string()))?;
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| GatewayError::InvalidConfig("model base url is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(
                CONNECT_TIMEOUT_SECS.min(config.timeout_secs),
            ))
            .build()
            .map_err(|err| GatewayError::InvalidConfig(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: completions_url(base_url),
            model: config.model.trim().to_string(),
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Full chat-completions URL this gateway posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send(&self, request: &ChatRequest<'_>) -> GatewayResult<String> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().map_err(|err| {
            if err.is_timeout() {
                GatewayError::unavailable(format!(
                    "request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                GatewayError::unavailable(format!("request failed: {err}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| GatewayError::unavailable(format!("failed to read reply body: {err}")))?;
        if !status.is_success() {
            return Err(GatewayError::unavailable(format!(
                "endpoint returned status {}: {}",
                status.as_u16(),
                truncate_for_error(&body)
            )));
        }

        extract_completion(&body)
    }
}

impl ModelGateway for HttpGateway {
    fn respond(&self, system_instruction: &str, user_instruction: &str) -> GatewayResult<String> {
        let started_at = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: user_instruction,
                },
            ],
            temperature: self.temperature,
            stream: false,
        };

        match self.send(&request) {
            Ok(reply) => {
                info!(
                    "event=model_call module=gateway status=ok duration_ms={} prompt_len={} reply_len={}",
                    started_at.elapsed().as_millis(),
                    user_instruction.len(),
                    reply.len()
                );
                Ok(reply)
            }
            Err(err) => {
                error!(
                    "event=model_call module=gateway status=error duration_ms={} error_code=model_unavailable error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim().trim_end_matches('/'))
}

/// Pulls the first choice's message text out of a chat-completions body.
fn extract_completion(body: &str) -> GatewayResult<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|err| GatewayError::unavailable(format!("undecodable reply: {err}")))?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(GatewayError::unavailable("reply contained no text"));
    }
    Ok(content)
}

fn truncate_for_error(body: &str) -> String {
    let flattened = body.replace(['\n', '\r'], " ");
    let mut truncated: String = flattened.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if flattened.chars().count() > MAX_ERROR_BODY_CHARS {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{completions_url, extract_completion, truncate_for_error, HttpGateway};
    use crate::config::ModelConfig;
    use crate::gateway::{GatewayError, ModelGateway};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answers one request on a local port with `status_line` and `body`.
    ///
    /// The join handle yields the raw request (headers and body).
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (base_url, handle)
    }

    fn read_request(stream: &mut impl Read) -> String {
        let mut raw = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(raw).unwrap()
    }

    fn local_gateway(base_url: String, api_key: Option<&str>) -> HttpGateway {
        HttpGateway::new(&ModelConfig {
            base_url: Some(base_url),
            api_key: api_key.map(str::to_string),
            timeout_secs: 5,
            ..ModelConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn completions_url_normalizes_trailing_slash() {
        assert_eq!(
            completions_url("https://api.example.com/v1/"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url(" http://127.0.0.1:11434/v1 "),
            "http://127.0.0.1:11434/v1/chat/completions"
        );
    }

    #[test]
    fn extract_completion_returns_first_choice_verbatim() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "  hi  "}}, {"message": {"content": "second"}}]}"#;
        assert_eq!(extract_completion(body).unwrap(), "  hi  ");
    }

    #[test]
    fn extract_completion_rejects_empty_or_malformed_bodies() {
        for body in [
            r#"{"choices": []}"#,
            r#"{"choices": [{"message": {"content": null}}]}"#,
            r#"{"choices": [{"message": {"content": "   "}}]}"#,
            "<html>bad gateway</html>",
        ] {
            assert!(
                matches!(
                    extract_completion(body),
                    Err(GatewayError::Unavailable { .. })
                ),
                "{body}"
            );
        }
    }

    #[test]
    fn error_body_is_flattened_and_capped() {
        let body = format!("line1\n{}", "y".repeat(300));
        let truncated = truncate_for_error(&body);
        assert!(!truncated.contains('\n'));
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }

    #[test]
    fn new_requires_base_url() {
        let result = HttpGateway::new(&ModelConfig::default());
        assert!(matches!(result, Err(GatewayError::InvalidConfig(_))));
    }

    #[test]
    fn unreachable_endpoint_surfaces_as_unavailable() {
        let config = ModelConfig {
            base_url: Some("http://127.0.0.1:9/v1".to_string()),
            timeout_secs: 2,
            ..ModelConfig::default()
        };
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(
            gateway.endpoint(),
            "http://127.0.0.1:9/v1/chat/completions"
        );
        let err = gateway.respond("system", "user").unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable { .. }));
    }

    #[test]
    fn success_reply_is_returned_verbatim() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"choices": [{"message": {"role": "assistant", "content": "Plan ready\n- Day 1"}}]}"#,
        );
        let gateway = local_gateway(base_url, Some("sk-local"));

        let reply = gateway.respond("be brief", "plan graphs").unwrap();
        assert_eq!(reply, "Plan ready\n- Day 1");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /v1/chat/completions "));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-local"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["model"], "gpt-4o-mini");
        assert_eq!(sent["stream"], false);
        assert_eq!(sent["messages"][0]["role"], "system");
        assert_eq!(sent["messages"][0]["content"], "be brief");
        assert_eq!(sent["messages"][1]["role"], "user");
        assert_eq!(sent["messages"][1]["content"], "plan graphs");
    }

    #[test]
    fn rate_limited_reply_is_unavailable_with_status() {
        let (base_url, server) = serve_once(
            "429 Too Many Requests",
            r#"{"error": {"message": "rate limit reached"}}"#,
        );
        let gateway = local_gateway(base_url, None);

        let reason = match gateway.respond("system", "user") {
            Err(GatewayError::Unavailable { reason }) => reason,
            other => panic!("expected Unavailable, got {other:?}"),
        };
        assert!(reason.contains("status 429"), "{reason}");
        assert!(reason.contains("rate limit reached"), "{reason}");

        let request = server.join().unwrap();
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }
}
