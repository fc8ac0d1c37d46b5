use crate::errors::{AgriChatError, AgriChatResult};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Instant;

// Constants for the backend bridge contract
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const CHAT_ENDPOINT: &str = "/chat";

/// Substituted when a successful response carries no `reply` field.
pub const MISSING_REPLY_FALLBACK: &str = "Sorry, I couldn't generate a response.";

/// Sends one user message to the backend bridge and returns the reply text.
/// Transport failures and non-success statuses both come back as a single
/// backend error; the caller decides what the user sees.
pub async fn request_reply(client: &Client, base_url: &str, text: &str) -> AgriChatResult<String> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), CHAT_ENDPOINT);
    let payload = json!({ "text": text });

    let started = Instant::now();
    let response = client
        .post(&url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| AgriChatError::backend_error(format!("request failed: {}", e)))?;

    let status = response.status();
    log::info!(
        "POST {} - {} - {}ms",
        url,
        status,
        started.elapsed().as_millis()
    );

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(AgriChatError::backend_error(format!(
            "backend returned error: {} - {}",
            status, error_text
        )));
    }

    let body: Value = response.json().await.map_err(|e| {
        AgriChatError::backend_error(format!("failed to parse backend response: {}", e))
    })?;

    Ok(body["reply"]
        .as_str()
        .unwrap_or(MISSING_REPLY_FALLBACK)
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn returns_reply_text_on_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({ "text": "hello" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "reply": "Hello farmer" })),
            )
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let reply = request_reply(&client, &mock_server.uri(), "hello")
            .await
            .unwrap();
        assert_eq!(reply, "Hello farmer");
    }

    #[tokio::test]
    async fn falls_back_when_reply_field_is_missing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let reply = request_reply(&client, &mock_server.uri(), "hello")
            .await
            .unwrap();
        assert_eq!(reply, MISSING_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let result = request_reply(&client, &mock_server.uri(), "hello").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        // Nothing listens here
        let client = Client::new();
        let result = request_reply(&client, "http://127.0.0.1:1", "hello").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn trailing_slash_on_base_url_is_tolerated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "ok" })))
            .mount(&mock_server)
            .await;

        let client = Client::new();
        let base = format!("{}/", mock_server.uri());
        let reply = request_reply(&client, &base, "hello").await.unwrap();
        assert_eq!(reply, "ok");
    }
}
