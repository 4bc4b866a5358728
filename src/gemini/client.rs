use super::types::{GenerateContentRequest, GenerateContentResponse, ModelInfo};
use super::GeminiError;
use crate::config::Config;
use crate::prompt::Prompt;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for a single Gemini-compatible endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl GeminiClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.gemini_api_base_url.trim_end_matches('/').to_string(),
            max_attempts: config.gemini_max_attempts.max(1),
            retry_delay: config.gemini_retry_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn model_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}",
            self.base_url,
            model.trim().trim_start_matches("models/")
        )
    }

    /// Sends `prompt` and returns the first candidate's text.
    ///
    /// A non-200 status, a transport error or a 200 without any text all count
    /// as a failed attempt. After `max_attempts` failures the last raw body (or
    /// transport error) is returned inside [`GeminiError::Exhausted`].
    pub async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &Prompt,
    ) -> Result<String, GeminiError> {
        let url = format!("{}:generateContent", self.model_url(model));
        let body = GenerateContentRequest::new(&prompt.text, prompt.system_instruction.as_deref());
        let mut last_response = String::new();

        for attempt in 1..=self.max_attempts {
            debug!(
                "Gemini: generateContent attempt {}/{} with model {}",
                attempt, self.max_attempts, model
            );

            let result = self
                .http
                .post(&url)
                .query(&[("key", api_key)])
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(raw) if status == StatusCode::OK => {
                            match serde_json::from_str::<GenerateContentResponse>(&raw) {
                                Ok(parsed) => {
                                    if let Some(text) = parsed.first_text() {
                                        info!(
                                            "Gemini: response received on attempt {} ({} chars)",
                                            attempt,
                                            text.chars().count()
                                        );
                                        return Ok(text.to_string());
                                    }
                                    warn!("Gemini: attempt {} returned 200 without text", attempt);
                                }
                                Err(e) => {
                                    warn!("Gemini: attempt {} returned unreadable body: {}", attempt, e);
                                }
                            }
                            last_response = raw;
                        }
                        Ok(raw) => {
                            warn!("Gemini: attempt {} failed with status {}", attempt, status);
                            last_response = raw;
                        }
                        Err(e) => {
                            let e = e.without_url();
                            warn!("Gemini: attempt {} failed reading body: {}", attempt, e);
                            last_response = e.to_string();
                        }
                    }
                }
                Err(e) => {
                    // The request URL carries the API key.
                    let e = e.without_url();
                    warn!("Gemini: attempt {} transport error: {}", attempt, e);
                    last_response = e.to_string();
                }
            }

            if attempt < self.max_attempts && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(GeminiError::Exhausted {
            attempts: self.max_attempts,
            last_response,
        })
    }

    /// Checks that `api_key` can see `model` via the model-info endpoint.
    pub async fn validate_key(&self, api_key: &str, model: &str) -> Result<bool, GeminiError> {
        let response = self
            .http
            .get(self.model_url(model))
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.without_url()))?;

        let status = response.status();
        if status != StatusCode::OK {
            info!("Gemini: key check for model {} returned {}", model, status);
            return Ok(false);
        }

        match response.json::<ModelInfo>().await {
            Ok(info) => debug!(
                "Gemini: key check ok for {} ({})",
                info.name,
                info.display_name.as_deref().unwrap_or("-")
            ),
            Err(e) => debug!("Gemini: key check ok, model info unreadable: {}", e.without_url()),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> GeminiClient {
        let mut config = test_config();
        config.gemini_api_base_url = server.url();
        GeminiClient::new(&config, reqwest::Client::new())
    }

    const OK_BODY: &str =
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hola"}]},"finishReason":"STOP"}]}"#;

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-model:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }],
                "systemInstruction": { "parts": [{ "text": "sys" }] }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(OK_BODY)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let prompt = Prompt {
            text: "Hello".to_string(),
            system_instruction: Some("sys".to_string()),
        };
        let text = client.generate("test-key", "test-model", &prompt).await.unwrap();

        assert_eq!(text, "Hola");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_retries_then_reports_last_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/test-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"error":{"code":503,"message":"overloaded"}}"#)
            .expect(3)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .generate("test-key", "test-model", &Prompt::question("q", ""))
            .await
            .unwrap_err();

        match &err {
            GeminiError::Exhausted {
                attempts,
                last_response,
            } => {
                assert_eq!(*attempts, 3);
                assert!(last_response.contains("overloaded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("overloaded"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_stops_at_first_success() {
        let mut server = Server::new_async().await;
        // mockito serves the earliest mock still missing hits first.
        let failing = server
            .mock("POST", "/models/test-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"error":{"code":503,"message":"overloaded"}}"#)
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("POST", "/models/test-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(OK_BODY)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let text = client
            .generate("test-key", "test-model", &Prompt::question("q", ""))
            .await
            .unwrap();

        assert_eq!(text, "Hola");
        failing.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_treats_empty_candidates_as_failure() {
        let mut server = Server::new_async().await;
        let blocked = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let mock = server
            .mock("POST", "/models/test-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(blocked)
            .expect(3)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .generate("k", "models/test-model", &Prompt::question("q", ""))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GeminiError::Exhausted { ref last_response, .. } if last_response == blocked
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_transport_error_hides_key() {
        let mut config = test_config();
        // Nothing listens on port 9 locally.
        config.gemini_api_base_url = "http://127.0.0.1:9".to_string();
        config.gemini_max_attempts = 2;
        let client = GeminiClient::new(&config, reqwest::Client::new());

        let err = client
            .generate("super-secret", "test-model", &Prompt::question("q", ""))
            .await
            .unwrap_err();

        let GeminiError::Exhausted {
            attempts,
            last_response,
        } = err
        else {
            panic!("expected exhausted error");
        };
        assert_eq!(attempts, 2);
        assert!(!last_response.is_empty());
        assert!(!last_response.contains("super-secret"));
    }

    #[tokio::test]
    async fn test_validate_key() {
        let mut server = Server::new_async().await;
        let good = server
            .mock("GET", "/models/test-model")
            .match_query(Matcher::UrlEncoded("key".into(), "good".into()))
            .with_status(200)
            .with_body(r#"{"name":"models/test-model","displayName":"Test"}"#)
            .create_async()
            .await;
        let bad = server
            .mock("GET", "/models/test-model")
            .match_query(Matcher::UrlEncoded("key".into(), "bad".into()))
            .with_status(400)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.validate_key("good", "test-model").await.unwrap());
        assert!(!client.validate_key("bad", "test-model").await.unwrap());

        good.assert_async().await;
        bad.assert_async().await;
    }
}
