use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{is_transient, GenerationClient, GenerationError};
use crate::config::GeminiConfig;

const API_BASE: &str = "https://generativelanguage.googleapis.com";
const ATTEMPTS_PER_MODEL: u32 = 2;

/// Gemini `generateContent` client. Tries each configured model in preference
/// order, retrying overload statuses with a short backoff; any other error
/// status is terminal immediately.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent?key={}",
            API_BASE, self.config.endpoint, model, self.config.api_key
        )
    }

    async fn call_once(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        let payload = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let resp = self
            .http
            .post(self.url(model))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::new(None, format!("cerere eșuată: {e}")))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::new(
                Some(status),
                format!("API error: {status} - {body}"),
            ));
        }

        let data: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::new(None, format!("răspuns invalid: {e}")))?;
        data.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                GenerationError::new(None, "Format neașteptat al răspunsului API".to_string())
            })
    }
}

#[async_trait::async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        for model in &self.config.models {
            for attempt in 1..=ATTEMPTS_PER_MODEL {
                match self.call_once(model, prompt).await {
                    Ok(text) => {
                        debug!(%model, attempt, "gemini reply ok");
                        return Ok(text);
                    }
                    Err(e) if e.status.map(is_transient).unwrap_or(false) => {
                        warn!(%model, attempt, status = ?e.status, "gemini overloaded, backing off");
                        tokio::time::sleep(Duration::from_secs(2 * attempt as u64)).await;
                    }
                    Err(e) => {
                        warn!(%model, attempt, status = ?e.status, "gemini terminal error");
                        return Err(e);
                    }
                }
            }
            // overloaded on every attempt, fall through to the next model
        }
        Err(GenerationError::new(
            None,
            "Toate modelele sunt ocupate momentan (429/503). Încearcă din nou mai târziu."
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".into(),
            endpoint: "v1beta".into(),
            models: vec!["gemini-2.5-flash".into(), "gemini-2.0-flash".into()],
            timeout_seconds: 5,
        }
    }

    #[test]
    fn url_embeds_endpoint_model_and_key() {
        let client = GeminiClient::new(config()).unwrap();
        let url = client.url("gemini-2.5-flash");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=test-key"
        );
    }

    #[test]
    fn response_shape_parses_first_part() {
        let raw = serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Rețetă: omletă" } ] } }
            ]
        });
        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "Rețetă: omletă");
    }

    #[test]
    fn empty_candidates_is_tolerated_by_parser() {
        let parsed: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
