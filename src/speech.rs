use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Text-to-speech boundary. Synthesis failures are surfaced to the caller,
/// who decides whether the missing audio is user-visible.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Returns a URL to the synthesized audio clip.
    async fn synthesize(&self, text: &str) -> anyhow::Result<String>;
}

pub struct HttpTts {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct TtsResponse {
    audio_url: String,
}

impl HttpTts {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl SpeechClient for HttpTts {
    async fn synthesize(&self, text: &str) -> anyhow::Result<String> {
        let resp = self
            .http
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?;
        let data: TtsResponse = resp.json().await?;
        Ok(data.audio_url)
    }
}
