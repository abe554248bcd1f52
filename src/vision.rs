use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

/// Ingredient detection boundary. The model itself (a YOLO-style object
/// detector) runs behind an HTTP service; this side only sends the image and
/// receives class labels.
#[async_trait]
pub trait DetectionClient: Send + Sync {
    async fn detect(&self, image: Bytes, content_type: &str) -> anyhow::Result<Vec<String>>;
}

pub struct HttpDetector {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    labels: Vec<String>,
}

impl HttpDetector {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl DetectionClient for HttpDetector {
    async fn detect(&self, image: Bytes, content_type: &str) -> anyhow::Result<Vec<String>> {
        let resp = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await?
            .error_for_status()?;
        let data: DetectResponse = resp.json().await?;
        let ingredients = dedup_labels(data.labels);
        info!(?ingredients, "ingredients detected");
        Ok(ingredients)
    }
}

/// The detector reports one label per bounding box; collapse repeats while
/// keeping first-seen order.
pub(crate) fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    labels
        .into_iter()
        .filter(|l| seen.insert(l.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let labels = vec![
            "ou".to_string(),
            "lapte".to_string(),
            "ou".to_string(),
            "Ou".to_string(),
            "branza".to_string(),
        ];
        assert_eq!(dedup_labels(labels), vec!["ou", "lapte", "branza"]);
    }

    #[test]
    fn empty_detection_stays_empty() {
        assert!(dedup_labels(Vec::new()).is_empty());
    }
}
