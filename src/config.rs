use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Gemini credentials plus the model preference order. Built once at startup
/// and injected into the client; nothing here is process-global.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub models: Vec<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
    pub minio_endpoint: String,
    pub minio_bucket: String,
    pub minio_access_key: String,
    pub minio_secret_key: String,
    pub detection_url: Option<String>,
    pub tts_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "chefgpt".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "chefgpt-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let gemini = GeminiConfig {
            api_key: std::env::var("GOOGLE_API_KEY")?,
            endpoint: std::env::var("GEMINI_ENDPOINT").unwrap_or_else(|_| "v1beta".into()),
            // GEMINI_MODEL prepends the preferred model; the flash variants
            // stay behind it as fallbacks, in fixed order.
            models: {
                let mut models: Vec<String> = Vec::new();
                if let Ok(m) = std::env::var("GEMINI_MODEL") {
                    models.push(m);
                }
                for m in ["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"] {
                    if !models.iter().any(|x| x == m) {
                        models.push(m.to_string());
                    }
                }
                models
            },
            timeout_seconds: std::env::var("GEMINI_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        Ok(Self {
            database_url,
            jwt,
            gemini,
            minio_endpoint: std::env::var("MINIO_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            minio_bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "chefgpt".into()),
            minio_access_key: std::env::var("MINIO_ACCESS_KEY")?,
            minio_secret_key: std::env::var("MINIO_SECRET_KEY")?,
            detection_url: std::env::var("DETECTION_URL").ok(),
            tts_url: std::env::var("TTS_URL").ok(),
        })
    }
}
