use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{assistant::prompts, auth::jwt::AuthUser, state::AppState};

const PHOTO_URL_TTL_SECS: u64 = 600;

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_fridge_photo))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub photo_url: String,
    pub ingredients: Vec<String>,
    pub recipes: String,
    /// Absent when TTS is unconfigured or failed; the reason is logged.
    pub audio_url: Option<String>,
}

/// Fridge photo flow: store the photo, detect ingredients, propose recipes.
/// A generation failure degrades to a friendly reply that still carries the
/// detected ingredients; missing audio is never an error.
#[instrument(skip(state, mp))]
pub async fn upload_fridge_photo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let Some(detector) = state.detector.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Detection service not configured".into(),
        ));
    };

    let mut image: Option<(Bytes, String)> = None;
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some("image") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field.bytes().await.map_err(internal)?;
            image = Some((data, content_type));
        }
    }
    let Some((body, content_type)) = image else {
        return Err((StatusCode::BAD_REQUEST, "image is required".into()));
    };

    let photo_id = Uuid::new_v4();
    let ext = ext_from_mime(&content_type).unwrap_or("bin");
    let key = format!("fridge/{}/{}.{}", user_id, photo_id, ext);
    state
        .storage
        .put_object(&key, body.clone(), &content_type)
        .await
        .map_err(internal)?;
    sqlx::query(r#"INSERT INTO photos (id, user_id, s3_key) VALUES ($1, $2, $3)"#)
        .bind(photo_id)
        .bind(user_id)
        .bind(&key)
        .execute(&state.db)
        .await
        .map_err(internal)?;

    let ingredients = detector
        .detect(body, &content_type)
        .await
        .map_err(internal)?;

    let recipes = match state
        .ai
        .generate(&prompts::detected_recipes(&ingredients))
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "recipe generation failed for upload, degrading");
            let detected = if ingredients.is_empty() {
                "—".to_string()
            } else {
                ingredients.join(", ")
            };
            format!(
                "Nu am putut genera rețete acum (serviciul AI a răspuns lent).\n\n\
                 Ingrediente detectate: {detected}.\n\
                 Te rog reîncearcă în câteva secunde."
            )
        }
    };

    let audio_url = match state.speech.as_ref() {
        Some(speech) => {
            let line = format!(
                "Am găsit {}. Iată câteva idei de rețete!",
                ingredients.join(", ")
            );
            match speech.synthesize(&line).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(error = %e, "tts unavailable, continuing without audio");
                    None
                }
            }
        }
        None => None,
    };

    let photo_url = state
        .storage
        .presign_get(&key, PHOTO_URL_TTL_SECS)
        .await
        .map_err(internal)?;

    Ok(Json(UploadResponse {
        photo_url,
        ingredients,
        recipes,
        audio_url,
    }))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ext_from_mime_covers_the_image_types() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }
}
