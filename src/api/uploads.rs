use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::{AppState, AuthUser};
use crate::services::{
    file_service::{validate_image_content_type, MAX_IMAGE_SIZE},
    FileService,
};

/// Réponse au téléversement d'une image
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/images", post(upload_image))
}

/// Téléversement d'une image d'annonce
#[utoipa::path(
    post,
    path = "/api/v1/uploads/images",
    tag = "uploads",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image enregistrée", body = UploadResponse),
        (status = 400, description = "Fichier invalide"),
        (status = 401, description = "Non autorisé")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<Value>> {
    let file_service = FileService::new(&state.config);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "image" {
            let content_type = field
                .content_type()
                .ok_or_else(|| AppError::BadRequest("Content-Type absent".to_string()))?
                .to_string();

            if !validate_image_content_type(&content_type) {
                return Err(AppError::BadRequest(
                    "Format d'image non pris en charge".to_string(),
                ));
            }

            let file_name = field.file_name().unwrap_or("image.jpg").to_string();

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            if data.len() > MAX_IMAGE_SIZE {
                return Err(AppError::BadRequest("Fichier trop volumineux".to_string()));
            }

            let url = file_service
                .save_file("annonces", &file_name, data.to_vec())
                .await?;

            return Ok(Json(json!({
                "success": true,
                "url": url
            })));
        }
    }

    Err(AppError::BadRequest("Aucun fichier reçu".to_string()))
}
