use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::{AppState, AuthUser};
use crate::models::{Annonce, AnnonceResponse};
use crate::utils::validators::validate_code_annonce;

/// Réponse au basculement
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct WishlistToggleResponse {
    pub added: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(my_wishlist))
        .route("/:code/toggle", post(toggle))
}

/// Ajout/retrait d'une annonce de la liste de souhaits
///
/// L'inversion d'appartenance est atomique : suppression d'abord, insertion
/// sinon, dans une même transaction, avec une contrainte UNIQUE sur le couple
/// (client, annonce). Deux requêtes concurrentes ne peuvent ni dupliquer la
/// ligne ni perdre une bascule.
#[utoipa::path(
    post,
    path = "/api/v1/wishlist/{code}/toggle",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "Code de l'annonce")
    ),
    responses(
        (status = 200, description = "Nouvel état d'appartenance", body = WishlistToggleResponse),
        (status = 401, description = "Non autorisé"),
        (status = 404, description = "Annonce introuvable")
    )
)]
pub async fn toggle(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<Value>> {
    if !validate_code_annonce(&code) {
        return Err(AppError::BadRequest("Code d'annonce invalide".to_string()));
    }

    let exists: Option<(i32,)> =
        sqlx::query_as("SELECT 1 FROM annonces WHERE code = $1 AND enabled = true")
            .bind(&code)
            .fetch_optional(&state.pool)
            .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Annonce introuvable".to_string()));
    }

    let mut tx = state.pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM wishlists WHERE client_id = $1 AND annonce_code = $2")
        .bind(auth_user.id)
        .bind(&code)
        .execute(&mut *tx)
        .await?;

    let added = if deleted.rows_affected() > 0 {
        false
    } else {
        sqlx::query(
            r#"
            INSERT INTO wishlists (client_id, annonce_code)
            VALUES ($1, $2)
            ON CONFLICT (client_id, annonce_code) DO NOTHING
            "#,
        )
        .bind(auth_user.id)
        .bind(&code)
        .execute(&mut *tx)
        .await?;
        true
    };

    tx.commit().await?;

    Ok(Json(json!({"added": added})))
}

/// Annonces enregistrées par le client connecté
#[utoipa::path(
    get,
    path = "/api/v1/wishlist",
    tag = "wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Liste de souhaits", body = Vec<AnnonceResponse>),
        (status = 401, description = "Non autorisé")
    )
)]
pub async fn my_wishlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<AnnonceResponse>>> {
    let annonces = sqlx::query_as::<_, Annonce>(
        r#"
        SELECT a.* FROM annonces a
        JOIN wishlists w ON w.annonce_code = a.code
        WHERE w.client_id = $1 AND a.enabled = true
        ORDER BY w.created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for annonce in annonces {
        response.push(
            super::annonces::build_annonce_response(&state, &annonce, Some(auth_user.id)).await?,
        );
    }

    Ok(Json(response))
}
