use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{is_admin, AppState, AuthUser};
use crate::models::{
    note_valide, Commentaire, CommentaireResponse, CreateCommentaireRequest,
};

// Montées sous /annonces : avis publics et dépôt d'avis
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:code/commentaires", get(list_commentaires))
        .route("/:code/commentaires", post(create_commentaire))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_commentaires))
        .route("/:id/moderation", put(toggle_moderation))
        .route("/:id", delete(delete_commentaire))
}

async fn build_commentaire_response(
    state: &AppState,
    commentaire: Commentaire,
) -> AppResult<CommentaireResponse> {
    let auteur: (String, String) =
        sqlx::query_as("SELECT nom, prenoms FROM clients WHERE id = $1")
            .bind(commentaire.client_id)
            .fetch_one(&state.pool)
            .await?;

    Ok(CommentaireResponse {
        id: commentaire.id,
        annonce_code: commentaire.annonce_code,
        auteur: format!("{} {}", auteur.1, auteur.0).trim().to_string(),
        note: commentaire.note,
        contenu: commentaire.contenu,
        active: commentaire.active,
        created_at: commentaire.created_at,
    })
}

/// Avis publiés sur une annonce
#[utoipa::path(
    get,
    path = "/api/v1/annonces/{code}/commentaires",
    tag = "commentaires",
    params(
        ("code" = String, Path, description = "Code de l'annonce")
    ),
    responses(
        (status = 200, description = "Avis actifs", body = Vec<CommentaireResponse>)
    )
)]
pub async fn list_commentaires(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Vec<CommentaireResponse>>> {
    let commentaires = sqlx::query_as::<_, Commentaire>(
        r#"
        SELECT * FROM commentaires
        WHERE annonce_code = $1 AND active = true
        ORDER BY created_at DESC
        "#,
    )
    .bind(&code)
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for commentaire in commentaires {
        response.push(build_commentaire_response(&state, commentaire).await?);
    }

    Ok(Json(response))
}

/// Dépôt d'un avis (en attente de modération)
#[utoipa::path(
    post,
    path = "/api/v1/annonces/{code}/commentaires",
    tag = "commentaires",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "Code de l'annonce")
    ),
    request_body = CreateCommentaireRequest,
    responses(
        (status = 200, description = "Avis déposé", body = CommentaireResponse),
        (status = 400, description = "Note hors de l'intervalle 1-5"),
        (status = 404, description = "Annonce introuvable")
    )
)]
pub async fn create_commentaire(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<CreateCommentaireRequest>,
) -> AppResult<Json<CommentaireResponse>> {
    if !note_valide(payload.note) {
        return Err(AppError::BadRequest(
            "La note doit être comprise entre 1 et 5".to_string(),
        ));
    }

    let exists: Option<(i32,)> =
        sqlx::query_as("SELECT 1 FROM annonces WHERE code = $1 AND enabled = true")
            .bind(&code)
            .fetch_optional(&state.pool)
            .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Annonce introuvable".to_string()));
    }

    let commentaire = sqlx::query_as::<_, Commentaire>(
        r#"
        INSERT INTO commentaires (annonce_code, client_id, note, contenu, active)
        VALUES ($1, $2, $3, $4, false)
        RETURNING *
        "#,
    )
    .bind(&code)
    .bind(auth_user.id)
    .bind(payload.note)
    .bind(&payload.contenu)
    .fetch_one(&state.pool)
    .await?;

    let response = build_commentaire_response(&state, commentaire).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct AdminCommentairesQuery {
    active: Option<bool>,
    page: Option<i64>,
    limit: Option<i64>,
}

fn check_admin(auth_user: &AuthUser) -> AppResult<()> {
    if !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Avis côté back office
#[utoipa::path(
    get,
    path = "/api/v1/admin/commentaires",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminCommentairesQuery),
    responses(
        (status = 200, description = "Avis", body = Vec<CommentaireResponse>),
        (status = 403, description = "Accès refusé")
    )
)]
pub async fn admin_list_commentaires(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<AdminCommentairesQuery>,
) -> AppResult<Json<Vec<CommentaireResponse>>> {
    check_admin(&auth_user)?;

    let limit = query.limit.unwrap_or(50).min(100);
    let offset = query.page.unwrap_or(0) * limit;

    let commentaires = sqlx::query_as::<_, Commentaire>(
        r#"
        SELECT * FROM commentaires
        WHERE ($1::boolean IS NULL OR active = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.active)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for commentaire in commentaires {
        response.push(build_commentaire_response(&state, commentaire).await?);
    }

    Ok(Json(response))
}

/// Bascule de visibilité d'un avis
#[utoipa::path(
    put,
    path = "/api/v1/admin/commentaires/{id}/moderation",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de l'avis")
    ),
    responses(
        (status = 200, description = "Nouveau statut"),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Avis introuvable")
    )
)]
pub async fn toggle_moderation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let row: Option<(bool,)> = sqlx::query_as(
        "UPDATE commentaires SET active = NOT active, updated_at = NOW() WHERE id = $1 RETURNING active",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;

    let (active,) = row.ok_or_else(|| AppError::NotFound("Avis introuvable".to_string()))?;

    Ok(Json(json!({
        "id": id,
        "active": active
    })))
}

/// Suppression d'un avis
#[utoipa::path(
    delete,
    path = "/api/v1/admin/commentaires/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de l'avis")
    ),
    responses(
        (status = 200, description = "Avis supprimé"),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Avis introuvable")
    )
)]
pub async fn delete_commentaire(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let deleted = sqlx::query("DELETE FROM commentaires WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Avis introuvable".to_string()));
    }

    Ok(Json(json!({"success": true})))
}
