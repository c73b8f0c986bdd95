use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::{is_admin, AppState, AuthUser};

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

/// Tableau de bord du back office
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Compteurs du tableau de bord"),
        (status = 403, description = "Accès refusé")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Value>> {
    if !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }

    let total_clients: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
        .fetch_one(&state.pool)
        .await?;

    let pending_clients: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM clients WHERE enabled = false")
            .fetch_one(&state.pool)
            .await?;

    let total_annonces: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM annonces")
        .fetch_one(&state.pool)
        .await?;

    let pending_annonces: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM annonces WHERE enabled = false")
            .fetch_one(&state.pool)
            .await?;

    let pending_commentaires: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM commentaires WHERE active = false")
            .fetch_one(&state.pool)
            .await?;

    let pending_commandes: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM commandes WHERE statut = 'en_attente'")
            .fetch_one(&state.pool)
            .await?;

    let new_annonces_today: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM annonces WHERE created_at::date = CURRENT_DATE")
            .fetch_one(&state.pool)
            .await?;

    Ok(Json(json!({
        "clients": {
            "total": total_clients.0,
            "pending": pending_clients.0
        },
        "annonces": {
            "total": total_annonces.0,
            "pending": pending_annonces.0,
            "new_today": new_annonces_today.0
        },
        "pending_actions": {
            "commentaires": pending_commentaires.0,
            "commandes": pending_commandes.0
        }
    })))
}
