use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{is_admin, AppState, AuthUser};
use crate::models::{Client, ClientPublic, UpdateClientRequest};
use crate::services::{
    auth_service::{normalize_ci_phone, validate_ci_phone},
    AuthService, EmailService,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me", put(update_me))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients))
        .route("/:id/activation", put(toggle_activation))
}

#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct ClientsQuery {
    enabled: Option<bool>,
    q: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

/// Réponse au basculement d'activation
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ActivationResponse {
    pub id: Uuid,
    pub enabled: bool,
}

/// Profil du client connecté
#[utoipa::path(
    get,
    path = "/api/v1/clients/me",
    tag = "clients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profil du client", body = ClientPublic),
        (status = 401, description = "Non autorisé")
    )
)]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<ClientPublic>> {
    let client = AuthService::get_client_by_id(&state.pool, auth_user.id).await?;
    Ok(Json(ClientPublic::from(client)))
}

/// Mise à jour du profil du client connecté
#[utoipa::path(
    put,
    path = "/api/v1/clients/me",
    tag = "clients",
    security(("bearer_auth" = [])),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Profil mis à jour", body = ClientPublic),
        (status = 401, description = "Non autorisé"),
        (status = 422, description = "Téléphone invalide")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateClientRequest>,
) -> AppResult<Json<ClientPublic>> {
    let telephone = match payload.telephone.as_deref() {
        Some(brut) => {
            let telephone = normalize_ci_phone(brut);
            if !validate_ci_phone(&telephone) {
                return Err(AppError::Validation(
                    "Numéro de téléphone ivoirien invalide".to_string(),
                ));
            }
            Some(telephone)
        }
        None => None,
    };

    let client = sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients
        SET
            nom = COALESCE($2, nom),
            prenoms = COALESCE($3, prenoms),
            telephone = COALESCE($4, telephone),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(auth_user.id)
    .bind(&payload.nom)
    .bind(&payload.prenoms)
    .bind(&telephone)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ClientPublic::from(client)))
}

fn check_admin(auth_user: &AuthUser) -> AppResult<()> {
    if !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Liste des clients (back office)
#[utoipa::path(
    get,
    path = "/api/v1/admin/clients",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(ClientsQuery),
    responses(
        (status = 200, description = "Liste des clients", body = Vec<ClientPublic>),
        (status = 403, description = "Accès refusé")
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ClientsQuery>,
) -> AppResult<Json<Vec<ClientPublic>>> {
    check_admin(&auth_user)?;

    let limit = query.limit.unwrap_or(50).min(100);
    let offset = query.page.unwrap_or(0) * limit;
    let search = query.q.as_ref().map(|q| format!("%{}%", q));

    let clients = sqlx::query_as::<_, Client>(
        r#"
        SELECT * FROM clients
        WHERE ($1::boolean IS NULL OR enabled = $1)
          AND ($2::varchar IS NULL OR nom ILIKE $2 OR prenoms ILIKE $2 OR email ILIKE $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.enabled)
    .bind(&search)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let response: Vec<ClientPublic> = clients.into_iter().map(ClientPublic::from).collect();
    Ok(Json(response))
}

/// Activation/désactivation d'un compte client
#[utoipa::path(
    put,
    path = "/api/v1/admin/clients/{id}/activation",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID du client")
    ),
    responses(
        (status = 200, description = "Nouveau statut d'activation", body = ActivationResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Client introuvable")
    )
)]
pub async fn toggle_activation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Client introuvable".to_string()))?;

    let enabled = !client.enabled;

    sqlx::query("UPDATE clients SET enabled = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(enabled)
        .execute(&state.pool)
        .await?;

    // Notification au passage inactif -> actif, sans bloquer la réponse :
    // un échec d'envoi est journalisé et ne remet pas le statut en cause
    if enabled {
        let config = state.config.clone();
        let email = client.email.clone();
        let prenoms = client.prenoms.clone();
        tokio::spawn(async move {
            let email_service = EmailService::new(config);
            if let Err(e) = email_service.send_client_activated(&email, &prenoms).await {
                tracing::warn!("Activation email to {} failed: {}", email, e);
            }
        });
    }

    Ok(Json(json!({
        "id": id,
        "enabled": enabled
    })))
}
