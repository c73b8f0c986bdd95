use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{is_admin, AppState, AuthUser};
use crate::models::{
    Commande, CommandeResponse, CreateCommandeRequest, ServicePayant, ServicePayantResponse,
    StatutCommande, UpdateStatutRequest,
};

pub fn service_routes() -> Router<AppState> {
    Router::new().route("/", get(list_services))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_commande))
        .route("/mes", get(my_commandes))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_commandes))
        .route("/:id/statut", put(update_statut))
}

fn check_admin(auth_user: &AuthUser) -> AppResult<()> {
    if !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

async fn build_commande_response(
    state: &AppState,
    commande: Commande,
) -> AppResult<CommandeResponse> {
    let service: (String,) = sqlx::query_as("SELECT nom FROM services_payants WHERE id = $1")
        .bind(commande.service_id)
        .fetch_one(&state.pool)
        .await?;

    Ok(CommandeResponse {
        id: commande.id,
        service: service.0,
        annonce_code: commande.annonce_code,
        montant: commande.montant,
        statut: commande.statut,
        created_at: commande.created_at,
    })
}

/// Catalogue des services payants
#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "commandes",
    responses(
        (status = 200, description = "Services payants", body = Vec<ServicePayantResponse>)
    )
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ServicePayantResponse>>> {
    let services = sqlx::query_as::<_, ServicePayant>(
        "SELECT * FROM services_payants WHERE is_active = true ORDER BY prix",
    )
    .fetch_all(&state.pool)
    .await?;

    let response: Vec<ServicePayantResponse> = services
        .into_iter()
        .map(ServicePayantResponse::from)
        .collect();
    Ok(Json(response))
}

/// Commande d'un service payant
#[utoipa::path(
    post,
    path = "/api/v1/commandes",
    tag = "commandes",
    security(("bearer_auth" = [])),
    request_body = CreateCommandeRequest,
    responses(
        (status = 200, description = "Commande enregistrée", body = CommandeResponse),
        (status = 401, description = "Non autorisé"),
        (status = 404, description = "Service ou annonce introuvable")
    )
)]
pub async fn create_commande(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateCommandeRequest>,
) -> AppResult<Json<CommandeResponse>> {
    let service = sqlx::query_as::<_, ServicePayant>(
        "SELECT * FROM services_payants WHERE id = $1 AND is_active = true",
    )
    .bind(payload.service_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Service introuvable".to_string()))?;

    if let Some(code) = payload.annonce_code.as_deref() {
        let owns: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM annonces WHERE code = $1 AND client_id = $2")
                .bind(code)
                .bind(auth_user.id)
                .fetch_optional(&state.pool)
                .await?;

        if owns.is_none() {
            return Err(AppError::NotFound("Annonce introuvable".to_string()));
        }
    }

    // Le montant est figé au prix du catalogue au moment de la commande
    let commande = sqlx::query_as::<_, Commande>(
        r#"
        INSERT INTO commandes (client_id, service_id, annonce_code, montant)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(auth_user.id)
    .bind(service.id)
    .bind(&payload.annonce_code)
    .bind(service.prix)
    .fetch_one(&state.pool)
    .await?;

    let response = build_commande_response(&state, commande).await?;
    Ok(Json(response))
}

/// Commandes du client connecté
#[utoipa::path(
    get,
    path = "/api/v1/commandes/mes",
    tag = "commandes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Mes commandes", body = Vec<CommandeResponse>),
        (status = 401, description = "Non autorisé")
    )
)]
pub async fn my_commandes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<CommandeResponse>>> {
    let commandes = sqlx::query_as::<_, Commande>(
        "SELECT * FROM commandes WHERE client_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for commande in commandes {
        response.push(build_commande_response(&state, commande).await?);
    }

    Ok(Json(response))
}

#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct AdminCommandesQuery {
    statut: Option<StatutCommande>,
    page: Option<i64>,
    limit: Option<i64>,
}

/// Commandes côté back office
#[utoipa::path(
    get,
    path = "/api/v1/admin/commandes",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminCommandesQuery),
    responses(
        (status = 200, description = "Commandes", body = Vec<CommandeResponse>),
        (status = 403, description = "Accès refusé")
    )
)]
pub async fn admin_list_commandes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<AdminCommandesQuery>,
) -> AppResult<Json<Vec<CommandeResponse>>> {
    check_admin(&auth_user)?;

    let limit = query.limit.unwrap_or(50).min(100);
    let offset = query.page.unwrap_or(0) * limit;

    let commandes = sqlx::query_as::<_, Commande>(
        r#"
        SELECT * FROM commandes
        WHERE ($1::statut_commande IS NULL OR statut = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.statut)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for commande in commandes {
        response.push(build_commande_response(&state, commande).await?);
    }

    Ok(Json(response))
}

/// Changement de statut d'une commande
#[utoipa::path(
    put,
    path = "/api/v1/admin/commandes/{id}/statut",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de la commande")
    ),
    request_body = UpdateStatutRequest,
    responses(
        (status = 200, description = "Statut mis à jour", body = CommandeResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Commande introuvable")
    )
)]
pub async fn update_statut(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatutRequest>,
) -> AppResult<Json<CommandeResponse>> {
    check_admin(&auth_user)?;

    let commande = sqlx::query_as::<_, Commande>(
        "UPDATE commandes SET statut = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(payload.statut)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Commande introuvable".to_string()))?;

    let response = build_commande_response(&state, commande).await?;
    Ok(Json(response))
}
