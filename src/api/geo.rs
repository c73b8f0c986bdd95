use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{is_admin, AppState, AuthUser};
use crate::models::{
    bande_coherente, Commune, CommuneResponse, CreateCommuneRequest, CreateQuartierRequest,
    EstimationResponse, PrixQuartier, Quartier, QuartierEstimation, QuartierResponse,
    UpdateCommuneRequest, UpdatePrixRequest, UpdateQuartierRequest, UpsertEstimationRequest,
};

pub fn commune_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_communes))
        .route("/:id/quartiers", get(list_quartiers_of_commune))
}

pub fn quartier_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_quartier))
        .route("/:id/prix", get(get_prix_quartier))
        .route("/:id/estimation", get(get_estimation))
}

pub fn admin_commune_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_commune))
        .route("/:id", put(update_commune))
        .route("/:id", delete(delete_commune))
}

pub fn admin_quartier_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quartier))
        .route("/:id", put(update_quartier))
        .route("/:id", delete(delete_quartier))
        .route("/:id/prix", put(update_prix_quartier))
        .route("/:id/estimation", put(upsert_estimation))
}

fn check_admin(auth_user: &AuthUser) -> AppResult<()> {
    if !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Liste des communes actives
#[utoipa::path(
    get,
    path = "/api/v1/communes",
    tag = "geo",
    responses(
        (status = 200, description = "Communes", body = Vec<CommuneResponse>)
    )
)]
pub async fn list_communes(State(state): State<AppState>) -> AppResult<Json<Vec<CommuneResponse>>> {
    let communes =
        sqlx::query_as::<_, Commune>("SELECT * FROM communes WHERE is_active = true ORDER BY nom")
            .fetch_all(&state.pool)
            .await?;

    let response: Vec<CommuneResponse> = communes.into_iter().map(CommuneResponse::from).collect();
    Ok(Json(response))
}

/// Quartiers d'une commune
#[utoipa::path(
    get,
    path = "/api/v1/communes/{id}/quartiers",
    tag = "geo",
    params(
        ("id" = Uuid, Path, description = "ID de la commune")
    ),
    responses(
        (status = 200, description = "Quartiers de la commune", body = Vec<QuartierResponse>),
        (status = 404, description = "Commune introuvable")
    )
)]
pub async fn list_quartiers_of_commune(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<QuartierResponse>>> {
    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM communes WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Commune introuvable".to_string()));
    }

    let quartiers = sqlx::query_as::<_, Quartier>(
        "SELECT * FROM quartiers WHERE commune_id = $1 AND is_active = true ORDER BY nom",
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    let response: Vec<QuartierResponse> =
        quartiers.into_iter().map(QuartierResponse::from).collect();
    Ok(Json(response))
}

/// Détail d'un quartier, fourchettes de prix comprises
#[utoipa::path(
    get,
    path = "/api/v1/quartiers/{id}",
    tag = "geo",
    params(
        ("id" = Uuid, Path, description = "ID du quartier")
    ),
    responses(
        (status = 200, description = "Quartier", body = QuartierResponse),
        (status = 404, description = "Quartier introuvable")
    )
)]
pub async fn get_quartier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuartierResponse>> {
    let quartier = sqlx::query_as::<_, Quartier>("SELECT * FROM quartiers WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Quartier introuvable".to_string()))?;

    Ok(Json(QuartierResponse::from(quartier)))
}

/// Fourchettes de prix d'un quartier
#[utoipa::path(
    get,
    path = "/api/v1/quartiers/{id}/prix",
    tag = "geo",
    params(
        ("id" = Uuid, Path, description = "ID du quartier")
    ),
    responses(
        (status = 200, description = "Fourchettes de prix", body = PrixQuartier),
        (status = 404, description = "Quartier introuvable")
    )
)]
pub async fn get_prix_quartier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PrixQuartier>> {
    let quartier = sqlx::query_as::<_, Quartier>("SELECT * FROM quartiers WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Quartier introuvable".to_string()))?;

    Ok(Json(PrixQuartier::from(&quartier)))
}

/// Coefficients d'estimation d'un quartier
///
/// Renvoie 404 quand aucune ligne d'estimation n'existe : jamais de
/// valeurs à zéro par défaut.
#[utoipa::path(
    get,
    path = "/api/v1/quartiers/{id}/estimation",
    tag = "estimation",
    params(
        ("id" = Uuid, Path, description = "ID du quartier")
    ),
    responses(
        (status = 200, description = "Coefficients d'estimation", body = EstimationResponse),
        (status = 404, description = "Aucune estimation pour ce quartier")
    )
)]
pub async fn get_estimation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EstimationResponse>> {
    let estimation = sqlx::query_as::<_, QuartierEstimation>(
        "SELECT * FROM quartier_estimations WHERE quartier_id = $1",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Aucune estimation pour ce quartier".to_string()))?;

    Ok(Json(EstimationResponse::from(estimation)))
}

/// Création d'une commune
#[utoipa::path(
    post,
    path = "/api/v1/admin/communes",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateCommuneRequest,
    responses(
        (status = 200, description = "Commune créée", body = CommuneResponse),
        (status = 403, description = "Accès refusé")
    )
)]
pub async fn create_commune(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateCommuneRequest>,
) -> AppResult<Json<CommuneResponse>> {
    check_admin(&auth_user)?;

    let commune = sqlx::query_as::<_, Commune>(
        r#"
        INSERT INTO communes (nom, ville, latitude, longitude)
        VALUES ($1, COALESCE($2, 'Abidjan'), $3, $4)
        RETURNING *
        "#,
    )
    .bind(&payload.nom)
    .bind(&payload.ville)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(CommuneResponse::from(commune)))
}

/// Mise à jour d'une commune
#[utoipa::path(
    put,
    path = "/api/v1/admin/communes/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de la commune")
    ),
    request_body = UpdateCommuneRequest,
    responses(
        (status = 200, description = "Commune mise à jour", body = CommuneResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Commune introuvable")
    )
)]
pub async fn update_commune(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommuneRequest>,
) -> AppResult<Json<CommuneResponse>> {
    check_admin(&auth_user)?;

    let commune = sqlx::query_as::<_, Commune>(
        r#"
        UPDATE communes SET
            nom = COALESCE($2, nom),
            ville = COALESCE($3, ville),
            latitude = COALESCE($4, latitude),
            longitude = COALESCE($5, longitude),
            is_active = COALESCE($6, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&payload.nom)
    .bind(&payload.ville)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.is_active)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Commune introuvable".to_string()))?;

    Ok(Json(CommuneResponse::from(commune)))
}

/// Suppression d'une commune sans quartier rattaché
#[utoipa::path(
    delete,
    path = "/api/v1/admin/communes/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de la commune")
    ),
    responses(
        (status = 200, description = "Commune supprimée"),
        (status = 400, description = "Des quartiers y sont encore rattachés"),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Commune introuvable")
    )
)]
pub async fn delete_commune(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let dependents: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM quartiers WHERE commune_id = $1")
            .bind(id)
            .fetch_one(&state.pool)
            .await?;

    if dependents.0 > 0 {
        return Err(AppError::BadRequest(format!(
            "Suppression impossible : {} quartier(s) rattaché(s) à cette commune",
            dependents.0
        )));
    }

    let deleted = sqlx::query("DELETE FROM communes WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Commune introuvable".to_string()));
    }

    Ok(Json(json!({"success": true})))
}

/// Création d'un quartier
#[utoipa::path(
    post,
    path = "/api/v1/admin/quartiers",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateQuartierRequest,
    responses(
        (status = 200, description = "Quartier créé", body = QuartierResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Commune introuvable")
    )
)]
pub async fn create_quartier(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateQuartierRequest>,
) -> AppResult<Json<QuartierResponse>> {
    check_admin(&auth_user)?;

    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM communes WHERE id = $1")
        .bind(payload.commune_id)
        .fetch_optional(&state.pool)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Commune introuvable".to_string()));
    }

    let quartier = sqlx::query_as::<_, Quartier>(
        r#"
        INSERT INTO quartiers (commune_id, nom, latitude, longitude)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(payload.commune_id)
    .bind(&payload.nom)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(QuartierResponse::from(quartier)))
}

/// Mise à jour d'un quartier
#[utoipa::path(
    put,
    path = "/api/v1/admin/quartiers/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID du quartier")
    ),
    request_body = UpdateQuartierRequest,
    responses(
        (status = 200, description = "Quartier mis à jour", body = QuartierResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Quartier introuvable")
    )
)]
pub async fn update_quartier(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuartierRequest>,
) -> AppResult<Json<QuartierResponse>> {
    check_admin(&auth_user)?;

    let quartier = sqlx::query_as::<_, Quartier>(
        r#"
        UPDATE quartiers SET
            nom = COALESCE($2, nom),
            latitude = COALESCE($3, latitude),
            longitude = COALESCE($4, longitude),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&payload.nom)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .bind(payload.is_active)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Quartier introuvable".to_string()))?;

    Ok(Json(QuartierResponse::from(quartier)))
}

/// Suppression d'un quartier sans annonce rattachée
#[utoipa::path(
    delete,
    path = "/api/v1/admin/quartiers/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID du quartier")
    ),
    responses(
        (status = 200, description = "Quartier supprimé"),
        (status = 400, description = "Des annonces y sont encore rattachées"),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Quartier introuvable")
    )
)]
pub async fn delete_quartier(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let dependents: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM annonces WHERE quartier_id = $1")
            .bind(id)
            .fetch_one(&state.pool)
            .await?;

    if dependents.0 > 0 {
        return Err(AppError::BadRequest(format!(
            "Suppression impossible : {} annonce(s) rattachée(s) à ce quartier",
            dependents.0
        )));
    }

    sqlx::query("DELETE FROM quartier_estimations WHERE quartier_id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    let deleted = sqlx::query("DELETE FROM quartiers WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Quartier introuvable".to_string()));
    }

    Ok(Json(json!({"success": true})))
}

/// Mise à jour des fourchettes de prix d'un quartier
///
/// Une fourchette incohérente (min > moy ou moy > max) est enregistrée
/// telle quelle mais journalisée, l'affichage la tolérant aujourd'hui.
#[utoipa::path(
    put,
    path = "/api/v1/admin/quartiers/{id}/prix",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID du quartier")
    ),
    request_body = UpdatePrixRequest,
    responses(
        (status = 200, description = "Fourchettes mises à jour", body = PrixQuartier),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Quartier introuvable")
    )
)]
pub async fn update_prix_quartier(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePrixRequest>,
) -> AppResult<Json<PrixQuartier>> {
    check_admin(&auth_user)?;

    if !bande_coherente(payload.location_min, payload.location_moy, payload.location_max) {
        tracing::warn!("Fourchette location incohérente pour le quartier {}", id);
    }
    if !bande_coherente(payload.vente_min, payload.vente_moy, payload.vente_max) {
        tracing::warn!("Fourchette vente incohérente pour le quartier {}", id);
    }

    let quartier = sqlx::query_as::<_, Quartier>(
        r#"
        UPDATE quartiers SET
            location_min = $2,
            location_moy = $3,
            location_max = $4,
            vente_min = $5,
            vente_moy = $6,
            vente_max = $7,
            prix_venal = $8,
            prix_marchand = $9,
            prix_moyen = $10,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.location_min)
    .bind(payload.location_moy)
    .bind(payload.location_max)
    .bind(payload.vente_min)
    .bind(payload.vente_moy)
    .bind(payload.vente_max)
    .bind(payload.prix_venal)
    .bind(payload.prix_marchand)
    .bind(payload.prix_moyen)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Quartier introuvable".to_string()))?;

    Ok(Json(PrixQuartier::from(&quartier)))
}

/// Création ou mise à jour des coefficients d'estimation d'un quartier
#[utoipa::path(
    put,
    path = "/api/v1/admin/quartiers/{id}/estimation",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID du quartier")
    ),
    request_body = UpsertEstimationRequest,
    responses(
        (status = 200, description = "Estimation enregistrée", body = EstimationResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Quartier introuvable")
    )
)]
pub async fn upsert_estimation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertEstimationRequest>,
) -> AppResult<Json<EstimationResponse>> {
    check_admin(&auth_user)?;

    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM quartiers WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Quartier introuvable".to_string()));
    }

    // Une seule ligne d'estimation par quartier
    let estimation = sqlx::query_as::<_, QuartierEstimation>(
        r#"
        INSERT INTO quartier_estimations (quartier_id, coefficient_occupation, hauteur, niveaux)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (quartier_id) DO UPDATE SET
            coefficient_occupation = EXCLUDED.coefficient_occupation,
            hauteur = EXCLUDED.hauteur,
            niveaux = EXCLUDED.niveaux,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.coefficient_occupation)
    .bind(payload.hauteur)
    .bind(payload.niveaux)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(EstimationResponse::from(estimation)))
}
