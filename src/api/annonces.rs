use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{is_admin, AppState, AuthUser};
use crate::models::{
    generate_annonce_code, Annonce, AnnonceResponse, AnnoncesQuery, CreateAnnonceRequest,
    ProprietaireInfo, UpdateAnnonceRequest,
};
use crate::services::{EmailService, FileService, SmsService};
use crate::utils::validators::sanitize_string;

/// Réponse générique
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_annonces))
        .route("/", post(create_annonce))
        .route("/mes", get(my_annonces))
        .route("/:code", get(get_annonce))
        .route("/:code", put(update_annonce))
        .route("/:code", delete(delete_annonce))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_annonces))
        .route("/:code/moderation", put(toggle_moderation))
}

pub async fn build_annonce_response(
    state: &AppState,
    annonce: &Annonce,
    viewer: Option<Uuid>,
) -> AppResult<AnnonceResponse> {
    let categorie: (String,) = sqlx::query_as("SELECT nom FROM categories WHERE id = $1")
        .bind(annonce.categorie_id)
        .fetch_one(&state.pool)
        .await?;

    let sous_categorie: Option<(String,)> = match annonce.sous_categorie_id {
        Some(id) => {
            sqlx::query_as("SELECT nom FROM sous_categories WHERE id = $1")
                .bind(id)
                .fetch_optional(&state.pool)
                .await?
        }
        None => None,
    };

    let commune: (String,) = sqlx::query_as("SELECT nom FROM communes WHERE id = $1")
        .bind(annonce.commune_id)
        .fetch_one(&state.pool)
        .await?;

    let quartier: (String,) = sqlx::query_as("SELECT nom FROM quartiers WHERE id = $1")
        .bind(annonce.quartier_id)
        .fetch_one(&state.pool)
        .await?;

    let proprietaire: (Uuid, String, String, String) = sqlx::query_as(
        "SELECT id, nom, prenoms, telephone FROM clients WHERE id = $1",
    )
    .bind(annonce.client_id)
    .fetch_one(&state.pool)
    .await?;

    let in_wishlist = match viewer {
        Some(client_id) => {
            let row: Option<(i32,)> = sqlx::query_as(
                "SELECT 1 FROM wishlists WHERE client_id = $1 AND annonce_code = $2",
            )
            .bind(client_id)
            .bind(&annonce.code)
            .fetch_optional(&state.pool)
            .await?;
            row.is_some()
        }
        None => false,
    };

    Ok(AnnonceResponse {
        code: annonce.code.clone(),
        titre: annonce.titre.clone(),
        description: annonce.description.clone(),
        type_annonce: annonce.type_annonce,
        prix: annonce.prix,
        surface: annonce.surface,
        nb_pieces: annonce.nb_pieces,
        nb_chambres: annonce.nb_chambres,
        nb_salles_bain: annonce.nb_salles_bain,
        images: annonce.images.0.clone(),
        categorie: categorie.0,
        sous_categorie: sous_categorie.map(|(nom,)| nom),
        commune: commune.0,
        quartier: quartier.0,
        proprietaire: ProprietaireInfo {
            id: proprietaire.0,
            nom: format!("{} {}", proprietaire.2, proprietaire.1).trim().to_string(),
            telephone: proprietaire.3,
        },
        enabled: annonce.enabled,
        views_count: annonce.views_count,
        in_wishlist,
        created_at: annonce.created_at,
    })
}

/// Recherche publique des annonces en ligne
#[utoipa::path(
    get,
    path = "/api/v1/annonces",
    tag = "annonces",
    params(AnnoncesQuery),
    responses(
        (status = 200, description = "Annonces correspondantes", body = Vec<AnnonceResponse>)
    )
)]
pub async fn list_annonces(
    State(state): State<AppState>,
    Query(query): Query<AnnoncesQuery>,
) -> AppResult<Json<Vec<AnnonceResponse>>> {
    let limit = query.limit.unwrap_or(20).min(100);
    let offset = query.page.unwrap_or(0) * limit;
    let search_pattern = query.q.as_ref().map(|q| format!("%{}%", q));

    let annonces = sqlx::query_as::<_, Annonce>(
        r#"
        SELECT a.* FROM annonces a
        WHERE a.enabled = true
          AND ($1::uuid IS NULL OR a.commune_id = $1)
          AND ($2::uuid IS NULL OR a.quartier_id = $2)
          AND ($3::uuid IS NULL OR a.categorie_id = $3)
          AND ($4::type_annonce IS NULL OR a.type_annonce = $4)
          AND ($5::decimal IS NULL OR a.prix >= $5)
          AND ($6::decimal IS NULL OR a.prix <= $6)
          AND ($7::varchar IS NULL OR a.titre ILIKE $7 OR a.description ILIKE $7)
        ORDER BY a.created_at DESC
        LIMIT $8 OFFSET $9
        "#,
    )
    .bind(query.commune)
    .bind(query.quartier)
    .bind(query.categorie)
    .bind(query.type_annonce)
    .bind(query.prix_min)
    .bind(query.prix_max)
    .bind(&search_pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for annonce in annonces {
        response.push(build_annonce_response(&state, &annonce, None).await?);
    }

    Ok(Json(response))
}

/// Détail d'une annonce par code
#[utoipa::path(
    get,
    path = "/api/v1/annonces/{code}",
    tag = "annonces",
    params(
        ("code" = String, Path, description = "Code de l'annonce")
    ),
    responses(
        (status = 200, description = "Annonce", body = AnnonceResponse),
        (status = 404, description = "Annonce introuvable")
    )
)]
pub async fn get_annonce(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<AnnonceResponse>> {
    let annonce = sqlx::query_as::<_, Annonce>(
        "SELECT * FROM annonces WHERE code = $1 AND enabled = true",
    )
    .bind(&code)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Annonce introuvable".to_string()))?;

    sqlx::query("UPDATE annonces SET views_count = views_count + 1 WHERE code = $1")
        .bind(&code)
        .execute(&state.pool)
        .await?;

    let mut response = build_annonce_response(&state, &annonce, None).await?;
    response.views_count += 1;
    Ok(Json(response))
}

/// Dépôt d'une annonce (en attente de modération)
#[utoipa::path(
    post,
    path = "/api/v1/annonces",
    tag = "annonces",
    security(("bearer_auth" = [])),
    request_body = CreateAnnonceRequest,
    responses(
        (status = 200, description = "Annonce créée", body = AnnonceResponse),
        (status = 400, description = "Quartier hors de la commune"),
        (status = 401, description = "Non autorisé")
    )
)]
pub async fn create_annonce(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateAnnonceRequest>,
) -> AppResult<Json<AnnonceResponse>> {
    // Un quartier appartient à exactement une commune
    let quartier_commune: Option<(Uuid,)> =
        sqlx::query_as("SELECT commune_id FROM quartiers WHERE id = $1")
            .bind(payload.quartier_id)
            .fetch_optional(&state.pool)
            .await?;

    let quartier_commune =
        quartier_commune.ok_or_else(|| AppError::NotFound("Quartier introuvable".to_string()))?;

    if quartier_commune.0 != payload.commune_id {
        return Err(AppError::BadRequest(
            "Le quartier n'appartient pas à la commune indiquée".to_string(),
        ));
    }

    let titre = sanitize_string(&payload.titre);
    if titre.is_empty() {
        return Err(AppError::BadRequest("Le titre est obligatoire".to_string()));
    }

    let code = generate_annonce_code();

    let annonce = sqlx::query_as::<_, Annonce>(
        r#"
        INSERT INTO annonces (
            code, client_id, categorie_id, sous_categorie_id, commune_id, quartier_id,
            type_annonce, titre, description, prix, surface,
            nb_pieces, nb_chambres, nb_salles_bain, images, enabled
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, false)
        RETURNING *
        "#,
    )
    .bind(&code)
    .bind(auth_user.id)
    .bind(payload.categorie_id)
    .bind(payload.sous_categorie_id)
    .bind(payload.commune_id)
    .bind(payload.quartier_id)
    .bind(payload.type_annonce)
    .bind(&titre)
    .bind(&payload.description)
    .bind(payload.prix)
    .bind(payload.surface)
    .bind(payload.nb_pieces)
    .bind(payload.nb_chambres)
    .bind(payload.nb_salles_bain)
    .bind(SqlJson(payload.images.unwrap_or_default()))
    .fetch_one(&state.pool)
    .await?;

    let response = build_annonce_response(&state, &annonce, Some(auth_user.id)).await?;
    Ok(Json(response))
}

/// Modification d'une annonce par son propriétaire
#[utoipa::path(
    put,
    path = "/api/v1/annonces/{code}",
    tag = "annonces",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "Code de l'annonce")
    ),
    request_body = UpdateAnnonceRequest,
    responses(
        (status = 200, description = "Annonce mise à jour", body = AnnonceResponse),
        (status = 403, description = "Pas le propriétaire"),
        (status = 404, description = "Annonce introuvable")
    )
)]
pub async fn update_annonce(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(code): Path<String>,
    Json(payload): Json<UpdateAnnonceRequest>,
) -> AppResult<Json<AnnonceResponse>> {
    let annonce = sqlx::query_as::<_, Annonce>("SELECT * FROM annonces WHERE code = $1")
        .bind(&code)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Annonce introuvable".to_string()))?;

    if annonce.client_id != auth_user.id {
        return Err(AppError::Forbidden);
    }

    let images = payload.images.map(SqlJson);

    let updated = sqlx::query_as::<_, Annonce>(
        r#"
        UPDATE annonces SET
            categorie_id = COALESCE($2, categorie_id),
            sous_categorie_id = COALESCE($3, sous_categorie_id),
            commune_id = COALESCE($4, commune_id),
            quartier_id = COALESCE($5, quartier_id),
            type_annonce = COALESCE($6, type_annonce),
            titre = COALESCE($7, titre),
            description = COALESCE($8, description),
            prix = COALESCE($9, prix),
            surface = COALESCE($10, surface),
            nb_pieces = COALESCE($11, nb_pieces),
            nb_chambres = COALESCE($12, nb_chambres),
            nb_salles_bain = COALESCE($13, nb_salles_bain),
            images = COALESCE($14, images),
            updated_at = NOW()
        WHERE code = $1
        RETURNING *
        "#,
    )
    .bind(&code)
    .bind(payload.categorie_id)
    .bind(payload.sous_categorie_id)
    .bind(payload.commune_id)
    .bind(payload.quartier_id)
    .bind(payload.type_annonce)
    .bind(&payload.titre)
    .bind(&payload.description)
    .bind(payload.prix)
    .bind(payload.surface)
    .bind(payload.nb_pieces)
    .bind(payload.nb_chambres)
    .bind(payload.nb_salles_bain)
    .bind(images)
    .fetch_one(&state.pool)
    .await?;

    let response = build_annonce_response(&state, &updated, Some(auth_user.id)).await?;
    Ok(Json(response))
}

/// Suppression d'une annonce
#[utoipa::path(
    delete,
    path = "/api/v1/annonces/{code}",
    tag = "annonces",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "Code de l'annonce")
    ),
    responses(
        (status = 200, description = "Annonce supprimée", body = SuccessResponse),
        (status = 403, description = "Pas le propriétaire"),
        (status = 404, description = "Annonce introuvable")
    )
)]
pub async fn delete_annonce(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<Value>> {
    let annonce = sqlx::query_as::<_, Annonce>("SELECT * FROM annonces WHERE code = $1")
        .bind(&code)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Annonce introuvable".to_string()))?;

    if annonce.client_id != auth_user.id && !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }

    sqlx::query("DELETE FROM annonces WHERE code = $1")
        .bind(&code)
        .execute(&state.pool)
        .await?;

    // Nettoyage des fichiers images, au mieux
    let config = state.config.clone();
    let images = annonce.images.0.clone();
    tokio::spawn(async move {
        let file_service = FileService::new(&config);
        for url in images {
            if let Err(e) = file_service.delete_file(&url).await {
                tracing::warn!("Image cleanup for {} failed: {}", url, e);
            }
        }
    });

    Ok(Json(json!({"success": true})))
}

/// Annonces du client connecté, tous statuts confondus
#[utoipa::path(
    get,
    path = "/api/v1/annonces/mes",
    tag = "annonces",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Mes annonces", body = Vec<AnnonceResponse>),
        (status = 401, description = "Non autorisé")
    )
)]
pub async fn my_annonces(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<AnnonceResponse>>> {
    let annonces = sqlx::query_as::<_, Annonce>(
        "SELECT * FROM annonces WHERE client_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth_user.id)
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for annonce in annonces {
        response.push(build_annonce_response(&state, &annonce, Some(auth_user.id)).await?);
    }

    Ok(Json(response))
}

#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct AdminAnnoncesQuery {
    enabled: Option<bool>,
    q: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

fn check_admin(auth_user: &AuthUser) -> AppResult<()> {
    if !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Liste des annonces côté back office, tous statuts
#[utoipa::path(
    get,
    path = "/api/v1/admin/annonces",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminAnnoncesQuery),
    responses(
        (status = 200, description = "Annonces", body = Vec<AnnonceResponse>),
        (status = 403, description = "Accès refusé")
    )
)]
pub async fn admin_list_annonces(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<AdminAnnoncesQuery>,
) -> AppResult<Json<Vec<AnnonceResponse>>> {
    check_admin(&auth_user)?;

    let limit = query.limit.unwrap_or(50).min(100);
    let offset = query.page.unwrap_or(0) * limit;
    let search = query.q.as_ref().map(|q| format!("%{}%", q));

    let annonces = sqlx::query_as::<_, Annonce>(
        r#"
        SELECT * FROM annonces
        WHERE ($1::boolean IS NULL OR enabled = $1)
          AND ($2::varchar IS NULL OR titre ILIKE $2 OR code ILIKE $2)
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

    let mut response = Vec::new();
    for annonce in annonces {
        response.push(build_annonce_response(&state, &annonce, None).await?);
    }

    Ok(Json(response))
}

/// Bascule de modération d'une annonce
///
/// La transition inactif -> actif déclenche une notification au propriétaire,
/// au mieux : un échec d'envoi est journalisé sans annuler la bascule.
#[utoipa::path(
    put,
    path = "/api/v1/admin/annonces/{code}/moderation",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "Code de l'annonce")
    ),
    responses(
        (status = 200, description = "Nouveau statut", body = crate::models::ModerationResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Annonce introuvable")
    )
)]
pub async fn toggle_moderation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    // Annonce et propriétaire en une lecture
    let row: Option<(bool, String, String, String, String)> = sqlx::query_as(
        r#"
        SELECT a.enabled, a.titre, c.email, c.telephone, c.prenoms
        FROM annonces a
        JOIN clients c ON c.id = a.client_id
        WHERE a.code = $1
        "#,
    )
    .bind(&code)
    .fetch_optional(&state.pool)
    .await?;

    let (enabled, titre, email, telephone, _prenoms) =
        row.ok_or_else(|| AppError::NotFound("Annonce introuvable".to_string()))?;

    let new_enabled = !enabled;

    sqlx::query("UPDATE annonces SET enabled = $2, updated_at = NOW() WHERE code = $1")
        .bind(&code)
        .bind(new_enabled)
        .execute(&state.pool)
        .await?;

    if new_enabled {
        let config = state.config.clone();
        let code_notif = code.clone();
        tokio::spawn(async move {
            let email_service = EmailService::new(config.clone());
            if let Err(e) = email_service
                .send_annonce_activated(&email, &titre, &code_notif)
                .await
            {
                tracing::warn!("Annonce activation email to {} failed: {}", email, e);
            }

            let sms_service = SmsService::new(config);
            if let Err(e) = sms_service
                .send_annonce_activated(&telephone, &code_notif)
                .await
            {
                tracing::warn!("Annonce activation SMS to {} failed: {}", telephone, e);
            }
        });
    }

    Ok(Json(json!({
        "code": code,
        "enabled": new_enabled
    })))
}
