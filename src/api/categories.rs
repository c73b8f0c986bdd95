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
    Categorie, CategorieResponse, CreateCategorieRequest, CreateSousCategorieRequest,
    SousCategorie, SousCategorieResponse, UpdateCategorieRequest,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_categorie))
        .route("/:id", put(update_categorie))
        .route("/:id", delete(delete_categorie))
        .route("/:id/sous-categories", post(create_sous_categorie))
        .route("/sous-categories/:id", delete(delete_sous_categorie))
}

fn check_admin(auth_user: &AuthUser) -> AppResult<()> {
    if !is_admin(&auth_user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Catégories actives avec leurs sous-catégories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Catégories", body = Vec<CategorieResponse>)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategorieResponse>>> {
    let categories = sqlx::query_as::<_, Categorie>(
        "SELECT * FROM categories WHERE is_active = true ORDER BY sort_order, nom",
    )
    .fetch_all(&state.pool)
    .await?;

    let mut response = Vec::new();
    for categorie in categories {
        let sous_categories = sqlx::query_as::<_, SousCategorie>(
            "SELECT * FROM sous_categories WHERE categorie_id = $1 AND is_active = true ORDER BY nom",
        )
        .bind(categorie.id)
        .fetch_all(&state.pool)
        .await?;

        response.push(CategorieResponse {
            id: categorie.id,
            nom: categorie.nom,
            sous_categories: sous_categories
                .into_iter()
                .map(SousCategorieResponse::from)
                .collect(),
        });
    }

    Ok(Json(response))
}

/// Création d'une catégorie
#[utoipa::path(
    post,
    path = "/api/v1/admin/categories",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateCategorieRequest,
    responses(
        (status = 200, description = "Catégorie créée", body = CategorieResponse),
        (status = 403, description = "Accès refusé")
    )
)]
pub async fn create_categorie(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateCategorieRequest>,
) -> AppResult<Json<CategorieResponse>> {
    check_admin(&auth_user)?;

    let categorie = sqlx::query_as::<_, Categorie>(
        r#"
        INSERT INTO categories (nom, sort_order)
        VALUES ($1, COALESCE($2, 0))
        RETURNING *
        "#,
    )
    .bind(&payload.nom)
    .bind(payload.sort_order)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(CategorieResponse {
        id: categorie.id,
        nom: categorie.nom,
        sous_categories: Vec::new(),
    }))
}

/// Mise à jour d'une catégorie
#[utoipa::path(
    put,
    path = "/api/v1/admin/categories/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de la catégorie")
    ),
    request_body = UpdateCategorieRequest,
    responses(
        (status = 200, description = "Catégorie mise à jour"),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Catégorie introuvable")
    )
)]
pub async fn update_categorie(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategorieRequest>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let updated = sqlx::query(
        r#"
        UPDATE categories SET
            nom = COALESCE($2, nom),
            sort_order = COALESCE($3, sort_order),
            is_active = COALESCE($4, is_active),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&payload.nom)
    .bind(payload.sort_order)
    .bind(payload.is_active)
    .execute(&state.pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("Catégorie introuvable".to_string()));
    }

    Ok(Json(json!({"success": true})))
}

/// Suppression d'une catégorie sans annonce rattachée
#[utoipa::path(
    delete,
    path = "/api/v1/admin/categories/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de la catégorie")
    ),
    responses(
        (status = 200, description = "Catégorie supprimée"),
        (status = 400, description = "Des annonces y sont encore rattachées"),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Catégorie introuvable")
    )
)]
pub async fn delete_categorie(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let dependents: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM annonces WHERE categorie_id = $1")
            .bind(id)
            .fetch_one(&state.pool)
            .await?;

    if dependents.0 > 0 {
        return Err(AppError::BadRequest(format!(
            "Suppression impossible : {} annonce(s) rattachée(s) à cette catégorie",
            dependents.0
        )));
    }

    sqlx::query("DELETE FROM sous_categories WHERE categorie_id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Catégorie introuvable".to_string()));
    }

    Ok(Json(json!({"success": true})))
}

/// Ajout d'une sous-catégorie
#[utoipa::path(
    post,
    path = "/api/v1/admin/categories/{id}/sous-categories",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de la catégorie")
    ),
    request_body = CreateSousCategorieRequest,
    responses(
        (status = 200, description = "Sous-catégorie créée", body = SousCategorieResponse),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Catégorie introuvable")
    )
)]
pub async fn create_sous_categorie(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateSousCategorieRequest>,
) -> AppResult<Json<SousCategorieResponse>> {
    check_admin(&auth_user)?;

    let exists: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Catégorie introuvable".to_string()));
    }

    let sous_categorie = sqlx::query_as::<_, SousCategorie>(
        r#"
        INSERT INTO sous_categories (categorie_id, nom)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&payload.nom)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(SousCategorieResponse::from(sous_categorie)))
}

/// Suppression d'une sous-catégorie sans annonce rattachée
#[utoipa::path(
    delete,
    path = "/api/v1/admin/categories/sous-categories/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "ID de la sous-catégorie")
    ),
    responses(
        (status = 200, description = "Sous-catégorie supprimée"),
        (status = 400, description = "Des annonces y sont encore rattachées"),
        (status = 403, description = "Accès refusé"),
        (status = 404, description = "Sous-catégorie introuvable")
    )
)]
pub async fn delete_sous_categorie(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    check_admin(&auth_user)?;

    let dependents: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM annonces WHERE sous_categorie_id = $1")
            .bind(id)
            .fetch_one(&state.pool)
            .await?;

    if dependents.0 > 0 {
        return Err(AppError::BadRequest(format!(
            "Suppression impossible : {} annonce(s) rattachée(s) à cette sous-catégorie",
            dependents.0
        )));
    }

    let deleted = sqlx::query("DELETE FROM sous_categories WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Sous-catégorie introuvable".to_string()));
    }

    Ok(Json(json!({"success": true})))
}
