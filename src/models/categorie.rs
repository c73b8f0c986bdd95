use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Categorie {
    pub id: Uuid,
    pub nom: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SousCategorie {
    pub id: Uuid,
    pub categorie_id: Uuid,
    pub nom: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SousCategorieResponse {
    pub id: Uuid,
    pub nom: String,
}

impl From<SousCategorie> for SousCategorieResponse {
    fn from(sous_categorie: SousCategorie) -> Self {
        Self {
            id: sous_categorie.id,
            nom: sous_categorie.nom,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategorieResponse {
    pub id: Uuid,
    pub nom: String,
    pub sous_categories: Vec<SousCategorieResponse>,
}

// DTOs
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategorieRequest {
    pub nom: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategorieRequest {
    pub nom: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSousCategorieRequest {
    pub nom: String,
}
