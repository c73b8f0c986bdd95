use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "statut_commande", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatutCommande {
    EnAttente,
    Payee,
    Annulee,
}

#[derive(Debug, Clone, FromRow)]
pub struct ServicePayant {
    pub id: Uuid,
    pub nom: String,
    pub description: Option<String>,
    pub prix: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Commande {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub annonce_code: Option<String>,
    pub montant: Decimal,
    pub statut: StatutCommande,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServicePayantResponse {
    pub id: Uuid,
    pub nom: String,
    pub description: Option<String>,
    pub prix: Decimal,
}

impl From<ServicePayant> for ServicePayantResponse {
    fn from(service: ServicePayant) -> Self {
        Self {
            id: service.id,
            nom: service.nom,
            description: service.description,
            prix: service.prix,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandeResponse {
    pub id: Uuid,
    pub service: String,
    pub annonce_code: Option<String>,
    pub montant: Decimal,
    pub statut: StatutCommande,
    pub created_at: DateTime<Utc>,
}

// DTOs
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommandeRequest {
    pub service_id: Uuid,
    pub annonce_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatutRequest {
    pub statut: StatutCommande,
}
