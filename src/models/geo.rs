use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Commune {
    pub id: Uuid,
    pub nom: String,
    pub ville: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Quartier {
    pub id: Uuid,
    pub commune_id: Uuid,
    pub nom: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub location_min: Option<Decimal>,
    pub location_moy: Option<Decimal>,
    pub location_max: Option<Decimal>,
    pub vente_min: Option<Decimal>,
    pub vente_moy: Option<Decimal>,
    pub vente_max: Option<Decimal>,
    pub prix_venal: Option<Decimal>,
    pub prix_marchand: Option<Decimal>,
    pub prix_moyen: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct QuartierEstimation {
    pub id: Uuid,
    pub quartier_id: Uuid,
    pub coefficient_occupation: Decimal,
    pub hauteur: Decimal,
    pub niveaux: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommuneResponse {
    pub id: Uuid,
    pub nom: String,
    pub ville: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl From<Commune> for CommuneResponse {
    fn from(commune: Commune) -> Self {
        Self {
            id: commune.id,
            nom: commune.nom,
            ville: commune.ville,
            latitude: commune.latitude,
            longitude: commune.longitude,
        }
    }
}

/// Fourchettes de prix d'un quartier (FCFA).
#[derive(Debug, Serialize, ToSchema)]
pub struct PrixQuartier {
    pub location_min: Option<Decimal>,
    pub location_moy: Option<Decimal>,
    pub location_max: Option<Decimal>,
    pub vente_min: Option<Decimal>,
    pub vente_moy: Option<Decimal>,
    pub vente_max: Option<Decimal>,
    pub prix_venal: Option<Decimal>,
    pub prix_marchand: Option<Decimal>,
    pub prix_moyen: Option<Decimal>,
}

impl From<&Quartier> for PrixQuartier {
    fn from(quartier: &Quartier) -> Self {
        Self {
            location_min: quartier.location_min,
            location_moy: quartier.location_moy,
            location_max: quartier.location_max,
            vente_min: quartier.vente_min,
            vente_moy: quartier.vente_moy,
            vente_max: quartier.vente_max,
            prix_venal: quartier.prix_venal,
            prix_marchand: quartier.prix_marchand,
            prix_moyen: quartier.prix_moyen,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuartierResponse {
    pub id: Uuid,
    pub commune_id: Uuid,
    pub nom: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub prix: PrixQuartier,
}

impl From<Quartier> for QuartierResponse {
    fn from(quartier: Quartier) -> Self {
        Self {
            prix: PrixQuartier::from(&quartier),
            id: quartier.id,
            commune_id: quartier.commune_id,
            nom: quartier.nom,
            latitude: quartier.latitude,
            longitude: quartier.longitude,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EstimationResponse {
    pub quartier_id: Uuid,
    pub coefficient_occupation: Decimal,
    pub hauteur: Decimal,
    pub niveaux: Decimal,
}

impl From<QuartierEstimation> for EstimationResponse {
    fn from(estimation: QuartierEstimation) -> Self {
        Self {
            quartier_id: estimation.quartier_id,
            coefficient_occupation: estimation.coefficient_occupation,
            hauteur: estimation.hauteur,
            niveaux: estimation.niveaux,
        }
    }
}

// DTOs
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommuneRequest {
    pub nom: String,
    pub ville: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCommuneRequest {
    pub nom: Option<String>,
    pub ville: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQuartierRequest {
    pub commune_id: Uuid,
    pub nom: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuartierRequest {
    pub nom: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePrixRequest {
    pub location_min: Option<Decimal>,
    pub location_moy: Option<Decimal>,
    pub location_max: Option<Decimal>,
    pub vente_min: Option<Decimal>,
    pub vente_moy: Option<Decimal>,
    pub vente_max: Option<Decimal>,
    pub prix_venal: Option<Decimal>,
    pub prix_marchand: Option<Decimal>,
    pub prix_moyen: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertEstimationRequest {
    pub coefficient_occupation: Decimal,
    pub hauteur: Decimal,
    pub niveaux: Decimal,
}

/// Vérifie qu'une fourchette min/moy/max est cohérente. Les valeurs absentes
/// ne sont pas bloquantes : seule une inversion entre valeurs présentes compte.
pub fn bande_coherente(min: Option<Decimal>, moy: Option<Decimal>, max: Option<Decimal>) -> bool {
    if let (Some(min), Some(moy)) = (min, moy) {
        if min > moy {
            return false;
        }
    }
    if let (Some(moy), Some(max)) = (moy, max) {
        if moy > max {
            return false;
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(n: i64) -> Option<Decimal> {
        Some(Decimal::from(n))
    }

    #[test]
    fn test_bande_coherente() {
        assert!(bande_coherente(d(100), d(200), d(300)));
        assert!(bande_coherente(d(100), d(100), d(100)));
        assert!(!bande_coherente(d(300), d(200), d(100)));
        assert!(!bande_coherente(d(100), d(300), d(200)));
    }

    #[test]
    fn test_bande_coherente_valeurs_absentes() {
        assert!(bande_coherente(None, None, None));
        assert!(bande_coherente(d(100), None, d(300)));
        assert!(!bande_coherente(d(300), None, d(100)));
        assert!(bande_coherente(None, d(200), None));
    }
}
