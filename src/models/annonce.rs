use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "type_annonce", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TypeAnnonce {
    Vente,
    Location,
}

/// Une annonce immobilière. La clé primaire est un code lisible
/// (ex. `AN-7F3K2Q9D`), pas un identifiant numérique.
#[derive(Debug, Clone, FromRow)]
pub struct Annonce {
    pub code: String,
    pub client_id: Uuid,
    pub categorie_id: Uuid,
    pub sous_categorie_id: Option<Uuid>,
    pub commune_id: Uuid,
    pub quartier_id: Uuid,
    pub type_annonce: TypeAnnonce,
    pub titre: String,
    pub description: String,
    pub prix: Decimal,
    pub surface: Option<Decimal>,
    pub nb_pieces: Option<i32>,
    pub nb_chambres: Option<i32>,
    pub nb_salles_bain: Option<i32>,
    pub images: Json<Vec<String>>,
    pub enabled: bool,
    pub views_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProprietaireInfo {
    pub id: Uuid,
    pub nom: String,
    pub telephone: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnnonceResponse {
    pub code: String,
    pub titre: String,
    pub description: String,
    pub type_annonce: TypeAnnonce,
    pub prix: Decimal,
    pub surface: Option<Decimal>,
    pub nb_pieces: Option<i32>,
    pub nb_chambres: Option<i32>,
    pub nb_salles_bain: Option<i32>,
    pub images: Vec<String>,
    pub categorie: String,
    pub sous_categorie: Option<String>,
    pub commune: String,
    pub quartier: String,
    pub proprietaire: ProprietaireInfo,
    pub enabled: bool,
    pub views_count: i32,
    pub in_wishlist: bool,
    pub created_at: DateTime<Utc>,
}

// DTOs
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AnnoncesQuery {
    pub commune: Option<Uuid>,
    pub quartier: Option<Uuid>,
    pub categorie: Option<Uuid>,
    #[serde(rename = "type")]
    pub type_annonce: Option<TypeAnnonce>,
    pub prix_min: Option<Decimal>,
    pub prix_max: Option<Decimal>,
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAnnonceRequest {
    pub categorie_id: Uuid,
    pub sous_categorie_id: Option<Uuid>,
    pub commune_id: Uuid,
    pub quartier_id: Uuid,
    pub type_annonce: TypeAnnonce,
    pub titre: String,
    pub description: String,
    pub prix: Decimal,
    pub surface: Option<Decimal>,
    pub nb_pieces: Option<i32>,
    pub nb_chambres: Option<i32>,
    pub nb_salles_bain: Option<i32>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAnnonceRequest {
    pub categorie_id: Option<Uuid>,
    pub sous_categorie_id: Option<Uuid>,
    pub quartier_id: Option<Uuid>,
    pub commune_id: Option<Uuid>,
    pub type_annonce: Option<TypeAnnonce>,
    pub titre: Option<String>,
    pub description: Option<String>,
    pub prix: Option<Decimal>,
    pub surface: Option<Decimal>,
    pub nb_pieces: Option<i32>,
    pub nb_chambres: Option<i32>,
    pub nb_salles_bain: Option<i32>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModerationResponse {
    pub code: String,
    pub enabled: bool,
}

/// Alphabet sans caractères ambigus (pas de 0/O ni 1/I/L).
const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKMNPQRSTUVWXYZ";
const CODE_LEN: usize = 8;

pub fn generate_annonce_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("AN-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_annonce_code() {
        let code = generate_annonce_code();
        assert!(code.starts_with("AN-"));
        assert_eq!(code.len(), 3 + CODE_LEN);
        assert!(code[3..]
            .bytes()
            .all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_code_alphabet_sans_ambigus() {
        for c in [b'0', b'O', b'1', b'I', b'L'] {
            assert!(!CODE_ALPHABET.contains(&c));
        }
    }
}
