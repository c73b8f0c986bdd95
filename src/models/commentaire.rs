use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Commentaire {
    pub id: Uuid,
    pub annonce_code: String,
    pub client_id: Uuid,
    pub note: i32,
    pub contenu: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentaireResponse {
    pub id: Uuid,
    pub annonce_code: String,
    pub auteur: String,
    pub note: i32,
    pub contenu: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// DTOs
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCommentaireRequest {
    pub note: i32,
    pub contenu: String,
}

/// La note d'un avis est comprise entre 1 et 5.
pub fn note_valide(note: i32) -> bool {
    (1..=5).contains(&note)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_valide() {
        assert!(note_valide(1));
        assert!(note_valide(5));
        assert!(!note_valide(0));
        assert!(!note_valide(6));
        assert!(!note_valide(-3));
    }
}
