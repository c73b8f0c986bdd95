use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub nom: String,
    pub prenoms: String,
    pub email: String,
    pub telephone: String,
    pub password_hash: String,
    pub enabled: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub nom: String,
    pub prenoms: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientPublic {
    pub id: Uuid,
    pub nom: String,
    pub prenoms: String,
    pub email: String,
    pub telephone: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientPublic {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            nom: client.nom,
            prenoms: client.prenoms,
            email: client.email,
            telephone: client.telephone,
            enabled: client.enabled,
            created_at: client.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminPublic {
    pub id: Uuid,
    pub nom: String,
    pub prenoms: String,
    pub email: String,
}

impl From<Admin> for AdminPublic {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            nom: admin.nom,
            prenoms: admin.prenoms,
            email: admin.email,
        }
    }
}

// DTOs
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[validate(length(min = 1, message = "Les prénoms sont obligatoires"))]
    pub prenoms: String,
    #[validate(email(message = "Adresse e-mail invalide"))]
    pub email: String,
    pub telephone: String,
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub client: ClientPublic,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminAuthResponse {
    pub token: String,
    pub admin: AdminPublic,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateClientRequest {
    pub nom: Option<String>,
    pub prenoms: Option<String>,
    pub telephone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(password: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            nom: "Kouassi".to_string(),
            prenoms: "Jean-Marc".to_string(),
            email: email.to_string(),
            telephone: "0708123456".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_mot_de_passe_minimum_8() {
        assert!(register_request("court7c", "jm@exemple.ci").validate().is_err());
        assert!(register_request("assezlong", "jm@exemple.ci").validate().is_ok());
    }

    #[test]
    fn test_register_email_invalide() {
        assert!(register_request("assezlong", "pas-un-email").validate().is_err());
    }

    #[test]
    fn test_reset_password_minimum_8() {
        let request = ResetPasswordRequest {
            email: "jm@exemple.ci".to_string(),
            code: "123456".to_string(),
            password: "court".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
