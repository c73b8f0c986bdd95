use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Admin, Client};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // client_id ou admin_id
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
}

pub struct AuthService {
    config: Config,
}

impl AuthService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn generate_session_token(&self, subject: Uuid, role: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.jwt_session_expiry);

        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: "session".to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(AppError::from)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify_password(password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub fn generate_reset_code() -> String {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        format!("{:06}", rng.gen_range(100000..999999))
    }

    pub async fn get_client_by_id(pool: &PgPool, client_id: Uuid) -> AppResult<Client> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(client_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Client introuvable".to_string()))
    }

    pub async fn get_client_by_email(pool: &PgPool, email: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(client)
    }

    pub async fn get_admin_by_email(pool: &PgPool, email: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(admin)
    }

    pub async fn save_reset_code(pool: &PgPool, email: &str, code: &str) -> AppResult<()> {
        let expires_at = Utc::now() + Duration::minutes(15);

        sqlx::query(
            r#"
            INSERT INTO reset_codes (email, code, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn verify_reset_code(pool: &PgPool, email: &str, code: &str) -> AppResult<bool> {
        let result = sqlx::query_as::<_, (i32,)>(
            r#"
            UPDATE reset_codes
            SET is_used = true, attempts = attempts + 1
            WHERE email = $1
              AND code = $2
              AND is_used = false
              AND expires_at > NOW()
              AND attempts < 3
            RETURNING 1
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_optional(pool)
        .await?;

        Ok(result.is_some())
    }

    pub async fn update_last_login(pool: &PgPool, client_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE clients SET last_login_at = NOW() WHERE id = $1")
            .bind(client_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

pub fn normalize_ci_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.starts_with("225") && digits.len() == 13 {
        format!("+{}", digits)
    } else if digits.len() == 10 {
        format!("+225{}", digits)
    } else {
        format!("+{}", digits)
    }
}

pub fn validate_ci_phone(phone: &str) -> bool {
    let normalized = normalize_ci_phone(phone);
    normalized.starts_with("+225") && normalized.len() == 14
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: String::new(),
            jwt_secret: "secret-de-test".to_string(),
            jwt_session_expiry: 604800,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_user: None,
            smtp_password: None,
            smtp_from: "no-reply@ivoirimmo.ci".to_string(),
            email_enabled: false,
            sms_client_id: String::new(),
            sms_client_secret: String::new(),
            sms_sender: "IvoirImmo".to_string(),
            sms_enabled: false,
            upload_dir: "uploads".to_string(),
        }
    }

    #[test]
    fn test_normalize_ci_phone() {
        assert_eq!(normalize_ci_phone("0708123456"), "+2250708123456");
        assert_eq!(normalize_ci_phone("2250708123456"), "+2250708123456");
        assert_eq!(normalize_ci_phone("+225 07 08 12 34 56"), "+2250708123456");
        assert_eq!(normalize_ci_phone("07 08 12 34 56"), "+2250708123456");
    }

    #[test]
    fn test_validate_ci_phone() {
        assert!(validate_ci_phone("0708123456"));
        assert!(validate_ci_phone("+2250708123456"));
        assert!(!validate_ci_phone("070812345"));
        assert!(!validate_ci_phone("+33612345678"));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = AuthService::hash_password("motdepasse8").unwrap();
        assert!(AuthService::verify_password("motdepasse8", &hash));
        assert!(!AuthService::verify_password("autrechose", &hash));
    }

    #[test]
    fn test_verify_password_hash_invalide() {
        assert!(!AuthService::verify_password("motdepasse8", "pas-un-hash"));
    }

    #[test]
    fn test_session_token_roundtrip() {
        let service = AuthService::new(test_config());
        let id = Uuid::new_v4();

        let token = service.generate_session_token(id, ROLE_CLIENT).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, ROLE_CLIENT);
        assert_eq!(claims.token_type, "session");
        assert!(claims.exp - claims.iat == 604800);
    }

    #[test]
    fn test_verify_token_mauvais_secret() {
        let service = AuthService::new(test_config());
        let mut other = test_config();
        other.jwt_secret = "autre-secret".to_string();
        let other_service = AuthService::new(other);

        let token = service
            .generate_session_token(Uuid::new_v4(), ROLE_ADMIN)
            .unwrap();
        assert!(other_service.verify_token(&token).is_err());
    }

    #[test]
    fn test_generate_reset_code() {
        let code = AuthService::generate_reset_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
