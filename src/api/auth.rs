use axum::{extract::State, routing::post, routing::put, Json, Router};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::{AppState, AuthUser, Role};
use crate::models::{
    AdminAuthResponse, AdminPublic, AuthResponse, ChangePasswordRequest, Client, ClientPublic,
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::services::{
    auth_service::{normalize_ci_phone, validate_ci_phone, ROLE_ADMIN, ROLE_CLIENT},
    AuthService, EmailService,
};
use crate::utils::validators::validate_email;

/// Réponse à l'inscription
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub client: ClientPublic,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/admin/login", post(admin_login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/password", put(change_password))
}

/// Inscription d'un client
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Compte créé, en attente d'activation", body = RegisterResponse),
        (status = 409, description = "Adresse e-mail déjà utilisée"),
        (status = 422, description = "Données invalides")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let telephone = normalize_ci_phone(&payload.telephone);
    if !validate_ci_phone(&telephone) {
        return Err(AppError::Validation(
            "Numéro de téléphone ivoirien invalide".to_string(),
        ));
    }

    let existing = AuthService::get_client_by_email(&state.pool, &payload.email).await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Un compte existe déjà avec cette adresse e-mail".to_string(),
        ));
    }

    let password_hash = AuthService::hash_password(&payload.password)?;

    // Tout nouveau compte attend l'activation du back office
    let client = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (nom, prenoms, email, telephone, password_hash, enabled)
        VALUES ($1, $2, $3, $4, $5, false)
        RETURNING *
        "#,
    )
    .bind(&payload.nom)
    .bind(&payload.prenoms)
    .bind(&payload.email)
    .bind(&telephone)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Compte créé. Il sera activé par notre équipe sous peu.",
        "client": ClientPublic::from(client)
    })))
}

/// Connexion d'un client
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Connexion réussie", body = AuthResponse),
        (status = 401, description = "Identifiants invalides"),
        (status = 403, description = "Compte en attente d'activation")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let client = AuthService::get_client_by_email(&state.pool, &payload.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !AuthService::verify_password(&payload.password, &client.password_hash) {
        return Err(AppError::Unauthorized);
    }

    // La connexion est refusée tant que le compte n'est pas activé
    if !client.enabled {
        return Err(AppError::Forbidden);
    }

    AuthService::update_last_login(&state.pool, client.id).await?;

    let auth_service = AuthService::new(state.config.clone());
    let token = auth_service.generate_session_token(client.id, ROLE_CLIENT)?;

    Ok(Json(AuthResponse {
        token,
        client: ClientPublic::from(client),
    }))
}

/// Connexion au back office
#[utoipa::path(
    post,
    path = "/api/v1/auth/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Connexion réussie", body = AdminAuthResponse),
        (status = 401, description = "Identifiants invalides")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AdminAuthResponse>> {
    let admin = AuthService::get_admin_by_email(&state.pool, &payload.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !AuthService::verify_password(&payload.password, &admin.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let auth_service = AuthService::new(state.config.clone());
    let token = auth_service.generate_session_token(admin.id, ROLE_ADMIN)?;

    Ok(Json(AdminAuthResponse {
        token,
        admin: AdminPublic::from(admin),
    }))
}

/// Demande de réinitialisation du mot de passe
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Code envoyé par e-mail"),
        (status = 404, description = "Aucun compte pour cette adresse"),
        (status = 429, description = "Trop de demandes")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> AppResult<Json<Value>> {
    if !validate_email(&payload.email) {
        return Err(AppError::Validation("Adresse e-mail invalide".to_string()));
    }

    let client = AuthService::get_client_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Aucun compte pour cette adresse".to_string()))?;

    // Limite d'envoi par adresse
    let recent_count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM reset_codes
        WHERE email = $1 AND created_at > NOW() - INTERVAL '1 hour'
        "#,
    )
    .bind(&payload.email)
    .fetch_one(&state.pool)
    .await?;

    if recent_count.0 >= 5 {
        return Err(AppError::TooManyRequests);
    }

    let code = AuthService::generate_reset_code();
    AuthService::save_reset_code(&state.pool, &payload.email, &code).await?;

    // Ici l'e-mail EST l'opération : un échec remonte en 503
    let email_service = EmailService::new(state.config.clone());
    email_service.send_reset_code(&client.email, &code).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Code de réinitialisation envoyé"
    })))
}

/// Réinitialisation du mot de passe avec le code reçu
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Mot de passe réinitialisé"),
        (status = 400, description = "Code invalide ou expiré"),
        (status = 429, description = "Trop de tentatives")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let is_valid =
        AuthService::verify_reset_code(&state.pool, &payload.email, &payload.code).await?;

    if !is_valid {
        let attempts: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT attempts FROM reset_codes
            WHERE email = $1 AND is_used = false AND expires_at > NOW()
            ORDER BY created_at DESC LIMIT 1
            "#,
        )
        .bind(&payload.email)
        .fetch_optional(&state.pool)
        .await?;

        if let Some((count,)) = attempts {
            if count >= 3 {
                return Err(AppError::TooManyAttempts);
            }
        }

        return Err(AppError::InvalidCode);
    }

    let password_hash = AuthService::hash_password(&payload.password)?;

    sqlx::query("UPDATE clients SET password_hash = $1, updated_at = NOW() WHERE email = $2")
        .bind(&password_hash)
        .bind(&payload.email)
        .execute(&state.pool)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Mot de passe réinitialisé"
    })))
}

/// Changement de mot de passe (connecté)
#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Mot de passe changé"),
        (status = 401, description = "Ancien mot de passe incorrect"),
        (status = 422, description = "Nouveau mot de passe trop court")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let current_hash = match auth_user.role {
        Role::Client => {
            AuthService::get_client_by_id(&state.pool, auth_user.id)
                .await?
                .password_hash
        }
        Role::Admin => {
            let admin: (String,) =
                sqlx::query_as("SELECT password_hash FROM admins WHERE id = $1")
                    .bind(auth_user.id)
                    .fetch_optional(&state.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Compte introuvable".to_string()))?;
            admin.0
        }
    };

    if !AuthService::verify_password(&payload.old_password, &current_hash) {
        return Err(AppError::Unauthorized);
    }

    let password_hash = AuthService::hash_password(&payload.new_password)?;

    match auth_user.role {
        Role::Client => {
            sqlx::query("UPDATE clients SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(&password_hash)
                .bind(auth_user.id)
                .execute(&state.pool)
                .await?;
        }
        Role::Admin => {
            sqlx::query("UPDATE admins SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(&password_hash)
                .bind(auth_user.id)
                .execute(&state.pool)
                .await?;
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "Mot de passe changé"
    })))
}
