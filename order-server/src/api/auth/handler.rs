//! Admin auth handlers
//!
//! First-admin bootstrap, subsequent admin registration, and login.

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use shared::models::UserPublic;

use crate::auth::{CurrentUser, JwtService, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthInfo {
    #[serde(rename = "hasAdmin")]
    pub has_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPublic,
}

/// GET /api/auth/info - whether an admin account exists yet
pub async fn info(State(state): State<ServerState>) -> AppResult<Json<AuthInfo>> {
    let repo = UserRepository::new(state.db.clone());
    let count = repo.count().await?;
    Ok(Json(AuthInfo {
        has_admin: count > 0,
    }))
}

/// POST /api/auth/register - create an admin account
///
/// The first registration is open so a fresh install can bootstrap itself.
/// Once any user exists, registration requires a valid admin token. Returns
/// a token immediately so the bootstrap flow needs no separate login.
pub async fn register(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<Credentials>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let repo = UserRepository::new(state.db.clone());
    if repo.count().await? > 0 {
        require_admin_token(&state, &headers)?;
    }

    if repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(format!("User {email} already exists")));
    }

    let password_hash = hash_password(&req.password)?;
    let user = repo.create(&email, &password_hash, "ADMIN").await?;

    let token = state
        .jwt_service()
        .generate_token(user.id, &user.email, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = user.id, email = %user.email, "Admin account created");
    Ok(Json(LoginResponse {
        token,
        user: UserPublic::from(user),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<Credentials>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_lowercase();
    let repo = UserRepository::new(state.db.clone());

    let user = repo
        .find_by_email(&email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!(email = %email, "Login failed");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service()
        .generate_token(user.id, &user.email, &user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = user.id, email = %user.email, "User logged in");
    Ok(Json(LoginResponse {
        token,
        user: UserPublic::from(user),
    }))
}

/// Manual token check for registration.
///
/// The route cannot use the [`AdminUser`] extractor because its auth
/// requirement depends on database state.
///
/// [`AdminUser`]: crate::auth::AdminUser
fn require_admin_token(state: &ServerState, headers: &HeaderMap) -> Result<(), AppError> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(AppError::unauthorized)?;
    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;
    let claims = state
        .jwt_service()
        .validate_token(token)
        .map_err(|_| AppError::invalid_token("Invalid token"))?;
    let user = CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))?;
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }
    Ok(())
}
