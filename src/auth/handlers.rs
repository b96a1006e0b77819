use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{
    dto::{LoginRequest, LoginResponse, ProfileResponse, SignupRequest, SignupResponse},
    extractors::{AuthUser, BearerToken},
    password, tokens,
    repo::User,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.first_name.trim().is_empty() {
        return Err(AppError::validation("first_name", "must not be empty"));
    }
    if payload.last_name.trim().is_empty() {
        return Err(AppError::validation("last_name", "must not be empty"));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::validation("email", "invalid email address"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::validation(
            "password",
            "must be at least 8 characters",
        ));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::validation("email", "already registered"));
    }

    let hash = password::hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        payload.first_name.trim(),
        payload.last_name.trim(),
        &payload.email,
        &hash,
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login with unknown email");
            AppError::Unauthorized
        })?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized);
    }

    let token = tokens::issue_or_reuse(&state.db, user.id).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        email: user.email,
    }))
}

/// Idempotent: revoking a token that is already gone still returns 200.
#[instrument(skip(state, token))]
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> AppResult<StatusCode> {
    tokens::revoke(&state.db, &token).await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(ProfileResponse {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
    }))
}
