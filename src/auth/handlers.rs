use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        services,
    },
    error::{AppError, Json},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/create-account", post(create_account))
        .route("/login", post(login))
}

/// Routes that must sit behind `require_auth`.
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/get-user", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, access_token) = services::register(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(RegisterResponse {
        error: false,
        user,
        access_token,
        message: "User created successfully!".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, access_token) = services::login(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(LoginResponse {
        error: false,
        access_token,
        email: user.email,
        message: "Login successful!".into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = services::profile(state.users.as_ref(), auth.id).await?;
    Ok(Json(ProfileResponse {
        user,
        message: String::new(),
    }))
}
