use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{ProfileResponse, SigninRequest, SigninResponse, SignupRequest, SignupResponse},
        extractors::AuthUser,
        services,
    },
    error::AuthError,
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

pub fn private_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(error = %rejection, "malformed request body");
        AuthError::Validation(rejection.body_text())
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, AuthError> {
    let req = decode(payload)?;
    services::signup(&state, req).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, AuthError> {
    let req = decode(payload)?;
    services::signin(&state, req).await.map(Json)
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AuthError> {
    services::profile(&state, user_id).await.map(Json)
}
