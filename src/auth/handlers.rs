use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{MeResponse, PublicUser, TokenResponse, UserPayload},
        extractors::AuthUser,
    },
    error::ApiError,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/login", post(login))
        .route("/users/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.accounts.create(payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.accounts.authenticate(&payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user_id): AuthUser) -> Json<MeResponse> {
    Json(MeResponse { id: user_id })
}
