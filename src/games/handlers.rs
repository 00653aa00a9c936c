use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::{extractors::AuthUser, validation::ValidationError},
    error::ApiError,
    state::AppState,
};

use super::dto::CreateGameRequest;
use super::repo::Game;

pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/:id", get(get_game))
}

#[instrument(skip(state, _user))]
pub async fn list_games(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<Game>>, ApiError> {
    let games = state.games.all().await.map_err(internal)?;
    Ok(Json(games))
}

#[instrument(skip(state, user, body))]
pub async fn create_game(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateGameRequest>,
) -> Result<Json<Game>, ApiError> {
    if !body.id.is_empty() {
        return Err(ValidationError::forbidden("id").into());
    }
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ValidationError::missing("name").into());
    }

    let game = state.games.insert(name).await.map_err(internal)?;
    info!(game_id = %game.id, user_id = %user.0, "game created");
    Ok(Json(game))
}

#[instrument(skip(state, _user))]
pub async fn get_game(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Game>, ApiError> {
    state
        .games
        .get(id)
        .await
        .map_err(internal)?
        .map(Json)
        .ok_or(ApiError::NotFound("game"))
}

fn internal(e: anyhow::Error) -> ApiError {
    error!(error = %e, "game store failed");
    ApiError::Internal
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn request(name: &str) -> CreateGameRequest {
        CreateGameRequest {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_fetch_game() {
        let state = AppState::fake();
        let user = Uuid::new_v4();

        let Json(created) = create_game(State(state.clone()), AuthUser(user), Json(request("Portal 2")))
            .await
            .unwrap();
        assert_eq!(created.name, "Portal 2");

        let Json(fetched) = get_game(State(state.clone()), AuthUser(user), Path(created.id))
            .await
            .unwrap();
        assert_eq!(fetched, created);

        let Json(all) = list_games(State(state), AuthUser(user)).await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn create_game_requires_name_and_no_id() {
        let state = AppState::fake();

        let err = create_game(State(state.clone()), AuthUser(Uuid::new_v4()), Json(request("  ")))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let with_id = CreateGameRequest {
            id: "1".into(),
            name: "Doom".into(),
        };
        let err = create_game(State(state), AuthUser(Uuid::new_v4()), Json(with_id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_game_is_not_found() {
        let state = AppState::fake();
        let resp = get_game(State(state), AuthUser(Uuid::new_v4()), Path(Uuid::new_v4()))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
