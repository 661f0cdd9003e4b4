use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    AppState,
    error::AppResult,
    models::{Film, FilmCandidate, User, UserCandidate},
};

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/films", get(list_films).post(create_film).put(update_film))
        .route("/films/{id}", get(get_film))
        .route("/users", get(list_users).post(create_user).put(update_user))
        .route("/users/{id}", get(get_user))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_films(State(state): State<Arc<AppState>>) -> Json<Vec<Film>> {
    let films = state.catalog.list_films();
    info!(count = films.len(), "listing films");
    Json(films)
}

pub async fn get_film(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Film>> {
    let Path(id) = id?;
    Ok(Json(state.catalog.get_film(id)?))
}

pub async fn create_film(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilmCandidate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Film>)> {
    let Json(candidate) = payload?;
    info!(?candidate, "creating film");

    let film = state.catalog.create_film(candidate)?;
    info!(id = film.id, total = state.catalog.film_count(), "film created");
    Ok((StatusCode::CREATED, Json(film)))
}

pub async fn update_film(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilmCandidate>, JsonRejection>,
) -> AppResult<Json<Film>> {
    let Json(candidate) = payload?;
    info!(?candidate, "updating film");

    let film = state.catalog.update_film(candidate)?;
    info!(id = film.id, "film updated");
    Ok(Json(film))
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<User>> {
    let users = state.catalog.list_users();
    info!(count = users.len(), "listing users");
    Json(users)
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<User>> {
    let Path(id) = id?;
    Ok(Json(state.catalog.get_user(id)?))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserCandidate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<User>)> {
    let Json(candidate) = payload?;
    info!(?candidate, "creating user");

    let user = state.catalog.create_user(candidate)?;
    info!(id = user.id, total = state.catalog.user_count(), "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserCandidate>, JsonRejection>,
) -> AppResult<Json<User>> {
    let Json(candidate) = payload?;
    info!(?candidate, "updating user");

    let user = state.catalog.update_user(candidate)?;
    info!(id = user.id, "user updated");
    Ok(Json(user))
}
