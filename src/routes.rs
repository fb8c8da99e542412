use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{Method, StatusCode, header},
    routing::{get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{Credentials, MessageResponse, Movie, MovieQuery, MovieRequest, TokenResponse},
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/movies/public", get(public_movies))
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{id}", put(update_movie).delete(delete_movie))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let Json(creds) = payload?;
    let user = state.catalog.register(&creds).await?;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(MessageResponse::new("User registered successfully"))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(creds) = payload?;
    let Some(user) = state.catalog.authenticate(&creds).await? else {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let token = state.tokens.issue(user.id, &user.username)?;
    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}

pub async fn public_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Query(query) = query?;
    Ok(Json(state.catalog.list_movies(&query).await?))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Query(query) = query?;
    Ok(Json(state.catalog.list_movies(&query).await?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let Json(req) = payload?;
    let movie = state.catalog.create_movie(&req).await?;
    info!(movie_id = movie.id, username = %user.username, "movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> AppResult<Json<Movie>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let movie = state.catalog.update_movie(id, &req).await?;
    info!(movie_id = id, username = %user.username, "movie updated");
    Ok(Json(movie))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.catalog.delete_movie(id).await?;
    info!(movie_id = id, username = %user.username, "movie deleted");
    Ok(Json(MessageResponse::new("Movie deleted")))
}
