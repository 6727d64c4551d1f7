use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    error::{ensure_deleted, ApiError, ApiResult},
    movies::{
        dto::{CreateMovie, MovieListQuery, UpdateMovie},
        repo::{Movie, MovieFilter},
        schema,
    },
    state::AppState,
    validate::{from_record, validate},
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/:id", get(get_movie))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", post(create_movie))
        .route("/movies/:id", put(update_movie))
        .route("/movies/:id", delete(delete_movie))
}

#[instrument(skip(state))]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> ApiResult<Json<Vec<Movie>>> {
    let filter = MovieFilter {
        color: query.color,
        max_duration: query.max_duration,
    };
    let movies = Movie::list(&state.db, &filter).await?;
    Ok(Json(movies))
}

#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Movie>> {
    let movie = Movie::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("movie"))?;
    Ok(Json(movie))
}

#[instrument(skip(state, body))]
pub async fn create_movie(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Movie>)> {
    validate(schema::CREATE, &body).map_err(ApiError::Validation)?;
    let input: CreateMovie = from_record(body).map_err(ApiError::Validation)?;

    let movie = Movie::insert(&state.db, &input).await?;
    info!(movie_id = movie.id, title = %movie.title, "movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

#[instrument(skip(state, body))]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Movie>> {
    validate(schema::UPDATE, &body).map_err(ApiError::Validation)?;
    let input: UpdateMovie = from_record(body).map_err(ApiError::Validation)?;

    let existing = Movie::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("movie"))?;

    let merged = existing.merged(input);
    merged.update(&state.db).await?;
    info!(movie_id = id, "movie updated");
    Ok(Json(merged))
}

#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let affected = Movie::delete(&state.db, id).await?;
    ensure_deleted(affected, "movie")?;
    info!(movie_id = id, "movie deleted");
    Ok(Json(json!({ "message": "movie deleted" })))
}
