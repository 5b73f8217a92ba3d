use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::{self, AuthUser},
    cache::request_signature,
    entities::user,
    error::{AppError, AppResult},
    models::{
        CastEntry, CreateRatingRequest, Credentials, RatedMovie, SearchParams, UpdateRatingRequest,
    },
    ratings,
};

pub async fn index() -> Json<Value> {
    Json(json!({ "msg": "Hello world!" }))
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Credentials>,
) -> AppResult<Response> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::MissingCredentials);
    };
    if email.is_empty() || password.is_empty() {
        return Err(AppError::MissingCredentials);
    }

    let existing =
        user::Entity::find().filter(user::Column::Email.eq(&email)).one(&state.db).await?;
    if existing.is_some() {
        return Err(AppError::UserExists);
    }

    user::ActiveModel {
        email: Set(email),
        password_hash: Set(auth::hash_password(&password)?),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "msg": "User created successfully" }))).into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<Credentials>,
) -> AppResult<Json<Value>> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::BadCredentials);
    };

    let user =
        user::Entity::find().filter(user::Column::Email.eq(&email)).one(&state.db).await?;
    let Some(user) = user else {
        return Err(AppError::BadCredentials);
    };
    if !auth::verify_password(&user.password_hash, &password)? {
        return Err(AppError::BadCredentials);
    }

    let token = auth::issue_token(user.id, &state.config.jwt_secret)?;
    Ok(Json(json!({ "access_token": token })))
}

/// The guard only proves the token; a valid token whose user row has since
/// disappeared still gets a 404 here.
pub async fn protected(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<Value>> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(json!({ "logged_in_as": user.email })))
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let query = params.query.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        return Err(AppError::Validation("Query parameter is required".to_string()));
    }
    let page = params.page.unwrap_or(1);
    let year = params.year;
    let genre = params.genre;

    let mut sig_params = vec![("query", query.clone()), ("page", page.to_string())];
    if let Some(year) = year {
        sig_params.push(("year", year.to_string()));
    }
    if let Some(genre) = genre {
        sig_params.push(("genre", genre.to_string()));
    }
    let key = request_signature("/movies/search", &sig_params);

    let tmdb = state.tmdb.clone();
    let (status, body) = state
        .cache
        .cached(key, Duration::from_secs(state.config.search_cache_ttl_secs), move || async move {
            let results = tmdb.search_movies(&query, page, year, genre).await?;
            Ok(serde_json::to_value(results).map_err(anyhow::Error::from)?)
        })
        .await?;

    Ok((status, Json(body)).into_response())
}

pub async fn list_genres(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let key = request_signature("/genres/", &[]);

    let tmdb = state.tmdb.clone();
    let (status, body) = state
        .cache
        .cached(key, Duration::from_secs(state.config.cache_default_ttl_secs), move || async move {
            let genres = tmdb.list_genres().await?;
            Ok(serde_json::to_value(genres).map_err(anyhow::Error::from)?)
        })
        .await?;

    Ok((status, Json(body)).into_response())
}

pub async fn movie_cast(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i32>,
) -> AppResult<Json<Vec<CastEntry>>> {
    let cast = state.tmdb.get_cast(movie_id).await?;
    Ok(Json(cast))
}

pub async fn list_user_ratings(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<RatedMovie>>> {
    let ratings = ratings::list_ratings(&state.db, auth_user.user_id).await?;
    Ok(Json(ratings))
}

pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(req): Json<CreateRatingRequest>,
) -> AppResult<Response> {
    let (Some(tmdb_id), Some(score)) = (req.tmdb_id, req.score) else {
        return Err(AppError::Validation("Missing tmdb_id or score".to_string()));
    };

    let created = ratings::create_rating(
        &state.db,
        auth_user.user_id,
        tmdb_id,
        score,
        req.movie_data.as_ref(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Rating created successfully",
            "tmdb_id": tmdb_id,
            "score": created.score,
            "movie_data": req.movie_data,
        })),
    )
        .into_response())
}

pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(tmdb_id): Path<i32>,
    Json(req): Json<UpdateRatingRequest>,
) -> AppResult<Json<Value>> {
    let Some(score) = req.score else {
        return Err(AppError::Validation("New score is required".to_string()));
    };

    let new_score = ratings::update_rating(&state.db, auth_user.user_id, tmdb_id, score).await?;
    Ok(Json(json!({ "message": "Rating updated successfully", "new_score": new_score })))
}

pub async fn delete_rating(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(tmdb_id): Path<i32>,
) -> AppResult<Json<Value>> {
    ratings::delete_rating(&state.db, auth_user.user_id, tmdb_id).await?;
    Ok(Json(json!({ "message": "Rating deleted successfully" })))
}
