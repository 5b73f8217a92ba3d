pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod ratings;
pub mod routes;
pub mod tmdb;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{cache::ResponseCache, config::Config, tmdb::TmdbClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
    pub cache: ResponseCache,
    pub tmdb: Arc<TmdbClient>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/auth/register", post(routes::register))
        .route("/auth/login", post(routes::login))
        .route("/auth/protected", get(routes::protected))
        .route("/movies/search", get(routes::search_movies))
        .route("/genres/", get(routes::list_genres))
        .route("/cast/{movie_id}", get(routes::movie_cast))
        .route("/reviews/ratings", get(routes::list_user_ratings).post(routes::create_rating))
        .route(
            "/reviews/ratings/{tmdb_id}",
            put(routes::update_rating).delete(routes::delete_rating),
        )
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
