mod cache;
mod config;
mod db;
mod entities;
mod error;
mod handlers;
mod invitation;
mod kp;
mod models;
mod routes;
mod stats;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{cache::ApiCache, config::Config, kp::KpClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: sea_orm::DatabaseConnection,
    pub http: reqwest::Client,
    pub kp: Arc<KpClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,kinopolka=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("kinopolka/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let cache = ApiCache::new(db.clone(), config.api_cache_ttl_secs);

    let kp = KpClient::new(
        http.clone(),
        config.kp_api_token.clone(),
        config.kp_base_url.clone(),
        config.kp_rps,
        cache,
    );

    let state = Arc::new(AppState { config: config.clone(), db, http, kp: Arc::new(kp) });

    let app = Router::new()
        .route("/api/movies", get(routes::list_movies).post(routes::import_movie))
        .route("/api/movies/status", patch(routes::movie_status))
        .route("/api/movies/{kp_id}", get(routes::get_movie).delete(routes::delete_movie))
        .route(
            "/api/notes",
            get(routes::list_notes).post(routes::rate_movie).delete(routes::delete_note),
        )
        .route("/api/users", get(routes::list_users))
        .route("/api/users/{id}", get(routes::get_user))
        .route("/api/postcards", get(routes::list_postcards).post(routes::create_postcard))
        .route("/api/postcards/active", get(routes::active_postcard))
        .route(
            "/api/postcards/{id}",
            get(routes::get_postcard)
                .put(routes::update_postcard)
                .delete(routes::delete_postcard),
        )
        .route("/api/invitations", post(routes::send_invitation))
        .route("/api/statistics", get(routes::statistics))
        .route(
            "/api/bar/ingredients",
            get(routes::list_ingredients).post(routes::create_ingredient),
        )
        .route(
            "/api/bar/ingredients/{id}",
            get(routes::get_ingredient)
                .put(routes::update_ingredient)
                .delete(routes::delete_ingredient),
        )
        .route("/api/bar/cocktails", get(routes::list_cocktails).post(routes::create_cocktail))
        .route(
            "/api/bar/cocktails/{id}",
            get(routes::get_cocktail)
                .put(routes::update_cocktail)
                .delete(routes::delete_cocktail),
        )
        .route("/api/bar/cocktails/{id}/ingredients", get(routes::cocktail_ingredients))
        .route(
            "/api/bar/ingredients/{id}/availability",
            get(routes::ingredient_availability),
        )
        .route("/api/bar/cocktails/{id}/availability", get(routes::cocktail_availability))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
