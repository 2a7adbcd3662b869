use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use grapevine_protocol::routes;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Grapevine endpoints.
pub fn build_router(state: AppState) -> Router {
    let media_root = state.config.media_root.clone();
    Router::new()
        .route(routes::HEALTH, get(handler::health_handler))
        .route(routes::GAMES, get(handler::list_games).post(handler::new_game))
        .route(routes::PLAY, get(handler::play))
        .route(routes::ACCEPT, post(handler::accept))
        .route(routes::CLEAR, post(handler::clear))
        .route(routes::INSPECT, get(handler::inspect))
        .route(routes::CHAIN, get(handler::chain_data))
        .route(routes::RESPOND, post(handler::respond))
        .route(routes::SPROUT, post(handler::sprout))
        .route(routes::CLOSE, post(handler::close))
        .route(routes::UPLOAD, post(handler::upload))
        .nest_service(routes::MEDIA, ServeDir::new(media_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
