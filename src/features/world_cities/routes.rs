use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::world_cities::handlers;
use crate::features::world_cities::services::WorldCityService;

/// Create routes for the world cities feature
///
/// Note: callers must mount these behind the auth middleware
pub fn routes(service: Arc<WorldCityService>) -> Router {
    Router::new()
        .route(
            "/api/world-cities",
            get(handlers::list_world_cities).post(handlers::create_world_city),
        )
        .route(
            "/api/world-cities/{id}",
            get(handlers::get_world_city)
                .patch(handlers::update_world_city)
                .put(handlers::update_world_city)
                .delete(handlers::delete_world_city),
        )
        .with_state(service)
}
