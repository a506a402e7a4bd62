//! HTTP REST API routes

mod character_routes;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::application::error::SheetError;
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/characters", get(character_routes::list_characters))
        .route("/api/characters", post(character_routes::create_character))
        .route(
            "/api/characters/{name}",
            get(character_routes::get_character),
        )
        .route(
            "/api/characters/{name}",
            delete(character_routes::delete_character),
        )
        .route(
            "/api/characters/{name}/level-up",
            post(character_routes::level_up),
        )
        .route(
            "/api/characters/{name}/equipment",
            post(character_routes::equip_item),
        )
        .route(
            "/api/characters/{name}/equipment/remove",
            post(character_routes::unequip_item),
        )
        .route(
            "/api/characters/{name}/spells/learn",
            post(character_routes::learn_spell),
        )
        .route(
            "/api/characters/{name}/spells/prepare",
            post(character_routes::prepare_spell),
        )
        .route(
            "/api/characters/{name}/enrich",
            post(character_routes::enrich_character),
        )
}

/// Map a use-case error onto an HTTP status and message body
pub(crate) fn error_response(err: SheetError) -> (StatusCode, String) {
    let status = match &err {
        SheetError::NotFound(_) => StatusCode::NOT_FOUND,
        SheetError::Conflict(_) => StatusCode::CONFLICT,
        SheetError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SheetError::Storage(_) | SheetError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}
