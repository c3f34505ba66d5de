//! Router configuration for Web API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_user, delete_correspondence, delete_message, edit_correspondence, edit_message,
    get_correspondence, list_correspondences, remove_user, send_message, start_correspondence,
    AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let correspondence_routes = Router::new()
        .route("/", get(list_correspondences).post(start_correspondence))
        .route(
            "/:id",
            get(get_correspondence)
                .put(edit_correspondence)
                .delete(delete_correspondence),
        )
        .route("/:id/users/:user_id", post(add_user).delete(remove_user))
        .route("/:id/messages", post(send_message))
        .route(
            "/messages/:message_id",
            put(edit_message).delete(delete_message),
        );

    let api_routes = Router::new().nest("/correspondences", correspondence_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    jwt_auth(jwt_state.clone(), req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
