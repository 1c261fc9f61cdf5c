use crate::{
    auth,
    handlers::{appointments, auth as auth_handlers, categories, health},
    server::CareLinkServer,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create health check routes
pub fn health_routes() -> Router<CareLinkServer> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/version", get(health::version_info))
}

/// Create authentication routes
pub fn auth_routes(server: CareLinkServer) -> Router<CareLinkServer> {
    let protected = Router::new()
        .route("/logout", post(auth_handlers::logout))
        .route("/me", get(auth_handlers::me))
        .route_layer(from_fn_with_state(server, auth::require_auth));

    Router::new()
        .route("/signup", post(auth_handlers::signup))
        .route("/login", post(auth_handlers::login))
        .route("/refresh", post(auth_handlers::refresh))
        .merge(protected)
}

/// Create category routes (public reference data)
pub fn category_routes() -> Router<CareLinkServer> {
    Router::new().route("/categories", get(categories::list_categories))
}

/// Create appointment routes
pub fn appointment_routes() -> Router<CareLinkServer> {
    Router::new().route("/appointments", post(appointments::create_appointment))
}

/// Create API v1 routes
pub fn api_v1_routes(server: CareLinkServer) -> Router<CareLinkServer> {
    Router::new()
        .nest("/auth", auth_routes(server))
        .merge(category_routes())
        .merge(appointment_routes())
}

/// Create all application routes
pub fn create_app(server: CareLinkServer) -> Router {
    Router::new()
        // Health check routes (no authentication required)
        .merge(health_routes())
        // API v1 routes
        .nest("/api/v1", api_v1_routes(server.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(server)
}
