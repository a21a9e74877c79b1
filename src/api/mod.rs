mod handlers;
mod middleware;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use hermes_core::Catalog;
use tower_http::trace::TraceLayer;

use crate::db::Database;
use middleware::auth_middleware;
pub use middleware::SecurityConfig;

/// Shared state of the API: the store and the tailoring catalog.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: Arc<Catalog>,
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Arc<Catalog> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

pub fn create_router(db: Database, catalog: Catalog) -> Router {
    create_router_with_security(db, catalog, SecurityConfig::disabled())
}

pub fn create_router_with_security(
    db: Database,
    catalog: Catalog,
    security: SecurityConfig,
) -> Router {
    let state = AppState {
        db,
        catalog: Arc::new(catalog),
    };

    let protected = Router::new()
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/{id}/health", get(handlers::project_health))
        .route("/projects/{id}/tailoring", post(handlers::apply_tailoring))
        .route("/projects/{id}/advance", post(handlers::advance_phase))
        .route("/projects/{id}/budget", post(handlers::add_budget_transaction))
        // Documents
        .route(
            "/projects/{id}/documents/{name}/status",
            put(handlers::set_document_status),
        )
        // Phases
        .route("/projects/{id}/phases/{key}/results", post(handlers::add_result))
        .route(
            "/projects/{id}/phases/{key}/results/{name}/status",
            put(handlers::set_result_status),
        )
        .route(
            "/projects/{id}/phases/{key}/checklist",
            put(handlers::set_checklist_item),
        )
        .route(
            "/projects/{id}/phases/{key}/validation",
            get(handlers::phase_validation),
        )
        .route(
            "/projects/{id}/phases/{key}/complete",
            post(handlers::complete_phase),
        )
        // Milestones
        .route("/projects/{id}/milestones", post(handlers::add_milestone))
        .route(
            "/projects/{id}/milestones/{index}/validation",
            get(handlers::milestone_validation),
        )
        .route(
            "/projects/{id}/milestones/{index}/reach",
            post(handlers::reach_milestone),
        )
        // Iterations
        .route("/projects/{id}/iterations", post(handlers::add_iteration))
        .route(
            "/projects/{id}/iterations/{number}",
            put(handlers::update_iteration),
        )
        .route(
            "/projects/{id}/iterations/{number}/release",
            get(handlers::release_validation),
        )
        .route(
            "/projects/{id}/iterations/{number}/approve",
            post(handlers::approve_release),
        )
        // Catalog and reports
        .route("/catalog", get(handlers::get_catalog))
        .route("/statistics", get(handlers::statistics))
        .route_layer(from_fn_with_state(security.clone(), auth_middleware));

    let api = protected
        // Health stays reachable without a token
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(security.cors_layer())
        .with_state(state)
}
