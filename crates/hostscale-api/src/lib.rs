//! hostscale-api — REST API for hostscale.
//!
//! Exposes the driver registry (validate / execute scale configs) and the
//! host inventory the scaler works on.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/drivers` | List drivers and their config schemas |
//! | POST | `/api/v1/drivers/{driver}/validate` | Validate a scale config |
//! | POST | `/api/v1/drivers/{driver}/execute` | Validate and execute a scale config |
//! | GET | `/api/v1/hosts` | List hosts (`?hostTemplateId=` for one group) |
//! | POST | `/api/v1/hosts` | Register a host |
//! | DELETE | `/api/v1/hosts/{id}` | Remove a host |
//! | GET | `/healthz` | Liveness |

pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::routing::{delete, get, post};
use hostscale_autoscale::DriverRegistry;
use hostscale_state::HostStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: HostStore,
    pub registry: DriverRegistry,
    /// How long an execute call may take before the caller gets a 504.
    pub request_timeout: Duration,
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/drivers", get(handlers::list_drivers))
        .route("/drivers/{driver}/validate", post(handlers::validate_config))
        .route("/drivers/{driver}/execute", post(handlers::execute_config))
        .route("/hosts", get(handlers::list_hosts).post(handlers::create_host))
        .route("/hosts/{id}", delete(handlers::delete_host))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
}
