use axum::{http::HeaderValue, middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::{AllowOrigin, CorsLayer}, trace::TraceLayer};

use crate::auth::CredentialValidator;
use crate::config::AppConfig;
use crate::database::SeriesStore;
use crate::handlers;
use crate::middleware::{require_credential, require_owner};
use crate::query::ScopedQueryBuilder;

/// Shared, read-only state handed to every request
#[derive(Clone, Debug)]
pub struct AppState {
    pub validator: Arc<CredentialValidator>,
    pub series: ScopedQueryBuilder,
}

impl AppState {
    pub fn new(validator: CredentialValidator, store: Arc<dyn SeriesStore>, query_timeout: Duration) -> Self {
        Self {
            validator: Arc::new(validator),
            series: ScopedQueryBuilder::new(store, query_timeout),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/ping", get(handlers::public::ping))
        .route("/hello", get(handlers::public::hello))
        .route("/health", get(handlers::public::health))
        // Protected
        .merge(series_routes(state.clone()))
        .with_state(state)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
}

fn series_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::series;

    Router::new()
        .route("/series", get(series::series_list))
        .route("/serie/:id", get(series::series_get))
        // Layers run outermost-last: credential check first, then owner extraction
        .route_layer(middleware::from_fn_with_state(state.clone(), require_owner))
        .route_layer(middleware::from_fn_with_state(state, require_credential))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let security = &config.security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET])
        .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE])
}
