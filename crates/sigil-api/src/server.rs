// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use sigil_core::AccountService;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, RoleGateLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Returns a server builder.
    pub fn builder() -> ApiServerBuilder {
        ApiServerBuilder::new()
    }

    /// Creates the router with all routes and middleware.
    ///
    /// Administrative routes and, unless registration is open, `/register`
    /// sit behind the admin role gate.
    pub fn router(&self) -> Router {
        let admin_gate = RoleGateLayer::require(
            self.state.authorization().clone(),
            self.state.admin_role().clone(),
        );

        let mut public_paths: Vec<&str> = crate::config::PUBLIC_PATHS.to_vec();
        if self.config.open_registration {
            public_paths.push("/register");
        }
        let auth = AuthLayer::new(self.state.tokens().clone()).with_public_paths(public_paths);

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(auth);

        let admin = Router::new()
            .route(
                "/role",
                get(handlers::list_roles)
                    .post(handlers::create_role)
                    .delete(handlers::delete_role),
            )
            .route("/add-role/{role}", post(handlers::add_role))
            .route("/remove-role/{role}", post(handlers::remove_role))
            .route_layer(admin_gate.clone());

        let registration = Router::new().route("/register", post(handlers::register));
        let registration = if self.config.open_registration {
            registration
        } else {
            registration.route_layer(admin_gate)
        };

        Router::new()
            .route("/ping", get(handlers::ping))
            .route("/health", get(handlers::health))
            .route("/login", post(handlers::login))
            .route("/profile", get(handlers::profile))
            .merge(admin)
            .merge(registration)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until `shutdown_signal` resolves.
    ///
    /// In-flight requests get the configured shutdown timeout to finish.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let router = self.router();
        let grace = self.config.shutdown_timeout;
        let local = listener.local_addr().ok();

        info!(addr = ?local, "Starting API server");

        let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
        let signal = async move {
            shutdown_signal.await;
            info!("Shutdown signal received, draining connections");
            let _ = drain_tx.send(());
        };

        let server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(signal);

        tokio::select! {
            result = server => {
                result.map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;
            }
            _ = async {
                if drain_rx.await.is_ok() {
                    tokio::time::sleep(grace).await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {
                tracing::warn!(timeout = ?grace, "Shutdown timeout elapsed, dropping connections");
            }
        }

        info!("API server shutdown complete");
        Ok(())
    }

    /// Returns the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
#[derive(Default)]
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the account service.
    pub fn service(mut self, service: AccountService) -> Self {
        self.state_builder = self.state_builder.service(service);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use sigil_core::{TokenCodec, TokenConfig};
    use tower::ServiceExt;

    fn service() -> AccountService {
        AccountService::builder()
            .tokens(TokenCodec::new(TokenConfig::new("server-test-secret-0123456789abcdef")).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_server_builder() {
        let server = ApiServer::builder()
            .config(ApiConfig::default().with_port(8081))
            .service(service())
            .build()
            .unwrap();

        assert_eq!(server.addr().port(), 8081);
    }

    #[test]
    fn test_builder_requires_service() {
        assert!(ApiServer::builder().build().is_err());
    }

    #[tokio::test]
    async fn test_ping() {
        let server = ApiServer::builder().service(service()).build().unwrap();
        let response = server
            .router()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes, format!("OK, {}", crate::VERSION).as_bytes());
    }

    #[tokio::test]
    async fn test_register_gated_by_default() {
        let server = ApiServer::builder().service(service()).build().unwrap();
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"alice","password":"secret1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_open_registration() {
        let server = ApiServer::builder()
            .config(ApiConfig::default().with_open_registration(true))
            .service(service())
            .build()
            .unwrap();
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"alice","password":"secret1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_serve_stops_on_signal() {
        let server = ApiServer::builder().service(service()).build().unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

        let result = server.serve(listener, async {}).await;
        assert!(result.is_ok());
    }
}
