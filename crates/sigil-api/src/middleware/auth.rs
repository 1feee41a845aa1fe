// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, header},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use sigil_core::TokenCodec;

use crate::config::PUBLIC_PATHS;
use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// Every request leaves this layer with an [`AuthContext`] in its extensions,
/// or is answered with 401 before reaching the router.
#[derive(Clone)]
pub struct AuthLayer {
    tokens: TokenCodec,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer with no public paths.
    pub fn new(tokens: TokenCodec) -> Self {
        Self {
            tokens,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Adds public paths that don't require authentication.
    pub fn with_public_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut merged: HashSet<String> = self.public_paths.iter().cloned().collect();
        merged.extend(paths.into_iter().map(Into::into));
        self.public_paths = Arc::new(merged);
        self
    }

    /// Adds `/ping`, `/health` and `/login`.
    pub fn with_default_public_paths(self) -> Self {
        self.with_public_paths(PUBLIC_PATHS.iter().copied())
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            tokens: self.tokens.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    tokens: TokenCodec,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = self.tokens.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = Uuid::now_v7();
            let client_ip = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip());

            if is_public {
                let ctx = AuthContext::anonymous()
                    .with_request_id(request_id)
                    .with_client_ip(client_ip);
                req.extensions_mut().insert(ctx);
                return inner.call(req).await;
            }

            let header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            let identity = match tokens.verify_bearer(header) {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::debug!(
                        request_id = %request_id,
                        path = %req.uri().path(),
                        error = %e,
                        "Bearer authentication failed"
                    );
                    return Ok(ApiError::from(e).into_response());
                }
            };

            let ctx = AuthContext::authenticated(identity)
                .with_request_id(request_id)
                .with_client_ip(client_ip);
            req.extensions_mut().insert(ctx);

            inner.call(req).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
