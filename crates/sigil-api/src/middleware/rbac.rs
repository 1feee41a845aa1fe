// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role requirement middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use sigil_core::{AuthError, AuthorizationEngine, Role};

use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// RoleGateLayer
// =============================================================================

/// Layer guarding routes behind a fixed set of required roles.
///
/// Runs the catalog check before the membership check on every request, so
/// an unregistered role answers 500 even for callers who hold it.
#[derive(Clone)]
pub struct RoleGateLayer {
    engine: AuthorizationEngine,
    required: Arc<Vec<Role>>,
}

impl RoleGateLayer {
    /// Creates a layer requiring every role in `required`.
    pub fn new(engine: AuthorizationEngine, required: Vec<Role>) -> Self {
        Self {
            engine,
            required: Arc::new(required),
        }
    }

    /// Creates a layer requiring a single role.
    pub fn require(engine: AuthorizationEngine, role: Role) -> Self {
        Self::new(engine, vec![role])
    }
}

impl<S> Layer<S> for RoleGateLayer {
    type Service = RoleGateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGateMiddleware {
            inner,
            engine: self.engine.clone(),
            required: self.required.clone(),
        }
    }
}

// =============================================================================
// RoleGateMiddleware
// =============================================================================

/// Middleware enforcing the role requirement.
#[derive(Clone)]
pub struct RoleGateMiddleware<S> {
    inner: S,
    engine: AuthorizationEngine,
    required: Arc<Vec<Role>>,
}

impl<S> Service<Request<Body>> for RoleGateMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let engine = self.engine.clone();
        let required = self.required.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<AuthContext>()
                .and_then(|ctx| ctx.identity.clone());

            let Some(identity) = identity else {
                tracing::warn!(path = %req.uri().path(), "No identity on gated route");
                return Ok(ApiError::from(AuthError::Unauthenticated).into_response());
            };

            match engine.enforce(&identity, &required).await {
                Ok(()) => inner.call(req).await,
                Err(e) => Ok(ApiError::from(e).into_response()),
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
