// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Sigil Integration Tests
//!
//! Shared test utilities and the integration suites under `tests/`.
//!
//! ## Module Structure
//!
//! - [`common`]: shared utilities
//!   - `fixtures`: secrets, profiles, legacy hashes and sample configuration
//!   - `mocks`: failure-injecting directory and catalog
//!   - `harness`: a wired service and router with request helpers
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sigil-tests
//! cargo test -p sigil-tests --test integration_core
//! cargo test -p sigil-tests --test integration_api
//! cargo test -p sigil-tests --test integration_config
//! ```
//!
//! ## Using the Harness
//!
//! ```rust,ignore
//! use sigil_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let harness = TestHarness::new();
//!     let token = harness.admin_token().await;
//!     let (status, body) = harness
//!         .send(json_request("GET", "/role", Some(&token), None))
//!         .await;
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::init_test_logging;
    pub use crate::common::mocks::*;
}
