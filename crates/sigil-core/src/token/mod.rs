// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity tokens.
//!
//! - [`TokenCodec`]: signs and verifies JWTs carrying an [`Identity`](crate::Identity)
//! - [`extract_bearer`]: strips `Authorization` header framing

mod bearer;
mod codec;

pub use bearer::{BEARER_SCHEME, extract_bearer};
pub use codec::{SigningAlgorithm, TokenCodec, TokenConfig};
