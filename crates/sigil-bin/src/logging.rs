// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.

use sigil_config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// Logging Initialization
// =============================================================================

/// Initializes the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is a no-op.
///
/// ```ignore
/// use sigil_bin::logging::init_logging;
/// use sigil_config::LogFormat;
///
/// init_logging("info", LogFormat::Json);
/// ```
pub fn init_logging(level: &str, format: LogFormat) {
    let env_filter = build_filter(level);

    let result = match format {
        LogFormat::Text => {
            let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(true).with_ansi(is_terminal))
                .try_init()
        }
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init(),
        LogFormat::Compact => {
            let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_ansi(is_terminal),
                )
                .try_init()
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Logging already initialized");
    }
}

/// Builds the filter from `RUST_LOG`, falling back to `level`.
///
/// Dependency crates are held at `warn` unless `RUST_LOG` says otherwise.
fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directives = format!("{level},hyper=warn,tower=warn,h2=warn");
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Invalid log level '{}': {}; using info", level, e);
        EnvFilter::new("info,hyper=warn,tower=warn,h2=warn")
    })
}

// =============================================================================
// Tests
// =============================================================================
