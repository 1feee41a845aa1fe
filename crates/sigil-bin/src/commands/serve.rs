// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `serve` command.

use crate::cli::{Cli, ServeArgs};
use crate::error::BinResult;
use crate::logging::init_logging;
use crate::runtime::ServiceRuntime;
use crate::shutdown::shutdown_signal;

/// Loads configuration, initializes logging and runs the service.
pub async fn serve(cli: &Cli, args: ServeArgs) -> BinResult<()> {
    let mut config = super::load_configuration(cli)?;

    init_logging(
        cli.effective_log_level(config.logging.level.as_str()),
        cli.effective_log_format(config.logging.format),
    );

    if let Some(port) = args.port {
        config.server.port = port;
    }

    ServiceRuntime::new(config)?
        .with_skip_bootstrap(args.skip_bootstrap)
        .run(shutdown_signal())
        .await
}
