// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Sigil binary entry point.

use sigil_bin::cli::Cli;
use sigil_bin::error::report_error_and_exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = sigil_bin::commands::execute(cli).await {
        tracing::error!(error = %e, "Command failed");
        report_error_and_exit(e);
    }
}
