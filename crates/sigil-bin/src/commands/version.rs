// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints component versions and build information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Sigil - credential and role service");
    println!();
    println!("Version Information:");
    println!("  sigil-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  sigil-core:   {}", sigil_core::VERSION);
    println!("  sigil-api:    {}", sigil_api::VERSION);
    println!("  sigil-config: {}", sigil_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
