// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tokscope CLI entrypoint.
//!
//! Loads settings (embedded defaults, optional TOML file, `TOKSCOPE_*` env, flags), installs file
//! logging when asked to, and runs the terminal UI against the configured tokenizer service.

use std::error::Error;

use clap::Parser;

use tokscope::config::{Args, Settings};

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let args = Args::parse();
        let settings = Settings::load(&args)?;
        // Held until exit so buffered log lines are flushed.
        let _log_guard = tokscope::logging::init(&settings)?;

        tokscope::tui::run(&settings, args.text.clone())
    })();

    if let Err(err) = result {
        eprintln!("tokscope: {err}");
        std::process::exit(1);
    }
}
