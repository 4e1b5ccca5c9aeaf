// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tracing setup.
//!
//! The terminal belongs to the UI, so log output only goes to a file. Without a configured log
//! file no subscriber is installed and all events are dropped.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Keeps the background log writer alive; drop it only at shutdown.
#[must_use = "dropping the guard stops log output"]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

pub fn init(settings: &Settings) -> Result<LogGuard, Box<dyn std::error::Error>> {
    let Some(log_file) = settings.log_file.as_deref() else {
        return Ok(LogGuard { _worker: None });
    };

    let (directory, file_name) = split_log_path(log_file)?;
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&settings.log_filter))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|err| format!("failed to install log subscriber: {err}"))?;

    tracing::info!(
        endpoint = %settings.endpoint,
        model = %settings.model_id,
        mode = %settings.mode,
        "tokscope starting"
    );

    Ok(LogGuard { _worker: Some(worker) })
}

/// `RUST_LOG` wins over the configured directive.
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn split_log_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr), String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("log file path has no file name: {}", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((directory, file_name))
}
