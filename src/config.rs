// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Configuration.
//!
//! Settings are layered, later sources overriding earlier ones:
//! 1. built-in defaults (`config/default.toml`, embedded in the binary)
//! 2. an optional TOML file (`--config <path>` or `TOKSCOPE_CONFIG`)
//! 3. environment variables prefixed with `TOKSCOPE_` (e.g. `TOKSCOPE_MODEL_ID`)
//! 4. command-line flags

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Mode, ModelId, ModelIdError};
use crate::session::SessionOptions;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");
const ENV_PREFIX: &str = "TOKSCOPE";

/// Inspect how a tokenizer service splits text into tokens, or turns ids back into text.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tokscope", version, about)]
pub struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "TOKSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the tokenizer service
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Tokenizer model id, e.g. `bert-base-uncased` or `Qwen/Qwen2.5-0.5B`
    #[arg(short, long = "model")]
    pub model_id: Option<String>,

    /// Initial mode (`tokenize` or `decode`)
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Quiet period before a request is sent, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Per-request timeout, in milliseconds
    #[arg(long = "timeout-ms")]
    pub request_timeout_ms: Option<u64>,

    /// Show a progress status while a request is outstanding
    #[arg(long = "progress")]
    pub progress_feedback: bool,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter directive; `RUST_LOG` takes precedence
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Initial input (text in tokenize mode, comma-separated ids in decode mode)
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub endpoint: String,
    pub model_id: ModelId,
    pub mode: Mode,
    pub debounce_ms: u64,
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub progress_feedback: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid model id: {0}")]
    ModelId(#[from] ModelIdError),
    #[error("endpoint must start with http:// or https:// (got `{0}`)")]
    Endpoint(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl Settings {
    /// Loads settings from all sources.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        if let Some(path) = &args.config {
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_args(args)?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_args(&mut self, args: &Args) -> Result<(), ConfigError> {
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(model_id) = &args.model_id {
            self.model_id = ModelId::new(model_id.as_str())?;
        }
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(debounce_ms) = args.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
        if let Some(timeout_ms) = args.request_timeout_ms {
            self.request_timeout_ms = timeout_ms;
        }
        if args.progress_feedback {
            self.progress_feedback = true;
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
        if let Some(log_filter) = &args.log_filter {
            self.log_filter = log_filter.clone();
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Endpoint(self.endpoint.clone()));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::Zero("debounce_ms"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Zero("request_timeout_ms"));
        }
        Ok(())
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            mode: self.mode,
            model_id: self.model_id.clone(),
            quiet_period: self.quiet_period(),
            progress_feedback: self.progress_feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use super::{Args, ConfigError, Settings};
    use crate::model::Mode;

    static TEMP_FILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    struct TempToml {
        path: PathBuf,
    }

    impl TempToml {
        fn new(contents: &str) -> Self {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
            let counter = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = std::env::temp_dir();
            path.push(format!("tokscope-config-{}-{nanos}-{counter}.toml", std::process::id()));
            std::fs::write(&path, contents).expect("write temp config");
            Self { path }
        }
    }

    impl Drop for TempToml {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    #[test]
    fn defaults_match_embedded_file() {
        let settings = Settings::load(&Args::default()).expect("settings");
        assert_eq!(settings.endpoint, "http://127.0.0.1:8000");
        assert_eq!(settings.model_id.as_str(), "bert-base-uncased");
        assert_eq!(settings.mode, Mode::Tokenize);
        assert_eq!(settings.quiet_period(), Duration::from_millis(500));
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert!(!settings.progress_feedback);
        assert_eq!(settings.log_file, None);
    }

    #[test]
    fn file_overrides_defaults_and_flags_override_file() {
        let file = TempToml::new("model_id = \"gpt2\"\nmode = \"decode\"\ndebounce_ms = 250\n");
        let args = Args {
            config: Some(file.path.clone()),
            debounce_ms: Some(100),
            ..Args::default()
        };

        let settings = Settings::load(&args).expect("settings");
        assert_eq!(settings.model_id.as_str(), "gpt2");
        assert_eq!(settings.mode, Mode::Decode);
        assert_eq!(settings.debounce_ms, 100);

        let options = settings.session_options();
        assert_eq!(options.mode, Mode::Decode);
        assert_eq!(options.quiet_period, Duration::from_millis(100));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here/tokscope.toml")),
            ..Args::default()
        };
        assert!(matches!(Settings::load(&args), Err(ConfigError::Source(_))));
    }

    #[test]
    fn rejects_invalid_values() {
        let args = Args { model_id: Some("  ".to_owned()), ..Args::default() };
        assert!(matches!(Settings::load(&args), Err(ConfigError::ModelId(_))));

        let args = Args { endpoint: Some("localhost:8000".to_owned()), ..Args::default() };
        assert!(matches!(Settings::load(&args), Err(ConfigError::Endpoint(_))));

        let args = Args { debounce_ms: Some(0), ..Args::default() };
        assert!(matches!(Settings::load(&args), Err(ConfigError::Zero("debounce_ms"))));

        let args = Args { request_timeout_ms: Some(0), ..Args::default() };
        assert!(matches!(Settings::load(&args), Err(ConfigError::Zero("request_timeout_ms"))));
    }

    #[test]
    fn parses_cli_flags() {
        let args = Args::try_parse_from([
            "tokscope",
            "--model",
            "Qwen/Qwen2.5-0.5B",
            "--mode",
            "decode",
            "--timeout-ms",
            "2500",
            "--progress",
            "101, 102",
        ])
        .expect("parse args");

        assert_eq!(args.model_id.as_deref(), Some("Qwen/Qwen2.5-0.5B"));
        assert_eq!(args.mode, Some(Mode::Decode));
        assert_eq!(args.request_timeout_ms, Some(2500));
        assert!(args.progress_feedback);
        assert_eq!(args.text.as_deref(), Some("101, 102"));
    }

    #[test]
    fn rejects_unknown_mode_flag() {
        assert!(Args::try_parse_from(["tokscope", "--mode", "encode"]).is_err());
    }
}
