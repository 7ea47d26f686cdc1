//! # Structured Logging Module
//!
//! Environment-aware structured logging. The subscriber is installed at most
//! once per process and never replaces a subscriber the host already set.

use crate::config::FlagsConfig;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    let environment = get_environment();
    let level = get_log_level(&environment);
    init_with(&level, environment == "production");
}

/// Initialize structured logging from `log_level` and `json_logs`
pub fn init_from_config(config: &FlagsConfig) {
    init_with(&config.effective_log_level(), config.json_logs);
}

/// Initialize structured logging with an explicit filter directive
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_with(level: &str, json: bool) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %get_environment(),
            level = %level,
            json = json,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Current environment name, lowercased
pub fn get_environment() -> String {
    std::env::var("FLAG_SCOPES_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

/// Default filter directive for an environment
pub fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        "test" => "warn".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for a flag write
pub fn log_flag_operation(
    operation: &str,
    table: &str,
    flag: &str,
    record_id: Option<i64>,
    affected: u64,
) {
    tracing::info!(
        operation = %operation,
        table = %table,
        flag = %flag,
        record_id = record_id,
        affected = affected,
        timestamp = %Utc::now().to_rfc3339(),
        "🚩 FLAG_OPERATION"
    );
}
