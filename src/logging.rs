//! Structured logging for behavior registration and dispatch.
//!
//! Events go through `tracing`; nothing is printed unless a subscriber is
//! installed. Tests can install one with [`init_test_logging`].

use crate::behavior::Origin;
use crate::config::{Config, LoggingConfig};
use crate::key::MemberKey;
use crate::DispatchError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that switches test logging to JSON lines.
pub const JSON_ENV_VAR: &str = "MOCK_OVERRIDE_LOG_JSON";

const FALLBACK_FILTER: &str = "mock_override=debug";

/// Log a behavior registration.
pub fn log_behavior_registered(member: &MemberKey, kind: &str, origin: Origin, overwrote: bool) {
    tracing::debug!(
        member = %member,
        kind,
        defined_at = %origin,
        overwrote,
        "Behavior registered"
    );
}

/// Log a dispatch and which overrides apply to it.
pub fn log_dispatch(member: &MemberKey, addition: bool, replacement: bool) {
    tracing::trace!(member = %member, addition, replacement, "Dispatching member call");
}

/// Log a run-once behavior leaving the store.
pub fn log_run_once_retired(member: &MemberKey, kind: &str) {
    tracing::debug!(member = %member, kind, "Run-once behavior retired");
}

/// Log a run-once entry left in the store because the store was busy.
pub fn log_run_once_skipped(member: &MemberKey) {
    tracing::warn!(member = %member, "Store busy, run-once behavior not retired");
}

/// Log a configuration call rejected at the call site.
pub fn log_construction_rejected(member: &MemberKey, reason: &dyn std::fmt::Display) {
    tracing::warn!(member = %member, %reason, "Behavior registration rejected");
}

/// Log an error raised by the dispatcher itself.
pub fn log_dispatch_failure(error: &DispatchError) {
    tracing::error!(%error, "Dispatch failed");
}

/// Install a subscriber for tests, configured from the shared [`Config`].
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() -> bool {
    init_with(&Config::shared().logging)
}

/// Install a subscriber using `config`. `RUST_LOG` takes precedence over the
/// configured filter. Returns whether this call installed it.
pub fn init_with(config: &LoggingConfig) -> bool {
    let fallback_filter = config
        .filter
        .clone()
        .unwrap_or_else(|| FALLBACK_FILTER.to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback_filter.into());

    let use_json = config.json || std::env::var(JSON_ENV_VAR).is_ok();

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_test_writer()
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    }
}
