//! Prometheus metrics collection for lircd.
//!
//! Every recording helper is a no-op until [`init`] has run, so library
//! users and tests never need a registry.
//!
//! - `irc_connections_total` - Connections accepted
//! - `irc_connected_clients` - Live connections (gauge)
//! - `irc_registered_clients` - Registered sessions (gauge)
//! - `irc_command_total{command}` - Commands processed by type
//! - `irc_command_errors_total{command,error}` - Command errors by kind
//! - `irc_command_duration_seconds{command}` - Command latency histogram

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters and gauges
// ========================================================================

/// Total accepted connections.
pub static CONNECTIONS_TOTAL: OnceLock<IntCounter> = OnceLock::new();

/// Currently connected clients.
pub static CONNECTED_CLIENTS: OnceLock<IntGauge> = OnceLock::new();

/// Currently registered clients.
pub static REGISTERED_CLIENTS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Per-command metrics
// ========================================================================

/// Commands processed by type.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command processing latency by command type.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Command errors by type and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup. Metrics that fail to build or register are logged
/// and skipped.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            match $init {
                Ok(m) => {
                    if let Err(e) = r.register(Box::new(m.clone())) {
                        tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                    }
                    let _ = $metric.set(m);
                }
                Err(e) => {
                    tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                }
            }
        };
    }

    register!(CONNECTIONS_TOTAL, IntCounter::new("irc_connections_total", "Connections accepted"));
    register!(CONNECTED_CLIENTS, IntGauge::new("irc_connected_clients", "Currently connected clients"));
    register!(REGISTERED_CLIENTS, IntGauge::new("irc_registered_clients", "Currently registered clients"));

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("irc_command_total", "IRC commands processed by type"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("irc_command_duration_seconds", "IRC command latency by type")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("irc_command_errors_total", "IRC command errors by type"), &["command", "error"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// A connection was accepted.
pub fn connection_opened() {
    if let Some(c) = CONNECTIONS_TOTAL.get() {
        c.inc();
    }
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.inc();
    }
}

/// A connection was torn down.
pub fn connection_closed(was_registered: bool) {
    if let Some(g) = CONNECTED_CLIENTS.get() {
        g.dec();
    }
    if was_registered && let Some(g) = REGISTERED_CLIENTS.get() {
        g.dec();
    }
}

/// A session completed registration.
pub fn client_registered() {
    if let Some(g) = REGISTERED_CLIENTS.get() {
        g.inc();
    }
}

/// Record one processed command and its latency.
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command that ended in an error.
pub fn record_command_error(command: &str, error_kind: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error_kind]).inc();
    }
}
