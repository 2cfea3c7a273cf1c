// Copyright © 2025 lituus-io <spicyzhug@gmail.com>
// All Rights Reserved.
// Licensed under PolyForm Noncommercial 1.0.0

//! Telemetry seam
//!
//! Fire-and-forget observation hooks. Implementations must never fail and
//! never block the pipeline; anything expensive belongs behind a channel in
//! the implementation, not here.

use tracing::{error, info};

/// Observation hooks for pipeline events.
pub trait Telemetry: Send + Sync {
    /// Record a named event with string fields.
    fn track(&self, event: &str, fields: &[(&str, &str)]);

    /// Record an error by category.
    fn error(&self, category: &str, message: &str);

    /// Record a numeric measurement.
    fn metric(&self, name: &str, value: f64);
}

/// Telemetry that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn track(&self, _event: &str, _fields: &[(&str, &str)]) {}
    fn error(&self, _category: &str, _message: &str) {}
    fn metric(&self, _name: &str, _value: f64) {}
}

/// Telemetry that forwards to `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn track(&self, event: &str, fields: &[(&str, &str)]) {
        info!(event, ?fields, "pipeline event");
    }

    fn error(&self, category: &str, message: &str) {
        error!(category, message, "pipeline error");
    }

    fn metric(&self, name: &str, value: f64) {
        info!(metric = name, value, "pipeline metric");
    }
}
