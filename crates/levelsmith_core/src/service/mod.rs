//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Map repository failures onto the caller-facing `LevelError` taxonomy.
//! - Emit one structured log line per operation (ids only, never names or
//!   payloads).

pub mod catalog_service;
pub mod draft_service;
pub mod lifecycle;
pub mod publication_service;

use crate::error::{LevelError, LevelResult};
use log::{error, info, warn};
use std::fmt::Display;
use std::time::Instant;

/// Logs the outcome of one operation on `target`.
fn log_outcome<T>(
    event: &str,
    module: &str,
    target: impl Display,
    started_at: Instant,
    result: &LevelResult<T>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event={event} module={module} status=ok target={target} duration_ms={duration_ms}"
        ),
        Err(err @ (LevelError::Storage(_) | LevelError::StorageUnavailable(_))) => error!(
            "event={event} module={module} status=error target={target} duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
        Err(err) => warn!(
            "event={event} module={module} status=rejected target={target} duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
}
