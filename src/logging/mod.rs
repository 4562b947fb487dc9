//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - console output on stderr with configurable level
//! - optional JSON log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use remarkable_dayone::logging::init_logging;
//! use remarkable_dayone::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a page export
///
/// # Example
///
/// ```no_run
/// use remarkable_dayone::log_page_start;
///
/// log_page_start!("0b7a5a2e-6d1c", 3, 12);
/// ```
#[macro_export]
macro_rules! log_page_start {
    ($page_id:expr, $page_index:expr, $total:expr) => {
        tracing::info!(
            page_id = %$page_id,
            page_index = $page_index,
            total_pages = $total,
            "Exporting page"
        );
    };
}

/// Log a page-scoped failure with its stage
///
/// # Example
///
/// ```no_run
/// use remarkable_dayone::log_page_failure;
///
/// log_page_failure!("0b7a5a2e-6d1c", "conversion", "rmc conversion failed: exit status 1");
/// ```
#[macro_export]
macro_rules! log_page_failure {
    ($page_id:expr, $stage:expr, $reason:expr) => {
        tracing::warn!(
            page_id = %$page_id,
            stage = $stage,
            reason = %$reason,
            "Page export failed"
        );
    };
}
