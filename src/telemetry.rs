//! Structured logging for the label pipeline.

use crate::batch::BatchReport;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// Reads configuration from environment variables:
/// - `RUST_LOG` - filter directives (default: info)
/// - `LOG_FORMAT` - `json` for JSON lines, anything else for text
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

/// Records a summary of a finished batch.
///
/// Emits written/skipped counts and duration, warns when nothing was
/// written, and dumps the full report as JSON at debug level.
pub fn record_batch_telemetry(report: &BatchReport) {
    let written = report.written_count();
    let skipped = report.skipped_count();

    info!(
        written = written,
        skipped = skipped,
        duration_ms = report.duration_ms(),
        output_dir = %report.output_dir.display(),
        "Label batch finished"
    );

    if written == 0 && skipped > 0 {
        warn!(skipped = skipped, "No labels were written");
    }

    match serde_json::to_string(report) {
        Ok(json) => debug!(report = %json, "Label batch report"),
        Err(e) => warn!("Failed to serialize batch report: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelOutcome;
    use chrono::Utc;
    use std::path::PathBuf;

    #[test]
    fn test_record_batch_telemetry() {
        let now = Utc::now();
        let report = BatchReport {
            output_dir: PathBuf::from("labels"),
            outcomes: vec![LabelOutcome::Written {
                value: 10,
                path: PathBuf::from("labels/10.png"),
            }],
            started_at: now,
            finished_at: now,
        };

        // Should not panic without a subscriber
        record_batch_telemetry(&report);
    }

    #[test]
    fn test_record_all_skipped() {
        let now = Utc::now();
        let report = BatchReport {
            output_dir: PathBuf::from("labels"),
            outcomes: vec![LabelOutcome::Skipped {
                value: 10,
                reason: "Could not load font".to_string(),
            }],
            started_at: now,
            finished_at: now,
        };

        record_batch_telemetry(&report);
    }
}
