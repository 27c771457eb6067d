//! Batch driver and run report.

use crate::label::{LabelOutcome, LabelRenderer};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of one pass over the value catalog.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub outcomes: Vec<LabelOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(LabelOutcome::written_path)
    }

    pub fn written_count(&self) -> usize {
        self.written().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.written_count()
    }

    pub fn duration_ms(&self) -> i64 {
        self.finished_at
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }
}

/// Renders one label per value, in order.
///
/// A label skipped for a font problem does not stop the batch; any other
/// error aborts it.
pub fn generate_labels(
    renderer: &LabelRenderer,
    values: &[u32],
    output_dir: &Path,
) -> Result<BatchReport> {
    info!(
        "Generating labels: count={}, output_dir={}",
        values.len(),
        output_dir.display()
    );

    let started_at = Utc::now();
    let mut outcomes = Vec::with_capacity(values.len());
    for &value in values {
        outcomes.push(renderer.render(value, output_dir)?);
    }

    Ok(BatchReport {
        output_dir: output_dir.to_path_buf(),
        outcomes,
        started_at,
        finished_at: Utc::now(),
    })
}
