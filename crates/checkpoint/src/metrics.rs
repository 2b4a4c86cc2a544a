//! Checkpoint metrics.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_gauge, CounterVec, Gauge};

/// Number of the last block checkpointed on the root chain by this node.
pub static CHECKPOINT_BLOCK_NUMBER: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "bridge_checkpoint_block_number",
        "Number of the last block checkpointed by this node"
    )
    .expect("Failed to register bridge_checkpoint_block_number metric")
});

/// Checkpoint submissions by outcome.
pub static CHECKPOINT_SUBMISSIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "bridge_checkpoint_submissions_total",
        "Total checkpoint submissions by status",
        &["status"]
    )
    .expect("Failed to register bridge_checkpoint_submissions metric")
});

/// Submission outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// The transaction succeeded.
    Success,
    /// The transaction was mined and reverted.
    Failed,
    /// The transaction could not be sent.
    Error,
}

impl SubmissionStatus {
    /// The metric label value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }
}

/// Record the outcome of a checkpoint submission.
pub fn record_submission(status: SubmissionStatus) {
    CHECKPOINT_SUBMISSIONS.with_label_values(&[status.as_str()]).inc();
}

/// Record a successfully checkpointed block.
pub fn set_checkpoint_block(number: u64) {
    CHECKPOINT_BLOCK_NUMBER.set(number as f64);
}
