//! Job lifecycle.
//!
//! ```text
//!   Queued ─► Running ─► Completed
//!     │          │
//!     │          ├─► Failed(reason)
//!     └──────────┴─► Cancelled
//! ```
//!
//! [`Job::advance`] only moves forward. Once a job is terminal its status and
//! timestamps are frozen.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Backend-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "reason")]
pub enum JobStatus {
    /// Accepted, not started.
    Queued,
    /// Being evaluated.
    Running,
    /// Finished with a result.
    Completed,
    /// Finished without a result.
    Failed(String),
    /// Stopped on request.
    Cancelled,
}

impl JobStatus {
    /// Whether the job has finished one way or another.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    fn stage(&self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Running => 1,
            _ => 2,
        }
    }

    /// Whether a job in this status may move to `next`.
    pub fn can_advance_to(&self, next: &JobStatus) -> bool {
        !self.is_terminal() && next.stage() > self.stage()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Running => f.write_str("running"),
            JobStatus::Completed => f.write_str("completed"),
            JobStatus::Failed(reason) => write!(f, "failed: {reason}"),
            JobStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Bookkeeping for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Name of the backend that accepted the job.
    pub backend: String,
    /// Requested shots.
    pub shots: u32,
    /// Number of measured cells, the width of every outcome bitstring.
    pub measured: usize,
    status: JobStatus,
    /// When the job was accepted.
    pub submitted_at: DateTime<Utc>,
    /// When evaluation started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly accepted job.
    pub fn queued(id: JobId, backend: impl Into<String>, shots: u32, measured: usize) -> Self {
        Self {
            id,
            backend: backend.into(),
            shots,
            measured,
            status: JobStatus::Queued,
            submitted_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Move the job forward, stamping start and finish times.
    pub fn advance(&mut self, next: JobStatus) -> HalResult<()> {
        if !self.status.can_advance_to(&next) {
            return Err(HalError::InvalidTransition {
                job: self.id.clone(),
                from: self.status.clone(),
                to: next,
            });
        }
        let now = Utc::now();
        if next == JobStatus::Running {
            self.started_at = Some(now);
        }
        if next.is_terminal() {
            self.finished_at = Some(now);
        }
        self.status = next;
        Ok(())
    }

    /// Time between start and finish, once both happened.
    pub fn run_time(&self) -> Option<chrono::TimeDelta> {
        Some(self.finished_at? - self.started_at?)
    }
}
