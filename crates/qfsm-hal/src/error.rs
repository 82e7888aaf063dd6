//! Errors raised at the execution boundary.

use qfsm_ir::CellId;
use thiserror::Error;

use crate::job::{JobId, JobStatus};

/// Errors that can occur while resolving backends or running jobs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// No backend is registered under this name or alias.
    #[error("Unknown backend '{name}' (available: {available})")]
    UnknownBackend {
        /// The requested name.
        name: String,
        /// Registered names, comma separated.
        available: String,
    },

    /// The backend does not accept jobs right now.
    #[error("Backend '{0}' is offline")]
    Offline(String),

    /// The backend configuration is malformed.
    #[error("Invalid backend configuration: {0}")]
    Config(String),

    /// The circuit does not fit the backend.
    #[error("Circuit rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),

    /// A measured cell is not allocated in the circuit.
    #[error("Measured cell {0} is not allocated in the circuit")]
    UnknownCell(CellId),

    /// Shot count outside what the backend supports.
    #[error("Shot count {shots} outside 1..={max}")]
    InvalidShots {
        /// Requested shots.
        shots: u32,
        /// Backend maximum.
        max: u32,
    },

    /// No job with this id.
    #[error("No job {0}")]
    JobNotFound(JobId),

    /// A job status change that would move backward or leave a terminal state.
    #[error("Job {job} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The job.
        job: JobId,
        /// Current status.
        from: JobStatus,
        /// Rejected status.
        to: JobStatus,
    },

    /// The job has not produced a result.
    #[error("Job {job} has no result ({status})")]
    NoResult {
        /// The job.
        job: JobId,
        /// Its status.
        status: JobStatus,
    },

    /// The job failed on the backend.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// The job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Polling gave up before the job finished.
    #[error("Job {job} still pending after {polls} polls")]
    Timeout {
        /// The job.
        job: JobId,
        /// Number of status polls made.
        polls: u32,
    },

    /// The job finished without a single outcome.
    #[error("Execution returned no outcomes")]
    EmptyResult,
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
