//! The `Backend` trait and its configuration.
//!
//! A backend is the only place a finished circuit is evaluated. The builder
//! hands it the circuit, the cells to measure and a shot count, and reads
//! back a [`Counts`](crate::Counts) distribution:
//!
//! ```text
//!   validate ─► submit ─► status … status ─► result
//!                 │                            ▲
//!                 └──────────── wait ──────────┘
//! ```
//!
//! `validate` and `wait` are provided. Implementations supply the rest and
//! may shorten the polling cadence through [`Backend::poll_policy`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qfsm_ir::{CellId, Circuit};

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Name plus free-form options for one backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Registry name of the backend.
    pub name: String,
    /// Backend-specific options.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// A configuration without options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Set one option.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an option that must fit in a `u32`, if present.
    pub fn extra_u32(&self, key: &str) -> HalResult<Option<u32>> {
        let Some(value) = self.extra.get(key) else {
            return Ok(None);
        };
        value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| HalError::Config(format!("'{key}' must be a 32-bit count, got {value}")))
    }
}

/// Whether a backend takes jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Accepting jobs; `pending` are accepted but not yet terminal.
    Online {
        /// Jobs still queued or running.
        pending: usize,
    },
    /// Not accepting jobs.
    Offline(String),
}

impl Availability {
    /// Whether new jobs are accepted.
    pub fn is_online(&self) -> bool {
        matches!(self, Availability::Online { .. })
    }
}

/// Outcome of checking a circuit against a backend's capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The circuit can be submitted.
    Valid,
    /// The circuit cannot run here.
    Invalid {
        /// One line per violated limit.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Turn a rejection into [`HalError::Rejected`].
    pub fn into_result(self) -> HalResult<()> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { reasons } => Err(HalError::Rejected(reasons)),
        }
    }
}

/// How [`Backend::wait`] polls a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two status requests.
    pub interval: Duration,
    /// Status requests before giving up.
    pub max_polls: u32,
}

impl Default for PollPolicy {
    /// Every 500ms for up to 5 minutes.
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_polls: 600,
        }
    }
}

/// An execution backend.
///
/// `capabilities()` is cached at construction and never fails. `result()` is
/// only meaningful once `status()` reports [`JobStatus::Completed`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Registry name of this backend.
    fn name(&self) -> &str;

    /// Limits and supported primitives.
    fn capabilities(&self) -> &Capabilities;

    /// Whether the backend takes jobs right now.
    async fn availability(&self) -> HalResult<Availability>;

    /// Check a circuit against the cell limit, the instruction limit and the
    /// primitive set.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let caps = self.capabilities();
        let mut reasons = vec![];

        if circuit.num_cells() > caps.num_cells as usize {
            reasons.push(format!(
                "{} cells exceed the limit of {}",
                circuit.num_cells(),
                caps.num_cells
            ));
        }
        if let Some(limit) = caps.max_instructions {
            if circuit.len() > limit as usize {
                reasons.push(format!(
                    "{} instructions exceed the limit of {limit}",
                    circuit.len()
                ));
            }
        }
        let mut unsupported: Vec<_> = circuit
            .gate_counts()
            .into_keys()
            .filter(|name| !caps.gate_set.contains(name))
            .collect();
        unsupported.sort_unstable();
        reasons.extend(unsupported.into_iter().map(|name| format!("no '{name}' primitive")));

        Ok(if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        })
    }

    /// Submit `circuit`; outcome character `i` is the value of `measured[i]`.
    async fn submit(&self, circuit: &Circuit, measured: &[CellId], shots: u32)
    -> HalResult<JobId>;

    /// Current status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Stop a job that has not finished. Terminal jobs are left as they are.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Polling cadence used by [`wait`](Self::wait).
    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::default()
    }

    /// Poll until the job is terminal and return its result.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let policy = self.poll_policy();

        for poll in 1..=policy.max_polls {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(reason) => return Err(HalError::JobFailed(reason)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    debug!(job = %job_id, poll, "job pending");
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }

        Err(HalError::Timeout {
            job: job_id.clone(),
            polls: policy.max_polls,
        })
    }
}

/// Construction of a backend from a [`BackendConfig`].
pub trait BackendFactory: Backend + Sized {
    /// Build the backend.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A backend whose jobs never leave `Running`.
    struct Stuck {
        caps: Capabilities,
    }

    #[async_trait]
    impl Backend for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        async fn availability(&self) -> HalResult<Availability> {
            Ok(Availability::Offline("stuck".into()))
        }

        async fn submit(&self, _: &Circuit, _: &[CellId], _: u32) -> HalResult<JobId> {
            Ok(JobId::from("stuck-1"))
        }

        async fn status(&self, _: &JobId) -> HalResult<JobStatus> {
            Ok(JobStatus::Running)
        }

        async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
            Err(HalError::NoResult {
                job: job_id.clone(),
                status: JobStatus::Running,
            })
        }

        async fn cancel(&self, _: &JobId) -> HalResult<()> {
            Ok(())
        }

        fn poll_policy(&self) -> PollPolicy {
            PollPolicy {
                interval: Duration::from_millis(1),
                max_polls: 3,
            }
        }
    }

    fn stuck(num_cells: u32) -> Stuck {
        Stuck {
            caps: Capabilities::simulator(num_cells).with_max_instructions(2),
        }
    }

    #[tokio::test]
    async fn test_wait_gives_up_after_policy() {
        let backend = stuck(8);
        let err = backend.wait(&JobId::from("stuck-1")).await.unwrap_err();
        assert!(matches!(err, HalError::Timeout { polls: 3, .. }));
        assert!(!backend.availability().await.unwrap().is_online());
    }

    #[tokio::test]
    async fn test_default_validation_collects_reasons() {
        let mut circuit = Circuit::new("big");
        let q = circuit.add_register("q", 4).unwrap();
        for cell in &q {
            circuit.x(cell).unwrap();
        }

        let result = stuck(2).validate(&circuit).await.unwrap();
        let ValidationResult::Invalid { reasons } = result.clone() else {
            panic!("expected a rejection");
        };
        assert_eq!(reasons.len(), 2);
        assert!(matches!(result.into_result(), Err(HalError::Rejected(r)) if r.len() == 2));

        let small = Circuit::new("empty");
        assert!(stuck(2).validate(&small).await.unwrap().is_valid());
    }

    #[test]
    fn test_extra_u32() {
        let config = BackendConfig::new("simulator")
            .with_extra("max_cells", serde_json::json!(30))
            .with_extra("huge", serde_json::json!(u64::MAX))
            .with_extra("word", serde_json::json!("many"));

        assert_eq!(config.extra_u32("max_cells").unwrap(), Some(30));
        assert_eq!(config.extra_u32("missing").unwrap(), None);
        assert!(matches!(config.extra_u32("huge"), Err(HalError::Config(_))));
        assert!(config.extra_u32("word").is_err());
    }

    #[test]
    fn test_default_poll_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval * policy.max_polls, Duration::from_secs(300));
    }
}
