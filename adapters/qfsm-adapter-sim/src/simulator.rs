//! Simulator backend implementation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use qfsm_hal::{
    Availability, Backend, BackendConfig, BackendFactory, Capabilities, Counts, ExecutionResult,
    HalError, HalResult, Job, JobId, JobStatus, PollPolicy,
};
use qfsm_ir::{CellId, Circuit};

use crate::state::BitState;

const DEFAULT_MAX_CELLS: u32 = 4096;

/// A job and, once completed, its result.
struct Entry {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Every circuit starts from the all-zero state and is evaluated once.
/// X and SWAP with any controls are deterministic, so all shots observe the
/// same bitstring. Evaluation happens inside `submit`; the job is already
/// terminal when the id is returned.
///
/// Options read from [`BackendConfig`]: `max_cells` (cell limit, default
/// 4096) and `max_instructions` (instruction limit, none by default).
pub struct SimulatorBackend {
    name: String,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<JobId, Entry>>>,
}

impl SimulatorBackend {
    /// A simulator with the default cell limit.
    pub fn new() -> Self {
        Self::with_capabilities("simulator", Capabilities::simulator(DEFAULT_MAX_CELLS))
    }

    /// A simulator with a custom cell limit.
    pub fn with_max_cells(max_cells: u32) -> Self {
        Self::with_capabilities("simulator", Capabilities::simulator(max_cells))
    }

    fn with_capabilities(name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    fn jobs(&self) -> MutexGuard<'_, FxHashMap<JobId, Entry>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Evaluate the circuit and count the measured bitstring.
    #[instrument(skip(circuit, measured), fields(cells = circuit.num_cells(), instructions = circuit.len()))]
    fn evaluate(circuit: &Circuit, measured: &[CellId], shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let state = BitState::evaluate(circuit);
        let outcome = state.bitstring(measured);

        let mut counts = Counts::new();
        counts.insert(outcome.as_str(), u64::from(shots));

        let elapsed = start.elapsed();
        debug!(%outcome, ?elapsed, "evaluated circuit");
        ExecutionResult::new(counts, shots).with_execution_time(millis(elapsed))
    }

    fn check_request(&self, circuit: &Circuit, measured: &[CellId], shots: u32) -> HalResult<()> {
        let max = self.capabilities.max_shots;
        if shots == 0 || shots > max {
            return Err(HalError::InvalidShots { shots, max });
        }
        match measured.iter().find(|c| c.index() >= circuit.num_cells()) {
            Some(&cell) => Err(HalError::UnknownCell(cell)),
            None => Ok(()),
        }
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<Availability> {
        let pending = self
            .jobs()
            .values()
            .filter(|e| !e.job.status().is_terminal())
            .count();
        Ok(Availability::Online { pending })
    }

    #[instrument(skip(self, circuit, measured), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, measured: &[CellId], shots: u32) -> HalResult<JobId> {
        self.validate(circuit).await?.into_result()?;
        self.check_request(circuit, measured, shots)?;

        let id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::queued(id.clone(), &self.name, shots, measured.len());
        job.advance(JobStatus::Running)?;
        self.jobs().insert(id.clone(), Entry { job, result: None });
        debug!(job = %id, "job running");

        let result = Self::evaluate(circuit, measured, shots);

        let mut jobs = self.jobs();
        let entry = jobs
            .get_mut(&id)
            .ok_or_else(|| HalError::JobNotFound(id.clone()))?;
        if entry.job.status() == &JobStatus::Running {
            entry.job.advance(JobStatus::Completed)?;
            entry.result = Some(result);
        }
        Ok(id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs()
            .get(job_id)
            .map(|e| e.job.status().clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs();
        let entry = jobs
            .get(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))?;
        match (entry.job.status(), &entry.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::NoResult {
                job: job_id.clone(),
                status: status.clone(),
            }),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs();
        let entry = jobs
            .get_mut(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.clone()))?;
        if !entry.job.status().is_terminal() {
            entry.job.advance(JobStatus::Cancelled)?;
        }
        Ok(())
    }

    fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(10),
            max_polls: 100,
        }
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_cells = config.extra_u32("max_cells")?.unwrap_or(DEFAULT_MAX_CELLS);
        let mut capabilities = Capabilities::simulator(max_cells);
        if let Some(limit) = config.extra_u32("max_instructions")? {
            capabilities = capabilities.with_max_instructions(limit);
        }
        Ok(Self::with_capabilities(config.name, capabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cell_copy() -> Circuit {
        let mut circuit = Circuit::new("copy");
        circuit.add_register("q", 2).unwrap();
        circuit.x(CellId(0)).unwrap().cx(CellId(0), CellId(1)).unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_cells, DEFAULT_MAX_CELLS);
        assert_eq!(
            backend.availability().await.unwrap(),
            Availability::Online { pending: 0 }
        );
    }

    #[tokio::test]
    async fn test_simulator_deterministic_counts() {
        let backend = SimulatorBackend::new();
        let circuit = two_cell_copy();

        let job_id = backend
            .submit(&circuit, &[CellId(1), CellId(0)], 100)
            .await
            .unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 100);
        assert_eq!(result.counts.get("11"), 100);
        assert_eq!(result.counts.len(), 1);
    }

    #[tokio::test]
    async fn test_simulator_rejects_large_circuit() {
        let backend = SimulatorBackend::with_max_cells(1);
        let result = backend.submit(&two_cell_copy(), &[CellId(0)], 10).await;
        assert!(matches!(result, Err(HalError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_simulator_rejects_bad_shots_and_cells() {
        let backend = SimulatorBackend::new();
        let circuit = two_cell_copy();
        assert!(matches!(
            backend.submit(&circuit, &[CellId(0)], 0).await,
            Err(HalError::InvalidShots { shots: 0, .. })
        ));
        assert!(matches!(
            backend.submit(&circuit, &[CellId(9)], 1).await,
            Err(HalError::UnknownCell(CellId(9)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("missing");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(backend.cancel(&missing).await.is_err());
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_micros(2_500)), 2);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("simulator")
            .with_extra("max_cells", serde_json::json!(16))
            .with_extra("max_instructions", serde_json::json!(100));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.capabilities().num_cells, 16);
        assert_eq!(backend.capabilities().max_instructions, Some(100));

        let bad = BackendConfig::new("simulator").with_extra("max_cells", serde_json::json!(-1));
        assert!(matches!(
            SimulatorBackend::from_config(bad),
            Err(HalError::Config(_))
        ));
    }
}
