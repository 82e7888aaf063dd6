//! QFSM execution boundary
//!
//! This crate defines how a finished circuit leaves the builder: a [`Backend`]
//! accepts the circuit, the cells to measure and a shot count, and returns an
//! [`ExecutionResult`] whose [`Counts`] map outcome bitstrings to frequencies.
//! The builder never interprets the distribution itself.
//!
//! # Example
//!
//! ```ignore
//! use qfsm_adapter_sim::SimulatorBackend;
//! use qfsm_hal::Backend;
//!
//! let backend = SimulatorBackend::new();
//! let job_id = backend.submit(&circuit, &measured, 1024).await?;
//! let result = backend.wait(&job_id).await?;
//! if let Some((bitstring, count)) = result.counts.most_frequent() {
//!     println!("{bitstring}: {count}");
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;

pub use backend::{
    Availability, Backend, BackendConfig, BackendFactory, PollPolicy, ValidationResult,
};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
