//! QFSM local simulator
//!
//! A classical evaluator for reversible circuits over X and SWAP with
//! polarity controls. Each cell holds one bit, so circuits with thousands of
//! cells evaluate instantly and exactly.
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
//! println!("{:?}", result.counts.most_frequent());
//! ```

mod simulator;
mod state;

pub use simulator::SimulatorBackend;
pub use state::BitState;
