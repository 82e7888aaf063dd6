//! Static partition of the ancilla pool into per-stage windows.

use std::ops::Range;

use qfsm_gates::Gate;
use qfsm_ir::Register;
use tracing::debug;

use crate::error::{FsmError, FsmResult};

/// Ancilla cells borrowed by one builder stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageWindow {
    /// Stage index.
    pub stage: usize,
    /// Broadcast lanes of the stage's `BitwiseCand` (`n` cells).
    pub cand: Register,
    /// Broadcast lanes of the stage's `Rotate` (`⌊(n+1)/2⌋` cells).
    pub rotate: Register,
}

impl StageWindow {
    /// Both slices, in pool order.
    pub fn registers(&self) -> [&Register; 2] {
        [&self.cand, &self.rotate]
    }
}

/// Hands out disjoint, bounds-checked windows of the shared ancilla pool.
///
/// Stage `i` owns `[i·w, (i+1)·w)` with `w = 3·⌊n/2⌋`. A window is live from
/// [`acquire`](Self::acquire) until [`release`](Self::release); acquiring a
/// live window again is an allocation error.
#[derive(Debug, Clone)]
pub struct AncillaAllocator {
    pool: Register,
    n: usize,
    live: Vec<bool>,
}

impl AncillaAllocator {
    /// Pool width for `stages` stages over strings of length `n`.
    pub const fn pool_width(n: usize, stages: usize) -> usize {
        3 * (n / 2) * stages
    }

    /// Wrap `pool`, checking it is exactly [`pool_width`](Self::pool_width) wide.
    pub fn new(pool: Register, n: usize, stages: usize) -> FsmResult<Self> {
        let expected = Self::pool_width(n, stages);
        if pool.len() != expected {
            return Err(FsmError::Allocation(format!(
                "ancilla pool '{}' has {} cells, {stages} stages over n = {n} need {expected}",
                pool.name(),
                pool.len()
            )));
        }
        let cand = Gate::cand_ancilla(n);
        let rotate = Gate::rotate_ancilla(n + 1);
        if cand + rotate > Self::window_width_for(n) {
            return Err(FsmError::Allocation(format!(
                "stage window of {} cells cannot hold {cand} + {rotate} ancilla cells",
                Self::window_width_for(n)
            )));
        }
        Ok(Self {
            pool,
            n,
            live: vec![false; stages],
        })
    }

    const fn window_width_for(n: usize) -> usize {
        3 * (n / 2)
    }

    /// Cells per stage window.
    pub fn window_width(&self) -> usize {
        Self::window_width_for(self.n)
    }

    /// Number of stages the pool serves.
    pub fn stages(&self) -> usize {
        self.live.len()
    }

    /// The whole pool.
    pub fn pool(&self) -> &Register {
        &self.pool
    }

    /// Pool offsets owned by `stage`.
    pub fn window_bounds(&self, stage: usize) -> FsmResult<Range<usize>> {
        if stage >= self.stages() {
            return Err(FsmError::Allocation(format!(
                "stage {stage} is outside the {} provisioned stages",
                self.stages()
            )));
        }
        let width = self.window_width();
        Ok(stage * width..(stage + 1) * width)
    }

    /// Bounds of every window, in stage order.
    pub fn windows(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let width = self.window_width();
        (0..self.stages()).map(move |i| i * width..(i + 1) * width)
    }

    /// Whether `stage`'s window is currently borrowed.
    pub fn is_live(&self, stage: usize) -> bool {
        self.live.get(stage).copied().unwrap_or(false)
    }

    /// Borrow `stage`'s window.
    pub fn acquire(&mut self, stage: usize) -> FsmResult<StageWindow> {
        let bounds = self.window_bounds(stage)?;
        if self.live[stage] {
            return Err(FsmError::Allocation(format!(
                "ancilla window of stage {stage} is already in use"
            )));
        }

        let cand_len = Gate::cand_ancilla(self.n);
        let rotate_len = Gate::rotate_ancilla(self.n + 1);
        let cand = self
            .pool
            .view(bounds.start, cand_len, format!("anc{stage}.cand"))?;
        let rotate = self.pool.view(
            bounds.start + cand_len,
            rotate_len,
            format!("anc{stage}.rot"),
        )?;

        self.live[stage] = true;
        debug!(stage, start = bounds.start, end = bounds.end, "acquired ancilla window");
        Ok(StageWindow {
            stage,
            cand,
            rotate,
        })
    }

    /// Return a window. Its cells must already be back at 0.
    pub fn release(&mut self, window: StageWindow) -> FsmResult<()> {
        match self.live.get_mut(window.stage) {
            Some(live) if *live => {
                *live = false;
                debug!(stage = window.stage, "released ancilla window");
                Ok(())
            }
            _ => Err(FsmError::Allocation(format!(
                "ancilla window of stage {} is not in use",
                window.stage
            ))),
        }
    }
}
