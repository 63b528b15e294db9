//! Projection of the working set into the particle buffer
//!
//! Every reconciliation follows the same path regardless of why the working
//! set changed size (new points, an empty frame, a mode switch):
//!
//! 1. Select the working set: the whole store (`All`) or this frame's batch
//!    (`CurrentFrame`)
//! 2. Grow the buffer if the set does not fit (never shrink)
//! 3. Write `[0, n)` as live particles
//! 4. Retire `[n, previous_active_count)` left over from the last submission
//! 5. Submit `[0, max(n, previous_active_count))` so retirements are flushed

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::buffer::ParticleBuffer;
use super::record::{ParticleRecord, ParticleStyle};
use super::sink::ParticleSink;
use crate::core::{Observation, PointStore, Position};
use crate::error::Result;

/// Which points are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Every point observed since the session started
    #[default]
    All,
    /// Only the points observed in the current frame
    CurrentFrame,
}

impl Mode {
    pub const ALL: &'static [Mode] = &[Mode::All, Mode::CurrentFrame];

    /// Next mode in the toggle cycle
    pub fn next(self) -> Self {
        match self {
            Mode::All => Mode::CurrentFrame,
            Mode::CurrentFrame => Mode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::All => "All",
            Mode::CurrentFrame => "Current Frame",
        }
    }
}

/// Counters from one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Live particles written this pass
    pub active: usize,
    /// Slots retired this pass
    pub retired: usize,
    /// Logical particle count submitted to the sink
    pub submitted: usize,
    /// Buffer capacity after the pass
    pub capacity: usize,
}

/// Keeps a grow-only particle buffer in sync with the selected working set
#[derive(Debug, Default)]
pub struct RenderReconciler {
    mode: Mode,
    style: ParticleStyle,
    buffer: ParticleBuffer,
    /// Active count of the previous submission
    previous_active_count: usize,
}

impl RenderReconciler {
    pub fn new(mode: Mode, style: ParticleStyle) -> Self {
        Self {
            mode,
            style,
            buffer: ParticleBuffer::new(),
            previous_active_count: 0,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Takes effect on the next reconciliation. Does not reset the active count.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn style(&self) -> &ParticleStyle {
        &self.style
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// Active count of the latest submission
    pub fn active_count(&self) -> usize {
        self.previous_active_count
    }

    /// Project the working set into the buffer and submit it.
    ///
    /// `store` must already contain `frame`. Fails only when the buffer
    /// cannot grow.
    pub fn reconcile<S>(
        &mut self,
        store: &PointStore,
        frame: &[Observation],
        sink: &mut S,
    ) -> Result<ReconcileStats>
    where
        S: ParticleSink + ?Sized,
    {
        let active = match self.mode {
            Mode::All => self.write_working_set(store.all_points())?,
            Mode::CurrentFrame => {
                self.write_working_set(frame.iter().map(|obs| (obs.id, obs.position)))?
            }
        };

        let previous = self.previous_active_count;
        let retired = previous.saturating_sub(active);
        self.buffer.retire(active..previous);

        let submitted = active.max(previous);
        sink.set_particles(self.buffer.prefix(submitted));
        self.previous_active_count = active;

        let stats = ReconcileStats {
            active,
            retired,
            submitted,
            capacity: self.buffer.capacity(),
        };
        trace!(
            mode = ?self.mode,
            active,
            retired,
            submitted,
            capacity = stats.capacity,
            "Reconciled particles"
        );
        Ok(stats)
    }

    fn write_working_set<I, T>(&mut self, working_set: I) -> Result<usize>
    where
        I: ExactSizeIterator<Item = (T, Position)>,
    {
        let count = working_set.len();
        self.buffer.ensure_capacity(count)?;

        for (index, (_, position)) in working_set.enumerate() {
            self.buffer.write(index, ParticleRecord::alive(position, &self.style));
        }
        Ok(count)
    }
}
