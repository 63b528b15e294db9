//! Session-scoped point storage
//!
//! Keeps the last known position of every point id observed since the
//! store was created. Append/update only: ids are never removed.

use std::collections::HashMap;
use tracing::trace;

use super::observation::{Observation, PointId, Position};

/// Append-only mapping PointId → last known Position
#[derive(Debug, Default, Clone)]
pub struct PointStore {
    points: HashMap<PointId, Position>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite every observation in the batch.
    ///
    /// Later entries win over earlier ones for the same id. Positions are
    /// stored as given; filtering malformed data is the caller's job.
    /// Returns the number of ids that were not in the store before.
    pub fn update<'a, I>(&mut self, observations: I) -> usize
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let before = self.points.len();
        for obs in observations {
            self.points.insert(obs.id, obs.position);
        }
        let added = self.points.len() - before;

        trace!(added, total = self.points.len(), "Point store updated");
        added
    }

    /// Every stored (id, position) pair exactly once, in no particular order
    pub fn all_points(&self) -> impl ExactSizeIterator<Item = (PointId, Position)> + '_ {
        self.points.iter().map(|(&id, &pos)| (id, pos))
    }

    /// Last known position of a point
    #[inline]
    pub fn get(&self, id: PointId) -> Option<Position> {
        self.points.get(&id).copied()
    }

    /// Number of distinct ids seen
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
