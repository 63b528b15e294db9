//! Grow-only particle buffer
//!
//! Slots are reused frame to frame. Growing appends retired placeholders;
//! the buffer never shrinks, so indices written earlier stay valid.

use std::ops::Range;

use tracing::debug;

use super::record::ParticleRecord;
use crate::error::{Result, VisError};

/// CPU-side particle array handed to the rendering surface
#[derive(Debug, Default, Clone)]
pub struct ParticleBuffer {
    records: Vec<ParticleRecord>,
}

impl ParticleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently allocated
    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Grow to at least `required` slots. No-op if already large enough.
    pub fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        let current = self.records.len();
        if current >= required {
            return Ok(());
        }

        self.records
            .try_reserve_exact(required - current)
            .map_err(|source| VisError::BufferGrowth {
                requested: required,
                source,
            })?;
        self.records.resize(required, ParticleRecord::retired());

        debug!(from = current, to = required, "Particle buffer grown");
        Ok(())
    }

    /// Overwrite a slot. Panics if `index` is out of capacity.
    #[inline]
    pub fn write(&mut self, index: usize, record: ParticleRecord) {
        self.records[index] = record;
    }

    /// Mark every slot in `range` as retired. The range is clamped to capacity.
    pub fn retire(&mut self, range: Range<usize>) {
        let end = range.end.min(self.records.len());
        if range.start >= end {
            return;
        }
        for record in &mut self.records[range.start..end] {
            record.retire();
        }
    }

    /// Slots `[0, count)`, clamped to capacity
    pub fn prefix(&self, count: usize) -> &[ParticleRecord] {
        &self.records[..count.min(self.records.len())]
    }

    /// All allocated slots
    pub fn as_slice(&self) -> &[ParticleRecord] {
        &self.records
    }

    /// Slots `[0, count)` as bytes for GPU upload
    pub fn prefix_bytes(&self, count: usize) -> &[u8] {
        bytemuck::cast_slice(self.prefix(count))
    }
}
