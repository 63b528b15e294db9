//! Rendering surface abstraction
//!
//! The reconciler submits a prefix of its particle buffer; the sink decides
//! what to do with it (GPU upload, snapshot, test inspection).

use super::record::ParticleRecord;

/// Outbound rendering surface for one point cloud
pub trait ParticleSink {
    /// Batch write of slots `[0, particles.len())`.
    /// `particles.len()` is the logical particle count of this submission.
    fn set_particles(&mut self, particles: &[ParticleRecord]);

    /// Show or hide the whole point cloud
    fn set_visible(&mut self, visible: bool);
}

/// Sink that keeps a copy of the latest submission in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    particles: Vec<ParticleRecord>,
    visible: bool,
    submissions: u64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records from the latest submission (live and retired)
    pub fn particles(&self) -> &[ParticleRecord] {
        &self.particles
    }

    /// Live records from the latest submission
    pub fn alive(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Number of `set_particles` calls received
    pub fn submissions(&self) -> u64 {
        self.submissions
    }
}

impl ParticleSink for MemorySink {
    fn set_particles(&mut self, particles: &[ParticleRecord]) {
        self.particles.clear();
        self.particles.extend_from_slice(particles);
        self.submissions += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleStyle;

    #[test]
    fn test_memory_sink_replaces_submission() {
        let style = ParticleStyle::default();
        let mut sink = MemorySink::new();

        sink.set_particles(&[
            ParticleRecord::alive([0.0; 3], &style),
            ParticleRecord::alive([1.0; 3], &style),
        ]);
        assert_eq!(sink.particles().len(), 2);
        assert_eq!(sink.alive_count(), 2);

        sink.set_particles(&[ParticleRecord::alive([0.0; 3], &style), ParticleRecord::retired()]);
        assert_eq!(sink.particles().len(), 2);
        assert_eq!(sink.alive_count(), 1);
        assert_eq!(sink.submissions(), 2);
    }

    #[test]
    fn test_memory_sink_visibility() {
        let mut sink = MemorySink::new();
        assert!(!sink.is_visible());
        sink.set_visible(true);
        assert!(sink.is_visible());
    }
}
