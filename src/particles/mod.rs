//! Particle projection of point clouds
//!
//! Turns stored points into a bounded, grow-only buffer of drawable
//! particle records and hands it to a rendering sink.

mod buffer;
mod reconciler;
mod record;
mod sink;
mod visualizer;

pub use buffer::ParticleBuffer;
pub use reconciler::{Mode, ReconcileStats, RenderReconciler};
pub use record::{ParticleRecord, ParticleStyle, ALIVE_LIFETIME, RETIRED_LIFETIME};
pub use sink::{MemorySink, ParticleSink};
pub use visualizer::PointCloudVisualizer;
