//! Point cloud particle visualizer
//!
//! Consumes per-frame point observations from an upstream tracker and keeps
//! a bounded particle buffer showing either:
//! - every point seen since the session started (`Mode::All`)
//! - only the points observed in the current frame (`Mode::CurrentFrame`)
//!
//! ```text
//! observations ──► PointStore ──► RenderReconciler ──► ParticleBuffer ──► ParticleSink
//!                  (append-only)  (working set, retire)  (grow-only)
//! ```
//!
//! Everything here is single-threaded and frame-synchronous: one frame's
//! store update and reconciliation finish before the next frame starts.

pub mod config;
pub mod core;
pub mod error;
pub mod manager;
pub mod particles;

pub use crate::config::Settings;
pub use crate::core::{
    parse_message, FrameUpdate, Message, Observation, PointId, PointStore, Position,
    TrackableId, TrackingState,
};
pub use crate::error::{Result, VisError};
pub use crate::manager::{ManagerStats, PointCloudManager};
pub use crate::particles::{
    MemorySink, Mode, ParticleBuffer, ParticleRecord, ParticleSink, ParticleStyle,
    PointCloudVisualizer, ReconcileStats, RenderReconciler,
};
