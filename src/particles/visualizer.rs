//! Per-cloud particle visualizer
//!
//! Owns the point store, the reconciler and the rendering sink for one
//! upstream point cloud, plus its enabled/tracking visibility.

use tracing::{debug, trace};

use super::reconciler::{Mode, ReconcileStats, RenderReconciler};
use super::record::ParticleStyle;
use super::sink::ParticleSink;
use crate::core::{FrameUpdate, Observation, PointStore, TrackingState};
use crate::error::Result;

/// Renders one point cloud as particles, persisting every point it has seen
#[derive(Debug)]
pub struct PointCloudVisualizer<S> {
    store: PointStore,
    reconciler: RenderReconciler,
    sink: S,
    /// Batch of the latest applied frame, replayed on mode changes
    last_frame: Vec<Observation>,
    last_stats: ReconcileStats,
    enabled: bool,
    tracking_state: TrackingState,
}

impl<S: ParticleSink> PointCloudVisualizer<S> {
    /// Create an enabled visualizer. Style is fixed for its lifetime.
    pub fn new(mode: Mode, style: ParticleStyle, sink: S) -> Self {
        let mut visualizer = Self {
            store: PointStore::new(),
            reconciler: RenderReconciler::new(mode, style),
            sink,
            last_frame: Vec::new(),
            last_stats: ReconcileStats::default(),
            enabled: true,
            tracking_state: TrackingState::None,
        };
        visualizer.update_visibility();
        visualizer
    }

    /// Store the frame's observations and re-project the working set.
    ///
    /// Returns `None` when the visualizer is disabled and the frame was ignored.
    pub fn apply_frame(&mut self, frame: &FrameUpdate) -> Result<Option<ReconcileStats>> {
        if !self.enabled {
            trace!(trackable_id = %frame.trackable_id, "Visualizer disabled, frame ignored");
            return Ok(None);
        }

        self.set_tracking_state(frame.tracking_state);
        self.last_frame.clear();
        self.last_frame.extend_from_slice(&frame.points);

        if !frame.removed.is_empty() {
            trace!(
                trackable_id = %frame.trackable_id,
                removed = frame.removed.len(),
                "Upstream stopped tracking points, store unchanged"
            );
        }

        self.render().map(Some)
    }

    /// Switch mode and immediately re-project the latest frame
    pub fn set_mode(&mut self, mode: Mode) -> Result<ReconcileStats> {
        if mode != self.reconciler.mode() {
            debug!(from = ?self.reconciler.mode(), to = ?mode, "Visualization mode changed");
        }
        self.reconciler.set_mode(mode);
        self.render()
    }

    /// Replay the latest frame through the reconciler
    pub fn refresh(&mut self) -> Result<ReconcileStats> {
        self.render()
    }

    fn render(&mut self) -> Result<ReconcileStats> {
        self.store.update(&self.last_frame);
        let stats = self
            .reconciler
            .reconcile(&self.store, &self.last_frame, &mut self.sink)?;
        self.last_stats = stats;
        Ok(stats)
    }

    /// Enable or disable the visualizer. Disabled visualizers ignore frames
    /// and are hidden.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.update_visibility();
    }

    pub fn set_tracking_state(&mut self, state: TrackingState) {
        self.tracking_state = state;
        self.update_visibility();
    }

    fn update_visibility(&mut self) {
        let visible = self.is_visible();
        self.sink.set_visible(visible);
    }

    /// Drawn only while enabled and tracked
    pub fn is_visible(&self) -> bool {
        self.enabled && self.tracking_state != TrackingState::None
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.tracking_state
    }

    pub fn mode(&self) -> Mode {
        self.reconciler.mode()
    }

    /// Distinct points seen since the visualizer was created
    pub fn total_point_count(&self) -> usize {
        self.store.len()
    }

    /// Points in the latest frame
    pub fn current_frame_point_count(&self) -> usize {
        self.last_frame.len()
    }

    pub fn store(&self) -> &PointStore {
        &self.store
    }

    pub fn reconciler(&self) -> &RenderReconciler {
        &self.reconciler
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn last_stats(&self) -> ReconcileStats {
        self.last_stats
    }
}
