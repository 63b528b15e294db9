//! Observation types delivered by the upstream point tracker
//!
//! This module contains:
//! - Basic identifiers (point and trackable ids)
//! - Per-frame observations and frame updates
//! - Inbound messages decoded from the JSON-lines stream

use serde::{Deserialize, Serialize};

use crate::particles::Mode;

// ============================================================================
// Basic Types
// ============================================================================

/// Stable identifier of a physical point, unique per trackable
pub type PointId = u64;

/// Position in session space (x, y, z)
pub type Position = [f32; 3];

/// Identifier of one upstream point cloud trackable
pub type TrackableId = String;

/// Tracking quality reported for a point cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    /// Not tracked; nothing should be drawn
    None,
    /// Tracked with reduced quality
    Limited,
    #[default]
    Tracking,
}

/// A single point observed in the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: PointId,
    pub position: Position,
}

impl Observation {
    pub fn new(id: PointId, position: Position) -> Self {
        Self { id, position }
    }

    /// True when every coordinate is finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }
}

impl From<(PointId, Position)> for Observation {
    fn from((id, position): (PointId, Position)) -> Self {
        Self { id, position }
    }
}

// ============================================================================
// Frame updates and messages
// ============================================================================

/// Points added or updated for one trackable in one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub trackable_id: TrackableId,
    #[serde(default)]
    pub tracking_state: TrackingState,
    /// Points added or updated this frame (absent = zero observations)
    #[serde(default)]
    pub points: Vec<Observation>,
    /// Ids the upstream tracker stopped following. Never removed from the store.
    #[serde(default)]
    pub removed: Vec<PointId>,
}

impl FrameUpdate {
    pub fn new(trackable_id: impl Into<TrackableId>, points: Vec<Observation>) -> Self {
        Self {
            trackable_id: trackable_id.into(),
            points,
            ..Default::default()
        }
    }
}

/// Inbound message, one per JSON line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Message {
    /// New observations for one point cloud
    Frame(FrameUpdate),
    /// Switch every point cloud to the given mode
    SetMode { mode: Mode },
    /// Cycle to the next mode
    ToggleMode,
    /// The upstream trackable went away; its store is discarded
    CloudRemoved { trackable_id: TrackableId },
}
