//! Drawable particle records and session style
//!
//! - ParticleRecord: GPU-ready particle data (36 bytes)
//! - ParticleStyle: size/color shared by every particle of a session

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::Position;

/// Lifetime written to live particles: visible for exactly one reconciliation
pub const ALIVE_LIFETIME: f32 = 1.0;
/// Lifetime written to retired slots: the renderer drops them
pub const RETIRED_LIFETIME: f32 = -1.0;

/// GPU-ready particle record.
/// 36 bytes, no padding, suitable for direct buffer upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub position: [f32; 3],
    pub size: f32,
    /// RGBA
    pub color: [f32; 4],
    /// > 0 visible, <= 0 retired
    pub remaining_lifetime: f32,
}

impl ParticleRecord {
    /// Size of a record in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// A live particle at `position` using `style`
    #[inline]
    pub fn alive(position: Position, style: &ParticleStyle) -> Self {
        Self {
            position,
            size: style.size,
            color: style.color,
            remaining_lifetime: ALIVE_LIFETIME,
        }
    }

    /// An invisible placeholder used to fill freshly grown slots
    pub const fn retired() -> Self {
        Self {
            position: [0.0; 3],
            size: 0.0,
            color: [0.0; 4],
            remaining_lifetime: RETIRED_LIFETIME,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.remaining_lifetime > 0.0
    }

    /// Mark this slot as no longer visible, keeping the rest of the record
    #[inline]
    pub fn retire(&mut self) {
        self.remaining_lifetime = RETIRED_LIFETIME;
    }
}

impl Default for ParticleRecord {
    fn default() -> Self {
        Self::retired()
    }
}

/// Point size and color, read once when a visualizer is created
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
    pub size: f32,
    /// RGBA
    pub color: [f32; 4],
}

impl Default for ParticleStyle {
    fn default() -> Self {
        Self {
            size: 0.015,
            color: [1.0, 0.6, 0.1, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_size() {
        assert_eq!(ParticleRecord::SIZE, 36);
        assert_eq!(bytemuck::bytes_of(&ParticleRecord::retired()).len(), 36);
    }

    #[test]
    fn test_alive_and_retire() {
        let style = ParticleStyle { size: 0.5, color: [0.1, 0.2, 0.3, 0.4] };
        let mut record = ParticleRecord::alive([1.0, 2.0, 3.0], &style);

        assert!(record.is_alive());
        assert_eq!(record.size, 0.5);
        assert_eq!(record.color, [0.1, 0.2, 0.3, 0.4]);

        record.retire();
        assert!(!record.is_alive());
        assert_eq!(record.position, [1.0, 2.0, 3.0]);
    }
}
