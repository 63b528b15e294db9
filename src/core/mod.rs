//! Platform-agnostic core - observation types, point storage and parsing

pub mod observation;
pub mod parser;
pub mod store;

pub use observation::{
    FrameUpdate, Message, Observation, PointId, Position, TrackableId, TrackingState,
};
pub use parser::parse_message;
pub use store::PointStore;
