//! Parser for the JSON-lines observation stream
//!
//! One line is one message. Frames are cleaned here, before they reach the
//! point store: observations with non-finite coordinates are dropped.

use serde_json::Value;
use tracing::{trace, warn};

use super::observation::Message;

/// Parse one line of the observation stream
///
/// Returns None for malformed JSON, unknown message kinds and blank lines.
pub fn parse_message(line: &str) -> Option<Message> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    trace!(len = line.len(), "Parsing message");

    let json: Value = serde_json::from_str(line)
        .map_err(|e| {
            warn!(error = %e, "Failed to parse JSON");
        })
        .ok()?;

    let kind = json["type"].as_str().unwrap_or("<missing>").to_owned();
    let mut message: Message = serde_json::from_value(json)
        .map_err(|e| {
            warn!(kind = %kind, error = %e, "Unrecognized message");
        })
        .ok()?;

    if let Message::Frame(frame) = &mut message {
        let before = frame.points.len();
        frame.points.retain(|obs| obs.is_finite());
        let dropped = before - frame.points.len();
        if dropped > 0 {
            warn!(
                trackable_id = %frame.trackable_id,
                dropped,
                "Dropped observations with non-finite positions"
            );
        }
    }

    Some(message)
}
