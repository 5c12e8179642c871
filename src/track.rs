//! Event tracking types.
//!
//! Track calls feed events into the service's vocabulary without asking for
//! a decision: one `POST /track`, no retry, no polling.

use serde::{Deserialize, Serialize};

/// An event to track.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackEvent {
    /// Name of the event; any string under 256 characters describing what
    /// took place.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Arbitrary caller-defined payload.
    #[serde(default)]
    pub data: serde_json::Value,
    /// When the event occurred, in milliseconds since the epoch. Zero means
    /// "now" and is filled in at send time.
    #[serde(rename = "eventTime")]
    pub event_time: i64,
}

/// Identity context for a track call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOptions {
    /// The event to track.
    pub event: TrackEvent,
    /// Source token minted by the client-side SDK.
    #[serde(default)]
    pub source_token: String,
    /// Optional identifier of the user the event belongs to.
    #[serde(default)]
    pub user_id: String,
    /// Server-side session identifier.
    #[serde(default)]
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_wire_names() {
        let event = TrackEvent {
            event_type: "USER_LOGGED_IN".into(),
            data: serde_json::json!({ "method": "sso" }),
            event_time: 1_693_000_000_000,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "USER_LOGGED_IN");
        assert_eq!(value["eventTime"], 1_693_000_000_000i64);
    }
}
