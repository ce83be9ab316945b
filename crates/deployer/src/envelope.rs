//! Decoding of build notifications.
//!
//! A notification arrives doubly wrapped:
//!
//! ```text
//! { "Records": [ { "body": "<json>" }, ... ] }          queue delivery
//!                    └─ { "Type": "...", "Message": "<json>" }   transport wrapper
//!                                          └─ { "detail": { "project-name": "...",
//!                                                           "build-status": "..." } }
//! ```
//!
//! Only the first record of a delivery is decoded. Later records are counted
//! (so the caller can warn about them) but never parsed, which means a
//! malformed second record cannot fail the invocation.

use serde::Deserialize;
use serde_json::Value;

use crate::{BuildStatus, ExtractionError, ProjectName};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct QueueDelivery {
    #[serde(rename = "Records")]
    records: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct QueueRecord {
    body: String,
}

/// The pub/sub envelope carried in a queue record body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransportWrapper {
    /// Category tag of the pub/sub message (e.g. `"Notification"`).
    #[serde(rename = "Type")]
    pub kind: String,
    /// JSON-encoded build event.
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct BuildEventDocument {
    detail: BuildEvent,
}

/// Outcome of one build, as reported by the build system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildEvent {
    /// Name of the build project.
    #[serde(rename = "project-name")]
    pub project_name: ProjectName,
    /// Reported build status.
    #[serde(rename = "build-status")]
    pub build_status: BuildStatus,
}

/// A successfully decoded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNotification {
    /// `Type` tag of the transport wrapper.
    pub kind: String,
    /// The build event from the first record.
    pub event: BuildEvent,
    /// Number of records after the first that were not looked at.
    pub ignored_records: usize,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes the build event from the first record of a queue delivery.
///
/// # Errors
///
/// Returns an [`ExtractionError`] naming the layer that failed: the delivery
/// itself, the transport wrapper in the record body, or the build event in the
/// wrapper message.
pub fn decode(payload: &Value) -> Result<DecodedNotification, ExtractionError> {
    let delivery = QueueDelivery::deserialize(payload).map_err(ExtractionError::MalformedDelivery)?;

    let (first, rest) = delivery
        .records
        .split_first()
        .ok_or(ExtractionError::NoRecords)?;

    let record = QueueRecord::deserialize(first).map_err(ExtractionError::MalformedDelivery)?;
    let wrapper = decode_wrapper(&record.body)?;
    let event = decode_build_event(&wrapper.message)?;

    Ok(DecodedNotification {
        kind: wrapper.kind,
        event,
        ignored_records: rest.len(),
    })
}

/// Decodes a transport wrapper from a queue record body.
pub fn decode_wrapper(body: &str) -> Result<TransportWrapper, ExtractionError> {
    serde_json::from_str(body).map_err(ExtractionError::MalformedWrapper)
}

/// Decodes a build event from a transport wrapper message.
pub fn decode_build_event(message: &str) -> Result<BuildEvent, ExtractionError> {
    serde_json::from_str::<BuildEventDocument>(message)
        .map(|doc| doc.detail)
        .map_err(ExtractionError::MalformedBuildEvent)
}
