//! Wire types for checkpoint requests and responses, and the state
//! classifier over a decoded verification.
//!
//! A verification moves through a lifecycle [`VerificationStatus`] and, once
//! `COMPLETE`, carries a decision [`VerificationOutcome`]. The classifier
//! predicates on [`CheckpointResponse`] map the raw status/outcome pair to
//! the semantic states callers branch on.

use serde::{Deserialize, Serialize};

/// The event being evaluated at a checkpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointEvent {
    /// Client IP the event originated from. Required.
    pub ip: String,
    /// Arbitrary caller-defined payload, passed through to the service
    /// unchanged and never inspected by this crate.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Response options attached to a checkpoint submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointOptions {
    /// Ask the service to answer synchronously when it can.
    pub sync: bool,
    /// Caller's timeout budget in milliseconds. `<= 0` means poll until
    /// resolved with no fixed budget.
    pub timeout: i64,
    /// Optional webhook URL notified when the verification settles.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub webhook: String,
}

/// A caller's intent to verify an event against a named checkpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointRequest {
    /// Name of the checkpoint rule-set to evaluate. Required.
    pub checkpoint_name: String,
    /// The event under evaluation. Its IP is required.
    pub event: CheckpointEvent,
    /// Server-side session identifier. One of `session_id` /
    /// `source_token` is required.
    #[serde(default)]
    pub session_id: String,
    /// Source token minted by the client-side SDK. One of `session_id` /
    /// `source_token` is required.
    #[serde(default)]
    pub source_token: String,
    /// Optional identifier of the user the event belongs to.
    #[serde(default)]
    pub user_id: String,
    /// Resume a specific in-flight verification instead of opening a new one.
    #[serde(default)]
    pub use_verification_id: String,
    /// Response options. The resolver derives its own internal copy; see
    /// [`Trustgate::checkpoint`](crate::Trustgate::checkpoint).
    #[serde(default)]
    pub options: CheckpointOptions,
}

/// Lifecycle stage of a verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// The service is still evaluating the checkpoint.
    Pending,
    /// Evaluation is blocked waiting on an external step (e.g. MFA).
    Blocked,
    /// Evaluation finished; the outcome is meaningful.
    Complete,
    /// Evaluation failed service-side.
    Failed,
    /// Empty or unrecognized status. The resolver treats this as a
    /// malformed answer, not a resolution.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Decision of a completed verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationOutcome {
    /// The event may proceed.
    Approved,
    /// The event was denied.
    Denied,
    /// Evaluation completed without a decision.
    Pending,
    /// Evaluation errored.
    Error,
    /// Empty or unrecognized outcome.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Verification record inside a checkpoint response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verification {
    /// Verification identifier, used to poll an in-flight evaluation.
    #[serde(default)]
    pub id: String,
    /// Lifecycle stage.
    #[serde(default)]
    pub status: VerificationStatus,
    /// Decision, meaningful once `status` is `COMPLETE`.
    #[serde(default)]
    pub outcome: VerificationOutcome,
}

/// A structured error entry in a checkpoint response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseError {
    /// Numeric error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
}

/// The service's answer to a checkpoint submission or verification poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointResponse {
    /// Whether the service handled the call successfully. When `false` the
    /// response is unusable for a decision.
    #[serde(default)]
    pub success: bool,
    /// Structured errors reported by the service.
    #[serde(default)]
    pub errors: Vec<ResponseError>,
    /// API version that produced the response.
    #[serde(default)]
    pub version: String,
    /// The verification record.
    #[serde(default)]
    pub verification: Verification,
    /// Set only by the resolver when polling exhausted its failure budget.
    /// Never present on the wire.
    #[serde(skip)]
    pub(crate) timed_out: bool,
}

impl CheckpointResponse {
    /// The verification is still being evaluated.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.success
            && matches!(
                self.verification.status,
                VerificationStatus::Pending | VerificationStatus::Blocked
            )
    }

    /// The verification completed and the event was approved.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.success
            && self.verification.status == VerificationStatus::Complete
            && self.verification.outcome == VerificationOutcome::Approved
    }

    /// The event was denied.
    ///
    /// Unlike [`is_allowed`](Self::is_allowed), denial is honored whatever
    /// the status says: the service can signal a denial before the
    /// verification reaches `COMPLETE`.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        self.success && self.verification.outcome == VerificationOutcome::Denied
    }

    /// The verification completed without reaching a decision.
    #[must_use]
    pub fn is_undecided(&self) -> bool {
        self.success
            && self.verification.status == VerificationStatus::Complete
            && self.verification.outcome == VerificationOutcome::Pending
    }

    /// The response carries an error: either the service reported failure
    /// or the error list is non-empty.
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.success || !self.errors.is_empty()
    }

    /// Polling gave up before the verification settled.
    ///
    /// Only ever true on a response produced by
    /// [`Trustgate::checkpoint`](crate::Trustgate::checkpoint) whose polling
    /// phase exhausted its failure budget; a freshly decoded service
    /// response can never report a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        !self.success && self.timed_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(
        success: bool,
        timed_out: bool,
        status: VerificationStatus,
        outcome: VerificationOutcome,
    ) -> CheckpointResponse {
        CheckpointResponse {
            success,
            errors: Vec::new(),
            version: "v1".into(),
            verification: Verification {
                id: "ver_123".into(),
                status,
                outcome,
            },
            timed_out,
        }
    }

    use super::VerificationOutcome as O;
    use super::VerificationStatus as S;

    #[test]
    fn running_requires_success_and_pending_or_blocked() {
        assert!(response(true, false, S::Pending, O::Pending).is_running());
        assert!(response(true, false, S::Blocked, O::Pending).is_running());
        assert!(!response(true, false, S::Complete, O::Approved).is_running());
        assert!(!response(true, false, S::Complete, O::Denied).is_running());
        assert!(!response(false, false, S::Failed, O::Error).is_running());
        assert!(!response(false, false, S::Pending, O::Pending).is_running());
    }

    #[test]
    fn allowed_requires_complete_and_approved() {
        assert!(response(true, false, S::Complete, O::Approved).is_allowed());
        assert!(!response(true, false, S::Pending, O::Approved).is_allowed());
        assert!(!response(true, false, S::Blocked, O::Approved).is_allowed());
        assert!(!response(true, false, S::Complete, O::Denied).is_allowed());
        assert!(!response(false, false, S::Complete, O::Approved).is_allowed());
    }

    #[test]
    fn denied_ignores_status() {
        // Denial can be signaled before the verification is COMPLETE.
        assert!(response(true, false, S::Complete, O::Denied).is_denied());
        assert!(response(true, false, S::Pending, O::Denied).is_denied());
        assert!(!response(true, false, S::Complete, O::Approved).is_denied());
        assert!(!response(false, false, S::Complete, O::Denied).is_denied());
    }

    #[test]
    fn undecided_requires_complete_and_pending_outcome() {
        assert!(response(true, false, S::Complete, O::Pending).is_undecided());
        assert!(!response(true, false, S::Pending, O::Pending).is_undecided());
        assert!(!response(true, false, S::Complete, O::Approved).is_undecided());
    }

    #[test]
    fn failed_responses_always_have_error() {
        assert!(response(false, false, S::Failed, O::Error).has_error());
        assert!(response(false, true, S::Unknown, O::Unknown).has_error());
        assert!(!response(true, false, S::Complete, O::Approved).has_error());

        let mut with_errors = response(true, false, S::Complete, O::Approved);
        with_errors.errors.push(ResponseError {
            code: 400,
            message: "bad event".into(),
        });
        assert!(with_errors.has_error());
    }

    #[test]
    fn timeout_requires_resolver_flag() {
        assert!(response(false, true, S::Unknown, O::Unknown).is_timeout());
        assert!(!response(false, false, S::Failed, O::Error).is_timeout());
        // The flag is meaningless on a successful response.
        assert!(!response(true, true, S::Complete, O::Approved).is_timeout());
    }

    #[test]
    fn decodes_service_response() {
        let body = serde_json::json!({
            "success": true,
            "errors": [],
            "version": "v1",
            "verification": { "id": "ver_9", "status": "PENDING", "outcome": "" }
        });
        let response: CheckpointResponse = serde_json::from_value(body).unwrap();
        assert!(response.success);
        assert_eq!(response.verification.status, S::Pending);
        assert_eq!(response.verification.outcome, O::Unknown);
        assert!(!response.timed_out);
    }

    #[test]
    fn empty_and_unrecognized_status_decode_as_unknown() {
        let empty: CheckpointResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "verification": { "id": "ver_9", "status": "", "outcome": "" }
        }))
        .unwrap();
        assert_eq!(empty.verification.status, S::Unknown);

        let odd: CheckpointResponse = serde_json::from_value(serde_json::json!({
            "success": true,
            "verification": { "id": "ver_9", "status": "SOMETHING_NEW" }
        }))
        .unwrap();
        assert_eq!(odd.verification.status, S::Unknown);
    }

    #[test]
    fn missing_verification_decodes_to_defaults() {
        let response: CheckpointResponse =
            serde_json::from_value(serde_json::json!({ "success": false })).unwrap();
        assert_eq!(response.verification.status, S::Unknown);
        assert_eq!(response.verification.outcome, O::Unknown);
        assert!(response.verification.id.is_empty());
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = CheckpointRequest {
            checkpoint_name: "LOGIN".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("checkpointName").is_some());
        assert!(value.get("sessionId").is_some());
    }
}
