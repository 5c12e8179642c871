//! The Trustgate client and checkpoint resolver.
//!
//! This module implements the complete resolution flow:
//! 1. Validation gate (no network activity on malformed requests)
//! 2. Disabled-mode short-circuit
//! 3. Checkpoint submission with bounded retry
//! 4. Verification polling with growing backoff
//! 5. Timeout finalization into a terminal "unavailable" result

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use crate::backoff::PollBackoff;
use crate::config::{
    ClientConfig, BASE_CHECKPOINT_TIMEOUT_MS, MAX_RETRY_COUNT, MAX_TIMEOUT_MS,
};
use crate::error::ClientError;
use crate::track::TrackOptions;
use crate::transport::{
    ApiRequest, HttpTransport, Transport, HEADER_CUSTOMER_ID, HEADER_SESSION_ID,
    HEADER_SOURCE_TOKEN, HEADER_VERIFICATION_ID,
};
use crate::types::{
    CheckpointOptions, CheckpointRequest, CheckpointResponse, ResponseError, Verification,
    VerificationOutcome, VerificationStatus,
};

/// Sentinel verification ID returned when the client is disabled.
pub const DISABLED_VERIFICATION_ID: &str = "TRUSTGATE_DISABLED";

/// Client for the Trustgate service.
///
/// Cheap to clone is not a goal; create one per credential and share it by
/// reference. Concurrent checkpoints on one client are safe: each
/// resolution owns its working state.
pub struct Trustgate {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl Trustgate {
    /// Create a client using the production HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be
    /// constructed.
    pub fn new(secret: &str, config: ClientConfig) -> Result<Self, ClientError> {
        let transport = Arc::new(HttpTransport::new(secret, &config)?);
        Ok(Self { config, transport })
    }

    /// Create a client over a custom [`Transport`].
    ///
    /// The transport owns credential injection; this constructor is the
    /// seam test doubles plug into.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Resolve a checkpoint to a final decision.
    ///
    /// Submits the checkpoint, retries logically-failed submissions up to
    /// [`MAX_RETRY_COUNT`] times, then polls the verification with a
    /// doubling wait interval until it settles, the caller's timeout budget
    /// is spent, or the polling failure budget runs out.
    ///
    /// A caller timeout of `<= 0` means "poll until resolved"; a timeout
    /// above five times [`BASE_CHECKPOINT_TIMEOUT_MS`] is honored as a
    /// budget but polled in growing increments rather than slept in one
    /// shot. Anything in between is used as a fixed polling interval.
    ///
    /// Polling exhaustion is not an error return: it yields an `Ok`
    /// response with `success == false`, [`is_timeout`] set, and a
    /// synthetic 503 error entry, so callers that only inspect the result
    /// still see it.
    ///
    /// [`is_timeout`]: CheckpointResponse::is_timeout
    ///
    /// # Errors
    ///
    /// [`ClientError::MissingCheckpointName`], [`ClientError::MissingEventIp`]
    /// or [`ClientError::MissingIdentity`] before any network call;
    /// [`ClientError::Transport`] / [`ClientError::Decode`] verbatim from
    /// the failed exchange; [`ClientError::SubmissionExhausted`] when the
    /// service never acknowledged the submission.
    #[instrument(skip(self, request), fields(checkpoint = %request.checkpoint_name))]
    pub async fn checkpoint(
        &self,
        request: CheckpointRequest,
    ) -> Result<CheckpointResponse, ClientError> {
        validate(&request)?;

        if !self.config.enabled {
            debug!("client disabled, bypassing service");
            return Ok(self.disabled_response());
        }

        let trivial_timeout = request.options.timeout <= 0;
        let large_timeout =
            request.options.timeout > 5 * BASE_CHECKPOINT_TIMEOUT_MS as i64;
        let must_poll = trivial_timeout || large_timeout;
        let active_timeout_ms = if must_poll {
            BASE_CHECKPOINT_TIMEOUT_MS
        } else {
            request.options.timeout as u64
        };

        let internal_options = CheckpointOptions {
            sync: true,
            timeout: active_timeout_ms as i64,
            webhook: request.options.webhook.clone(),
        };

        // Submission phase: retry while the service reports failure.
        let mut working = CheckpointResponse::default();
        let mut attempts = 0u32;
        while !working.success && attempts < MAX_RETRY_COUNT {
            let bytes = self.submit(&request, &internal_options).await?;
            working = decode("checkpoint", &bytes)?;
            attempts += 1;
        }

        if !working.success {
            warn!(attempts, "checkpoint submission never succeeded");
            return Err(ClientError::SubmissionExhausted { attempts });
        }

        let mut resolved = working.verification.status != VerificationStatus::Pending;
        if resolved {
            debug!(
                verification_id = %working.verification.id,
                status = ?working.verification.status,
                "checkpoint resolved at submission"
            );
            return Ok(working);
        }

        let verification_id = working.verification.id.clone();
        info!(verification_id = %verification_id, "verification pending, polling");

        // Polling phase. The caller's timeout is a wall-clock budget over
        // the total time slept; trivial timeouts poll until resolved.
        let budget = if trivial_timeout {
            None
        } else {
            Some(Duration::from_millis(request.options.timeout as u64))
        };
        let mut backoff = if must_poll {
            PollBackoff::new(
                Duration::from_millis(active_timeout_ms),
                Duration::from_millis(MAX_TIMEOUT_MS),
            )
        } else {
            PollBackoff::fixed(Duration::from_millis(active_timeout_ms))
        };

        let mut failures = 0u32;
        while !resolved
            && failures < MAX_RETRY_COUNT
            && budget.map_or(true, |b| backoff.elapsed() < b)
        {
            tokio::time::sleep(backoff.interval()).await;
            backoff.advance();

            let bytes = self.poll(&request, &verification_id).await?;
            working = decode("verification", &bytes)?;

            if !working.success {
                failures += 1;
                continue;
            }

            match working.verification.status {
                // An empty or unrecognized status is a malformed answer,
                // not a resolution.
                VerificationStatus::Unknown => failures += 1,
                VerificationStatus::Pending => {}
                _ => resolved = true,
            }
        }

        if !resolved && failures >= MAX_RETRY_COUNT {
            warn!(
                verification_id = %verification_id,
                failures,
                "polling failure budget exhausted"
            );
            working.success = false;
            working.timed_out = true;
            working.errors.push(ResponseError {
                code: 503,
                message: "Service Unavailable: Maximum retry count exceeded".into(),
            });
        }

        Ok(working)
    }

    /// Track an event. Fire-and-forget: one `POST /track`, no retry.
    ///
    /// An `event_time` of zero is replaced with the current epoch
    /// milliseconds before the call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the exchange fails. The
    /// response body is not decoded.
    #[instrument(skip(self, options), fields(event = %options.event.event_type))]
    pub async fn track(&self, options: TrackOptions) -> Result<(), ClientError> {
        if !self.config.enabled {
            debug!("client disabled, dropping track event");
            return Ok(());
        }

        let mut event = options.event;
        if event.event_time == 0 {
            event.event_time = chrono::Utc::now().timestamp_millis();
        }

        let request = ApiRequest {
            method: Method::POST,
            path: "/track".into(),
            headers: vec![
                (HEADER_SOURCE_TOKEN, options.source_token),
                (HEADER_CUSTOMER_ID, options.user_id),
                (HEADER_SESSION_ID, options.session_id),
            ],
            body: Some(serde_json::json!({
                "type": event.event_type,
                "data": event.data,
                "eventTime": event.event_time,
            })),
        };

        self.transport.send(request).await?;
        debug!("track event accepted");
        Ok(())
    }

    async fn submit(
        &self,
        request: &CheckpointRequest,
        options: &CheckpointOptions,
    ) -> Result<Vec<u8>, ClientError> {
        let api_request = ApiRequest {
            method: Method::POST,
            path: "/checkpoint".into(),
            headers: identity_headers(request),
            body: Some(serde_json::json!({
                "type": request.checkpoint_name,
                "event": request.event,
                "options": options,
            })),
        };
        self.transport.send(api_request).await
    }

    async fn poll(
        &self,
        request: &CheckpointRequest,
        verification_id: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let api_request = ApiRequest {
            method: Method::GET,
            path: format!("/verification/{}", verification_id),
            headers: identity_headers(request),
            body: None,
        };
        self.transport.send(api_request).await
    }

    /// Synthesize an approved result without contacting the service, so
    /// call sites keep working when the client is configured off.
    fn disabled_response(&self) -> CheckpointResponse {
        CheckpointResponse {
            success: true,
            errors: Vec::new(),
            version: self.config.api_version.clone(),
            verification: Verification {
                id: DISABLED_VERIFICATION_ID.into(),
                status: VerificationStatus::Complete,
                outcome: VerificationOutcome::Approved,
            },
            timed_out: false,
        }
    }
}

/// Reject malformed requests before any network activity.
fn validate(request: &CheckpointRequest) -> Result<(), ClientError> {
    if request.checkpoint_name.is_empty() {
        return Err(ClientError::MissingCheckpointName);
    }
    if request.event.ip.is_empty() {
        return Err(ClientError::MissingEventIp);
    }
    if request.session_id.is_empty() && request.source_token.is_empty() {
        return Err(ClientError::MissingIdentity);
    }
    Ok(())
}

fn identity_headers(request: &CheckpointRequest) -> Vec<(&'static str, String)> {
    vec![
        (HEADER_VERIFICATION_ID, request.use_verification_id.clone()),
        (HEADER_SOURCE_TOKEN, request.source_token.clone()),
        (HEADER_CUSTOMER_ID, request.user_id.clone()),
        (HEADER_SESSION_ID, request.session_id.clone()),
    ]
}

fn decode(context: &'static str, bytes: &[u8]) -> Result<CheckpointResponse, ClientError> {
    serde_json::from_slice(bytes).map_err(|e| ClientError::Decode {
        context,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckpointEvent;

    fn valid_request() -> CheckpointRequest {
        CheckpointRequest {
            checkpoint_name: "LOGIN".into(),
            event: CheckpointEvent {
                ip: "203.0.113.7".into(),
                data: serde_json::Value::Null,
            },
            session_id: "sess_1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn validation_checks_in_fixed_order() {
        let mut request = CheckpointRequest::default();
        assert!(matches!(
            validate(&request),
            Err(ClientError::MissingCheckpointName)
        ));

        request.checkpoint_name = "LOGIN".into();
        assert!(matches!(validate(&request), Err(ClientError::MissingEventIp)));

        request.event.ip = "203.0.113.7".into();
        assert!(matches!(validate(&request), Err(ClientError::MissingIdentity)));
    }

    #[test]
    fn session_id_or_source_token_satisfies_identity() {
        let with_session = valid_request();
        assert!(validate(&with_session).is_ok());

        let with_token = CheckpointRequest {
            session_id: String::new(),
            source_token: "tok_1".into(),
            ..valid_request()
        };
        assert!(validate(&with_token).is_ok());
    }

    #[test]
    fn identity_headers_carry_all_four_values() {
        let request = CheckpointRequest {
            source_token: "tok_1".into(),
            user_id: "user_1".into(),
            use_verification_id: "ver_1".into(),
            ..valid_request()
        };
        let headers = identity_headers(&request);
        assert_eq!(
            headers,
            vec![
                (HEADER_VERIFICATION_ID, "ver_1".to_string()),
                (HEADER_SOURCE_TOKEN, "tok_1".to_string()),
                (HEADER_CUSTOMER_ID, "user_1".to_string()),
                (HEADER_SESSION_ID, "sess_1".to_string()),
            ]
        );
    }

    #[test]
    fn decode_error_names_the_call() {
        let err = decode("verification", b"not json").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Decode {
                context: "verification",
                ..
            }
        ));
    }
}
