//! # trustgate
//!
//! Async client for the Trustgate risk / fraud-verification service.
//!
//! The service evaluates a named **checkpoint** (a rule-set) against an
//! event and answers with a **verification**: either immediately resolved,
//! or `PENDING` and settled later. This crate hides that asynchrony behind
//! a single call that submits the checkpoint, retries transiently failed
//! submissions, and polls an in-flight verification with a growing wait
//! interval until it settles or the retry budget runs out.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      Trustgate                          │
//! │                                                         │
//! │  validate ─► disabled short-circuit ─► submit ─► poll   │
//! │      │                                   │        │     │
//! │      │                                   ▼        ▼     │
//! │      │                              ┌─────────────────┐ │
//! │      │                              │    Transport    │ │
//! │      │                              │ (reqwest HTTPS) │ │
//! │      ▼                              └─────────────────┘ │
//! │  ClientError                                 │          │
//! │                                              ▼          │
//! │                                    CheckpointResponse   │
//! │                              (is_allowed / is_denied /  │
//! │                               is_undecided / is_timeout)│
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use trustgate::{CheckpointEvent, CheckpointRequest, ClientConfig, Trustgate};
//!
//! # async fn run() -> Result<(), trustgate::ClientError> {
//! let client = Trustgate::new("secret-key", ClientConfig::default())?;
//!
//! let request = CheckpointRequest {
//!     checkpoint_name: "PLACE_ORDER".into(),
//!     event: CheckpointEvent {
//!         ip: "203.0.113.7".into(),
//!         data: serde_json::json!({ "amount": 1000, "currency": "USD" }),
//!     },
//!     session_id: "64de1794-8bb9-11ed-a1eb-0242ac120004".into(),
//!     ..Default::default()
//! };
//!
//! let response = client.checkpoint(request).await?;
//! if response.is_allowed() {
//!     // proceed with the order
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Cancellation
//!
//! One resolution blocks the calling task for the submission retries plus
//! the polling loop; every suspension point is an `.await`. A caller that
//! needs a hard wall-clock cap wraps the call in `tokio::time::timeout`,
//! which cancels the resolution at the next suspension point.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)] // Allow Type in module::Type

pub mod backoff;
pub mod client;
pub mod config;
pub mod error;
pub mod track;
pub mod transport;
pub mod types;

pub use client::Trustgate;
pub use config::{
    ClientConfig, BASE_CHECKPOINT_TIMEOUT_MS, MAX_RETRY_COUNT, MAX_TIMEOUT_MS,
};
pub use error::ClientError;
pub use track::{TrackEvent, TrackOptions};
pub use transport::{ApiRequest, HttpTransport, Transport};
pub use types::{
    CheckpointEvent, CheckpointOptions, CheckpointRequest, CheckpointResponse, ResponseError,
    Verification, VerificationOutcome, VerificationStatus,
};
