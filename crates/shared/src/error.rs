//! Shared error types and server message extraction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RFC7807 Problem Details (application/problem+json)
///
/// Some backends answer with a problem document instead of the usual
/// `{ "message": ... }` envelope, so both shapes are understood when turning an
/// error body into something a user can read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type", default)]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    #[serde(default)]
    pub title: String,
    /// HTTP status code.
    #[serde(default)]
    pub status: u16,
    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Attempt to parse an RFC7807 (or RFC7807-ish) JSON body into a user-facing message.
/// Prefers `detail`, falls back to `title`.
pub fn try_problem_detail(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ProblemDetails>(body).ok()?;
    if let Some(detail) = parsed.detail {
        if !detail.trim().is_empty() {
            return Some(detail);
        }
    }
    if !parsed.title.trim().is_empty() {
        return Some(parsed.title);
    }
    None
}

/// The `message` field of the backend's error envelope.
///
/// Validation failures come back as a list of messages, everything else as a
/// single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<MessageField>,
}

/// Pull the `message` out of a `{ "message": ... }` error body.
pub fn try_envelope_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok()?;
    let message = match envelope.message? {
        MessageField::One(msg) => msg,
        MessageField::Many(msgs) => msgs.join(", "),
    };
    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

/// API error type for client-side use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure or timeout; no response was received.
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The message the server attached to an error response, if any.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Http { body, .. } => {
                try_envelope_message(body).or_else(|| try_problem_detail(body))
            }
            _ => None,
        }
    }

    /// The server-supplied message, or `default` when there is none.
    ///
    /// Network and decoding failures always yield `default`.
    pub fn message_or(&self, default: &str) -> String {
        self.server_message().unwrap_or_else(|| default.to_string())
    }
}
