//! Error types for the WieBetaaltWat client.
//!
//! # Design
//! Sign-in failures get their own variant so callers can tell "your
//! credentials were rejected" apart from "a list call came back with an
//! unexpected status." Both carry the raw status code and body for debugging.
//! Lookups that find nothing are not errors; they return `None`.

/// Errors returned by the client's build, parse and session operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable credentials or an otherwise invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The sign-in endpoint answered with something other than 201.
    #[error("sign-in rejected with HTTP {status}: {body}")]
    RemoteAuthentication { status: u16, body: String },

    /// Any other endpoint answered with an unexpected status.
    #[error("HTTP {status}: {body}")]
    RemoteRequest { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport could not complete the round-trip.
    #[error("transport error: {0}")]
    Transport(String),
}
