//! Generic request capability set.
//!
//! Every request kind in the protocol carries the same three abilities:
//! serialize its body to wire bytes at the version it was built at, parse
//! a body from raw bytes at an already-negotiated version, and fabricate
//! its paired error response from an arbitrary failure cause.

use bytes::{Buf, Bytes};
use rill_common::{Error, Result};

use crate::parser::ApiKey;

/// A protocol request message.
///
/// Implementations are immutable value objects; all methods here are
/// reentrant and free of shared state.
pub trait KafkaRequest: Sized {
    /// The paired response message type.
    type Response;

    /// The platform-wide API key for this request kind.
    const API_KEY: ApiKey;

    /// Wire schema revision this instance is bound to.
    fn version(&self) -> i16;

    /// Serialize the request body to its wire-canonical byte form.
    ///
    /// Fails when the registry does not recognize `version()` for this
    /// API key.
    fn to_bytes(&self) -> Result<Bytes>;

    /// Parse a request body at an already-negotiated version.
    fn parse(buf: &mut dyn Buf, version: i16) -> Result<Self>;

    /// Fabricate the paired response carrying only the error code
    /// classified from `cause`.
    ///
    /// Handler failures never propagate past this point; causes without
    /// an explicit mapping classify to the unknown code.
    fn error_response(&self, cause: &Error) -> Self::Response;
}
