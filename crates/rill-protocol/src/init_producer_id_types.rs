//! InitProducerId API types (API key 22).
//!
//! The producer-to-broker handshake that hands out a producer id: fresh
//! for an idempotent producer, or bound to a transactional id when the
//! producer asks for exactly-once semantics across restarts.

use std::fmt;

use bytes::{Buf, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::trace;

use rill_common::{Error, Result};

use crate::error_codes::ErrorCode;
use crate::parser::{request_schema, ApiKey, Decoder, Encoder, KafkaDecodable, KafkaEncodable};
use crate::request::KafkaRequest;

/// Producer id carried by a fabricated error response.
pub const NO_PRODUCER_ID: i64 = -1;
/// Producer epoch carried by a fabricated error response.
pub const NO_PRODUCER_EPOCH: i16 = -1;

/// InitProducerId request
///
/// Immutable once constructed; build one through
/// [`InitProducerIdRequestBuilder`] on the client side or [`KafkaRequest::parse`]
/// on the server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitProducerIdRequest {
    /// The transactional id, or None if the producer is not transactional.
    /// An empty string is a distinct value and is carried verbatim.
    pub transactional_id: Option<String>,
    /// The time in ms the broker waits before aborting an idle transaction
    /// from this producer. Only meaningful when a transactional id is set.
    pub transaction_timeout_ms: i32,
    /// Wire schema revision this request was built or parsed at.
    pub version: i16,
}

/// Client-side construction path for [`InitProducerIdRequest`].
///
/// Arguments are validated up front; the wire version is stamped late via
/// [`build`](Self::build), once the transport has negotiated which API
/// version the broker speaks.
#[derive(Clone)]
pub struct InitProducerIdRequestBuilder {
    transactional_id: Option<String>,
    transaction_timeout_ms: i32,
}

impl InitProducerIdRequestBuilder {
    /// Create a builder, rejecting a non-positive transaction timeout.
    pub fn new(transactional_id: Option<String>, transaction_timeout_ms: i32) -> Result<Self> {
        if transaction_timeout_ms <= 0 {
            return Err(Error::InvalidInput(format!(
                "transaction timeout value is not positive: {}",
                transaction_timeout_ms
            )));
        }
        Ok(Self {
            transactional_id,
            transaction_timeout_ms,
        })
    }

    /// Finalize the request at the negotiated wire version.
    pub fn build(self, version: i16) -> InitProducerIdRequest {
        InitProducerIdRequest {
            transactional_id: self.transactional_id,
            transaction_timeout_ms: self.transaction_timeout_ms,
            version,
        }
    }
}

impl fmt::Debug for InitProducerIdRequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(type=InitProducerIdRequest)")
    }
}

impl KafkaDecodable for InitProducerIdRequest {
    // Timeout validation is builder-only; inbound requests parse as-is.
    fn decode(decoder: &mut Decoder, version: i16) -> Result<Self> {
        let transactional_id = decoder.read_string()?;
        let transaction_timeout_ms = decoder.read_i32()?;

        Ok(InitProducerIdRequest {
            transactional_id,
            transaction_timeout_ms,
            version,
        })
    }
}

impl KafkaEncodable for InitProducerIdRequest {
    fn encode(&self, encoder: &mut Encoder, _version: i16) -> Result<()> {
        encoder.write_string(self.transactional_id.as_deref());
        encoder.write_i32(self.transaction_timeout_ms);
        Ok(())
    }
}

impl KafkaRequest for InitProducerIdRequest {
    type Response = InitProducerIdResponse;

    const API_KEY: ApiKey = ApiKey::InitProducerId;

    fn version(&self) -> i16 {
        self.version
    }

    fn to_bytes(&self) -> Result<Bytes> {
        request_schema(Self::API_KEY, self.version)?;

        let mut buf = BytesMut::new();
        let mut encoder = Encoder::new(&mut buf);
        KafkaEncodable::encode(self, &mut encoder, self.version)?;

        trace!(
            "Encoded InitProducerIdRequest v{} ({} bytes)",
            self.version,
            buf.len()
        );
        Ok(buf.freeze())
    }

    fn parse(buf: &mut dyn Buf, version: i16) -> Result<Self> {
        request_schema(Self::API_KEY, version)?;

        let mut decoder = Decoder::new(buf);
        <Self as KafkaDecodable>::decode(&mut decoder, version)
    }

    fn error_response(&self, cause: &Error) -> InitProducerIdResponse {
        InitProducerIdResponse {
            throttle_time_ms: 0,
            error_code: ErrorCode::from_error(cause).code(),
            producer_id: NO_PRODUCER_ID,
            producer_epoch: NO_PRODUCER_EPOCH,
        }
    }
}

/// InitProducerId response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitProducerIdResponse {
    /// Throttle duration imposed by quota enforcement, zero if none.
    pub throttle_time_ms: i32,
    /// The error code, or 0 if there was no error.
    pub error_code: i16,
    /// The producer id the broker assigned.
    pub producer_id: i64,
    /// The epoch associated with the producer id.
    pub producer_epoch: i16,
}

impl KafkaEncodable for InitProducerIdResponse {
    fn encode(&self, encoder: &mut Encoder, _version: i16) -> Result<()> {
        encoder.write_i32(self.throttle_time_ms);
        encoder.write_i16(self.error_code);
        encoder.write_i64(self.producer_id);
        encoder.write_i16(self.producer_epoch);
        Ok(())
    }
}

impl KafkaDecodable for InitProducerIdResponse {
    fn decode(decoder: &mut Decoder, _version: i16) -> Result<Self> {
        let throttle_time_ms = decoder.read_i32()?;
        let error_code = decoder.read_i16()?;
        let producer_id = decoder.read_i64()?;
        let producer_epoch = decoder.read_i16()?;

        Ok(InitProducerIdResponse {
            throttle_time_ms,
            error_code,
            producer_id,
            producer_epoch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_non_positive_timeout() {
        for timeout in [0, -1, i32::MIN] {
            let err = InitProducerIdRequestBuilder::new(Some("txn".to_string()), timeout)
                .err()
                .unwrap();
            assert!(err.to_string().contains(&timeout.to_string()));
            assert!(err.to_string().contains("not positive"));
        }
    }

    #[test]
    fn test_builder_stamps_version_late() {
        let builder = InitProducerIdRequestBuilder::new(Some("txn".to_string()), 30_000).unwrap();
        let request = builder.build(1);

        assert_eq!(request.transactional_id.as_deref(), Some("txn"));
        assert_eq!(request.transaction_timeout_ms, 30_000);
        assert_eq!(request.version, 1);
    }

    #[test]
    fn test_builder_debug_is_a_fixed_tag() {
        let builder =
            InitProducerIdRequestBuilder::new(Some("secret-id".to_string()), 30_000).unwrap();
        let debug = format!("{:?}", builder);
        assert_eq!(debug, "(type=InitProducerIdRequest)");
        assert!(!debug.contains("secret-id"));
    }

    #[test]
    fn test_response_structure() {
        let response = InitProducerIdResponse {
            throttle_time_ms: 0,
            error_code: 0,
            producer_id: 1001,
            producer_epoch: 0,
        };

        assert_eq!(response.producer_id, 1001);
        assert_eq!(response.producer_epoch, 0);
    }
}
