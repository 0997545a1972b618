//! Kafka wire protocol implementation for Rill.
//!
//! This crate provides the producer-to-broker handshake surface:
//! - Wire protocol primitives and request/response header codecs
//! - Request/response framing with length prefixes
//! - A version registry gating which wire schema revisions are encodable
//! - The InitProducerId request/response pair (API key 22)

pub mod error_codes;
pub mod frame;
pub mod init_producer_id_types;
pub mod parser;
pub mod request;

// Re-export main types
pub use error_codes::ErrorCode;
pub use frame::KafkaFrameCodec;
pub use init_producer_id_types::{
    InitProducerIdRequest, InitProducerIdRequestBuilder, InitProducerIdResponse, NO_PRODUCER_EPOCH,
    NO_PRODUCER_ID,
};
pub use parser::{
    parse_request_header, request_schema, supported_api_versions, write_response_header, ApiKey,
    Decoder, Encoder, KafkaDecodable, KafkaEncodable, RequestHeader, ResponseHeader, VersionRange,
};
pub use request::KafkaRequest;
