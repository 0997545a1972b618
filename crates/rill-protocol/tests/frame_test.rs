//! Framing tests: a request travels as [length][header][body], and the
//! broker answers with [length][correlation id][response body].

use bytes::{BufMut, BytesMut};
use rill_common::Error;
use rill_protocol::frame::KafkaFrameCodec;
use rill_protocol::parser::{
    parse_request_header, write_response_header, ApiKey, Decoder as WireDecoder, Encoder,
    ResponseHeader,
};
use rill_protocol::{
    InitProducerIdRequest, InitProducerIdRequestBuilder, InitProducerIdResponse, KafkaDecodable,
    KafkaEncodable, KafkaRequest, NO_PRODUCER_ID,
};
use tokio_util::codec::{Decoder, Encoder as FrameEncoder};

#[test]
fn test_framed_request_response_cycle() {
    // Client side: header + body, framed with a length prefix
    let request = InitProducerIdRequestBuilder::new(Some("orders-txn".to_string()), 45_000)
        .unwrap()
        .build(0);

    let mut message = BytesMut::new();
    let mut encoder = Encoder::new(&mut message);
    encoder.write_i16(ApiKey::InitProducerId as i16);
    encoder.write_i16(request.version());
    encoder.write_i32(7);
    encoder.write_string(Some("producer-7"));
    message.extend_from_slice(&request.to_bytes().unwrap());

    let mut codec = KafkaFrameCodec::new();
    let mut wire = BytesMut::new();
    codec.encode(message.clone().freeze(), &mut wire).unwrap();
    assert_eq!(wire.len(), message.len() + 4);

    // Server side: strip the frame, then the header, then parse the body
    let mut frame = codec.decode(&mut wire).unwrap().unwrap();
    assert!(wire.is_empty());

    let header = parse_request_header(&mut frame).unwrap();
    assert_eq!(header.api_key, ApiKey::InitProducerId);
    assert_eq!(header.correlation_id, 7);
    assert_eq!(header.client_id.as_deref(), Some("producer-7"));

    let parsed = InitProducerIdRequest::parse(&mut frame, header.api_version).unwrap();
    assert_eq!(parsed, request);

    // The handler cannot serve the request; it answers through the
    // fabricated error-response path
    let response = parsed.error_response(&Error::InvalidTransactionTimeout(45_000));

    let mut reply = BytesMut::new();
    write_response_header(
        &mut reply,
        &ResponseHeader {
            correlation_id: header.correlation_id,
        },
    );
    let mut encoder = Encoder::new(&mut reply);
    response.encode(&mut encoder, header.api_version).unwrap();

    let mut reply_wire = BytesMut::new();
    codec.encode(reply.freeze(), &mut reply_wire).unwrap();

    // Client side: strip the frame, match the correlation id, decode
    let mut reply_frame = codec.decode(&mut reply_wire).unwrap().unwrap();
    let mut decoder = WireDecoder::new(&mut reply_frame);
    assert_eq!(decoder.read_i32().unwrap(), 7);

    let decoded = InitProducerIdResponse::decode(&mut decoder, header.api_version).unwrap();
    assert_eq!(decoded.error_code, 50);
    assert_eq!(decoded.producer_id, NO_PRODUCER_ID);
}

#[test]
fn test_partial_frame_returns_none() {
    let mut codec = KafkaFrameCodec::new();

    let mut wire = BytesMut::new();
    wire.put_i32(10);
    wire.put_slice(&[1, 2, 3]); // 7 bytes short

    assert!(codec.decode(&mut wire).unwrap().is_none());

    wire.put_slice(&[4, 5, 6, 7, 8, 9, 10]);
    let frame = codec.decode(&mut wire).unwrap().unwrap();
    assert_eq!(frame.len(), 10);
}

#[test]
fn test_oversized_frame_rejected() {
    let mut codec = KafkaFrameCodec::with_max_frame_size(16);

    let mut wire = BytesMut::new();
    wire.put_i32(1024);
    wire.put_slice(&[0; 1024]);

    assert!(codec.decode(&mut wire).is_err());
}

#[test]
fn test_invalid_frame_length_rejected() {
    let mut codec = KafkaFrameCodec::new();

    let mut wire = BytesMut::new();
    wire.put_i32(-4);
    assert!(codec.decode(&mut wire).is_err());
}
