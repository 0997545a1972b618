//! Kafka wire protocol parser.

use bytes::{Buf, BufMut, BytesMut};
use rill_common::{Error, Result};
use std::collections::HashMap;

/// Kafka API keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ApiKey {
    Produce = 0,
    Fetch = 1,
    ListOffsets = 2,
    Metadata = 3,
    LeaderAndIsr = 4,
    StopReplica = 5,
    UpdateMetadata = 6,
    ControlledShutdown = 7,
    OffsetCommit = 8,
    OffsetFetch = 9,
    FindCoordinator = 10,
    JoinGroup = 11,
    Heartbeat = 12,
    LeaveGroup = 13,
    SyncGroup = 14,
    DescribeGroups = 15,
    ListGroups = 16,
    SaslHandshake = 17,
    ApiVersions = 18,
    CreateTopics = 19,
    DeleteTopics = 20,
    DeleteRecords = 21,
    InitProducerId = 22,
    OffsetForLeaderEpoch = 23,
    AddPartitionsToTxn = 24,
    AddOffsetsToTxn = 25,
    EndTxn = 26,
    WriteTxnMarkers = 27,
    TxnOffsetCommit = 28,
    DescribeAcls = 29,
    CreateAcls = 30,
    DeleteAcls = 31,
    DescribeConfigs = 32,
    AlterConfigs = 33,
}

impl ApiKey {
    /// Try to create an ApiKey from an i16
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(ApiKey::Produce),
            1 => Some(ApiKey::Fetch),
            2 => Some(ApiKey::ListOffsets),
            3 => Some(ApiKey::Metadata),
            4 => Some(ApiKey::LeaderAndIsr),
            5 => Some(ApiKey::StopReplica),
            6 => Some(ApiKey::UpdateMetadata),
            7 => Some(ApiKey::ControlledShutdown),
            8 => Some(ApiKey::OffsetCommit),
            9 => Some(ApiKey::OffsetFetch),
            10 => Some(ApiKey::FindCoordinator),
            11 => Some(ApiKey::JoinGroup),
            12 => Some(ApiKey::Heartbeat),
            13 => Some(ApiKey::LeaveGroup),
            14 => Some(ApiKey::SyncGroup),
            15 => Some(ApiKey::DescribeGroups),
            16 => Some(ApiKey::ListGroups),
            17 => Some(ApiKey::SaslHandshake),
            18 => Some(ApiKey::ApiVersions),
            19 => Some(ApiKey::CreateTopics),
            20 => Some(ApiKey::DeleteTopics),
            21 => Some(ApiKey::DeleteRecords),
            22 => Some(ApiKey::InitProducerId),
            23 => Some(ApiKey::OffsetForLeaderEpoch),
            24 => Some(ApiKey::AddPartitionsToTxn),
            25 => Some(ApiKey::AddOffsetsToTxn),
            26 => Some(ApiKey::EndTxn),
            27 => Some(ApiKey::WriteTxnMarkers),
            28 => Some(ApiKey::TxnOffsetCommit),
            29 => Some(ApiKey::DescribeAcls),
            30 => Some(ApiKey::CreateAcls),
            31 => Some(ApiKey::DeleteAcls),
            32 => Some(ApiKey::DescribeConfigs),
            33 => Some(ApiKey::AlterConfigs),
            _ => None,
        }
    }
}

/// Kafka request header
#[derive(Debug, Clone)]
pub struct RequestHeader {
    pub api_key: ApiKey,
    pub api_version: i16,
    pub correlation_id: i32,
    pub client_id: Option<String>,
}

/// Kafka response header
#[derive(Debug, Clone)]
pub struct ResponseHeader {
    pub correlation_id: i32,
}

/// Version range for an API
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub min: i16,
    pub max: i16,
}

/// Types that encode themselves into the wire format at a given version.
pub trait KafkaEncodable {
    fn encode(&self, encoder: &mut Encoder, version: i16) -> Result<()>;
}

/// Types that decode themselves from the wire format at a given version.
pub trait KafkaDecodable: Sized {
    fn decode(decoder: &mut Decoder, version: i16) -> Result<Self>;
}

/// Protocol decoder for reading Kafka protocol primitives
pub struct Decoder<'a> {
    buf: &'a mut dyn Buf,
}

impl<'a> Decoder<'a> {
    /// Create a new decoder
    pub fn new(buf: &'a mut dyn Buf) -> Self {
        Self { buf }
    }

    /// Read an i16
    pub fn read_i16(&mut self) -> Result<i16> {
        if self.buf.remaining() < 2 {
            return Err(Error::Protocol("Not enough bytes for i16".into()));
        }
        Ok(self.buf.get_i16())
    }

    /// Read an i32
    pub fn read_i32(&mut self) -> Result<i32> {
        if self.buf.remaining() < 4 {
            return Err(Error::Protocol("Not enough bytes for i32".into()));
        }
        Ok(self.buf.get_i32())
    }

    /// Read an i64
    pub fn read_i64(&mut self) -> Result<i64> {
        if self.buf.remaining() < 8 {
            return Err(Error::Protocol("Not enough bytes for i64".into()));
        }
        Ok(self.buf.get_i64())
    }

    /// Read a string (null = -1 length)
    pub fn read_string(&mut self) -> Result<Option<String>> {
        let len = self.read_i16()?;
        if len < 0 {
            return Ok(None);
        }

        let len = len as usize;
        if self.buf.remaining() < len {
            return Err(Error::Protocol(format!(
                "Not enough bytes for string of length {}",
                len
            )));
        }

        let bytes = self.buf.copy_to_bytes(len);
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| Error::Protocol(format!("Invalid UTF-8 in string: {}", e)))
    }

    /// Read a compact string (uses varint length)
    pub fn read_compact_string(&mut self) -> Result<Option<String>> {
        let len = self.read_unsigned_varint()? as i32 - 1;
        if len < 0 {
            return Ok(None);
        }

        let len = len as usize;
        if self.buf.remaining() < len {
            return Err(Error::Protocol(format!(
                "Not enough bytes for compact string of length {}",
                len
            )));
        }

        let bytes = self.buf.copy_to_bytes(len);
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| Error::Protocol(format!("Invalid UTF-8 in string: {}", e)))
    }

    /// Read an unsigned varint
    pub fn read_unsigned_varint(&mut self) -> Result<u32> {
        let mut value = 0u32;
        let mut i = 0;

        loop {
            if !self.buf.has_remaining() {
                return Err(Error::Protocol("Incomplete varint".into()));
            }

            let byte = self.buf.get_u8();
            value |= ((byte & 0x7F) as u32) << (i * 7);

            if byte & 0x80 == 0 {
                return Ok(value);
            }

            i += 1;
            if i >= 5 {
                return Err(Error::Protocol("Varint too long".into()));
            }
        }
    }
}

/// Protocol encoder for writing Kafka protocol primitives
pub struct Encoder<'a> {
    buf: &'a mut BytesMut,
}

impl<'a> Encoder<'a> {
    /// Create a new encoder
    pub fn new(buf: &'a mut BytesMut) -> Self {
        Self { buf }
    }

    /// Write an i16
    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    /// Write an i32
    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    /// Write an i64
    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    /// Write a string (null = None)
    pub fn write_string(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.write_i16(s.len() as i16);
                self.buf.put_slice(s.as_bytes());
            }
            None => {
                self.write_i16(-1);
            }
        }
    }

    /// Write a compact string (uses varint length)
    pub fn write_compact_string(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.write_unsigned_varint((s.len() + 1) as u32);
                self.buf.put_slice(s.as_bytes());
            }
            None => {
                self.write_unsigned_varint(0);
            }
        }
    }

    /// Write an unsigned varint
    pub fn write_unsigned_varint(&mut self, mut value: u32) {
        while (value & !0x7F) != 0 {
            self.buf.put_u8((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        self.buf.put_u8(value as u8);
    }
}

/// Parse a request header from bytes
pub fn parse_request_header(buf: &mut dyn Buf) -> Result<RequestHeader> {
    let mut decoder = Decoder::new(buf);

    let api_key_raw = decoder.read_i16()?;
    let api_key = ApiKey::from_i16(api_key_raw)
        .ok_or_else(|| Error::Protocol(format!("Unknown API key: {}", api_key_raw)))?;

    let api_version = decoder.read_i16()?;
    let correlation_id = decoder.read_i32()?;
    let client_id = decoder.read_string()?;

    Ok(RequestHeader {
        api_key,
        api_version,
        correlation_id,
        client_id,
    })
}

/// Write a response header to bytes
pub fn write_response_header(buf: &mut BytesMut, header: &ResponseHeader) {
    let mut encoder = Encoder::new(buf);
    encoder.write_i32(header.correlation_id);
}

/// Get supported API versions
///
/// This is the schema registry for the crate: an API version is encodable
/// or decodable only if it falls inside the range registered here.
pub fn supported_api_versions() -> HashMap<ApiKey, VersionRange> {
    let mut versions = HashMap::new();

    versions.insert(ApiKey::InitProducerId, VersionRange { min: 0, max: 1 });

    versions
}

/// Resolve the registered request schema for (api key, version).
///
/// Fails when the API is not registered at all or the version falls
/// outside its registered range.
pub fn request_schema(api_key: ApiKey, version: i16) -> Result<VersionRange> {
    let versions = supported_api_versions();
    let range = versions.get(&api_key).ok_or_else(|| {
        Error::UnsupportedVersion(format!("{:?} is not a registered API", api_key))
    })?;

    if version < range.min || version > range.max {
        return Err(Error::UnsupportedVersion(format!(
            "{:?} version {} is outside the registered range {}..={}",
            api_key, version, range.min, range.max
        )));
    }

    Ok(range.clone())
}
