//! Kafka protocol frame handling for request/response framing.
//!
//! The wire protocol carries length-prefixed messages:
//! - Request: [Length: i32][RequestMessage]
//! - Response: [Length: i32][ResponseMessage]

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use rill_common::{Error, Result};

/// Maximum frame size (100MB) to prevent OOM attacks
const MAX_FRAME_SIZE: usize = 100 * 1024 * 1024;

/// Kafka protocol frame decoder/encoder
pub struct KafkaFrameCodec {
    /// Maximum allowed frame size
    max_frame_size: usize,
}

impl KafkaFrameCodec {
    /// Create a new frame codec with default settings
    pub fn new() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Create a new frame codec with custom max frame size
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }
}

impl Default for KafkaFrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for KafkaFrameCodec {
    type Item = Bytes;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        // Need at least 4 bytes for the length prefix
        if src.len() < 4 {
            return Ok(None);
        }

        // Peek at the length without consuming
        let mut length_bytes = [0u8; 4];
        length_bytes.copy_from_slice(&src[..4]);
        let length = i32::from_be_bytes(length_bytes);

        if length <= 0 {
            return Err(Error::Protocol(format!("Invalid frame length {}", length)));
        }
        let length = length as usize;

        if length > self.max_frame_size {
            return Err(Error::Protocol(format!(
                "Frame size {} exceeds maximum {}",
                length, self.max_frame_size
            )));
        }

        // Check if we have the complete frame
        if src.len() < 4 + length {
            trace!(
                "Waiting for complete frame, have {} bytes, need {}",
                src.len(),
                4 + length
            );
            src.reserve(4 + length - src.len());
            return Ok(None);
        }

        trace!("Decoding frame of {} bytes", length);

        // Skip the length prefix and take the frame
        src.advance(4);
        let frame = src.split_to(length).freeze();

        Ok(Some(frame))
    }
}

impl Encoder<Bytes> for KafkaFrameCodec {
    type Error = Error;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        if item.len() > self.max_frame_size {
            return Err(Error::Protocol(format!(
                "Frame size {} exceeds maximum {}",
                item.len(),
                self.max_frame_size
            )));
        }

        dst.reserve(4 + item.len());
        dst.put_i32(item.len() as i32);
        dst.put_slice(&item);
        Ok(())
    }
}
