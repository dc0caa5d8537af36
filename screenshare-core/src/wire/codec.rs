//! Length-prefixed framing for `tokio_util::codec`.
//!
//! ## Wire format
//!
//! ```text
//! length:   u32  (4, native byte order)
//! payload:  [u8] (length bytes of codec output)
//! ```
//!
//! There is no magic, version, checksum or sequence number. One message
//! travels per connection.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ShareError;

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Default upper bound accepted for a declared payload length.
pub const DEFAULT_MAX_PAYLOAD: usize = 256 * 1024 * 1024;

/// Encodes / decodes `[u32 length][payload]` messages.
#[derive(Debug, Clone, Copy)]
pub struct WireCodec {
    max_payload: usize,
}

impl WireCodec {
    pub fn new() -> Self {
        Self {
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Reject declared lengths above `max_payload` while decoding.
    pub fn with_max_payload(max_payload: usize) -> Self {
        Self { max_payload }
    }

    pub fn max_payload(&self) -> usize {
        self.max_payload
    }

    /// Total bytes (prefix included) the buffered message needs.
    fn expected_len(src: &BytesMut) -> usize {
        if src.len() < LENGTH_PREFIX_SIZE {
            return LENGTH_PREFIX_SIZE;
        }
        LENGTH_PREFIX_SIZE + read_prefix(src)
    }
}

impl Default for WireCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn read_prefix(src: &[u8]) -> usize {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    prefix.copy_from_slice(&src[..LENGTH_PREFIX_SIZE]);
    u32::from_ne_bytes(prefix) as usize
}

impl Decoder for WireCodec {
    type Item = Bytes;
    type Error = ShareError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }

        let len = read_prefix(src);
        if len > self.max_payload {
            return Err(ShareError::PayloadTooLarge {
                size: len,
                max: self.max_payload,
            });
        }

        let total = LENGTH_PREFIX_SIZE + len;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        src.advance(LENGTH_PREFIX_SIZE);
        Ok(Some(src.split_to(len).freeze()))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None if buf.is_empty() => Ok(None),
            None => Err(ShareError::ConnectionClosed {
                expected: Self::expected_len(buf),
                received: buf.len(),
            }),
        }
    }
}

impl<'a> Encoder<&'a [u8]> for WireCodec {
    type Error = ShareError;

    fn encode(&mut self, item: &'a [u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        let len = u32::try_from(item.len()).map_err(|_| ShareError::PayloadTooLarge {
            size: item.len(),
            max: u32::MAX as usize,
        })?;
        dst.reserve(LENGTH_PREFIX_SIZE + item.len());
        dst.extend_from_slice(&len.to_ne_bytes());
        dst.extend_from_slice(item);
        Ok(())
    }
}

/// Serialize one message into a standalone buffer.
pub fn encode_message(payload: &[u8]) -> Result<Vec<u8>, ShareError> {
    let mut dst = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    WireCodec::new().encode(payload, &mut dst)?;
    Ok(dst.to_vec())
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> Result<Option<Bytes>, ShareError> {
        let mut buf = BytesMut::from(bytes);
        WireCodec::new().decode_eof(&mut buf)
    }

    #[test]
    fn prefix_is_native_endian_u32() {
        let msg = encode_message(b"hello").unwrap();
        assert_eq!(msg.len(), LENGTH_PREFIX_SIZE + 5);
        assert_eq!(&msg[..4], &5u32.to_ne_bytes());
        assert_eq!(&msg[4..], b"hello");
    }

    #[test]
    fn roundtrip_various_lengths() {
        for len in [0usize, 1, 3, 4, 5, 1400, 65_537] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let msg = encode_message(&payload).unwrap();
            let decoded = decode_all(&msg).unwrap().expect("complete message");
            assert_eq!(decoded.as_ref(), payload.as_slice(), "len {len}");
        }
    }

    #[test]
    fn empty_payload_is_a_message() {
        let decoded = decode_all(&0u32.to_ne_bytes()).unwrap();
        assert_eq!(decoded.map(|b| b.len()), Some(0));
    }

    #[test]
    fn partial_input_waits_for_more() {
        let msg = encode_message(&[7u8; 32]).unwrap();
        let mut codec = WireCodec::new();
        let mut buf = BytesMut::new();

        buf.extend_from_slice(&msg[..2]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(&msg[2..10]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(&msg[10..]);
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.as_ref(), &[7u8; 32]);
        assert!(buf.is_empty());
    }

    #[test]
    fn eof_mid_payload_is_connection_closed() {
        let msg = encode_message(&[1u8; 10]).unwrap();
        let err = decode_all(&msg[..7]).unwrap_err();
        match err {
            ShareError::ConnectionClosed { expected, received } => {
                assert_eq!(expected, 14);
                assert_eq!(received, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn eof_mid_prefix_is_connection_closed() {
        let err = decode_all(&[1, 0]).unwrap_err();
        assert!(matches!(
            err,
            ShareError::ConnectionClosed {
                expected: 4,
                received: 2
            }
        ));
    }

    #[test]
    fn eof_on_empty_stream_yields_nothing() {
        assert!(decode_all(&[]).unwrap().is_none());
    }

    #[test]
    fn oversized_length_rejected() {
        let mut codec = WireCodec::with_max_payload(16);
        let mut buf = BytesMut::from(&17u32.to_ne_bytes()[..]);
        let err = codec.decode(&mut buf).unwrap_err();
        assert!(matches!(err, ShareError::PayloadTooLarge { size: 17, max: 16 }));
    }
}
