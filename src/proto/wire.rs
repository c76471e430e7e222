//! Frame codec and string primitives.
//!
//! A frame on the wire is `[length: VarInt][payload]`. Once the server sends
//! Set Compression, the payload becomes `[data_length: VarInt][body]` where
//! `data_length = 0` means the body is raw (below threshold) and anything
//! else is the uncompressed size of a zlib-deflated body.

use std::io::{Cursor, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::ProtoError;
use crate::proto::varint::{read_varint, write_varint};
use crate::proto::MAX_FRAME_LEN;

/// Field-level cap for strings. The longest string the bot reads is a chat
/// component, which is nowhere near this.
const MAX_STRING_BYTES: usize = 64 * 1024;

pub fn read_string(r: &mut impl Read) -> Result<String, ProtoError> {
    let len = read_varint(r)? as usize;
    if len > MAX_STRING_BYTES {
        return Err(ProtoError::StringTooLong(len));
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| ProtoError::Malformed("string is not UTF-8".into()))
}

pub fn write_string(w: &mut impl Write, s: &str) -> Result<(), ProtoError> {
    write_varint(w, s.len() as i32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Stateful frame codec. Compression is off until the login phase turns it on.
#[derive(Debug, Clone, Default)]
pub struct Framing {
    compression_threshold: Option<i32>,
}

impl Framing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_compression(&mut self, threshold: i32) {
        self.compression_threshold = Some(threshold);
    }

    pub fn compression_enabled(&self) -> bool {
        self.compression_threshold.is_some()
    }

    /// Build a complete frame (length prefix included) around
    /// `VarInt(packet_id) + body`.
    pub fn encode_frame(&self, packet_id: i32, body: &[u8]) -> Result<Vec<u8>, ProtoError> {
        let mut payload = Vec::with_capacity(body.len() + 2);
        write_varint(&mut payload, packet_id)?;
        payload.extend_from_slice(body);

        let payload = match self.compression_threshold {
            None => payload,
            Some(threshold) => {
                let mut framed = Vec::with_capacity(payload.len() + 2);
                if payload.len() >= threshold.max(0) as usize {
                    write_varint(&mut framed, payload.len() as i32)?;
                    let mut encoder = ZlibEncoder::new(&mut framed, Compression::default());
                    encoder.write_all(&payload)?;
                    encoder.finish()?;
                } else {
                    write_varint(&mut framed, 0)?;
                    framed.extend_from_slice(&payload);
                }
                framed
            }
        };

        let mut frame = Vec::with_capacity(payload.len() + 3);
        write_varint(&mut frame, payload.len() as i32)?;
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Decode a frame payload (the bytes after the length prefix) into
    /// `(packet_id, packet_data)`.
    pub fn decode_payload(&self, payload: &[u8]) -> Result<(i32, Vec<u8>), ProtoError> {
        let mut cursor = Cursor::new(payload);

        let body: Vec<u8> = if self.compression_threshold.is_some() {
            let data_len = read_varint(&mut cursor)? as usize;
            if data_len > MAX_FRAME_LEN {
                return Err(ProtoError::FrameTooLarge(data_len));
            }
            let rest = &payload[cursor.position() as usize..];
            if data_len == 0 {
                rest.to_vec()
            } else {
                let mut decoder = ZlibDecoder::new(rest);
                let mut data = Vec::with_capacity(data_len);
                decoder.read_to_end(&mut data)?;
                if data.len() != data_len {
                    return Err(ProtoError::Malformed(format!(
                        "decompressed length mismatch (expected {}, got {})",
                        data_len,
                        data.len()
                    )));
                }
                data
            }
        } else {
            payload.to_vec()
        };

        let mut body_cursor = Cursor::new(body.as_slice());
        let packet_id = read_varint(&mut body_cursor)?;
        let data = body[body_cursor.position() as usize..].to_vec();
        Ok((packet_id, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_length_prefix(frame: &[u8]) -> Vec<u8> {
        let mut cursor = Cursor::new(frame);
        let len = read_varint(&mut cursor).unwrap() as usize;
        let start = cursor.position() as usize;
        assert_eq!(frame.len() - start, len);
        frame[start..].to_vec()
    }

    #[test]
    fn uncompressed_frame() {
        let framing = Framing::new();
        let frame = framing.encode_frame(0x01, b"hello").unwrap();
        let (id, data) = framing.decode_payload(&strip_length_prefix(&frame)).unwrap();
        assert_eq!(id, 0x01);
        assert_eq!(data, b"hello");
    }

    #[test]
    fn below_threshold_passes_through_raw() {
        let mut framing = Framing::new();
        framing.enable_compression(256);
        let frame = framing.encode_frame(0x02, b"tiny").unwrap();
        let payload = strip_length_prefix(&frame);
        // data_length of 0 marks an uncompressed body
        assert_eq!(payload[0], 0x00);
        let (id, data) = framing.decode_payload(&payload).unwrap();
        assert_eq!(id, 0x02);
        assert_eq!(data, b"tiny");
    }

    #[test]
    fn above_threshold_is_deflated() {
        let mut framing = Framing::new();
        framing.enable_compression(16);
        let body = vec![0x41u8; 512];
        let frame = framing.encode_frame(0x02, &body).unwrap();
        let payload = strip_length_prefix(&frame);
        // 512 bytes of the same letter should shrink well below the input
        assert!(payload.len() < body.len());
        let (id, data) = framing.decode_payload(&payload).unwrap();
        assert_eq!(id, 0x02);
        assert_eq!(data, body);
    }

    #[test]
    fn string_roundtrip_and_utf8_guard() {
        let mut buf = Vec::new();
        write_string(&mut buf, "§6Welcome!").unwrap();
        let s = read_string(&mut Cursor::new(buf.as_slice())).unwrap();
        assert_eq!(s, "§6Welcome!");

        let mut bad = Vec::new();
        write_varint(&mut bad, 2).unwrap();
        bad.extend_from_slice(&[0xFF, 0xFE]);
        assert!(read_string(&mut Cursor::new(bad.as_slice())).is_err());
    }
}
