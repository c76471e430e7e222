use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ProtoError;

/// A VarInt never occupies more than 5 bytes on the wire.
pub const MAX_VARINT_BYTES: usize = 5;

pub fn read_varint(r: &mut impl Read) -> Result<i32, ProtoError> {
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let byte = r.read_u8()?;
        value |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(ProtoError::VarIntTooLong)
}

pub fn write_varint(w: &mut impl Write, value: i32) -> Result<(), ProtoError> {
    let mut v = value as u32;
    loop {
        if v & !0x7F == 0 {
            w.write_u8(v as u8)?;
            return Ok(());
        }
        w.write_u8(((v & 0x7F) | 0x80) as u8)?;
        v >>= 7;
    }
}

/// Number of bytes `value` takes when VarInt-encoded.
pub fn varint_len(value: i32) -> usize {
    let mut v = value as u32;
    let mut len = 1;
    while v & !0x7F != 0 {
        v >>= 7;
        len += 1;
    }
    len
}

/// Read a VarInt directly off an async stream, one byte at a time. Used only
/// for the frame length prefix; everything after it is read in one piece.
pub async fn read_varint_async<R>(r: &mut R) -> Result<i32, ProtoError>
where
    R: AsyncRead + Unpin,
{
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let byte = match r.read_u8().await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ProtoError::ConnectionClosed);
            }
            Err(e) => return Err(e.into()),
        };
        value |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(ProtoError::VarIntTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn known_encodings() {
        // Reference vectors from the protocol documentation.
        let cases: &[(i32, &[u8])] = &[
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (300, &[0xAC, 0x02]),
            (2097151, &[0xFF, 0xFF, 0x7F]),
            (-1, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];

        for (value, bytes) in cases {
            let mut out = Vec::new();
            write_varint(&mut out, *value).unwrap();
            assert_eq!(&out, bytes, "encoding {}", value);
            assert_eq!(varint_len(*value), bytes.len());

            let decoded = read_varint(&mut Cursor::new(out)).unwrap();
            assert_eq!(decoded, *value, "decoding {}", value);
        }
    }

    #[test]
    fn rejects_overlong() {
        let mut cursor = Cursor::new(vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert!(matches!(
            read_varint(&mut cursor),
            Err(ProtoError::VarIntTooLong)
        ));
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut cursor = Cursor::new(vec![0x80]);
        assert!(read_varint(&mut cursor).is_err());
    }
}
