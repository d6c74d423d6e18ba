//! Element header framing.
//!
//! # Layout
//! ```text
//! 0x00: total_len u32 LE (whole element, this field included)
//! 0x04: tag u8
//! 0x05: name, ASCII
//! 5+n:  0x00 terminator
//! 6+n:  payload, up to total_len
//! ```

use crate::error::{Malformed, NameError, NbtError};
use crate::tag::Tag;

/// Width of the total-length field.
pub const LEN_FIELD: usize = 4;
/// Offset of the tag byte.
pub const TAG_OFFSET: usize = 4;
/// Offset of the first name byte.
pub const NAME_OFFSET: usize = 5;
/// Smallest possible element: length, tag, empty name, terminator.
pub const MIN_ELEMENT_LEN: usize = NAME_OFFSET + 1;
/// Longest accepted name, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Header size for an element with this name.
pub fn header_len(name: &str) -> usize {
    NAME_OFFSET + name.len() + 1
}

/// Check a name against the wire rules: ASCII, no NUL, bounded length.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong { len: name.len() });
    }
    if name.bytes().any(|b| b == 0) {
        return Err(NameError::Nul);
    }
    if !name.is_ascii() {
        return Err(NameError::NonAscii);
    }
    Ok(())
}

/// One element's framing, borrowed from the input buffer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame<'a> {
    pub tag_byte: u8,
    pub name: &'a str,
    pub payload: &'a [u8],
}

/// Read the total-length field and check it against the bytes available.
///
/// Returns the declared element length, which is never larger than `buf`.
pub(crate) fn frame_len(buf: &[u8]) -> Result<usize, NbtError> {
    if buf.len() < MIN_ELEMENT_LEN {
        return Err(Malformed::ShortHeader {
            available: buf.len(),
        }
        .into());
    }
    let declared = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if declared < MIN_ELEMENT_LEN {
        return Err(Malformed::LengthTooSmall { declared }.into());
    }
    if declared > buf.len() {
        return Err(Malformed::LengthMismatch {
            declared,
            available: buf.len(),
        }
        .into());
    }
    Ok(declared)
}

/// Split a buffer holding exactly one element into tag, name and payload.
pub(crate) fn read_frame(buf: &[u8]) -> Result<Frame<'_>, NbtError> {
    let declared = frame_len(buf)?;
    if declared != buf.len() {
        return Err(Malformed::LengthMismatch {
            declared,
            available: buf.len(),
        }
        .into());
    }

    let name_bytes = &buf[NAME_OFFSET..];
    let name_len = name_bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or(Malformed::MissingTerminator)?;
    if name_len > MAX_NAME_LEN {
        return Err(Malformed::NameTooLong { len: name_len }.into());
    }
    let name_bytes = &name_bytes[..name_len];
    if let Some(i) = name_bytes.iter().position(|b| !b.is_ascii()) {
        return Err(Malformed::NonAsciiName {
            byte: name_bytes[i],
            offset: NAME_OFFSET + i,
        }
        .into());
    }
    let name = std::str::from_utf8(name_bytes).map_err(|_| Malformed::InvalidUtf8)?;

    Ok(Frame {
        tag_byte: buf[TAG_OFFSET],
        name,
        payload: &buf[NAME_OFFSET + name_len + 1..],
    })
}

/// Append a header. `total_len` must already include the payload.
pub(crate) fn write_header(out: &mut Vec<u8>, total_len: u32, tag: Tag, name: &str) {
    out.extend_from_slice(&total_len.to_le_bytes());
    out.push(tag.as_u8());
    out.extend_from_slice(name.as_bytes());
    out.push(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(tag: u8, name: &[u8], payload: &[u8]) -> Vec<u8> {
        let total = (NAME_OFFSET + name.len() + 1 + payload.len()) as u32;
        let mut buf = total.to_le_bytes().to_vec();
        buf.push(tag);
        buf.extend_from_slice(name);
        buf.push(0);
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn header_len_counts_terminator() {
        assert_eq!(header_len(""), 6);
        assert_eq!(header_len("positions"), 15);
    }

    #[test]
    fn write_then_read_header() {
        let mut buf = Vec::new();
        // 4 + 1 + 2 + 1 + 2
        write_header(&mut buf, 10, Tag::Short, "hp");
        buf.extend_from_slice(&[1, 0]);
        let frame = read_frame(&buf).unwrap();
        assert_eq!(frame.tag_byte, Tag::Short.as_u8());
        assert_eq!(frame.name, "hp");
        assert_eq!(frame.payload, &[1, 0]);
    }

    #[test]
    fn empty_name_and_payload() {
        let buf = framed(Tag::Compound.as_u8(), b"", b"");
        assert_eq!(buf.len(), MIN_ELEMENT_LEN);
        let frame = read_frame(&buf).unwrap();
        assert_eq!(frame.name, "");
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn short_buffer_rejected() {
        let err = frame_len(&[6, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            NbtError::MalformedBuffer(Malformed::ShortHeader { available: 3 })
        );
    }

    #[test]
    fn declared_length_below_minimum_rejected() {
        let mut buf = framed(1, b"a", &[7]);
        buf[0] = 3;
        assert_eq!(
            frame_len(&buf).unwrap_err(),
            NbtError::MalformedBuffer(Malformed::LengthTooSmall { declared: 3 })
        );
    }

    #[test]
    fn trailing_bytes_rejected_by_read_frame() {
        let mut buf = framed(1, b"a", &[7]);
        buf.push(0xaa);
        assert!(matches!(
            read_frame(&buf),
            Err(NbtError::MalformedBuffer(Malformed::LengthMismatch { .. }))
        ));
        // but frame_len only bounds the first element
        assert_eq!(frame_len(&buf).unwrap(), buf.len() - 1);
    }

    #[test]
    fn missing_terminator_rejected() {
        let mut buf = 8u32.to_le_bytes().to_vec();
        buf.push(1);
        buf.extend_from_slice(b"abc");
        assert_eq!(
            read_frame(&buf).unwrap_err(),
            NbtError::MalformedBuffer(Malformed::MissingTerminator)
        );
    }

    #[test]
    fn non_ascii_name_rejected() {
        let buf = framed(1, &[b'a', 0xc3, 0xa9], &[7]);
        assert_eq!(
            read_frame(&buf).unwrap_err(),
            NbtError::MalformedBuffer(Malformed::NonAsciiName {
                byte: 0xc3,
                offset: 6
            })
        );
    }

    #[test]
    fn overlong_name_rejected() {
        let name = vec![b'n'; MAX_NAME_LEN + 1];
        let buf = framed(1, &name, &[7]);
        assert_eq!(
            read_frame(&buf).unwrap_err(),
            NbtError::MalformedBuffer(Malformed::NameTooLong {
                len: MAX_NAME_LEN + 1
            })
        );
    }

    #[test]
    fn validate_name_rules() {
        assert!(validate_name("").is_ok());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
        assert_eq!(
            validate_name(&"x".repeat(MAX_NAME_LEN + 1)),
            Err(NameError::TooLong {
                len: MAX_NAME_LEN + 1
            })
        );
        assert_eq!(validate_name("a\0b"), Err(NameError::Nul));
        assert_eq!(validate_name("héllo"), Err(NameError::NonAscii));
    }
}
