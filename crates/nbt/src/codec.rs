//! Public encode/decode entry points.

use crate::config::DecodeConfig;
use crate::element::Element;
use crate::error::NbtError;
use crate::header::frame_len;
use crate::reader::ElementReader;
use crate::registry::{DecodeCtx, decode_element, decode_expected};
use crate::tag::Tag;

impl DecodeConfig {
    /// Decode the element at the front of `buf`.
    ///
    /// Exactly the element's total length is consumed; bytes past it are
    /// not looked at.
    pub fn decode(&self, buf: &[u8]) -> Result<Element, NbtError> {
        self.decode_prefix(buf).map(|(element, _)| element)
    }

    /// Decode the element at the front of `buf`, which must be of kind `expected`.
    pub fn decode_as(&self, buf: &[u8], expected: Tag) -> Result<Element, NbtError> {
        let len = frame_len(buf)?;
        decode_expected(&buf[..len], expected, &mut DecodeCtx::new(self))
    }

    /// Like [`decode`](Self::decode), also returning the number of bytes
    /// the element occupied.
    pub fn decode_prefix(&self, buf: &[u8]) -> Result<(Element, usize), NbtError> {
        let len = frame_len(buf)?;
        let element = decode_element(&buf[..len], &mut DecodeCtx::new(self))?;
        Ok((element, len))
    }

    /// Iterate over back-to-back elements in `buf`.
    pub fn reader<'a>(&self, buf: &'a [u8]) -> ElementReader<'a> {
        ElementReader::with_config(buf, self.clone())
    }
}

pub fn encode(element: &Element) -> Result<Vec<u8>, NbtError> {
    element.encode()
}

/// [`DecodeConfig::decode`] with default limits.
pub fn decode(buf: &[u8]) -> Result<Element, NbtError> {
    DecodeConfig::default().decode(buf)
}

/// [`DecodeConfig::decode_as`] with default limits.
pub fn decode_as(buf: &[u8], expected: Tag) -> Result<Element, NbtError> {
    DecodeConfig::default().decode_as(buf, expected)
}

/// [`DecodeConfig::decode_prefix`] with default limits.
pub fn decode_prefix(buf: &[u8]) -> Result<(Element, usize), NbtError> {
    DecodeConfig::default().decode_prefix(buf)
}

/// Read only the tag of an encoded element.
pub fn peek_tag(buf: &[u8]) -> Result<Tag, NbtError> {
    frame_len(buf)?;
    let byte = buf[crate::header::TAG_OFFSET];
    Tag::from_u8(byte).ok_or(NbtError::UnknownTag(byte))
}
