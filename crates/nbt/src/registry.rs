//! Tag byte to payload decoder dispatch.
//!
//! The table is closed: a new kind means a new [`Tag`] variant and a new row
//! here. Containers use it to decode children whose kind is only known from
//! their header.

use crate::config::DecodeConfig;
use crate::element::Element;
use crate::error::{Malformed, NbtError};
use crate::header::{LEN_FIELD, MIN_ELEMENT_LEN, read_frame};
use crate::scalar::{decode_array, decode_scalar};
use crate::tag::Tag;
use crate::value::{Compound, Value};

/// Decodes the payload of one kind.
pub(crate) type PayloadDecoder = fn(&[u8], &mut DecodeCtx<'_>) -> Result<Value, NbtError>;

#[derive(Clone, Copy)]
pub(crate) struct Entry {
    pub tag: Tag,
    pub decode: PayloadDecoder,
}

const fn entry(tag: Tag, decode: PayloadDecoder) -> Option<Entry> {
    Some(Entry { tag, decode })
}

/// Indexed by tag byte. Slot 0 is reserved.
static REGISTRY: [Option<Entry>; 16] = [
    None,
    entry(Tag::Byte, |p, _| decode_scalar(Tag::Byte, p).map(Value::Byte)),
    entry(Tag::Short, |p, _| decode_scalar(Tag::Short, p).map(Value::Short)),
    entry(Tag::Int, |p, _| decode_scalar(Tag::Int, p).map(Value::Int)),
    entry(Tag::Long, |p, _| decode_scalar(Tag::Long, p).map(Value::Long)),
    entry(Tag::Float, |p, _| decode_scalar(Tag::Float, p).map(Value::Float)),
    entry(Tag::Double, |p, _| decode_scalar(Tag::Double, p).map(Value::Double)),
    entry(Tag::ByteArray, |p, _| {
        decode_array(Tag::ByteArray, p).map(Value::ByteArray)
    }),
    entry(Tag::String, decode_string),
    entry(Tag::List, |p, ctx| decode_children(p, ctx).map(Value::List)),
    entry(Tag::Compound, |p, ctx| {
        decode_children(p, ctx).map(|children| Value::Compound(Compound::from_children(children)))
    }),
    entry(Tag::IntArray, |p, _| {
        decode_array(Tag::IntArray, p).map(Value::IntArray)
    }),
    entry(Tag::LongArray, |p, _| {
        decode_array(Tag::LongArray, p).map(Value::LongArray)
    }),
    entry(Tag::FloatArray, |p, _| {
        decode_array(Tag::FloatArray, p).map(Value::FloatArray)
    }),
    entry(Tag::DoubleArray, |p, _| {
        decode_array(Tag::DoubleArray, p).map(Value::DoubleArray)
    }),
    entry(Tag::ShortArray, |p, _| {
        decode_array(Tag::ShortArray, p).map(Value::ShortArray)
    }),
];

/// Find the decoder for a tag byte.
pub(crate) fn lookup(tag_byte: u8) -> Result<Entry, NbtError> {
    REGISTRY
        .get(tag_byte as usize)
        .copied()
        .flatten()
        .ok_or(NbtError::UnknownTag(tag_byte))
}

/// Per-call decode state: limits plus the current container depth.
pub(crate) struct DecodeCtx<'c> {
    config: &'c DecodeConfig,
    depth: usize,
}

impl<'c> DecodeCtx<'c> {
    pub fn new(config: &'c DecodeConfig) -> Self {
        Self { config, depth: 0 }
    }

    fn enter(&mut self) -> Result<(), NbtError> {
        if self.depth >= self.config.max_depth {
            return Err(NbtError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Decode a buffer holding exactly one element of any kind.
pub(crate) fn decode_element(buf: &[u8], ctx: &mut DecodeCtx<'_>) -> Result<Element, NbtError> {
    let frame = read_frame(buf)?;
    let entry = lookup(frame.tag_byte)?;
    let value = (entry.decode)(frame.payload, ctx)?;
    Ok(Element::from_decoded(frame.name, value))
}

/// Decode a buffer holding exactly one element, which must be `expected`.
pub(crate) fn decode_expected(
    buf: &[u8],
    expected: Tag,
    ctx: &mut DecodeCtx<'_>,
) -> Result<Element, NbtError> {
    let frame = read_frame(buf)?;
    let entry = lookup(frame.tag_byte)?;
    if entry.tag != expected {
        return Err(NbtError::TypeMismatch {
            expected,
            found: entry.tag,
        });
    }
    let value = (entry.decode)(frame.payload, ctx)?;
    Ok(Element::from_decoded(frame.name, value))
}

fn decode_string(payload: &[u8], _: &mut DecodeCtx<'_>) -> Result<Value, NbtError> {
    let s = std::str::from_utf8(payload).map_err(|_| Malformed::InvalidUtf8)?;
    Ok(Value::String(s.to_owned()))
}

/// Walk a container payload child by child, each bounded by its own length field.
fn decode_children(payload: &[u8], ctx: &mut DecodeCtx<'_>) -> Result<Vec<Element>, NbtError> {
    ctx.enter()?;
    let mut children = Vec::new();
    let mut cursor = 0;
    while cursor < payload.len() {
        let rest = &payload[cursor..];
        let declared = child_len(rest, cursor)?;
        children.push(decode_element(&rest[..declared], ctx)?);
        cursor += declared;
    }
    tracing::trace!(children = children.len(), depth = ctx.depth, "decoded container");
    ctx.leave();
    Ok(children)
}

fn child_len(rest: &[u8], offset: usize) -> Result<usize, NbtError> {
    if rest.len() < LEN_FIELD {
        return Err(Malformed::ChildTruncated {
            offset,
            remaining: rest.len(),
        }
        .into());
    }
    let declared = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
    if declared < MIN_ELEMENT_LEN {
        return Err(Malformed::ChildTooShort { offset, declared }.into());
    }
    if declared > rest.len() {
        return Err(Malformed::ChildOverrun {
            offset,
            declared,
            remaining: rest.len(),
        }
        .into());
    }
    Ok(declared)
}
