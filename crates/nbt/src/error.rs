use crate::header::{MAX_NAME_LEN, MIN_ELEMENT_LEN};
use crate::tag::Tag;

/// Errors from encoding, decoding, and typed access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NbtError {
    #[error("cannot use {found} data to create a {expected} element")]
    TypeMismatch { expected: Tag, found: Tag },
    #[error("malformed buffer: {0}")]
    MalformedBuffer(#[from] Malformed),
    #[error("unknown tag byte {0:#04x}")]
    UnknownTag(u8),
    #[error("container nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },
    #[error("invalid element name {name:?}: {reason}")]
    InvalidName { name: String, reason: NameError },
    #[error("compound already has a child named {name:?}")]
    DuplicateName { name: String },
    #[error("encoded element would be {len} bytes, more than the length field can hold")]
    TooLarge { len: usize },
}

/// Why a buffer could not be framed or its payload read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Malformed {
    #[error("{available} bytes is shorter than the {min}-byte minimum element", min = MIN_ELEMENT_LEN)]
    ShortHeader { available: usize },
    #[error("length field declares {declared} bytes but {available} are present")]
    LengthMismatch { declared: usize, available: usize },
    #[error("declared length {declared} is below the {min}-byte minimum element", min = MIN_ELEMENT_LEN)]
    LengthTooSmall { declared: usize },
    #[error("name has no terminator before the end of the element")]
    MissingTerminator,
    #[error("name byte {byte:#04x} at offset {offset} is not ASCII")]
    NonAsciiName { byte: u8, offset: usize },
    #[error("name of {len} bytes exceeds the {max}-byte limit", max = MAX_NAME_LEN)]
    NameTooLong { len: usize },
    #[error("{tag} payload is {len} bytes, expected {expected}")]
    ScalarSize { tag: Tag, len: usize, expected: usize },
    #[error("{tag} payload of {len} bytes is not a multiple of {element_size}")]
    RaggedArray {
        tag: Tag,
        len: usize,
        element_size: usize,
    },
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("only {remaining} bytes left at child offset {offset}, too few for an element")]
    ChildTruncated { offset: usize, remaining: usize },
    #[error("child at offset {offset} declares {declared} bytes, below the {min}-byte minimum", min = MIN_ELEMENT_LEN)]
    ChildTooShort { offset: usize, declared: usize },
    #[error("child at offset {offset} declares {declared} bytes but only {remaining} remain in its parent")]
    ChildOverrun {
        offset: usize,
        declared: usize,
        remaining: usize,
    },
}

/// Why a name was refused at construction or rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("contains a NUL byte")]
    Nul,
    #[error("contains non-ASCII characters")]
    NonAscii,
    #[error("is {len} bytes long, the limit is {max}", max = MAX_NAME_LEN)]
    TooLong { len: usize },
}

impl NbtError {
    /// Whether this error describes bad input bytes, as opposed to a wrong
    /// request against good bytes.
    pub fn is_malformed(&self) -> bool {
        matches!(self, NbtError::MalformedBuffer(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_message_names_both_kinds() {
        let err = NbtError::TypeMismatch {
            expected: Tag::FloatArray,
            found: Tag::IntArray,
        };
        assert_eq!(
            err.to_string(),
            "cannot use IntArray data to create a FloatArray element"
        );
    }

    #[test]
    fn malformed_converts_into_nbt_error() {
        let err: NbtError = Malformed::MissingTerminator.into();
        assert!(err.is_malformed());
        assert!(err.to_string().starts_with("malformed buffer:"));
    }

    #[test]
    fn unknown_tag_formats_as_hex() {
        assert_eq!(NbtError::UnknownTag(0x2a).to_string(), "unknown tag byte 0x2a");
    }
}
