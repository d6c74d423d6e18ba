use serde::Serialize;
use std::fmt;

/// The closed set of element kinds.
///
/// Numbering follows classic NBT for the kinds it shares (`Byte`..`LongArray`),
/// with the typed arrays NBT lacks appended after it. Byte `0` is reserved
/// and never written.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tag {
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
    FloatArray = 13,
    DoubleArray = 14,
    ShortArray = 15,
}

impl Tag {
    /// Every tag, in byte order.
    pub const ALL: [Tag; 15] = [
        Tag::Byte,
        Tag::Short,
        Tag::Int,
        Tag::Long,
        Tag::Float,
        Tag::Double,
        Tag::ByteArray,
        Tag::String,
        Tag::List,
        Tag::Compound,
        Tag::IntArray,
        Tag::LongArray,
        Tag::FloatArray,
        Tag::DoubleArray,
        Tag::ShortArray,
    ];

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Byte),
            2 => Some(Self::Short),
            3 => Some(Self::Int),
            4 => Some(Self::Long),
            5 => Some(Self::Float),
            6 => Some(Self::Double),
            7 => Some(Self::ByteArray),
            8 => Some(Self::String),
            9 => Some(Self::List),
            10 => Some(Self::Compound),
            11 => Some(Self::IntArray),
            12 => Some(Self::LongArray),
            13 => Some(Self::FloatArray),
            14 => Some(Self::DoubleArray),
            15 => Some(Self::ShortArray),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable kind name, used in error messages and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Byte => "Byte",
            Tag::Short => "Short",
            Tag::Int => "Int",
            Tag::Long => "Long",
            Tag::Float => "Float",
            Tag::Double => "Double",
            Tag::ByteArray => "ByteArray",
            Tag::String => "String",
            Tag::List => "List",
            Tag::Compound => "Compound",
            Tag::IntArray => "IntArray",
            Tag::LongArray => "LongArray",
            Tag::FloatArray => "FloatArray",
            Tag::DoubleArray => "DoubleArray",
            Tag::ShortArray => "ShortArray",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
