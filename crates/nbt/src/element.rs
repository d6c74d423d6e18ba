use serde::Serialize;

use crate::error::NbtError;
use crate::header::{header_len, validate_name, write_header};
use crate::tag::Tag;
use crate::value::{Compound, Value};

/// A named, typed value: the unit of the tagged binary format.
///
/// The kind is fixed at construction. Mutable access goes through the typed
/// `*_mut` accessors, which can change the payload but never the kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    name: String,
    value: Value,
}

macro_rules! scalar_accessors {
    ($($get:ident, $get_mut:ident, $variant:ident, $ty:ty;)*) => {
        $(
            pub fn $get(&self) -> Result<$ty, NbtError> {
                match &self.value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(mismatch(Tag::$variant, other)),
                }
            }

            pub fn $get_mut(&mut self) -> Result<&mut $ty, NbtError> {
                match &mut self.value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch(Tag::$variant, other)),
                }
            }
        )*
    };
}

macro_rules! array_accessors {
    ($($get:ident, $get_mut:ident, $variant:ident, $ty:ty;)*) => {
        $(
            pub fn $get(&self) -> Result<&[$ty], NbtError> {
                match &self.value {
                    Value::$variant(v) => Ok(v.as_slice()),
                    other => Err(mismatch(Tag::$variant, other)),
                }
            }

            pub fn $get_mut(&mut self) -> Result<&mut Vec<$ty>, NbtError> {
                match &mut self.value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch(Tag::$variant, other)),
                }
            }
        )*
    };
}

fn mismatch(expected: Tag, found: &Value) -> NbtError {
    NbtError::TypeMismatch {
        expected,
        found: found.tag(),
    }
}

impl Element {
    /// Create an element, rejecting names the wire format cannot carry.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Result<Self, NbtError> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            value: value.into(),
        })
    }

    /// Build from a name already checked by the frame reader.
    pub(crate) fn from_decoded(name: &str, value: Value) -> Self {
        Self {
            name: name.to_owned(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), NbtError> {
        let name = name.into();
        check_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn tag(&self) -> Tag {
        self.value.tag()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }

    /// Exact size of this element's encoding, header included.
    pub fn encoded_len(&self) -> usize {
        header_len(&self.name) + self.value.payload_len()
    }

    pub fn encode(&self) -> Result<Vec<u8>, NbtError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out)?;
        Ok(out)
    }

    /// Append this element's encoding to `out`.
    ///
    /// The length is computed up front so the header is written once, before
    /// the payload; nothing is patched afterwards.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), NbtError> {
        let len = self.encoded_len();
        let total = u32::try_from(len).map_err(|_| NbtError::TooLarge { len })?;
        write_header(out, total, self.tag(), &self.name);
        self.value.encode_payload(out)
    }

    scalar_accessors! {
        as_byte, as_byte_mut, Byte, i8;
        as_short, as_short_mut, Short, i16;
        as_int, as_int_mut, Int, i32;
        as_long, as_long_mut, Long, i64;
        as_float, as_float_mut, Float, f32;
        as_double, as_double_mut, Double, f64;
    }

    array_accessors! {
        as_byte_array, as_byte_array_mut, ByteArray, i8;
        as_short_array, as_short_array_mut, ShortArray, i16;
        as_int_array, as_int_array_mut, IntArray, i32;
        as_long_array, as_long_array_mut, LongArray, i64;
        as_float_array, as_float_array_mut, FloatArray, f32;
        as_double_array, as_double_array_mut, DoubleArray, f64;
        as_list, as_list_mut, List, Element;
    }

    pub fn as_str(&self) -> Result<&str, NbtError> {
        match &self.value {
            Value::String(s) => Ok(s.as_str()),
            other => Err(mismatch(Tag::String, other)),
        }
    }

    pub fn as_string_mut(&mut self) -> Result<&mut String, NbtError> {
        match &mut self.value {
            Value::String(s) => Ok(s),
            other => Err(mismatch(Tag::String, other)),
        }
    }

    pub fn as_compound(&self) -> Result<&Compound, NbtError> {
        match &self.value {
            Value::Compound(c) => Ok(c),
            other => Err(mismatch(Tag::Compound, other)),
        }
    }

    pub fn as_compound_mut(&mut self) -> Result<&mut Compound, NbtError> {
        match &mut self.value {
            Value::Compound(c) => Ok(c),
            other => Err(mismatch(Tag::Compound, other)),
        }
    }
}

fn check_name(name: &str) -> Result<(), NbtError> {
    validate_name(name).map_err(|reason| NbtError::InvalidName {
        name: name.to_owned(),
        reason,
    })
}
