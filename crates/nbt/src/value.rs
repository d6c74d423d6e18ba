use serde::Serialize;
use std::ops::Deref;

use crate::element::Element;
use crate::error::NbtError;
use crate::scalar::{Scalar, array_len, encode_array};
use crate::tag::Tag;

/// The payload of an element. The variant is the element's kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<i8>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    /// Children in index order. Names are kept but carry no meaning.
    List(Vec<Element>),
    Compound(Compound),
}

impl Value {
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::String(_) => Tag::String,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::ShortArray(_) => Tag::ShortArray,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
            Value::FloatArray(_) => Tag::FloatArray,
            Value::DoubleArray(_) => Tag::DoubleArray,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
        }
    }

    /// Encoded payload size in bytes, children's headers included.
    pub fn payload_len(&self) -> usize {
        match self {
            Value::Byte(_) => i8::SIZE,
            Value::Short(_) => i16::SIZE,
            Value::Int(_) => i32::SIZE,
            Value::Long(_) => i64::SIZE,
            Value::Float(_) => f32::SIZE,
            Value::Double(_) => f64::SIZE,
            Value::String(s) => s.len(),
            Value::ByteArray(v) => array_len(v),
            Value::ShortArray(v) => array_len(v),
            Value::IntArray(v) => array_len(v),
            Value::LongArray(v) => array_len(v),
            Value::FloatArray(v) => array_len(v),
            Value::DoubleArray(v) => array_len(v),
            Value::List(children) => children.iter().map(Element::encoded_len).sum(),
            Value::Compound(c) => c.iter().map(Element::encoded_len).sum(),
        }
    }

    pub(crate) fn encode_payload(&self, out: &mut Vec<u8>) -> Result<(), NbtError> {
        match self {
            Value::Byte(v) => v.write_le(out),
            Value::Short(v) => v.write_le(out),
            Value::Int(v) => v.write_le(out),
            Value::Long(v) => v.write_le(out),
            Value::Float(v) => v.write_le(out),
            Value::Double(v) => v.write_le(out),
            Value::String(s) => out.extend_from_slice(s.as_bytes()),
            Value::ByteArray(v) => encode_array(v, out),
            Value::ShortArray(v) => encode_array(v, out),
            Value::IntArray(v) => encode_array(v, out),
            Value::LongArray(v) => encode_array(v, out),
            Value::FloatArray(v) => encode_array(v, out),
            Value::DoubleArray(v) => encode_array(v, out),
            Value::List(children) => {
                for child in children {
                    child.encode_into(out)?;
                }
            }
            Value::Compound(c) => {
                for child in c {
                    child.encode_into(out)?;
                }
            }
        }
        Ok(())
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<i8> => ByteArray,
    Vec<i16> => ShortArray,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Vec<Element> => List,
    Compound => Compound,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

/// Named children in insertion order.
///
/// Built through the API, names are unique: `insert` replaces a same-named
/// child in place, children are renamed only through [`Compound::rename`],
/// and [`Compound::get_mut`] hands out a [`ChildMut`] that cannot touch the
/// name. Decoded compounds keep every stored child, duplicates included, so
/// re-encoding reproduces the input bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Compound {
    children: Vec<Element>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_children(children: Vec<Element>) -> Self {
        Self { children }
    }

    /// Insert a child. A child with the same name is replaced in place and returned.
    pub fn insert(&mut self, element: Element) -> Option<Element> {
        match self.children.iter_mut().find(|c| c.name() == element.name()) {
            Some(slot) => Some(std::mem::replace(slot, element)),
            None => {
                self.children.push(element);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<ChildMut<'_>> {
        self.children
            .iter_mut()
            .find(|c| c.name() == name)
            .map(|element| ChildMut { element })
    }

    /// Rename the first child called `from` to `to`, keeping its position.
    ///
    /// Returns `Ok(false)` when no child is called `from`. Fails with
    /// `DuplicateName` when another child is already called `to`.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<bool, NbtError> {
        let to = to.into();
        let Some(idx) = self.children.iter().position(|c| c.name() == from) else {
            return Ok(false);
        };
        if from != to && self.contains(&to) {
            return Err(NbtError::DuplicateName { name: to });
        }
        self.children[idx].set_name(to)?;
        Ok(true)
    }

    /// Remove the first child with this name, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Element> {
        let idx = self.children.iter().position(|c| c.name() == name)?;
        Some(self.children.remove(idx))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.children.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(Element::name)
    }

    pub fn into_children(self) -> Vec<Element> {
        self.children
    }
}

/// Mutable access to one compound child's payload.
///
/// Reads go through [`Element`] by deref; writes are limited to the typed
/// `*_mut` accessors, so the child's name and kind stay as they were.
#[derive(Debug)]
pub struct ChildMut<'a> {
    element: &'a mut Element,
}

macro_rules! delegate_mut {
    ($($method:ident -> $ty:ty;)*) => {
        $(
            pub fn $method(&mut self) -> Result<&mut $ty, NbtError> {
                self.element.$method()
            }
        )*
    };
}

impl ChildMut<'_> {
    delegate_mut! {
        as_byte_mut -> i8;
        as_short_mut -> i16;
        as_int_mut -> i32;
        as_long_mut -> i64;
        as_float_mut -> f32;
        as_double_mut -> f64;
        as_string_mut -> String;
        as_byte_array_mut -> Vec<i8>;
        as_short_array_mut -> Vec<i16>;
        as_int_array_mut -> Vec<i32>;
        as_long_array_mut -> Vec<i64>;
        as_float_array_mut -> Vec<f32>;
        as_double_array_mut -> Vec<f64>;
        as_list_mut -> Vec<Element>;
        as_compound_mut -> Compound;
    }
}

impl Deref for ChildMut<'_> {
    type Target = Element;

    fn deref(&self) -> &Element {
        self.element
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl IntoIterator for Compound {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl FromIterator<Element> for Compound {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut compound = Compound::new();
        for element in iter {
            compound.insert(element);
        }
        compound
    }
}

impl Extend<Element> for Compound {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(name: &str, v: impl Into<Value>) -> Element {
        Element::new(name, v).unwrap()
    }

    #[test]
    fn tags_follow_variants() {
        assert_eq!(Value::from(1.5f32).tag(), Tag::Float);
        assert_eq!(Value::from(vec![1.5f32]).tag(), Tag::FloatArray);
        assert_eq!(Value::from("x").tag(), Tag::String);
        assert_eq!(Value::from(Vec::<Element>::new()).tag(), Tag::List);
        assert_eq!(Value::from(Compound::new()).tag(), Tag::Compound);
    }

    #[test]
    fn payload_len_of_arrays() {
        assert_eq!(Value::from(vec![1.0f32, -2.5, 3.0]).payload_len(), 12);
        assert_eq!(Value::from(vec![0i16; 5]).payload_len(), 10);
        assert_eq!(Value::from("héllo").payload_len(), 6);
    }

    #[test]
    fn payload_len_matches_encoded_payload() {
        let values = [
            Value::from(-1i8),
            Value::from(2i16),
            Value::from(3i32),
            Value::from(4i64),
            Value::from(0.5f32),
            Value::from(0.25f64),
            Value::from(vec![1i8, 2, 3]),
            Value::from(vec![1i16, 2]),
            Value::from(vec![1i32]),
            Value::from(vec![1i64, 2]),
            Value::from(vec![1.0f64]),
            Value::from(vec![el("", 1i16)]),
        ];
        for value in values {
            let mut out = Vec::new();
            value.encode_payload(&mut out).unwrap();
            assert_eq!(value.payload_len(), out.len(), "{:?}", value.tag());
        }
        assert_eq!(Value::from(1.0f64).payload_len(), 8);
        assert_eq!(Value::from(1i16).payload_len(), 2);
    }

    #[test]
    fn compound_insert_replaces_in_place() {
        let mut c = Compound::new();
        c.insert(el("a", 1i32));
        c.insert(el("b", 2i32));
        let old = c.insert(el("a", 3i32)).unwrap();
        assert_eq!(old.as_int().unwrap(), 1);
        assert_eq!(c.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(c.get("a").unwrap().as_int().unwrap(), 3);
    }

    #[test]
    fn compound_remove_keeps_order() {
        let mut c: Compound = [el("x", 1i8), el("y", 2i8), el("z", 3i8)]
            .into_iter()
            .collect();
        assert!(c.remove("y").is_some());
        assert!(c.remove("y").is_none());
        assert_eq!(c.names().collect::<Vec<_>>(), ["x", "z"]);
        assert!(c.contains("z"));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn child_mut_edits_payload_only() {
        let mut c: Compound = [el("a", 1i32), el("b", vec![1i8])].into_iter().collect();
        let mut b = c.get_mut("b").unwrap();
        b.as_byte_array_mut().unwrap().push(2);
        assert!(b.as_int_mut().is_err());
        assert_eq!(b.name(), "b");
        assert_eq!(c.get("b").unwrap().as_byte_array().unwrap(), &[1, 2]);
    }

    #[test]
    fn rename_refuses_collisions() {
        let mut c: Compound = [el("a", 1i32), el("b", 2i32)].into_iter().collect();
        assert_eq!(
            c.rename("b", "a").unwrap_err(),
            NbtError::DuplicateName { name: "a".into() }
        );
        assert_eq!(c.names().collect::<Vec<_>>(), ["a", "b"]);

        assert!(c.rename("b", "c").unwrap());
        assert!(!c.rename("missing", "d").unwrap());
        assert!(c.rename("a", "a").unwrap());
        assert!(c.rename("c", "bad\0").is_err());
        assert_eq!(c.names().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(c.get("c").unwrap().as_int().unwrap(), 2);
    }

    #[test]
    fn compound_payload_is_sum_of_children() {
        let c: Compound = [el("a", 1i32), el("bb", 2i64)].into_iter().collect();
        let expected = c.iter().map(Element::encoded_len).sum::<usize>();
        assert_eq!(Value::Compound(c).payload_len(), expected);
        assert_eq!(expected, (6 + 1 + 4) + (6 + 2 + 8));
    }
}
