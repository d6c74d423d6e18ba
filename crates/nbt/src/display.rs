//! Compact text rendering: `name: value`, arrays as `[a, b]`, containers braced.
//!
//! Scalars carry a kind suffix (`5b`, `5s`, `5L`, `1.5f`, `1.5d`) so kinds
//! stay distinguishable; ints are bare.

use std::fmt;

use crate::element::Element;
use crate::value::Value;

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.value())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{v}b"),
            Value::Short(v) => write!(f, "{v}s"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}L"),
            Value::Float(v) => write!(f, "{v}f"),
            Value::Double(v) => write!(f, "{v}d"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::ByteArray(v) => seq(f, v),
            Value::ShortArray(v) => seq(f, v),
            Value::IntArray(v) => seq(f, v),
            Value::LongArray(v) => seq(f, v),
            Value::FloatArray(v) => seq(f, v),
            Value::DoubleArray(v) => seq(f, v),
            Value::List(children) => {
                f.write_str("[")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    // list children are positional, only show names they actually carry
                    if child.name().is_empty() {
                        write!(f, "{}", child.value())?;
                    } else {
                        write!(f, "{child}")?;
                    }
                }
                f.write_str("]")
            }
            Value::Compound(c) => {
                f.write_str("{")?;
                for (i, child) in c.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn seq<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use crate::element::Element;
    use crate::value::Compound;

    #[test]
    fn float_array() {
        let el = Element::new("positions", vec![1.0f32, -2.5, 3.0]).unwrap();
        assert_eq!(el.to_string(), "positions: [1, -2.5, 3]");
    }

    #[test]
    fn scalars_carry_suffixes() {
        assert_eq!(Element::new("a", 5i8).unwrap().to_string(), "a: 5b");
        assert_eq!(Element::new("a", 5i64).unwrap().to_string(), "a: 5L");
        assert_eq!(Element::new("a", 1.5f64).unwrap().to_string(), "a: 1.5d");
        assert_eq!(Element::new("a", "hi").unwrap().to_string(), "a: \"hi\"");
    }

    #[test]
    fn containers() {
        let c: Compound = [
            Element::new("x", 1i32).unwrap(),
            Element::new(
                "tags",
                vec![
                    Element::new("", "red").unwrap(),
                    Element::new("n", 2i32).unwrap(),
                ],
            )
            .unwrap(),
        ]
        .into_iter()
        .collect();
        let el = Element::new("root", c).unwrap();
        assert_eq!(el.to_string(), "root: {x: 1, tags: [\"red\", n: 2]}");
    }
}
