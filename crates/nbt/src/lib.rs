//! Tagged binary elements: named, typed values in a self-framing byte layout.
//!
//! Every element is `[total_len u32 LE][tag u8][ASCII name][0x00][payload]`.
//! The payload is one little-endian scalar, a run of them, UTF-8 text, or a
//! sequence of child elements for the List and Compound kinds.
//!
//! # Invariants
//! - An element's kind is fixed at construction; decoding as the wrong kind fails.
//! - The length field always equals the element's exact encoded size, so any
//!   element can be bounded or skipped without reading its payload.
//! - Names never contain `0x00`.
//! - Compounds built through the API never hold two children with one name.
//! - Encoding a decoded element reproduces the input bytes.
//!
//! Decoding is pure and allocation-only: no I/O, no shared state. Separate
//! buffers can be decoded concurrently without coordination.

mod codec;
mod config;
mod display;
mod element;
mod error;
mod header;
mod reader;
mod registry;
mod scalar;
mod tag;
mod value;

pub use codec::{decode, decode_as, decode_prefix, encode, peek_tag};
pub use config::{DEFAULT_MAX_DEPTH, DecodeConfig};
pub use element::Element;
pub use error::{Malformed, NameError, NbtError};
pub use header::{MAX_NAME_LEN, MIN_ELEMENT_LEN, header_len, validate_name};
pub use reader::{ElementReader, ReadError};
pub use tag::Tag;
pub use value::{ChildMut, Compound, Value};

pub fn crate_info() -> &'static str {
    "voxelesque-nbt v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("nbt"));
    }

    #[test]
    fn elements_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Element>();
        assert_send_sync::<DecodeConfig>();
        assert_send_sync::<NbtError>();
    }

    #[test]
    fn concurrent_decodes_are_independent() {
        let buffers: Vec<Vec<u8>> = (0..4)
            .map(|i| {
                Element::new(format!("e{i}"), vec![i as f32; 16])
                    .unwrap()
                    .encode()
                    .unwrap()
            })
            .collect();
        std::thread::scope(|s| {
            let handles: Vec<_> = buffers
                .iter()
                .map(|buf| s.spawn(move || decode(buf).unwrap()))
                .collect();
            for (i, h) in handles.into_iter().enumerate() {
                let el = h.join().unwrap();
                assert_eq!(el.name(), format!("e{i}"));
                assert_eq!(el.as_float_array().unwrap(), &[i as f32; 16]);
            }
        });
    }

    #[test]
    fn serializes_to_json() {
        let el = Element::new("positions", vec![1.0f32, -2.5]).unwrap();
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "positions", "value": { "FloatArray": [1.0, -2.5] } })
        );
    }
}
