//! Fixed-width scalar codecs shared by the scalar and array kinds.

use crate::error::{Malformed, NbtError};
use crate::tag::Tag;

/// A primitive with a fixed little-endian wire width.
pub(crate) trait Scalar: Copy {
    const SIZE: usize;

    /// Read from exactly `SIZE` bytes.
    fn read_le(bytes: &[u8]) -> Self;

    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

// Floats go through to/from_le_bytes, which are bit-exact: NaN payloads and
// signed zero survive a round trip.
impl_scalar!(i8, i16, i32, i64, f32, f64);

/// Decode a payload holding exactly one scalar.
pub(crate) fn decode_scalar<T: Scalar>(tag: Tag, payload: &[u8]) -> Result<T, NbtError> {
    if payload.len() != T::SIZE {
        return Err(Malformed::ScalarSize {
            tag,
            len: payload.len(),
            expected: T::SIZE,
        }
        .into());
    }
    Ok(T::read_le(payload))
}

/// Decode a payload of back-to-back scalars. The count is implied by the length.
pub(crate) fn decode_array<T: Scalar>(tag: Tag, payload: &[u8]) -> Result<Vec<T>, NbtError> {
    if payload.len() % T::SIZE != 0 {
        return Err(Malformed::RaggedArray {
            tag,
            len: payload.len(),
            element_size: T::SIZE,
        }
        .into());
    }
    Ok(payload.chunks_exact(T::SIZE).map(T::read_le).collect())
}

/// Encoded size of a run of scalars.
pub(crate) fn array_len<T: Scalar>(values: &[T]) -> usize {
    values.len() * T::SIZE
}

pub(crate) fn encode_array<T: Scalar>(values: &[T], out: &mut Vec<u8>) {
    out.reserve(values.len() * T::SIZE);
    for &v in values {
        v.write_le(out);
    }
}
