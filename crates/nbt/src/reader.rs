use crate::config::DecodeConfig;
use crate::element::Element;
use crate::error::NbtError;
use crate::header::frame_len;
use crate::registry::{DecodeCtx, decode_element};

/// A failure at a known position in a multi-element buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("element at offset {offset}: {error}")]
pub struct ReadError {
    pub offset: usize,
    pub error: NbtError,
}

/// Iterator over back-to-back elements in one buffer.
///
/// An element whose length field is sound but whose content is not is
/// reported and stepped over; the elements after it are still read. A length
/// field that cannot be trusted ends the iteration after its error.
pub struct ElementReader<'a> {
    buf: &'a [u8],
    pos: usize,
    config: DecodeConfig,
    halted: bool,
}

impl<'a> ElementReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_config(buf, DecodeConfig::default())
    }

    pub fn with_config(buf: &'a [u8], config: DecodeConfig) -> Self {
        Self {
            buf,
            pos: 0,
            config,
            halted: false,
        }
    }

    /// Offset of the next element to be read.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl Iterator for ElementReader<'_> {
    type Item = Result<Element, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted || self.pos >= self.buf.len() {
            return None;
        }
        let offset = self.pos;
        let buf = self.buf;
        let rest = &buf[offset..];

        let len = match frame_len(rest) {
            Ok(len) => len,
            Err(error) => {
                tracing::debug!(offset, %error, "unreadable length field, stopping");
                self.halted = true;
                return Some(Err(ReadError { offset, error }));
            }
        };
        self.pos += len;

        let mut ctx = DecodeCtx::new(&self.config);
        match decode_element(&rest[..len], &mut ctx) {
            Ok(element) => Some(Ok(element)),
            Err(error) => {
                tracing::debug!(offset, len, %error, "skipping malformed element");
                Some(Err(ReadError { offset, error }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Malformed;
    use crate::value::Compound;

    fn sample() -> (Vec<Element>, Vec<u8>) {
        let elements = vec![
            Element::new("a", 1i32).unwrap(),
            Element::new("b", vec![1.0f32, 2.0]).unwrap(),
            Element::new("c", Compound::new()).unwrap(),
        ];
        let mut buf = Vec::new();
        for e in &elements {
            e.encode_into(&mut buf).unwrap();
        }
        (elements, buf)
    }

    #[test]
    fn reads_all_in_order() {
        let (elements, buf) = sample();
        let mut reader = ElementReader::new(&buf);
        let read: Vec<Element> = reader.by_ref().map(Result::unwrap).collect();
        assert_eq!(read, elements);
        assert_eq!(reader.position(), buf.len());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        assert!(ElementReader::new(&[]).next().is_none());
    }

    #[test]
    fn bad_content_is_skipped() {
        let (elements, mut buf) = sample();
        // make the first element's tag unknown, framing intact
        buf[4] = 0x7f;
        let results: Vec<_> = ElementReader::new(&buf).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0],
            Err(ReadError {
                offset: 0,
                error: NbtError::UnknownTag(0x7f)
            })
        );
        assert_eq!(results[1].as_ref().unwrap(), &elements[1]);
        assert_eq!(results[2].as_ref().unwrap(), &elements[2]);
    }

    #[test]
    fn truncated_tail_stops_reader() {
        let (elements, mut buf) = sample();
        buf.truncate(buf.len() - 2);
        let results: Vec<_> = ElementReader::new(&buf).collect();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &elements[0]);
        assert_eq!(results[1].as_ref().unwrap(), &elements[1]);
        let err = results[2].as_ref().unwrap_err();
        assert_eq!(err.offset, elements[0].encoded_len() + elements[1].encoded_len());
        assert!(matches!(
            err.error,
            NbtError::MalformedBuffer(Malformed::ShortHeader { .. })
        ));
    }

    #[test]
    fn reader_honours_depth_limit() {
        let nested = Element::new(
            "outer",
            vec![Element::new("inner", Compound::new()).unwrap()],
        )
        .unwrap();
        let buf = nested.encode().unwrap();
        let mut reader = DecodeConfig::with_max_depth(1).reader(&buf);
        assert!(matches!(
            reader.next(),
            Some(Err(ReadError {
                error: NbtError::DepthExceeded { limit: 1 },
                ..
            }))
        ));
        assert!(reader.next().is_none());
    }
}
