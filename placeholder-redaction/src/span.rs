//! Detector output.

use crate::{category::EntityCategory, error::SpanError};

/// One entity reported by a detector.
///
/// Offsets are UTF-8 byte offsets into the text the detector saw, `start`
/// inclusive and `end` exclusive. Spans from one detection pass may arrive in
/// any order and may overlap; the redaction engine resolves that.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySpan {
    /// Kind of entity.
    pub category: EntityCategory,
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// The text the detector reported for the span.
    pub text: String,
    /// Detector confidence, nominally in `0.0..=1.0`.
    pub confidence: f64,
}

impl EntitySpan {
    /// Builds a span from its parts.
    pub fn new(
        category: EntityCategory,
        start: usize,
        end: usize,
        text: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            category,
            start,
            end,
            text: text.into(),
            confidence,
        }
    }

    /// Builds a span covering `start..end` of `source`, copying the text.
    ///
    /// Returns `None` if the range is not a valid slice of `source`.
    pub fn from_source(
        source: &str,
        category: EntityCategory,
        start: usize,
        end: usize,
        confidence: f64,
    ) -> Option<Self> {
        let text = source.get(start..end)?;
        Some(Self::new(category, start, end, text, confidence))
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` when the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks the span against `source` and returns the slice it covers.
    pub fn slice<'t>(&self, source: &'t str) -> Result<&'t str, SpanError> {
        let (start, end) = (self.start, self.end);
        if start >= end {
            return Err(SpanError::Inverted { start, end });
        }
        if end > source.len() {
            return Err(SpanError::OutOfBounds {
                start,
                end,
                len: source.len(),
            });
        }
        source.get(start..end).ok_or_else(|| SpanError::NotCharBoundary {
            offset: if source.is_char_boundary(start) {
                end
            } else {
                start
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::EntitySpan;
    use crate::{category::EntityCategory, error::SpanError};

    #[test]
    fn slice_returns_the_covered_text() {
        let span = EntitySpan::new(EntityCategory::Person, 4, 8, "Jane", 0.9);
        assert_eq!(span.slice("Hi, Jane!"), Ok("Jane"));
    }

    #[test]
    fn slice_rejects_inverted_and_empty_spans() {
        let inverted = EntitySpan::new(EntityCategory::Person, 5, 2, "", 0.9);
        assert_eq!(
            inverted.slice("Hello"),
            Err(SpanError::Inverted { start: 5, end: 2 })
        );
        let empty = EntitySpan::new(EntityCategory::Person, 2, 2, "", 0.9);
        assert!(empty.is_empty());
        assert!(matches!(empty.slice("Hello"), Err(SpanError::Inverted { .. })));
    }

    #[test]
    fn slice_rejects_out_of_bounds() {
        let span = EntitySpan::new(EntityCategory::Person, 2, 20, "", 0.9);
        assert_eq!(
            span.slice("Hello"),
            Err(SpanError::OutOfBounds {
                start: 2,
                end: 20,
                len: 5
            })
        );
    }

    #[test]
    fn slice_rejects_split_code_points() {
        // "é" occupies bytes 3..5.
        let span = EntitySpan::new(EntityCategory::Person, 0, 4, "", 0.9);
        assert_eq!(
            span.slice("Renée"),
            Err(SpanError::NotCharBoundary { offset: 4 })
        );
        let span = EntitySpan::new(EntityCategory::Person, 4, 6, "", 0.9);
        assert_eq!(
            span.slice("Renée"),
            Err(SpanError::NotCharBoundary { offset: 4 })
        );
    }

    #[test]
    fn from_source_copies_text() {
        let span = EntitySpan::from_source("Call Bob", EntityCategory::Person, 5, 8, 1.0).unwrap();
        assert_eq!(span.text, "Bob");
        assert!(EntitySpan::from_source("Call Bob", EntityCategory::Person, 5, 9, 1.0).is_none());
    }
}
