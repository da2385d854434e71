//! Phrase segments and the empty-segment filter.

/// One span of an annotated phrase: either literal text or a recognised entity
/// mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text with no entity meaning.
    Literal(String),
    /// A span recognised as an entity mention.
    EntityRef {
        /// The matched text, exactly as it appeared in the phrase.
        text: String,
        /// The entity type marker, e.g. `@product`.
        entity_type: String,
        /// The entity name without its marker prefix, e.g. `product`.
        alias: String,
    },
}

impl Segment {
    /// The text this segment covers in the original phrase.
    pub fn text(&self) -> &str {
        match self {
            Segment::Literal(text) => text,
            Segment::EntityRef { text, .. } => text,
        }
    }

    /// Whether this segment is an entity mention.
    pub fn is_entity_ref(&self) -> bool {
        matches!(self, Segment::EntityRef { .. })
    }
}

/// An annotated phrase: an ordered sequence of segments whose texts concatenate
/// back to the original input string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedPhrase {
    segments: Vec<Segment>,
}

impl AnnotatedPhrase {
    /// The segments in phrase order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consumes the phrase, yielding its segments.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Rebuilds the source text by concatenating every segment's text in order.
    pub fn reconstruct(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }
}

impl From<Vec<Segment>> for AnnotatedPhrase {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

/// Removes zero-length literal segments.
///
/// Entity mentions are never removed, regardless of text length. Order is
/// preserved, and applying the filter twice is the same as applying it once.
pub fn drop_empty_literals(segments: Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .filter(|segment| match segment {
            Segment::Literal(text) => !text.is_empty(),
            Segment::EntityRef { .. } => true,
        })
        .collect()
}
