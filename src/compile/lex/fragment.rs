use crate::{
    compile::syntax::{BEGIN_BLOCK, BEGIN_EXPRESSION},
    region::Region,
};

/// Types of fragment recognized within source text.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Kind {
    /// Raw text, rendered as-is.
    Text,
    /// An expression tag such as `{{ name }}`, which outputs a value.
    Expression,
    /// A block tag that opens a scope, such as `{% each items %}`.
    OpenBlock,
    /// A block tag that closes a scope, such as `{% end %}`.
    CloseBlock,
}

/// A fragment of source text, classified by the marker it begins with.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    /// Location of the full fragment in the source text.
    pub region: Region,
    /// Location of the fragment's inner text, with markers and surrounding
    /// whitespace removed.
    ///
    /// Matches `region` when the fragment is [`Kind::Text`].
    pub clean: Region,
    /// Classification of the fragment.
    pub kind: Kind,
}

impl Fragment {
    /// Create a new [`Fragment`] over the given region.
    ///
    /// Classification looks only at the leading marker, so a fragment that
    /// begins with an opening marker is a tag even when the closing marker
    /// never arrived. A block whose inner text begins with `end` closes
    /// a scope.
    pub fn new(source: &str, region: Region) -> Self {
        let text = region.literal(source);

        if text.starts_with(BEGIN_EXPRESSION) {
            return Self {
                region,
                clean: clean_region(source, region),
                kind: Kind::Expression,
            };
        }
        if text.starts_with(BEGIN_BLOCK) {
            let clean = clean_region(source, region);
            let kind = if clean.literal(source).starts_with("end") {
                Kind::CloseBlock
            } else {
                Kind::OpenBlock
            };

            return Self {
                region,
                clean,
                kind,
            };
        }

        Self {
            region,
            clean: region,
            kind: Kind::Text,
        }
    }
}

/// Return a [`Region`] covering the text between a tag's markers, with
/// surrounding whitespace removed.
///
/// The markers are dropped as characters rather than bytes, keeping the
/// cut on a character boundary even for a mangled tag.
fn clean_region(source: &str, region: Region) -> Region {
    let trimmed = region.trim(source);
    let literal = trimmed.literal(source);

    let begin = literal
        .char_indices()
        .nth(2)
        .map(|(offset, _)| trimmed.begin + offset)
        .unwrap_or(trimmed.end);
    let end = literal
        .char_indices()
        .nth_back(1)
        .map(|(offset, _)| trimmed.begin + offset)
        .unwrap_or(begin)
        .max(begin);

    Region::new(begin..end).trim(source)
}
