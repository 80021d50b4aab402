use morel::{Finder, Kind, Syntax};
use std::sync::OnceLock;

/// Marker that opens an expression tag.
pub const BEGIN_EXPRESSION: &str = "{{";
/// Marker that closes an expression tag.
pub const END_EXPRESSION: &str = "}}";
/// Marker that opens a block tag.
pub const BEGIN_BLOCK: &str = "{%";
/// Marker that closes a block tag.
pub const END_BLOCK: &str = "%}";

/// Markers that identify expressions and blocks within text.
pub enum Marker {
    /// Beginning of an Expression, which outputs the value of a literal
    /// or stored name.
    BeginExpression = 0,
    /// End of an Expression.
    EndExpression = 1,
    /// Beginning of a Block, which allows for logical constructs such
    /// as "each", "if" and "call".
    BeginBlock = 2,
    /// End of a Block.
    EndBlock = 3,
}

impl Marker {
    /// Return true if this [`Marker`] opens a tag.
    pub fn is_begin(&self) -> bool {
        matches!(self, Self::BeginExpression | Self::BeginBlock)
    }

    /// Return the [`Marker`] that closes the tag this `Marker` opens.
    ///
    /// # Panics
    ///
    /// Panics when called on a closing `Marker`.
    pub fn end(&self) -> Self {
        match self {
            Self::BeginExpression => Self::EndExpression,
            Self::BeginBlock => Self::EndBlock,
            _ => unreachable!(),
        }
    }
}

impl From<usize> for Marker {
    fn from(value: usize) -> Self {
        match value {
            0 => Self::BeginExpression,
            1 => Self::EndExpression,
            2 => Self::BeginBlock,
            3 => Self::EndBlock,
            _ => unreachable!(),
        }
    }
}

impl From<Marker> for usize {
    fn from(k: Marker) -> Self {
        k as usize
    }
}

/// Return a [`Syntax`] covering the four tag markers.
pub fn to_syntax() -> Syntax {
    let mut markers = Vec::new();

    markers.push((Marker::BeginExpression.into(), BEGIN_EXPRESSION.into()));
    markers.push((Marker::EndExpression.into(), END_EXPRESSION.into()));
    markers.push((Marker::BeginBlock.into(), BEGIN_BLOCK.into()));
    markers.push((Marker::EndBlock.into(), END_BLOCK.into()));

    Syntax::new(markers)
}

/// Return the shared [`Finder`] over the tag markers.
pub(crate) fn finder() -> &'static Finder {
    static FINDER: OnceLock<Finder> = OnceLock::new();

    FINDER.get_or_init(|| Finder::new(to_syntax(), Kind::AhoCorasick))
}
