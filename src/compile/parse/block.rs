use crate::{
    compile::tree::{Base, Call},
    region::Region,
};

/// Represents the parsed contents of a block tag.
pub enum Block {
    /// The `{% if x > y %}` opening of an "if" block.
    ///
    /// Holds the left expression and, when the block compares two
    /// expressions, the comparator location and right expression.
    If(Base, Option<(Region, Base)>),
    /// The `{% else %}` divider within an "if" block.
    Else,
    /// The `{% each items %}` opening of an "each" block.
    Each(Base),
    /// A complete `{% call name ... %}` block.
    Call(Call),
}
