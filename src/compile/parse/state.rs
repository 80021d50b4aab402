use super::tree::Base;
use crate::region::Region;

/// Describes the internal state of a `Parser`.
///
/// One `State` is pushed for every block tag that opens a scope, and
/// popped when the matching closing block arrives.
pub enum State {
    /// The `Parser` is evaluating an "if" block.
    If {
        /// The expression to the left of the comparator.
        left: Base,
        /// Location of the comparator symbol, and the expression to
        /// the right of it.
        compare: Option<(Region, Base)>,
        /// [`Region`] spanning the opening "if" tag.
        region: Region,
    },
    /// The `Parser` is evaluating an "each" block.
    Each {
        /// The expression producing the items to iterate.
        it: Base,
        /// [`Region`] spanning the opening "each" tag.
        region: Region,
    },
}
