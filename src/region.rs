use std::{
    cmp::{max, min},
    ops::{Index, Range},
};

/// Represents an area within source text.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Region {
    /// The beginning of the range, inclusive.
    pub begin: usize,
    /// The ending of the range, exclusive.
    pub end: usize,
}

impl Region {
    /// Create a new Region from the given range.
    pub fn new(position: Range<usize>) -> Self {
        Self {
            begin: position.start,
            end: position.end,
        }
    }

    /// Combine will merge the indices of two [`Region`] instances.
    pub fn combine(self, other: Self) -> Self {
        Self {
            begin: min(self.begin, other.begin),
            end: max(self.end, other.end),
        }
    }

    /// Return true if this [`Region`] covers no text.
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Shrink this [`Region`] to exclude leading and trailing whitespace.
    ///
    /// An all-whitespace `Region` collapses to an empty one.
    pub fn trim(self, source: &str) -> Self {
        let literal = self.literal(source);
        let begin = self.begin + (literal.len() - literal.trim_start().len());
        let end = self.end - (literal.len() - literal.trim_end().len());

        Self {
            begin,
            end: max(begin, end),
        }
    }

    /// Access the literal value of a [`Region`].
    ///
    /// # Panics
    ///
    /// Panics if the `Region` is out of bounds in the given source text.
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        let literal = source
            .get(self.begin..self.end)
            .expect("getting literal by region should not fail");

        literal
    }
}

impl Index<Region> for str {
    type Output = str;

    fn index(&self, region: Region) -> &Self::Output {
        let Region { begin, end } = region;

        &self[begin..end]
    }
}

impl From<Range<usize>> for Region {
    fn from(value: Range<usize>) -> Self {
        Self {
            begin: value.start,
            end: value.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        let combined = Region::new(5..10).combine(Region::new(8..15));

        assert_eq!(combined.begin, 5);
        assert_eq!(combined.end, 15);
    }

    #[test]
    fn test_literal() {
        let source = "Hello, Taylor!";
        let region = Region::new(7..13);

        assert_eq!(region.literal(source), "Taylor");
    }

    #[test]
    fn test_trim() {
        let source = "..  name  ..";
        let trimmed = Region::new(2..10).trim(source);

        assert_eq!(trimmed, Region::new(4..8));
        assert_eq!(trimmed.literal(source), "name");
    }

    #[test]
    fn test_trim_all_whitespace() {
        let source = "{{    }}";
        let trimmed = Region::new(2..6).trim(source);

        assert!(trimmed.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_literal() {
        let source = "Hello, Taylor!";
        let region = Region::new(7..15);

        region.literal(source);
    }
}
