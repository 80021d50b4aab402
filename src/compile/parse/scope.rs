use crate::compile::tree::Tree;

/// A distinct set of [`Tree`] instances covering one area of the source.
#[derive(Debug, Clone)]
pub struct Scope {
    pub data: Vec<Tree>,
}

impl Scope {
    /// Create a new, empty Scope.
    #[inline]
    pub fn new() -> Self {
        Self { data: vec![] }
    }
}
