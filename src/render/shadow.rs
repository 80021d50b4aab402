use crate::{
    function::Function,
    store::{Slot, Store},
};

use serde_json::Value;

/// An entry found by name within a [`Shadow`].
pub(crate) enum Found<'shadow> {
    /// Plain data.
    Value(&'shadow Value),
    /// A registered function.
    Function(&'shadow dyn Function),
}

/// Wrapper for [`Store`] that tracks the values shadowing it.
///
/// Each open "each" block contributes one frame holding the item bound
/// to `it` for the current iteration. A frame exposes nothing but `it`,
/// so enclosing names must be reached by climbing with `..`.
pub(crate) struct Shadow<'store> {
    /// The store at the base of the chain.
    store: &'store Store,
    /// Values bound to `it`, innermost last.
    frames: Vec<Value>,
}

impl<'store> Shadow<'store> {
    /// Create a new [`Shadow`] over the given [`Store`].
    #[inline]
    pub fn new(store: &'store Store) -> Self {
        Self {
            store,
            frames: vec![],
        }
    }

    /// Push a new frame binding `it` to the given value.
    #[inline]
    pub fn push(&mut self, it: Value) {
        self.frames.push(it);
    }

    /// Remove the innermost frame from the [`Shadow`].
    #[inline]
    pub fn pop(&mut self) {
        self.frames
            .pop()
            .expect("frame must exist when leaving loop scope");
    }

    /// Return the depth of the [`Shadow`].
    ///
    /// The base store sits at depth 0, and every open frame adds one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Get the entry with the given key at the given depth.
    ///
    /// Frames expose exactly one key, `it`. The store at depth 0 exposes
    /// all of its entries.
    pub fn get_at(&self, depth: usize, key: &str) -> Option<Found> {
        if depth == 0 {
            return self.store.get_slot(key).map(|slot| match slot {
                Slot::Value(value) => Found::Value(value),
                Slot::Function(function) => Found::Function(function.as_ref()),
            });
        }
        if key == "it" {
            return Some(Found::Value(&self.frames[depth - 1]));
        }

        None
    }
}
