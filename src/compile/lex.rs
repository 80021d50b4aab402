pub mod fragment;

use super::syntax::{finder, Marker};
use crate::region::Region;

use morel::Finder;

/// Provides methods to split a source string into [`Region`] instances
/// covering fragments of the text.
///
/// A fragment is either a tag, running from an opening marker to the
/// nearest closing marker of the same kind, or a span of raw text
/// between tags.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Compiled [`Finder`] instance used to search for markers
    /// in the source text.
    finder: &'static Finder,
    /// Temporary storage for a tag [`Region`] that will be read
    /// on the following call to `.next`.
    buffer: Option<Region>,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] from the given source.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            cursor: 0,
            finder: finder(),
            buffer: None,
        }
    }

    /// Return the [`Region`] of the next fragment.
    ///
    /// An opening marker with no closing marker on the same line does not
    /// begin a tag, and is swallowed by the surrounding raw text.
    pub fn next(&mut self) -> Option<Region> {
        // Always prefer taking from the buffer when possible.
        if let Some(next) = self.buffer.take() {
            return Some(next);
        }
        if self.cursor >= self.source.len() {
            return None;
        }

        let mut from = self.cursor;
        loop {
            match self.finder.next(self.source, from) {
                Some((id, marker_begin, marker_end)) => {
                    let marker = Marker::from(id);
                    if !marker.is_begin() {
                        // A stray closing marker belongs to raw text.
                        from = marker_end;
                        continue;
                    }

                    match self.close(&marker, marker_begin, marker_end) {
                        Some(tag_end) => {
                            let tag = Region::new(marker_begin..tag_end);
                            let raw = Region::new(self.cursor..marker_begin);
                            self.cursor = tag_end;

                            if raw.is_empty() {
                                return Some(tag);
                            }
                            self.buffer = Some(tag);

                            return Some(raw);
                        }
                        None => {
                            // Later markers may still begin a tag, even one
                            // overlapping this failed opener.
                            from = marker_begin + 1;
                            continue;
                        }
                    }
                }
                None => {
                    let remaining = Region::new(self.cursor..self.source.len());
                    self.cursor = self.source.len();

                    return Some(remaining);
                }
            }
        }
    }

    /// Return the end index of the closing marker that matches the given
    /// opening [`Marker`].
    ///
    /// Returns None when the nearest matching closer sits on a later line,
    /// or does not exist at all.
    fn close(&self, marker: &Marker, from: usize, mut at: usize) -> Option<usize> {
        let want: usize = marker.end().into();

        loop {
            let (id, close_begin, close_end) = self.finder.next(self.source, at)?;
            if id == want {
                if self.source[from..close_begin].contains('\n') {
                    return None;
                }

                return Some(close_end);
            }
            // Skip a single byte, a matching closer may overlap this marker.
            at = close_begin + 1;
        }
    }
}
