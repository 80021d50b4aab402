use super::{Pointer, RED, RESET};
use crate::{log::Visual, region::Region};
use std::fmt::{Debug, Display, Formatter, Result};

/// Describes an error, and allows adding a contextual help text and visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use sprig::{
///     function::{Error, Region, visual::Pointer}
/// };
///
/// Error::build("unresolved name")
///     .with_pointer("{{ update.name }}", Region::new(3..14))
///     .with_help("`update.name` is not available in this scope");
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this output:
///
/// ```text
/// error: unresolved name
///   --> 1:4
///    |
///  1 | {{ update.name }}
///    |    ^^^^^^^^^^^
///    |
///   = help: `update.name` is not available in this scope
/// ```
pub struct Error {
    /// Describes the cause of the [`Error`].
    reason: String,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
}

impl Error {
    /// Create a new [`Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::function::{visual::Pointer, Error};
    ///
    /// let pointer = Pointer::new("source", (0..4).into());
    /// Error::new("unresolved name", "help", pointer);
    /// ```
    pub fn new<T, Y>(reason: T, help: T, visual: Y) -> Self
    where
        T: Into<String>,
        Y: Visual + 'static,
    {
        Error {
            reason: reason.into(),
            visual: Some(Box::new(visual)),
            help: Some(help.into()),
        }
    }

    /// Create a new [`Error`] with the given reason text.
    ///
    /// The additional fields may be populated using the various methods
    /// defined on `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::function::Error;
    ///
    /// Error::build("unexpected block")
    ///     .with_help("expected `each`, `if`, `else` or `call`, found `...`");
    /// ```
    pub fn build<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            reason: reason.into(),
            visual: None,
            help: None,
        }
    }

    /// Set the reason text, which is a short summary of the [`Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sprig::function::Error;
    ///
    /// // Reason text begins as an empty string, but is immediately
    /// // updated to "something else":
    /// let mut error = Error::build("")
    ///     .with_reason("something else");
    /// ```
    pub fn with_reason<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.reason = text.into();

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate the
    /// cause of the error.
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] with the given source text and
    /// [`Region`].
    ///
    /// This is a shortcut method for creating a `Pointer` yourself and then
    /// setting it with the `with_visual` method
    ///
    /// ```text
    /// ...
    /// error
    ///     .with_visual(Pointer::new(source, (1..2).into()))
    /// ...
    ///
    /// // becomes:
    ///
    /// error
    ///     .with_pointer(source, (1..2).into())
    /// ```
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the reason text, which is a short summary of the [`Error`].
    pub fn get_reason(&self) -> &str {
        &self.reason
    }

    /// Return true if a [`Visual`] is set on this [`Error`].
    pub(crate) fn has_visual(&self) -> bool {
        self.visual.is_some()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("reason", &self.reason)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()?;

        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = format!("{RED}error{RESET}");
        write!(f, "{header}: {}", self.reason)?;

        if self.visual.is_some() && f.alternate() {
            return self.visual.as_ref().unwrap().display(f, self.help.as_deref());
        }

        Ok(())
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.reason == other.reason && self.help == other.help
    }
}
