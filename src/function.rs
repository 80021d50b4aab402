//! Contains the `Function` trait and other types useful for creating and calling
//! functions.
//!
//! A function is any type which implements the [`Function`][`crate::function::Function`]
//! trait. You can assign a function to a [`Store`][`crate::Store`] with the
//! [`insert_function`][`crate::Store::insert_function()`] method, and it will be
//! available to any [`Template`][`crate::Template`] rendered with that store.
//!
//! Given this block:
//!
//! ```html
//! {% call shout name punctuation="!" %}
//! ```
//!
//! The word after `call` names the function. Upon rendering this block, the
//! [`Store`][`crate::Store`] is searched for a function named "shout".
//!
//! The "name" word is not valid JSON, and so it is perceived to be a path and
//! not a literal. It is resolved against the store and passed to the function
//! as a positional argument.
//!
//! The "punctuation" argument contains a `=`, which makes it a keyword
//! argument. The value side of a keyword argument is resolved the same way
//! positional arguments are.
//!
//! # Examples
//!
//! You can either create a struct and implement the trait on that, or just
//! create a function matching the trait signature. Both are accepted.
//!
//! Here we use a function:
//!
//! ```rust
//! use sprig::{
//!     function::{
//!         serde::{json, Value},
//!         Error,
//!     },
//!     compile, render, Store,
//! };
//! use std::collections::HashMap;
//!
//! fn shout(args: &[Value], _: &HashMap<String, Value>) -> Result<Value, Error> {
//!     match args.first() {
//!         Some(Value::String(text)) => Ok(json!(text.to_uppercase())),
//!         _ => Err(Error::build("function `shout` requires string input")
//!             .with_help("pass a string as the first argument")),
//!     }
//! }
//!
//! let template = compile("{% call shout name %}").unwrap();
//! let store = Store::new()
//!     .with_must("name", "taylor")
//!     .with_function("shout", shout);
//!
//! assert_eq!(render(&template, &store).unwrap(), "TAYLOR");
//! ```
//!
//! If you return an [`Error`][`crate::function::Error`] from your function without
//! using the [`with_visual`][`crate::function::Error::with_visual`] method to set
//! your own visualization, one is generated for you that points to the function
//! name.
//!
//! If the store held a number instead of a string and the error was printed
//! with `{:#}`, you would see:
//!
//! ```text
//! error: function `shout` requires string input
//!   --> 1:9
//!    |
//!  1 | {% call shout name %}
//!    |         ^^^^^
//!    |
//!   = help: pass a string as the first argument
//! ```
//!
//! If you don't want the visualization to be shown, print the error with `{}`
//! instead:
//!
//! ```text
//! error: function `shout` requires string input
//! ```

pub mod serde {
    //! Contains types from `serde_json`.
    pub use serde_json::*;
}
pub mod visual {
    //! Contains the `Visual` trait and different types which implement `Visual`.
    pub use crate::log::{Pointer, Visual};
}

pub use crate::{log::Error, region::Region};

use serde_json::Value;
use std::collections::HashMap;

/// Describes a type that can be called from a template to produce a [`Value`].
pub trait Function: Sync + Send {
    /// Call the [`Function`] with the given positional and keyword arguments,
    /// and return a new `Value`.
    ///
    /// # Errors
    ///
    /// May return an [`Error`] to abort template rendering.
    fn call(&self, args: &[Value], kwargs: &HashMap<String, Value>) -> Result<Value, Error>;
}

/// Allows any function with a matching signature to be registered as a [`Function`].
impl<F> Function for F
where
    F: Fn(&[Value], &HashMap<String, Value>) -> Result<Value, Error> + Sync + Send,
{
    fn call(&self, args: &[Value], kwargs: &HashMap<String, Value>) -> Result<Value, Error> {
        self(args, kwargs)
    }
}
