//! A minimal text templating engine.
//!
//! Compile a [`Template`] from source text, then render it against a
//! [`Store`] of data as many times as you like.
//!
//! ```
//! use sprig::{compile, function::serde::json, render, Store};
//!
//! let template = compile(
//!     "{{ movie.title }}: {% each movie.cast %}{{ it }}; {% end %}"
//! )
//! .unwrap();
//!
//! let store = Store::new().with_must(
//!     "movie",
//!     json!({
//!         "title": "Heat",
//!         "cast": ["Pacino", "De Niro"]
//!     }),
//! );
//!
//! assert_eq!(
//!     render(&template, &store).unwrap(),
//!     "Heat: Pacino; De Niro; "
//! );
//! ```
//!
//! # Syntax
//!
//! Expressions print a value from the store, and may walk nested objects
//! with a dotted path:
//!
//! ```html
//! {{ name }}
//! {{ person.address.city }}
//! ```
//!
//! Blocks open with `{%`, name a keyword, and run to a closing `end`
//! block:
//!
//! ```html
//! {% if count > 10 %}big{% else %}small{% end %}
//! {% each items %}{{ it }}{% end %}
//! {% call greet name loud=true %}
//! ```
//!
//! Inside an `each` block the current item is named `it`, and the block
//! body sees nothing else. Names from the enclosing scope are reached by
//! climbing with `..`:
//!
//! ```html
//! {% each people %}{{ it }} works at {{ ..company }}. {% end %}
//! ```
//!
//! Functions are registered on the [`Store`] and invoked with `call`; see
//! the [`function`] module for details.
mod compile;
mod log;
mod pipe;
mod region;
mod render;
mod store;

pub mod function;

pub use compile::{compile, Parser, Scope, Template};
pub use log::Error;
pub use region::Region;
pub use render::{render, Renderer};
pub use store::Store;
