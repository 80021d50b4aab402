mod lex;
mod parse;
mod syntax;
mod template;

pub use crate::compile::{
    parse::{scope::Scope, tree, Parser},
    template::Template,
};

use crate::log::Error;

/// Compile a [`Template`] from the given text.
///
/// The returned `Template` may be rendered against a `Store` any number
/// of times.
///
/// # Examples
///
/// ```
/// use sprig::compile;
///
/// let template = compile("{{ name }}");
/// assert!(template.is_ok())
/// ```
///
/// # Errors
///
/// Returns an [`Error`] when the text contains a malformed or
/// unbalanced block tag.
pub fn compile<'source>(text: &'source str) -> Result<Template<'source>, Error> {
    Parser::new(text).compile()
}
