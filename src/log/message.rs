use super::Error;
use std::fmt::Display;

pub const UNEXPECTED_BLOCK: &str = "unexpected block";
pub const UNBALANCED_BLOCK: &str = "unbalanced block";
pub const INVALID_SYNTAX: &str = "invalid syntax";
pub const UNRESOLVED_NAME: &str = "unresolved name";
pub const NOT_CALLABLE: &str = "not callable";
pub const NOT_ITERABLE: &str = "not iterable";
pub const INCOMPATIBLE_TYPES: &str = "incompatible types";

/// Return an [`Error`] explaining that the write operation failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::build("write failure")
        .with_help("failed to write result of render, are you low on memory?")
}

/// Return a string describing an unexpected block keyword.
pub fn expected_keyword<T>(received: T) -> String
where
    T: Display,
{
    format!(
        "expected keyword like `each`, `if`, `else`, `call`, found `{}`",
        received
    )
}

/// Return a string describing an unexpected comparator.
pub fn expected_comparator<T>(received: T) -> String
where
    T: Display,
{
    format!(
        "expected comparator like `==`, `!=`, `<`, `>`, `<=`, `>=`, `in`, found `{}`",
        received
    )
}
