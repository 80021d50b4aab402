use crate::log::{Error, INCOMPATIBLE_TYPES};

use serde_json::Value;

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Comparators recognized by the Renderer.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Comparator {
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// <
    Lesser,
    /// >
    Greater,
    /// <=
    LesserOrEqual,
    /// >=
    GreaterOrEqual,
    /// in
    In,
}

impl Comparator {
    /// Return the [`Comparator`] matching the given symbol, if any.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let comparator = match symbol {
            "==" => Comparator::Equal,
            "!=" => Comparator::NotEqual,
            "<" => Comparator::Lesser,
            ">" => Comparator::Greater,
            "<=" => Comparator::LesserOrEqual,
            ">=" => Comparator::GreaterOrEqual,
            "in" => Comparator::In,
            _ => return None,
        };

        Some(comparator)
    }
}

impl Display for Comparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Comparator::Equal => write!(f, "=="),
            Comparator::NotEqual => write!(f, "!="),
            Comparator::Lesser => write!(f, "<"),
            Comparator::Greater => write!(f, ">"),
            Comparator::LesserOrEqual => write!(f, "<="),
            Comparator::GreaterOrEqual => write!(f, ">="),
            Comparator::In => write!(f, "in"),
        }
    }
}

/// Return true if the given [`Value`] is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(boolean) => *boolean,
        Value::Number(number) => number.as_f64().unwrap() != 0.0f64,
        Value::String(text) => !text.is_empty(),
        Value::Array(array) => !array.is_empty(),
        Value::Object(object) => !object.is_empty(),
        Value::Null => false,
    }
}

/// Compare the two [`Value`] instances with the given [`Comparator`].
///
/// # Errors
///
/// Returns an [`Error`] if the `Comparator` cannot be applied to the types.
pub fn compare_values(left: &Value, comparator: Comparator, right: &Value) -> Result<bool, Error> {
    let result = match comparator {
        Comparator::Equal => equal_values(left, right),
        Comparator::NotEqual => !equal_values(left, right),
        Comparator::In => return contains_value(left, right),
        Comparator::Greater
        | Comparator::Lesser
        | Comparator::GreaterOrEqual
        | Comparator::LesserOrEqual => {
            let ordering = match order_values(left, right) {
                Some(ordering) => ordering,
                None => {
                    return Err(Error::build(INCOMPATIBLE_TYPES).with_help(format!(
                        "comparator `{comparator}` cannot compare `{left}` and `{right}`"
                    )))
                }
            };

            match comparator {
                Comparator::Greater => ordering.is_gt(),
                Comparator::Lesser => ordering.is_lt(),
                Comparator::GreaterOrEqual => ordering.is_ge(),
                Comparator::LesserOrEqual => ordering.is_le(),
                _ => unreachable!(),
            }
        }
    };

    Ok(result)
}

/// Return true if the two [`Value`] instances are equal.
///
/// Numbers are compared by numeric value, so an integer and a float
/// holding the same quantity are equal.
fn equal_values(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            left.as_f64().unwrap() == right.as_f64().unwrap()
        }
        _ => left == right,
    }
}

/// Decide the relative order of the two [`Value`] instances.
///
/// Numbers, strings and booleans order naturally against their own kind,
/// while arrays and objects order by length. Returns `None` for every
/// other pairing.
fn order_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            left.as_f64().unwrap().partial_cmp(&right.as_f64().unwrap())
        }
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        (Value::Bool(left), Value::Bool(right)) => Some(left.cmp(right)),
        (Value::Array(left), Value::Array(right)) => Some(left.len().cmp(&right.len())),
        (Value::Object(left), Value::Object(right)) => Some(left.len().cmp(&right.len())),
        _ => None,
    }
}

/// Return true if the right [`Value`] contains the left one.
///
/// Arrays contain their elements, objects contain their keys, and
/// strings contain their substrings.
///
/// # Errors
///
/// Returns an [`Error`] when the right value is not a container, or a
/// string is searched for something other than a string.
fn contains_value(left: &Value, right: &Value) -> Result<bool, Error> {
    let result = match right {
        Value::Array(array) => array.iter().any(|item| equal_values(left, item)),
        Value::Object(object) => match left {
            Value::String(key) => object.contains_key(key),
            _ => false,
        },
        Value::String(text) => match left {
            Value::String(item) => text.contains(item.as_str()),
            _ => {
                return Err(Error::build(INCOMPATIBLE_TYPES)
                    .with_help(format!("`{left}` cannot be searched for in a string")))
            }
        },
        _ => {
            return Err(Error::build(INCOMPATIBLE_TYPES)
                .with_help(format!("type `{right}` cannot be searched with `in`")))
        }
    };

    Ok(result)
}
