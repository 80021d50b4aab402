use crate::{compile::Scope, region::Region};
use serde_json::Value;

/// The Abstract Syntax Tree.
#[derive(Debug, Clone)]
pub enum Tree {
    /// Raw text.
    Raw(Region),
    /// Render the value behind a variable.
    Output(Output),
    /// Conditional rendering.
    IfElse(IfElse),
    /// Divider between the branches of an enclosing "if" block.
    ///
    /// Renders nothing. Closing the enclosing block folds it away,
    /// so it survives only when stranded outside of one.
    Else,
    /// Repeated rendering over the items of a value.
    Each(Each),
    /// Invocation of a function from the store.
    Call(Call),
}

/// Represents a call to render the value behind a variable.
#[derive(Debug, Clone)]
pub struct Output {
    /// The variable to resolve and render.
    pub variable: Variable,
    /// Location of the tag.
    pub region: Region,
}

impl From<(Variable, Region)> for Output {
    /// Create an Output from the given (Variable, Region).
    fn from(value: (Variable, Region)) -> Self {
        Self {
            variable: value.0,
            region: value.1,
        }
    }
}

/// Expression types.
///
/// ## Literal
///
/// A literal value is some literal data, such as a string or number.
///
/// ## Variable
///
/// A variable is a dotted path such as "person.name" which indicates
/// the location of the true value within the render context.
#[derive(Debug, Clone, PartialEq)]
pub enum Base {
    /// A value located in the render context.
    Variable(Variable),
    /// A literal value located directly in the template source.
    Literal(Literal),
}

impl Base {
    /// Get a Region from the underlying Base kind.
    pub fn get_region(&self) -> Region {
        match self {
            Base::Variable(variable) => variable.region,
            Base::Literal(literal) => literal.region,
        }
    }
}

/// Dotted path that locates data within the render context.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// True if the path climbs to the enclosing scope before descending.
    pub climbs: bool,
    /// Locations of the path segments, in order.
    ///
    /// Always holds at least one segment, although it may be empty.
    pub path: Vec<Region>,
    /// Location of the whole path, including any climb prefix.
    pub region: Region,
}

/// Literal data that does not need to be evaluated any further.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The value.
    pub value: Value,
    /// Location of the value.
    pub region: Region,
}

/// Conditional rendering block.
#[derive(Debug, Clone)]
pub struct IfElse {
    /// The expression to the left of the comparator.
    pub left: Base,
    /// Location of the comparator symbol, and the expression to the
    /// right of it.
    ///
    /// None when the block tests a single expression for truthiness.
    pub compare: Option<(Region, Base)>,
    /// Subtree rendered when the test passes.
    pub then_branch: Scope,
    /// Subtree rendered when the test fails.
    pub else_branch: Scope,
}

/// Loop rendering block.
#[derive(Debug, Clone)]
pub struct Each {
    /// The expression producing the items to iterate.
    pub it: Base,
    /// Subtree rendered once per item.
    pub body: Scope,
}

/// Invocation of a function from the store.
#[derive(Debug, Clone)]
pub struct Call {
    /// Path of the function within the render context.
    pub name: Variable,
    /// Positional arguments, in source order.
    pub args: Vec<Base>,
    /// Keyword arguments as (name, value) pairs, in source order.
    pub kwargs: Vec<(Region, Base)>,
    /// Location of the tag.
    pub region: Region,
}
