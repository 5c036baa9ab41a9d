/// Expression tree and operators
///
/// An aggregation expression is compiled once from its JSON specification
/// into an [`Expression`]. Operators are written with a `$` prefix
/// (`{"$zip": {...}}`), field paths with one (`"$a.b"`) and variable
/// references with two (`"$$x"`).

mod arithmetic;
mod literal;
mod parse;
mod range;
mod registry;
mod zip;

pub use arithmetic::{AddOp, MultiplyOp, SubtractOp};
pub use literal::LiteralOp;
pub use parse::{DEFAULT_MAX_DEPTH, ParseContext};
pub use range::RangeOp;
pub use registry::{NullPolicy, OperatorDescriptor, OperatorRegistry, ParseFn};
pub use zip::ZipOp;

use crate::pipeline::ExecutionError;
use crate::value::Value;

/// Variable names that are always bound to the document being evaluated
pub const SYSTEM_VARIABLES: [&str; 2] = ["ROOT", "CURRENT"];

/// A compiled expression
///
/// Expressions are immutable once compiled and can be shared between
/// threads evaluating different documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A constant value
    Literal(Value),
    /// A `$field.path` reference into the current document
    FieldPath(FieldPath),
    /// A `$$name.path` reference to a bound variable
    Variable(VariableRef),
    /// An array whose elements are expressions
    Array(Vec<Expression>),
    /// A document whose field values are expressions
    Document(Vec<(String, Expression)>),
    /// An operator expression
    Operator(Box<Operator>),
}

impl Expression {
    /// Compile an expression with the builtin operators
    pub fn parse(spec: &serde_json::Value) -> Result<Expression, ExecutionError> {
        let registry = OperatorRegistry::default();
        ParseContext::new(&registry).parse_expression(spec)
    }
}

/// Dotted path into the current document, without the leading `$`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub path: Vec<String>,
}

/// Reference to a variable, optionally followed by a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    pub name: String,
    pub path: Vec<String>,
}

/// Operator enum representing all builtin operators
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Add(AddOp),
    Subtract(SubtractOp),
    Multiply(MultiplyOp),
    Literal(LiteralOp),
    Zip(ZipOp),
    Range(RangeOp),
}

impl Operator {
    /// The `$`-prefixed name this operator is registered under
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Add(_) => "$add",
            Operator::Subtract(_) => "$subtract",
            Operator::Multiply(_) => "$multiply",
            Operator::Literal(_) => "$literal",
            Operator::Zip(_) => "$zip",
            Operator::Range(_) => "$range",
        }
    }
}
