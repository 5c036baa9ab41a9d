use super::{Operator, ParseContext};
use crate::pipeline::ExecutionError;
use crate::value::Value;

/// $literal operator - Return a value without interpreting it
///
/// Example: `{"$literal": "$notAFieldPath"}`
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralOp {
    pub value: Value,
}

pub(super) fn parse_literal(
    argument: &serde_json::Value,
    _ctx: &mut ParseContext<'_>,
) -> Result<Operator, ExecutionError> {
    Ok(Operator::Literal(LiteralOp {
        value: Value::from(argument),
    }))
}
