use super::{Expression, Operator, ParseContext};
use crate::pipeline::{ErrorCode, ExecutionError};

/// $range operator - Generate an arithmetic sequence
///
/// `end` is exclusive and `step` defaults to 1. Argument types are checked
/// when the operator is evaluated.
///
/// Example: `{"$range": [0, "$count", 2]}`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeOp {
    pub start: Expression,
    pub end: Expression,
    pub step: Option<Expression>,
}

pub(super) fn parse_range(
    argument: &serde_json::Value,
    ctx: &mut ParseContext<'_>,
) -> Result<Operator, ExecutionError> {
    let args = argument
        .as_array()
        .filter(|items| matches!(items.len(), 2 | 3))
        .ok_or_else(|| {
            ExecutionError::invalid_expression(
                ErrorCode::RangeNotArray,
                "$range",
                "argument must be an array of 2 or 3 expressions",
            )
        })?;

    let start = ctx.parse_expression(&args[0])?;
    let end = ctx.parse_expression(&args[1])?;
    let step = args
        .get(2)
        .map(|step| ctx.parse_expression(step))
        .transpose()?;

    Ok(Operator::Range(RangeOp { start, end, step }))
}
