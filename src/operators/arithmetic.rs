use super::{Expression, Operator, ParseContext};
use crate::pipeline::{ErrorCode, ExecutionError};

/// $add operator - Sum numeric operands
///
/// Example: `{"$add": ["$$x", "$$y"]}`
#[derive(Debug, Clone, PartialEq)]
pub struct AddOp {
    pub operands: Vec<Expression>,
}

/// $multiply operator - Multiply numeric operands
///
/// Example: `{"$multiply": ["$price", 2]}`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplyOp {
    pub operands: Vec<Expression>,
}

/// $subtract operator - Subtract the second operand from the first
///
/// Example: `{"$subtract": ["$end", "$start"]}`
#[derive(Debug, Clone, PartialEq)]
pub struct SubtractOp {
    pub left: Expression,
    pub right: Expression,
}

/// A non-array argument is shorthand for a single operand
fn parse_operands(
    argument: &serde_json::Value,
    ctx: &mut ParseContext<'_>,
) -> Result<Vec<Expression>, ExecutionError> {
    match argument {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| ctx.parse_expression(item))
            .collect(),
        single => Ok(vec![ctx.parse_expression(single)?]),
    }
}

pub(super) fn parse_add(
    argument: &serde_json::Value,
    ctx: &mut ParseContext<'_>,
) -> Result<Operator, ExecutionError> {
    Ok(Operator::Add(AddOp {
        operands: parse_operands(argument, ctx)?,
    }))
}

pub(super) fn parse_multiply(
    argument: &serde_json::Value,
    ctx: &mut ParseContext<'_>,
) -> Result<Operator, ExecutionError> {
    Ok(Operator::Multiply(MultiplyOp {
        operands: parse_operands(argument, ctx)?,
    }))
}

pub(super) fn parse_subtract(
    argument: &serde_json::Value,
    ctx: &mut ParseContext<'_>,
) -> Result<Operator, ExecutionError> {
    let operands = parse_operands(argument, ctx)?;
    let count = operands.len();
    let [left, right]: [Expression; 2] = operands.try_into().map_err(|_| {
        ExecutionError::invalid_expression(
            ErrorCode::WrongArgumentCount,
            "$subtract",
            format!("takes exactly 2 arguments, {} were passed in", count),
        )
    })?;

    Ok(Operator::Subtract(SubtractOp { left, right }))
}
