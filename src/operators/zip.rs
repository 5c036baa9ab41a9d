use std::collections::BTreeSet;

use super::parse::validate_variable_name;
use super::{Expression, Operator, ParseContext, SYSTEM_VARIABLES};
use crate::pipeline::{ErrorCode, ExecutionError};

const OPERATOR: &str = "$zip";

/// $zip operator - Combine arrays element-wise
///
/// Each name in `as` is bound to the element at the current index of the
/// corresponding `input` array while `in` is evaluated.
///
/// Example:
/// ```json
/// {
///   "$zip": {
///     "input": ["$a", "$b"],
///     "as": ["x", "y"],
///     "in": {"$add": ["$$x", "$$y"]}
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZipOp {
    /// Expressions producing the arrays to zip
    pub inputs: Vec<Expression>,
    /// Variable bound to each input's current element
    pub r#as: Vec<String>,
    /// Expression evaluated once per index
    pub r#in: Expression,
}

pub(super) fn parse_zip(
    argument: &serde_json::Value,
    ctx: &mut ParseContext<'_>,
) -> Result<Operator, ExecutionError> {
    let spec = argument.as_object().ok_or_else(|| {
        ExecutionError::invalid_expression(
            ErrorCode::ZipNotDocument,
            OPERATOR,
            "argument must be an object",
        )
    })?;

    if let Some(unknown) = spec
        .keys()
        .find(|k| !matches!(k.as_str(), "input" | "as" | "in"))
    {
        return Err(ExecutionError::invalid_expression(
            ErrorCode::ZipUnknownField,
            OPERATOR,
            format!("invalid argument '{}'", unknown),
        ));
    }

    let input = spec.get("input").ok_or_else(|| {
        ExecutionError::invalid_expression(
            ErrorCode::ZipMissingInput,
            OPERATOR,
            "missing 'input' parameter",
        )
    })?;
    let names = spec.get("as").ok_or_else(|| {
        ExecutionError::invalid_expression(
            ErrorCode::ZipMissingAs,
            OPERATOR,
            "missing 'as' parameter",
        )
    })?;
    let body = spec.get("in").ok_or_else(|| {
        ExecutionError::invalid_expression(
            ErrorCode::ZipMissingIn,
            OPERATOR,
            "missing 'in' parameter",
        )
    })?;

    let input = input.as_array().ok_or_else(|| {
        ExecutionError::invalid_expression(
            ErrorCode::ZipInputNotArray,
            OPERATOR,
            "'input' must be an array",
        )
    })?;
    let names = names
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| {
            ExecutionError::invalid_expression(
                ErrorCode::ZipAsNotArray,
                OPERATOR,
                "'as' must be an array of variable names",
            )
        })?;

    if names.len() != input.len() {
        return Err(length_mismatch(&names, input.len(), body, ctx));
    }

    for name in &names {
        validate_variable_name(name)?;
    }

    let inputs = input
        .iter()
        .map(|item| ctx.parse_expression(item))
        .collect::<Result<Vec<_>, _>>()?;
    let body = ctx.with_bindings(&names, |ctx| ctx.parse_expression(body))?;

    Ok(Operator::Zip(ZipOp {
        inputs,
        r#as: names,
        r#in: body,
    }))
}

/// Decide which list to blame when `as` and `input` differ in length.
///
/// When `as` names exactly the variables `in` refers to, the bindings agree
/// with the body and `input` is the faulty list; otherwise `as` is.
fn length_mismatch(
    names: &[String],
    input_len: usize,
    body: &serde_json::Value,
    ctx: &ParseContext<'_>,
) -> ExecutionError {
    let declared: BTreeSet<&str> = names.iter().map(String::as_str).collect();

    let mut referenced = BTreeSet::new();
    collect_variables(body, &mut referenced);
    let used: BTreeSet<&str> = referenced
        .iter()
        .map(String::as_str)
        .filter(|name| declared.contains(name) || !ctx.is_bound(name))
        .collect();

    if used == declared {
        ExecutionError::invalid_expression(
            ErrorCode::ZipInputLengthMismatch,
            OPERATOR,
            format!(
                "'input' has {} expressions but 'as' names {} variables",
                input_len,
                names.len()
            ),
        )
    } else {
        ExecutionError::invalid_expression(
            ErrorCode::ZipAsLengthMismatch,
            OPERATOR,
            format!(
                "'as' names {} variables but 'input' has {} expressions",
                names.len(),
                input_len
            ),
        )
    }
}

/// Collect the user variables an unparsed expression refers to, excluding
/// those bound inside it by a nested `$zip`.
fn collect_variables(spec: &serde_json::Value, out: &mut BTreeSet<String>) {
    match spec {
        serde_json::Value::String(s) => {
            if let Some(reference) = s.strip_prefix("$$") {
                let name = reference.split('.').next().unwrap_or_default();
                if !name.is_empty() && !SYSTEM_VARIABLES.contains(&name) {
                    out.insert(name.to_string());
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_variables(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            if map.len() == 1 {
                if map.contains_key("$literal") {
                    return;
                }
                if let Some(serde_json::Value::Object(nested)) = map.get(OPERATOR) {
                    if let Some(input) = nested.get("input") {
                        collect_variables(input, out);
                    }
                    if let Some(body) = nested.get("in") {
                        let bound: Vec<&str> = nested
                            .get("as")
                            .and_then(serde_json::Value::as_array)
                            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
                            .unwrap_or_default();
                        let mut inner = BTreeSet::new();
                        collect_variables(body, &mut inner);
                        out.extend(inner.into_iter().filter(|n| !bound.contains(&n.as_str())));
                    }
                    return;
                }
            }
            for value in map.values() {
                collect_variables(value, out);
            }
        }
        _ => {}
    }
}
