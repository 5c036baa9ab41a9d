use tracing::debug;

use super::{Expression, FieldPath, OperatorRegistry, SYSTEM_VARIABLES, VariableRef};
use crate::pipeline::{ErrorCode, ExecutionError};
use crate::value::Value;

/// Default limit on expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// State carried while compiling an expression
///
/// Tracks the variables introduced by enclosing operators so that a
/// reference to an unbound variable is rejected before any document is
/// evaluated.
#[derive(Debug)]
pub struct ParseContext<'r> {
    registry: &'r OperatorRegistry,
    scopes: Vec<Vec<String>>,
    depth: usize,
    max_depth: usize,
}

impl<'r> ParseContext<'r> {
    pub fn new(registry: &'r OperatorRegistry) -> Self {
        Self {
            registry,
            scopes: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &'r OperatorRegistry {
        self.registry
    }

    /// Whether `name` is bound by an enclosing operator or is a system variable
    pub fn is_bound(&self, name: &str) -> bool {
        SYSTEM_VARIABLES.contains(&name)
            || self
                .scopes
                .iter()
                .rev()
                .any(|scope| scope.iter().any(|bound| bound == name))
    }

    /// Run `f` with `names` bound for the duration of the call
    pub fn with_bindings<T>(
        &mut self,
        names: &[String],
        f: impl FnOnce(&mut Self) -> Result<T, ExecutionError>,
    ) -> Result<T, ExecutionError> {
        self.scopes.push(names.to_vec());
        let result = f(self);
        self.scopes.pop();
        result
    }

    /// Compile one expression
    pub fn parse_expression(
        &mut self,
        spec: &serde_json::Value,
    ) -> Result<Expression, ExecutionError> {
        if self.depth >= self.max_depth {
            return Err(ExecutionError::invalid_expression(
                ErrorCode::ExpressionTooDeep,
                "expression",
                format!("nesting exceeds the maximum depth of {}", self.max_depth),
            ));
        }

        self.depth += 1;
        let result = self.parse_inner(spec);
        self.depth -= 1;
        result
    }

    fn parse_inner(&mut self, spec: &serde_json::Value) -> Result<Expression, ExecutionError> {
        match spec {
            serde_json::Value::String(s) => self.parse_string(s),
            serde_json::Value::Array(items) => {
                let elements = items
                    .iter()
                    .map(|item| self.parse_expression(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expression::Array(elements))
            }
            serde_json::Value::Object(map) => {
                let Some((first, argument)) = map.iter().next() else {
                    return Ok(Expression::Document(Vec::new()));
                };

                if map.keys().any(|k| k.starts_with('$')) {
                    if map.len() > 1 {
                        return Err(ExecutionError::invalid_expression(
                            ErrorCode::OperatorObjectTooManyFields,
                            first.as_str(),
                            "an expression specification must contain exactly one field",
                        ));
                    }
                    return self.parse_operator(first, argument);
                }

                let mut fields = Vec::with_capacity(map.len());
                for (key, value) in map {
                    fields.push((key.clone(), self.parse_expression(value)?));
                }
                Ok(Expression::Document(fields))
            }
            literal => Ok(Expression::Literal(Value::from(literal))),
        }
    }

    fn parse_operator(
        &mut self,
        name: &str,
        argument: &serde_json::Value,
    ) -> Result<Expression, ExecutionError> {
        let descriptor = self.registry.get(name).copied().ok_or_else(|| {
            ExecutionError::invalid_expression(
                ErrorCode::UnrecognizedOperator,
                name,
                "unrecognized expression operator",
            )
        })?;

        debug!(operator = name, depth = self.depth, "compiling operator");
        let operator = (descriptor.parse)(argument, self)?;
        Ok(Expression::Operator(Box::new(operator)))
    }

    fn parse_string(&self, s: &str) -> Result<Expression, ExecutionError> {
        if let Some(reference) = s.strip_prefix("$$") {
            let mut parts = reference.split('.');
            let name = parts.next().unwrap_or_default();
            let path = split_path(parts, s)?;

            if name.is_empty() {
                return Err(ExecutionError::invalid_expression(
                    ErrorCode::VariableNameEmpty,
                    s,
                    "empty variable names are not allowed",
                ));
            }
            if !self.is_bound(name) {
                return Err(ExecutionError::invalid_expression(
                    ErrorCode::UndefinedVariable,
                    s,
                    format!("use of undefined variable: {}", name),
                ));
            }

            return Ok(Expression::Variable(VariableRef {
                name: name.to_string(),
                path,
            }));
        }

        if let Some(path) = s.strip_prefix('$') {
            if path.is_empty() {
                return Err(ExecutionError::invalid_expression(
                    ErrorCode::FieldPathEmpty,
                    s,
                    "'$' by itself is not a valid field path",
                ));
            }
            return Ok(Expression::FieldPath(FieldPath {
                path: split_path(path.split('.'), s)?,
            }));
        }

        Ok(Expression::Literal(Value::String(s.to_string())))
    }
}

fn split_path<'a>(
    parts: impl Iterator<Item = &'a str>,
    original: &str,
) -> Result<Vec<String>, ExecutionError> {
    parts
        .map(|part| {
            if part.is_empty() {
                Err(ExecutionError::invalid_expression(
                    ErrorCode::FieldPathEmptyComponent,
                    original,
                    "field path components may not be empty",
                ))
            } else {
                Ok(part.to_string())
            }
        })
        .collect()
}

/// Check that `name` may be bound by a user expression
///
/// The first character must be a lowercase ASCII letter or non-ASCII; the
/// rest must be ASCII alphanumerics, `_`, or non-ASCII.
pub(crate) fn validate_variable_name(name: &str) -> Result<(), ExecutionError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ExecutionError::invalid_expression(
            ErrorCode::VariableNameEmpty,
            name,
            "empty variable names are not allowed",
        ));
    };

    if !(first.is_ascii_lowercase() || !first.is_ascii()) {
        return Err(ExecutionError::invalid_expression(
            ErrorCode::VariableNameBadStart,
            name,
            "variable names must begin with a lowercase letter or non-ascii character",
        ));
    }

    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || !c.is_ascii())) {
        return Err(ExecutionError::invalid_expression(
            ErrorCode::VariableNameBadChar,
            name,
            format!("variable name contains invalid character '{}'", bad),
        ));
    }

    Ok(())
}
