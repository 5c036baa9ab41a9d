use tracing::debug;

use super::{ErrorCode, ExecutionError};
use crate::executor::Executor;
use crate::operators::{Expression, ParseContext};
use crate::value::{Document, Value};

/// How one output field of a `$project` stage is produced
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    /// Copy the field from the input document
    Include,
    /// Drop the field
    Exclude,
    /// Evaluate an expression for the field
    Compute(Expression),
}

/// A compiled `$project` stage
///
/// Example:
/// ```json
/// {
///   "_id": 0,
///   "name": 1,
///   "sums": {"$zip": {"input": ["$a", "$b"], "as": ["x", "y"], "in": {"$add": ["$$x", "$$y"]}}}
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStage {
    fields: Vec<(Vec<String>, ProjectField)>,
    exclusion: bool,
}

impl ProjectStage {
    /// Compile a `$project` specification
    pub fn parse(spec: &serde_json::Value, ctx: &mut ParseContext<'_>) -> Result<Self, ExecutionError> {
        let obj = spec.as_object().ok_or_else(|| {
            ExecutionError::invalid_expression(
                ErrorCode::ProjectNotDocument,
                "$project",
                "specification must be an object",
            )
        })?;
        if obj.is_empty() {
            return Err(ExecutionError::invalid_expression(
                ErrorCode::ProjectEmpty,
                "$project",
                "specification must have at least one field",
            ));
        }

        let mut fields = Vec::with_capacity(obj.len());
        for (name, field) in obj {
            let path: Vec<String> = name.split('.').map(str::to_string).collect();
            let field = match field {
                serde_json::Value::Bool(include) => flag(*include),
                serde_json::Value::Number(n) => flag(n.as_f64() != Some(0.0)),
                other => ProjectField::Compute(ctx.parse_expression(other)?),
            };
            fields.push((path, field));
        }

        let inclusion = fields
            .iter()
            .any(|(_, field)| !matches!(field, ProjectField::Exclude));
        if inclusion {
            if let Some((path, _)) = fields
                .iter()
                .find(|(path, field)| !is_id(path) && matches!(field, ProjectField::Exclude))
            {
                return Err(ExecutionError::invalid_expression(
                    ErrorCode::ProjectMixedExclusion,
                    "$project",
                    format!(
                        "cannot exclude field '{}' in an inclusion projection",
                        path.join(".")
                    ),
                ));
            }
        }

        debug!(fields = fields.len(), exclusion = !inclusion, "compiled $project stage");
        Ok(Self {
            fields,
            exclusion: !inclusion,
        })
    }

    /// Whether this stage removes fields rather than selecting them
    pub fn is_exclusion(&self) -> bool {
        self.exclusion
    }

    /// Apply the stage to one document
    pub fn apply(&self, executor: &Executor<'_>, document: &Document) -> Result<Document, ExecutionError> {
        if self.exclusion {
            let mut output = document.clone();
            for (path, _) in &self.fields {
                remove_path(&mut output, path);
            }
            return Ok(output);
        }

        let mut output = Document::new();
        let id_excluded = self
            .fields
            .iter()
            .any(|(path, field)| is_id(path) && matches!(field, ProjectField::Exclude));
        if !id_excluded {
            if let Some(id) = document.get("_id") {
                output.insert("_id".to_string(), id.clone());
            }
        }

        for (path, field) in &self.fields {
            match field {
                ProjectField::Include => include_path(&mut output, document, path),
                ProjectField::Compute(expression) => {
                    let value = executor.evaluate(expression, document)?;
                    if !value.is_missing() {
                        set_path(&mut output, path, value);
                    }
                }
                ProjectField::Exclude => {}
            }
        }

        Ok(output)
    }
}

fn flag(include: bool) -> ProjectField {
    if include {
        ProjectField::Include
    } else {
        ProjectField::Exclude
    }
}

fn is_id(path: &[String]) -> bool {
    path.len() == 1 && path[0] == "_id"
}

/// Copy a dotted path from `source` into `output`, keeping the shape of
/// any arrays it passes through
fn include_path(output: &mut Document, source: &Document, path: &[String]) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    let Some(projected) = source.get(first).and_then(|value| project_value(value, rest)) else {
        return;
    };

    match output.get_mut(first) {
        Some(existing) => merge(existing, projected),
        None => {
            output.insert(first.clone(), projected);
        }
    }
}

/// The part of `value` selected by `path`, or None when nothing is selected
///
/// Documents inside arrays are kept even when they lack the field, so
/// sibling inclusions line up element by element. Scalars inside arrays are
/// dropped.
fn project_value(value: &Value, path: &[String]) -> Option<Value> {
    let Some((first, rest)) = path.split_first() else {
        return Some(value.clone());
    };

    match value {
        Value::Document(doc) => {
            let inner = project_value(doc.get(first)?, rest)?;
            let mut projected = Document::new();
            projected.insert(first.clone(), inner);
            Some(Value::Document(projected))
        }
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Document(_) => Some(
                        project_value(item, path)
                            .unwrap_or_else(|| Value::Document(Document::new())),
                    ),
                    Value::Array(_) => project_value(item, path),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    }
}

/// Fold a second projection of the same source into an earlier one
fn merge(target: &mut Value, projected: Value) {
    match (target, projected) {
        (Value::Document(target), Value::Document(projected)) => {
            for (name, value) in projected {
                match target.get_mut(&name) {
                    Some(existing) => merge(existing, value),
                    None => {
                        target.insert(name, value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(projected)) if target.len() == projected.len() => {
            for (existing, value) in target.iter_mut().zip(projected) {
                merge(existing, value);
            }
        }
        (target, projected) => *target = projected,
    }
}

/// Write `value` at a dotted path, creating intermediate documents
fn set_path(doc: &mut Document, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = doc;
    for part in parents {
        let entry = current
            .entry(part.clone())
            .or_insert_with(|| Value::Document(Document::new()));
        if !matches!(entry, Value::Document(_)) {
            *entry = Value::Document(Document::new());
        }
        current = match entry {
            Value::Document(inner) => inner,
            _ => return,
        };
    }
    current.insert(last.clone(), value);
}

fn remove_path(doc: &mut Document, path: &[String]) {
    match path {
        [] => {}
        [last] => {
            doc.shift_remove(last);
        }
        [first, rest @ ..] => {
            if let Some(Value::Document(inner)) = doc.get_mut(first) {
                remove_path(inner, rest);
            }
        }
    }
}
