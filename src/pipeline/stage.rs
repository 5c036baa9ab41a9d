use tracing::{debug, trace};

use super::{ErrorCode, ExecutionError, ProjectStage};
use crate::executor::Executor;
use crate::operators::ParseContext;
use crate::value::Document;

/// A single compiled pipeline stage
///
/// Example:
/// ```json
/// {"$project": {"_id": 0, "r": {"$range": [0, "$n"]}}}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Project(ProjectStage),
}

impl Stage {
    /// Compile a stage object with exactly one `$name` field
    pub fn parse(spec: &serde_json::Value, ctx: &mut ParseContext<'_>) -> Result<Self, ExecutionError> {
        let (name, argument) = match spec.as_object() {
            Some(obj) if obj.len() == 1 => obj.iter().next().ok_or_else(stage_shape_error)?,
            _ => return Err(stage_shape_error()),
        };

        match name.as_str() {
            "$project" => Ok(Stage::Project(ProjectStage::parse(argument, ctx)?)),
            other => Err(ExecutionError::invalid_expression(
                ErrorCode::UnrecognizedStage,
                other,
                format!("unrecognized pipeline stage name: '{}'", other),
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Project(_) => "$project",
        }
    }

    /// Run the stage over one document
    pub fn apply(&self, executor: &Executor<'_>, document: &Document) -> Result<Document, ExecutionError> {
        match self {
            Stage::Project(project) => project.apply(executor, document),
        }
    }
}

fn stage_shape_error() -> ExecutionError {
    ExecutionError::invalid_expression(
        ErrorCode::StageNotSingleField,
        "pipeline",
        "a pipeline stage specification object must contain exactly one field",
    )
}

/// An ordered list of compiled stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Compile a JSON array of stage objects
    ///
    /// Every stage is validated before any document is seen, so a malformed
    /// pipeline fails here regardless of the data it would run on.
    pub fn parse(spec: &serde_json::Value, ctx: &mut ParseContext<'_>) -> Result<Self, ExecutionError> {
        let stages = spec.as_array().ok_or_else(|| {
            ExecutionError::invalid_expression(
                ErrorCode::PipelineNotArray,
                "pipeline",
                "pipeline must be an array of stage objects",
            )
        })?;

        let stages = stages
            .iter()
            .map(|stage| Stage::parse(stage, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(stages = stages.len(), "compiled pipeline");
        Ok(Self { stages })
    }

    /// Run every stage over every document, in order
    pub fn run(&self, executor: &Executor<'_>, documents: &[Document]) -> Result<Vec<Document>, ExecutionError> {
        let mut output = Vec::with_capacity(documents.len());
        for document in documents {
            let mut current = document.clone();
            for stage in &self.stages {
                trace!(stage = stage.name(), "applying stage");
                current = stage.apply(executor, &current)?;
            }
            output.push(current);
        }
        Ok(output)
    }
}
