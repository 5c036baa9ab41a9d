/// Pipeline execution types
///
/// This module contains the variable scope used during evaluation, the
/// error type shared by compilation and evaluation, and the stages that
/// feed documents through compiled expressions.

mod error;
mod project;
mod scope;
mod stage;

pub use error::{ErrorCode, ExecutionError};
pub use project::{ProjectField, ProjectStage};
pub use scope::Scope;
pub use stage::{Pipeline, Stage};
