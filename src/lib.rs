/// aggexpr - Aggregation expression evaluation
///
/// This library compiles aggregation expressions such as `$zip` and
/// `$range` from JSON once, validating their shape eagerly, and evaluates
/// the compiled tree against any number of documents.

pub mod config;
pub mod executor;
pub mod operators;
pub mod pipeline;
pub mod value;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use executor::Executor;
pub use operators::{Expression, Operator, OperatorRegistry, ParseContext};
pub use pipeline::{ErrorCode, ExecutionError, Pipeline, ProjectStage, Scope, Stage};
pub use value::{Document, Value};

/// Compile an expression with the builtin operators and default limits
pub fn compile(spec: &serde_json::Value) -> Result<Expression, ExecutionError> {
    Expression::parse(spec)
}

/// Compile and evaluate an expression against one document
///
/// # Example
/// ```
/// use aggexpr::{Document, Value};
/// use serde_json::json;
///
/// let mut doc = Document::new();
/// doc.insert("a".to_string(), Value::from(json!([1, 2])));
/// doc.insert("b".to_string(), Value::from(json!([10, 20])));
///
/// let spec = json!({"$zip": {"input": ["$a", "$b"], "as": ["x", "y"], "in": {"$add": ["$$x", "$$y"]}}});
/// let result = aggexpr::evaluate(&spec, &doc).unwrap();
/// assert_eq!(result, Value::from(json!([11, 22])));
/// ```
pub fn evaluate(spec: &serde_json::Value, document: &Document) -> Result<Value, ExecutionError> {
    let expression = compile(spec)?;
    let registry = OperatorRegistry::default();
    let config = EngineConfig::default();
    Executor::new(&registry, &config).evaluate(&expression, document)
}
