/// Expression executor and dependencies
///
/// This module contains the evaluation driver: it walks a compiled
/// expression tree for one document at a time.

pub mod traits;

use tracing::{trace, warn};

use crate::config::EngineConfig;
use crate::operators::{
    AddOp, Expression, MultiplyOp, Operator, OperatorRegistry, RangeOp, SubtractOp,
    SYSTEM_VARIABLES, VariableRef, ZipOp,
};
use crate::pipeline::{ErrorCode, ExecutionError, Scope};
use crate::value::{Document, Value};
use traits::FieldLookup;

/// The expression executor
///
/// The executor holds no per-document state. Compiled expressions and the
/// executor itself can be shared across threads evaluating different
/// documents.
#[derive(Debug, Clone, Copy)]
pub struct Executor<'a> {
    /// Registry consulted for each operator's null policy
    pub registry: &'a OperatorRegistry,
    /// Evaluation limits
    pub config: &'a EngineConfig,
}

impl<'a> Executor<'a> {
    /// Create a new executor with dependencies
    pub fn new(registry: &'a OperatorRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Evaluate a compiled expression against one document
    pub fn evaluate(
        &self,
        expression: &Expression,
        document: &Document,
    ) -> Result<Value, ExecutionError> {
        let scope = Scope::root(document);
        let value = self.eval(&scope, expression)?;
        trace!(result = %value, "evaluated expression");
        Ok(value)
    }

    /// Evaluate an expression in a given scope
    ///
    /// This recursively evaluates nested expressions; operators reach
    /// their sub-expressions only through this method.
    pub fn eval(&self, scope: &Scope<'_>, expression: &Expression) -> Result<Value, ExecutionError> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::FieldPath(field) => Ok(scope.document().lookup(&field.path)),
            Expression::Variable(variable) => Ok(Self::eval_variable(scope, variable)),
            Expression::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval(scope, element)?.into_array_element());
                }
                Ok(Value::Array(items))
            }
            Expression::Document(fields) => {
                let mut doc = Document::with_capacity(fields.len());
                for (name, field) in fields {
                    let value = self.eval(scope, field)?;
                    if !value.is_missing() {
                        doc.insert(name.clone(), value);
                    }
                }
                Ok(Value::Document(doc))
            }
            Expression::Operator(operator) => self.eval_operator(scope, operator),
        }
    }

    /// Evaluate a specific operator
    fn eval_operator(&self, scope: &Scope<'_>, operator: &Operator) -> Result<Value, ExecutionError> {
        match operator {
            Operator::Add(op) => self.eval_add(scope, op),
            Operator::Subtract(op) => self.eval_subtract(scope, op),
            Operator::Multiply(op) => self.eval_multiply(scope, op),
            Operator::Literal(op) => Ok(op.value.clone()),
            Operator::Zip(op) => self.eval_zip(scope, op),
            Operator::Range(op) => self.eval_range(scope, op),
        }
    }

    fn eval_variable(scope: &Scope<'_>, variable: &VariableRef) -> Value {
        if SYSTEM_VARIABLES.contains(&variable.name.as_str()) {
            return scope.document().lookup(&variable.path);
        }

        match scope.get(&variable.name) {
            Some(value) => value.lookup(&variable.path),
            None => Value::Missing,
        }
    }

    fn eval_all(&self, scope: &Scope<'_>, expressions: &[Expression]) -> Result<Vec<Value>, ExecutionError> {
        expressions
            .iter()
            .map(|expression| self.eval(scope, expression))
            .collect()
    }

    /// Evaluate $zip operator - build one result per index of the longest input
    fn eval_zip(&self, scope: &Scope<'_>, op: &ZipOp) -> Result<Value, ExecutionError> {
        let values = self.eval_all(scope, &op.inputs)?;
        if let Some(result) = self.registry.null_policy("$zip").short_circuit(&values) {
            return Ok(result);
        }

        let mut arrays = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            match value {
                Value::Array(items) => arrays.push(items),
                other => {
                    let code = if index == 0 {
                        ErrorCode::ZipFirstInputNotArray
                    } else {
                        ErrorCode::ZipLaterInputNotArray
                    };
                    return Err(ExecutionError::type_error_with_types(
                        code,
                        "$zip",
                        format!("input value at position {} is not an array", index),
                        "array",
                        other.type_name(),
                    ));
                }
            }
        }

        let len = arrays.iter().map(|items| items.len()).max().unwrap_or(0);
        let mut output = Vec::with_capacity(len);
        for t in 0..len {
            let mut tuple = scope.child();
            for (name, items) in op.r#as.iter().zip(&arrays) {
                tuple.set_var(name, items.get(t).cloned().unwrap_or(Value::Missing));
            }

            // Arrays cannot hold Missing, so an absent body result is dropped.
            let value = self.eval(&tuple, &op.r#in)?;
            if !value.is_missing() {
                output.push(value);
            }
        }

        Ok(Value::Array(output))
    }

    /// Evaluate $range operator - arithmetic sequence from start (inclusive)
    /// to end (exclusive)
    fn eval_range(&self, scope: &Scope<'_>, op: &RangeOp) -> Result<Value, ExecutionError> {
        let start = self.eval(scope, &op.start)?;
        if !start.is_number() {
            return Err(ExecutionError::type_error_with_types(
                ErrorCode::RangeStartNotNumber,
                "$range",
                "first argument must be a number",
                "number",
                start.type_name(),
            ));
        }

        let end = self.eval(scope, &op.end)?;
        if !end.is_number() {
            return Err(ExecutionError::type_error_with_types(
                ErrorCode::RangeEndNotNumber,
                "$range",
                "second argument must be a number",
                "number",
                end.type_name(),
            ));
        }
        if !end.is_integral() {
            return Err(ExecutionError::type_error(
                ErrorCode::RangeEndNotInteger,
                "$range",
                format!("second argument must be an integer, got {}", end),
            ));
        }

        let step = match &op.step {
            Some(step) => self.eval(scope, step)?,
            None => Value::Int(1),
        };
        if !step.is_number() {
            return Err(ExecutionError::type_error_with_types(
                ErrorCode::RangeStepNotNumber,
                "$range",
                "third argument must be a number",
                "number",
                step.type_name(),
            ));
        }
        if step.as_f64() == Some(0.0) {
            return Err(ExecutionError::type_error(
                ErrorCode::RangeStepZero,
                "$range",
                "step cannot be zero",
            ));
        }

        let mut output = Vec::new();
        match (&start, &step) {
            (Value::Int(start), Value::Int(step)) => {
                let end = match end {
                    Value::Int(end) => end,
                    // Saturates for integral doubles outside the i64 range.
                    other => other.as_f64().unwrap_or_default() as i64,
                };
                let (mut current, step) = (*start, *step);
                while (step > 0 && current < end) || (step < 0 && current > end) {
                    self.check_range_length(output.len())?;
                    output.push(Value::Int(current));
                    match current.checked_add(step) {
                        Some(next) => current = next,
                        None => break,
                    }
                }
            }
            _ => {
                let end = end.as_f64().unwrap_or_default();
                let step = step.as_f64().unwrap_or_default();
                let mut current = start.as_f64().unwrap_or_default();
                while (step > 0.0 && current < end) || (step < 0.0 && current > end) {
                    self.check_range_length(output.len())?;
                    output.push(Value::Double(current));
                    let next = current + step;
                    if next == current {
                        break;
                    }
                    current = next;
                }
            }
        }

        Ok(Value::Array(output))
    }

    fn check_range_length(&self, len: usize) -> Result<(), ExecutionError> {
        match self.config.max_range_length {
            Some(max) if len as u64 >= max => {
                warn!(max, "$range output exceeds the configured limit");
                Err(ExecutionError::limit_exceeded(
                    ErrorCode::RangeTooLong,
                    "$range",
                    format!("output would exceed {} elements", max),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Evaluate $add operator - sum of all operands
    fn eval_add(&self, scope: &Scope<'_>, op: &AddOp) -> Result<Value, ExecutionError> {
        let values = self.eval_all(scope, &op.operands)?;
        if let Some(result) = self.registry.null_policy("$add").short_circuit(&values) {
            return Ok(result);
        }

        let mut total = Value::Int(0);
        for value in &values {
            total = Self::numeric_op(&total, value, "$add", ErrorCode::AddNotNumeric, i64::checked_add, |a, b| a + b)?;
        }
        Ok(total)
    }

    /// Evaluate $multiply operator - product of all operands
    fn eval_multiply(&self, scope: &Scope<'_>, op: &MultiplyOp) -> Result<Value, ExecutionError> {
        let values = self.eval_all(scope, &op.operands)?;
        if let Some(result) = self.registry.null_policy("$multiply").short_circuit(&values) {
            return Ok(result);
        }

        let mut product = Value::Int(1);
        for value in &values {
            product = Self::numeric_op(&product, value, "$multiply", ErrorCode::MultiplyNotNumeric, i64::checked_mul, |a, b| a * b)?;
        }
        Ok(product)
    }

    /// Evaluate $subtract operator - left minus right
    fn eval_subtract(&self, scope: &Scope<'_>, op: &SubtractOp) -> Result<Value, ExecutionError> {
        let values = [self.eval(scope, &op.left)?, self.eval(scope, &op.right)?];
        if let Some(result) = self.registry.null_policy("$subtract").short_circuit(&values) {
            return Ok(result);
        }

        Self::numeric_op(&values[0], &values[1], "$subtract", ErrorCode::SubtractNotNumeric, i64::checked_sub, |a, b| a - b)
    }

    /// Combine two numbers, staying in integers until a double appears or
    /// the integer result overflows
    fn numeric_op(
        left: &Value,
        right: &Value,
        operator: &str,
        code: ErrorCode,
        int_op: fn(i64, i64) -> Option<i64>,
        double_op: fn(f64, f64) -> f64,
    ) -> Result<Value, ExecutionError> {
        if let (Value::Int(a), Value::Int(b)) = (left, right) {
            if let Some(result) = int_op(*a, *b) {
                return Ok(Value::Int(result));
            }
        }

        match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Double(double_op(a, b))),
            _ => {
                let operand = if left.is_number() { right } else { left };
                Err(ExecutionError::type_error_with_types(
                    code,
                    operator,
                    "only numeric operands are supported",
                    "number",
                    operand.type_name(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::ParseContext;
    use serde_json::json;

    fn create_test_executor() -> Executor<'static> {
        let registry = Box::leak(Box::new(OperatorRegistry::default()));
        let config = Box::leak(Box::new(EngineConfig::default()));
        Executor::new(registry, config)
    }

    fn compile(spec: serde_json::Value) -> Expression {
        let registry = OperatorRegistry::default();
        ParseContext::new(&registry).parse_expression(&spec).unwrap()
    }

    fn document(json: serde_json::Value) -> Document {
        match Value::from(json) {
            Value::Document(doc) => doc,
            other => panic!("expected a document, got {:?}", other),
        }
    }

    fn eval(spec: serde_json::Value, doc: serde_json::Value) -> Result<Value, ExecutionError> {
        let executor = create_test_executor();
        executor.evaluate(&compile(spec), &document(doc))
    }

    #[test]
    fn test_eval_literal() {
        assert_eq!(eval(json!(42), json!({})).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_eval_field_path() {
        let result = eval(json!("$user.email"), json!({"user": {"email": "a@b.c"}})).unwrap();
        assert_eq!(result, Value::String("a@b.c".into()));
    }

    #[test]
    fn test_eval_missing_field_is_missing() {
        assert_eq!(eval(json!("$nope"), json!({})).unwrap(), Value::Missing);
    }

    #[test]
    fn test_eval_root_variable() {
        let result = eval(json!("$$ROOT"), json!({"a": 1})).unwrap();
        assert_eq!(result, Value::from(json!({"a": 1})));
        let result = eval(json!("$$CURRENT.a"), json!({"a": 1})).unwrap();
        assert_eq!(result, Value::Int(1));
    }

    #[test]
    fn test_eval_array_literal_turns_missing_into_null() {
        let result = eval(json!(["$a", "$nope"]), json!({"a": 1})).unwrap();
        assert_eq!(result, Value::Array(vec![Value::Int(1), Value::Null]));
    }

    #[test]
    fn test_eval_document_literal_drops_missing() {
        let result = eval(json!({"x": "$a", "y": "$nope"}), json!({"a": 1})).unwrap();
        assert_eq!(result, Value::from(json!({"x": 1})));
    }

    #[test]
    fn test_eval_literal_operator() {
        let result = eval(json!({"$literal": "$a"}), json!({"a": 1})).unwrap();
        assert_eq!(result, Value::String("$a".into()));
    }

    // Arithmetic

    #[test]
    fn test_eval_add() {
        assert_eq!(eval(json!({"$add": [1, 2, 3]}), json!({})).unwrap(), Value::Int(6));
        assert_eq!(
            eval(json!({"$add": [1, 2.5]}), json!({})).unwrap(),
            Value::Double(3.5)
        );
    }

    #[test]
    fn test_eval_add_overflow_promotes_to_double() {
        let result = eval(json!({"$add": [i64::MAX, 1]}), json!({})).unwrap();
        assert!(matches!(result, Value::Double(_)));
    }

    #[test]
    fn test_eval_add_missing_operand_is_missing() {
        let result = eval(json!({"$add": ["$a", 1]}), json!({})).unwrap();
        assert_eq!(result, Value::Missing);
    }

    #[test]
    fn test_eval_add_null_operand_is_null() {
        let result = eval(json!({"$add": ["$a", 1]}), json!({"a": null})).unwrap();
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn test_eval_add_type_error() {
        let err = eval(json!({"$add": ["x", 1]}), json!({})).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AddNotNumeric);
        assert!(!err.is_build_time());
    }

    #[test]
    fn test_eval_subtract_and_multiply() {
        assert_eq!(eval(json!({"$subtract": [10, 4]}), json!({})).unwrap(), Value::Int(6));
        assert_eq!(eval(json!({"$multiply": [2, 3, 4]}), json!({})).unwrap(), Value::Int(24));
        assert_eq!(
            eval(json!({"$multiply": [2, "s"]}), json!({})).unwrap_err().code(),
            ErrorCode::MultiplyNotNumeric
        );
        assert_eq!(
            eval(json!({"$subtract": [true, 1]}), json!({})).unwrap_err().code(),
            ErrorCode::SubtractNotNumeric
        );
    }

    // $zip

    fn add_zip() -> serde_json::Value {
        json!({"$zip": {"input": ["$a", "$b"], "as": ["x", "y"], "in": {"$add": ["$$x", "$$y"]}}})
    }

    #[test]
    fn test_eval_zip_equal_lengths() {
        let result = eval(add_zip(), json!({"a": [1, 2, 3, 4, 5], "b": [1, 2, 3, 4, 5]})).unwrap();
        assert_eq!(result, Value::from(json!([2, 4, 6, 8, 10])));
    }

    #[test]
    fn test_eval_zip_unequal_lengths_truncate_through_add() {
        let result = eval(add_zip(), json!({"a": [1, 2], "b": [1, 2, 3]})).unwrap();
        assert_eq!(result, Value::from(json!([2, 4])));
        let result = eval(add_zip(), json!({"a": [1, 2, 3], "b": [1, 2]})).unwrap();
        assert_eq!(result, Value::from(json!([2, 4])));
    }

    #[test]
    fn test_eval_zip_one_empty_input() {
        assert_eq!(eval(add_zip(), json!({"a": [], "b": [1]})).unwrap(), Value::Array(vec![]));
        assert_eq!(eval(add_zip(), json!({"a": [1], "b": []})).unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn test_eval_zip_nullish_input_is_null() {
        for doc in [
            json!({"a": null, "b": [1, 2]}),
            json!({"a": [1, 2], "b": null}),
            json!({"a": [1, 2]}),
            json!({"b": [1, 2]}),
            json!({}),
            json!({"a": null, "b": null}),
        ] {
            assert_eq!(eval(add_zip(), doc.clone()).unwrap(), Value::Null, "doc {}", doc);
        }
    }

    #[test]
    fn test_eval_zip_body_sees_out_of_range_as_missing() {
        let spec = json!({"$zip": {"input": ["$a", "$b"], "as": ["x", "y"], "in": ["$$x", "$$y"]}});
        let result = eval(spec, json!({"a": [1, 2], "b": [1]})).unwrap();
        assert_eq!(result, Value::from(json!([[1, 1], [2, null]])));
    }

    #[test]
    fn test_eval_zip_identity() {
        let spec = json!({"$zip": {"input": ["$a"], "as": ["x"], "in": "$$x"}});
        let input = json!([1, "two", {"three": 3}, [4], null]);
        let result = eval(spec, json!({ "a": input.clone() })).unwrap();
        assert_eq!(result, Value::from(input));
    }

    #[test]
    fn test_eval_zip_three_inputs() {
        let spec = json!({"$zip": {
            "input": ["$a", "$b", "$c"],
            "as": ["x", "y", "z"],
            "in": {"$add": ["$$x", "$$y", "$$z"]}
        }});
        let result = eval(spec, json!({"a": [1, 2], "b": [10, 20], "c": [100, 200]})).unwrap();
        assert_eq!(result, Value::from(json!([111, 222])));
    }

    #[test]
    fn test_eval_zip_empty_input_list() {
        let spec = json!({"$zip": {"input": [], "as": [], "in": 1}});
        assert_eq!(eval(spec, json!({})).unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn test_eval_zip_first_input_not_array() {
        let spec = json!({"$zip": {"input": ["$_id", "$b"], "as": ["a", "b"], "in": {"$add": ["$$a", "$$b"]}}});
        let err = eval(spec, json!({"_id": 0, "b": [1]})).unwrap_err();
        assert_eq!(err.code().code(), 28909);
    }

    #[test]
    fn test_eval_zip_later_input_not_array() {
        let spec = json!({"$zip": {"input": ["$a", "$_id"], "as": ["a", "b"], "in": {"$add": ["$$a", "$$b"]}}});
        let err = eval(spec, json!({"_id": 0, "a": [1]})).unwrap_err();
        assert_eq!(err.code().code(), 28910);
    }

    #[test]
    fn test_eval_zip_nullish_wins_over_type_error() {
        let spec = json!({"$zip": {"input": ["$_id", "$b"], "as": ["a", "b"], "in": 1}});
        assert_eq!(eval(spec, json!({"_id": 0})).unwrap(), Value::Null);
    }

    #[test]
    fn test_eval_nested_zip_shadows_outer_binding() {
        let spec = json!({"$zip": {
            "input": ["$a"],
            "as": ["x"],
            "in": {"$zip": {"input": ["$b"], "as": ["x"], "in": "$$x"}}
        }});
        let result = eval(spec, json!({"a": [1], "b": [7, 8]})).unwrap();
        assert_eq!(result, Value::from(json!([[7, 8]])));
    }

    #[test]
    fn test_eval_nested_zip_sees_outer_binding() {
        let spec = json!({"$zip": {
            "input": ["$a"],
            "as": ["x"],
            "in": {"$zip": {"input": ["$b"], "as": ["y"], "in": {"$add": ["$$x", "$$y"]}}}
        }});
        let result = eval(spec, json!({"a": [10, 20], "b": [1, 2]})).unwrap();
        assert_eq!(result, Value::from(json!([[11, 12], [21, 22]])));
    }

    #[test]
    fn test_eval_zip_variable_path() {
        let spec = json!({"$zip": {"input": ["$items"], "as": ["item"], "in": "$$item.price"}});
        let result = eval(spec, json!({"items": [{"price": 3}, {"price": 4}]})).unwrap();
        assert_eq!(result, Value::from(json!([3, 4])));
    }

    // $range

    #[test]
    fn test_eval_range_default_step() {
        let result = eval(json!({"$range": ["$a", "$b"]}), json!({"a": 0, "b": 5})).unwrap();
        assert_eq!(result, Value::from(json!([0, 1, 2, 3, 4])));
    }

    #[test]
    fn test_eval_range_integer_step() {
        let result = eval(json!({"$range": [0, 10, 2]}), json!({})).unwrap();
        assert_eq!(result, Value::from(json!([0, 2, 4, 6, 8])));
        assert!(matches!(result.as_array().unwrap()[1], Value::Int(2)));
    }

    #[test]
    fn test_eval_range_fractional_step_accumulates() {
        let result = eval(json!({"$range": ["$a", 10, "$c"]}), json!({"a": 1, "c": 2.2})).unwrap();
        let items = result.as_array().unwrap();
        let bits: Vec<u64> = items.iter().map(|v| v.as_f64().unwrap().to_bits()).collect();
        let mut expected = Vec::new();
        let mut current = 1.0_f64;
        while current < 10.0 {
            expected.push(current.to_bits());
            current += 2.2;
        }
        assert_eq!(bits, expected);
        assert_eq!(items[3].to_string(), "7.6000000000000005");
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_eval_range_negative_step() {
        let result = eval(json!({"$range": [5, 0, -2]}), json!({})).unwrap();
        assert_eq!(result, Value::from(json!([5, 3, 1])));
    }

    #[test]
    fn test_eval_range_direction_mismatch_is_empty() {
        assert_eq!(eval(json!({"$range": [0, 5, -1]}), json!({})).unwrap(), Value::Array(vec![]));
        assert_eq!(eval(json!({"$range": [5, 0]}), json!({})).unwrap(), Value::Array(vec![]));
    }

    #[test]
    fn test_eval_range_fractional_start() {
        let result = eval(json!({"$range": [0.5, 3]}), json!({})).unwrap();
        assert_eq!(result, Value::from(json!([0.5, 1.5, 2.5])));
    }

    #[test]
    fn test_eval_range_type_errors() {
        let code = |spec: serde_json::Value| eval(spec, json!({})).unwrap_err().code().code();
        assert_eq!(code(json!({"$range": ["a", 1]})), 29050);
        assert_eq!(code(json!({"$range": [0, "a"]})), 29051);
        assert_eq!(code(json!({"$range": [0, 1.1]})), 29052);
        assert_eq!(code(json!({"$range": [0, 10, "a"]})), 29053);
        assert_eq!(code(json!({"$range": [0, 10, 0]})), 29054);
        assert_eq!(code(json!({"$range": [0, 10, 0.0]})), 29054);
    }

    #[test]
    fn test_eval_range_nullish_arguments_are_errors() {
        let err = eval(json!({"$range": ["$nope", 3]}), json!({})).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RangeStartNotNumber);
        let err = eval(json!({"$range": [0, null]}), json!({})).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RangeEndNotNumber);
    }

    #[test]
    fn test_eval_range_limit() {
        let registry = OperatorRegistry::default();
        let config = EngineConfig {
            max_range_length: Some(3),
            ..EngineConfig::default()
        };
        let executor = Executor::new(&registry, &config);
        let doc = Document::new();

        let ok = executor.evaluate(&compile(json!({"$range": [0, 3]})), &doc).unwrap();
        assert_eq!(ok, Value::from(json!([0, 1, 2])));

        let err = executor
            .evaluate(&compile(json!({"$range": [0, 4]})), &doc)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::RangeTooLong);
    }

    #[test]
    fn test_eval_range_inside_zip() {
        let spec = json!({"$zip": {
            "input": [{"$range": [0, 3]}, "$a"],
            "as": ["i", "v"],
            "in": {"$multiply": ["$$i", "$$v"]}
        }});
        let result = eval(spec, json!({"a": [5, 5, 5]})).unwrap();
        assert_eq!(result, Value::from(json!([0, 5, 10])));
    }

    #[test]
    fn test_runtime_error_does_not_affect_next_document() {
        let executor = create_test_executor();
        let expr = compile(add_zip());
        assert!(executor.evaluate(&expr, &document(json!({"a": 1, "b": [1]}))).is_err());
        let ok = executor
            .evaluate(&expr, &document(json!({"a": [1], "b": [1]})))
            .unwrap();
        assert_eq!(ok, Value::from(json!([2])));
    }
}
