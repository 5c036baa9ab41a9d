use std::collections::HashMap;

use super::{Operator, ParseContext, arithmetic, literal, range, zip};
use crate::pipeline::ExecutionError;
use crate::value::Value;

/// Parses an operator's argument into its typed form, validating its shape
pub type ParseFn =
    fn(&serde_json::Value, &mut ParseContext<'_>) -> Result<Operator, ExecutionError>;

/// How an operator treats Missing and Null arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// A Missing argument makes the result Missing; otherwise a Null
    /// argument makes it Null.
    Propagate,
    /// Any Missing or Null argument makes the result Null.
    NullIfAnyNullish,
    /// Arguments are type-checked as they are; nothing propagates.
    Strict,
}

impl NullPolicy {
    /// The result to return without running the operator, if any
    pub fn short_circuit(self, args: &[Value]) -> Option<Value> {
        match self {
            NullPolicy::Propagate => {
                if args.iter().any(Value::is_missing) {
                    Some(Value::Missing)
                } else if args.iter().any(|v| matches!(v, Value::Null)) {
                    Some(Value::Null)
                } else {
                    None
                }
            }
            NullPolicy::NullIfAnyNullish => {
                args.iter().any(Value::is_nullish).then_some(Value::Null)
            }
            NullPolicy::Strict => None,
        }
    }
}

/// Registry entry for one operator
#[derive(Debug, Clone, Copy)]
pub struct OperatorDescriptor {
    pub name: &'static str,
    pub null_policy: NullPolicy,
    pub parse: ParseFn,
}

/// Maps `$`-prefixed operator names to their parser and null policy
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    operators: HashMap<&'static str, OperatorDescriptor>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
            .with(OperatorDescriptor {
                name: "$add",
                null_policy: NullPolicy::Propagate,
                parse: arithmetic::parse_add,
            })
            .with(OperatorDescriptor {
                name: "$subtract",
                null_policy: NullPolicy::Propagate,
                parse: arithmetic::parse_subtract,
            })
            .with(OperatorDescriptor {
                name: "$multiply",
                null_policy: NullPolicy::Propagate,
                parse: arithmetic::parse_multiply,
            })
            .with(OperatorDescriptor {
                name: "$literal",
                null_policy: NullPolicy::Strict,
                parse: literal::parse_literal,
            })
            .with(OperatorDescriptor {
                name: "$zip",
                null_policy: NullPolicy::NullIfAnyNullish,
                parse: zip::parse_zip,
            })
            .with(OperatorDescriptor {
                name: "$range",
                null_policy: NullPolicy::Strict,
                parse: range::parse_range,
            })
    }
}

impl OperatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Register an operator, replacing any previous entry with the same name
    pub fn with(mut self, descriptor: OperatorDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn register(&mut self, descriptor: OperatorDescriptor) {
        self.operators.insert(descriptor.name, descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&OperatorDescriptor> {
        self.operators.get(name)
    }

    /// Null policy of a registered operator; unregistered names are strict
    pub fn null_policy(&self, name: &str) -> NullPolicy {
        self.get(name)
            .map(|d| d.null_policy)
            .unwrap_or(NullPolicy::Strict)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_builtins() {
        let registry = OperatorRegistry::default();
        for name in ["$add", "$subtract", "$multiply", "$literal", "$zip", "$range"] {
            assert!(registry.contains(name), "{} not registered", name);
        }
        assert!(!registry.contains("$map"));
    }

    #[test]
    fn test_policies() {
        let registry = OperatorRegistry::default();
        assert_eq!(registry.null_policy("$zip"), NullPolicy::NullIfAnyNullish);
        assert_eq!(registry.null_policy("$range"), NullPolicy::Strict);
        assert_eq!(registry.null_policy("$add"), NullPolicy::Propagate);
        assert_eq!(registry.null_policy("$unknown"), NullPolicy::Strict);
    }

    #[test]
    fn test_propagate_prefers_missing() {
        let args = [Value::Null, Value::Missing, Value::Int(1)];
        assert_eq!(NullPolicy::Propagate.short_circuit(&args), Some(Value::Missing));
        let args = [Value::Null, Value::Int(1)];
        assert_eq!(NullPolicy::Propagate.short_circuit(&args), Some(Value::Null));
        let args = [Value::Int(2), Value::Int(1)];
        assert_eq!(NullPolicy::Propagate.short_circuit(&args), None);
    }

    #[test]
    fn test_null_if_any_nullish() {
        let args = [Value::Array(vec![]), Value::Missing];
        assert_eq!(
            NullPolicy::NullIfAnyNullish.short_circuit(&args),
            Some(Value::Null)
        );
        let args = [Value::Array(vec![]), Value::Array(vec![])];
        assert_eq!(NullPolicy::NullIfAnyNullish.short_circuit(&args), None);
    }

    #[test]
    fn test_strict_never_short_circuits() {
        let args = [Value::Missing, Value::Null];
        assert_eq!(NullPolicy::Strict.short_circuit(&args), None);
    }
}
