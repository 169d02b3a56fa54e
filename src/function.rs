//! Generator functions: serializable specs and the dispatch registry
//!
//! Closures cannot cross process boundaries, so a generator function is
//! expressed as plain data: an opcode name plus JSON parameters
//! ([`FunctionSpec`]). Workers interpret the spec through a
//! [`FunctionRegistry`] of named factories, each producing an evaluator
//! ([`GenFn`]). Custom behavior is added by registering a factory, not by
//! shipping code.

use crate::error::GenSourceError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

/// A value produced by a generator function.
///
/// A small dynamically-typed cell so heterogeneous generators share one
/// reader type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Absent value
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => write!(f, "NULL"),
        }
    }
}

/// A pure, referentially transparent generator: one value per index.
///
/// Implementations must be deterministic; the same index always yields the
/// same value. Evaluation failures propagate immediately and are never
/// retried at this layer.
pub trait GenFn: Send + Sync {
    fn eval(&self, index: u64) -> Result<Value, GenSourceError>;
}

/// Serializable form of a generator function: an opcode plus parameters,
/// interpreted by a [`FunctionRegistry`] on the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default)]
    pub params: JsonValue,
}

impl FunctionSpec {
    /// A spec with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: JsonValue::Null,
        }
    }

    /// A spec with JSON parameters.
    pub fn with_params(name: impl Into<String>, params: JsonValue) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Serialize for transport through the distribution store.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GenSourceError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Inverse of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GenSourceError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

type GenFnFactory =
    Box<dyn Fn(&JsonValue) -> Result<Box<dyn GenFn>, GenSourceError> + Send + Sync>;

/// Registry mapping function opcodes to evaluator factories.
///
/// Both sides of the process boundary must agree on the registered names:
/// the submission side only records the spec, the worker side instantiates
/// it.
pub struct FunctionRegistry {
    factories: HashMap<String, GenFnFactory>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the built-in generators:
    ///
    /// - `identity`: `f(i) = i`
    /// - `square`: `f(i) = i * i`
    /// - `affine`: `f(i) = a * i + b`, params `{"a": .., "b": ..}`
    /// - `modulo`: `f(i) = i % divisor`, params `{"divisor": ..}`
    /// - `constant`: `f(i) = value`, params `{"value": ..}`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("identity", |_| Ok(Box::new(Identity)));
        registry.register("square", |_| Ok(Box::new(Square)));
        registry.register("affine", |params| {
            let params: AffineParams = parse_params("affine", params)?;
            Ok(Box::new(Affine {
                a: params.a,
                b: params.b,
            }))
        });
        registry.register("modulo", |params| {
            let params: ModuloParams = parse_params("modulo", params)?;
            if params.divisor == 0 {
                return Err(GenSourceError::Configuration(
                    "modulo divisor must be non-zero".to_string(),
                ));
            }
            Ok(Box::new(Modulo {
                divisor: params.divisor,
            }))
        });
        registry.register("constant", |params| {
            let params: ConstantParams = parse_params("constant", params)?;
            Ok(Box::new(Constant {
                value: params.value,
            }))
        });
        registry
    }

    /// Register a factory for an opcode, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&JsonValue) -> Result<Box<dyn GenFn>, GenSourceError> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Instantiate an evaluator from a spec, failing with
    /// [`GenSourceError::UnknownFunction`] for an unregistered opcode.
    pub fn instantiate(&self, spec: &FunctionSpec) -> Result<Box<dyn GenFn>, GenSourceError> {
        let factory = self
            .factories
            .get(&spec.name)
            .ok_or_else(|| GenSourceError::UnknownFunction(spec.name.clone()))?;
        factory(&spec.params)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn parse_params<'de, T: Deserialize<'de>>(
    name: &str,
    params: &'de JsonValue,
) -> Result<T, GenSourceError> {
    T::deserialize(params).map_err(|e| {
        GenSourceError::Configuration(format!("invalid params for '{}': {}", name, e))
    })
}

#[derive(Deserialize)]
struct AffineParams {
    a: i64,
    b: i64,
}

#[derive(Deserialize)]
struct ModuloParams {
    divisor: i64,
}

#[derive(Deserialize)]
struct ConstantParams {
    value: Value,
}

struct Identity;

impl GenFn for Identity {
    fn eval(&self, index: u64) -> Result<Value, GenSourceError> {
        as_signed(index)
    }
}

struct Square;

impl GenFn for Square {
    fn eval(&self, index: u64) -> Result<Value, GenSourceError> {
        let i = signed_index(index)?;
        let squared = i.checked_mul(i).ok_or_else(|| GenSourceError::FunctionEvaluation {
            index,
            message: format!("{}^2 overflows i64", i),
        })?;
        Ok(Value::Integer(squared))
    }
}

struct Affine {
    a: i64,
    b: i64,
}

impl GenFn for Affine {
    fn eval(&self, index: u64) -> Result<Value, GenSourceError> {
        let i = signed_index(index)?;
        self.a
            .checked_mul(i)
            .and_then(|scaled| scaled.checked_add(self.b))
            .map(Value::Integer)
            .ok_or_else(|| GenSourceError::FunctionEvaluation {
                index,
                message: format!("{} * {} + {} overflows i64", self.a, i, self.b),
            })
    }
}

struct Modulo {
    divisor: i64,
}

impl GenFn for Modulo {
    fn eval(&self, index: u64) -> Result<Value, GenSourceError> {
        let i = signed_index(index)?;
        Ok(Value::Integer(i % self.divisor))
    }
}

struct Constant {
    value: Value,
}

impl GenFn for Constant {
    fn eval(&self, _index: u64) -> Result<Value, GenSourceError> {
        Ok(self.value.clone())
    }
}

fn signed_index(index: u64) -> Result<i64, GenSourceError> {
    i64::try_from(index).map_err(|_| GenSourceError::FunctionEvaluation {
        index,
        message: "index exceeds i64".to_string(),
    })
}

fn as_signed(index: u64) -> Result<Value, GenSourceError> {
    signed_index(index).map(Value::Integer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_identity_and_square() {
        let registry = FunctionRegistry::with_builtins();

        let identity = registry.instantiate(&FunctionSpec::new("identity")).unwrap();
        assert_eq!(identity.eval(7).unwrap(), Value::Integer(7));

        let square = registry.instantiate(&FunctionSpec::new("square")).unwrap();
        assert_eq!(square.eval(9).unwrap(), Value::Integer(81));
    }

    #[test]
    fn test_builtin_affine() {
        let registry = FunctionRegistry::with_builtins();
        let spec = FunctionSpec::with_params("affine", json!({"a": 3, "b": -1}));
        let affine = registry.instantiate(&spec).unwrap();
        assert_eq!(affine.eval(0).unwrap(), Value::Integer(-1));
        assert_eq!(affine.eval(5).unwrap(), Value::Integer(14));
    }

    #[test]
    fn test_builtin_constant() {
        let registry = FunctionRegistry::with_builtins();
        let spec = FunctionSpec::with_params("constant", json!({"value": {"String": "x"}}));
        let constant = registry.instantiate(&spec).unwrap();
        assert_eq!(constant.eval(0).unwrap(), Value::String("x".to_string()));
        assert_eq!(constant.eval(99).unwrap(), Value::String("x".to_string()));
    }

    #[test]
    fn test_modulo_rejects_zero_divisor() {
        let registry = FunctionRegistry::with_builtins();
        let spec = FunctionSpec::with_params("modulo", json!({"divisor": 0}));
        assert!(matches!(
            registry.instantiate(&spec),
            Err(GenSourceError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::with_builtins();
        let result = registry.instantiate(&FunctionSpec::new("fibonacci"));
        assert!(
            matches!(result, Err(GenSourceError::UnknownFunction(name)) if name == "fibonacci")
        );
    }

    #[test]
    fn test_invalid_params() {
        let registry = FunctionRegistry::with_builtins();
        let spec = FunctionSpec::with_params("affine", json!({"a": "three"}));
        assert!(matches!(
            registry.instantiate(&spec),
            Err(GenSourceError::Configuration(_))
        ));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = FunctionRegistry::new();
        registry.register("double", |_| {
            struct Double;
            impl GenFn for Double {
                fn eval(&self, index: u64) -> Result<Value, GenSourceError> {
                    Ok(Value::Integer(index as i64 * 2))
                }
            }
            Ok(Box::new(Double))
        });
        let double = registry.instantiate(&FunctionSpec::new("double")).unwrap();
        assert_eq!(double.eval(21).unwrap(), Value::Integer(42));
    }

    #[test]
    fn test_square_overflow_is_an_evaluation_failure() {
        let registry = FunctionRegistry::with_builtins();
        let square = registry.instantiate(&FunctionSpec::new("square")).unwrap();
        let err = square.eval(4_000_000_000).unwrap_err();
        assert!(matches!(
            err,
            GenSourceError::FunctionEvaluation { index: 4_000_000_000, .. }
        ));
    }

    #[test]
    fn test_spec_byte_round_trip() {
        let spec = FunctionSpec::with_params("affine", json!({"a": 2, "b": 7}));
        let restored = FunctionSpec::from_bytes(&spec.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, spec);
    }
}
