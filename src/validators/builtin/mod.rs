//! Built-in validators.
//!
//! The catalogue is a closed set, so it is an enum: names resolve to
//! variants through the registry and each variant dispatches to its
//! implementation. Validators that build on another validator call it
//! directly and pass the context along.

mod existence;
mod kinds;
mod nested;
mod predicates;

use crate::core::context::ValidationContext;
use crate::core::error::{ContractError, ContractResult};
use crate::core::types::Value;
use crate::validators::registry::ValidatorRegistry;

/// The built-in validator catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `required`
    Required,
    /// `type`
    Type,
    /// `isArray`
    IsArray,
    /// `isEnumerable`
    IsEnumerable,
    /// `isNonEmptyCollection`
    IsNonEmptyCollection,
    /// `isFunction`
    IsFunction,
    /// `isObject`
    IsObject,
    /// `isInstance`
    IsInstance,
    /// `functionArity`
    FunctionArity,
    /// `custom`
    Custom,
    /// `assert`
    Assert,
    /// `oneOf`
    OneOf,
    /// `hasFunctions`
    HasFunctions,
    /// `isDbcType`
    IsDbcType,
    /// `isDbcTypes`
    IsDbcTypes,
}

impl Builtin {
    /// Every built-in, in registration order.
    pub const ALL: [Builtin; 15] = [
        Builtin::Required,
        Builtin::Type,
        Builtin::IsArray,
        Builtin::IsEnumerable,
        Builtin::IsNonEmptyCollection,
        Builtin::IsFunction,
        Builtin::IsObject,
        Builtin::IsInstance,
        Builtin::FunctionArity,
        Builtin::Custom,
        Builtin::Assert,
        Builtin::OneOf,
        Builtin::HasFunctions,
        Builtin::IsDbcType,
        Builtin::IsDbcTypes,
    ];

    /// Registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Required => "required",
            Builtin::Type => "type",
            Builtin::IsArray => "isArray",
            Builtin::IsEnumerable => "isEnumerable",
            Builtin::IsNonEmptyCollection => "isNonEmptyCollection",
            Builtin::IsFunction => "isFunction",
            Builtin::IsObject => "isObject",
            Builtin::IsInstance => "isInstance",
            Builtin::FunctionArity => "functionArity",
            Builtin::Custom => "custom",
            Builtin::Assert => "assert",
            Builtin::OneOf => "oneOf",
            Builtin::HasFunctions => "hasFunctions",
            Builtin::IsDbcType => "isDbcType",
            Builtin::IsDbcTypes => "isDbcTypes",
        }
    }

    /// Look up a built-in by registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Builtin::Required => "Fails if the value is absent",
            Builtin::Type => "Checks the value's kind; suffix the kind with '?' to allow absence",
            Builtin::IsArray => "Fails if the value is present and not an array",
            Builtin::IsEnumerable => "Fails if the value is present and cannot be iterated",
            Builtin::IsNonEmptyCollection => "Fails unless the value has a positive length",
            Builtin::IsFunction => "Fails if the value is present and not a function",
            Builtin::IsObject => "Fails if the value is present and not an object",
            Builtin::IsInstance => "Fails if the value is present and not an instance of the type",
            Builtin::FunctionArity => "Fails if the value is a function of another parameter count",
            Builtin::Custom => "Fails if the predicate returns a falsy result",
            Builtin::Assert => "Fails if the condition is falsy",
            Builtin::OneOf => "Fails if the value is present and not one of the allowed values",
            Builtin::HasFunctions => "Fails if any of the named properties is not a function",
            Builtin::IsDbcType => "Validates the value against a contract type",
            Builtin::IsDbcTypes => "Validates every element of an array against a contract type",
        }
    }

    /// Apply this validator to `value`.
    pub fn apply(
        &self,
        value: &Value,
        args: &[Value],
        message: Option<&str>,
        ctx: &mut ValidationContext<'_>,
    ) -> ContractResult<()> {
        match self {
            Builtin::Required => existence::required(value, message, ctx),
            Builtin::Assert => existence::assert(value, args, message, ctx),
            Builtin::Type => kinds::type_of(value, args, message, ctx),
            Builtin::IsArray => kinds::is_array(value, message, ctx),
            Builtin::IsEnumerable => kinds::is_enumerable(value, message, ctx),
            Builtin::IsNonEmptyCollection => kinds::is_non_empty_collection(value, message, ctx),
            Builtin::IsFunction => kinds::is_function(value, message, ctx),
            Builtin::IsObject => kinds::is_object(value, message, ctx),
            Builtin::IsInstance => kinds::is_instance(value, args, message, ctx),
            Builtin::FunctionArity => kinds::function_arity(value, args, message, ctx),
            Builtin::Custom => predicates::custom(value, args, message, ctx),
            Builtin::OneOf => predicates::one_of(value, args, message, ctx),
            Builtin::HasFunctions => predicates::has_functions(value, args, message, ctx),
            Builtin::IsDbcType => nested::is_dbc_type(value, args, ctx),
            Builtin::IsDbcTypes => nested::is_dbc_types(value, args, message, ctx),
        }
    }
}

/// Register all built-in validators.
pub fn register_all(registry: &mut ValidatorRegistry) {
    for builtin in Builtin::ALL {
        registry.register_builtin(builtin);
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

/// Positional argument `index`, or an argument error naming what was expected.
fn arg<'a>(
    validator: Builtin,
    args: &'a [Value],
    index: usize,
    expected: &str,
) -> ContractResult<&'a Value> {
    args.get(index).ok_or_else(|| {
        ContractError::invalid_arguments(validator.name(), format!("missing {}", expected))
    })
}

fn str_arg<'a>(
    validator: Builtin,
    args: &'a [Value],
    index: usize,
    expected: &str,
) -> ContractResult<&'a str> {
    arg(validator, args, index, expected)?
        .as_str()
        .ok_or_else(|| expected_error(validator, expected))
}

fn count_arg(
    validator: Builtin,
    args: &[Value],
    index: usize,
    expected: &str,
) -> ContractResult<usize> {
    match arg(validator, args, index, expected)?.as_number() {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(n as usize),
        _ => Err(expected_error(validator, expected)),
    }
}

fn expected_error(validator: Builtin, expected: &str) -> ContractError {
    ContractError::invalid_arguments(validator.name(), format!("expected {}", expected))
}

/// A list given either as a single array argument or as the arguments themselves.
fn list_arg(args: &[Value]) -> &[Value] {
    match args {
        [Value::Array(items)] => items,
        _ => args,
    }
}

/// The caller's message, or the validator's default.
fn message_or(message: Option<&str>, default: impl FnOnce() -> String) -> String {
    message.map(str::to_string).unwrap_or_else(default)
}
