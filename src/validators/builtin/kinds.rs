//! Shape validators: kinds, sequences, collections, functions and instances.

use crate::core::context::ValidationContext;
use crate::core::error::{ContractError, ContractResult};
use crate::core::types::{Kind, Value};

use super::{count_arg, message_or, str_arg, Builtin};

pub(super) fn type_of(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let expected = str_arg(Builtin::Type, args, 0, "a kind name")?;
    check_kind(value, expected, message, ctx)
}

/// Core of `type`, shared by the validators that delegate to it.
///
/// `expected` is a kind name, optionally suffixed with `?`. An absent value
/// passes only with the suffix (or when the kind names absence itself).
/// Messages name the kind without the suffix.
pub(super) fn check_kind(
    value: &Value,
    expected: &str,
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let (name, optional) = match expected.strip_suffix('?') {
        Some(name) => (name, true),
        None => (expected, false),
    };
    let kind = Kind::from_name(name).ok_or_else(|| {
        ContractError::invalid_arguments(Builtin::Type.name(), format!("unknown kind '{}'", name))
    })?;

    let matches = if !value.is_existing() {
        optional || value.kind() == kind
    } else {
        match kind {
            Kind::Array => value.is_array(),
            Kind::Number => value.as_number().is_some_and(|n| !n.is_nan()),
            kind => value.kind() == kind,
        }
    };

    if matches {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || {
        format!("Expected type of {} but was {}", name, value.type_name())
    }))
}

pub(super) fn is_array(
    value: &Value,
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    if !value.is_existing() || value.is_array() {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || "expected an array".to_string()))
}

pub(super) fn is_enumerable(
    value: &Value,
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    if !value.is_existing() || value.is_enumerable() {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || {
        "expected an object with a forEach function".to_string()
    }))
}

/// No existence-skip: an absent value has no length and fails.
pub(super) fn is_non_empty_collection(
    value: &Value,
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    if value.length().is_some_and(|len| len > 0.0) {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || "expected collection with length > 0".to_string()))
}

pub(super) fn is_function(
    value: &Value,
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    if !value.is_existing() {
        return Ok(());
    }
    let message = message.unwrap_or("expected a function");
    check_kind(value, Kind::Function.name(), Some(message), ctx)
}

pub(super) fn is_object(
    value: &Value,
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    if !value.is_existing() {
        return Ok(());
    }
    let message = message.unwrap_or("argument is not an object");
    check_kind(value, Kind::Object.name(), Some(message), ctx)
}

/// The tag is a type name, or a function whose name is the type name
/// (such as a factory's constructor).
pub(super) fn is_instance(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let tag = match args.first() {
        Some(Value::String(tag)) => tag.as_str(),
        Some(Value::Function(constructor)) => constructor.name(),
        _ => {
            return Err(ContractError::invalid_arguments(
                Builtin::IsInstance.name(),
                "expected a type name or constructor",
            ))
        }
    };

    if !value.is_existing() || value.is_instance_of(tag) {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || {
        format!("expected {} to be an instance of {}", value, tag)
    }))
}

pub(super) fn function_arity(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let expected = count_arg(Builtin::FunctionArity, args, 0, "a parameter count")?;
    if !value.is_existing() {
        return Ok(());
    }

    let Some(function) = value.as_function() else {
        // A non-function has no arity to compare, so the nested failure is
        // the only one reported, in both modes.
        let message = "cannot check arity of an object that is not a function";
        return is_function(value, Some(message), ctx);
    };
    if function.arity() == expected {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || {
        format!("Function arity is {}. Expected {}", function.arity(), expected)
    }))
}
