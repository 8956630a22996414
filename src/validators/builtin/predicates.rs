//! Value predicates: `custom`, `oneOf` and `hasFunctions`.

use crate::core::context::ValidationContext;
use crate::core::error::{ContractError, ContractResult};
use crate::core::types::Value;

use super::kinds::is_function;
use super::{list_arg, message_or, Builtin};

/// Errors returned by the predicate itself propagate unchanged.
pub(super) fn custom(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let Some(predicate) = args.first().and_then(Value::as_function) else {
        return Err(ContractError::invalid_arguments(
            Builtin::Custom.name(),
            "expected a predicate function",
        ));
    };
    if !value.is_existing() {
        return Ok(());
    }

    if predicate.call(std::slice::from_ref(value))?.is_truthy() {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || {
        format!("failed custom function condition for value {}", value)
    }))
}

pub(super) fn one_of(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let allowed = list_arg(args);
    if !value.is_existing() || allowed.iter().any(|candidate| candidate.strict_eq(value)) {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || {
        let choices: Vec<String> = allowed.iter().map(Value::to_string).collect();
        format!("expected one of [{}] but was {}", choices.join(", "), value)
    }))
}

/// Each named property goes through `isFunction`, so a missing property
/// passes and a present non-function fails.
pub(super) fn has_functions(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let names = list_arg(args)
        .iter()
        .map(|name| {
            name.as_str().ok_or_else(|| {
                ContractError::invalid_arguments(
                    Builtin::HasFunctions.name(),
                    "expected property names",
                )
            })
        })
        .collect::<ContractResult<Vec<&str>>>()?;
    if !value.is_existing() {
        return Ok(());
    }

    for name in names {
        let default = format!("expected {} to be a function", name);
        is_function(value.get_field(name), Some(message.unwrap_or(default.as_str())), ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ValidationMode;
    use crate::core::spec::{ValidationSpec, ValidatorInvocation};
    use crate::core::types::Callable;
    use crate::engine::ContractEngine;
    use serde_json::json;

    fn collect(f: impl FnOnce(&mut ValidationContext<'_>) -> ContractResult<()>) -> Vec<String> {
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);
        f(&mut ctx).unwrap();
        ctx.into_failures()
    }

    fn is_even() -> Value {
        Value::from(Callable::predicate("isEven", |v| {
            v.as_number().is_some_and(|n| n % 2.0 == 0.0)
        }))
    }

    #[test]
    fn test_custom_predicate() {
        assert!(collect(|ctx| custom(&Value::from(4), &[is_even()], None, ctx)).is_empty());
        assert!(collect(|ctx| custom(&Value::Undefined, &[is_even()], None, ctx)).is_empty());
        assert_eq!(
            collect(|ctx| custom(&Value::from(3), &[is_even()], None, ctx)),
            vec!["failed custom function condition for value 3"]
        );
    }

    #[test]
    fn test_custom_predicate_errors_propagate() {
        let failing = Value::from(Callable::new("broken", 1, |_| {
            Err(ContractError::Violation("predicate exploded".to_string()))
        }));
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);
        let result = custom(&Value::from(1), &[failing], None, &mut ctx);
        assert_eq!(result, Err(ContractError::Violation("predicate exploded".to_string())));
    }

    #[test]
    fn test_custom_requires_function() {
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);
        let result = custom(&Value::from(1), &[Value::from("nope")], None, &mut ctx);
        assert!(matches!(result, Err(ContractError::InvalidArguments { .. })));
    }

    #[test]
    fn test_one_of() {
        let allowed = [Value::from(json!(["admin", "user"]))];
        assert!(collect(|ctx| one_of(&Value::from("admin"), &allowed, None, ctx)).is_empty());
        assert!(collect(|ctx| one_of(&Value::Undefined, &allowed, None, ctx)).is_empty());
        assert_eq!(
            collect(|ctx| one_of(&Value::from("root"), &allowed, None, ctx)),
            vec!["expected one of [admin, user] but was root"]
        );

        let spread = [Value::from(1), Value::from(2)];
        assert_eq!(collect(|ctx| one_of(&Value::from("1"), &spread, None, ctx)).len(), 1);
    }

    #[test]
    fn test_has_functions() {
        let noop = Value::from(Callable::from_fn("noop", 0, |_| Value::Null));
        let service = Value::from_fields([
            ("start", noop.clone()),
            ("stop", noop),
            ("name", Value::from("svc")),
        ]);

        let names = [Value::from(json!(["start", "stop"]))];
        assert!(collect(|ctx| has_functions(&service, &names, None, ctx)).is_empty());

        let names = [Value::from(json!(["start", "name", "restart"]))];
        assert_eq!(
            collect(|ctx| has_functions(&service, &names, None, ctx)),
            vec!["expected name to be a function"]
        );
        assert!(collect(|ctx| has_functions(&Value::Undefined, &names, None, ctx)).is_empty());
    }

    #[test]
    fn test_has_functions_skips_missing_properties_like_is_function() {
        let engine = ContractEngine::new();
        let target = Value::from(json!({ "svc": { "name": "x" } }));

        let has = ValidationSpec::single(
            "svc",
            [ValidatorInvocation::new("hasFunctions").arg(Value::from(json!(["start"])))],
        );
        assert_eq!(engine.validate(&target, &has), Ok(vec![]));
        assert_eq!(engine.check(&target, &has, None), Ok(()));

        let direct = ValidationSpec::single("start", [ValidatorInvocation::new("isFunction")]);
        assert_eq!(engine.validate(target.get_field("svc"), &direct), Ok(vec![]));

        let named = ValidationSpec::single(
            "svc",
            [ValidatorInvocation::new("hasFunctions")
                .arg("name")
                .with_message("svc needs callables")],
        );
        assert_eq!(
            engine.check(&target, &named, None),
            Err(ContractError::Violation("svc needs callables".to_string()))
        );
    }
}
