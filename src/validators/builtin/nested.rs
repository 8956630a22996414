//! Nested spec application: `isDbcType` and `isDbcTypes`.
//!
//! Both run the nested spec through the caller's context, so nested
//! failures land in the same accumulator (collect mode) or unwind the same
//! pass (check mode).

use crate::core::context::ValidationContext;
use crate::core::error::{ContractError, ContractResult};
use crate::core::spec::ValidationSpec;
use crate::core::types::Value;
use std::sync::Arc;

use super::{message_or, Builtin};

/// The nested spec: a contract type defined on the engine, or an inline
/// spec object.
fn resolve_spec(
    validator: Builtin,
    args: &[Value],
    ctx: &ValidationContext<'_>,
) -> ContractResult<Arc<ValidationSpec>> {
    match args.first() {
        Some(Value::String(type_name)) => ctx
            .engine()
            .contract_type(type_name)
            .ok_or_else(|| ContractError::TypeNotFound(type_name.clone())),
        Some(inline @ Value::Object(_)) => ValidationSpec::from_value(inline).map(Arc::new),
        _ => Err(ContractError::invalid_arguments(
            validator.name(),
            "expected a contract type name or an inline spec",
        )),
    }
}

pub(super) fn is_dbc_type(
    value: &Value,
    args: &[Value],
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let spec = resolve_spec(Builtin::IsDbcType, args, ctx)?;
    if !value.is_existing() {
        return Ok(());
    }

    let engine = ctx.engine();
    ctx.nested(engine.max_depth(), |ctx| engine.apply_spec(value, &spec, ctx))
}

pub(super) fn is_dbc_types(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let spec = resolve_spec(Builtin::IsDbcTypes, args, ctx)?;
    if !value.is_existing() {
        return Ok(());
    }
    let Some(items) = value.as_array() else {
        return ctx.report_failure(message_or(message, || "expected a collection".to_string()));
    };

    let engine = ctx.engine();
    ctx.nested(engine.max_depth(), |ctx| {
        items.iter().try_for_each(|item| engine.apply_spec(item, &spec, ctx))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ValidationMode;
    use crate::core::spec::ValidatorInvocation;
    use crate::engine::{ContractEngine, EngineOptions};
    use serde_json::json;

    fn engine_with_address() -> ContractEngine {
        let engine = ContractEngine::new();
        engine.define_type(
            "Address",
            ValidationSpec::new()
                .field(
                    "street",
                    [ValidatorInvocation::required(), ValidatorInvocation::type_of("string")],
                )
                .field("zip", [ValidatorInvocation::type_of("number?")]),
        );
        engine
    }

    fn collect(
        engine: &ContractEngine,
        f: impl FnOnce(&mut ValidationContext<'_>) -> ContractResult<()>,
    ) -> Vec<String> {
        let mut ctx = ValidationContext::new(engine, ValidationMode::Collect);
        f(&mut ctx).unwrap();
        ctx.into_failures()
    }

    #[test]
    fn test_named_type() {
        let engine = engine_with_address();
        let args = [Value::from("Address")];

        let good = Value::from(json!({ "street": "Main St", "zip": 12345 }));
        assert!(collect(&engine, |ctx| is_dbc_type(&good, &args, ctx)).is_empty());

        let bad = Value::from(json!({ "zip": "12345" }));
        assert_eq!(
            collect(&engine, |ctx| is_dbc_type(&bad, &args, ctx)),
            vec![
                "expected a defined value",
                "Expected type of string but was undefined",
                "Expected type of number but was string",
            ]
        );
        assert!(collect(&engine, |ctx| is_dbc_type(&Value::Undefined, &args, ctx)).is_empty());
    }

    #[test]
    fn test_inline_spec() {
        let engine = ContractEngine::new();
        let args = [Value::from(json!({ "id": [{ "validator": "type", "args": ["number"] }] }))];
        assert_eq!(
            collect(&engine, |ctx| is_dbc_type(&Value::from(json!({ "id": "x" })), &args, ctx)),
            vec!["Expected type of number but was string"]
        );
    }

    #[test]
    fn test_unknown_type_is_structural() {
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);
        let result = is_dbc_type(&Value::object(), &[Value::from("Ghost")], &mut ctx);
        assert_eq!(result, Err(ContractError::TypeNotFound("Ghost".to_string())));
    }

    #[test]
    fn test_collection_of_types() {
        let engine = engine_with_address();
        let args = [Value::from("Address")];

        let good = Value::from(json!([{ "street": "a" }, { "street": "b", "zip": 1 }]));
        assert!(collect(&engine, |ctx| is_dbc_types(&good, &args, None, ctx)).is_empty());

        let single = Value::from(json!({ "street": "a" }));
        assert_eq!(
            collect(&engine, |ctx| is_dbc_types(&single, &args, None, ctx)),
            vec!["expected a collection"]
        );

        let mixed = Value::from(json!([{ "street": "a" }, { "street": 7 }]));
        assert_eq!(
            collect(&engine, |ctx| is_dbc_types(&mixed, &args, None, ctx)),
            vec!["Expected type of string but was number"]
        );
    }

    #[test]
    fn test_check_mode_stops_at_first_nested_failure() {
        let engine = engine_with_address();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Check);
        let items = Value::from(json!([{ "street": 1 }, {}]));
        let result = is_dbc_types(&items, &[Value::from("Address")], None, &mut ctx);
        assert_eq!(
            result,
            Err(ContractError::Violation("Expected type of string but was number".to_string()))
        );
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_depth_limit() {
        let options = EngineOptions::default().with_max_depth(1);
        let engine = ContractEngine::new().with_options(options);
        engine.define_type(
            "Node",
            ValidationSpec::single("next", [ValidatorInvocation::dbc_type("Node")]),
        );
        let spec = engine.contract_type("Node").unwrap();

        let shallow = Value::from(json!({ "next": {} }));
        assert!(collect(&engine, |ctx| engine.apply_spec(&shallow, &spec, ctx)).is_empty());

        let deep = Value::from(json!({ "next": { "next": {} } }));
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);
        assert_eq!(
            engine.apply_spec(&deep, &spec, &mut ctx),
            Err(ContractError::DepthExceeded(1))
        );
    }
}
