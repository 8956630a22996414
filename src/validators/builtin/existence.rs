//! Validators with no existence-skip: `required` and `assert`.

use crate::core::context::ValidationContext;
use crate::core::error::ContractResult;
use crate::core::types::Value;

use super::message_or;

pub(super) fn required(
    value: &Value,
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    if value.is_existing() {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || "expected a defined value".to_string()))
}

/// Asserts the first argument, or the value itself when no argument is given.
pub(super) fn assert(
    value: &Value,
    args: &[Value],
    message: Option<&str>,
    ctx: &mut ValidationContext<'_>,
) -> ContractResult<()> {
    let condition = args.first().unwrap_or(value);
    if condition.is_truthy() {
        return Ok(());
    }
    ctx.report_failure(message_or(message, || "assertion failed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ValidationMode;
    use crate::engine::ContractEngine;

    fn collect(f: impl FnOnce(&mut ValidationContext<'_>) -> ContractResult<()>) -> Vec<String> {
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);
        f(&mut ctx).unwrap();
        ctx.into_failures()
    }

    #[test]
    fn test_required() {
        assert!(collect(|ctx| required(&Value::from(0), None, ctx)).is_empty());
        assert_eq!(
            collect(|ctx| required(&Value::Undefined, None, ctx)),
            vec!["expected a defined value"]
        );
        assert_eq!(
            collect(|ctx| required(&Value::Null, Some("name is required"), ctx)),
            vec!["name is required"]
        );
    }

    #[test]
    fn test_assert_uses_argument_when_given() {
        let value = Value::from("present");
        assert_eq!(
            collect(|ctx| assert(&value, &[Value::from(false)], Some("flag must be set"), ctx)),
            vec!["flag must be set"]
        );
        let yes = [Value::from(true)];
        assert!(collect(|ctx| assert(&Value::Undefined, &yes, None, ctx)).is_empty());
    }

    #[test]
    fn test_assert_does_not_skip_absent_values() {
        assert_eq!(
            collect(|ctx| assert(&Value::Undefined, &[], None, ctx)),
            vec!["assertion failed"]
        );
    }
}
