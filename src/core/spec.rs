//! Specification data model.
//!
//! A [`ValidationSpec`] maps field names to ordered lists of
//! [`ValidatorInvocation`]s. Specs are plain data: they can be built in
//! code, decoded from JSON or TOML, or read out of a [`Value`] object.

use crate::core::error::{ContractError, ContractResult};
use crate::core::types::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One validator call: which validator, its positional arguments and an
/// optional message overriding the validator's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorInvocation {
    /// Registry name of the validator.
    pub validator: String,
    /// Positional arguments passed after the checked value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    /// Message reported instead of the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Ordered mapping from field name to validator invocations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationSpec {
    fields: IndexMap<String, Vec<ValidatorInvocation>>,
}

impl ValidatorInvocation {
    /// Invoke a validator with no arguments.
    pub fn new(validator: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            args: Vec::new(),
            message: None,
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Replace the default failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// `required`
    pub fn required() -> Self {
        Self::new("required")
    }

    /// `type` with the given kind name (suffix `?` for optional).
    pub fn type_of(kind: &str) -> Self {
        Self::new("type").arg(kind)
    }

    /// `isDbcType` referring to a named contract type.
    pub fn dbc_type(type_name: &str) -> Self {
        Self::new("isDbcType").arg(type_name)
    }

    /// `isDbcTypes` referring to a named contract type.
    pub fn dbc_types(type_name: &str) -> Self {
        Self::new("isDbcTypes").arg(type_name)
    }

    /// Decode an invocation from a value object.
    pub fn from_value(value: &Value) -> ContractResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            ContractError::InvalidSpec(format!(
                "invocation must be an object, got {}",
                value.type_name()
            ))
        })?;

        let validator = obj
            .get("validator")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ContractError::InvalidSpec("invocation is missing a 'validator' name".to_string())
            })?;

        let args = match obj.get("args") {
            None | Some(Value::Undefined) | Some(Value::Null) => Vec::new(),
            Some(Value::Array(args)) => args.clone(),
            Some(other) => {
                return Err(ContractError::InvalidSpec(format!(
                    "'args' of '{}' must be an array, got {}",
                    validator,
                    other.type_name()
                )))
            }
        };

        let message = match obj.get("message") {
            None | Some(Value::Undefined) | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message.clone()),
            Some(other) => {
                return Err(ContractError::InvalidSpec(format!(
                    "'message' of '{}' must be a string, got {}",
                    validator,
                    other.type_name()
                )))
            }
        };

        Ok(Self {
            validator: validator.to_string(),
            args,
            message,
        })
    }
}

impl ValidationSpec {
    /// Create an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a spec with a single field.
    pub fn single<I>(field: impl Into<String>, invocations: I) -> Self
    where
        I: IntoIterator<Item = ValidatorInvocation>,
    {
        Self::new().field(field, invocations)
    }

    /// Add invocations for a field (appended if the field already exists).
    pub fn field<I>(mut self, field: impl Into<String>, invocations: I) -> Self
    where
        I: IntoIterator<Item = ValidatorInvocation>,
    {
        self.fields.entry(field.into()).or_default().extend(invocations);
        self
    }

    /// Field names in spec order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|s| s.as_str())
    }

    /// Fields and their invocations in spec order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[ValidatorInvocation])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Invocations for one field.
    pub fn get(&self, field: &str) -> Option<&[ValidatorInvocation]> {
        self.fields.get(field).map(|v| v.as_slice())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the spec has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode a spec from JSON text. A literal `null` is a missing spec.
    pub fn from_json(json: &str) -> ContractResult<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ContractError::InvalidSpec(e.to_string()))?;
        Self::from_value(&Value::from(raw))
    }

    /// Decode a spec from a value object.
    ///
    /// Unlike serde decoding this keeps function arguments, so inline specs
    /// can carry `custom` predicates.
    pub fn from_value(value: &Value) -> ContractResult<Self> {
        let obj = match value {
            Value::Undefined | Value::Null => return Err(ContractError::MissingSpec),
            Value::Object(obj) => obj,
            other => {
                return Err(ContractError::InvalidSpec(format!(
                    "spec must be an object, got {}",
                    other.type_name()
                )))
            }
        };

        let mut spec = Self::new();
        for (field, invocations) in &obj.fields {
            let invocations = invocations.as_array().ok_or_else(|| {
                ContractError::InvalidSpec(format!("validators for '{}' must be an array", field))
            })?;
            let decoded = invocations
                .iter()
                .map(ValidatorInvocation::from_value)
                .collect::<ContractResult<Vec<_>>>()?;
            spec = spec.field(field.clone(), decoded);
        }
        Ok(spec)
    }

    /// Encode as JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_order() {
        let spec = ValidationSpec::new()
            .field("name", [ValidatorInvocation::required()])
            .field("age", [ValidatorInvocation::type_of("number")])
            .field("name", [ValidatorInvocation::type_of("string")]);

        assert_eq!(spec.field_names().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(spec.get("name").unwrap().len(), 2);
    }

    #[test]
    fn test_decode_from_json() {
        let spec = ValidationSpec::from_json(
            r#"{
                "name": [{ "validator": "required" }, { "validator": "type", "args": ["string"] }],
                "role": [{
                    "validator": "oneOf",
                    "args": [["admin", "user"]],
                    "message": "bad role"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(spec.len(), 2);
        let role = &spec.get("role").unwrap()[0];
        assert_eq!(role.validator, "oneOf");
        assert_eq!(role.message.as_deref(), Some("bad role"));
        assert_eq!(role.args, vec![Value::from(json!(["admin", "user"]))]);
    }

    #[test]
    fn test_null_spec_is_missing() {
        assert_eq!(ValidationSpec::from_json("null"), Err(ContractError::MissingSpec));
        assert!(matches!(
            ValidationSpec::from_json("[1]"),
            Err(ContractError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_invocation_requires_name() {
        let result = ValidationSpec::from_value(&Value::from(json!({ "a": [{ "args": [] }] })));
        assert!(matches!(result, Err(ContractError::InvalidSpec(_))));
    }

    #[test]
    fn test_serde_round_trip_shape() {
        let spec = ValidationSpec::single("age", [ValidatorInvocation::type_of("number?")]);
        let json = spec.to_json().unwrap();
        let decoded: ValidationSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, spec);
        assert!(json.contains("\"validator\": \"type\""));
    }
}
