//! Contract type factories.

use crate::core::error::ContractResult;
use crate::core::spec::ValidationSpec;
use crate::core::types::{Callable, Object, Value};
use crate::engine::engine::ContractEngine;
use std::sync::Arc;

/// Builds values of a contract type, checking each one before returning it.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    name: String,
    spec: Arc<ValidationSpec>,
    engine: ContractEngine,
}

impl ContractFactory {
    pub(crate) fn new(name: String, spec: Arc<ValidationSpec>, engine: ContractEngine) -> Self {
        Self { name, spec, engine }
    }

    /// Type name; also the tag of every created object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type's spec.
    pub fn spec(&self) -> &ValidationSpec {
        &self.spec
    }

    /// Create an instance from `props`.
    ///
    /// Copies the spec's fields present in `props` into a new object tagged
    /// with the type name, then checks it against the spec. Returns the
    /// first violation instead of an instance if the object is invalid.
    pub fn create(&self, props: &Value) -> ContractResult<Value> {
        let mut instance = Object::tagged(self.name.as_str());
        for field in self.spec.field_names() {
            let value = props.get_field(field);
            if !matches!(value, Value::Undefined) {
                instance.insert(field, value.clone());
            }
        }

        let instance = Value::Object(instance);
        self.engine.check(&instance, &self.spec, None)?;
        Ok(instance)
    }

    /// The factory as a one-argument constructor function named after the
    /// type.
    pub fn constructor(&self) -> Callable {
        let factory = self.clone();
        Callable::new(self.name.clone(), 1, move |args| {
            factory.create(args.first().unwrap_or(&Value::Undefined))
        })
    }
}
