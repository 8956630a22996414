//! Validator registry: resolves validator names to implementations.

use crate::core::context::ValidationContext;
use crate::core::error::{ContractError, ContractResult};
use crate::core::types::Value;
use crate::validators::builtin::Builtin;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a validator added through [`RegistryBuilder::register`].
///
/// Receives the checked value, the invocation's arguments and message, and
/// the pass's context, through which failures must be reported.
pub type ValidatorFn = Arc<
    dyn Fn(&Value, &[Value], Option<&str>, &mut ValidationContext<'_>) -> ContractResult<()>
        + Send
        + Sync,
>;

/// Implementation behind a registry name.
#[derive(Clone)]
pub enum ValidatorKind {
    /// One of the built-in catalogue.
    Builtin(Builtin),
    /// A validator registered by the host application.
    Extension(ValidatorFn),
}

/// Registry entry: implementation plus listing metadata.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Name specs refer to.
    pub name: String,
    /// Implementation.
    pub validator: ValidatorKind,
    /// One-line description.
    pub description: String,
}

impl RegistryEntry {
    /// Apply the validator.
    pub fn apply(
        &self,
        value: &Value,
        args: &[Value],
        message: Option<&str>,
        ctx: &mut ValidationContext<'_>,
    ) -> ContractResult<()> {
        match &self.validator {
            ValidatorKind::Builtin(builtin) => builtin.apply(value, args, message, ctx),
            ValidatorKind::Extension(f) => f(value, args, message, ctx),
        }
    }

    /// Whether this entry is part of the built-in catalogue.
    pub fn is_builtin(&self) -> bool {
        matches!(self.validator, ValidatorKind::Builtin(_))
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("builtin", &self.is_builtin())
            .field("description", &self.description)
            .finish()
    }
}

/// Registry of every validator a spec may name.
///
/// Built once (see [`RegistryBuilder`]) and read-only afterwards; engines
/// share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ValidatorRegistry {
    validators: IndexMap<String, RegistryEntry>,
}

impl ValidatorRegistry {
    fn empty() -> Self {
        Self {
            validators: IndexMap::new(),
        }
    }

    /// Create a registry holding the built-in catalogue.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        crate::validators::builtin::register_all(&mut registry);
        registry
    }

    /// Start building a customised registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn register_builtin(&mut self, builtin: Builtin) {
        self.insert(RegistryEntry {
            name: builtin.name().to_string(),
            validator: ValidatorKind::Builtin(builtin),
            description: builtin.description().to_string(),
        });
    }

    fn insert(&mut self, entry: RegistryEntry) {
        if let Some(previous) = self.validators.insert(entry.name.clone(), entry) {
            log::warn!("validator '{}' replaced", previous.name);
        }
    }

    /// Resolve a validator name, failing if it is not registered.
    pub fn resolve(&self, name: &str) -> ContractResult<&RegistryEntry> {
        self.validators
            .get(name)
            .ok_or_else(|| ContractError::ValidatorNotFound(name.to_string()))
    }

    /// Get a registry entry.
    pub fn get_entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.validators.get(name)
    }

    /// Description of a registered validator.
    pub fn describe(&self, name: &str) -> Option<&str> {
        self.validators.get(name).map(|entry| entry.description.as_str())
    }

    /// Check if a validator is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(|s| s.as_str())
    }

    /// All registered entries.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.validators.values()
    }

    /// Search validators by name or description.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.validators
            .values()
            .filter(|entry| {
                entry.name.to_lowercase().contains(&query)
                    || entry.description.to_lowercase().contains(&query)
            })
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Get the total number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Builder for a registry with host-defined validators.
pub struct RegistryBuilder {
    extensions: Vec<RegistryEntry>,
    include_builtins: bool,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
            include_builtins: true,
        }
    }

    /// Include or exclude the built-in catalogue.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Register a validator under `name`. A name already taken by a
    /// built-in replaces it.
    pub fn register<F>(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        validator: F,
    ) -> Self
    where
        F: Fn(&Value, &[Value], Option<&str>, &mut ValidationContext<'_>) -> ContractResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.extensions.push(RegistryEntry {
            name: name.into(),
            validator: ValidatorKind::Extension(Arc::new(validator)),
            description: description.into(),
        });
        self
    }

    /// Build the registry.
    pub fn build(self) -> ValidatorRegistry {
        let mut registry = if self.include_builtins {
            ValidatorRegistry::with_builtins()
        } else {
            ValidatorRegistry::empty()
        };
        for entry in self.extensions {
            registry.insert(entry);
        }
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::ValidationMode;
    use crate::engine::ContractEngine;

    fn is_positive(
        value: &Value,
        _args: &[Value],
        message: Option<&str>,
        ctx: &mut ValidationContext<'_>,
    ) -> ContractResult<()> {
        match value.as_number() {
            Some(n) if n <= 0.0 => {
                ctx.report_failure(message.unwrap_or("expected a positive number"))
            }
            _ => Ok(()),
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ValidatorRegistry::with_builtins();
        assert_eq!(registry.len(), Builtin::ALL.len());
        for name in ["required", "type", "isDbcTypes", "functionArity", "hasFunctions"] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert!(registry.get_entry("type").unwrap().is_builtin());
        assert_eq!(registry.describe("required"), Some(Builtin::Required.description()));
        assert_eq!(registry.describe("isFoo"), None);
    }

    #[test]
    fn test_unknown_name_fails() {
        let registry = ValidatorRegistry::with_builtins();
        assert_eq!(
            registry.resolve("isFoo").unwrap_err(),
            ContractError::ValidatorNotFound("isFoo".to_string())
        );
    }

    #[test]
    fn test_register_extension() {
        let registry = ValidatorRegistry::builder()
            .register("isPositive", "Fails on numbers <= 0", is_positive)
            .build();

        assert!(registry.contains("isPositive"));
        assert!(registry.contains("required"));
        assert!(!registry.get_entry("isPositive").unwrap().is_builtin());

        let engine = ContractEngine::with_registry(registry);
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);
        let entry = engine.registry().resolve("isPositive").unwrap();
        entry.apply(&Value::from(-1), &[], None, &mut ctx).unwrap();
        entry.apply(&Value::from(3), &[], None, &mut ctx).unwrap();
        assert_eq!(ctx.into_failures(), vec!["expected a positive number"]);
    }

    #[test]
    fn test_without_builtins() {
        let registry = RegistryBuilder::new()
            .with_builtins(false)
            .register("isPositive", "Fails on numbers <= 0", is_positive)
            .build();
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("required"));
    }

    #[test]
    fn test_search() {
        let registry = ValidatorRegistry::with_builtins();
        let results = registry.search("array");
        assert!(results.contains(&"isArray"));
        assert!(results.contains(&"isDbcTypes"));
        assert!(registry.search("nonexistent").is_empty());
    }
}
