//! Specification engine.
//!
//! Walks a spec field by field, resolves each invocation in the registry and
//! applies it to the field's value. The mode and failure accumulator live in
//! a [`ValidationContext`] created per call.

use crate::config::ContractConfig;
use crate::core::context::{ValidationContext, ValidationMode};
use crate::core::error::{ContractError, ContractResult};
use crate::core::spec::ValidationSpec;
use crate::core::types::{Callable, Value};
use crate::engine::contract_fn::FunctionContract;
use crate::engine::factory::ContractFactory;
use crate::validators::registry::ValidatorRegistry;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Maximum nesting of `isDbcType`/`isDbcTypes` applications.
    pub max_depth: usize,
}

impl EngineOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// The specification engine.
///
/// Cheap to clone: clones share the registry and the contract type table.
/// Safe to use from many threads at once and reentrantly (a `custom`
/// predicate may itself call [`ContractEngine::validate`]).
#[derive(Clone)]
pub struct ContractEngine {
    registry: Arc<ValidatorRegistry>,
    types: Arc<RwLock<IndexMap<String, Arc<ValidationSpec>>>>,
    options: EngineOptions,
}

impl ContractEngine {
    /// Create an engine with the built-in validators.
    pub fn new() -> Self {
        Self::with_registry(ValidatorRegistry::with_builtins())
    }

    /// Create an engine over a custom registry.
    pub fn with_registry(registry: ValidatorRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            types: Arc::new(RwLock::new(IndexMap::new())),
            options: EngineOptions::default(),
        }
    }

    /// Create an engine from configuration, defining every configured type.
    pub fn from_config(config: &ContractConfig) -> Self {
        let engine = Self::new().with_options(config.engine);
        for (name, spec) in &config.types {
            engine.define_type(name.clone(), spec.clone());
        }
        engine
    }

    /// Replace the engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// The validator registry.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Nesting limit for nested spec application.
    pub fn max_depth(&self) -> usize {
        self.options.max_depth
    }

    // ========================================================================
    // Contract types
    // ========================================================================

    /// Define (or redefine) a named contract type and return its factory.
    ///
    /// The name becomes usable as the argument of `isDbcType`/`isDbcTypes`
    /// and as an `isInstance` tag for objects the factory creates.
    pub fn define_type(&self, name: impl Into<String>, spec: ValidationSpec) -> ContractFactory {
        let name = name.into();
        let spec = Arc::new(spec);

        let previous = self.types.write().insert(name.clone(), Arc::clone(&spec));
        if previous.is_some() {
            log::warn!("contract type '{}' redefined", name);
        } else {
            log::debug!("defined contract type '{}' with {} field(s)", name, spec.len());
        }

        ContractFactory::new(name, spec, self.clone())
    }

    /// Spec of a named contract type.
    pub fn contract_type(&self, name: &str) -> Option<Arc<ValidationSpec>> {
        self.types.read().get(name).cloned()
    }

    /// Factory for a named contract type.
    pub fn factory(&self, name: &str) -> Option<ContractFactory> {
        self.contract_type(name)
            .map(|spec| ContractFactory::new(name.to_string(), spec, self.clone()))
    }

    /// Names of all defined contract types.
    pub fn type_names(&self) -> Vec<String> {
        self.types.read().keys().cloned().collect()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Fail-fast validation.
    ///
    /// Returns the first violation as [`ContractError::Violation`], prefixed
    /// with `"<context>: "` when a context is given. Later fields and
    /// validators are not evaluated.
    pub fn check(
        &self,
        target: &Value,
        spec: &ValidationSpec,
        context: Option<&str>,
    ) -> ContractResult<()> {
        if !target.is_existing() {
            return Err(ContractError::MissingTarget);
        }
        log::debug!("checking target against {} field(s)", spec.len());

        let mut ctx = ValidationContext::new(self, ValidationMode::Check);
        self.apply_spec(target, spec, &mut ctx).map_err(|error| match context {
            Some(context) => error.with_context(context),
            None => error,
        })
    }

    /// Collect-all validation.
    ///
    /// Returns every violation message in field-then-invocation order; an
    /// empty list means the target is valid. Only structural errors are
    /// returned as `Err`.
    pub fn validate(&self, target: &Value, spec: &ValidationSpec) -> ContractResult<Vec<String>> {
        if !target.is_existing() {
            return Err(ContractError::MissingTarget);
        }

        let mut ctx = ValidationContext::new(self, ValidationMode::Collect);
        self.apply_spec(target, spec, &mut ctx)?;

        let failures = ctx.into_failures();
        log::debug!(
            "validated target against {} field(s): {} failure(s)",
            spec.len(),
            failures.len()
        );
        Ok(failures)
    }

    /// Collect-all validation of many targets in parallel.
    ///
    /// Results are in the order of `targets`.
    pub fn validate_all(
        &self,
        targets: &[Value],
        spec: &ValidationSpec,
    ) -> Vec<ContractResult<Vec<String>>> {
        targets.par_iter().map(|target| self.validate(target, spec)).collect()
    }

    /// Apply `spec` to `target` within an existing pass.
    ///
    /// Fields are visited in spec order and invocations in list order.
    /// Extension validators call this to nest a spec through their own
    /// context.
    pub fn apply_spec(
        &self,
        target: &Value,
        spec: &ValidationSpec,
        ctx: &mut ValidationContext<'_>,
    ) -> ContractResult<()> {
        for (field, invocations) in spec.fields() {
            let value = target.get_field(field);
            for invocation in invocations {
                let entry = self.registry.resolve(&invocation.validator)?;
                log::trace!("{}: applying '{}'", field, entry.name);
                entry.apply(value, &invocation.args, invocation.message.as_deref(), ctx)?;
            }
        }
        Ok(())
    }

    /// Wrap `func` so its arguments and result are checked.
    pub fn wrap(&self, contract: &FunctionContract, func: Callable) -> Callable {
        contract.wrap(self, func)
    }
}

impl Default for ContractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContractEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractEngine")
            .field("validators", &self.registry.len())
            .field("types", &self.type_names())
            .field("options", &self.options)
            .finish()
    }
}
