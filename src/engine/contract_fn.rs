//! Function contracts: argument and return value checks around a callable.

use crate::core::spec::{ValidationSpec, ValidatorInvocation};
use crate::core::types::{Callable, Value};
use crate::engine::engine::ContractEngine;
use std::collections::BTreeMap;

/// Validators for a function's positional arguments and its result.
#[derive(Debug, Clone, Default)]
pub struct FunctionContract {
    arguments: BTreeMap<usize, Vec<ValidatorInvocation>>,
    returns: Option<Vec<ValidatorInvocation>>,
}

impl FunctionContract {
    /// Create an empty contract.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add validators for the argument at `index`.
    pub fn arg<I>(mut self, index: usize, invocations: I) -> Self
    where
        I: IntoIterator<Item = ValidatorInvocation>,
    {
        self.arguments.entry(index).or_default().extend(invocations);
        self
    }

    /// Add validators for the return value.
    pub fn returns<I>(mut self, invocations: I) -> Self
    where
        I: IntoIterator<Item = ValidatorInvocation>,
    {
        self.returns.get_or_insert_with(Vec::new).extend(invocations);
        self
    }

    /// Wrap `func`.
    ///
    /// The wrapper keeps the name and arity of `func`. Each call checks the
    /// arguments in index order (context `invalid argument <i> to <name>`),
    /// then calls `func`, then checks its result (context
    /// `invalid return value from <name>`). The first failure is returned
    /// and `func` does not run if an argument fails.
    pub fn wrap(&self, engine: &ContractEngine, func: Callable) -> Callable {
        let name = func.name().to_string();
        let arity = func.arity();

        let arguments: Vec<(String, ValidationSpec)> = self
            .arguments
            .iter()
            .map(|(index, invocations)| {
                (
                    format!("invalid argument {} to {}", index, name),
                    ValidationSpec::single(index.to_string(), invocations.iter().cloned()),
                )
            })
            .collect();
        let returns = self
            .returns
            .as_ref()
            .map(|invocations| ValidationSpec::single("0", invocations.iter().cloned()));
        let return_context = format!("invalid return value from {}", name);
        let engine = engine.clone();

        Callable::new(name, arity, move |args| {
            let params = Value::Array(args.to_vec());
            for (context, spec) in &arguments {
                engine.check(&params, spec, Some(context.as_str()))?;
            }

            let result = func.call(args)?;

            if let Some(spec) = &returns {
                let wrapped = Value::Array(vec![result.clone()]);
                engine.check(&wrapped, spec, Some(return_context.as_str()))?;
            }
            Ok(result)
        })
    }
}
