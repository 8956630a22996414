//! Call-scoped validation context.
//!
//! Every `check`/`validate` call creates its own context holding the mode
//! and the failure accumulator. It is threaded by `&mut` through every
//! validator and every nested spec application, so no validation state is
//! ever shared between calls.

use crate::core::error::{ContractError, ContractResult};
use crate::engine::ContractEngine;
use serde::{Deserialize, Serialize};

/// How failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Fail on the first violation.
    Check,
    /// Accumulate every violation.
    Collect,
}

/// State of one validation pass.
#[derive(Debug)]
pub struct ValidationContext<'e> {
    engine: &'e ContractEngine,
    mode: ValidationMode,
    failures: Vec<String>,
    depth: usize,
}

impl<'e> ValidationContext<'e> {
    /// Create a context for one pass over `engine`.
    pub fn new(engine: &'e ContractEngine, mode: ValidationMode) -> Self {
        Self {
            engine,
            mode,
            failures: Vec::new(),
            depth: 0,
        }
    }

    /// The engine this pass runs on.
    pub fn engine(&self) -> &'e ContractEngine {
        self.engine
    }

    /// Active mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Current nesting depth (0 at the top-level spec).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Failures recorded so far (always empty in check mode).
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Consume the context, returning the recorded failures.
    pub fn into_failures(self) -> Vec<String> {
        self.failures
    }

    /// Report a violation.
    ///
    /// In check mode this returns the violation as an error, which the
    /// caller propagates with `?` and which unwinds the whole pass. In
    /// collect mode the message is recorded and `Ok(())` is returned.
    pub fn report_failure(&mut self, message: impl Into<String>) -> ContractResult<()> {
        let message = message.into();
        match self.mode {
            ValidationMode::Check => Err(ContractError::Violation(message)),
            ValidationMode::Collect => {
                log::trace!("recorded failure: {}", message);
                self.failures.push(message);
                Ok(())
            }
        }
    }

    /// Run `f` one nesting level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        max_depth: usize,
        f: impl FnOnce(&mut Self) -> ContractResult<T>,
    ) -> ContractResult<T> {
        if self.depth >= max_depth {
            return Err(ContractError::DepthExceeded(max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_mode_raises() {
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Check);

        let result = ctx.report_failure("expected an array");
        assert_eq!(result, Err(ContractError::Violation("expected an array".to_string())));
        assert!(ctx.failures().is_empty());
    }

    #[test]
    fn test_collect_mode_accumulates() {
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);

        assert!(ctx.report_failure("first").is_ok());
        assert!(ctx.report_failure("second").is_ok());
        assert_eq!(ctx.into_failures(), vec!["first", "second"]);
    }

    #[test]
    fn test_nesting_limit() {
        let engine = ContractEngine::new();
        let mut ctx = ValidationContext::new(&engine, ValidationMode::Collect);

        let depth = ctx.nested(2, |ctx| ctx.nested(2, |ctx| Ok(ctx.depth()))).unwrap();
        assert_eq!(depth, 2);
        assert_eq!(ctx.depth(), 0);

        let result = ctx.nested(1, |ctx| ctx.nested(1, |_| Ok(())));
        assert_eq!(result, Err(ContractError::DepthExceeded(1)));
        assert_eq!(ctx.depth(), 0);
    }
}
