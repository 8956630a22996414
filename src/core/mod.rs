//! Core types for the dbc validation system.
//!
//! This module contains the foundational types every other part builds on:
//! - The dynamic value model targets are expressed in
//! - The specification data model
//! - Error types
//! - The call-scoped validation context

pub mod types;
pub mod spec;
pub mod error;
pub mod context;

// Re-export commonly used types
pub use types::{Value, Object, Callable, Kind};
pub use spec::{ValidationSpec, ValidatorInvocation};
pub use error::{DbcError, ContractError, ConfigError, ContractResult, DbcResult};
pub use context::{ValidationContext, ValidationMode};
