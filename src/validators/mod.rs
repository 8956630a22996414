//! Validator module.
//!
//! Contains the validator registry and the built-in validator catalogue.

pub mod registry;
pub mod builtin;

pub use registry::{RegistryBuilder, RegistryEntry, ValidatorFn, ValidatorKind, ValidatorRegistry};
pub use builtin::Builtin;
