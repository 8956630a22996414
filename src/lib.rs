//! # dbc - Design-by-Contract Validation
//!
//! dbc checks dynamic values against declarative specifications. A spec maps
//! field names to ordered lists of named validators; because validators are
//! referred to by name, specs are plain data and can be loaded from JSON or
//! TOML as easily as built in code.
//!
//! ## Features
//!
//! - **Two modes**: fail-fast [`check`](engine::ContractEngine::check) and
//!   collect-all [`validate`](engine::ContractEngine::validate)
//! - **Nested contracts**: validate a field (or every element of an array
//!   field) against another named contract type
//! - **Function contracts**: wrap a callable so its arguments and result are
//!   checked on every call
//! - **Factories**: create values of a contract type that are checked at
//!   creation time
//! - **Extensible**: register host-defined validators next to the built-ins
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dbc::prelude::*;
//! use serde_json::json;
//!
//! let engine = ContractEngine::new();
//! let spec = ValidationSpec::new()
//!     .field("name", [ValidatorInvocation::type_of("string")])
//!     .field("age", [ValidatorInvocation::type_of("number")]);
//!
//! let target = Value::from(json!({ "name": "John", "age": "22" }));
//!
//! // Collect every violation
//! let failures = engine.validate(&target, &spec)?;
//! assert_eq!(failures, vec!["Expected type of number but was string"]);
//!
//! // Or stop at the first one
//! assert!(engine.check(&target, &spec, Some("invalid person")).is_err());
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Value model, spec data model, errors, validation context
//! - [`validators`]: Validator registry and the built-in catalogue
//! - [`engine`]: Spec engine, function contracts and factories
//! - [`config`]: TOML configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod engine;
pub mod validators;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use dbc::prelude::*;
/// ```
pub mod prelude {
    // Values
    pub use crate::core::types::{Callable, Kind, Object, Value};

    // Specs
    pub use crate::core::spec::{ValidationSpec, ValidatorInvocation};

    // Context
    pub use crate::core::context::{ValidationContext, ValidationMode};

    // Errors
    pub use crate::core::error::{ConfigError, ContractError, ContractResult, DbcError, DbcResult};

    // Engine
    pub use crate::engine::{ContractEngine, ContractFactory, EngineOptions, FunctionContract};

    // Validators
    pub use crate::validators::{Builtin, RegistryBuilder, RegistryEntry, ValidatorRegistry};

    // Configuration
    pub use crate::config::ContractConfig;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
