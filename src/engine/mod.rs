//! Specification engine, function contracts and contract type factories.

#[allow(clippy::module_inception)]
pub mod engine;
pub mod contract_fn;
pub mod factory;

pub use engine::{ContractEngine, EngineOptions};
pub use contract_fn::FunctionContract;
pub use factory::ContractFactory;
