//! Engine configuration.
//!
//! Loaded from TOML: engine options plus named contract types, each a
//! spec in the same data form used everywhere else.
//!
//! ```toml
//! [engine]
//! max_depth = 16
//!
//! [types.Person]
//! name = [{ validator = "required" }, { validator = "type", args = ["string"] }]
//! age = [{ validator = "type", args = ["number?"] }]
//! ```

use crate::core::error::ConfigError;
use crate::core::spec::ValidationSpec;
use crate::engine::{ContractEngine, EngineOptions};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Engine options.
    #[serde(default)]
    pub engine: EngineOptions,
    /// Contract types to define, by name.
    #[serde(default)]
    pub types: IndexMap<String, ValidationSpec>,
}

impl ContractConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check_settings()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            error,
        })?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Build an engine with these options and types.
    pub fn build_engine(&self) -> ContractEngine {
        ContractEngine::from_config(self)
    }

    fn check_settings(&self) -> Result<(), ConfigError> {
        if self.engine.max_depth == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "engine.max_depth".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use serde_json::json;
    use std::io::Write;

    const CONFIG: &str = r#"
[engine]
max_depth = 8

[types.Address]
street = [{ validator = "required" }, { validator = "type", args = ["string"] }]

[types.Person]
name = [{ validator = "required", message = "a person needs a name" }]
address = [{ validator = "isDbcType", args = ["Address"] }]
"#;

    #[test]
    fn test_parse() {
        let config = ContractConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.engine.max_depth, 8);
        assert_eq!(config.types.len(), 2);

        let person = &config.types["Person"];
        let name = &person.get("name").unwrap()[0];
        assert_eq!(name.message.as_deref(), Some("a person needs a name"));
        assert_eq!(person.get("address").unwrap()[0].args, vec![Value::from("Address")]);
    }

    #[test]
    fn test_defaults() {
        let config = ContractConfig::from_toml_str("").unwrap();
        assert_eq!(config.engine, EngineOptions::default());
        assert!(config.types.is_empty());
    }

    #[test]
    fn test_rejects_zero_depth() {
        let result = ContractConfig::from_toml_str("[engine]\nmax_depth = 0\n");
        assert!(matches!(result, Err(ConfigError::InvalidSetting { .. })));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(ContractConfig::from_toml_str("[types"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_engine_from_config() {
        let engine = ContractConfig::from_toml_str(CONFIG).unwrap().build_engine();
        assert_eq!(engine.max_depth(), 8);

        let person = engine.factory("Person").unwrap();
        let result = person.create(&Value::from(json!({ "address": { "street": 12 } })));
        assert_eq!(result.unwrap_err().to_string(), "a person needs a name");

        let spec = engine.contract_type("Person").unwrap();
        let failures = engine
            .validate(&Value::from(json!({ "address": {} })), &spec)
            .unwrap();
        assert_eq!(
            failures,
            vec![
                "a person needs a name",
                "expected a defined value",
                "Expected type of string but was undefined",
            ]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = ContractConfig::load(file.path()).unwrap();
        assert!(config.types.contains_key("Address"));

        let missing = ContractConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
