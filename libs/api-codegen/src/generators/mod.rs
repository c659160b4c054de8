//! Code generators for different programming languages
//!
//! Each language has its own module that implements the `Generator` trait.

pub mod rust;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result as CodegenResult};
use crate::ir::DefinitionRegistry;
use crate::parser::endpoint::SkipList;
use anyhow::Result;
use serde::Deserialize;

/// Trait that all language generators must implement
pub trait Generator {
    /// The output type of this generator
    type Output;

    /// Generate code from the definition registry
    fn generate(&self, registry: &DefinitionRegistry) -> Result<Self::Output>;
}

/// Configuration options for code generation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Whether to generate documentation comments
    pub generate_docs: bool,
    /// Whether to emit a `mod.rs` declaring every generated module
    pub generate_mod_rs: bool,
    /// Module path the generated code imports its runtime types from
    pub runtime_path: String,
    /// Transport type the endpoint methods are attached to
    pub receiver_type: String,
    /// Trait implemented by every generated body type
    pub body_trait: String,
    /// URL templates excluded from endpoint generation
    pub skip_list: SkipList,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generate_docs: true,
            generate_mod_rs: false,
            runtime_path: "crate::runtime".to_string(),
            receiver_type: "Request".to_string(),
            body_trait: "QueryItem".to_string(),
            skip_list: SkipList::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration file; keys it leaves out keep their defaults.
    pub fn from_json_file(path: &Path) -> CodegenResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| Error::Document {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{ "receiver_type": "Transport", "skip_list": { "segments": [] } }"#,
        )
        .unwrap();
        assert_eq!(config.receiver_type, "Transport");
        assert_eq!(config.body_trait, "QueryItem");
        assert!(config.skip_list.segments.is_empty());
        assert_eq!(config.skip_list.prefixes, SkipList::default().prefixes);
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apigen.json");
        std::fs::write(&path, r#"{ "generate_docs": false, "runtime_path": "client::runtime" }"#)
            .unwrap();

        let config = GeneratorConfig::from_json_file(&path).unwrap();
        assert!(!config.generate_docs);
        assert_eq!(config.runtime_path, "client::runtime");
        assert_eq!(config.receiver_type, "Request");
    }

    #[test]
    fn malformed_config_file_is_a_document_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apigen.json");
        std::fs::write(&path, "{ \"generate_docs\": ").unwrap();

        let err = GeneratorConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::Document { path: ref p, .. } if *p == path));
    }
}
