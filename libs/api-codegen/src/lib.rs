//! REST Client Code Generator
//!
//! This library turns declarative JSON descriptors of a REST API into Rust
//! source code: one method group per endpoint, one type per request-body
//! object or enumeration.
//!
//! ## Architecture
//!
//! The generator uses a three-stage pipeline:
//! 1. **Parser**: Interprets endpoint and body descriptors, resolving parameter references
//! 2. **IR (Intermediate Representation)**: Registry of named, language-agnostic definitions
//! 3. **Generators**: Language-specific code generation from IR
//!
//! Every definition is registered before anything is rendered, so a naming
//! conflict aborts the run without leaving partial output behind.

pub mod error;
pub mod generators;
pub mod ir;
pub mod naming;
pub mod parser;
pub mod utils;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use generators::rust::RustGenerator;
use generators::GeneratorConfig;
use ir::DefinitionRegistry;
use parser::endpoint::SkipList;
use serde_json::{Map, Value};

/// Which kind of descriptor the input directory holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Endpoint descriptors, rendered as request-building methods
    Endpoints,
    /// Request-body descriptors, rendered as types
    Bodies,
}

/// Main entry point for code generation
pub struct CodeGenerator {
    registry: DefinitionRegistry,
}

impl CodeGenerator {
    /// Create a new code generator from endpoint descriptors
    pub fn from_endpoint_documents(
        documents: &Map<String, Value>,
        skip_list: &SkipList,
    ) -> error::Result<Self> {
        let registry = parser::parse_endpoint_documents(documents, skip_list)?;
        Ok(Self { registry })
    }

    /// Create a new code generator from request-body descriptors
    pub fn from_body_documents(documents: &Map<String, Value>) -> error::Result<Self> {
        let registry = parser::parse_body_documents(documents)?;
        Ok(Self { registry })
    }

    /// Get the definition registry
    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    /// Generate code for a specific language
    pub fn generate<G: generators::Generator>(&self, generator: G) -> Result<G::Output> {
        generator.generate(&self.registry)
    }
}

/// Load a descriptor directory and render it without touching the filesystem.
///
/// Returns the generated files indexed by file name.
pub fn render_from_dir(
    mode: Mode,
    input_dir: &Path,
    config: GeneratorConfig,
) -> Result<BTreeMap<String, String>> {
    let documents = utils::load_documents(input_dir)
        .with_context(|| format!("loading descriptors from {}", input_dir.display()))?;

    let codegen = match mode {
        Mode::Endpoints => CodeGenerator::from_endpoint_documents(&documents, &config.skip_list),
        Mode::Bodies => CodeGenerator::from_body_documents(&documents),
    }
    .context("building definition registry")?;

    tracing::info!(
        descriptors = documents.len(),
        definitions = codegen.registry().len(),
        "interpreted descriptors"
    );

    let generator = RustGenerator::new(config);
    let output = codegen
        .generate(generator)
        .context("running Rust generator")?;

    Ok(output.modules)
}

/// Convenience helper to run the Rust code generator over a descriptor directory.
///
/// Returns the number of generated modules.
pub fn generate_from_dir(
    mode: Mode,
    input_dir: &Path,
    output_dir: &Path,
    config: GeneratorConfig,
) -> Result<usize> {
    let modules = render_from_dir(mode, input_dir, config)?;

    utils::write_modules(output_dir, &modules)
        .with_context(|| format!("writing generated files to {}", output_dir.display()))?;

    tracing::info!(files = modules.len(), output = %output_dir.display(), "wrote generated files");

    Ok(modules.len())
}
