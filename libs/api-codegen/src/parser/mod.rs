//! Parsers for endpoint and request-body descriptors
//!
//! Walks the merged top-level document namespace and builds a
//! [`DefinitionRegistry`] holding every generated definition. The first error
//! aborts the whole run: later descriptors may depend on names registered by
//! earlier ones, so a partial registry is never returned.

pub mod access;
pub mod body;
pub mod endpoint;
pub mod scope;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::ir::{DefinitionKind, DefinitionRegistry, GeneratedDefinition, MethodGroup};
use body::BodySchemaInterpreter;
use endpoint::SkipList;
use scope::ParameterScope;

/// Interpret every endpoint descriptor; the top-level key is the endpoint name.
pub fn parse_endpoint_documents(
    documents: &Map<String, Value>,
    skip_list: &SkipList,
) -> Result<DefinitionRegistry> {
    let mut registry = DefinitionRegistry::new();

    for (name, value) in documents {
        let descriptor = endpoint::parse_endpoint(name, value)?;
        let methods = endpoint::interpret(&descriptor, skip_list);

        if methods.is_empty() {
            tracing::info!(
                endpoint = %name,
                "no URL template left after skip-list, nothing generated"
            );
            continue;
        }

        tracing::debug!(endpoint = %name, methods = methods.len(), "generated methods");
        registry.register(GeneratedDefinition {
            name: name.clone(),
            kind: DefinitionKind::MethodGroup(MethodGroup {
                endpoint: name.clone(),
                methods,
            }),
        })?;
    }

    Ok(registry)
}

/// Interpret every request-body descriptor; the top-level key is not used.
pub fn parse_body_documents(documents: &Map<String, Value>) -> Result<DefinitionRegistry> {
    let mut registry = DefinitionRegistry::new();
    let root = ParameterScope::root();

    for value in documents.values() {
        BodySchemaInterpreter::new(&mut registry).interpret(value, &root)?;
    }

    Ok(registry)
}
