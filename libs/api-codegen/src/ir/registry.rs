use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::{DefinitionKind, GeneratedDefinition, TypeDefinition};
use crate::error::{Error, Result};

/// Conflict-checked store of every definition produced in one generation run.
///
/// A name maps to at most one definition. Registering the same content twice
/// is a no-op; registering different content under a known name fails.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: BTreeMap<String, GeneratedDefinition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition to the registry
    pub fn register(&mut self, definition: GeneratedDefinition) -> Result<()> {
        match self.definitions.entry(definition.name.clone()) {
            Entry::Vacant(slot) => {
                tracing::debug!(name = %definition.name, "registered definition");
                slot.insert(definition);
                Ok(())
            }
            Entry::Occupied(existing) if *existing.get() == definition => {
                tracing::debug!(name = %definition.name, "definition already registered");
                Ok(())
            }
            Entry::Occupied(existing) => Err(Error::NameConflict {
                name: existing.key().clone(),
            }),
        }
    }

    /// Get a definition by name
    pub fn get(&self, name: &str) -> Option<&GeneratedDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over all definitions, ordered by name
    pub fn definitions(&self) -> impl Iterator<Item = &GeneratedDefinition> {
        self.definitions.values()
    }

    /// Get a generated type by name
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        match &self.get(name)?.kind {
            DefinitionKind::Type(type_def) => Some(type_def),
            DefinitionKind::MethodGroup(_) => None,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = (&String, &TypeDefinition)> {
        self.definitions
            .iter()
            .filter_map(|(name, def)| match &def.kind {
                DefinitionKind::Type(type_def) => Some((name, type_def)),
                DefinitionKind::MethodGroup(_) => None,
            })
    }

    /// Names of generated types the given type refers to through its fields.
    pub fn get_dependencies(&self, type_def: &TypeDefinition) -> Vec<String> {
        let mut deps = Vec::new();

        if let super::TypeShape::Struct(shape) = &type_def.shape {
            for field in &shape.fields {
                if let Some(name) = field.ty.referenced_type() {
                    if self.get_type(name).is_some() && !deps.iter().any(|d| d == name) {
                        deps.push(name.to_string());
                    }
                }
            }
        }

        deps
    }
}
