//! Rust code generator for request bodies and endpoint methods

mod methods;
mod types;

use std::collections::{BTreeMap, BTreeSet};

use crate::generators::{Generator, GeneratorConfig};
use crate::ir::{
    DefinitionKind, DefinitionRegistry, GeneratedDefinition, MethodGroup, TypeDefinition,
    TypeShape,
};
use crate::naming;
use anyhow::{bail, Result};

/// Output of the Rust generator
#[derive(Debug)]
pub struct RustOutput {
    /// Generated modules indexed by file name
    pub modules: BTreeMap<String, String>,
}

/// Rust code generator
pub struct RustGenerator {
    config: GeneratorConfig,
}

impl RustGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl Generator for RustGenerator {
    type Output = RustOutput;

    fn generate(&self, registry: &DefinitionRegistry) -> Result<Self::Output> {
        let mut modules = BTreeMap::new();
        let mut owners: BTreeMap<String, &str> = BTreeMap::new();

        // One file per definition
        for definition in registry.definitions() {
            let file_name = self.get_module_name(&definition.name);
            if let Some(other) = owners.insert(file_name.clone(), &definition.name) {
                bail!(
                    "definitions '{}' and '{}' both map to {}",
                    other,
                    definition.name,
                    file_name
                );
            }
            modules.insert(file_name, self.generate_module(definition, registry));
        }

        if self.config.generate_mod_rs {
            if modules.contains_key("mod.rs") {
                bail!("a definition maps to mod.rs; disable mod.rs generation");
            }
            modules.insert("mod.rs".to_string(), self.generate_mod_rs(registry));
        }

        Ok(RustOutput { modules })
    }
}

impl RustGenerator {
    /// Convert a definition name to a module file name (snake_case)
    fn get_module_name(&self, name: &str) -> String {
        format!("{}.rs", naming::module_name(name))
    }

    /// Generate a complete module for a single definition
    fn generate_module(
        &self,
        definition: &GeneratedDefinition,
        registry: &DefinitionRegistry,
    ) -> String {
        let mut code = String::new();

        code.push_str("// @generated by apigen. Do not edit.\n\n");

        match &definition.kind {
            DefinitionKind::Type(type_def) => {
                if self.config.generate_docs {
                    code.push_str(&format!("//! {} type definition\n\n", definition.name));
                }
                code.push_str(&self.generate_type_imports(&definition.name, type_def, registry));
                code.push('\n');
                code.push_str(&types::generate_type(&definition.name, type_def, &self.config));
            }
            DefinitionKind::MethodGroup(group) => {
                if self.config.generate_docs {
                    code.push_str(&format!("//! `{}` endpoint methods\n\n", group.endpoint));
                }
                code.push_str(&self.generate_method_imports(group));
                code.push('\n');
                code.push_str(&methods::generate_method_group(group, &self.config));
            }
        }

        code
    }

    /// Generate imports for a type based on its dependencies
    fn generate_type_imports(
        &self,
        name: &str,
        type_def: &TypeDefinition,
        registry: &DefinitionRegistry,
    ) -> String {
        let mut code = String::new();

        let mut runtime = BTreeSet::new();
        match &type_def.shape {
            TypeShape::Struct(_) => {
                if types::uses_json_macro(type_def) {
                    code.push_str("use serde_json::{json, Map, Value};\n");
                } else {
                    code.push_str("use serde_json::{Map, Value};\n");
                }
                runtime.insert(self.config.body_trait.clone());
                if let Some(parent) = &type_def.parent_type {
                    runtime.insert(parent.clone());
                }
            }
            TypeShape::Enum(_) => {
                if let Some(parent) = type_def.parent_type.as_ref().filter(|p| *p != "String") {
                    runtime.insert(parent.clone());
                }
            }
        }
        code.push_str(&self.runtime_import(&runtime));

        // Import each generated dependency from its own module
        for dep in registry.get_dependencies(type_def) {
            if dep != name {
                code.push_str(&format!(
                    "use super::{}::{};\n",
                    naming::module_name(&dep),
                    dep
                ));
            }
        }

        code
    }

    fn generate_method_imports(&self, group: &MethodGroup) -> String {
        let mut code = String::new();

        if methods::uses_document_body(group) {
            code.push_str("use serde_json::Value;\n");
        }

        let mut runtime = BTreeSet::new();
        runtime.insert("HttpMethod".to_string());
        runtime.insert(self.config.receiver_type.clone());
        if methods::uses_typed_body(group) {
            runtime.insert(self.config.body_trait.clone());
        }
        code.push_str(&self.runtime_import(&runtime));

        code
    }

    fn runtime_import(&self, names: &BTreeSet<String>) -> String {
        match names.len() {
            0 => String::new(),
            1 => format!(
                "use {}::{};\n",
                self.config.runtime_path,
                names.iter().next().map(String::as_str).unwrap_or_default()
            ),
            _ => format!(
                "use {}::{{{}}};\n",
                self.config.runtime_path,
                names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
            ),
        }
    }

    fn generate_mod_rs(&self, registry: &DefinitionRegistry) -> String {
        let mut code = String::new();

        code.push_str("// @generated by apigen. Do not edit.\n\n");

        for definition in registry.definitions() {
            code.push_str(&format!("pub mod {};\n", naming::module_name(&definition.name)));
        }

        code.push_str("\n// Re-export all types\n");
        for (name, _) in registry.types() {
            code.push_str(&format!("pub use {}::{};\n", naming::module_name(name), name));
        }

        code
    }
}

/// Render `text` as `///` doc lines, one per input line.
pub(crate) fn doc_lines(indent: &str, text: &str) -> String {
    let mut docs = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            docs.push_str(&format!("{}///\n", indent));
        } else {
            docs.push_str(&format!("{}/// {}\n", indent, line.trim_end()));
        }
    }
    if docs.is_empty() {
        docs.push_str(&format!("{}///\n", indent));
    }
    docs
}

/// Rust string literal for `text`.
pub(crate) fn string_literal(text: &str) -> String {
    format!("{:?}", text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        BodyParam, EnumCase, FieldDef, FieldEncoding, FieldRole, FieldType, MethodDefinition,
        SerializationRule, StructShape, UrlPart,
    };

    fn registry() -> DefinitionRegistry {
        let mut registry = DefinitionRegistry::new();
        registry
            .register(GeneratedDefinition {
                name: "Operator".into(),
                kind: DefinitionKind::Type(TypeDefinition {
                    wire_key: "operator".into(),
                    parent_type: None,
                    shape: TypeShape::Enum(vec![EnumCase {
                        ident: "And".into(),
                        wire_value: "and".into(),
                    }]),
                }),
            })
            .unwrap();
        registry
            .register(GeneratedDefinition {
                name: "MatchQuery".into(),
                kind: DefinitionKind::Type(TypeDefinition {
                    wire_key: "match".into(),
                    parent_type: None,
                    shape: TypeShape::Struct(StructShape {
                        fields: vec![FieldDef {
                            key: "operator".into(),
                            ident: "operator".into(),
                            ty: FieldType::Named("Operator".into()),
                            optional: true,
                            encoding: FieldEncoding::WireValue,
                            role: FieldRole::Child,
                        }],
                        serialization: SerializationRule::Fields { container: None },
                    }),
                }),
            })
            .unwrap();
        registry
            .register(GeneratedDefinition {
                name: "ping".into(),
                kind: DefinitionKind::MethodGroup(MethodGroup {
                    endpoint: "ping".into(),
                    methods: vec![MethodDefinition {
                        ident: "ping".into(),
                        documentation: "Returns whether the cluster is running.".into(),
                        path_params: Vec::new(),
                        url: vec![UrlPart::Literal("/".into())],
                        allowed_methods: vec!["Head".into()],
                        body: BodyParam::None,
                    }],
                }),
            })
            .unwrap();
        registry
    }

    #[test]
    fn one_module_per_definition() {
        let output = RustGenerator::new_default().generate(&registry()).unwrap();
        let files: Vec<_> = output.modules.keys().map(String::as_str).collect();
        assert_eq!(files, vec!["match_query.rs", "operator.rs", "ping.rs"]);
    }

    #[test]
    fn type_modules_import_their_dependencies() {
        let output = RustGenerator::new_default().generate(&registry()).unwrap();
        let code = &output.modules["match_query.rs"];
        assert!(code.contains("use serde_json::{Map, Value};\n"));
        assert!(code.contains("use crate::runtime::QueryItem;\n"));
        assert!(code.contains("use super::operator::Operator;\n"));

        let code = &output.modules["operator.rs"];
        assert!(!code.contains("use "));
    }

    #[test]
    fn method_modules_import_the_runtime() {
        let output = RustGenerator::new_default().generate(&registry()).unwrap();
        let code = &output.modules["ping.rs"];
        assert!(code.contains("use crate::runtime::{HttpMethod, Request};\n"));
        assert!(code.contains("pub fn ping(method: Option<HttpMethod>) -> Self {"));
        assert!(code.contains("let url = String::from(\"/\");"));
    }

    #[test]
    fn mod_rs_is_opt_in() {
        let config = GeneratorConfig {
            generate_mod_rs: true,
            ..GeneratorConfig::default()
        };
        let output = RustGenerator::new(config).generate(&registry()).unwrap();
        let mod_rs = &output.modules["mod.rs"];
        assert!(mod_rs.contains("pub mod match_query;\npub mod operator;\npub mod ping;\n"));
        assert!(mod_rs.contains("pub use operator::Operator;\n"));
        assert!(!mod_rs.contains("pub use ping"));
    }

    #[test]
    fn colliding_file_names_are_rejected() {
        let mut registry = registry();
        registry
            .register(GeneratedDefinition {
                name: "Ping".into(),
                kind: DefinitionKind::Type(TypeDefinition {
                    wire_key: "ping".into(),
                    parent_type: None,
                    shape: TypeShape::Enum(Vec::new()),
                }),
            })
            .unwrap();
        assert!(RustGenerator::new_default().generate(&registry).is_err());
    }

    #[test]
    fn doc_lines_keep_paragraphs() {
        assert_eq!(doc_lines("", "First.\n\nSecond."), "/// First.\n///\n/// Second.\n");
    }
}
