//! Type generation for Rust structs and enums

use crate::generators::GeneratorConfig;
use crate::ir::{
    EnumCase, FieldDef, FieldEncoding, FieldRole, FieldType, SerializationRule, StructShape,
    TypeDefinition, TypeShape,
};

use super::{doc_lines, string_literal};

/// Generate the struct or enum for a type definition, including its impls
pub fn generate_type(name: &str, type_def: &TypeDefinition, config: &GeneratorConfig) -> String {
    match &type_def.shape {
        TypeShape::Struct(shape) => generate_struct(name, type_def, shape, config),
        TypeShape::Enum(cases) => generate_enum(name, type_def, cases, config),
    }
}

/// Whether the rendered type writes any field through `json!`.
pub fn uses_json_macro(type_def: &TypeDefinition) -> bool {
    let TypeShape::Struct(shape) = &type_def.shape else {
        return false;
    };
    match &shape.serialization {
        SerializationRule::Fields { .. } => shape
            .fields
            .iter()
            .any(|f| f.role == FieldRole::Child && f.encoding == FieldEncoding::Verbatim),
        SerializationRule::ContainerValue { .. } => shape
            .fields
            .iter()
            .any(|f| f.role == FieldRole::Value && f.encoding == FieldEncoding::Verbatim),
        SerializationRule::ExactlyOne | SerializationRule::Empty => false,
    }
}

fn generate_struct(
    name: &str,
    type_def: &TypeDefinition,
    shape: &StructShape,
    config: &GeneratorConfig,
) -> String {
    let mut code = String::new();

    if config.generate_docs {
        code.push_str(&doc_lines(
            "",
            &format!("Request body element serialized under `{}`.", type_def.wire_key),
        ));
    }

    code.push_str("#[derive(Debug)]\n");
    code.push_str(&format!("pub struct {} {{\n", name));
    for field in &shape.fields {
        code.push_str(&format!(
            "    pub {}: {},\n",
            field.ident,
            field_type(field, config)
        ));
    }
    code.push_str("}\n\n");

    // Constructor, parameters in declaration order
    let params: Vec<String> = shape
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.ident, field_type(f, config)))
        .collect();
    let inits: Vec<&str> = shape.fields.iter().map(|f| f.ident.as_str()).collect();

    code.push_str(&format!("impl {} {{\n", name));
    code.push_str(&format!("    pub fn new({}) -> Self {{\n", params.join(", ")));
    if inits.is_empty() {
        code.push_str("        Self {}\n");
    } else {
        code.push_str(&format!("        Self {{ {} }}\n", inits.join(", ")));
    }
    code.push_str("    }\n}\n\n");

    code.push_str(&format!("impl {} for {} {{\n", config.body_trait, name));
    code.push_str("    fn to_document(&self) -> Value {\n");
    code.push_str(&generate_serialization(type_def, shape));
    code.push_str("    }\n}\n");

    if let Some(parent) = &type_def.parent_type {
        code.push_str(&format!("\nimpl {} for {} {{}}\n", parent, name));
    }

    code
}

fn field_type(field: &FieldDef, config: &GeneratorConfig) -> String {
    let base = match &field.ty {
        FieldType::Named(name) => name.clone(),
        FieldType::List(name) => format!("Vec<{}>", name),
        FieldType::Polymorphic => format!("Box<dyn {}>", config.body_trait),
    };
    if field.optional {
        format!("Option<{}>", base)
    } else {
        base
    }
}

/// Body of `to_document()`.
fn generate_serialization(type_def: &TypeDefinition, shape: &StructShape) -> String {
    const INDENT: &str = "        ";
    let mut code = String::new();
    let wire_key = string_literal(&type_def.wire_key);

    let wrapped = match &shape.serialization {
        SerializationRule::ExactlyOne => "self.child.to_document()".to_string(),
        SerializationRule::Empty => "Value::Object(Map::new())".to_string(),
        SerializationRule::ContainerValue { container, value } => {
            let value_field = shape
                .fields
                .iter()
                .find(|f| f.role == FieldRole::Value);
            let value_expr = match value_field {
                Some(field) => encode(&format!("self.{}", value), field.encoding),
                None => "Value::Null".to_string(),
            };
            code.push_str(&format!("{}let mut container = Map::new();\n", INDENT));
            code.push_str(&format!(
                "{}container.insert(self.{}.clone(), {});\n",
                INDENT, container, value_expr
            ));
            "Value::Object(container)".to_string()
        }
        SerializationRule::Fields { container } => {
            code.push_str(&format!("{}let mut inner = Map::new();\n", INDENT));
            for field in shape.fields.iter().filter(|f| f.role == FieldRole::Child) {
                let key = string_literal(&field.key);
                if field.optional {
                    // `value` never collides with the local maps
                    code.push_str(&format!(
                        "{}if let Some(value) = &self.{} {{\n",
                        INDENT, field.ident
                    ));
                    code.push_str(&format!(
                        "{}    inner.insert({}.to_string(), {});\n",
                        INDENT,
                        key,
                        encode("value", field.encoding)
                    ));
                    code.push_str(&format!("{}}}\n", INDENT));
                } else {
                    code.push_str(&format!(
                        "{}inner.insert({}.to_string(), {});\n",
                        INDENT,
                        key,
                        encode(&format!("self.{}", field.ident), field.encoding)
                    ));
                }
            }
            match container {
                Some(container) => {
                    code.push_str(&format!("{}let mut container = Map::new();\n", INDENT));
                    code.push_str(&format!(
                        "{}container.insert(self.{}.clone(), Value::Object(inner));\n",
                        INDENT, container
                    ));
                    "Value::Object(container)".to_string()
                }
                None => "Value::Object(inner)".to_string(),
            }
        }
    };

    code.push_str(&format!("{}let mut document = Map::new();\n", INDENT));
    code.push_str(&format!(
        "{}document.insert({}.to_string(), {});\n",
        INDENT, wire_key, wrapped
    ));
    code.push_str(&format!("{}Value::Object(document)\n", INDENT));
    code
}

/// Expression writing `expr` into a document according to its encoding.
fn encode(expr: &str, encoding: FieldEncoding) -> String {
    match encoding {
        FieldEncoding::Document => format!("{}.to_document()", expr),
        FieldEncoding::WireValue => format!("Value::from({}.as_str())", expr),
        FieldEncoding::Verbatim => format!("json!({})", expr),
        FieldEncoding::DocumentList => format!(
            "Value::Array({}.iter().map(|item| item.to_document()).collect())",
            expr
        ),
    }
}

fn generate_enum(
    name: &str,
    type_def: &TypeDefinition,
    cases: &[EnumCase],
    config: &GeneratorConfig,
) -> String {
    let mut code = String::new();

    if config.generate_docs {
        code.push_str(&doc_lines(
            "",
            &format!("Allowed values of `{}`.", type_def.wire_key),
        ));
    }

    code.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
    code.push_str(&format!("pub enum {} {{\n", name));
    for case in cases {
        code.push_str(&format!("    {},\n", case.ident));
    }
    code.push_str("}\n\n");

    code.push_str(&format!("impl {} {{\n", name));
    if config.generate_docs {
        code.push_str("    /// Literal value written on the wire.\n");
    }
    code.push_str("    pub fn as_str(&self) -> &'static str {\n");
    code.push_str("        match *self {\n");
    for case in cases {
        code.push_str(&format!(
            "            {}::{} => {},\n",
            name,
            case.ident,
            string_literal(&case.wire_value)
        ));
    }
    code.push_str("        }\n    }\n}\n");

    if let Some(parent) = &type_def.parent_type {
        code.push_str(&format!("\nimpl From<{}> for {} {{\n", name, parent));
        code.push_str(&format!("    fn from(value: {}) -> Self {{\n", name));
        code.push_str(&format!("        {}::from(value.as_str())\n", parent));
        code.push_str("    }\n}\n");
    }

    code
}
