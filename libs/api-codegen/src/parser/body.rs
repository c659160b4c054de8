//! Body schema interpreter
//!
//! Recursive descent over a request-body descriptor tree. Each node is
//! resolved against the parameter scope, turned into an [`Element`], and, for
//! object and enum kinds, compiled into a [`TypeDefinition`] that is registered
//! in the [`DefinitionRegistry`]. Children are interpreted before their parent
//! is registered; registration order carries no meaning.

use std::collections::HashSet;

use serde_json::Value;

use super::access::{self, Object};
use super::scope::ParameterScope;
use crate::error::{Error, Result};
use crate::ir::{
    ChildSlot, DefinitionKind, DefinitionRegistry, DescriptorKind, DescriptorToken, Element,
    ElementKind, EnumCase, FieldDef, FieldEncoding, FieldRole, FieldType, GeneratedDefinition,
    Multiplicity, ObjectShape, SerializationRule, StructShape, TypeDefinition, TypeShape,
};
use crate::naming;

/// Identifier of the unnamed slot of a one-of object.
pub const SLOT_FIELD: &str = "child";

pub struct BodySchemaInterpreter<'r> {
    registry: &'r mut DefinitionRegistry,
}

impl<'r> BodySchemaInterpreter<'r> {
    pub fn new(registry: &'r mut DefinitionRegistry) -> Self {
        Self { registry }
    }

    /// Interpret one top-level descriptor, registering every type it defines.
    pub fn interpret(&mut self, node: &Value, scope: &ParameterScope<'_>) -> Result<Element> {
        self.interpret_at(node, scope, "")
    }

    fn interpret_at(
        &mut self,
        node: &Value,
        scope: &ParameterScope<'_>,
        parent_path: &str,
    ) -> Result<Element> {
        let base = access::as_object(node, display_path(parent_path))?;
        let key = access::required_str(base, "key", display_path(parent_path))?;
        let path = child_path(parent_path, key);

        let (descriptor, kind) = resolve(base, key, scope, &path)?;

        let overlaid;
        let scope = match access::optional_object(descriptor, "parameters", &path)? {
            Some(local) => {
                overlaid = scope.overlay(local);
                &overlaid
            }
            None => scope,
        };

        let type_name = access::required_str(descriptor, "typeName", &path)?.to_string();
        let parent_type = access::optional_str(descriptor, "parent", &path)?.map(String::from);

        let kind = match kind {
            DescriptorKind::Object => {
                ElementKind::Object(self.interpret_object(descriptor, scope, &path)?)
            }
            DescriptorKind::Enum => ElementKind::Enum {
                options: access::optional_string_list(descriptor, "options", &path)?
                    .unwrap_or_default(),
            },
            DescriptorKind::Scalar => ElementKind::Scalar,
            DescriptorKind::Array => ElementKind::Array,
            DescriptorKind::ScalarArray => ElementKind::ScalarArray,
        };

        let element = Element {
            key: key.to_string(),
            type_name,
            parent_type,
            kind,
        };

        if let Some(definition) = build_type_definition(&element, &path)? {
            self.registry.register(definition)?;
        }

        Ok(element)
    }

    fn interpret_object(
        &mut self,
        descriptor: &Object,
        scope: &ParameterScope<'_>,
        path: &str,
    ) -> Result<ObjectShape> {
        // A child container replaces the node's own one_of/any_of lists.
        let container = access::optional_object(descriptor, "childContainer", path)?;
        let source = container.unwrap_or(descriptor);

        let mut container_key = None;
        let mut value = None;
        if let Some(container) = container {
            container_key = access::optional_str(container, "key", path)?.map(String::from);
            if let Some(node) = access::optional_value(container, "value") {
                value = Some(Box::new(self.interpret_at(node, scope, path)?));
            }
        }

        let one_of = access::optional_array(source, "one_of", path)?;
        let any_of = access::optional_array(source, "any_of", path)?;
        let (multiplicity, declared) = match (one_of, any_of) {
            (Some(items), _) => (Multiplicity::OneOf, items),
            (None, Some(items)) => (Multiplicity::AnyOf, items),
            (None, None) => (Multiplicity::None, &[][..]),
        };

        let mut children = Vec::with_capacity(declared.len());
        for item in declared {
            let required = match item.as_object() {
                Some(child) => access::optional_bool(child, "required", path)?.unwrap_or(false),
                None => false,
            };
            let element = self.interpret_at(item, scope, path)?;
            children.push(ChildSlot { required, element });
        }

        if multiplicity == Multiplicity::OneOf && (container_key.is_some() || value.is_some()) {
            tracing::warn!(
                path = %path,
                "one_of object declares a child container key or value; ignoring them"
            );
            container_key = None;
            value = None;
        }

        if !children.is_empty() && value.is_some() {
            return Err(Error::schema(
                path,
                "an object cannot declare both children and a container value",
            ));
        }
        if value.is_some() && container_key.is_none() {
            return Err(Error::schema(
                path,
                "a container value requires a container key",
            ));
        }

        Ok(ObjectShape {
            multiplicity,
            container_key,
            value,
            children,
        })
    }
}

/// Resolve parameter references and return the descriptor that governs the node.
fn resolve<'a>(
    base: &'a Object,
    key: &str,
    scope: &ParameterScope<'a>,
    path: &str,
) -> Result<(&'a Object, DescriptorKind)> {
    if let DescriptorToken::Kind(kind) = descriptor_token(base, path)? {
        return Ok((base, kind));
    }

    let fragment = scope.lookup(key).ok_or_else(|| Error::UnresolvedParameter {
        name: key.to_string(),
        path: path.to_string(),
    })?;
    let descriptor = access::as_object(fragment, path)?;

    match descriptor_token(descriptor, path)? {
        DescriptorToken::ParameterReference => Err(Error::schema(
            path,
            format!("parameter '{}' resolves to another parameter reference", key),
        )),
        DescriptorToken::Kind(kind) => {
            tracing::trace!(path = %path, parameter = key, "resolved parameter reference");
            Ok((descriptor, kind))
        }
    }
}

fn descriptor_token(descriptor: &Object, path: &str) -> Result<DescriptorToken> {
    let token = access::required_str(descriptor, "type", path)?;
    DescriptorToken::parse(token)
        .ok_or_else(|| Error::schema(path, format!("unknown kind '{}'", token)))
}

/// Compile an element into the definition it contributes, if any.
///
/// Pure: equal elements yield equal definitions.
pub fn build_type_definition(element: &Element, path: &str) -> Result<Option<GeneratedDefinition>> {
    let shape = match &element.kind {
        ElementKind::Object(object) => TypeShape::Struct(build_struct(object, path)?),
        ElementKind::Enum { options } => TypeShape::Enum(build_enum(options, path)?),
        ElementKind::Scalar | ElementKind::Array | ElementKind::ScalarArray => return Ok(None),
    };

    Ok(Some(GeneratedDefinition {
        name: element.type_name.clone(),
        kind: DefinitionKind::Type(TypeDefinition {
            wire_key: element.key.clone(),
            parent_type: element.parent_type.clone(),
            shape,
        }),
    }))
}

fn build_struct(object: &ObjectShape, path: &str) -> Result<StructShape> {
    if object.multiplicity == Multiplicity::OneOf {
        return Ok(StructShape {
            fields: vec![FieldDef {
                key: SLOT_FIELD.to_string(),
                ident: SLOT_FIELD.to_string(),
                ty: FieldType::Polymorphic,
                optional: false,
                encoding: FieldEncoding::Document,
                role: FieldRole::Slot,
            }],
            serialization: SerializationRule::ExactlyOne,
        });
    }

    let mut fields = Vec::new();

    let container = object.container_key.as_ref().map(|key| FieldDef {
        key: key.clone(),
        ident: naming::field_ident(key),
        ty: FieldType::Named("String".to_string()),
        optional: false,
        encoding: FieldEncoding::Verbatim,
        role: FieldRole::Container,
    });
    let container_ident = container.as_ref().map(|field| field.ident.clone());
    fields.extend(container);

    let mut value_ident = None;
    if let Some(value) = &object.value {
        let (ty, encoding) = value.field_type();
        let ident = naming::field_ident(&value.key);
        value_ident = Some(ident.clone());
        fields.push(FieldDef {
            key: value.key.clone(),
            ident,
            ty,
            optional: false,
            encoding,
            role: FieldRole::Value,
        });
    }

    for child in &object.children {
        let (ty, encoding) = child.element.field_type();
        fields.push(FieldDef {
            key: child.element.key.clone(),
            ident: naming::field_ident(&child.element.key),
            ty,
            optional: !child.required,
            encoding,
            role: FieldRole::Child,
        });
    }

    let mut seen = HashSet::new();
    for field in &fields {
        if !seen.insert(field.ident.as_str()) {
            return Err(Error::schema(
                path,
                format!("two fields map to the identifier '{}'", field.ident),
            ));
        }
    }

    let serialization = match (object.children.is_empty(), container_ident, value_ident) {
        (false, container, _) => SerializationRule::Fields { container },
        (true, Some(container), Some(value)) => {
            SerializationRule::ContainerValue { container, value }
        }
        (true, _, _) => SerializationRule::Empty,
    };

    Ok(StructShape {
        fields,
        serialization,
    })
}

fn build_enum(options: &[String], path: &str) -> Result<Vec<EnumCase>> {
    let mut seen = HashSet::new();
    options
        .iter()
        .map(|option| {
            let ident = naming::variant_ident(option);
            if !seen.insert(ident.clone()) {
                return Err(Error::schema(
                    path,
                    format!("two options map to the variant '{}'", ident),
                ));
            }
            Ok(EnumCase {
                ident,
                wire_value: option.clone(),
            })
        })
        .collect()
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
