//! Intermediate Representation (IR)
//!
//! Two halves live here:
//! - the resolved descriptor model ([`Element`], [`EndpointDescriptor`]) that the
//!   parsers build from generic JSON documents, and
//! - the generated definitions ([`GeneratedDefinition`]) collected in the
//!   [`DefinitionRegistry`] and rendered by the language generators.
//!
//! Generated definitions are plain immutable records. Rendering them to text
//! happens once, after every descriptor has been interpreted.

mod registry;

pub use registry::DefinitionRegistry;

use serde::Serialize;

// ── Body descriptors ──────────────────────────────────────────────────────────

/// Kind of a body descriptor node once parameter references are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Object,
    Enum,
    Scalar,
    Array,
    ScalarArray,
}

/// Kind token of a body descriptor node, as written in the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorToken {
    Kind(DescriptorKind),
    ParameterReference,
}

impl DescriptorToken {
    pub fn parse(token: &str) -> Option<Self> {
        let kind = match token {
            "struct" => DescriptorKind::Object,
            "enum" => DescriptorKind::Enum,
            "simple" => DescriptorKind::Scalar,
            "array" => DescriptorKind::Array,
            "simple_array" => DescriptorKind::ScalarArray,
            "parameter" => return Some(Self::ParameterReference),
            _ => return None,
        };
        Some(Self::Kind(kind))
    }
}

/// How an object descriptor declares its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    None,
    OneOf,
    AnyOf,
}

/// A body descriptor node after parameter resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Key the node is written under; also the field name in the parent.
    pub key: String,
    pub type_name: String,
    pub parent_type: Option<String>,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Object(ObjectShape),
    Enum { options: Vec<String> },
    Scalar,
    Array,
    ScalarArray,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectShape {
    pub multiplicity: Multiplicity,
    pub container_key: Option<String>,
    pub value: Option<Box<Element>>,
    pub children: Vec<ChildSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChildSlot {
    pub required: bool,
    pub element: Element,
}

impl Element {
    /// Field type and wire encoding when this node is referenced by a parent.
    pub fn field_type(&self) -> (FieldType, FieldEncoding) {
        let name = self.type_name.clone();
        match self.kind {
            ElementKind::Object(_) => (FieldType::Named(name), FieldEncoding::Document),
            ElementKind::Enum { .. } => (FieldType::Named(name), FieldEncoding::WireValue),
            ElementKind::Scalar => (FieldType::Named(name), FieldEncoding::Verbatim),
            ElementKind::ScalarArray => (FieldType::List(name), FieldEncoding::Verbatim),
            ElementKind::Array => (FieldType::List(name), FieldEncoding::DocumentList),
        }
    }
}

// ── Endpoint descriptors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    pub name: String,
    pub documentation: String,
    pub url_templates: Vec<UrlTemplate>,
    /// Never empty; the first entry is the default method.
    pub allowed_methods: Vec<String>,
    pub body: BodyRequirement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplate {
    /// The template as written, e.g. `/{index}/_search`.
    pub path: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Placeholder(PathParam),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathParam {
    pub name: String,
    pub kind: PathParamKind,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathParamKind {
    Scalar,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRequirement {
    Absent,
    Optional,
    Required,
}

// ── Generated definitions ─────────────────────────────────────────────────────

/// The compiler's output unit: one generated type or one method group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedDefinition {
    pub name: String,
    pub kind: DefinitionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Type(TypeDefinition),
    MethodGroup(MethodGroup),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    /// Key the serialized document is wrapped in.
    pub wire_key: String,
    pub parent_type: Option<String>,
    pub shape: TypeShape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeShape {
    Struct(StructShape),
    Enum(Vec<EnumCase>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructShape {
    /// Declaration order; the constructor takes parameters in the same order.
    pub fields: Vec<FieldDef>,
    pub serialization: SerializationRule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    /// Key used on the wire.
    pub key: String,
    pub ident: String,
    pub ty: FieldType,
    pub optional: bool,
    pub encoding: FieldEncoding,
    pub role: FieldRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Named(String),
    List(String),
    /// The single slot of a one-of object; typed as the shared body trait.
    Polymorphic,
}

impl FieldType {
    /// Name of the generated or external type this field refers to.
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            FieldType::Named(name) | FieldType::List(name) => Some(name),
            FieldType::Polymorphic => None,
        }
    }
}

/// How a field's runtime value is written into the serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEncoding {
    /// Nested generated object; call its `to_document()`.
    Document,
    /// Generated enum; write its literal wire value.
    WireValue,
    /// Scalar or list of scalars, passed through.
    Verbatim,
    /// List of generated objects, mapped element-wise.
    DocumentList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// The unnamed slot of a one-of object.
    Slot,
    /// Holds the dynamic wrapping key.
    Container,
    /// Holds the value written under the dynamic key.
    Value,
    /// A declared child.
    Child,
}

/// Shape of the document produced by a generated struct's `to_document()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializationRule {
    /// `{ key: slot.to_document() }`
    ExactlyOne,
    /// `{ key: inner }` or `{ key: { <container>: inner } }`, where `inner`
    /// holds every child field under its own key.
    Fields { container: Option<String> },
    /// `{ key: { <container>: <value> } }`
    ContainerValue { container: String, value: String },
    /// `{ key: {} }`
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumCase {
    pub ident: String,
    pub wire_value: String,
}

/// All methods generated for one endpoint, attached to the transport client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodGroup {
    pub endpoint: String,
    pub methods: Vec<MethodDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDefinition {
    pub ident: String,
    pub documentation: String,
    /// Resolved placeholders in path order.
    pub path_params: Vec<PathParam>,
    pub url: Vec<UrlPart>,
    /// Runtime `HttpMethod` variants; the first one is the default.
    pub allowed_methods: Vec<String>,
    pub body: BodyParam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlPart {
    Literal(String),
    Scalar(String),
    Joined(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyParam {
    None,
    Typed { required: bool },
    Document { required: bool },
}
