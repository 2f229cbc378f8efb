//! Output model of the extraction pipeline.
//!
//! One [`HeaderModel`] per parsed document plus a single corpus-wide type registry make
//! up the [`ApiModel`] consumed by the downstream binding generator. Everything here is
//! serde-serializable; optional fields are absent (not null) when unset, and empty
//! collections are omitted, mirroring the per-field optionality of the descriptors.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    signature::{Method, TypeRef},
    typesystem::RegistryEntry,
};

/// The kind label of a nested or related type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeKind {
    /// A class or nested class placeholder.
    Class,
    /// An enumeration with a value list.
    Enum,
    /// A flags wrapper over an enumeration.
    Flags,
    /// A typedef placeholder carrying only a name.
    Typedef,
    /// A template parameter placeholder.
    TemplateType,
}

impl TypeKind {
    /// Maps a types-table row label to a kind, or `None` for unknown labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "class" => Some(TypeKind::Class),
            "enum" => Some(TypeKind::Enum),
            "flags" => Some(TypeKind::Flags),
            "typedef" => Some(TypeKind::Typedef),
            "template_type" => Some(TypeKind::TemplateType),
            _ => None,
        }
    }
}

/// One literal of an enumeration value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// The literal name with the enclosing namespace prefix stripped.
    pub name: String,
    /// The literal value text exactly as documented, e.g. `0x0001` or `1 << 3`.
    pub value: String,
    /// The description cell text; empty when the table has no description column.
    pub description: String,
}

/// A nested type, related non-member type, or manually injected placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedType {
    /// Kind of the declaration.
    pub kind: TypeKind,
    /// The declared name, unqualified at extraction time.
    pub name: String,
    /// Enum literals; present only for `kind == enum`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnumValue>,
    /// The wrapped enum name; present only for `kind == flags`.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
}

impl NestedType {
    /// Creates a placeholder declaration of the given kind.
    pub fn placeholder(kind: TypeKind, name: impl Into<String>) -> Self {
        NestedType {
            kind,
            name: name.into(),
            values: Vec::new(),
            enum_name: None,
        }
    }

    /// Creates an enum declaration with its value list.
    pub fn enumeration(name: impl Into<String>, values: Vec<EnumValue>) -> Self {
        NestedType {
            kind: TypeKind::Enum,
            name: name.into(),
            values,
            enum_name: None,
        }
    }

    /// Creates a flags declaration wrapping a previously declared enum.
    pub fn flags(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        NestedType {
            kind: TypeKind::Flags,
            name: name.into(),
            values: Vec::new(),
            enum_name: Some(enum_name.into()),
        }
    }
}

/// Whether a document describes a class or a global header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HeaderKind {
    /// A class documentation page.
    Class,
    /// A global header page (free functions, macros, namespace-level types).
    Global,
}

/// The parsed model of one documentation page.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderModel {
    /// Kind of the page.
    pub kind: HeaderKind,
    /// The header (include file) the page documents.
    pub header: String,
    /// Fully qualified class name for class pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// The base class, when the summary table declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<TypeRef>,
    /// Every parsed method, field and operator declaration of the page.
    pub methods: Vec<Method>,
    /// Nested types declared by the page, including manual corrections.
    pub nested_types: Vec<NestedType>,
    /// Macro rows collected verbatim from the page's macro section.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub macros: Vec<String>,
    /// Namespace under which `nested_types` are registered; registry-internal.
    #[serde(skip)]
    pub nested_types_namespace: Option<String>,
    /// Related non-member types (typedefs, helper classes); registry-internal.
    #[serde(skip)]
    pub non_nested_types: Vec<NestedType>,
}

impl HeaderModel {
    /// Creates an empty model for a header.
    pub fn new(kind: HeaderKind, header: impl Into<String>) -> Self {
        HeaderModel {
            kind,
            header: header.into(),
            class_name: None,
            inherits: None,
            methods: Vec::new(),
            nested_types: Vec::new(),
            macros: Vec::new(),
            nested_types_namespace: None,
            non_nested_types: Vec::new(),
        }
    }
}

/// The complete corpus output: one model per document plus the shared type registry.
#[derive(Debug, Serialize)]
pub struct ApiModel {
    /// Parsed documents in input order.
    pub headers: Vec<HeaderModel>,
    /// Canonical type name to declaration metadata, in name order.
    pub type_registry: BTreeMap<String, RegistryEntry>,
}
