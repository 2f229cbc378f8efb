//! Central type registry for corpus analysis.
//!
//! The registry is the single source of truth for "which type names exist and where
//! they come from". It is seeded from the corpus configuration's fixed known-type
//! tables (builtins, platform types, template parameters) and then populated from
//! every parsed document: the documented class itself, its nested types under their
//! namespace, and its related non-member types.
//!
//! # Semantics
//!
//! - **Keyed uniquely by canonical name.** `QIODevice::OpenMode` and `OpenMode` are
//!   different entries; qualification happens at population time.
//! - **Last write wins.** Later registrations overwrite earlier ones with a warning
//!   diagnostic, never an error; later, more specific registrations are expected to
//!   supersede generic ones in some corpora.
//! - **Fixed iteration order.** Entries are stored in a `BTreeMap` so population and
//!   serialization are deterministic across runs, which the overwrite semantics
//!   require.
//!
//! # Lifecycle
//!
//! Entries are created once per document batch, read many times by the resolver, and
//! may be deleted by the typedef pruning step at the very end.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    config::CorpusConfig,
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    model::{EnumValue, HeaderModel, NestedType, TypeKind},
    signature::TypeRef,
};

/// Classification of where a registered type comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeOrigin {
    /// A C or C++ built-in type (`int`, `unsigned long`, `wchar_t`, ...).
    Builtin,
    /// A platform-native type (`CFStringRef`, `HANDLE`, ...).
    PlatformNative,
    /// A C++ standard library type (`std::string`, `FILE`, `va_list`, ...).
    StdLibrary,
    /// A template parameter name used by the documentation (`T`, `Key`, ...).
    TemplateParameter,
    /// A well-known function pointer alias (`Functor`, `UnaryFunction`, ...).
    FunctionPointer,
    /// A type declared by a document of this corpus.
    Declared,
    /// A placeholder injected because the documentation cannot be processed
    /// automatically for this name.
    Synthetic,
}

/// Declaration metadata for one canonical type name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryEntry {
    /// Kind of declaration; absent for known types seeded from configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeKind>,
    /// Where the type comes from.
    pub origin: TypeOrigin,
    /// The header declaring the type; present for declared types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// The base class of a declared class, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<TypeRef>,
    /// Enum literals; present for declared enums.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnumValue>,
    /// The canonical name of the wrapped enum; present for flags types.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
    /// The canonical underlying type of a well-known typedef, assigned by the
    /// typedef meaning resolver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<TypeRef>,
}

impl RegistryEntry {
    /// Creates an entry for a known type seeded from configuration.
    pub fn known(origin: TypeOrigin) -> Self {
        RegistryEntry {
            kind: None,
            origin,
            header: None,
            inherits: None,
            values: Vec::new(),
            enum_name: None,
            meaning: None,
        }
    }

    /// Creates an entry for a type declared by a document.
    pub fn declared(kind: TypeKind, header: impl Into<String>) -> Self {
        RegistryEntry {
            kind: Some(kind),
            origin: TypeOrigin::Declared,
            header: Some(header.into()),
            inherits: None,
            values: Vec::new(),
            enum_name: None,
            meaning: None,
        }
    }
}

/// Append-only mapping from canonical type name to its declaration metadata.
///
/// See the module documentation for overwrite and ordering semantics.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    /// Creates a registry seeded with the configuration's known types.
    #[must_use]
    pub fn with_known_types(config: &CorpusConfig, diagnostics: &Diagnostics) -> Self {
        let mut registry = TypeRegistry::new();
        for (name, origin) in &config.known_types {
            registry.insert(name.clone(), RegistryEntry::known(*origin), diagnostics);
        }
        registry
    }

    /// Inserts an entry, overwriting any previous one for the same name.
    ///
    /// Overwrites produce a warning diagnostic, never an error; the warning exists
    /// purely to surface accidental collisions.
    pub fn insert(&mut self, name: String, entry: RegistryEntry, diagnostics: &Diagnostics) {
        if self.entries.contains_key(&name) {
            diagnostics.warning(
                DiagnosticCategory::Registry,
                format!("Type data is overwritten for {}", name),
            );
        }
        self.entries.insert(name, entry);
    }

    /// Inserts an entry without the overwrite warning.
    ///
    /// Used by late correction passes that replace entries on purpose.
    pub fn replace(&mut self, name: String, entry: RegistryEntry) {
        self.entries.insert(name, entry);
    }

    /// Returns the entry for a canonical name.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Returns a mutable entry for a canonical name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegistryEntry> {
        self.entries.get_mut(name)
    }

    /// Returns true when a canonical name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Removes an entry by canonical name.
    pub fn remove(&mut self, name: &str) -> Option<RegistryEntry> {
        self.entries.remove(name)
    }

    /// Returns the number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in canonical-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegistryEntry)> {
        self.entries.iter()
    }

    /// Consumes the registry, returning the ordered entry map for serialization.
    #[must_use]
    pub fn into_entries(self) -> BTreeMap<String, RegistryEntry> {
        self.entries
    }

    /// Populates the registry from every parsed document, in input order.
    ///
    /// For each document this registers the documented class itself (carrying its
    /// inheritance relation), its nested types qualified under the document's
    /// namespace, and its related non-member types unqualified. A nested type whose
    /// qualified name has its own documentation page elsewhere in the corpus is
    /// skipped here; the dedicated page is the better source.
    pub fn populate_from_headers(&mut self, headers: &[HeaderModel], diagnostics: &Diagnostics) {
        let documented_classes: BTreeSet<&str> = headers
            .iter()
            .filter_map(|header| header.class_name.as_deref())
            .collect();

        for header in headers {
            if let Some(class_name) = &header.class_name {
                let mut entry = RegistryEntry::declared(TypeKind::Class, &header.header);
                entry.inherits = header.inherits.clone();
                self.insert(class_name.clone(), entry, diagnostics);
            }

            for nested in &header.nested_types {
                let namespace = header.nested_types_namespace.as_deref();
                let (name, entry) = Self::entry_from_nested(nested, &header.header, namespace);
                if documented_classes.contains(name.as_str()) {
                    diagnostics.info(
                        DiagnosticCategory::Registry,
                        format!(
                            "Data for nested type ({}) is not added because it has a separate doc page",
                            name
                        ),
                    );
                    continue;
                }
                self.insert(name, entry, diagnostics);
            }

            for non_nested in &header.non_nested_types {
                let (name, entry) = Self::entry_from_nested(non_nested, &header.header, None);
                self.insert(name, entry, diagnostics);
            }
        }
    }

    /// Removes every typedef entry that no resolved signature referenced.
    ///
    /// Typedefs that nothing references are dead weight in the output; each removal
    /// produces an info diagnostic.
    pub fn prune_unused_typedefs(&mut self, used: &BTreeSet<String>, diagnostics: &Diagnostics) {
        let unused: Vec<String> = self
            .entries
            .iter()
            .filter(|(name, entry)| {
                entry.kind == Some(TypeKind::Typedef) && !used.contains(name.as_str())
            })
            .map(|(name, _)| name.clone())
            .collect();

        for name in unused {
            diagnostics.push(Diagnostic::new(
                DiagnosticSeverity::Info,
                DiagnosticCategory::Typedef,
                format!("Removing unused typedef: {}", name),
            ));
            self.entries.remove(&name);
        }
    }

    fn entry_from_nested(
        nested: &NestedType,
        header: &str,
        namespace: Option<&str>,
    ) -> (String, RegistryEntry) {
        let mut entry = RegistryEntry::declared(nested.kind, header);
        entry.values = nested.values.clone();

        let name = match namespace {
            Some(namespace) => {
                entry.enum_name = nested
                    .enum_name
                    .as_ref()
                    .map(|enum_name| format!("{}::{}", namespace, enum_name));
                format!("{}::{}", namespace, nested.name)
            }
            None => {
                entry.enum_name = nested.enum_name.clone();
                nested.name.clone()
            }
        };

        (name, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeaderKind;

    #[test]
    fn test_insert_overwrite_warns_and_wins() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();

        registry.insert(
            "QPoint".to_string(),
            RegistryEntry::known(TypeOrigin::Synthetic),
            &diagnostics,
        );
        registry.insert(
            "QPoint".to_string(),
            RegistryEntry::declared(TypeKind::Class, "QPoint"),
            &diagnostics,
        );

        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("QPoint").unwrap().origin,
            TypeOrigin::Declared
        );
    }

    #[test]
    fn test_populate_qualifies_nested_types() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();

        let mut header = HeaderModel::new(HeaderKind::Class, "QIODevice");
        header.class_name = Some("QIODevice".to_string());
        header.nested_types_namespace = Some("QIODevice".to_string());
        header.nested_types.push(NestedType::enumeration(
            "OpenModeFlag",
            vec![EnumValue {
                name: "ReadOnly".to_string(),
                value: "0x0001".to_string(),
                description: String::new(),
            }],
        ));
        header
            .nested_types
            .push(NestedType::flags("OpenMode", "OpenModeFlag"));

        registry.populate_from_headers(&[header], &diagnostics);

        assert!(registry.contains("QIODevice"));
        let flag_enum = registry.get("QIODevice::OpenModeFlag").unwrap();
        assert_eq!(flag_enum.kind, Some(TypeKind::Enum));
        assert_eq!(flag_enum.values.len(), 1);

        let flags = registry.get("QIODevice::OpenMode").unwrap();
        assert_eq!(flags.kind, Some(TypeKind::Flags));
        assert_eq!(flags.enum_name.as_deref(), Some("QIODevice::OpenModeFlag"));
    }

    #[test]
    fn test_populate_skips_nested_type_with_own_page() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();

        let mut outer = HeaderModel::new(HeaderKind::Class, "QOuter");
        outer.class_name = Some("QOuter".to_string());
        outer.nested_types_namespace = Some("QOuter".to_string());
        outer
            .nested_types
            .push(NestedType::placeholder(TypeKind::Class, "Inner"));

        let mut inner = HeaderModel::new(HeaderKind::Class, "QOuter");
        inner.class_name = Some("QOuter::Inner".to_string());

        registry.populate_from_headers(&[outer, inner], &diagnostics);

        let entry = registry.get("QOuter::Inner").unwrap();
        // The dedicated page wins; the placeholder from the enclosing page is skipped.
        assert_eq!(entry.kind, Some(TypeKind::Class));
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn test_prune_unused_typedefs() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();
        registry.insert(
            "Used".to_string(),
            RegistryEntry::declared(TypeKind::Typedef, "QGlobal"),
            &diagnostics,
        );
        registry.insert(
            "Unused".to_string(),
            RegistryEntry::declared(TypeKind::Typedef, "QGlobal"),
            &diagnostics,
        );
        registry.insert(
            "QPoint".to_string(),
            RegistryEntry::declared(TypeKind::Class, "QPoint"),
            &diagnostics,
        );

        let mut used = BTreeSet::new();
        used.insert("Used".to_string());

        registry.prune_unused_typedefs(&used, &diagnostics);

        assert!(registry.contains("Used"));
        assert!(!registry.contains("Unused"));
        // Non-typedef entries are never pruned, referenced or not.
        assert!(registry.contains("QPoint"));
    }
}
