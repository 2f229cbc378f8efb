//! Corpus configuration: everything that is specific to one documentation set.
//!
//! The pipeline itself is corpus-agnostic; section identifiers, pre-registered
//! type names, blacklists and manual corrections all live in [`CorpusConfig`].
//! [`CorpusConfig::qt`] packages the tables for the Qt 5 reference documentation,
//! which is the corpus this crate was written against. A new corpus starts from
//! [`CorpusConfig::default`] and fills in only what it needs.

use crate::{
    model::{NestedType, TypeKind},
    typesystem::TypeOrigin,
};

/// One method section of a documentation page and the attributes it implies.
///
/// A page lists its declarations under anchored sections such as `public-functions`
/// or `signals`; the section a declaration appears under determines its scope and
/// flags, not the declaration text itself.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    /// The section anchor identifier.
    pub id: String,
    /// Whether declarations in this section belong to the page's class.
    pub class_scope: bool,
    /// Declarations are protected members.
    pub protected: bool,
    /// Declarations are static members.
    pub is_static: bool,
    /// Declarations are signals.
    pub signal: bool,
    /// Declarations are slots.
    pub slot: bool,
}

impl SectionSpec {
    /// Creates a class-scoped section with no extra attributes.
    pub fn new(id: impl Into<String>) -> Self {
        SectionSpec {
            id: id.into(),
            class_scope: true,
            protected: false,
            is_static: false,
            signal: false,
            slot: false,
        }
    }

    /// Marks the section's declarations as global rather than class members.
    #[must_use]
    pub fn global(mut self) -> Self {
        self.class_scope = false;
        self
    }

    /// Marks the section's declarations as protected.
    #[must_use]
    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }

    /// Marks the section's declarations as static.
    #[must_use]
    pub fn is_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the section's declarations as signals.
    #[must_use]
    pub fn signal(mut self) -> Self {
        self.signal = true;
        self
    }

    /// Marks the section's declarations as slots.
    #[must_use]
    pub fn slot(mut self) -> Self {
        self.slot = true;
        self
    }
}

/// All corpus-specific knowledge consumed by the extraction pipeline.
///
/// Fields are public so a caller can assemble a configuration piecemeal; the
/// default value is completely empty and disables every correction.
#[derive(Debug, Clone, Default)]
pub struct CorpusConfig {
    /// Types that exist outside the documentation, pre-registered before any
    /// document is processed.
    pub known_types: Vec<(String, TypeOrigin)>,
    /// Expected prefix of class names; a mismatch is reported but not fatal.
    pub class_prefix: Option<String>,
    /// Document titles that describe a namespace page, with the namespace name.
    pub namespace_documents: Vec<(String, String)>,
    /// Method sections of a class page, in processing order.
    pub method_sections: Vec<SectionSpec>,
    /// Method sections of a global header page.
    pub global_sections: Vec<String>,
    /// Macro section identifiers, for global and class pages respectively.
    pub macro_sections: Vec<String>,
    /// Candidate identifiers of the nested types table; the first match wins.
    pub types_sections: Vec<String>,
    /// Section scanned for related non-member typedef rows.
    pub related_typedef_section: Option<String>,
    /// Document name suffixes (before `.html`) that carry no API content.
    pub document_suffix_blacklist: Vec<String>,
    /// Exact document stems that carry no API content.
    pub document_blacklist: Vec<String>,
    /// `(namespace, heading)` pairs whose enum value lists must be ignored.
    pub value_list_blacklist: Vec<(String, String)>,
    /// `(class, typedef)` pairs excluded from related typedef collection.
    pub related_typedef_blacklist: Vec<(String, String)>,
    /// Nested type placeholders injected into specific headers.
    pub extra_nested_types: Vec<(String, crate::model::NestedType)>,
    /// Non-nested type placeholders injected into specific headers.
    pub extra_non_nested_types: Vec<(String, crate::model::NestedType)>,
    /// Base name rewrites applied before resolution.
    pub type_aliases: Vec<(String, String)>,
    /// Well-known typedef underlying types, as parseable type text.
    pub typedef_meanings: Vec<(String, String)>,
    /// Typedefs accepted without a meaning; excluded from the batched warning.
    pub typedef_exceptions: Vec<String>,
    /// Name suffixes of typedefs dropped from the registry entirely.
    pub dropped_typedef_suffixes: Vec<String>,
    /// Registry entries replaced wholesale by synthetic placeholders.
    pub synthetic_overrides: Vec<String>,
    /// `(enum, literal)` pairs removed from finished value lists.
    pub removed_enum_values: Vec<(String, String)>,
}

impl CorpusConfig {
    /// Returns true when `name` (a file name, with or without `.html`) should be
    /// skipped entirely.
    pub fn is_document_blacklisted(&self, name: &str) -> bool {
        let stem = name.strip_suffix(".html").unwrap_or(name);
        if self
            .document_suffix_blacklist
            .iter()
            .any(|suffix| stem.ends_with(&format!("-{}", suffix)))
        {
            return true;
        }
        self.document_blacklist.iter().any(|bad| bad == stem)
    }

    /// Returns the rewrite target for an aliased base name, if any.
    pub fn alias_for(&self, base: &str) -> Option<&str> {
        self.type_aliases
            .iter()
            .find(|(from, _)| from == base)
            .map(|(_, to)| to.as_str())
    }

    /// The configuration for the Qt 5 reference documentation.
    pub fn qt() -> Self {
        let mut config = CorpusConfig {
            class_prefix: Some("Q".to_string()),
            namespace_documents: vec![("Qt Namespace".to_string(), "Qt".to_string())],
            method_sections: vec![
                SectionSpec::new("public-functions"),
                SectionSpec::new("protected-functions").protected(),
                SectionSpec::new("public-slots").slot(),
                SectionSpec::new("protected-slots").slot().protected(),
                SectionSpec::new("static-public-members").is_static(),
                SectionSpec::new("static-protected-members").is_static().protected(),
                SectionSpec::new("signals").signal(),
                SectionSpec::new("related-non-members").global(),
            ],
            global_sections: vec!["Functions".to_string()],
            macro_sections: vec!["Macrosx".to_string(), "macros".to_string()],
            types_sections: vec![
                "Typesx".to_string(),
                "public-types".to_string(),
                "types".to_string(),
            ],
            related_typedef_section: Some("related-non-members".to_string()),
            document_suffix_blacklist: [
                "members", "obsolete", "compat", "example", "pro", "cpp", "h", "ui",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            document_blacklist: [
                "codec-big5",
                "codec-euckr",
                "codec-eucjp",
                "codec-gbk",
                "codec-tscii",
                "codec-big5hkscs",
                "codecs-jis",
                "codec-sjis",
                "signalsandslots",
                "events",
                "animation",
                "object",
                "containers",
                "io",
                "plugins",
                "eventsandfilters",
                "statemachine-api",
                "qtcore-module",
                "properties",
                "implicit-sharing",
                "animation-overview",
                "resources",
                "datastreamformat",
                "timers",
                "shared",
                "custom-types",
                "qtcore-index",
                "statemachine",
                "io-functions",
                "objecttrees",
                "json",
                "metaobjects",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            value_list_blacklist: vec![("QJsonValue".to_string(), "toVariant".to_string())],
            related_typedef_blacklist: vec![(
                "QTimeZone".to_string(),
                "OffsetDataList".to_string(),
            )],
            type_aliases: vec![(
                "QFile::Permissions".to_string(),
                "QFileDevice::Permissions".to_string(),
            )],
            typedef_exceptions: [
                "QFunctionPointer",
                "QGlobalStatic::Type",
                "QEasingCurve::EasingFunction",
                "QLoggingCategory::CategoryFilter",
                "QMessageLogger::CategoryFunction",
                "QSettings::ReadFunc",
                "QSettings::WriteFunc",
                "QVarLengthArray::const_iterator",
                "QVarLengthArray::iterator",
                "QVector::const_iterator",
                "QVector::const_reference",
                "QVector::iterator",
                "QVector::reference",
                "QtMessageHandler",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            dropped_typedef_suffixes: vec![
                "::ConstIterator".to_string(),
                "::Iterator".to_string(),
                "::iterator_category".to_string(),
            ],
            synthetic_overrides: vec!["QVariant::Type".to_string()],
            removed_enum_values: vec![
                ("QEvent::Type".to_string(), "EnterEditFocus".to_string()),
                ("QEvent::Type".to_string(), "LeaveEditFocus".to_string()),
            ],
            ..CorpusConfig::default()
        };

        config.add_known_types(
            &[
                "void",
                "float",
                "double",
                "bool",
                "char",
                "signed char",
                "unsigned char",
                "short",
                "signed short",
                "unsigned short",
                "int",
                "signed int",
                "unsigned int",
                "long",
                "signed long",
                "unsigned long",
                "long long int",
                "unsigned long long int",
                "wchar_t",
                "size_t",
            ],
            TypeOrigin::Builtin,
        );
        config.add_known_types(
            &[
                "CFDataRef",
                "CFURLRef",
                "NSData",
                "NSString",
                "CFStringRef",
                "NSURL",
                "NSDate",
                "CFDateRef",
                "GUID",
                "HANDLE",
            ],
            TypeOrigin::PlatformNative,
        );
        config.add_known_types(
            &[
                "va_list",
                "FILE",
                "std::string",
                "std::u16string",
                "std::u32string",
                "std::list",
                "std::wstring",
                "std::initializer_list",
                "std::pair",
                "std::map",
                "std::vector",
            ],
            TypeOrigin::StdLibrary,
        );
        config.add_known_types(
            &["T", "T1", "T2", "X", "Key", "ForwardIterator", "Container", "Cleanup"],
            TypeOrigin::TemplateParameter,
        );
        config.add_known_types(
            &[
                "PointerToMemberFunction",
                "MemberFunction",
                "MemberFunctionOk",
                "UnaryFunction",
                "Functor",
                "QtCleanUpFunction",
            ],
            TypeOrigin::FunctionPointer,
        );
        // Placeholders for types that live outside the QtCore corpus or have no
        // processable documentation of their own. The double space in the last
        // QMap entry matches the documentation verbatim.
        config.add_known_types(
            &[
                "QWidget",
                "QVersionNumber",
                "QMap<Key, T>::const_iterator",
                "QMap<Key, T>::iterator",
                "QHash<Key, T>::const_iterator",
                "QHash<Key, T>::iterator",
                "QMap<Key,  T>::const_iterator",
            ],
            TypeOrigin::Synthetic,
        );

        config.add_meanings(&[
            ("qint8", "signed char"),
            ("quint8", "unsigned char"),
            ("qint16", "signed short"),
            ("quint16", "unsigned short"),
            ("qint32", "signed int"),
            ("quint32", "unsigned int"),
            ("qint64", "long long int"),
            ("quint64", "unsigned long long int"),
            ("qlonglong", "long long int"),
            ("qulonglong", "unsigned long long int"),
            ("qintptr", "long long int"),
            ("quintptr", "unsigned long long int"),
            ("qptrdiff", "long long int"),
            ("QList::difference_type", "long long int"),
            ("qreal", "double"),
            ("uchar", "unsigned char"),
            ("uint", "unsigned int"),
            ("ulong", "unsigned long"),
            ("ushort", "unsigned short"),
            ("Qt::HANDLE", "void*"),
            ("QByteArray::const_iterator", "const char*"),
            ("QByteArray::iterator", "char*"),
            ("QString::const_iterator", "const QChar*"),
            ("QString::iterator", "QChar*"),
            ("QFileInfoList", "QList<QFileInfo>"),
            ("QModelIndexList", "QList<QModelIndex>"),
            ("QObjectList", "QList<QObject>"),
            ("QTimeZone::OffsetDataList", "QList<QTimeZone::OffsetData>"),
            ("QVariantHash", "QHash<QString, QVariant>"),
            ("QVariantMap", "QMap<QString, QVariant>"),
            ("QVariantList", "QList<QVariant>"),
            ("QVariantAnimation::KeyValues", "QVector<QPair<qreal, QVariant>>"),
            (
                "QXmlStreamEntityDeclarations",
                "QVector<QXmlStreamEntityDeclaration>",
            ),
            (
                "QXmlStreamNamespaceDeclarations",
                "QVector<QXmlStreamNamespaceDeclaration>",
            ),
            (
                "QXmlStreamNotationDeclarations",
                "QVector<QXmlStreamNotationDeclaration>",
            ),
        ]);

        config.add_extra_nested(&[
            ("QHashIterator", TypeKind::TemplateType, "Item"),
            ("QMutableHashIterator", TypeKind::TemplateType, "Item"),
            ("QMapIterator", TypeKind::TemplateType, "Item"),
            ("QMutableMapIterator", TypeKind::TemplateType, "Item"),
            ("QFlags", TypeKind::TemplateType, "Enum"),
            ("QFlags", TypeKind::TemplateType, "Zero"),
            ("QSharedPointer", TypeKind::TemplateType, "Deleter"),
            ("QVarLengthArray", TypeKind::TemplateType, "Prealloc"),
            ("QVarLengthArray", TypeKind::TemplateType, "Prealloc1"),
            ("QVarLengthArray", TypeKind::TemplateType, "Prealloc2"),
            ("QPair", TypeKind::TemplateType, "TT1"),
            ("QPair", TypeKind::TemplateType, "TT2"),
            ("QHash", TypeKind::TemplateType, "InputIterator"),
            ("QVariant", TypeKind::Enum, "Type"),
            // Undocumented but present in the headers.
            ("QByteArray", TypeKind::Typedef, "iterator"),
            ("QByteArray", TypeKind::Typedef, "const_iterator"),
        ]);
        config.add_extra_non_nested(&[
            ("QByteArray", TypeKind::Class, "QByteRef"),
            ("QBitArray", TypeKind::Class, "QBitRef"),
            ("QString", TypeKind::Class, "QCharRef"),
            ("QJsonValue", TypeKind::Class, "QJsonValueRef"),
            ("QTextStream", TypeKind::Class, "QTextStreamManipulator"),
        ]);

        config
    }

    fn add_known_types(&mut self, names: &[&str], origin: TypeOrigin) {
        for name in names {
            self.known_types.push((name.to_string(), origin));
        }
    }

    fn add_meanings(&mut self, meanings: &[(&str, &str)]) {
        for (name, meaning) in meanings {
            self.typedef_meanings
                .push((name.to_string(), meaning.to_string()));
        }
    }

    fn add_extra_nested(&mut self, entries: &[(&str, TypeKind, &str)]) {
        for (header, kind, name) in entries {
            self.extra_nested_types
                .push((header.to_string(), NestedType::placeholder(*kind, *name)));
        }
    }

    fn add_extra_non_nested(&mut self, entries: &[(&str, TypeKind, &str)]) {
        for (header, kind, name) in entries {
            self.extra_non_nested_types
                .push((header.to_string(), NestedType::placeholder(*kind, *name)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_blacklist_matches_suffix_and_stem() {
        let config = CorpusConfig::qt();
        assert!(config.is_document_blacklisted("qstring-members.html"));
        assert!(config.is_document_blacklisted("qtcore-module.html"));
        assert!(config.is_document_blacklisted("events"));
        assert!(!config.is_document_blacklisted("qstring.html"));
        assert!(!config.is_document_blacklisted("members-of-parliament.html"));
    }

    #[test]
    fn test_alias_lookup() {
        let config = CorpusConfig::qt();
        assert_eq!(
            config.alias_for("QFile::Permissions"),
            Some("QFileDevice::Permissions")
        );
        assert_eq!(config.alias_for("QFile"), None);
    }

    #[test]
    fn test_qt_section_attributes() {
        let config = CorpusConfig::qt();
        let signals = config
            .method_sections
            .iter()
            .find(|s| s.id == "signals")
            .unwrap();
        assert!(signals.signal && signals.class_scope && !signals.is_static);

        let related = config
            .method_sections
            .iter()
            .find(|s| s.id == "related-non-members")
            .unwrap();
        assert!(!related.class_scope);
    }

    #[test]
    fn test_default_is_empty() {
        let config = CorpusConfig::default();
        assert!(config.known_types.is_empty());
        assert!(config.method_sections.is_empty());
        assert!(!config.is_document_blacklisted("anything.html"));
    }
}
