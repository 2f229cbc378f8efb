//! Typedef meaning assignment and late registry corrections.
//!
//! The documentation declares many typedefs without machine-readable underlying
//! types. A fixed table of well-known meanings (platform-sized integer aliases,
//! container aliases, iterator aliases) closes that gap: each meaning string is
//! parsed with the type signature parser and validated against the finished
//! registry before it is attached to its entry.
//!
//! This pass also applies the corpus corrections that only make sense once the
//! registry is complete: iterator-noise typedefs are dropped, synthetic placeholder
//! entries replace declarations that cannot be processed automatically, and
//! documented-but-bogus enum literals are removed. Finally, every typedef that ended
//! up without a meaning and is not on the accepted-exceptions list is reported in a
//! single batched warning.

use crate::{
    config::CorpusConfig,
    diagnostics::{DiagnosticCategory, Diagnostics},
    model::TypeKind,
    signature::{parse_type, TypeRef},
    typesystem::{RegistryEntry, TypeOrigin, TypeRegistry},
    Error, Result,
};

/// Runs the typedef pass over a resolved registry.
///
/// Order matters: noise typedefs are dropped first so they neither receive meanings
/// nor appear in the batched warning; synthetic overrides and enum literal removals
/// run last, after the warning, because they replace entries wholesale.
pub fn apply_typedef_corrections(
    registry: &mut TypeRegistry,
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
) {
    drop_noise_typedefs(registry, config);
    assign_meanings(registry, config, diagnostics);
    report_unknown_typedefs(registry, config, diagnostics);

    for name in &config.synthetic_overrides {
        registry.replace(name.clone(), RegistryEntry::known(TypeOrigin::Synthetic));
    }

    for (enum_name, value_name) in &config.removed_enum_values {
        if let Some(entry) = registry.get_mut(enum_name) {
            entry.values.retain(|value| value.name != *value_name);
        }
    }
}

/// Drops typedefs whose names end in one of the configured noise suffixes.
///
/// Iterator category aliases and friends are never referenced by any signature and
/// only clutter the output.
fn drop_noise_typedefs(registry: &mut TypeRegistry, config: &CorpusConfig) {
    let noise: Vec<String> = registry
        .iter()
        .filter(|(name, entry)| {
            entry.kind == Some(TypeKind::Typedef)
                && config
                    .dropped_typedef_suffixes
                    .iter()
                    .any(|suffix| name.ends_with(suffix.as_str()))
        })
        .map(|(name, _)| name.clone())
        .collect();

    for name in noise {
        registry.remove(&name);
    }
}

fn assign_meanings(registry: &mut TypeRegistry, config: &CorpusConfig, diagnostics: &Diagnostics) {
    for (name, meaning_text) in &config.typedef_meanings {
        match resolve_meaning(registry, name, meaning_text) {
            Ok(meaning) => {
                if let Some(entry) = registry.get_mut(name) {
                    entry.meaning = Some(meaning);
                }
            }
            Err(error) => {
                diagnostics.warning(
                    DiagnosticCategory::Typedef,
                    format!("Typedef '{}' is left without a meaning: {}", name, error),
                );
            }
        }
    }
}

/// Parses a meaning string and validates that every base it references, including
/// nested template arguments, exists in the registry.
fn resolve_meaning(registry: &TypeRegistry, name: &str, meaning_text: &str) -> Result<TypeRef> {
    if !registry.contains(name) {
        return Err(Error::UnknownMeaningType(name.to_string()));
    }

    let meaning = parse_type(meaning_text)?;
    let mut missing = None;
    meaning.visit(&mut |type_ref| {
        if missing.is_none() && !registry.contains(&type_ref.base) {
            missing = Some(type_ref.base.clone());
        }
    });

    match missing {
        Some(base) => Err(Error::UnknownMeaningType(base)),
        None => Ok(meaning),
    }
}

/// Emits one batched warning listing every typedef that lacks a meaning and is not
/// in the accepted-exceptions list.
fn report_unknown_typedefs(
    registry: &TypeRegistry,
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
) {
    let mut unknown: Vec<&str> = registry
        .iter()
        .filter(|(name, entry)| {
            entry.kind == Some(TypeKind::Typedef)
                && entry.meaning.is_none()
                && !config.typedef_exceptions.iter().any(|e| e == *name)
        })
        .map(|(name, _)| name.as_str())
        .collect();

    if unknown.is_empty() {
        return;
    }
    unknown.sort_unstable();
    diagnostics.warning(
        DiagnosticCategory::Typedef,
        format!("Unknown typedefs:\n{}", unknown.join("\n")),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnumValue;

    fn registry_with_typedef(name: &str) -> (TypeRegistry, Diagnostics) {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();
        registry.insert(
            name.to_string(),
            RegistryEntry::declared(TypeKind::Typedef, "QtGlobal"),
            &diagnostics,
        );
        registry.insert(
            "signed char".to_string(),
            RegistryEntry::known(TypeOrigin::Builtin),
            &diagnostics,
        );
        (registry, diagnostics)
    }

    #[test]
    fn test_meaning_is_assigned_and_validated() {
        let (mut registry, diagnostics) = registry_with_typedef("qint8");
        let mut config = CorpusConfig::default();
        config
            .typedef_meanings
            .push(("qint8".to_string(), "signed char".to_string()));

        apply_typedef_corrections(&mut registry, &config, &diagnostics);

        let meaning = registry.get("qint8").unwrap().meaning.as_ref().unwrap();
        assert_eq!(meaning.base, "signed char");
    }

    #[test]
    fn test_unknown_meaning_base_leaves_typedef_without_meaning() {
        let (mut registry, diagnostics) = registry_with_typedef("qodd");
        let mut config = CorpusConfig::default();
        config
            .typedef_meanings
            .push(("qodd".to_string(), "missing type".to_string()));

        apply_typedef_corrections(&mut registry, &config, &diagnostics);

        assert!(registry.get("qodd").unwrap().meaning.is_none());
        assert!(diagnostics
            .warnings()
            .iter()
            .any(|d| d.message.contains("qodd")));
    }

    #[test]
    fn test_meaning_validates_template_arguments() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();
        registry.insert(
            "QFileInfoList".to_string(),
            RegistryEntry::declared(TypeKind::Typedef, "QDir"),
            &diagnostics,
        );
        registry.insert(
            "QList".to_string(),
            RegistryEntry::declared(TypeKind::Class, "QList"),
            &diagnostics,
        );
        // QFileInfo intentionally missing from the registry.
        let mut config = CorpusConfig::default();
        config.typedef_meanings.push((
            "QFileInfoList".to_string(),
            "QList<QFileInfo>".to_string(),
        ));
        config.typedef_exceptions.push("QFileInfoList".to_string());

        apply_typedef_corrections(&mut registry, &config, &diagnostics);

        assert!(registry.get("QFileInfoList").unwrap().meaning.is_none());
        assert!(diagnostics
            .warnings()
            .iter()
            .any(|d| d.message.contains("QFileInfo")));
    }

    #[test]
    fn test_noise_typedefs_are_dropped() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();
        registry.insert(
            "QList::Iterator".to_string(),
            RegistryEntry::declared(TypeKind::Typedef, "QList"),
            &diagnostics,
        );
        registry.insert(
            "QList::iterator_category".to_string(),
            RegistryEntry::declared(TypeKind::Typedef, "QList"),
            &diagnostics,
        );
        let mut config = CorpusConfig::default();
        config.dropped_typedef_suffixes = vec![
            "::ConstIterator".to_string(),
            "::Iterator".to_string(),
            "::iterator_category".to_string(),
        ];

        apply_typedef_corrections(&mut registry, &config, &diagnostics);

        assert!(registry.is_empty());
    }

    #[test]
    fn test_batched_unknown_typedef_warning() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();
        for name in ["ZAlias", "AAlias", "Excused"] {
            registry.insert(
                name.to_string(),
                RegistryEntry::declared(TypeKind::Typedef, "QtGlobal"),
                &diagnostics,
            );
        }
        let mut config = CorpusConfig::default();
        config.typedef_exceptions.push("Excused".to_string());

        apply_typedef_corrections(&mut registry, &config, &diagnostics);

        let batched: Vec<_> = diagnostics
            .warnings()
            .iter()
            .filter(|d| d.message.starts_with("Unknown typedefs:"))
            .map(|d| d.message.clone())
            .collect();
        assert_eq!(batched.len(), 1);
        assert!(batched[0].contains("AAlias\nZAlias"));
        assert!(!batched[0].contains("Excused"));
    }

    #[test]
    fn test_synthetic_override_and_literal_removal() {
        let diagnostics = Diagnostics::new();
        let mut registry = TypeRegistry::new();
        let mut entry = RegistryEntry::declared(TypeKind::Enum, "QCoreEvent");
        entry.values = vec![
            EnumValue {
                name: "None".to_string(),
                value: "0".to_string(),
                description: String::new(),
            },
            EnumValue {
                name: "EnterEditFocus".to_string(),
                value: "150".to_string(),
                description: String::new(),
            },
        ];
        registry.insert("QEvent::Type".to_string(), entry, &diagnostics);
        registry.insert(
            "QVariant::Type".to_string(),
            RegistryEntry::declared(TypeKind::Enum, "QVariant"),
            &diagnostics,
        );

        let mut config = CorpusConfig::default();
        config.synthetic_overrides.push("QVariant::Type".to_string());
        config
            .removed_enum_values
            .push(("QEvent::Type".to_string(), "EnterEditFocus".to_string()));

        apply_typedef_corrections(&mut registry, &config, &diagnostics);

        assert_eq!(
            registry.get("QVariant::Type").unwrap().origin,
            TypeOrigin::Synthetic
        );
        let values = &registry.get("QEvent::Type").unwrap().values;
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].name, "None");
    }
}
