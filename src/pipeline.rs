//! The extraction pipeline: per-document parsing and whole-corpus assembly.
//!
//! [`parse_document`] turns one [`Document`] into a [`HeaderModel`]; documents are
//! independent, so [`process`] parses them in parallel with rayon while keeping the
//! input order in the output. Everything after parsing needs the whole corpus at
//! once and runs sequentially: registry population, cross-reference resolution,
//! typedef pruning and the late correction passes.
//!
//! A document that fails layout parsing is reported and excluded; the batch always
//! completes.

use rayon::prelude::*;

use crate::{
    config::CorpusConfig,
    declaration::{collect_macros, collect_related_typedefs, parse_section},
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    document::Document,
    model::{ApiModel, HeaderKind, HeaderModel, NestedType, TypeKind},
    nested::extract_nested_types,
    signature::parse_type,
    typesystem::{apply_typedef_corrections, CrossReferenceResolver, TypeRegistry},
    Result,
};

/// Parses one document into a header model.
///
/// The page kind is decided from the title: `<Header> ...` titles and configured
/// namespace pages are global headers, `Name Class` titles are class pages, and
/// anything else is a layout error.
pub fn parse_document(
    document: &Document,
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
) -> Result<HeaderModel> {
    let title = document.title.trim();

    if let Some((_, namespace)) = config
        .namespace_documents
        .iter()
        .find(|(page_title, _)| page_title == title)
    {
        return parse_global_page(document, config, diagnostics, namespace, Some(namespace));
    }

    if let Some(rest) = title.strip_prefix('<') {
        let header = rest
            .split('>')
            .next()
            .filter(|header| !header.is_empty())
            .ok_or_else(|| invalid_layout!("invalid global header title '{}'", title))?;
        return parse_global_page(document, config, diagnostics, header, None);
    }

    let title_parts: Vec<&str> = title.split(' ').collect();
    if title_parts.len() == 2 && title_parts[1].trim() == "Class" {
        return parse_class_page(document, config, diagnostics, title_parts[0].trim());
    }

    Err(invalid_layout!(
        "unsupported title value in {}: '{}'",
        document.name,
        title
    ))
}

fn parse_global_page(
    document: &Document,
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
    header: &str,
    namespace: Option<&str>,
) -> Result<HeaderModel> {
    let mut model = HeaderModel::new(HeaderKind::Global, header);
    model.macros = first_macro_section(document, config);
    model.nested_types = extract_nested_types(document, namespace, config, diagnostics)?;
    model.nested_types_namespace = namespace.map(str::to_string);

    for section_id in &config.global_sections {
        let section = crate::config::SectionSpec::new(section_id.clone()).global();
        model
            .methods
            .extend(parse_section(document, &section, None, diagnostics)?);
    }

    Ok(model)
}

fn parse_class_page(
    document: &Document,
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
    class_without_namespace: &str,
) -> Result<HeaderModel> {
    // Pages for nested classes carry the fully qualified name in a subtitle; the
    // include file is then the outermost class.
    let class_name = document
        .subtitle
        .as_deref()
        .map(|subtitle| subtitle.trim_matches(|c| c == ' ' || c == '(' || c == ')').to_string())
        .unwrap_or_else(|| class_without_namespace.to_string());
    let header = class_name
        .split("::")
        .next()
        .unwrap_or(class_without_namespace)
        .to_string();

    if let Some(prefix) = &config.class_prefix {
        if !class_name.starts_with(prefix.as_str()) {
            diagnostics.warning(
                DiagnosticCategory::Document,
                format!(
                    "{}: class {} doesn't start with {}",
                    document.name, class_name, prefix
                ),
            );
        }
    }

    let mut model = HeaderModel::new(HeaderKind::Class, header);
    model.nested_types = extract_nested_types(document, Some(&class_name), config, diagnostics)?;
    model.nested_types_namespace = Some(class_name.clone());
    model.inherits = parse_inherits(document)?;
    model.class_name = Some(class_name.clone());

    if let Some(section_id) = &config.related_typedef_section {
        for typedef in collect_related_typedefs(document, section_id)? {
            let blacklisted = config
                .related_typedef_blacklist
                .iter()
                .any(|(class, name)| class == &class_name && name == &typedef);
            if blacklisted {
                diagnostics.info(
                    DiagnosticCategory::Typedef,
                    format!(
                        "Typedef {} on {} is in fact nested and is skipped here",
                        typedef, class_name
                    ),
                );
            } else {
                model
                    .non_nested_types
                    .push(NestedType::placeholder(TypeKind::Typedef, typedef));
            }
        }
    }

    for section in &config.method_sections {
        let class_for_section = section.class_scope.then_some(class_without_namespace);
        model
            .methods
            .extend(parse_section(document, section, class_for_section, diagnostics)?);
    }

    model.macros = first_macro_section(document, config);

    for (target_header, extra) in &config.extra_nested_types {
        if target_header == &model.header {
            model.nested_types.push(extra.clone());
        }
    }
    for (target_header, extra) in &config.extra_non_nested_types {
        if target_header == &model.header {
            model.non_nested_types.push(extra.clone());
        }
    }

    Ok(model)
}

/// Reads the base class from the summary table's `Inherits:` row, if present.
fn parse_inherits(document: &Document) -> Result<Option<crate::signature::TypeRef>> {
    let summary = match &document.summary {
        Some(summary) => summary,
        None => return Ok(None),
    };
    for row in &summary.rows {
        if row.cells.len() != 2 {
            continue;
        }
        if row.cells[0].text.trim() != "Inherits:" {
            continue;
        }
        // An inherits row without a link carries no usable class reference.
        if row.cells[1].link.is_none() {
            return Ok(None);
        }
        return parse_type(row.cells[1].text.trim()).map(Some);
    }
    Ok(None)
}

fn first_macro_section(document: &Document, config: &CorpusConfig) -> Vec<String> {
    config
        .macro_sections
        .iter()
        .map(|id| collect_macros(document, id))
        .find(|macros| !macros.is_empty())
        .unwrap_or_default()
}

/// Runs the complete pipeline over a batch of documents.
///
/// Blacklisted documents are skipped up front; the rest are parsed in parallel.
/// The corpus-wide phases then run over the surviving header models: the registry
/// is seeded and populated, every type reference is rewritten to its canonical
/// name, unreferenced typedefs are pruned, and the late typedef corrections are
/// applied. The returned model is deterministic for a given input order.
pub fn process(
    documents: &[Document],
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
) -> ApiModel {
    let mut headers: Vec<HeaderModel> = documents
        .par_iter()
        .filter(|document| {
            if config.is_document_blacklisted(&document.name) {
                diagnostics.info(
                    DiagnosticCategory::Document,
                    format!("File is skipped because it is blacklisted: {}", document.name),
                );
                false
            } else {
                true
            }
        })
        .filter_map(|document| match parse_document(document, config, diagnostics) {
            Ok(model) => Some(model),
            Err(error) => {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Error,
                        DiagnosticCategory::Document,
                        format!("Parse error: {}: {}", document.name, error),
                    )
                    .with_document(&document.name),
                );
                None
            }
        })
        .collect();

    let mut registry = TypeRegistry::with_known_types(config, diagnostics);
    registry.populate_from_headers(&headers, diagnostics);

    let mut resolver = CrossReferenceResolver::new(&registry, config, diagnostics);
    resolver.resolve_headers(&mut headers);
    let used = resolver.into_used_types();

    // Registry entries were populated before resolution; re-sync their inherits
    // clauses to the canonical names the resolver produced.
    for header in &headers {
        if let (Some(class_name), Some(inherits)) = (&header.class_name, &header.inherits) {
            if let Some(entry) = registry.get_mut(class_name) {
                entry.inherits = Some(inherits.clone());
            }
        }
    }

    registry.prune_unused_typedefs(&used, diagnostics);
    apply_typedef_corrections(&mut registry, config, diagnostics);

    ApiModel {
        headers,
        type_registry: registry.into_entries(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, Section, Table, TableRow};

    fn class_document(name: &str, class: &str) -> Document {
        let mut document = Document::new(name, format!("{} Class", class));
        document.sections.push(Section {
            id: "public-functions".to_string(),
            table: Table::new(
                1,
                vec![TableRow::from_texts(&["int", "value() const"])],
            ),
        });
        document
    }

    #[test]
    fn test_class_page_basics() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let document = class_document("qpoint.html", "QPoint");

        let model = parse_document(&document, &config, &diagnostics).unwrap();

        assert_eq!(model.kind, HeaderKind::Class);
        assert_eq!(model.header, "QPoint");
        assert_eq!(model.class_name.as_deref(), Some("QPoint"));
        assert_eq!(model.methods.len(), 1);
        assert_eq!(model.methods[0].name, "value");
    }

    #[test]
    fn test_subtitle_overrides_class_and_header() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let mut document = class_document("qhash-iterator.html", "iterator");
        document.subtitle = Some(" (QHash::iterator) ".to_string());

        let model = parse_document(&document, &config, &diagnostics).unwrap();

        assert_eq!(model.class_name.as_deref(), Some("QHash::iterator"));
        assert_eq!(model.header, "QHash");
    }

    #[test]
    fn test_global_header_title() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let mut document = Document::new("qtglobal.html", "<QtGlobal> - Global Qt Declarations");
        document.sections.push(Section {
            id: "Functions".to_string(),
            table: Table::new(
                1,
                vec![TableRow::from_texts(&["int", "qRound(double value)"])],
            ),
        });

        let model = parse_document(&document, &config, &diagnostics).unwrap();

        assert_eq!(model.kind, HeaderKind::Global);
        assert_eq!(model.header, "QtGlobal");
        assert!(model.class_name.is_none());
        assert_eq!(model.methods.len(), 1);
        assert_eq!(
            model.methods[0].scope,
            crate::signature::MethodScope::Global
        );
    }

    #[test]
    fn test_namespace_document() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let document = Document::new("qt.html", "Qt Namespace");

        let model = parse_document(&document, &config, &diagnostics).unwrap();

        assert_eq!(model.kind, HeaderKind::Global);
        assert_eq!(model.header, "Qt");
        assert_eq!(model.nested_types_namespace.as_deref(), Some("Qt"));
    }

    #[test]
    fn test_unsupported_title_is_layout_error() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let document = Document::new("overview.html", "Threading Overview");

        let result = parse_document(&document, &config, &diagnostics);
        assert!(matches!(result, Err(crate::Error::InvalidLayout { .. })));
    }

    #[test]
    fn test_inherits_row_requires_link() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let mut document = class_document("qfile.html", "QFile");
        document.summary = Some(Table::new(
            0,
            vec![TableRow::new(vec![
                Cell::text("Inherits:"),
                Cell::linked("QFileDevice", "qfiledevice.html"),
            ])],
        ));

        let model = parse_document(&document, &config, &diagnostics).unwrap();
        assert_eq!(model.inherits.as_ref().unwrap().base, "QFileDevice");

        document.summary = Some(Table::new(
            0,
            vec![TableRow::from_texts(&["Inherits:", "plain text"])],
        ));
        let model = parse_document(&document, &config, &diagnostics).unwrap();
        assert!(model.inherits.is_none());
    }

    #[test]
    fn test_class_prefix_warning() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let document = class_document("misc.html", "Widget");

        parse_document(&document, &config, &diagnostics).unwrap();

        assert!(diagnostics
            .warnings()
            .iter()
            .any(|d| d.message.contains("doesn't start with Q")));
    }

    #[test]
    fn test_related_typedef_blacklist() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let mut document = class_document("qtimezone.html", "QTimeZone");
        document.sections.push(Section {
            id: "related-non-members".to_string(),
            table: Table::new(
                2,
                vec![
                    TableRow::from_texts(&["typedef", "OffsetDataList"]),
                    TableRow::from_texts(&["typedef", "SomethingElse"]),
                ],
            ),
        });

        let model = parse_document(&document, &config, &diagnostics).unwrap();

        let names: Vec<&str> = model
            .non_nested_types
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert!(!names.contains(&"OffsetDataList"));
        assert!(names.contains(&"SomethingElse"));
    }

    #[test]
    fn test_extra_types_injected_by_header() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let document = class_document("qbytearray.html", "QByteArray");

        let model = parse_document(&document, &config, &diagnostics).unwrap();

        assert!(model
            .nested_types
            .iter()
            .any(|t| t.name == "iterator" && t.kind == TypeKind::Typedef));
        assert!(model
            .non_nested_types
            .iter()
            .any(|t| t.name == "QByteRef" && t.kind == TypeKind::Class));
    }

    #[test]
    fn test_macro_section_lands_in_model() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let mut document = class_document("qtglobal.html", "QtGlobal");
        document.sections.push(Section {
            id: "macros".to_string(),
            table: Table::new(
                3,
                vec![TableRow::from_texts(&["Q_ASSERT(bool test)"])],
            ),
        });

        let model = parse_document(&document, &config, &diagnostics).unwrap();

        assert_eq!(model.macros, vec!["Q_ASSERT(bool test)"]);
    }

    #[test]
    fn test_process_skips_blacklisted_and_broken_documents() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let documents = vec![
            class_document("qpoint.html", "QPoint"),
            Document::new("qstring-members.html", "List of All Members for QString"),
            Document::new("broken.html", "Something Unexpected"),
        ];

        let model = process(&documents, &config, &diagnostics);

        assert_eq!(model.headers.len(), 1);
        assert_eq!(model.headers[0].class_name.as_deref(), Some("QPoint"));
        assert_eq!(diagnostics.error_count(), 1);
        assert!(model.type_registry.contains_key("QPoint"));
        assert!(model.type_registry.contains_key("int"));
    }

    #[test]
    fn test_process_output_order_matches_input_order() {
        let config = CorpusConfig::qt();
        let diagnostics = Diagnostics::new();
        let documents = vec![
            class_document("qzebra.html", "QZebra"),
            class_document("qaardvark.html", "QAardvark"),
        ];

        let model = process(&documents, &config, &diagnostics);

        let classes: Vec<&str> = model
            .headers
            .iter()
            .filter_map(|h| h.class_name.as_deref())
            .collect();
        assert_eq!(classes, vec!["QZebra", "QAardvark"]);
    }
}
