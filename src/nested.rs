//! Nested type extraction: enum value lists and the types table of a page.
//!
//! Extraction runs in three steps. First every value-list table on the page is
//! collected into a map keyed by the nearest preceding anchor ending in `-enum`;
//! a page may split one enum's values across several tables, which are appended
//! under the same anchor. Then the types table is scanned twice: enum rows first,
//! attaching value lists through their link anchors and recording each link target,
//! then flags rows, which resolve their wrapped enum through the same link targets.
//! Other labels become placeholder declarations.
//!
//! Failures here are row-local or table-local: a literal with a foreign namespace
//! prefix drops that row, a value table without an anchor is skipped whole, an enum
//! row without a usable value table is skipped. Only a malformed row shape aborts
//! the document.

use std::collections::BTreeMap;

use crate::{
    config::CorpusConfig,
    diagnostics::{DiagnosticCategory, Diagnostics},
    document::{Document, Table},
    model::{EnumValue, NestedType, TypeKind},
    Error, Result,
};

/// Extracts the nested types of a document.
///
/// `namespace` is the enclosing class or namespace name; enum literals must carry
/// it as a prefix and it scopes the value-list blacklist. Global headers without a
/// namespace pass `None` and their literals are taken verbatim.
pub fn extract_nested_types(
    document: &Document,
    namespace: Option<&str>,
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
) -> Result<Vec<NestedType>> {
    let values_by_anchor = collect_value_lists(document, namespace, config, diagnostics)?;

    let table = match first_types_table(document, config) {
        Some(table) => table,
        None => return Ok(Vec::new()),
    };

    let mut nested = Vec::new();
    let mut enum_by_href: BTreeMap<String, String> = BTreeMap::new();

    // Enum rows first: flags rows reference enums through their link targets, and
    // the documentation may list a flags row before its enum.
    for row in &table.rows {
        if row.cells.len() != 2 {
            return Err(invalid_layout!(
                "types table row has {} cells, expected 2",
                row.cells.len()
            ));
        }
        if row.cells[0].text.trim() != "enum" {
            continue;
        }
        let name_cell = &row.cells[1];
        let name = name_cell
            .text
            .split('{')
            .next()
            .unwrap_or("")
            .trim()
            .to_string();
        match enum_values_for_row(name_cell.link.as_deref(), &values_by_anchor) {
            Ok((href, values)) => {
                nested.push(NestedType::enumeration(name.clone(), values.clone()));
                enum_by_href.insert(href.to_string(), name);
            }
            Err(error) => {
                diagnostics.warning(
                    DiagnosticCategory::Enum,
                    format!("Enum '{}' is skipped: {}", name, error),
                );
            }
        }
    }

    for row in &table.rows {
        let label = row.cells[0].text.trim();
        if label == "enum" {
            continue;
        }
        let name = row.cells[1].text.trim().to_string();
        if label == "flags" {
            let enum_name = row
                .cells[1]
                .link
                .as_deref()
                .and_then(|href| enum_by_href.get(href));
            match enum_name {
                Some(enum_name) => nested.push(NestedType::flags(name, enum_name.clone())),
                None => diagnostics.warning(
                    DiagnosticCategory::Enum,
                    format!("Flags '{}' is skipped: {}", name, Error::EnumValuesNotFound(name.clone())),
                ),
            }
            continue;
        }
        match TypeKind::from_label(label) {
            Some(kind) => nested.push(NestedType::placeholder(kind, name)),
            None => diagnostics.warning(
                DiagnosticCategory::Enum,
                format!("Type row '{}' with unknown kind '{}' is skipped", name, label),
            ),
        }
    }

    Ok(nested)
}

/// Collects every value-list table of the page into an anchor-keyed map.
fn collect_value_lists(
    document: &Document,
    namespace: Option<&str>,
    config: &CorpusConfig,
    diagnostics: &Diagnostics,
) -> Result<BTreeMap<String, Vec<EnumValue>>> {
    let mut values_by_anchor: BTreeMap<String, Vec<EnumValue>> = BTreeMap::new();

    for table in &document.value_lists {
        if is_value_list_blacklisted(table, namespace, config) {
            diagnostics.info(
                DiagnosticCategory::Enum,
                format!(
                    "Enum values table is skipped because it is blacklisted: {}",
                    document.name
                ),
            );
            continue;
        }

        let values = parse_value_rows(table, namespace, diagnostics)?;

        let anchor = document
            .anchors_before(table.position)
            .find(|anchor| anchor.name.ends_with("-enum"));
        match anchor {
            Some(anchor) => {
                values_by_anchor
                    .entry(anchor.name.clone())
                    .or_default()
                    .extend(values);
            }
            None => diagnostics.warning(
                DiagnosticCategory::Enum,
                format!("{}: {}", document.name, Error::MissingEnumAnchor),
            ),
        }
    }

    Ok(values_by_anchor)
}

fn parse_value_rows(
    table: &Table,
    namespace: Option<&str>,
    diagnostics: &Diagnostics,
) -> Result<Vec<EnumValue>> {
    let mut values: Vec<EnumValue> = Vec::new();

    for row in &table.rows {
        if row.header {
            continue;
        }
        if row.cells.len() != 2 && row.cells.len() != 3 {
            return Err(invalid_layout!(
                "value table row has {} cells, expected 2 or 3",
                row.cells.len()
            ));
        }
        let mut name = row.cells[0].text.trim().to_string();
        let value = row.cells[1].text.trim().to_string();
        let description = row
            .cells
            .get(2)
            .map(|cell| cell.text.clone())
            .unwrap_or_default();

        if let Some(namespace) = namespace {
            let prefix = format!("{}::", namespace);
            match name.strip_prefix(&prefix) {
                Some(stripped) => name = stripped.to_string(),
                None => {
                    diagnostics.warning(
                        DiagnosticCategory::Enum,
                        format!(
                            "Enum value is skipped: {}",
                            Error::NamespaceMismatch {
                                literal: name.clone(),
                                namespace: namespace.to_string(),
                            }
                        ),
                    );
                    continue;
                }
            }
        }

        if let Some(existing) = values.iter().find(|v| v.name == name) {
            diagnostics.warning(
                DiagnosticCategory::Enum,
                format!("Enum value {} is encountered multiple times", name),
            );
            if existing.value != value {
                diagnostics.warning(
                    DiagnosticCategory::Enum,
                    format!(
                        "Duplicate enum value {} carries conflicting values '{}' and '{}'",
                        name, existing.value, value
                    ),
                );
            }
            continue;
        }
        values.push(EnumValue {
            name,
            value,
            description,
        });
    }

    Ok(values)
}

fn is_value_list_blacklisted(
    table: &Table,
    namespace: Option<&str>,
    config: &CorpusConfig,
) -> bool {
    let namespace = match namespace {
        Some(namespace) => namespace,
        None => return false,
    };
    let heading = match &table.preceding_heading {
        Some(heading) => heading,
        None => return false,
    };
    config
        .value_list_blacklist
        .iter()
        .any(|(ns, h)| ns == namespace && h == heading)
}

fn first_types_table<'a>(document: &'a Document, config: &CorpusConfig) -> Option<&'a Table> {
    config
        .types_sections
        .iter()
        .find_map(|id| document.find_section(id))
}

fn enum_values_for_row<'a>(
    link: Option<&'a str>,
    values_by_anchor: &'a BTreeMap<String, Vec<EnumValue>>,
) -> std::result::Result<(&'a str, &'a Vec<EnumValue>), Error> {
    let href = link.ok_or_else(|| Error::EnumValuesNotFound("enum row without link".to_string()))?;
    let anchor = href
        .split('#')
        .nth(1)
        .ok_or_else(|| Error::EnumValuesNotFound(href.to_string()))?;
    let values = values_by_anchor
        .get(anchor)
        .ok_or_else(|| Error::EnumValuesNotFound(anchor.to_string()))?;
    Ok((href, values))
}
