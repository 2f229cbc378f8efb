//! Declaration table parsing: methods, variables, operators, typedefs and macros.
//!
//! A method section is a two-column table: the left cell holds the return type
//! (or `typedef`, or nothing), the right cell holds the signature. Parsing a row
//! can fail in many documented ways; every such failure is declaration-local: the
//! row is reported as a warning carrying the offending signature text and the rest
//! of the section is still processed. Only a structurally broken table (a row with
//! the wrong number of cells) aborts the whole document.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    config::SectionSpec,
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    document::{Document, Table},
    signature::{parse_argument, parse_type, split_arguments, Method, MethodScope},
    Error, Result,
};

/// Matches a signature cell that is a bare identifier, i.e. a variable declaration.
static BARE_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("valid regex"));

/// Parses one method section of a document.
///
/// `class_name` is the unqualified class name used for constructor and destructor
/// detection; it is `None` for global pages and for sections whose declarations are
/// not class members. Returns an empty list when the document has no such section.
pub fn parse_section(
    document: &Document,
    section: &SectionSpec,
    class_name: Option<&str>,
    diagnostics: &Diagnostics,
) -> Result<Vec<Method>> {
    let table = match document.find_section(&section.id) {
        Some(table) => table,
        None => return Ok(Vec::new()),
    };
    parse_method_table(table, section, class_name, diagnostics, &document.name)
}

fn parse_method_table(
    table: &Table,
    section: &SectionSpec,
    class_name: Option<&str>,
    diagnostics: &Diagnostics,
    document_name: &str,
) -> Result<Vec<Method>> {
    let mut methods = Vec::new();
    for row in &table.rows {
        if row.cells.len() != 2 {
            return Err(invalid_layout!(
                "method table row has {} cells, expected 2",
                row.cells.len()
            ));
        }
        let return_type_text = row.cells[0].text.trim();
        let signature = row.cells[1].text.trim();
        if return_type_text == "typedef" {
            continue;
        }
        match parse_declaration(return_type_text, signature, section, class_name) {
            Ok(method) => methods.push(method),
            Err(error) => {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Warning,
                        DiagnosticCategory::Declaration,
                        format!("Method is skipped: '{}': {}", signature, error),
                    )
                    .with_document(document_name)
                    .with_declaration(signature),
                );
            }
        }
    }
    Ok(methods)
}

/// Parses a single declaration row into a descriptor.
fn parse_declaration(
    return_type_text: &str,
    signature: &str,
    section: &SectionSpec,
    class_name: Option<&str>,
) -> Result<Method> {
    let scope = if class_name.is_some() {
        MethodScope::Class
    } else {
        MethodScope::Global
    };
    let mut method = Method::new(String::new(), scope);
    method.is_protected = section.protected;
    method.is_static = section.is_static;
    method.is_signal = section.signal;
    method.is_slot = section.slot;

    let mut return_type_text = return_type_text;
    if let Some(rest) = return_type_text.strip_prefix("virtual") {
        method.is_virtual = true;
        return_type_text = rest.trim();
    }
    if !return_type_text.is_empty() {
        method.return_type = Some(parse_type(return_type_text)?);
    }

    if BARE_NAME_RE.is_match(signature) {
        // A bare identifier in the signature cell is a variable declaration; its
        // type comes from the return type column.
        method.name = signature.to_string();
        method.is_variable = true;
        method.variable_type = match method.return_type.take() {
            Some(t) => Some(t),
            None => return Err(Error::MissingReturnType(signature.to_string())),
        };
        return Ok(method);
    }

    // `operator()` contains parentheses in its name; the argument list starts at
    // the next opening parenthesis.
    let search_from = if signature.starts_with("operator()") {
        "operator()".len()
    } else {
        0
    };
    let name_end = signature[search_from..]
        .find('(')
        .map(|i| i + search_from)
        .ok_or_else(|| Error::InvalidSignature(signature.to_string()))?;
    method.name = signature[..name_end].trim().to_string();

    let after_name = signature[name_end + 1..].trim();
    let (arguments_text, suffix) = after_name
        .rsplit_once(')')
        .ok_or_else(|| Error::InvalidSignature(signature.to_string()))?;

    for part in split_arguments(arguments_text.trim()) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part == "..." {
            method.variadic = true;
        } else {
            method.arguments.push(parse_argument(part)?);
        }
    }

    let mut suffix = suffix;
    if let Some(rest) = suffix.strip_suffix(" = 0") {
        method.is_pure_virtual = true;
        suffix = rest;
    }
    if let Some(rest) = suffix.strip_suffix(" const") {
        method.is_const = true;
        suffix = rest;
    }
    if !suffix.is_empty() {
        return Err(Error::UnrecognizedQualifier(suffix.to_string()));
    }

    if let Some(rest) = method.name.strip_prefix("operator") {
        method.operator_suffix = Some(rest.trim().to_string());
    }

    if let Some(class_name) = class_name {
        if method.name == class_name {
            method.is_constructor = true;
            if method.return_type.is_some() {
                return Err(Error::ReturnTypeNotAllowed(signature.to_string()));
            }
        } else if method.name.strip_prefix('~') == Some(class_name) {
            method.is_destructor = true;
            if method.return_type.is_some() {
                return Err(Error::ReturnTypeNotAllowed(signature.to_string()));
            }
        } else if method.operator_suffix.is_none() && method.return_type.is_none() {
            // Operators may legitimately omit a return type; everything else
            // must declare one.
            return Err(Error::MissingReturnType(signature.to_string()));
        }
    }

    Ok(method)
}

/// Collects typedef names from a section's declaration table.
///
/// Typedef rows carry the literal `typedef` in the return type cell and the bare
/// name in the signature cell; they are skipped by method parsing and picked up
/// here instead.
pub fn collect_related_typedefs(document: &Document, section_id: &str) -> Result<Vec<String>> {
    let table = match document.find_section(section_id) {
        Some(table) => table,
        None => return Ok(Vec::new()),
    };
    let mut typedefs = Vec::new();
    for row in &table.rows {
        if row.cells.len() != 2 {
            return Err(invalid_layout!(
                "typedef table row has {} cells, expected 2",
                row.cells.len()
            ));
        }
        if row.cells[0].text.trim() == "typedef" {
            typedefs.push(row.cells[1].text.trim().to_string());
        }
    }
    Ok(typedefs)
}

/// Collects macro rows verbatim from a macro section, one string per row.
pub fn collect_macros(document: &Document, section_id: &str) -> Vec<String> {
    let table = match document.find_section(section_id) {
        Some(table) => table,
        None => return Vec::new(),
    };
    table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| cell.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Section, Table, TableRow};

    fn document_with_section(id: &str, rows: Vec<TableRow>) -> Document {
        let table = Table::new(0, rows);
        let mut document = Document::new("test.html", "Test Class");
        document.sections.push(Section {
            id: id.to_string(),
            table,
        });
        document
    }

    fn public_functions() -> SectionSpec {
        SectionSpec::new("public-functions")
    }

    #[test]
    fn test_parses_plain_method() {
        let document = document_with_section(
            "public-functions",
            vec![TableRow::from_texts(&["int", "size() const"])],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QList"), &diagnostics).unwrap();

        assert_eq!(methods.len(), 1);
        let m = &methods[0];
        assert_eq!(m.name, "size");
        assert!(m.is_const);
        assert_eq!(m.return_type.as_ref().unwrap().base, "int");
        assert!(m.arguments.is_empty());
        assert!(!diagnostics.has_warnings());
    }

    #[test]
    fn test_constructor_and_destructor_detection() {
        let document = document_with_section(
            "public-functions",
            vec![
                TableRow::from_texts(&["", "QPoint(int x, int y)"]),
                TableRow::from_texts(&["", "~QPoint()"]),
            ],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QPoint"), &diagnostics).unwrap();

        assert!(methods[0].is_constructor);
        assert_eq!(methods[0].arguments.len(), 2);
        assert!(methods[1].is_destructor);
        assert_eq!(methods[1].name, "~QPoint");
    }

    #[test]
    fn test_constructor_with_return_type_is_dropped() {
        let document = document_with_section(
            "public-functions",
            vec![TableRow::from_texts(&["int", "QPoint()"])],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QPoint"), &diagnostics).unwrap();

        assert!(methods.is_empty());
        assert!(diagnostics.has_warnings());
    }

    #[test]
    fn test_virtual_and_pure_virtual() {
        let document = document_with_section(
            "public-functions",
            vec![TableRow::from_texts(&["virtual bool", "event(QEvent *e) = 0"])],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QObject"), &diagnostics).unwrap();

        let m = &methods[0];
        assert!(m.is_virtual);
        assert!(m.is_pure_virtual);
        assert!(!m.is_const);
        assert_eq!(m.arguments[0].name, "e");
    }

    #[test]
    fn test_operator_call_and_operator_suffix() {
        let document = document_with_section(
            "public-functions",
            vec![
                TableRow::from_texts(&["T &", "operator()(int index)"]),
                TableRow::from_texts(&["bool", "operator==(const QPoint &other) const"]),
                TableRow::from_texts(&["", "operator QVariant()"]),
            ],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QPoint"), &diagnostics).unwrap();

        assert_eq!(methods[0].operator_suffix.as_deref(), Some("()"));
        assert_eq!(methods[1].operator_suffix.as_deref(), Some("=="));
        assert!(methods[1].is_const);
        // Conversion operators have no return type and that is accepted.
        assert_eq!(methods[2].operator_suffix.as_deref(), Some("QVariant"));
        assert!(methods[2].return_type.is_none());
    }

    #[test]
    fn test_variable_declaration() {
        let document = document_with_section(
            "public-functions",
            vec![TableRow::from_texts(&["const int", "MaxSize"])],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QArray"), &diagnostics).unwrap();

        let m = &methods[0];
        assert!(m.is_variable);
        assert!(m.return_type.is_none());
        assert_eq!(m.variable_type.as_ref().unwrap().base, "int");
        assert!(m.variable_type.as_ref().unwrap().is_const);
    }

    #[test]
    fn test_variable_without_type_is_dropped() {
        let document = document_with_section(
            "public-functions",
            vec![TableRow::from_texts(&["", "MaxSize"])],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QArray"), &diagnostics).unwrap();

        assert!(methods.is_empty());
        assert!(diagnostics.has_warnings());
    }

    #[test]
    fn test_callable_without_return_type_is_dropped() {
        let document = document_with_section(
            "public-functions",
            vec![
                TableRow::from_texts(&["", "doThing(int x)"]),
                TableRow::from_texts(&["void", "fine()"]),
            ],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QFoo"), &diagnostics).unwrap();

        // Not a constructor, destructor or operator, so the missing return type
        // drops the declaration; the rest of the section is unaffected.
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "fine");
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics
            .warnings()
            .iter()
            .any(|d| d.message.contains("No return type")));
    }

    #[test]
    fn test_macro_rows_collected_verbatim() {
        let document = document_with_section(
            "macros",
            vec![
                TableRow::from_texts(&["Q_ASSERT(bool test)"]),
                TableRow::from_texts(&["Q_UNUSED(name)"]),
            ],
        );

        let macros = collect_macros(&document, "macros");
        assert_eq!(macros, vec!["Q_ASSERT(bool test)", "Q_UNUSED(name)"]);
    }

    #[test]
    fn test_variadic_arguments() {
        let document = document_with_section(
            "Functions",
            vec![TableRow::from_texts(&[
                "QString",
                "asprintf(const char *format, ...)",
            ])],
        );
        let diagnostics = Diagnostics::new();
        let section = SectionSpec::new("Functions").global();
        let methods = parse_section(&document, &section, None, &diagnostics).unwrap();

        let m = &methods[0];
        assert_eq!(m.scope, MethodScope::Global);
        assert!(m.variadic);
        assert_eq!(m.arguments.len(), 1);
    }

    #[test]
    fn test_bad_row_skipped_good_row_kept() {
        let document = document_with_section(
            "public-functions",
            vec![
                TableRow::from_texts(&["void***", "tooIndirect()"]),
                TableRow::from_texts(&["void", "fine()"]),
            ],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QFoo"), &diagnostics).unwrap();

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "fine");
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_unprocessed_suffix_is_declaration_local() {
        let document = document_with_section(
            "public-functions",
            vec![TableRow::from_texts(&["void", "f() noexcept"])],
        );
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QFoo"), &diagnostics).unwrap();

        assert!(methods.is_empty());
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_wrong_cell_count_aborts_document() {
        let document = document_with_section(
            "public-functions",
            vec![TableRow::from_texts(&["void", "f()", "extra"])],
        );
        let diagnostics = Diagnostics::new();
        let result = parse_section(&document, &public_functions(), Some("QFoo"), &diagnostics);

        assert!(matches!(result, Err(Error::InvalidLayout { .. })));
    }

    #[test]
    fn test_typedef_rows_collected_separately() {
        let document = document_with_section(
            "related-non-members",
            vec![
                TableRow::from_texts(&["typedef", "QObjectList"]),
                TableRow::from_texts(&["bool", "operator!=(const QPoint &p1, const QPoint &p2)"]),
            ],
        );
        let diagnostics = Diagnostics::new();
        let section = SectionSpec::new("related-non-members").global();
        let methods = parse_section(&document, &section, None, &diagnostics).unwrap();
        let typedefs = collect_related_typedefs(&document, "related-non-members").unwrap();

        assert_eq!(methods.len(), 1);
        assert_eq!(typedefs, vec!["QObjectList"]);
    }

    #[test]
    fn test_missing_section_yields_empty() {
        let document = Document::new("test.html", "Test Class");
        let diagnostics = Diagnostics::new();
        let methods =
            parse_section(&document, &public_functions(), Some("QFoo"), &diagnostics).unwrap();
        assert!(methods.is_empty());
        assert!(collect_macros(&document, "macros").is_empty());
    }
}
