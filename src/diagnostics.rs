//! Diagnostics collection for corpus parsing and resolution.
//!
//! This module provides types for collecting and reporting diagnostic messages during
//! documentation parsing. The corpus is semi-structured and frequently inconsistent, so
//! the pipeline runs in a lenient mode: offending declarations and documents are dropped
//! and reported here instead of aborting the batch.
//!
//! # Architecture
//!
//! One [`Diagnostics`] container is shared across the whole pipeline:
//! - **Declaration parsing**: skipped methods, unknown qualifiers
//! - **Nested type extraction**: orphaned value tables, duplicate enum literals
//! - **Type registry**: overwritten entries
//! - **Resolution**: unresolvable type names, typedefs without a meaning
//!
//! The container uses `boxcar::Vec` for thread-safe, lock-free append operations, so the
//! parallel per-document parse phase can report without synchronization overhead. The
//! collected entries are returned alongside the parsed model, decoupling diagnostics from
//! any process-wide logger state.
//!
//! # Usage Examples
//!
//! ```rust
//! use apiscope::diagnostics::{Diagnostics, DiagnosticCategory};
//!
//! let diagnostics = Diagnostics::new();
//!
//! diagnostics.warning(
//!     DiagnosticCategory::Declaration,
//!     "Method is skipped: 'void f(int***)': too much indirection",
//! );
//!
//! if diagnostics.has_warnings() {
//!     println!("{}", diagnostics.summary());
//! }
//! ```

use std::fmt::{self, Write};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Informational message, not indicating a problem.
    ///
    /// Used for noting unusual but valid constructs, e.g. a pruned unused typedef.
    Info,

    /// Warning about potentially problematic documentation.
    ///
    /// The document is still part of the output, but a declaration may have been
    /// dropped, a duplicate may have been deduplicated, or a registry entry may have
    /// been overwritten.
    Warning,

    /// Error indicating a document that could not be used at all.
    ///
    /// The document is excluded from the output; the batch continues.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Category indicating the source or type of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Issues with whole-document layout.
    ///
    /// Examples: missing title, missing expected table, malformed row.
    Document,

    /// Issues with a single method or field declaration.
    ///
    /// Examples: unsupported indirection, unrecognized qualifiers, missing return type.
    Declaration,

    /// Issues with nested type and enum extraction.
    ///
    /// Examples: value table without anchor, duplicate literals, enum without values.
    Enum,

    /// Issues with type registry population.
    ///
    /// Examples: overwritten entries, classes without methods.
    Registry,

    /// Issues with cross-reference type resolution.
    ///
    /// Examples: unresolvable type names.
    Type,

    /// Issues with typedef meaning assignment.
    ///
    /// Examples: meanings referencing unregistered types, typedefs without a meaning.
    Typedef,

    /// General pipeline issues not fitting other categories.
    General,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Document => write!(f, "Document"),
            DiagnosticCategory::Declaration => write!(f, "Declaration"),
            DiagnosticCategory::Enum => write!(f, "Enum"),
            DiagnosticCategory::Registry => write!(f, "Registry"),
            DiagnosticCategory::Type => write!(f, "Type"),
            DiagnosticCategory::Typedef => write!(f, "Typedef"),
            DiagnosticCategory::General => write!(f, "General"),
        }
    }
}

/// A single diagnostic entry with context information.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional name of the document the issue was found in.
    pub document: Option<String>,

    /// Optional raw declaration text related to the issue.
    pub declaration: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `severity` - Severity level of the diagnostic
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            document: None,
            declaration: None,
        }
    }

    /// Adds the owning document name to the diagnostic.
    #[must_use]
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    /// Adds the raw declaration text to the diagnostic.
    #[must_use]
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(document) = &self.document {
            write!(f, " (document: {})", document)?;
        }

        if let Some(declaration) = &self.declaration {
            write!(f, " (declaration: '{}')", declaration)?;
        }

        Ok(())
    }
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations, so the
/// parallel document parse phase can share one container without coordination.
///
/// # Example
///
/// ```rust
/// use apiscope::diagnostics::{Diagnostics, DiagnosticCategory};
/// use std::sync::Arc;
///
/// let diagnostics = Arc::new(Diagnostics::new());
///
/// let diag_clone = Arc::clone(&diagnostics);
/// std::thread::spawn(move || {
///     diag_clone.warning(DiagnosticCategory::Declaration, "Method is skipped");
/// });
///
/// diagnostics.error(DiagnosticCategory::Document, "Invalid layout");
/// ```
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds an informational diagnostic.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Adds a warning diagnostic.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Adds an error diagnostic.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Adds a diagnostic entry directly.
    ///
    /// Use this for diagnostics that need additional context like the document name
    /// or the raw declaration text.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns true if any warning-level diagnostics have been collected.
    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Warning)
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Error)
            .count()
    }

    /// Returns the number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Returns an iterator over all diagnostics.
    ///
    /// Note: Uses boxcar's iterator which yields `(index, &Diagnostic)` tuples.
    /// The index can be ignored in most cases.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns all errors as a vector.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Error)
            .map(|(_, d)| d)
            .collect()
    }

    /// Returns all warnings as a vector.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == DiagnosticSeverity::Warning)
            .map(|(_, d)| d)
            .collect()
    }

    /// Returns diagnostics filtered by category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.category == category)
            .map(|(_, d)| d)
            .collect()
    }

    /// Formats a summary of all diagnostics for display.
    ///
    /// Groups diagnostics by severity for readable output.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let error_count = self.error_count();
        let warning_count = self.warning_count();

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s)",
            error_count, warning_count
        );

        if error_count > 0 {
            output.push_str("\nErrors:\n");
            for diag in self.errors() {
                let _ = writeln!(output, "  {diag}");
            }
        }

        if warning_count > 0 {
            output.push_str("\nWarnings:\n");
            for diag in self.warnings() {
                let _ = writeln!(output, "  {diag}");
            }
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
