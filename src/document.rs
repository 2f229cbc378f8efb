//! Input model handed to the core by the document traversal layer.
//!
//! The core never touches markup. An external traversal layer (out of scope for this
//! crate) walks each documentation page and extracts the pieces the parsers need:
//! plain-text table rows with optional hyperlink targets, anchor positions, and the
//! page title. This module defines those records and the two lookups the parsers use,
//! [`Document::find_section`] and [`Document::anchors_before`].
//!
//! Positions are abstract document offsets. Their only requirement is that they grow
//! in document order, so that "the nearest anchor preceding this table" is well
//! defined.
//!
//! # Example
//!
//! ```rust
//! use apiscope::document::{Cell, Document, Section, Table, TableRow};
//!
//! let mut document = Document::new("qpoint.html", "QPoint Class");
//! document.sections.push(Section {
//!     id: "public-functions".to_string(),
//!     table: Table::new(
//!         10,
//!         vec![TableRow::new(vec![Cell::text("int"), Cell::text("x() const")])],
//!     ),
//! });
//!
//! assert!(document.find_section("public-functions").is_some());
//! assert!(document.find_section("signals").is_none());
//! ```

/// One table cell: plain text plus an optional hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The cell text with markup stripped, whitespace preserved.
    pub text: String,
    /// Hyperlink target of the first link inside the cell, if any.
    pub link: Option<String>,
}

impl Cell {
    /// Creates a plain text cell without a link.
    pub fn text(text: impl Into<String>) -> Self {
        Cell {
            text: text.into(),
            link: None,
        }
    }

    /// Creates a cell carrying a hyperlink target.
    pub fn linked(text: impl Into<String>, link: impl Into<String>) -> Self {
        Cell {
            text: text.into(),
            link: Some(link.into()),
        }
    }
}

/// One table row as an ordered sequence of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// The cells of this row, in document order.
    pub cells: Vec<Cell>,
    /// True for header rows (`<th>` cells); value parsers skip these.
    pub header: bool,
}

impl TableRow {
    /// Creates a body row from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        TableRow {
            cells,
            header: false,
        }
    }

    /// Creates a header row from cells.
    pub fn header(cells: Vec<Cell>) -> Self {
        TableRow {
            cells,
            header: true,
        }
    }

    /// Creates a body row of plain text cells. Convenience for tests and simple tables.
    pub fn from_texts(texts: &[&str]) -> Self {
        TableRow::new(texts.iter().copied().map(Cell::text).collect())
    }
}

/// A table extracted from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Document-order position of the table, used for anchor lookups.
    pub position: usize,
    /// Identifier of the nearest heading preceding the table, if any.
    ///
    /// Used by the value-list blacklist: some value tables only make sense under a
    /// specific heading and must be skipped elsewhere.
    pub preceding_heading: Option<String>,
    /// The rows of this table, in document order.
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Creates a table at the given document position.
    pub fn new(position: usize, rows: Vec<TableRow>) -> Self {
        Table {
            position,
            preceding_heading: None,
            rows,
        }
    }

    /// Sets the identifier of the nearest preceding heading.
    #[must_use]
    pub fn with_preceding_heading(mut self, heading: impl Into<String>) -> Self {
        self.preceding_heading = Some(heading.into());
        self
    }
}

/// A named anchor at a document position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Document-order position of the anchor.
    pub position: usize,
    /// The anchor identifier, e.g. `OpenMode-enum`.
    pub name: String,
}

/// A section of the document: a heading identifier and the table that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The heading identifier, e.g. `public-functions`.
    pub id: String,
    /// The first table following the heading.
    pub table: Table,
}

/// One documentation page, reduced to the records the core consumes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Source identifier of the document (file name), used in diagnostics.
    pub name: String,
    /// The page title text, e.g. `QByteArray Class` or `<QtGlobal> - ...`.
    pub title: String,
    /// The fully qualified class name when the page carries a subtitle, e.g.
    /// `QProcessEnvironment::Iterator` for pages documenting nested classes.
    pub subtitle: Option<String>,
    /// The class summary table carrying rows like `Inherits:`, if present.
    pub summary: Option<Table>,
    /// All heading sections of the page with their tables.
    pub sections: Vec<Section>,
    /// All enum value-list tables of the page, in document order.
    pub value_lists: Vec<Table>,
    /// All named anchors of the page, in document order.
    pub anchors: Vec<Anchor>,
}

impl Document {
    /// Creates an empty document with a source name and title.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Document {
            name: name.into(),
            title: title.into(),
            ..Document::default()
        }
    }

    /// Returns the table of the section with the given heading identifier.
    pub fn find_section(&self, id: &str) -> Option<&Table> {
        self.sections
            .iter()
            .find(|section| section.id == id)
            .map(|section| &section.table)
    }

    /// Returns the anchors strictly preceding `position`, nearest first.
    pub fn anchors_before(&self, position: usize) -> impl Iterator<Item = &Anchor> {
        self.anchors
            .iter()
            .rev()
            .filter(move |anchor| anchor.position < position)
    }

    /// Returns the identifier of the nearest anchor preceding `position`.
    pub fn find_anchor_before(&self, position: usize) -> Option<&str> {
        self.anchors_before(position)
            .next()
            .map(|anchor| anchor.name.as_str())
    }
}
