use thiserror::Error;

macro_rules! invalid_layout {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidLayout {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidLayout {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure condition in the extraction pipeline maps to exactly one variant, and every
/// variant belongs to one of two severities (see [`Error::is_document_fatal`]):
///
/// ## Declaration-local conditions
///
/// The single offending declaration, enum row, or typedef is dropped with a diagnostic and
/// processing of the surrounding document continues:
///
/// - [`Error::EmptyType`] - A blank string where a type was expected
/// - [`Error::TooMuchIndirection`] - Unsupported indirection level (triple pointers etc.)
/// - [`Error::InvalidSignature`] - Signature text that does not follow the method grammar
/// - [`Error::UnrecognizedQualifier`] - Unconsumed text after the argument list
/// - [`Error::MissingReturnType`] - A class-scope method without a return type
/// - [`Error::ReturnTypeNotAllowed`] - A constructor or destructor carrying a return type
/// - [`Error::NamespaceMismatch`] - An enum literal outside its enclosing namespace
/// - [`Error::MissingEnumAnchor`] - A value table with no preceding enum anchor
/// - [`Error::EnumValuesNotFound`] - An enum or flags row with no usable value table
/// - [`Error::UnknownTypeOrigin`] - A referenced type name that resolves nowhere
/// - [`Error::UnknownMeaningType`] - A typedef meaning referencing an unregistered type
///
/// ## Document-local conditions
///
/// The whole document is skipped with a diagnostic and the batch continues:
///
/// - [`Error::InvalidLayout`] - Missing title, missing expected table, malformed row
///
/// No condition anywhere is batch-fatal; a run always produces output for every document
/// whose layout parsed successfully.
#[derive(Error, Debug)]
pub enum Error {
    /// A type string was empty after trimming.
    ///
    /// Raised by the type signature parser when a cell that should carry a type
    /// contains only whitespace.
    #[error("Type is missing")]
    EmptyType,

    /// A type string carries more indirection than the supported suffix set.
    ///
    /// The parser strips a single `&&`, `**`, `*&`, `&` or `*` suffix; anything that
    /// still contains `*` or `&` afterwards (e.g. `int***`) is rejected. The enclosing
    /// declaration is skipped, the document keeps parsing.
    #[error("Invalid type '{0}': too much indirection")]
    TooMuchIndirection(String),

    /// Signature text that cannot be split into name, argument list and qualifiers.
    ///
    /// Examples: no opening parenthesis outside of `operator()`, no closing
    /// parenthesis, or an argument with no trailing identifier to use as its name.
    #[error("Invalid signature syntax: '{0}'")]
    InvalidSignature(String),

    /// Text remained after the argument list that is neither `const` nor `= 0`.
    ///
    /// The declaration parser consumes a trailing `= 0` (pure virtual) and `const`
    /// qualifier; any other suffix is unsupported and the declaration is skipped.
    #[error("Unprocessed signature suffix: '{0}'")]
    UnrecognizedQualifier(String),

    /// A class-scope method that is not a constructor, destructor or operator has no
    /// return type.
    #[error("No return type in a method: '{0}'")]
    MissingReturnType(String),

    /// A constructor or destructor declaration carries a return type.
    #[error("Constructors and destructors are not allowed to have return types: '{0}'")]
    ReturnTypeNotAllowed(String),

    /// An enum literal is not prefixed with its enclosing class or namespace name.
    ///
    /// Value-table rows must spell literals as `Namespace::Literal`; the prefix is
    /// stripped before storage. A row with a foreign or missing prefix is dropped.
    #[error("Enum literal '{literal}' is outside namespace '{namespace}'")]
    NamespaceMismatch {
        /// The literal name as it appeared in the value table
        literal: String,
        /// The enclosing namespace the literal was expected to carry
        namespace: String,
    },

    /// No anchor ending in `-enum` precedes a value-list table.
    ///
    /// Without the anchor the table cannot be attached to any enum row; the table is
    /// skipped and the document keeps parsing.
    #[error("Can't find anchor for values table")]
    MissingEnumAnchor,

    /// An enum row has no value table, or a flags row links to no known enum.
    ///
    /// Carries the name of the offending row. The row is skipped.
    #[error("No values found for enum '{0}'")]
    EnumValuesNotFound(String),

    /// A referenced type name could not be resolved to any registry entry.
    ///
    /// The resolver exhausted the enclosing-namespace prefixes and the inheritance
    /// chain without finding a declaration. The method is kept but flagged.
    #[error("Unknown type: '{0}'")]
    UnknownTypeOrigin(String),

    /// A well-known typedef meaning references a type missing from the registry.
    ///
    /// The typedef is left without a meaning.
    #[error("Unknown type in typedef meaning: '{0}'")]
    UnknownMeaningType(String),

    /// The document does not have the expected layout.
    ///
    /// Missing title, missing expected table, or a malformed row. The error includes
    /// the source location where the problem was detected for debugging purposes.
    /// The whole document is skipped, the batch continues.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Invalid layout - {file}:{line}: {message}")]
    InvalidLayout {
        /// The message to be printed for the layout error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}

impl Error {
    /// Returns `true` if this condition invalidates the whole document rather than a
    /// single declaration.
    ///
    /// Document-fatal conditions skip the document and continue the batch; everything
    /// else drops only the offending declaration, row or typedef.
    #[must_use]
    pub fn is_document_fatal(&self) -> bool {
        matches!(self, Error::InvalidLayout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_layout_macro_captures_location() {
        let err = invalid_layout!("missing {} table", "types");
        match err {
            Error::InvalidLayout {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "missing types table");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            _ => panic!("expected InvalidLayout"),
        }
    }

    #[test]
    fn test_severity_classification() {
        assert!(invalid_layout!("bad row").is_document_fatal());
        assert!(!Error::EmptyType.is_document_fatal());
        assert!(!Error::TooMuchIndirection("int***".into()).is_document_fatal());
        assert!(!Error::UnknownTypeOrigin("QMissing".into()).is_document_fatal());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::NamespaceMismatch {
            literal: "Other::Value".into(),
            namespace: "QIODevice".into(),
        };
        let text = format!("{}", err);
        assert!(text.contains("Other::Value"));
        assert!(text.contains("QIODevice"));
    }
}
