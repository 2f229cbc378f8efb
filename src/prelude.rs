//! # apiscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from
//! the apiscope library. Import this module to get quick access to the essential
//! types for documentation extraction.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all apiscope operations
pub use crate::Error;

/// The result type used throughout apiscope
pub use crate::Result;

/// Diagnostics container shared across the pipeline
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Whole-corpus processing and single-document parsing
pub use crate::pipeline::{parse_document, process};

/// Corpus configuration and section layouts
pub use crate::config::{CorpusConfig, SectionSpec};

// ================================================================================================
// Input Model
// ================================================================================================

/// The markup-free records handed to the core by a traversal layer
pub use crate::document::{Anchor, Cell, Document, Section, Table, TableRow};

// ================================================================================================
// Output Model
// ================================================================================================

/// The serializable extraction output
pub use crate::model::{ApiModel, EnumValue, HeaderKind, HeaderModel, NestedType, TypeKind};

/// Parsed signature components
pub use crate::signature::{Argument, Indirection, Method, MethodScope, TypeRef};

// ================================================================================================
// Type System
// ================================================================================================

/// Registry and resolution types
pub use crate::typesystem::{CrossReferenceResolver, RegistryEntry, TypeOrigin, TypeRegistry};
