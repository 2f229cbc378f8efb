//! Type and method signature parsing for documentation declarations.
//!
//! This module implements the mini-grammar that turns the raw type and signature
//! strings found in documentation tables into structured descriptors:
//!
//! - [`parse_type`] - one type string into a [`TypeRef`] (indirection,
//!   const-qualification, templates with nested commas)
//! - [`split_arguments`] - a raw parameter list into argument substrings,
//!   merging fragments that a naive comma split cut inside template angle brackets
//! - [`parse_argument`] - one argument substring into an [`Argument`]
//!   (name, type, default value)
//!
//! The grammar intentionally covers only the subset of C++ that appears in the
//! source documentation; anything outside it raises a declaration-local error and
//! the offending declaration is skipped.
//!
//! # Example
//!
//! ```rust
//! use apiscope::signature::{parse_type, Indirection};
//!
//! let parsed = parse_type("const QMap<QString, int> &")?;
//! assert_eq!(parsed.base, "QMap");
//! assert!(parsed.is_const);
//! assert_eq!(parsed.indirection, Some(Indirection::Reference));
//! assert_eq!(parsed.template_arguments.len(), 2);
//! # Ok::<(), apiscope::Error>(())
//! ```

mod parser;
mod types;

pub use parser::{parse_argument, parse_type, split_arguments};
pub use types::{Argument, Indirection, Method, MethodScope, TypeRef};
