//! The corpus-wide type system: registry, cross-reference resolution, typedef meanings.
//!
//! Per-document parsing produces descriptors whose type names are spelled exactly as
//! the documentation spells them, usually unqualified. This module turns those names
//! into a single consistent type system:
//!
//! - [`TypeRegistry`] - append-only mapping from canonical type name to declaration
//!   metadata, seeded with the corpus configuration's known types and populated from
//!   every parsed document
//! - [`CrossReferenceResolver`] - rewrites every referenced base name to its canonical
//!   (possibly namespace-qualified) form, searching enclosing namespaces and the
//!   inheritance chain
//! - [`apply_typedef_corrections`] - assigns well-known typedef meanings and prunes
//!   documentation noise from the finished registry
//!
//! The resolver requires the *complete* registry before it starts: a method may
//! reference a type documented in a later file, so resolution is a whole-corpus
//! barrier rather than a per-document step.

mod registry;
mod resolver;
mod typedefs;

pub use registry::{RegistryEntry, TypeOrigin, TypeRegistry};
pub use resolver::CrossReferenceResolver;
pub use typedefs::apply_typedef_corrections;
