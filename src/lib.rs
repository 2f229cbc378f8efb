// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # apiscope
//!
//! A framework for extracting machine-usable C and C++ API models from semi-structured
//! reference documentation. `apiscope` parses the declaration tables of a documentation
//! corpus - method signatures, enum value lists, nested type tables - into typed
//! descriptors, builds a corpus-wide type registry, and rewrites every referenced type
//! name into its canonical, namespace-qualified form.
//!
//! ## Features
//!
//! - **Lenient by design** - documentation is inconsistent; a malformed declaration
//!   drops that declaration, a malformed page drops that page, and the batch always
//!   completes with diagnostics for everything that was skipped
//! - **Whole-corpus resolution** - type names are resolved against the complete
//!   registry, searching enclosing namespaces and inheritance chains
//! - **Parallel parsing** - documents are independent and parse concurrently; output
//!   order always matches input order
//! - **Serializable output** - the resulting model serializes to JSON with absent
//!   (not null) optional fields
//!
//! ## Quick Start
//!
//! ```rust
//! use apiscope::prelude::*;
//!
//! let documents: Vec<Document> = Vec::new(); // produced by a traversal layer
//! let config = CorpusConfig::qt();
//! let diagnostics = Diagnostics::new();
//!
//! let model = process(&documents, &config, &diagnostics);
//! println!("{} headers, {} types", model.headers.len(), model.type_registry.len());
//! ```
//!
//! ## Architecture
//!
//! The pipeline has two phases. The per-document phase runs in parallel and turns
//! each [`document::Document`] into a [`model::HeaderModel`]: title classification,
//! declaration table parsing ([`declaration`]), and nested type extraction
//! ([`nested`]). The corpus phase runs sequentially once all documents are parsed:
//! registry population, cross-reference resolution, typedef pruning and late
//! corrections ([`typesystem`]).
//!
//! Everything specific to one documentation set - section identifiers, known type
//! tables, blacklists, manual corrections - lives in [`config::CorpusConfig`].

#[macro_use]
pub(crate) mod error;

/// Common types for working with the extraction pipeline.
///
/// This module provides a curated selection of the most frequently used types
/// from across the apiscope library, allowing for convenient glob imports.
pub mod prelude;

/// Corpus configuration: section layouts, known types, blacklists and corrections.
pub mod config;

/// Declaration table parsing: methods, variables, operators, typedefs and macros.
pub mod declaration;

/// Diagnostics collection shared across the whole pipeline.
pub mod diagnostics;

/// The markup-free input model produced by a document traversal layer.
pub mod document;

/// The serializable output model: header models and the type registry.
pub mod model;

/// Nested type extraction: enum value lists and types tables.
pub mod nested;

/// The extraction pipeline: per-document parsing and whole-corpus assembly.
pub mod pipeline;

/// Type and signature text parsing.
pub mod signature;

/// The corpus-wide type system: registry, resolver and typedef corrections.
pub mod typesystem;

/// The generic Result type for all operations in this library.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;
pub use pipeline::{parse_document, process};
