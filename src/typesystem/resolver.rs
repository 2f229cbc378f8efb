//! Cross-reference type resolution over the whole corpus.
//!
//! After every document has been parsed and the registry is complete, the resolver
//! walks every inheritance clause, return type and argument type (recursively through
//! template arguments) and rewrites each base name into its canonical, possibly
//! namespace-qualified form.
//!
//! The search is a small state machine whose state is the current namespace scope:
//!
//! 1. Build the enclosing-namespace prefixes of the current scope, most specific
//!    first: for a method of `A::B`, the name `Name` is tried as `A::B::Name`,
//!    `A::Name`, then bare `Name`.
//! 2. The first prefixed candidate found in the registry wins; it is marked used.
//! 3. If nothing matched and the current scope has a registered base class, the scope
//!    switches to the base class and the search repeats. This finds types inherited
//!    from ancestors, e.g. an enum declared on a base class.
//! 4. When the walk exhausts with no resolution, the name is reported as unknown; the
//!    method is kept but flagged, and the batch continues.
//!
//! Resolution is idempotent: canonical names resolve to themselves via the bare
//! candidate, so running the pass twice changes nothing.

use std::collections::BTreeSet;

use crate::{
    config::CorpusConfig,
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    model::HeaderModel,
    signature::TypeRef,
    typesystem::TypeRegistry,
    Error, Result,
};

/// Rewrites referenced type names to canonical registry names.
///
/// Requires the complete registry; see the module documentation for the search
/// order. The resolver records which registry entries were actually referenced so
/// the typedef pruning step can discard dead entries afterwards.
pub struct CrossReferenceResolver<'a> {
    registry: &'a TypeRegistry,
    config: &'a CorpusConfig,
    diagnostics: &'a Diagnostics,
    used: BTreeSet<String>,
}

impl<'a> CrossReferenceResolver<'a> {
    /// Creates a resolver over a finished registry.
    pub fn new(
        registry: &'a TypeRegistry,
        config: &'a CorpusConfig,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        CrossReferenceResolver {
            registry,
            config,
            diagnostics,
            used: BTreeSet::new(),
        }
    }

    /// Resolves every type reference of every header, in place.
    ///
    /// A name that cannot be resolved produces a warning carrying the owning header
    /// and the offending declaration; the declaration is kept with its remaining
    /// names unresolved. Nothing here aborts the batch.
    pub fn resolve_headers(&mut self, headers: &mut [HeaderModel]) {
        for header in headers {
            let namespace = header.class_name.clone();

            if header.class_name.is_some() && header.methods.is_empty() {
                self.diagnostics.warning(
                    DiagnosticCategory::Registry,
                    format!(
                        "Class {} doesn't have any methods",
                        header.class_name.as_deref().unwrap_or_default()
                    ),
                );
            }

            if let Some(inherits) = header.inherits.as_mut() {
                if let Err(error) = Self::resolve_type_ref(
                    self.registry,
                    self.config,
                    &mut self.used,
                    self.diagnostics,
                    inherits,
                    namespace.as_deref(),
                ) {
                    self.report(&error, &header.header, "inherits clause");
                }
            }

            for method in &mut header.methods {
                let result = Self::resolve_method_types(
                    self.registry,
                    self.config,
                    &mut self.used,
                    self.diagnostics,
                    method.return_type.as_mut(),
                    method.variable_type.as_mut(),
                    &mut method.arguments,
                    namespace.as_deref(),
                );
                if let Err(error) = result {
                    self.report(&error, &header.header, &method.name);
                }
            }
        }
    }

    /// Consumes the resolver, returning the set of canonical names that were
    /// referenced by at least one resolved type.
    #[must_use]
    pub fn into_used_types(self) -> BTreeSet<String> {
        self.used
    }

    fn report(&self, error: &Error, header: &str, declaration: &str) {
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Type,
                format!("{} (#include <{}>)", error, header),
            )
            .with_declaration(declaration),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_method_types(
        registry: &TypeRegistry,
        config: &CorpusConfig,
        used: &mut BTreeSet<String>,
        diagnostics: &Diagnostics,
        return_type: Option<&mut TypeRef>,
        variable_type: Option<&mut TypeRef>,
        arguments: &mut [crate::signature::Argument],
        namespace: Option<&str>,
    ) -> Result<()> {
        if let Some(return_type) = return_type {
            Self::resolve_type_ref(registry, config, used, diagnostics, return_type, namespace)?;
        }
        if let Some(variable_type) = variable_type {
            Self::resolve_type_ref(
                registry,
                config,
                used,
                diagnostics,
                variable_type,
                namespace,
            )?;
        }
        for argument in arguments {
            Self::resolve_type_ref(
                registry,
                config,
                used,
                diagnostics,
                &mut argument.value_type,
                namespace,
            )?;
        }
        Ok(())
    }

    /// Resolves one type reference and, recursively, its template arguments.
    fn resolve_type_ref(
        registry: &TypeRegistry,
        config: &CorpusConfig,
        used: &mut BTreeSet<String>,
        diagnostics: &Diagnostics,
        type_ref: &mut TypeRef,
        namespace: Option<&str>,
    ) -> Result<()> {
        for argument in &mut type_ref.template_arguments {
            Self::resolve_type_ref(registry, config, used, diagnostics, argument, namespace)?;
        }

        if let Some(alias) = config.alias_for(&type_ref.base) {
            type_ref.base = alias.to_string();
        }

        let mut current_namespace: Option<String> = namespace.map(str::to_string);
        // Guards against inheritance cycles in malformed corpora.
        let mut visited_scopes = BTreeSet::new();

        loop {
            let parts: Vec<&str> = current_namespace
                .as_deref()
                .map(|scope| scope.split("::").collect())
                .unwrap_or_default();

            for prefix_len in (0..=parts.len()).rev() {
                let candidate = if prefix_len == 0 {
                    type_ref.base.clone()
                } else {
                    format!("{}::{}", parts[..prefix_len].join("::"), type_ref.base)
                };
                if registry.contains(&candidate) {
                    used.insert(candidate.clone());
                    type_ref.base = candidate;
                    return Ok(());
                }
            }

            let scope = match current_namespace.as_deref() {
                Some(scope) => scope.to_string(),
                None => break,
            };
            if !visited_scopes.insert(scope.clone()) {
                break;
            }
            match registry.get(&scope).and_then(|entry| entry.inherits.as_ref()) {
                Some(parent) => {
                    diagnostics.info(
                        DiagnosticCategory::Type,
                        format!("Switching namespace from {} to {}", scope, parent.base),
                    );
                    current_namespace = Some(parent.base.clone());
                }
                None => break,
            }
        }

        Err(Error::UnknownTypeOrigin(type_ref.base.clone()))
    }
}
