use serde::Serialize;

/// Serde helper: omit boolean flags that are unset, matching the optionality rules of
/// the output model (absent, not false).
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Indirection of a parsed type, detected by suffix stripping.
///
/// Suffixes are tried in priority order `&&`, `**`, `*&`, `&`, `*` and the longest
/// match wins, so `T**` is a double pointer rather than two single-pointer strips.
/// Serializes as the literal suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Indirection {
    /// `T*`
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Pointer,
    /// `T&`
    #[serde(rename = "&")]
    #[strum(serialize = "&")]
    Reference,
    /// `T&&`
    #[serde(rename = "&&")]
    #[strum(serialize = "&&")]
    RvalueReference,
    /// `T*&`
    #[serde(rename = "*&")]
    #[strum(serialize = "*&")]
    PointerReference,
    /// `T**`
    #[serde(rename = "**")]
    #[strum(serialize = "**")]
    DoublePointer,
}

/// A parsed type reference.
///
/// `base` never contains `*` or `&`; indirection and const-qualification are carried
/// separately. For template types, `base` is the template name and the arguments are
/// parsed recursively. The base is *not* canonical at parse time; the cross-reference
/// resolver rewrites it to a fully qualified name once the whole corpus is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    /// The bare or qualified identifier, e.g. `int` or `QHash::const_iterator`.
    pub base: String,
    /// Indirection suffix, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indirection: Option<Indirection>,
    /// True when the type carried a leading `const `.
    #[serde(skip_serializing_if = "is_false")]
    pub is_const: bool,
    /// Parsed template arguments, empty for non-template types.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub template_arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// Creates a plain type reference with no indirection, const or template arguments.
    pub fn named(base: impl Into<String>) -> Self {
        TypeRef {
            base: base.into(),
            indirection: None,
            is_const: false,
            template_arguments: Vec::new(),
        }
    }

    /// Visits this type and every nested template argument, depth first.
    pub fn visit<F: FnMut(&TypeRef)>(&self, visit: &mut F) {
        visit(self);
        for argument in &self.template_arguments {
            argument.visit(visit);
        }
    }
}

/// A parsed method argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// The argument name; synthesized as `value` for the few documented arguments
    /// that carry no name.
    pub name: String,
    /// The argument type.
    #[serde(rename = "type")]
    pub value_type: TypeRef,
    /// The default value text after `=`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Whether a declaration belongs to a class or to the global scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MethodScope {
    /// Declared inside a class.
    Class,
    /// A free function or global variable.
    Global,
}

/// A parsed method, field or operator declaration.
///
/// A descriptor is either a callable (carrying `return_type`, `arguments` and the
/// qualifier flags) or a bare variable declaration (`variable` set, carrying
/// `variable_type` instead). Descriptors are created during per-document parsing and
/// are immutable afterwards, except that the cross-reference resolver rewrites the
/// `base` of every contained [`TypeRef`] to its canonical name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    /// The declared name, e.g. `setValue`, `operator==`, `QPoint` or `~QPoint`.
    pub name: String,
    /// Declaring scope of the method.
    pub scope: MethodScope,
    /// Parsed return type; absent for constructors, destructors and variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,
    /// Parsed arguments in declaration order; empty for variables.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    /// True when the argument list ends in `...`.
    #[serde(rename = "variable_arguments", skip_serializing_if = "is_false")]
    pub variadic: bool,
    /// True when the declaration started with `virtual`.
    #[serde(rename = "virtual", skip_serializing_if = "is_false")]
    pub is_virtual: bool,
    /// True when the signature ended in `= 0`.
    #[serde(rename = "pure_virtual", skip_serializing_if = "is_false")]
    pub is_pure_virtual: bool,
    /// True when the signature ended in a `const` qualifier.
    #[serde(skip_serializing_if = "is_false")]
    pub is_const: bool,
    /// True for declarations from a static members section.
    #[serde(rename = "static", skip_serializing_if = "is_false")]
    pub is_static: bool,
    /// True for declarations from a protected section.
    #[serde(rename = "protected", skip_serializing_if = "is_false")]
    pub is_protected: bool,
    /// True for declarations from a signals section.
    #[serde(rename = "signal", skip_serializing_if = "is_false")]
    pub is_signal: bool,
    /// True for declarations from a slots section.
    #[serde(rename = "slot", skip_serializing_if = "is_false")]
    pub is_slot: bool,
    /// True when the name equals the enclosing class name.
    #[serde(rename = "constructor", skip_serializing_if = "is_false")]
    pub is_constructor: bool,
    /// True when the name equals `~ClassName`.
    #[serde(rename = "destructor", skip_serializing_if = "is_false")]
    pub is_destructor: bool,
    /// The text after `operator` for operator declarations, e.g. `==` or `()`.
    #[serde(rename = "operator", skip_serializing_if = "Option::is_none")]
    pub operator_suffix: Option<String>,
    /// True for bare variable declarations.
    #[serde(rename = "variable", skip_serializing_if = "is_false")]
    pub is_variable: bool,
    /// The variable type; present only when `variable` is set.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<TypeRef>,
}

impl Method {
    /// Creates an empty descriptor with a name and scope; the declaration parser
    /// fills in the rest.
    pub fn new(name: impl Into<String>, scope: MethodScope) -> Self {
        Method {
            name: name.into(),
            scope,
            return_type: None,
            arguments: Vec::new(),
            variadic: false,
            is_virtual: false,
            is_pure_virtual: false,
            is_const: false,
            is_static: false,
            is_protected: false,
            is_signal: false,
            is_slot: false,
            is_constructor: false,
            is_destructor: false,
            operator_suffix: None,
            is_variable: false,
            variable_type: None,
        }
    }
}
