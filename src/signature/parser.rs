use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    signature::{Argument, Indirection, TypeRef},
    Error, Result,
};

/// Matches a template type: a (possibly qualified) identifier followed by an
/// angle-bracketed argument list spanning the rest of the string.
static TEMPLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w:]+)\s*<(.*)>$").expect("valid regex"));

/// Matches the trailing identifier run of an argument, which is its name.
static TRAILING_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+$").expect("valid regex"));

/// Indirection suffixes in priority order; the longest match is stripped first, so
/// `**` is a double pointer rather than two pointer strips.
const INDIRECTION_SUFFIXES: [(&str, Indirection); 5] = [
    ("&&", Indirection::RvalueReference),
    ("**", Indirection::DoublePointer),
    ("*&", Indirection::PointerReference),
    ("&", Indirection::Reference),
    ("*", Indirection::Pointer),
];

/// Parses a single raw type string into a [`TypeRef`].
///
/// The algorithm, in order:
/// 1. strip one indirection suffix (`&&`, `**`, `*&`, `&`, `*`), longest first
/// 2. strip a leading `const `
/// 3. match a template head; on a match the identifier becomes the base and the
///    bracketed text is split on top-level commas, each piece parsed recursively
/// 4. reject anything still containing `*` or `&` (e.g. triple pointers)
///
/// The resulting base is a bare or qualified identifier. It is *not* resolved to a
/// canonical name here; that is the cross-reference resolver's job.
///
/// # Errors
///
/// [`Error::EmptyType`] for a blank string, [`Error::TooMuchIndirection`] for
/// unsupported indirection levels. Both are declaration-local: the caller skips the
/// enclosing declaration and keeps parsing.
pub fn parse_type(text: &str) -> Result<TypeRef> {
    let initial = text;
    let mut remainder = text.trim();
    if remainder.is_empty() {
        return Err(Error::EmptyType);
    }

    let mut indirection = None;
    for (suffix, parsed) in INDIRECTION_SUFFIXES {
        if let Some(stripped) = remainder.strip_suffix(suffix) {
            indirection = Some(parsed);
            remainder = stripped.trim();
            break;
        }
    }

    let mut is_const = false;
    if let Some(stripped) = remainder.strip_prefix("const ") {
        is_const = true;
        remainder = stripped.trim();
    }

    let mut base = remainder.to_string();
    let mut template_arguments = Vec::new();
    if let Some(captures) = TEMPLATE_RE.captures(remainder) {
        base = captures[1].trim().to_string();
        for piece in split_arguments(&captures[2]) {
            let piece = piece.trim();
            if !piece.is_empty() {
                template_arguments.push(parse_type(piece)?);
            }
        }
    }

    if base.contains('&') || base.contains('*') {
        return Err(Error::TooMuchIndirection(initial.to_string()));
    }

    Ok(TypeRef {
        base,
        indirection,
        is_const,
        template_arguments,
    })
}

/// Splits a raw parameter-list string into individual argument substrings.
///
/// The text is first split naively on every comma. Any fragment whose `<` and `>`
/// counts disagree was cut inside a template argument list; it is merged with its
/// right neighbor and the pass repeats until every fragment is balanced. This handles
/// the editorial pattern in which multi-parameter templates containing commas appear
/// directly as argument types, e.g. `QMap<QString, int> map, int i`.
///
/// Re-joining the returned fragments with `", "` reproduces the input modulo
/// whitespace around the commas.
pub fn split_arguments(text: &str) -> Vec<String> {
    let mut fragments: Vec<String> = text.split(',').map(str::to_string).collect();

    loop {
        let unbalanced = fragments.iter().position(|fragment| {
            fragment.matches('<').count() != fragment.matches('>').count()
        });
        match unbalanced {
            Some(index) if index + 1 < fragments.len() => {
                let right = fragments.remove(index + 1);
                fragments[index] = format!("{}, {}", fragments[index], right.trim_start());
            }
            _ => break,
        }
    }

    fragments
}

/// Parses one argument substring into an [`Argument`].
///
/// A bare `int` or `bool` names a few documented arguments that carry no name; the
/// name `value` is synthesized for them. Otherwise the text is split on the last `=`
/// for a default value, the trailing identifier run becomes the argument name, and
/// everything before it is the type text.
///
/// # Errors
///
/// [`Error::InvalidSignature`] when no trailing identifier exists, plus anything
/// [`parse_type`] raises for the type text.
pub fn parse_argument(text: &str) -> Result<Argument> {
    if text == "int" || text == "bool" {
        return Ok(Argument {
            name: "value".to_string(),
            value_type: parse_type(text)?,
            default_value: None,
        });
    }

    let (head, default_value) = match text.rsplit_once('=') {
        Some((head, default)) => (head, Some(default.trim().to_string())),
        None => (text, None),
    };

    let head = head.trim();
    let name_match = TRAILING_NAME_RE
        .find(head)
        .ok_or_else(|| Error::InvalidSignature(text.to_string()))?;
    let name = name_match.as_str().to_string();
    let type_text = &head[..name_match.start()];

    Ok(Argument {
        name,
        value_type: parse_type(type_text)?,
        default_value,
    })
}
