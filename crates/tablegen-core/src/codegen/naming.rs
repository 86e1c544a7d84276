//! # Identifier Escaping
//!
//! Table and column names become type names, property names and file names
//! in the generated modules. A name that collides with a reserved word is
//! prefixed with [`ESCAPE_PREFIX`]; every other name passes through as-is.
//!
//! Table names additionally go through [`module_identifier`], which maps
//! characters that cannot appear in a type name to `_`. That form is used
//! for the type, the file stem and the import, so a reference to a table
//! always resolves to the module that defines it. Column names keep their
//! exact spelling and are quoted by [`property_key`] when they are not plain
//! identifiers.

use std::borrow::Cow;
use std::collections::HashSet;

/// Prefix prepended to reserved identifiers.
pub const ESCAPE_PREFIX: &str = "_";

/// Language keywords plus identifiers that are legal but confusing as type
/// names in the generated modules.
const TYPESCRIPT_RESERVED: &[&str] = &[
    "import",
    "export",
    "default",
    "class",
    "function",
    "const",
    "let",
    "var",
    "if",
    "else",
    "for",
    "while",
    "return",
    "async",
    "await",
    "yield",
    "static",
    "extends",
    "implements",
    "interface",
    "enum",
    "type",
    "namespace",
    "module",
    "declare",
    "abstract",
    "as",
    "from",
    "get",
    "set",
    "null",
    "undefined",
    "true",
    "false",
    "new",
    "this",
    "super",
    "typeof",
    "instanceof",
    "in",
    "of",
    "void",
    "delete",
    "try",
    "catch",
    "finally",
    "throw",
    "switch",
    "case",
    "break",
    "continue",
    "do",
    "with",
    "debugger",
    "public",
    "private",
    "protected",
    "readonly",
    "require",
    "imports",
    "exports",
    "package",
];

/// The set of words that must be escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    /// An empty set: nothing is escaped.
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// The built-in keyword and denylist set.
    pub fn typescript() -> Self {
        Self {
            words: TYPESCRIPT_RESERVED.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Extend the set with additional words.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.words.contains(ident)
    }

    /// Shorthand for [`escape_identifier`] against this set.
    pub fn escape<'a>(&self, ident: &'a str) -> Cow<'a, str> {
        escape_identifier(ident, self)
    }

    /// Shorthand for [`module_identifier`] against this set.
    pub fn module_identifier<'a>(&self, table: &'a str) -> Cow<'a, str> {
        module_identifier(table, self)
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::typescript()
    }
}

/// Escape `ident` if it is a member of `reserved`.
///
/// Total and pure: the result only depends on the two inputs, and names that
/// are not reserved are borrowed back unchanged.
pub fn escape_identifier<'a>(ident: &'a str, reserved: &ReservedWords) -> Cow<'a, str> {
    if reserved.contains(ident) {
        Cow::Owned(format!("{}{}", ESCAPE_PREFIX, ident))
    } else {
        Cow::Borrowed(ident)
    }
}

/// Whether `word` can be written as a bare type name or property key.
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_char),
        _ => false,
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Map `name` onto a plain identifier: every character that cannot appear
/// in one becomes `_`, and a leading digit gets a `_` in front.
pub fn sanitize_identifier(name: &str) -> Cow<'_, str> {
    if is_identifier(name) {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len() + 1);
    if !name.chars().next().is_some_and(is_identifier_start) {
        out.push('_');
    }
    out.extend(name.chars().map(|c| if is_identifier_char(c) { c } else { '_' }));
    Cow::Owned(out)
}

/// Type name, file stem and import name of the module generated for
/// `table`: sanitized first, then escaped against `reserved`.
pub fn module_identifier<'a>(table: &'a str, reserved: &ReservedWords) -> Cow<'a, str> {
    match sanitize_identifier(table) {
        Cow::Borrowed(plain) => escape_identifier(plain, reserved),
        Cow::Owned(sanitized) => Cow::Owned(escape_identifier(&sanitized, reserved).into_owned()),
    }
}

/// `name` as an object type key: bare when it is a plain identifier,
/// single-quoted otherwise.
pub fn property_key(name: &str) -> Cow<'_, str> {
    if is_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'")))
    }
}

/// Inverse of the quoting done by [`property_key`] for a quoted key's
/// contents.
pub fn unquote_key(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
