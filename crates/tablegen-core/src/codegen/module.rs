//! # Type Modules
//!
//! Structured form of one generated module: the row type's identifier, the
//! modules it imports and the members of its body. Relationship patching
//! loads a module from disk into this form, mutates it through the set-gated
//! `add_*` methods and writes the canonical rendering back. Because
//! rendering is canonical and every addition is gated on membership,
//! patching an already patched module leaves its bytes unchanged.
//!
//! Canonical layout:
//!
//! ```text
//! import type { posts } from './posts';
//!
//! export type users = {
//!     id: number;
//!     name?: string;
//!     posts: posts[];
//! }
//! ```

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;
use thiserror::Error;

use crate::codegen::naming::{property_key, unquote_key};
use crate::error::{Result, TableGenError};
use crate::output;

/// Indentation of body members.
const INDENT: &str = "    ";

/// One `name[?]: type;` entry in a module body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub optional: bool,
    pub ty: String,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
            ty: ty.into(),
        }
    }

    /// A relationship property: `<target>: <target>[]`.
    pub fn relationship(target: &str) -> Self {
        Self::new(target, format!("{}[]", target), false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Property(Property),
    /// A body line that is not a property (comments, hand edits), kept as-is.
    Verbatim(String),
}

/// The structured form of one generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeModule {
    identifier: String,
    imports: IndexSet<String>,
    members: Vec<Member>,
}

/// Why persisted module text could not be read back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ModuleParseError {
    pub line: usize,
    pub message: String,
}

struct Patterns {
    import: Regex,
    header: Regex,
    close: Regex,
    property: Regex,
}

// Identifier characters match `naming::is_identifier`.
static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    import: Regex::new(
        r"^import type \{ ([\p{Alphabetic}\p{N}_$]+) \} from '\./([\p{Alphabetic}\p{N}_$]+)';\s*$",
    )
    .unwrap(),
    header: Regex::new(r"^export type ([\p{Alphabetic}\p{N}_$]+) = \{\s*$").unwrap(),
    close: Regex::new(r"^\}\s*;?\s*$").unwrap(),
    property: Regex::new(
        r"^\s*(?:'((?:[^'\\]|\\.)*)'|([\p{Alphabetic}\p{N}_$]+))(\?)?\s*:\s*(.+?)\s*;?\s*$",
    )
    .unwrap(),
});

enum ParseState {
    Preamble,
    Body,
    Done,
}

impl TypeModule {
    /// An empty module declaring `identifier`.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            imports: IndexSet::new(),
            members: Vec::new(),
        }
    }

    /// Stub for a table whose own module does not exist yet. Structurally
    /// identical to an emitted module, so it can be patched the same way.
    pub fn placeholder(identifier: impl Into<String>) -> Self {
        Self::new(identifier)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.members.iter().filter_map(|m| match m {
            Member::Property(p) => Some(p),
            Member::Verbatim(_) => None,
        })
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties().find(|p| p.name == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn has_import(&self, identifier: &str) -> bool {
        self.imports.contains(identifier)
    }

    /// Append `property` unless a property with the same name exists.
    /// Returns whether the module changed.
    pub fn add_property(&mut self, property: Property) -> bool {
        if self.has_property(&property.name) {
            return false;
        }
        self.members.push(Member::Property(property));
        true
    }

    /// Add a relationship property pointing at `target`.
    pub fn add_relationship(&mut self, target: &str) -> bool {
        self.add_property(Property::relationship(target))
    }

    /// Import the module declaring `identifier`. A module never imports
    /// itself. Returns whether the module changed.
    pub fn add_import(&mut self, identifier: &str) -> bool {
        if identifier == self.identifier {
            return false;
        }
        self.imports.insert(identifier.to_string())
    }

    pub fn push_verbatim(&mut self, line: impl Into<String>) {
        self.members.push(Member::Verbatim(line.into()));
    }

    /// Canonical text of the module.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for import in &self.imports {
            out.push_str(&format!(
                "import type {{ {} }} from './{}';\n",
                import, import
            ));
        }
        if !self.imports.is_empty() {
            out.push('\n');
        }

        out.push_str(&format!("export type {} = {{\n", self.identifier));
        for member in &self.members {
            match member {
                Member::Property(p) => {
                    let optional = if p.optional { "?" } else { "" };
                    out.push_str(&format!(
                        "{}{}{}: {};\n",
                        INDENT,
                        property_key(&p.name),
                        optional,
                        p.ty
                    ));
                }
                Member::Verbatim(line) => {
                    out.push_str(&format!("{}{}\n", INDENT, line));
                }
            }
        }
        out.push_str("}\n");
        out
    }

    /// Recover the structured form from module text.
    ///
    /// Accepts anything [`TypeModule::render`] produces, plus non-property
    /// lines inside the body, which are kept verbatim. Text outside the
    /// import block and the single type declaration is rejected.
    pub fn parse(text: &str) -> std::result::Result<Self, ModuleParseError> {
        let patterns = &*PATTERNS;

        let mut state = ParseState::Preamble;
        let mut imports = IndexSet::new();
        let mut identifier = None;
        let mut members = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            match state {
                ParseState::Preamble => {
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some(caps) = patterns.import.captures(trimmed) {
                        if caps[1] != caps[2] {
                            return Err(ModuleParseError {
                                line: line_no,
                                message: format!(
                                    "import of '{}' points at module './{}'",
                                    &caps[1], &caps[2]
                                ),
                            });
                        }
                        imports.insert(caps[1].to_string());
                    } else if let Some(caps) = patterns.header.captures(trimmed) {
                        identifier = Some(caps[1].to_string());
                        state = ParseState::Body;
                    } else {
                        return Err(ModuleParseError {
                            line: line_no,
                            message: format!("expected an import or type declaration, found '{}'", trimmed),
                        });
                    }
                }
                ParseState::Body => {
                    if trimmed.is_empty() {
                        continue;
                    }
                    if patterns.close.is_match(trimmed) {
                        state = ParseState::Done;
                    } else if let Some(caps) = patterns.property.captures(trimmed) {
                        let name = match caps.get(1) {
                            Some(quoted) => unquote_key(quoted.as_str()),
                            None => caps[2].to_string(),
                        };
                        members.push(Member::Property(Property::new(
                            name,
                            &caps[4],
                            caps.get(3).is_some(),
                        )));
                    } else {
                        members.push(Member::Verbatim(trimmed.to_string()));
                    }
                }
                ParseState::Done => {
                    if !trimmed.is_empty() {
                        return Err(ModuleParseError {
                            line: line_no,
                            message: "content after the closing brace".to_string(),
                        });
                    }
                }
            }
        }

        let line = text.lines().count();
        match (state, identifier) {
            (ParseState::Done, Some(identifier)) => {
                let mut module = TypeModule::new(identifier);
                for import in imports {
                    module.add_import(&import);
                }
                module.members = members;
                Ok(module)
            }
            (ParseState::Preamble, _) | (_, None) => Err(ModuleParseError {
                line,
                message: "no `export type <name> = {` declaration".to_string(),
            }),
            (ParseState::Body, Some(_)) => Err(ModuleParseError {
                line,
                message: "type declaration is missing its closing brace".to_string(),
            }),
        }
    }

    /// Read and parse the module stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TableGenError::Output {
            message: format!("Failed to read module {}", path.display()),
            source: e,
        })?;
        Self::parse(&text).map_err(|e| TableGenError::MalformedModule {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write the canonical rendering to `path`, replacing it atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        output::write_atomic(path, &self.render())
    }
}
