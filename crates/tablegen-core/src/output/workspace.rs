//! # Output Workspace
//!
//! Layout of the generated tree under an output root:
//!
//! ```text
//! <root>/generated/tables/<table>.ts   one module per table
//! <root>/generated/tables/index.ts     the root aggregate
//! <root>/generated/views/              reserved, currently empty
//! ```
//!
//! Preparing the workspace is destructive: every file already in the tables
//! directory is deleted so primary modules are always regenerated from
//! scratch.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TableGenError};

pub const GENERATED_DIR: &str = "generated";
pub const TABLES_DIR: &str = "tables";
pub const VIEWS_DIR: &str = "views";
pub const MODULE_EXTENSION: &str = "ts";
pub const INDEX_MODULE: &str = "index";

/// Resolved locations of the generated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    tables_dir: PathBuf,
}

impl Workspace {
    /// A workspace rooted at `output_root`, without touching the filesystem.
    pub fn at(output_root: &Path) -> Self {
        Self {
            tables_dir: output_root.join(GENERATED_DIR).join(TABLES_DIR),
        }
    }

    /// Wrap an existing tables directory.
    pub fn from_tables_dir(tables_dir: impl Into<PathBuf>) -> Self {
        Self {
            tables_dir: tables_dir.into(),
        }
    }

    pub fn tables_dir(&self) -> &Path {
        &self.tables_dir
    }

    /// Path of the module for an (already escaped) identifier.
    pub fn module_path(&self, identifier: &str) -> PathBuf {
        self.tables_dir
            .join(format!("{}.{}", identifier, MODULE_EXTENSION))
    }

    pub fn index_path(&self) -> PathBuf {
        self.module_path(INDEX_MODULE)
    }
}

/// Ensure the tables directory exists and is empty.
///
/// If it already exists, every file inside it is removed; subdirectories are
/// left alone. Otherwise the whole tree, including the views directory, is
/// created. Filesystem failures are returned as-is, nothing is retried.
pub fn prepare(output_root: &Path) -> Result<Workspace> {
    let workspace = Workspace::at(output_root);
    let tables_dir = workspace.tables_dir();

    if tables_dir.is_dir() {
        let entries = fs::read_dir(tables_dir).map_err(|e| TableGenError::Output {
            message: format!("Failed to list {}", tables_dir.display()),
            source: e,
        })?;

        let mut removed = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| TableGenError::Output {
                message: format!("Failed to list {}", tables_dir.display()),
                source: e,
            })?;
            let path = entry.path();
            if path.is_dir() {
                tracing::warn!("Leaving directory {} in place", path.display());
                continue;
            }
            fs::remove_file(&path).map_err(|e| TableGenError::Output {
                message: format!("Failed to remove {}", path.display()),
                source: e,
            })?;
            removed += 1;
        }
        tracing::debug!("Cleared {} files from {}", removed, tables_dir.display());
    } else {
        let views_dir = output_root.join(GENERATED_DIR).join(VIEWS_DIR);
        for dir in [tables_dir, views_dir.as_path()] {
            fs::create_dir_all(dir).map_err(|e| TableGenError::Output {
                message: format!("Failed to create {}", dir.display()),
                source: e,
            })?;
        }
        tracing::debug!("Created {}", tables_dir.display());
    }

    Ok(workspace)
}
