//! # Generation Pipeline
//!
//! Runs the four stages in order, strictly one table at a time:
//!
//! 1. prepare the output workspace (clears previously generated modules)
//! 2. emit the primary module of every table
//! 3. link the foreign keys of every table
//! 4. write the root index module
//!
//! All primary modules exist before the first foreign key is linked, so
//! reverse relationships always have a target unless the referenced table
//! is missing from the catalog altogether, in which case the linker writes a
//! placeholder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::codegen::emit::emit_module;
use crate::codegen::index::aggregate;
use crate::codegen::link::{LinkReport, Linker};
use crate::codegen::naming::ReservedWords;
use crate::codegen::typemap::TypeMapping;
use crate::config::TableGenConfig;
use crate::error::Result;
use crate::output::{self, workspace};
use crate::output::workspace::Workspace;
use crate::schema::introspect::SchemaSource;
use crate::schema::types::TableRef;

/// Inputs of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output_root: PathBuf,
    pub reserved: ReservedWords,
    pub types: TypeMapping,
}

impl GenerateOptions {
    /// Built-in reserved words and type mapping.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            reserved: ReservedWords::typescript(),
            types: TypeMapping::new(),
        }
    }

    /// Apply the `[types]` and `[naming]` sections of a config file.
    pub fn from_config(output_root: impl Into<PathBuf>, config: &TableGenConfig) -> Self {
        Self {
            output_root: output_root.into(),
            reserved: ReservedWords::typescript().with_extra(config.naming.reserved.iter().cloned()),
            types: TypeMapping::with_overrides(&config.types),
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub tables_dir: PathBuf,
    pub index_path: PathBuf,
    /// Tables listed by the source, in listing order.
    pub tables: Vec<String>,
    pub link: LinkReport,
}

impl GenerationReport {
    pub fn primary_modules(&self) -> usize {
        self.tables.len()
    }
}

/// Generate every module for the tables `source` lists.
pub async fn generate_types<S: SchemaSource>(
    source: &S,
    options: &GenerateOptions,
) -> Result<GenerationReport> {
    let tables = source.list_public_tables().await?;
    tracing::info!("Found {} tables", tables.len());

    let workspace = workspace::prepare(&options.output_root)?;

    emit_tables(source, &workspace, options, &tables).await?;
    let link = link_tables(source, &workspace, &options.reserved, &tables).await?;

    let names: Vec<String> = tables.into_iter().map(|t| t.name).collect();
    let index_path = write_index(&workspace, &names, &options.reserved)?;

    Ok(GenerationReport {
        tables_dir: workspace.tables_dir().to_path_buf(),
        index_path,
        tables: names,
        link,
    })
}

/// Write the primary module of each table, replacing any existing file.
pub async fn emit_tables<S: SchemaSource>(
    source: &S,
    workspace: &Workspace,
    options: &GenerateOptions,
    tables: &[TableRef],
) -> Result<()> {
    let mut emitted: HashMap<String, &str> = HashMap::new();
    for table in tables {
        let columns = source.list_columns(&table.name).await?;
        let module = emit_module(&table.name, &columns, &options.reserved, &options.types);
        if let Some(previous) = emitted.insert(module.identifier().to_string(), &table.name) {
            tracing::warn!(
                "Tables {} and {} both map to module {}; {} overwrites it",
                previous,
                table.name,
                module.identifier(),
                table.name
            );
        }
        let path = workspace.module_path(module.identifier());
        module.save(&path)?;
        tracing::info!("Created file: {}", path.display());
    }
    Ok(())
}

/// Link the foreign keys of each table, one table at a time.
pub async fn link_tables<S: SchemaSource>(
    source: &S,
    workspace: &Workspace,
    reserved: &ReservedWords,
    tables: &[TableRef],
) -> Result<LinkReport> {
    let linker = Linker::new(workspace, reserved);
    let mut report = LinkReport::default();
    for table in tables {
        let foreign_keys = source.list_foreign_keys(&table.name).await?;
        report.merge(linker.link_table(&table.name, &foreign_keys)?);
    }
    Ok(report)
}

/// Write the root index module and return its path.
pub fn write_index(
    workspace: &Workspace,
    tables: &[String],
    reserved: &ReservedWords,
) -> Result<PathBuf> {
    let path = workspace.index_path();
    output::write_atomic(&path, &aggregate(tables, reserved))?;
    tracing::info!("Created root type file: {}", path.display());
    Ok(path)
}

/// Output root used when none is given: the current working directory.
pub fn default_output_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf())
}
