use anyhow::Result;
use comfy_table::{Cell, Table as ComfyTable};
use serde::Serialize;

use tablegen_core::codegen::naming::{property_key, ReservedWords};
use tablegen_core::codegen::typemap::TypeMapping;
use tablegen_core::schema::introspect::SchemaSource;
use tablegen_core::schema::types::{Column, ForeignKey};

use crate::args::{InspectArgs, InspectFormat};
use crate::commands::{load_config, open_source};

#[derive(Debug, Serialize)]
struct TableReport {
    name: String,
    module: String,
    columns: Vec<ColumnReport>,
    foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, Serialize)]
struct ColumnReport {
    #[serde(flatten)]
    column: Column,
    property: String,
    ts_type: String,
}

pub async fn run(args: &InspectArgs) -> Result<()> {
    let config = load_config()?;
    let source = open_source(args.db.as_deref(), args.schema.as_deref(), config.as_ref()).await?;

    let (reserved, types) = match config.as_ref() {
        Some(c) => (
            ReservedWords::typescript().with_extra(c.naming.reserved.iter().cloned()),
            TypeMapping::with_overrides(&c.types),
        ),
        None => (ReservedWords::typescript(), TypeMapping::new()),
    };

    let mut reports = Vec::new();
    for table in source.list_public_tables().await? {
        let columns = source.list_columns(&table.name).await?;
        let foreign_keys = source.list_foreign_keys(&table.name).await?;
        reports.push(TableReport {
            module: reserved.module_identifier(&table.name).into_owned(),
            columns: columns
                .into_iter()
                .map(|column| ColumnReport {
                    property: property_key(&reserved.escape(&column.name)).into_owned(),
                    ts_type: types.resolve(&column.sql_type).to_string(),
                    column,
                })
                .collect(),
            foreign_keys,
            name: table.name,
        });
    }

    match args.format {
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)?;
            println!("{}", json);
        }
        InspectFormat::Table => {
            println!("Database: {}", source.database_type());
            println!(
                "Tables: {}  Columns: {}  Foreign Keys: {}",
                reports.len(),
                reports.iter().map(|t| t.columns.len()).sum::<usize>(),
                reports.iter().map(|t| t.foreign_keys.len()).sum::<usize>()
            );
            println!();

            for table in &reports {
                println!("━━━ {} ({}.ts) ━━━", table.name, table.module);

                let mut t = ComfyTable::new();
                t.set_header(vec!["Column", "SQL Type", "Nullable", "Property", "FK"]);

                for col in &table.columns {
                    let fk_target = table
                        .foreign_keys
                        .iter()
                        .find(|fk| fk.column_name == col.column.name)
                        .map(|fk| format!("→ {}", fk.referenced_table));

                    t.add_row(vec![
                        Cell::new(&col.column.name),
                        Cell::new(&col.column.sql_type),
                        Cell::new(if col.column.nullable { "YES" } else { "NO" }),
                        Cell::new(format!("{}: {}", col.property, col.ts_type)),
                        Cell::new(fk_target.as_deref().unwrap_or("")),
                    ]);
                }

                println!("{}", t);
                println!();
            }
        }
    }

    Ok(())
}
