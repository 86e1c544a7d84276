use anyhow::{Context, Result};

use tablegen_core::pipeline::{default_output_root, generate_types, GenerateOptions};

use crate::args::GenerateArgs;
use crate::commands::{load_config, open_source};

pub async fn run(args: &GenerateArgs) -> Result<()> {
    let config = load_config()?;

    // Connect before touching the output directory.
    let source = open_source(args.db.as_deref(), args.schema.as_deref(), config.as_ref()).await?;

    let output_root = args
        .output
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.output_dir()))
        .unwrap_or_else(default_output_root);

    let options = match config.as_ref() {
        Some(config) => GenerateOptions::from_config(&output_root, config),
        None => GenerateOptions::new(&output_root),
    };

    let report = generate_types(&source, &options)
        .await
        .with_context(|| format!("Failed to generate types into {}", output_root.display()))?;

    println!(
        "Generated {} table modules in {} ({} relationship properties, {} placeholders)",
        report.primary_modules(),
        report.tables_dir.display(),
        report.link.properties_added,
        report.link.placeholders_created,
    );

    Ok(())
}
