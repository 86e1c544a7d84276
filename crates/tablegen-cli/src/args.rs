use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "tablegen",
    about = "Generate typed table modules and relationship properties from a database schema",
    version,
    after_help = "Examples:\n  tablegen generate ./src --db postgres://localhost/myapp\n  tablegen generate                       # output to the current directory, DB from .env\n  tablegen inspect --db sqlite://dev.db\n  tablegen inspect --db postgres://localhost/myapp --format json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one module per table plus the root index
    Generate(GenerateArgs),

    /// Show tables, columns and foreign keys without writing anything
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Output root; modules are written to <OUTPUT>/generated/tables
    /// (defaults to tablegen.toml [output] dir, then the current directory)
    pub output: Option<PathBuf>,

    /// Database connection URL (postgres://, sqlite:)
    /// Falls back to DATABASE_URL env var or .env file
    #[arg(long, env = "DATABASE_URL")]
    pub db: Option<String>,

    /// Schema name to read tables from (default: public, PostgreSQL only)
    #[arg(long)]
    pub schema: Option<String>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub db: Option<String>,

    /// Schema name to read tables from
    #[arg(long)]
    pub schema: Option<String>,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: InspectFormat,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum InspectFormat {
    Table,
    Json,
}
