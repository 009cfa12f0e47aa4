//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use fg_core::InvalidReferencePolicy;
use fg_gather::Cardinality;

/// fkgather - fetch a row and everything it references, in one query
#[derive(Parser, Debug)]
#[command(name = "fg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the database path from the config
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Gather rows with their references and print them as JSON
    Gather(GatherArgs),

    /// Print the SQL a gather would run
    Plan(PlanArgs),

    /// Validate the schema and print its tables and foreign keys
    Schema(SchemaArgs),
}

/// Root-row selection shared by gather and plan
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Root table
    pub table: String,

    /// SQL filter on the root table (qualify columns with the table name)
    #[arg(short = 'w', long = "where")]
    pub filter: Option<String>,

    /// Primary key of the root row
    #[arg(long)]
    pub id: Option<i64>,

    /// Foreign-key hops to resolve (default from config)
    #[arg(short, long)]
    pub depth: Option<u32>,
}

/// Arguments for the gather command
#[derive(Args, Debug)]
pub struct GatherArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// What to do when a reference points at a missing row (default from config)
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Result shape (default: one with --id, some otherwise)
    #[arg(long, value_enum)]
    pub cardinality: Option<CardinalityArg>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

/// Invalid-reference policies
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Drop the model holding the reference
    Omit,
    /// Fail the call
    Throw,
    /// Same as omit
    Null,
    /// Keep the model with a null slot
    Keep,
}

impl From<PolicyArg> for InvalidReferencePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Omit => InvalidReferencePolicy::Omit,
            PolicyArg::Throw => InvalidReferencePolicy::Throw,
            PolicyArg::Null => InvalidReferencePolicy::Null,
            PolicyArg::Keep => InvalidReferencePolicy::Keep,
        }
    }
}

/// Result shapes
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityArg {
    /// First match or null
    One,
    /// First match; no match is an error
    OneStrict,
    /// Every match
    Some,
}

impl From<CardinalityArg> for Cardinality {
    fn from(arg: CardinalityArg) -> Self {
        match arg {
            CardinalityArg::One => Cardinality::One,
            CardinalityArg::OneStrict => Cardinality::OneStrict,
            CardinalityArg::Some => Cardinality::Some,
        }
    }
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for the schema command
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: SchemaOutput,
}

/// Schema output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutput {
    /// One line per table and edge
    Text,
    /// JSON document
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
