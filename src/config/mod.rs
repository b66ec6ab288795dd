pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "ration-calc")]
#[command(about = "Veterinary ration calculator: check diets against nutrient standards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Optional TOML file with data locations and check settings
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output format for the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Calculate and verify a ration
    Check(CheckArgs),
    /// Pearson Square Method
    Pearson(PearsonArgs),
    /// Dilution calculator
    Dilute(DiluteArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Animal ID from standards table
    #[arg(short, long)]
    pub animal: String,

    /// Diet format: "FeedID:Qty,FeedID:Qty"
    #[arg(short, long)]
    pub diet: String,

    /// Path to standards CSV
    #[arg(long)]
    pub standards: Option<String>,

    /// Path to feeds CSV
    #[arg(long)]
    pub feeds: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct PearsonArgs {
    /// Target nutrient value
    #[arg(short, long, allow_negative_numbers = true)]
    pub target: f64,

    /// Value of feed 1
    #[arg(long, visible_alias = "f1", allow_negative_numbers = true)]
    pub feed1: f64,

    /// Value of feed 2
    #[arg(long, visible_alias = "f2", allow_negative_numbers = true)]
    pub feed2: f64,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct DiluteArgs {
    /// Initial concentration %
    #[arg(short, long, allow_negative_numbers = true)]
    pub start: f64,

    /// Target concentration %
    #[arg(short, long, allow_negative_numbers = true)]
    pub target: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
