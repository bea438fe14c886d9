//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tapestry_domain::ItemType;
use tapestry_orchestrator::OrchestratorConfig;

/// Tapestry CLI - Organize content and explore its relationships.
#[derive(Debug, Parser)]
#[command(name = "tapestry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "TAPESTRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend fixture file (JSON)
    #[arg(long, global = true, env = "TAPESTRY_FIXTURE")]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze items and show suggested organization
    Analyze(AnalyzeArgs),

    /// Analyze items, then apply automatic organization
    Organize(OrganizeArgs),

    /// Show the relationship network around an item
    Network(NetworkArgs),

    /// Show learning pathways starting from an item
    Pathways(PathwaysArgs),

    /// Show filtered suggestions for an item
    Suggest(SuggestArgs),

    /// Show or change configuration
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Item IDs to analyze
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Type of the items
    #[arg(short = 't', long, value_enum, default_value = "document")]
    pub item_type: ItemTypeArg,
}

/// Arguments for the organize command.
#[derive(Debug, Parser)]
pub struct OrganizeArgs {
    /// Item IDs to organize
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Type of the items
    #[arg(short = 't', long, value_enum, default_value = "document")]
    pub item_type: ItemTypeArg,
}

/// Arguments for the network command.
#[derive(Debug, Parser)]
pub struct NetworkArgs {
    /// Center item ID
    pub id: String,

    /// Traversal depth (defaults to the configured depth)
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Part of the network to show
    #[arg(long, value_enum, default_value = "full")]
    pub view: NetworkView,
}

/// Network views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NetworkView {
    /// Every relationship with statistics
    Full,
    /// Cultural clusters only
    Clusters,
    /// Community-response relationships only
    Community,
    /// Parent, child and continuation relationships only
    Hierarchy,
}

/// Arguments for the pathways command.
#[derive(Debug, Parser)]
pub struct PathwaysArgs {
    /// Starting item ID
    pub id: String,

    /// Show stored pathways recommended for the item instead
    #[arg(long)]
    pub recommended: bool,
}

/// Arguments for the suggest command.
#[derive(Debug, Parser)]
pub struct SuggestArgs {
    /// Item ID
    pub id: String,

    /// Kind of suggestion
    #[arg(short, long, value_enum, default_value = "relationships")]
    pub kind: SuggestKindArg,

    /// Maximum number of similar items
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Suggestion kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SuggestKindArg {
    /// Tags
    Tags,
    /// Categories
    Categories,
    /// Relationship candidates
    Relationships,
    /// Similar items
    Similar,
    /// Cultural variants
    Variants,
    /// Community responses
    Responses,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the engine configuration and organization settings
    Show,

    /// Print a preset engine configuration as TOML
    Preset {
        /// Preset name
        #[arg(value_enum)]
        preset: PresetArg,
    },

    /// Change organization settings
    Set {
        /// Minimum confidence for automatic tags
        #[arg(long)]
        auto_tagging_threshold: Option<f64>,

        /// Minimum confidence for automatic categories
        #[arg(long)]
        categorization_threshold: Option<f64>,

        /// Request community review for flagged categories
        #[arg(long)]
        require_cultural_validation: Option<bool>,

        /// Record user corrections for learning
        #[arg(long)]
        learning_enabled: Option<bool>,
    },
}

/// Engine configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Default settings
    Default,
    /// Short cache lifetimes, large chunks
    Aggressive,
    /// Long cache lifetimes, small chunks, strict rules
    Lenient,
}

/// Item type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ItemTypeArg {
    /// A single document
    Document,
    /// A collection of documents
    Collection,
}

impl From<CliFormat> for crate::output::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::OutputFormat::Table,
            CliFormat::Json => crate::output::OutputFormat::Json,
        }
    }
}

impl From<ItemTypeArg> for ItemType {
    fn from(item_type: ItemTypeArg) -> Self {
        match item_type {
            ItemTypeArg::Document => ItemType::Document,
            ItemTypeArg::Collection => ItemType::Collection,
        }
    }
}

impl From<PresetArg> for OrchestratorConfig {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Default => OrchestratorConfig::default(),
            PresetArg::Aggressive => OrchestratorConfig::aggressive(),
            PresetArg::Lenient => OrchestratorConfig::lenient(),
        }
    }
}
