use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// GeoChat - Chat with a city's geospatial datasets
#[derive(Parser, Debug)]
#[command(name = "geochat")]
#[command(about = "Chat with a city's geospatial datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration overrides shared by every command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file (defaults to ./geochat.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding data/geoJSON
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// JSON file mapping dataset URLs to filter types
    #[arg(long, global = true, value_name = "FILE")]
    pub mapping_file: Option<PathBuf>,

    /// Chat model as provider:model (e.g. "deepseek:deepseek-chat")
    #[arg(long, global = true)]
    pub llm: Option<String>,

    /// Base URL of the chat model API
    #[arg(long, global = true)]
    pub llm_base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the data directory and list the dataset catalog
    Scan(ScanArgs),

    /// Show the filterable fields of dataset types
    Fields(FieldsArgs),

    /// Apply attribute filters to datasets
    Filter(FilterArgs),

    /// Ask a question about the datasets
    Ask(AskArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Only list datasets of this type (Point, MultiLineString)
    #[arg(long = "type", value_name = "TYPE")]
    pub data_type: Option<String>,
}

#[derive(Parser, Debug)]
pub struct FieldsArgs {
    /// Filter types such as park or shelter
    #[arg(required = true)]
    pub types: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// Dataset URLs such as /data/geoJSON/Point/park.geojson
    #[arg(long = "url", required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Criteria as JSON, e.g. '{"park_parkType": ["総合公園"]}'
    #[arg(long, conflicts_with_all = ["criteria_file", "clear"])]
    pub criteria: Option<String>,

    /// Read criteria from a JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "clear")]
    pub criteria_file: Option<PathBuf>,

    /// Show every feature again instead of filtering
    #[arg(long)]
    pub clear: bool,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question, e.g. "千葉公園はどこ？"
    pub question: String,

    /// Stop after data selection and routing
    #[arg(long)]
    pub no_answer: bool,

    /// Run the external maps query when routing asks for one
    #[arg(long)]
    pub maps: bool,
}
