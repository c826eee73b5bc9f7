use clap::Parser;
use std::path::PathBuf;

use release_forest::application::dto::OutputFormat;

/// Group components of a dependency forest into release units, order them
/// for building, detect circular release dependencies and emit a
/// deduplicated manifest
#[derive(Parser, Debug)]
#[command(name = "release-forest")]
#[command(version)]
#[command(about, long_about = None)]
pub struct Args {
    /// Forest document to analyse (.json, .yaml, .yml or .toml)
    #[arg(long, value_name = "PATH")]
    pub forest: PathBuf,

    /// Output format: json or markdown [default: json]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exclude components matching `group:name` patterns (supports wildcards: *)
    /// Can be specified multiple times: -e "org.acme:*-testkit" -e "com.other:*"
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Config file (defaults to release-forest.config.yml next to the forest document)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep components that are not managed by the analysed project set
    #[arg(long)]
    pub include_unmanaged: bool,

    /// Report circular release dependencies as warnings instead of failing
    #[arg(long)]
    pub warn_on_cycles: bool,

    /// Skip components whose release cannot be resolved and fail at the end
    #[arg(long)]
    pub continue_on_resolution_failure: bool,
}
