mod cli;

use clap::Parser;
use cli::Args;
use release_forest::adapters::outbound::console::StderrProgressReporter;
use release_forest::adapters::outbound::filesystem::DocumentForestWalker;
use release_forest::adapters::outbound::resolvers::ReleaseRule;
use release_forest::application::dto::{AnalysisRequest, OutputFormat};
use release_forest::application::factories::{
    FormatterFactory, PresenterFactory, PresenterType, ResolverFactory,
};
use release_forest::application::use_cases::AnalyzeForestUseCase;
use release_forest::config::{self, ConfigFile};
use release_forest::release_analysis::services::{CyclePolicy, ResolutionPolicy};
use release_forest::shared::error::{AnalysisError, ExitCode};
use release_forest::shared::Result;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here and are not failures
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(exit_code_for(&e).as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let settings = Settings::merge(&args, config);

    // Create adapters (Dependency Injection)
    let walker = DocumentForestWalker::from_path(&args.forest)?;
    eprintln!(
        "{}",
        ResolverFactory::progress_message(settings.release_rules.len())
    );
    let resolver = ResolverFactory::create(settings.release_rules)?;
    let progress_reporter = StderrProgressReporter::new();

    let use_case = AnalyzeForestUseCase::new(walker, resolver, progress_reporter);
    let request = AnalysisRequest::new(
        settings.exclude_patterns,
        settings.include_unmanaged,
        settings.resolution_policy,
        settings.cycle_policy,
    );
    let response = use_case.execute(request).await?;

    // A build order is meaningless while a fatal cycle exists
    if let Some(error) = response.cycle_error() {
        return Err(error.into());
    }

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatter = FormatterFactory::create(settings.format);
    let formatted_output = formatter.format(&response)?;

    let presenter = PresenterFactory::create(PresenterType::from_output(args.output));
    presenter.present(&formatted_output)?;

    if response.summary.is_fatal() {
        eprintln!(
            "\n❌ {} component(s) could not be resolved; see the report for details.",
            response.summary.failed.len()
        );
        return Ok(ExitCode::FatalAnalysis);
    }
    Ok(ExitCode::Success)
}

/// Loads `--config`, or discovers the config next to the forest document
fn load_config(args: &Args) -> Result<ConfigFile> {
    if let Some(path) = &args.config {
        return config::load_config_from_path(path);
    }

    let dir = forest_directory(&args.forest);
    Ok(config::discover_config(&dir)?.unwrap_or_default())
}

fn forest_directory(forest: &Path) -> PathBuf {
    match forest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::CircularDependency { .. }) | Some(AnalysisError::Resolution { .. }) => {
            ExitCode::FatalAnalysis
        }
        _ => ExitCode::ApplicationError,
    }
}

/// Effective run settings; CLI flags take precedence over the config file
#[derive(Debug)]
struct Settings {
    format: OutputFormat,
    exclude_patterns: Vec<String>,
    include_unmanaged: bool,
    resolution_policy: ResolutionPolicy,
    cycle_policy: CyclePolicy,
    release_rules: Vec<ReleaseRule>,
}

impl Settings {
    fn merge(args: &Args, config: ConfigFile) -> Self {
        let format = args
            .format
            .or_else(|| config.output_format())
            .unwrap_or_default();

        let resolution_policy = if args.continue_on_resolution_failure {
            ResolutionPolicy::CollectAndContinue
        } else {
            config.resolution_policy().unwrap_or_default()
        };

        let cycle_policy = if args.warn_on_cycles {
            CyclePolicy::Warn
        } else {
            config.cycle_policy().unwrap_or_default()
        };

        let mut exclude_patterns = config.exclude_components.unwrap_or_default();
        for pattern in &args.exclude {
            if !exclude_patterns.contains(pattern) {
                exclude_patterns.push(pattern.clone());
            }
        }

        Self {
            format,
            exclude_patterns,
            include_unmanaged: args.include_unmanaged || config.include_unmanaged.unwrap_or(false),
            resolution_policy,
            cycle_policy,
            release_rules: config.release_rules.unwrap_or_default(),
        }
    }
}
