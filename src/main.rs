//! Entry point for the ts-catalog command line tool.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use ts_catalog::config::{
    CatalogMatcher,
    CatalogSettings,
    ConfigError,
    ConfigManager,
    MatcherError,
};
use ts_catalog::input::{
    load_catalog,
    load_extraction,
};
use ts_catalog::merge::merge;
use ts_catalog::output::save_catalog;
use ts_catalog::plural::PluralRules;
use ts_catalog::stats::CatalogStats;
use ts_catalog::workspace::{
    WorkspaceError,
    collect_stats,
    find_catalog_files,
};
use ts_catalog::{
    CatalogError,
    UnsupportedLanguageError,
};

use crate::cli::{
    Cli,
    Command,
    MergeArgs,
    PluralArgs,
    PruneArgs,
    StatsArgs,
};

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Matcher(#[from] MatcherError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Language(#[from] UnsupportedLanguageError),
    #[error("Failed to determine the working directory: {0}")]
    CurrentDir(std::io::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let workspace_root = match cli.workspace {
        Some(root) => root,
        None => std::env::current_dir().map_err(CliError::CurrentDir)?,
    };

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(workspace_root))?;
    config_manager.apply_overrides(cli.command.overrides())?;
    let settings = config_manager.get_settings();
    let root = config_manager.workspace_root().unwrap_or_else(|| Path::new("."));

    match cli.command {
        Command::Merge(args) => run_merge(&args, settings),
        Command::Stats(args) => run_stats(&args, settings, root),
        Command::Plural(args) => run_plural(&args),
        Command::Prune(args) => run_prune(&args, settings),
    }
}

#[allow(clippy::print_stdout)]
fn run_merge(args: &MergeArgs, settings: &CatalogSettings) -> Result<(), CliError> {
    let mut catalog = load_catalog(&args.catalog)?;
    if catalog.source_language.is_none() {
        catalog.source_language.clone_from(&settings.source_language);
    }
    let extraction = load_extraction(&args.extraction)?;

    let outcome = merge(catalog, &extraction, &settings.merge);

    println!("{}: {}", args.catalog.display(), outcome.report);
    for warning in &outcome.warnings {
        println!("  warning: {warning}");
    }

    if args.dry_run {
        return Ok(());
    }

    let target = args.output.as_ref().unwrap_or(&args.catalog);
    save_catalog(target, &outcome.catalog, &settings.output.write_options())?;
    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_stats(
    args: &StatsArgs,
    settings: &CatalogSettings,
    workspace_root: &Path,
) -> Result<(), CliError> {
    let files = if args.paths.is_empty() {
        find_catalog_files(&CatalogMatcher::new(workspace_root.to_path_buf(), settings)?)
    } else {
        args.paths.clone()
    };
    let num_threads = settings.indexing.thread_count();

    let mut total = CatalogStats::default();
    let mut failed = 0_usize;
    for result in collect_stats(&files, num_threads)? {
        match result {
            Ok(file) => {
                println!("{} [{}]: {}", file.path.display(), file.language, file.stats);
                total += file.stats;
            }
            Err(err) => {
                println!("{err}");
                failed += 1;
            }
        }
    }

    println!("Total: {total}");
    tracing::info!(files = files.len(), failed, "Statistics collected");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_plural(args: &PluralArgs) -> Result<(), CliError> {
    let rules = PluralRules::for_language(&args.language)?;
    let names: Vec<&str> = rules.categories().iter().map(|c| c.as_str()).collect();
    println!("{}: {} form(s): {}", args.language, rules.count(), names.join(", "));

    if let Some(count) = args.count {
        println!("{count} -> form {} ({})", rules.form_index(count), rules.category(count));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn run_prune(args: &PruneArgs, settings: &CatalogSettings) -> Result<(), CliError> {
    let mut catalog = load_catalog(&args.catalog)?;
    // Without flags both kinds of retired messages go.
    let both = !args.vanished && !args.obsolete;

    let mut removed = 0;
    if args.vanished || both {
        removed += catalog.prune_vanished();
    }
    if args.obsolete || both {
        removed += catalog.prune_obsolete();
    }

    save_catalog(&args.catalog, &catalog, &settings.output.write_options())?;
    println!("{}: {removed} message(s) removed", args.catalog.display());
    Ok(())
}
