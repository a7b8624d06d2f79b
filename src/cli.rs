//! CLI argument definitions for ts-catalog.

use std::path::PathBuf;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use ts_catalog::config::SettingsOverrides;

/// Update, inspect and prune Qt Linguist translation catalogs.
#[derive(Parser, Debug)]
#[command(name = "ts-catalog")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Merge a fresh extraction into a catalog:\n",
    "    $ ts-catalog merge nls/qt_tr.ts extracted.json\n\n",
    "  Show completeness of every catalog in the workspace:\n",
    "    $ ts-catalog stats\n\n",
    "  Show the plural form used for 5 in Slovenian:\n",
    "    $ ts-catalog plural sl 5",
))]
pub(crate) struct Cli {
    /// Workspace root holding `.ts-catalog.json` [default: current directory].
    #[arg(short, long, global = true, value_name = "DIR")]
    pub(crate) workspace: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Merge an extraction list into a catalog.
    Merge(MergeArgs),

    /// Print completeness statistics.
    Stats(StatsArgs),

    /// Print the plural categories of a language.
    Plural(PluralArgs),

    /// Delete vanished and/or obsolete messages from a catalog.
    Prune(PruneArgs),
}

/// Arguments for the merge command.
#[derive(Args, Debug, Clone)]
pub(crate) struct MergeArgs {
    /// Catalog to update.
    pub(crate) catalog: PathBuf,

    /// JSON extraction list.
    pub(crate) extraction: PathBuf,

    /// Write the result here instead of updating the catalog in place.
    #[arg(short, long, value_name = "FILE")]
    pub(crate) output: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Drop vanished messages after merging.
    #[arg(long)]
    pub(crate) no_obsolete: bool,
}

/// Arguments for the stats command.
#[derive(Args, Debug, Clone)]
pub(crate) struct StatsArgs {
    /// Catalog files [default: every catalog matched in the workspace].
    pub(crate) paths: Vec<PathBuf>,

    /// Number of parallel readers [default: 80% of CPU cores].
    #[arg(short, long, value_name = "N")]
    pub(crate) jobs: Option<usize>,
}

/// Arguments for the plural command.
#[derive(Args, Debug, Clone)]
pub(crate) struct PluralArgs {
    /// Language tag such as `tr`, `pt_BR` or `sr-Latn`.
    pub(crate) language: String,

    /// Quantity to resolve to a form slot.
    pub(crate) count: Option<u64>,
}

/// Arguments for the prune command.
#[derive(Args, Debug, Clone)]
pub(crate) struct PruneArgs {
    /// Catalog to prune in place.
    pub(crate) catalog: PathBuf,

    /// Delete vanished messages.
    #[arg(long)]
    pub(crate) vanished: bool,

    /// Delete obsolete messages.
    #[arg(long)]
    pub(crate) obsolete: bool,
}

impl Command {
    /// Flags that override `.ts-catalog.json`.
    pub(crate) const fn overrides(&self) -> SettingsOverrides {
        match self {
            Self::Merge(args) => SettingsOverrides { no_obsolete: args.no_obsolete, num_threads: None },
            Self::Stats(args) => SettingsOverrides { no_obsolete: false, num_threads: args.jobs },
            Self::Plural(_) | Self::Prune(_) => {
                SettingsOverrides { no_obsolete: false, num_threads: None }
            }
        }
    }
}
