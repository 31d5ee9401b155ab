use clap::{ArgAction, Parser, Subcommand};
use locsync_cli::{
    GlobalOptions,
    check::{CheckOptions, run_check_command},
    logging::init_logging,
    resolve_config,
    sync::{SyncOptions, run_sync_command},
    update::{UpdateOptions, run_update_command},
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./locsync.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the <language>.json files
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Base language whose keys every other language must match
    #[arg(long, global = true)]
    base: Option<String>,

    /// Target language to process (repeat for several; replaces the configured list)
    #[arg(long = "lang", global = true)]
    langs: Vec<String>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Report completeness, missing keys and suspicious translations.
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Leave keys still marked for translation out of the length check
        #[arg(long)]
        skip_pending: bool,
    },

    /// Add missing keys and remove stale ones, printing a summary per language.
    Sync {
        /// Compute changes without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Write a JSON report of every change to this path
        #[arg(long)]
        report_json: Option<String>,
    },

    /// Add missing keys and remove stale ones, printing every change.
    Update {
        /// Compute changes without writing any file
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let global = GlobalOptions {
        config: args.config,
        dir: args.dir,
        base: args.base,
        langs: args.langs,
    };

    let result = resolve_config(&global).and_then(|config| match args.commands {
        Commands::Check { json, skip_pending } => {
            run_check_command(&config, &CheckOptions { json, skip_pending })
        }
        Commands::Sync {
            dry_run,
            report_json,
        } => run_sync_command(
            &config,
            &SyncOptions {
                dry_run,
                report_json,
            },
        ),
        Commands::Update { dry_run } => run_update_command(&config, &UpdateOptions { dry_run }),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
