//! Command implementations shared by the `locsync` binary and the
//! single-purpose `check-translations`, `sync-translations` and
//! `update-translations` entry points.

pub mod check;
pub mod logging;
pub mod settings;
pub mod sync;
pub mod update;

pub use settings::{GlobalOptions, resolve_config};

/// Command selected by the invoked entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Check,
    Sync,
    Update,
}

/// Runs `entry` with the discovered configuration and default options.
///
/// Returns the process exit code.
pub fn run_entry_point(entry: EntryPoint) -> i32 {
    logging::init_logging(0);

    let result = resolve_config(&GlobalOptions::default()).and_then(|config| match entry {
        EntryPoint::Check => check::run_check_command(&config, &check::CheckOptions::default()),
        EntryPoint::Sync => sync::run_sync_command(&config, &sync::SyncOptions::default()),
        EntryPoint::Update => {
            update::run_update_command(&config, &update::UpdateOptions::default())
        }
    });

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
