use crate::settings::sample_lines;
use locsync::{Config, LanguageSync, SyncOptions as LibSyncOptions, SyncReport, sync_languages_with};
use serde_json::json;

/// Added and removed keys listed per language before the rest is summarized.
pub const CHANGE_SAMPLE: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub dry_run: bool,
    pub report_json: Option<String>,
}

fn write_report(path: &str, config: &Config, report: &SyncReport) -> Result<(), String> {
    let payload = json!({
        "locales_dir": config.locales_dir,
        "base_language": report.base_language,
        "dry_run": report.dry_run,
        "summary": {
            "languages": report.languages.len(),
            "added": report.total_added(),
            "removed": report.total_removed(),
        },
        "languages": report.languages,
    });

    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to write report JSON '{}': {}", path, e))
}

fn sorted(keys: &[String]) -> Vec<String> {
    let mut keys = keys.to_vec();
    keys.sort();
    keys
}

pub fn render_language(result: &LanguageSync) -> String {
    let mut lines = Vec::new();
    lines.push(format!("  ✓ {} keys added", result.added.len()));
    lines.push(format!("  ✓ {} keys removed", result.removed.len()));
    if !result.added.is_empty() {
        lines.push("  Added keys:".to_string());
        lines.extend(sample_lines(
            &sorted(&result.added),
            CHANGE_SAMPLE,
            "   ",
            |_, key| format!("- {}", key),
        ));
    }
    if !result.removed.is_empty() {
        lines.push("  Removed keys:".to_string());
        lines.extend(sample_lines(
            &sorted(&result.removed),
            CHANGE_SAMPLE,
            "   ",
            |_, key| format!("- {}", key),
        ));
    }
    lines.join("\n")
}

pub fn run_sync_command(config: &Config, opts: &SyncOptions) -> Result<(), String> {
    println!("=== Translation sync ===\n");

    let lib_opts = LibSyncOptions {
        dry_run: opts.dry_run,
    };
    let report: SyncReport = sync_languages_with(config, &lib_opts, |result| {
        println!("Synced {}.json", result.language);
        println!("{}\n", render_language(result));
    })
    .map_err(|e| e.to_string())?;

    if let Some(report_path) = &opts.report_json {
        write_report(report_path, config, &report)?;
        println!("Report JSON written: {}", report_path);
    }

    if opts.dry_run {
        println!("Dry-run mode: no files were written");
        return Ok(());
    }

    println!("✅ All localization files are in sync with {}.json", config.base_language);
    println!("\nNext steps:");
    println!("1. Run check to review translation status");
    println!(
        "2. Translate the keys marked with {}",
        config.placeholder_marker
    );
    println!("3. Review the reported incoherences and fix translations where needed");
    Ok(())
}
