use locsync::{Config, LanguageSync, SyncOptions, sync_languages_with};

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub dry_run: bool,
}

/// One line per changed key, then the per-file totals.
pub fn render_language(result: &LanguageSync) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.extend(result.added.iter().map(|key| format!("+ Added: {}", key)));
    lines.extend(result.removed.iter().map(|key| format!("- Removed: {}", key)));

    let verb = if result.written {
        "updated"
    } else if result.is_unchanged() {
        "unchanged"
    } else {
        "not written"
    };
    lines.push(format!(
        "\nFile {}.json {}: {} keys added, {} keys removed\n",
        result.language,
        verb,
        result.added.len(),
        result.removed.len()
    ));
    lines.join("\n")
}

pub fn run_update_command(config: &Config, opts: &UpdateOptions) -> Result<(), String> {
    let lib_opts = SyncOptions {
        dry_run: opts.dry_run,
    };
    sync_languages_with(config, &lib_opts, |result| {
        println!("{}", render_language(result));
    })
    .map_err(|e| e.to_string())?;

    if opts.dry_run {
        println!("Dry-run mode: no files were written");
    } else {
        println!("All localization files have been updated");
    }
    Ok(())
}
