use locsync::Config;
use std::path::PathBuf;

/// Options shared by every command: where the config comes from and overrides on top of it.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub base: Option<String>,
    pub langs: Vec<String>,
}

/// Builds the effective config: defaults, then the config file, then CLI overrides.
///
/// Without `--config`, `locsync.toml` in the working directory is used when present.
pub fn resolve_config(opts: &GlobalOptions) -> Result<Config, String> {
    let mut config = match &opts.config {
        Some(path) => Config::load(path)
            .map_err(|e| format!("Failed to load config '{}': {}", path.display(), e))?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| format!("Cannot determine working directory: {}", e))?;
            Config::discover(cwd).map_err(|e| format!("Failed to load config: {}", e))?
        }
    };

    if let Some(dir) = &opts.dir {
        config = config.with_locales_dir(dir.clone());
    }
    if let Some(base) = &opts.base {
        config = config.with_base_language(base.clone());
    }
    if !opts.langs.is_empty() {
        config = config.with_target_languages(opts.langs.iter().cloned());
    }

    config.validate().map_err(|e| e.to_string())?;
    tracing::debug!(
        locales_dir = %config.locales_dir.display(),
        base = %config.base_language,
        targets = config.target_languages.len(),
        "resolved config"
    );
    Ok(config)
}

/// Appends `... and N more` when `items` is longer than `limit`.
pub fn sample_lines<T, F>(items: &[T], limit: usize, indent: &str, render: F) -> Vec<String>
where
    F: Fn(usize, &T) -> String,
{
    let mut lines: Vec<String> = items
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, item)| format!("{}{}", indent, render(i, item)))
        .collect();
    if items.len() > limit {
        lines.push(format!("{}... and {} more", indent, items.len() - limit));
    }
    lines
}
