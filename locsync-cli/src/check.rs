use crate::settings::sample_lines;
use locsync::{CheckOptions as LibCheckOptions, CheckReport, Config, check_languages_with};

/// Missing keys listed per language before the rest is summarized.
pub const MISSING_SAMPLE: usize = 10;
/// Incoherences listed per language before the rest is summarized.
pub const INCOHERENCE_SAMPLE: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub json: bool,
    pub skip_pending: bool,
}

pub fn run_check_command(config: &Config, opts: &CheckOptions) -> Result<(), String> {
    let lib_opts = LibCheckOptions {
        skip_pending: opts.skip_pending,
    };
    let report = check_languages_with(config, &lib_opts).map_err(|e| e.to_string())?;

    if opts.json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize check report: {}", e))?;
        println!("{}", text);
    } else {
        println!(
            "{}",
            render_human(&report, &config.placeholder_marker, opts.skip_pending)
        );
    }
    Ok(())
}

pub fn render_human(report: &CheckReport, marker: &str, skip_pending: bool) -> String {
    let base = report.base_language.as_str();
    let mut lines = Vec::new();

    lines.push("=== Translation completeness ===".to_string());
    for lang in &report.languages {
        lines.push(format!(
            "{}: {}/{} keys ({:.2}%)",
            lang.language, lang.present, report.total_keys, lang.completion_percent
        ));
    }

    lines.push(format!(
        "\n=== Missing keys compared to {} ({} keys) ===",
        base, report.base_keys
    ));
    for lang in report.targets() {
        if lang.missing.is_empty() {
            lines.push(format!("\n{}: no missing keys", lang.language));
            continue;
        }
        lines.push(format!("\n{}: {} missing keys", lang.language, lang.missing.len()));
        lines.extend(sample_lines(&lang.missing, MISSING_SAMPLE, "  ", |_, key| {
            format!("- {}", key)
        }));
        if !lang.extra.is_empty() {
            lines.push(format!(
                "  ({} keys not in {}, run sync to remove them)",
                lang.extra.len(),
                base
            ));
        }
    }

    lines.push("\n=== Pending translations ===".to_string());
    for lang in report.targets() {
        if lang.pending.is_empty() {
            lines.push(format!("{}: nothing pending", lang.language));
        } else {
            lines.push(format!(
                "{}: {} keys still marked {}",
                lang.language,
                lang.pending.len(),
                marker
            ));
        }
    }

    if report.targets().any(|lang| !lang.structural.is_empty()) {
        lines.push("\n=== Structural conflicts (sync will fail) ===".to_string());
        for lang in report.targets().filter(|lang| !lang.structural.is_empty()) {
            lines.push(format!("\n{}: {} conflicts", lang.language, lang.structural.len()));
            lines.extend(sample_lines(&lang.structural, MISSING_SAMPLE, "  ", |_, c| {
                format!("- {}: {} in {}, {} here", c.key, c.expected, base, c.found)
            }));
        }
    }

    lines.push("\n=== Possible incoherent translations ===".to_string());
    if skip_pending {
        lines.push(format!("(keys still marked {} are left out)", marker));
    }
    for lang in report.targets() {
        if lang.incoherences.is_empty() {
            lines.push(format!("\n{}: no incoherences detected", lang.language));
            continue;
        }
        lines.push(format!(
            "\n{}: {} possible incoherences",
            lang.language,
            lang.incoherences.len()
        ));
        let base_label = base.to_uppercase();
        let lang_label = lang.language.to_uppercase();
        lines.extend(sample_lines(
            &lang.incoherences,
            INCOHERENCE_SAMPLE,
            "  ",
            |i, item| {
                format!(
                    "{}. {}:\n     {}: {}\n     {}: {}",
                    i + 1,
                    item.key,
                    base_label,
                    item.base,
                    lang_label,
                    item.translated
                )
            },
        ));
    }

    lines.join("\n")
}
