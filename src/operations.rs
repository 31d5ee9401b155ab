//! High-level check and sync runs over every configured language, reusable by
//! the CLI and by library users.

use std::{
    collections::BTreeSet,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::{
    compare::{
        Incoherence, completion_percent, extra_keys, find_incoherences, missing_keys, pending_keys,
    },
    config::Config,
    error::Error,
    reconcile::{ReconcileOptions, StructuralConflict, reconcile_with, structural_conflicts},
    store::{LanguageFile, LocaleStore},
    tree::{FlatKey, FlatMap, Tree},
};

/// Check results for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageCheck {
    pub language: String,
    /// Number of flat keys in this language.
    pub present: usize,
    /// `present` over the union of keys across all languages.
    pub completion_percent: f64,
    /// Base keys this language lacks, sorted.
    pub missing: Vec<FlatKey>,
    /// Keys the base does not have, sorted.
    pub extra: Vec<FlatKey>,
    /// Keys still carrying the placeholder marker.
    pub pending: Vec<FlatKey>,
    pub incoherences: Vec<Incoherence>,
    /// Keys whose shape differs from the base. A sync of this language fails
    /// until they are fixed by hand.
    pub structural: Vec<StructuralConflict>,
}

/// Check results for a whole run, base language first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub base_language: String,
    pub base_keys: usize,
    /// Distinct keys across every language.
    pub total_keys: usize,
    pub languages: Vec<LanguageCheck>,
}

impl CheckReport {
    pub fn get(&self, language: &str) -> Option<&LanguageCheck> {
        self.languages.iter().find(|l| l.language == language)
    }

    pub fn targets(&self) -> impl Iterator<Item = &LanguageCheck> {
        self.languages
            .iter()
            .filter(|l| l.language != self.base_language)
    }
}

/// Options controlling a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckOptions {
    /// Leave leaves still carrying the placeholder marker out of the length
    /// heuristic. They are listed as pending either way.
    pub skip_pending: bool,
}

/// Loads every configured language and compares it with the base. Read-only.
pub fn check_languages(config: &Config) -> Result<CheckReport, Error> {
    check_languages_with(config, &CheckOptions::default())
}

/// Like [`check_languages`], with explicit options.
pub fn check_languages_with(config: &Config, options: &CheckOptions) -> Result<CheckReport, Error> {
    config.validate()?;
    let store = LocaleStore::new(config.clone());
    let reconcile_options = config.reconcile_options();

    let mut loaded: Vec<(String, Tree, FlatMap)> = Vec::new();
    for language in config.languages() {
        let file = store.load(language)?;
        let flat = file
            .tree
            .try_flatten()
            .map_err(|e| e.in_language(language))?;
        loaded.push((language.to_string(), file.tree, flat));
    }

    let total_keys = loaded
        .iter()
        .flat_map(|(_, _, flat)| flat.keys())
        .collect::<BTreeSet<_>>()
        .len();
    let (_, base_tree, base_flat) = &loaded[0];
    let is_pending = |value: &str| reconcile_options.is_placeholder(value);

    let languages = loaded
        .iter()
        .map(|(language, tree, flat)| {
            let check = LanguageCheck {
                language: language.clone(),
                present: flat.len(),
                completion_percent: completion_percent(flat.len(), total_keys),
                missing: missing_keys(base_flat, flat),
                extra: extra_keys(base_flat, flat),
                pending: pending_keys(flat, is_pending),
                incoherences: find_incoherences(base_flat, flat, |value| {
                    options.skip_pending && is_pending(value)
                }),
                structural: structural_conflicts(tree, base_tree),
            };
            for conflict in &check.structural {
                tracing::warn!(
                    language = %language,
                    key = %conflict.key,
                    expected = %conflict.expected,
                    found = %conflict.found,
                    "structural mismatch, sync will fail for this language"
                );
            }
            tracing::info!(
                language = %language,
                missing = check.missing.len(),
                pending = check.pending.len(),
                incoherent = check.incoherences.len(),
                "checked language"
            );
            check
        })
        .collect();

    Ok(CheckReport {
        base_language: config.base_language.clone(),
        base_keys: base_flat.len(),
        total_keys,
        languages,
    })
}

/// Options controlling a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOptions {
    /// Compute every change but write nothing.
    pub dry_run: bool,
}

/// Changes applied to one language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LanguageSync {
    pub language: String,
    pub path: PathBuf,
    pub added: Vec<FlatKey>,
    pub removed: Vec<FlatKey>,
    /// Whether reconciliation modified the tree, including empty nested
    /// levels that add or remove no keys.
    pub changed: bool,
    /// Whether the file was rewritten. Unchanged files and dry runs are not.
    pub written: bool,
}

impl LanguageSync {
    pub fn is_unchanged(&self) -> bool {
        !self.changed
    }
}

/// Changes applied to every target language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub base_language: String,
    pub dry_run: bool,
    pub languages: Vec<LanguageSync>,
}

impl SyncReport {
    pub fn total_added(&self) -> usize {
        self.languages.iter().map(|l| l.added.len()).sum()
    }

    pub fn total_removed(&self) -> usize {
        self.languages.iter().map(|l| l.removed.len()).sum()
    }
}

/// Reconciles target languages against a base loaded once.
///
/// Each call to [`Synchronizer::sync_language`] loads one target, reconciles
/// it in memory and writes it back only when the whole reconciliation
/// succeeded.
pub struct Synchronizer {
    store: LocaleStore,
    base: LanguageFile,
    options: ReconcileOptions,
}

impl Synchronizer {
    pub fn new(config: &Config) -> Result<Self, Error> {
        config.validate()?;
        let store = LocaleStore::new(config.clone());
        let base = store.load_base()?;
        Ok(Self {
            options: config.reconcile_options(),
            store,
            base,
        })
    }

    pub fn base(&self) -> &LanguageFile {
        &self.base
    }

    pub fn sync_language(&self, language: &str, options: &SyncOptions) -> Result<LanguageSync, Error> {
        let mut file = self.store.load(language)?;
        let report = reconcile_with(&mut file.tree, &self.base.tree, &self.options)
            .map_err(|e| e.in_language(language))?;

        tracing::info!(
            language,
            added = report.added.len(),
            removed = report.removed.len(),
            changed = report.changed,
            "reconciled language"
        );

        let mut result = LanguageSync {
            language: language.to_string(),
            path: file.path.clone(),
            added: report.added,
            removed: report.removed,
            changed: report.changed,
            written: false,
        };
        if !options.dry_run && !result.is_unchanged() {
            file.save()?;
            result.written = true;
        }
        Ok(result)
    }
}

/// Reconciles every target language in order, stopping at the first failure.
///
/// Languages processed before a failure keep their written files; the failing
/// language is left as it was on disk.
pub fn sync_languages(config: &Config, options: &SyncOptions) -> Result<SyncReport, Error> {
    sync_languages_with(config, options, |_| {})
}

/// Like [`sync_languages`], calling `on_language` as soon as each language is done.
pub fn sync_languages_with<F>(
    config: &Config,
    options: &SyncOptions,
    mut on_language: F,
) -> Result<SyncReport, Error>
where
    F: FnMut(&LanguageSync),
{
    let synchronizer = Synchronizer::new(config)?;
    let mut report = SyncReport {
        base_language: config.base_language.clone(),
        dry_run: options.dry_run,
        languages: Vec::new(),
    };
    for language in &config.target_languages {
        let result = synchronizer.sync_language(language, options)?;
        on_language(&result);
        report.languages.push(result);
    }
    Ok(report)
}
