//! Comparison of flattened dictionaries: key coverage and the length heuristic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tree::{FlatKey, FlatMap};

/// A translation whose length is disproportionate to the base text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incoherence {
    pub key: FlatKey,
    pub base: String,
    pub translated: String,
}

/// Whether `translated` looks too short or too long for `base`.
///
/// Lengths are counted in characters. Empty strings are never flagged. A
/// translation is flagged when it is shorter than half or longer than double
/// the base text; exactly half and exactly double pass.
pub fn is_incoherent(base: &str, translated: &str) -> bool {
    let base_len = base.chars().count();
    let translated_len = translated.chars().count();
    if base_len == 0 || translated_len == 0 {
        return false;
    }
    translated_len * 2 < base_len || translated_len > base_len * 2
}

/// Flags every shared key whose text values fail [`is_incoherent`], in base
/// order. Keys where either side is not a string are never flagged.
///
/// Values for which `skip` returns true (e.g. untranslated placeholders) are
/// left out.
pub fn find_incoherences<F>(base: &FlatMap, target: &FlatMap, skip: F) -> Vec<Incoherence>
where
    F: Fn(&str) -> bool,
{
    base.iter()
        .filter_map(|(key, base_value)| {
            let base_text = base_value.as_str()?;
            let translated = target.get(key).and_then(Value::as_str)?;
            if skip(translated) || !is_incoherent(base_text, translated) {
                return None;
            }
            Some(Incoherence {
                key: key.clone(),
                base: base_text.to_string(),
                translated: translated.to_string(),
            })
        })
        .collect()
}

/// Keys of `base` that `target` lacks, sorted.
pub fn missing_keys(base: &FlatMap, target: &FlatMap) -> Vec<FlatKey> {
    base.keys()
        .filter(|key| !target.contains_key(*key))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Keys of `target` that `base` lacks, sorted.
pub fn extra_keys(base: &FlatMap, target: &FlatMap) -> Vec<FlatKey> {
    missing_keys(target, base)
}

/// Keys whose text value satisfies `is_pending`, in document order.
pub fn pending_keys<F>(target: &FlatMap, is_pending: F) -> Vec<FlatKey>
where
    F: Fn(&str) -> bool,
{
    target
        .iter()
        .filter(|(_, value)| value.as_str().is_some_and(&is_pending))
        .map(|(key, _)| key.clone())
        .collect()
}

/// Share of `total` keys that are present, as a percentage.
///
/// An empty key universe counts as fully complete.
pub fn completion_percent(present: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        (present as f64) * 100.0 / (total as f64)
    }
}
