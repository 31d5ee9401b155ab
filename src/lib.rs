#![forbid(unsafe_code)]
//! Keep nested JSON localization dictionaries in sync with a base language.
//!
//! Every language lives in one `<language>.json` file holding a nested
//! dictionary of strings. The base language is authoritative: reconciling a
//! target adds the keys it lacks (tagged so translators can find them) and
//! drops the keys the base no longer has.
//!
//! # Quick Start
//!
//! ```rust
//! use locsync::{Tree, reconcile, traits::Parser};
//!
//! let base = Tree::from_str(r#"{"a": "Hello", "b": {"c": "World"}}"#)?;
//! let mut target = Tree::from_str(r#"{"a": "Ciao", "b": {}, "d": "Extra"}"#)?;
//!
//! let report = reconcile(&mut target, &base)?;
//! assert_eq!(report.added, vec!["b.c"]);
//! assert_eq!(report.removed, vec!["d"]);
//! assert_eq!(target.flatten()["b.c"], "[NEEDS TRANSLATION] World");
//! # Ok::<(), locsync::Error>(())
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod operations;
pub mod reconcile;
pub mod store;
pub mod traits;
pub mod tree;

// Re-export most used types for easy consumption
pub use crate::{
    compare::{Incoherence, find_incoherences, is_incoherent},
    config::Config,
    error::Error,
    operations::{
        CheckOptions, CheckReport, LanguageCheck, LanguageSync, SyncOptions, SyncReport,
        Synchronizer, check_languages, check_languages_with, sync_languages, sync_languages_with,
    },
    reconcile::{
        PLACEHOLDER_MARKER, ReconcileOptions, ReconcileReport, StructuralConflict, reconcile,
        reconcile_with, reconciled, structural_conflicts,
    },
    store::{LanguageFile, LocaleStore},
    tree::{FlatKey, FlatMap, Node, NodeKind, Tree, flatten},
};
