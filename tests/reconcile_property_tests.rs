use locsync::{
    Node, ReconcileOptions, Tree, flatten, reconcile, reconcile_with, reconciled,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn key_strategy() -> impl Strategy<Value = String> {
    // Small alphabet so base and target trees share keys often.
    proptest::string::string_regex("[a-e][a-e0-9_]{0,2}").expect("valid key regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-zàèéìòù0-9 _\\-\\.,!\\?]{0,20}").expect("valid value regex")
}

fn tree_strategy() -> impl Strategy<Value = Tree> {
    let leaf = prop_oneof![
        4 => value_strategy().prop_map(Node::Leaf),
        1 => any::<i32>().prop_map(|n| Node::Value(n.into())),
        1 => any::<bool>().prop_map(|b| Node::Value(b.into())),
    ];
    let node = leaf.prop_recursive(3, 48, 5, |inner| {
        prop::collection::vec((key_strategy(), inner), 0..5)
            .prop_map(|pairs| Node::Tree(pairs.into_iter().collect()))
    });
    prop::collection::vec((key_strategy(), node), 0..6).prop_map(|pairs| pairs.into_iter().collect())
}

/// Trees whose leaves sit under keys prefixed by their kind, so two trees
/// drawn from it never disagree about a key holding a leaf or a subtree.
fn shaped_tree_strategy() -> impl Strategy<Value = Tree> {
    tree_strategy().prop_map(|tree| shape(&tree))
}

fn shape(tree: &Tree) -> Tree {
    tree.iter()
        .map(|(key, node)| match node {
            Node::Tree(child) => (format!("t{key}"), Node::Tree(shape(child))),
            leaf => (format!("l{key}"), leaf.clone()),
        })
        .collect()
}

fn flat_keys(tree: &Tree) -> BTreeSet<String> {
    flatten(tree).into_keys().collect()
}

proptest! {
    #[test]
    fn prop_flatten_round_trip(tree in shaped_tree_strategy()) {
        let flat = flatten(&tree);
        let rebuilt = Tree::from_flat(flat.clone()).expect("rebuild from flat keys");
        prop_assert_eq!(flatten(&rebuilt), flat);
    }

    #[test]
    fn prop_reconcile_matches_source_key_set(
        source in shaped_tree_strategy(),
        target in shaped_tree_strategy(),
    ) {
        let mut target = target;
        reconcile(&mut target, &source).expect("shapes agree");
        prop_assert_eq!(flat_keys(&target), flat_keys(&source));
    }

    #[test]
    fn prop_report_covers_exact_key_difference(
        source in shaped_tree_strategy(),
        target in shaped_tree_strategy(),
    ) {
        let before = flat_keys(&target);
        let expected_added: BTreeSet<_> = flat_keys(&source).difference(&before).cloned().collect();
        let expected_removed: BTreeSet<_> = before.difference(&flat_keys(&source)).cloned().collect();

        let mut target = target;
        let report = reconcile(&mut target, &source).expect("shapes agree");

        prop_assert_eq!(report.added.iter().cloned().collect::<BTreeSet<_>>(), expected_added);
        prop_assert_eq!(report.removed.iter().cloned().collect::<BTreeSet<_>>(), expected_removed);
        prop_assert_eq!(report.added.len() + report.removed.len(),
            report.added.iter().chain(&report.removed).collect::<BTreeSet<_>>().len());
    }

    #[test]
    fn prop_added_leaves_tagged_and_shared_leaves_untouched(
        source in shaped_tree_strategy(),
        target in shaped_tree_strategy(),
    ) {
        let original = flatten(&target);
        let source_flat = flatten(&source);
        let options = ReconcileOptions::default();

        let (updated, report) = reconciled(&target, &source, &options).expect("shapes agree");
        let updated_flat = flatten(&updated);

        for key in &report.added {
            match source_flat[key].as_str() {
                Some(text) => {
                    let expected = options.placeholder(text);
                    prop_assert_eq!(updated_flat[key].as_str(), Some(expected.as_str()));
                }
                None => {
                    prop_assert_eq!(&updated_flat[key], &source_flat[key]);
                }
            }
        }
        for (key, value) in &original {
            if source_flat.contains_key(key) {
                prop_assert_eq!(&updated_flat[key], value);
            }
        }
    }

    #[test]
    fn prop_reconcile_is_idempotent(
        source in shaped_tree_strategy(),
        target in shaped_tree_strategy(),
    ) {
        let options = ReconcileOptions::default();
        let mut target = target;
        reconcile_with(&mut target, &source, &options).expect("shapes agree");
        let once = target.clone();

        let second = reconcile_with(&mut target, &source, &options).expect("shapes agree");

        prop_assert!(second.is_empty());
        prop_assert!(!second.changed);
        prop_assert_eq!(target, once);
    }

    #[test]
    fn prop_reconcile_against_self_changes_nothing(tree in tree_strategy()) {
        let mut target = tree.clone();
        let report = reconcile(&mut target, &tree).expect("same shape");
        prop_assert!(report.is_empty());
        prop_assert_eq!(target, tree);
    }
}
