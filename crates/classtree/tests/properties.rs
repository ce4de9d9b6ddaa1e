//! Property tests over randomly generated class hierarchies
//!
//! Hierarchies are generated as parent-index vectors, so every generated
//! record set is a valid single-rooted tree. Labels come from a tiny
//! alphabet to force ordering ties.

use std::collections::HashSet;

use classtree::prelude::*;
use classtree::truncate_snippet;
use proptest::prelude::*;

fn class_id(idx: usize) -> String {
    format!("c{}", idx)
}

fn arb_records() -> impl Strategy<Value = Vec<ClassDefinition>> {
    (1usize..48)
        .prop_flat_map(|n| {
            let parents: Vec<_> = (1..n).map(|i| 0..i).collect();
            let labels = prop::collection::vec("[a-cA-C]{1,3}", n);
            let mixins = prop::collection::vec(prop::option::of(0..n), n);
            (parents, labels, mixins)
        })
        .prop_map(|(parents, labels, mixins)| {
            labels
                .into_iter()
                .zip(mixins)
                .enumerate()
                .map(|(idx, (label, mixin))| {
                    let class = if idx == 0 {
                        ClassDefinition::root(class_id(0))
                    } else {
                        ClassDefinition::child(class_id(idx), class_id(parents[idx - 1]))
                    };
                    let class = class.with_label(label);
                    match mixin {
                        Some(m) => class.with_mixin(class_id(m)),
                        None => class,
                    }
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn prop_materialized_ids_match_registry(records in arb_records()) {
        let prepared = classtree::build(records.clone()).unwrap();
        let mut expected: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let mut actual: Vec<&str> = prepared.tree.nodes().iter().map(|n| n.id.as_str()).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_depth_is_parent_depth_plus_one(records in arb_records()) {
        let prepared = classtree::build(records).unwrap();
        let tree = &prepared.tree;
        prop_assert_eq!(tree.root().depth, 0);
        for idx in 0..tree.len() {
            if let Some(parent) = tree.parent_index(idx) {
                prop_assert_eq!(tree.node(idx).depth, tree.node(parent).depth + 1);
            }
        }
    }

    #[test]
    fn prop_children_have_parent_as_predecessor(records in arb_records()) {
        let prepared = classtree::build(records).unwrap();
        let view = prepared.view();
        for node in prepared.tree.nodes() {
            let children = view.children_of(&node.id).unwrap();
            prop_assert_eq!(children.len(), node.child_count);
            for child in children {
                let path = view.path_to_root(&child.id).unwrap();
                prop_assert!(path.len() >= 2);
                prop_assert_eq!(&path[path.len() - 2].id, &node.id);
                prop_assert_eq!(&path[0].id, &prepared.tree.root().id);
            }
        }
    }

    #[test]
    fn prop_children_sorted_case_insensitive(records in arb_records()) {
        let prepared = classtree::build(records).unwrap();
        let view = prepared.view();
        for node in prepared.tree.nodes() {
            let labels: Vec<String> = view
                .children_of(&node.id)
                .unwrap()
                .iter()
                .map(|c| c.label.to_lowercase())
                .collect();
            let mut sorted = labels.clone();
            sorted.sort();
            prop_assert_eq!(labels, sorted);
        }
    }

    #[test]
    fn prop_build_is_idempotent(records in arb_records()) {
        let first = classtree::build(records.clone()).unwrap();
        let second = classtree::build(records).unwrap();
        prop_assert_eq!(first.tree, second.tree);
        prop_assert_eq!(first.hierarchy, second.hierarchy);
    }

    #[test]
    fn prop_mixins_never_duplicate_nodes(records in arb_records()) {
        let prepared = classtree::build(records.clone()).unwrap();
        let mut seen = HashSet::new();
        for node in prepared.tree.nodes() {
            prop_assert!(seen.insert(node.id.clone()));
        }
        for record in &records {
            for mixin in &record.mixins {
                if Some(mixin) == record.primary_parent.as_ref() || *mixin == record.id {
                    continue;
                }
                let target = prepared.view().get_node(mixin).unwrap();
                prop_assert!(target.mixin_users.contains(&record.id));
            }
        }
    }

    #[test]
    fn prop_exact_label_ranks_first(records in arb_records(), pick in any::<prop::sample::Index>()) {
        let prepared = classtree::build(records.clone()).unwrap();
        let target = &records[pick.index(records.len())];
        let label = target.display_label().to_string();
        let results = prepared.view().search(&label);
        prop_assert!(!results.is_empty());
        prop_assert_eq!(&results[0].label, &label);
        prop_assert!(results.iter().any(|n| n.id == target.id));
    }

    #[test]
    fn prop_blank_search_is_empty(records in arb_records(), blank in "[ \t\n]{0,4}") {
        let prepared = classtree::build(records).unwrap();
        prop_assert!(prepared.view().search(&blank).is_empty());
    }

    #[test]
    fn prop_snippet_respects_budget(text in "\\PC{0,80}", budget in 0usize..40) {
        if let Some(snippet) = truncate_snippet(&text, budget) {
            prop_assert!(snippet.chars().count() <= budget);
            prop_assert!(!snippet.is_empty());
        }
    }
}
