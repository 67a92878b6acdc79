//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - cycle detection on chains and closed chains
//! - findings ordering determinism
//! - endpoint normalization idempotence

use crate::endpoints::normalize_path;
use crate::engine::evaluate;
use crate::graph::DependencyGraph;
use crate::policy::EndpointRules;
use crate::test_support::{all_checks_config, record_with_deps, scan_model};
use proptest::prelude::*;
use selfexpose_types::ExposureRecord;

/// Chain `n0 -> n1 -> ... -> n{len-1}`.
fn chain(len: usize) -> Vec<ExposureRecord> {
    (0..len)
        .map(|i| {
            let id = format!("n{i}");
            if i + 1 < len {
                record_with_deps(&id, &[&format!("n{}", i + 1)])
            } else {
                record_with_deps(&id, &[])
            }
        })
        .collect()
}

fn arb_id() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

proptest! {
    #[test]
    fn chains_are_acyclic(len in 1usize..40) {
        let graph = DependencyGraph::from_records(&chain(len));
        prop_assert!(!graph.has_cycle());
        prop_assert_eq!(graph.max_depth() as usize, len - 1);
    }

    #[test]
    fn closing_a_chain_makes_one_cycle(len in 1usize..40) {
        let mut records = chain(len);
        if let Some(last) = records.last_mut() {
            last.needs.dependencies.insert("n0".to_string());
        }
        let graph = DependencyGraph::from_records(&records);
        prop_assert!(graph.has_cycle());
        let cycles = graph.cycles();
        prop_assert_eq!(cycles.len(), 1);
        prop_assert_eq!(cycles[0].len(), len);
    }

    #[test]
    fn has_cycle_agrees_with_cycles(
        edges in prop::collection::vec((arb_id(), prop::collection::vec(arb_id(), 0..3)), 0..8)
    ) {
        let records: Vec<_> = edges
            .iter()
            .map(|(id, deps)| {
                let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                record_with_deps(id, &deps)
            })
            .collect();
        let graph = DependencyGraph::from_records(&records);
        prop_assert_eq!(graph.has_cycle(), !graph.cycles().is_empty());
        // Terminates and covers every node.
        prop_assert_eq!(graph.depths().len(), graph.node_count());
    }

    #[test]
    fn evaluation_is_deterministic(
        edges in prop::collection::vec((arb_id(), prop::collection::vec(arb_id(), 0..3)), 0..8)
    ) {
        let records: Vec<_> = edges
            .iter()
            .map(|(id, deps)| {
                let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
                record_with_deps(id, &deps)
            })
            .collect();
        let model = scan_model(records);
        let cfg = all_checks_config();
        let a = evaluate(&model, &cfg);
        let b = evaluate(&model, &cfg);
        prop_assert_eq!(a.findings, b.findings);
        prop_assert_eq!(a.verdict, b.verdict);
    }

    #[test]
    fn normalization_is_idempotent(raw in "[a-z/:.?#${}_ -]{0,40}") {
        let rules = EndpointRules::default();
        if let Some(once) = normalize_path(&raw, &rules) {
            prop_assert_eq!(normalize_path(&once, &rules), Some(once.clone()));
            prop_assert!(once.starts_with('/'));
        }
    }
}
