use crate::graph::DependencyGraph;
use selfexpose_types::{ExposureRecord, ReportStats};
use std::collections::BTreeSet;

/// Aggregate counts over all records. Duplicated ids are counted once per record.
pub fn compute_stats(records: &[ExposureRecord], graph: &DependencyGraph) -> ReportStats {
    let mut stats = ReportStats {
        components: records.len() as u32,
        ..ReportStats::default()
    };

    let mut distinct_capabilities: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        *stats
            .kinds
            .entry(record.kind.as_str().to_string())
            .or_default() += 1;
        *stats.versions.entry(record.version.clone()).or_default() += 1;
        stats.total_dependencies += record.dependencies().len() as u32;
        stats.total_capabilities += record.capabilities().len() as u32;
        distinct_capabilities.extend(record.capabilities().iter().map(String::as_str));
    }
    stats.distinct_capabilities = distinct_capabilities.len() as u32;

    if !records.is_empty() {
        let n = records.len() as f64;
        stats.avg_dependencies = round2(stats.total_dependencies as f64 / n);
        stats.avg_capabilities = round2(stats.total_capabilities as f64 / n);
    }

    let cycles = graph.cycles();
    stats.has_cycle = !cycles.is_empty();
    stats.cycles = cycles.len() as u32;
    stats.max_depth = graph.max_depth();
    stats.undefined_dependencies = graph.undefined_dependencies().len() as u32;

    stats
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
