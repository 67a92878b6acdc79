use crate::graph::DependencyGraph;
use crate::model::ScanModel;
use crate::policy::EffectiveConfig;
use selfexpose_types::{EndpointDiff, Finding, Location};

mod cycles;
mod declaration_fields;
mod declarations;
mod depth;
mod duplicate_capability;
mod duplicate_id;
mod endpoint_reconcile;
mod id_mismatch;
mod undefined_dependency;
mod version_format;


/// Read-only inputs shared by the record and graph checks.
pub struct CheckInput<'a> {
    pub model: &'a ScanModel,
    pub graph: &'a DependencyGraph,
}

impl CheckInput<'_> {
    /// Location of the first record declaring `id`.
    fn location_of(&self, id: &str) -> Option<Location> {
        self.model
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| Location {
                path: r.source_path.clone(),
                line: None,
                col: None,
            })
    }
}

pub fn run_all(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    duplicate_id::run(input, cfg, out);
    cycles::run(input, cfg, out);
    undefined_dependency::run(input, cfg, out);
    version_format::run(input, cfg, out);
    declarations::run(input, cfg, out);
    depth::run(input, cfg, out);
    duplicate_capability::run(input, cfg, out);
    id_mismatch::run(input, cfg, out);
    declaration_fields::run(input, cfg, out);
}

pub fn run_endpoints(diff: &EndpointDiff, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    endpoint_reconcile::run(diff, cfg, out);
}
