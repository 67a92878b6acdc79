#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub severity: RenderableSeverity,
    pub check_id: String,
    pub code: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
    pub help: Option<String>,
}

/// Summary numbers of a compatibility report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderableData {
    pub files_considered: u32,
    pub files_with_declarations: u32,
    pub files_missing_declaration: u32,
    pub files_failed: u32,
    pub findings_total: u32,
    pub components: u32,
    /// `(kind, count)`, sorted by kind.
    pub kinds: Vec<(String, u32)>,
    /// `(version, count)`, sorted by version.
    pub versions: Vec<(String, u32)>,
    pub total_dependencies: u32,
    pub avg_dependencies: f64,
    pub total_capabilities: u32,
    pub avg_capabilities: f64,
    pub distinct_capabilities: u32,
    pub max_depth: u32,
    pub has_cycle: bool,
    pub cycles: u32,
    pub undefined_dependencies: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub findings: Vec<RenderableFinding>,
    pub data: RenderableData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableEndpoint {
    pub path: String,
    pub methods: Vec<String>,
    pub sources: Vec<String>,
    pub prefix: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableMismatch {
    pub path: String,
    pub frontend_methods: Vec<String>,
    pub backend_methods: Vec<String>,
    pub missing_methods: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableEndpointData {
    pub frontend_files: u32,
    pub backend_files: u32,
    pub frontend_endpoints: u32,
    pub backend_endpoints: u32,
    pub missing_in_backend: Vec<RenderableEndpoint>,
    pub missing_in_frontend: Vec<RenderableEndpoint>,
    pub method_mismatches: Vec<RenderableMismatch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableEndpointReport {
    pub verdict: RenderableVerdictStatus,
    pub data: RenderableEndpointData,
}
