//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_GRAPH_CYCLES: &str = "graph.cycles";
pub const CHECK_GRAPH_UNDEFINED_DEPENDENCY: &str = "graph.undefined_dependency";
pub const CHECK_GRAPH_DEPTH: &str = "graph.depth";
pub const CHECK_RECORDS_VERSION_FORMAT: &str = "records.version_format";
pub const CHECK_RECORDS_DUPLICATE_CAPABILITY: &str = "records.duplicate_capability";
pub const CHECK_RECORDS_DUPLICATE_ID: &str = "records.duplicate_id";
pub const CHECK_RECORDS_ID_MISMATCH: &str = "records.id_mismatch";
pub const CHECK_RECORDS_DECLARATION_FIELDS: &str = "records.declaration_fields";
pub const CHECK_SCAN_DECLARATIONS: &str = "scan.declarations";
pub const CHECK_ENDPOINTS_RECONCILE: &str = "endpoints.reconcile";

// Codes: graph.*
pub const CODE_DEPENDENCY_CYCLE: &str = "dependency_cycle";
pub const CODE_UNDEFINED_DEPENDENCY: &str = "undefined_dependency";
pub const CODE_EXCESSIVE_DEPTH: &str = "excessive_depth";

// Codes: records.*
pub const CODE_INVALID_VERSION: &str = "invalid_version";
pub const CODE_DUPLICATE_CAPABILITY: &str = "duplicate_capability";
pub const CODE_DUPLICATE_ID: &str = "duplicate_id";
pub const CODE_ID_FILENAME_MISMATCH: &str = "id_filename_mismatch";
pub const CODE_INCOMPLETE_DECLARATION: &str = "incomplete_declaration";

// Codes: scan.declarations
pub const CODE_MISSING_DECLARATION: &str = "missing_declaration";
pub const CODE_UNPARSEABLE_DECLARATION: &str = "unparseable_declaration";
pub const CODE_UNREADABLE_FILE: &str = "unreadable_file";

// Codes: endpoints.reconcile
pub const CODE_MISSING_IN_BACKEND: &str = "missing_in_backend";
pub const CODE_MISSING_IN_FRONTEND: &str = "missing_in_frontend";
pub const CODE_METHOD_MISMATCH: &str = "method_mismatch";
