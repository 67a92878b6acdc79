//! Fuzz target for endpoint path normalization.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_endpoint_path
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use selfexpose_domain::endpoints::normalize_path;
use selfexpose_domain::policy::EndpointRules;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let rules = EndpointRules {
        api_prefix: Some("/api".to_string()),
        template_vars: [("base".to_string(), "/v1".to_string())].into(),
        ..EndpointRules::default()
    };

    if let Some(path) = normalize_path(raw, &rules) {
        assert!(path.starts_with("/api"));
    }
    let _ = normalize_path(raw, &EndpointRules::default());
});
