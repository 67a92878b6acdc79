use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields are `check_id`, `code` and the subject parts that make the finding unique
/// (record id, missing dependency, capability, file path, endpoint path...), joined with `|`.
pub fn fingerprint(check_id: &str, code: &str, subject: &[&str]) -> String {
    let mut parts = vec![check_id, code];
    parts.extend_from_slice(subject);
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_hex() {
        let a = fingerprint("graph.cycles", "dependency_cycle", &["a", "b"]);
        let b = fingerprint("graph.cycles", "dependency_cycle", &["a", "b"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn subject_changes_fingerprint() {
        let a = fingerprint("graph.cycles", "dependency_cycle", &["a", "b"]);
        let b = fingerprint("graph.cycles", "dependency_cycle", &["a", "c"]);
        assert_ne!(a, b);
    }
}
