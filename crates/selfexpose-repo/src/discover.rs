use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use selfexpose_domain::policy::ScanFilter;
use selfexpose_types::RepoPath;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Discover candidate files under `root`.
///
/// Behavior:
/// - directories whose name is in `skip_dirs` are not descended into (the root itself is always walked)
/// - files whose name starts with any of `skip_name_prefixes` are dropped
/// - only files whose extension is listed in `extensions` are kept; an empty list keeps everything
///
/// The result is sorted, so discovery order never depends on the filesystem.
pub fn discover_files(root: &Utf8Path, filter: &ScanFilter) -> anyhow::Result<Vec<RepoPath>> {
    if !root.is_dir() {
        anyhow::bail!("root directory does not exist: {root}");
    }
    std::fs::read_dir(root).with_context(|| format!("read {root}"))?;

    let extensions = build_extension_set(&filter.extensions).context("compile extension globset")?;

    let mut out: Vec<RepoPath> = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !e.file_name().to_str().is_some_and(|n| filter.skips_dir(n))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(abs) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            tracing::warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
            continue;
        };
        let Some(name) = abs.file_name() else {
            continue;
        };
        if filter.skips_file_name(name) {
            continue;
        }
        if let Some(set) = &extensions
            && !set.is_match(name)
        {
            continue;
        }
        out.push(RepoPath::relative_to(root, &abs));
    }

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

/// `None` accepts every file name.
fn build_extension_set(extensions: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if extensions.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for ext in extensions {
        let glob = GlobBuilder::new(&format!("*.{ext}"))
            .case_insensitive(true)
            .literal_separator(true)
            .build()?;
        b.add(glob);
    }
    Ok(Some(b.build()?))
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
