//! Reserved file names and path helpers for a knowledge base

use std::path::{Component, Path, PathBuf};

/// Default knowledge directory name
pub const DEFAULT_KNOWLEDGE_DIR: &str = "docs";

/// Reserved configuration directory under the knowledge base root
pub const DEWEY_DIR: &str = ".dewey";

/// Configuration filename inside [`DEWEY_DIR`]
pub const CONFIG_FILE: &str = "config.json";

/// Health snapshot log, relative to [`DEWEY_DIR`]
pub const HISTORY_DIR: &str = "history";
pub const HISTORY_FILE: &str = "health-log.jsonl";

/// Read-event log, relative to [`DEWEY_DIR`]
pub const UTILIZATION_DIR: &str = "utilization";
pub const UTILIZATION_FILE: &str = "log.jsonl";

/// Curation plan filename inside [`DEWEY_DIR`]
pub const CURATION_PLAN_FILE: &str = "curation-plan.md";

/// Structural index document at the top of the knowledge directory
pub const INDEX_FILE: &str = "index.md";

/// Entry-point document of every area
pub const OVERVIEW_FILE: &str = "overview.md";

/// Suffix of terse reference companions
pub const REF_SUFFIX: &str = ".ref.md";

/// Private area holding proposed topics
pub const PROPOSALS_DIR: &str = "_proposals";

/// Role/topic manifest at the knowledge base root
pub const AGENTS_MANIFEST: &str = "AGENTS.md";

/// Project discovery manifest at the knowledge base root
pub const CLAUDE_MANIFEST: &str = "CLAUDE.md";

/// Sentinels bounding machine-owned regions of the manifests
pub const MARKER_BEGIN: &str = "<!-- dewey:kb:begin -->";
pub const MARKER_END: &str = "<!-- dewey:kb:end -->";

/// True for names of private (`_`-prefixed) or hidden directories
pub fn is_private_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// File name of a path as a string slice, or empty
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// True for `<stem>.ref.md` documents
pub fn is_reference(path: &Path) -> bool {
    file_name(path).ends_with(REF_SUFFIX)
}

/// Stem of a document with `.ref.md` or `.md` removed
pub fn doc_stem(path: &Path) -> &str {
    let name = file_name(path);
    name.strip_suffix(REF_SUFFIX)
        .or_else(|| name.strip_suffix(".md"))
        .unwrap_or(name)
}

/// Reference companion (`<stem>.ref.md`) of a working document
pub fn ref_companion(path: &Path) -> PathBuf {
    path.with_file_name(format!("{}{}", doc_stem(path), REF_SUFFIX))
}

/// Working companion (`<stem>.md`) of a reference document
pub fn working_companion(path: &Path) -> PathBuf {
    path.with_file_name(format!("{}.md", doc_stem(path)))
}

/// True when the two paths are a working document and its same-stem
/// reference in the same directory
pub fn is_companion_pair(a: &Path, b: &Path) -> bool {
    if a.parent() != b.parent() {
        return false;
    }
    match (is_reference(a), is_reference(b)) {
        (true, false) => working_companion(a) == b,
        (false, true) => working_companion(b) == a,
        _ => false,
    }
}

/// Lexically normalize a relative path string for comparison.
///
/// Backslashes become forward slashes, `.` segments and empty segments are
/// dropped, and `..` pops the previous segment. A trailing slash is removed.
pub fn normalize_rel(raw: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let unified = raw.trim().replace('\\', "/");
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// True when two relative path strings refer to the same location
pub fn same_rel_path(a: &str, b: &str) -> bool {
    normalize_rel(a) == normalize_rel(b)
}

/// Lexically resolve `target` against `base_dir` without touching the
/// filesystem, folding `.` and `..` components.
pub fn resolve_lexical(base_dir: &Path, target: &str) -> PathBuf {
    lexical_clean(&base_dir.join(target))
}

/// Fold `.` and `..` components of a path without touching the filesystem
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path relative to `base` with forward slashes
pub fn rel_string(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
