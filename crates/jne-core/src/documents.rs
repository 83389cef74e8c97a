use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub fn is_json_document(p: &Path) -> bool {
    p.is_file()
        && p.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// All `.json` files below `root`, sorted. Unreadable entries are skipped.
pub fn list_documents(root: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .flatten()
        .map(|e| e.into_path())
        .filter(|p| is_json_document(p))
        .collect();
    out.sort();
    out
}
