//! Path and name resolution for watch roots.
//!
//! Resource names are dotted identifiers derived from a file's position
//! under its watch root: `orders/item.http.json` becomes `orders.item`.

use std::path::{Component, Path, PathBuf};

const FS_SCHEME: &str = "fs://";

/// Check that `path` exists and is a directory.
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Resolve a root to an absolute path.
///
/// Existing paths are canonicalized so they compare equal to the paths the
/// OS watcher reports (symlinked temp dirs on macOS, for example).
pub fn resolve_absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Derive the resource name of `file` relative to `root`.
///
/// Directory components are joined with `.` and everything after the first
/// `.` of the file name is dropped. Paths outside `root` are named from
/// their full component list.
pub fn derive_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);

    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = parts.last_mut() {
        if let Some((stem, _)) = last.split_once('.') {
            *last = stem.to_string();
        }
    }

    parts.join(".")
}

/// Read a file's bytes.
pub async fn read_content(path: &Path) -> std::io::Result<Vec<u8>> {
    tokio::fs::read(path).await
}

/// Local directory behind an engine root string, if it is watchable.
///
/// Plain paths and `fs://` URIs are local. Any other scheme is remote and
/// yields `None`.
pub fn local_engine_root(root: &str) -> Option<PathBuf> {
    if let Some(local) = root.strip_prefix(FS_SCHEME) {
        return Some(PathBuf::from(local));
    }
    if root.contains("://") {
        return None;
    }
    Some(PathBuf::from(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derive_name_nested() {
        let root = Path::new("/app/apis");
        assert_eq!(
            derive_name(root, Path::new("/app/apis/orders/item.http.json")),
            "orders.item"
        );
        assert_eq!(derive_name(root, Path::new("/app/apis/user.json")), "user");
    }

    #[test]
    fn test_derive_name_no_collision_across_dirs() {
        let root = Path::new("/app/models");
        let a = derive_name(root, Path::new("/app/models/crm/user.json"));
        let b = derive_name(root, Path::new("/app/models/hr/user.json"));
        assert_ne!(a, b);
        assert_eq!(a, "crm.user");
        assert_eq!(b, "hr.user");
    }

    #[test]
    fn test_derive_name_script_and_spec_agree() {
        let root = Path::new("/app/flows");
        assert_eq!(
            derive_name(root, Path::new("/app/flows/calc.js")),
            derive_name(root, Path::new("/app/flows/calc.flow.json"))
        );
    }

    #[test]
    fn test_local_engine_root() {
        assert_eq!(
            local_engine_root("fs:///opt/engine"),
            Some(PathBuf::from("/opt/engine"))
        );
        assert_eq!(local_engine_root("./engine"), Some(PathBuf::from("./engine")));
        assert_eq!(local_engine_root("s3://bucket/engine"), None);
        assert_eq!(local_engine_root("https://example.com/engine"), None);
    }

    #[test]
    fn test_dir_exists_and_resolve() {
        let temp_dir = TempDir::new().unwrap();
        assert!(dir_exists(temp_dir.path()));
        assert!(!dir_exists(&temp_dir.path().join("missing")));

        let resolved = resolve_absolute(temp_dir.path());
        assert!(resolved.is_absolute());
    }

    #[tokio::test]
    async fn test_read_content_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_content(&temp_dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
