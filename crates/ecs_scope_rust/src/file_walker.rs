//! Filesystem traversal for Rust source files.
//!
//! Produces the corpus a scan runs over. Only an unusable root is fatal;
//! anything unreadable below it is recorded and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::ScanError;
use crate::model::SkippedFile;
use crate::syntax::LineIndex;

/// A Rust source file with content and content-addressable hash.
#[derive(Debug, Clone)]
pub struct RustSourceFile {
    /// Absolute path, forward-slash normalized.
    pub path: String,
    /// Path relative to the scan root, forward-slash normalized.
    pub rel_path: String,
    /// File content as UTF-8 text.
    pub content: String,
    /// SHA-256 hex digest of the raw file bytes.
    pub sha256: String,
    /// Set when the file was found but could not be read.
    pub load_error: Option<String>,
    pub(crate) line_index: LineIndex,
}

impl RustSourceFile {
    /// An in-memory file, e.g. an unsaved editor buffer.
    pub fn from_text(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        Self {
            rel_path: path.clone(),
            path,
            sha256: sha256_hex(content.as_bytes()),
            line_index: LineIndex::new(&content),
            content,
            load_error: None,
        }
    }

    fn unreadable(path: String, rel_path: String, reason: String) -> Self {
        Self {
            path,
            rel_path,
            content: String::new(),
            sha256: String::new(),
            load_error: Some(reason),
            line_index: LineIndex::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Directory names skipped in addition to the built-in list.
    pub exclude_dirs: Vec<String>,
}

/// The result of walking a root.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    /// Canonical root the files were loaded from.
    pub root: PathBuf,
    /// Sorted by relative path. Unreadable files are included with
    /// `load_error` set so the scan can account for them.
    pub files: Vec<RustSourceFile>,
    /// Directories below the root that could not be listed.
    pub skipped_dirs: Vec<SkippedFile>,
}

impl SourceSet {
    /// SHA-256 over every file's relative path and content hash.
    pub fn corpus_sha256(&self) -> String {
        let mut hasher = Sha256::new();
        for file in &self.files {
            hasher.update(file.rel_path.as_bytes());
            hasher.update([0u8]);
            hasher.update(file.sha256.as_bytes());
            hasher.update([b'\n']);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Load all Rust source files under `root`, sorted by relative path.
pub fn load_rust_sources(root: &Path) -> Result<SourceSet, ScanError> {
    load_rust_sources_with(root, &WalkOptions::default())
}

pub fn load_rust_sources_with(root: &Path, options: &WalkOptions) -> Result<SourceSet, ScanError> {
    let root_canon = root.canonicalize().map_err(|e| ScanError::RootUnavailable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !root_canon.is_dir() {
        return Err(ScanError::RootUnavailable {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    // The root itself must be listable; failures further down are not fatal.
    fs::read_dir(&root_canon).map_err(|e| ScanError::RootUnavailable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut paths = Vec::new();
    let mut skipped_dirs = Vec::new();
    collect_rs_paths(&root_canon, options, &mut paths, &mut skipped_dirs);
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let abs = normalize_path(&path);
        let rel = path
            .strip_prefix(&root_canon)
            .ok()
            .map(normalize_path)
            .unwrap_or_else(|| abs.clone());
        match fs::read(&path) {
            Ok(bytes) => {
                let content = String::from_utf8_lossy(&bytes).into_owned();
                files.push(RustSourceFile {
                    path: abs,
                    rel_path: rel,
                    sha256: sha256_hex(&bytes),
                    line_index: LineIndex::new(&content),
                    content,
                    load_error: None,
                });
            }
            Err(e) => {
                log::warn!("skipping unreadable file {}: {}", abs, e);
                files.push(RustSourceFile::unreadable(abs, rel, e.to_string()));
            }
        }
    }
    log::debug!(
        "loaded {} rust file(s) under {}",
        files.len(),
        root_canon.display()
    );
    Ok(SourceSet {
        root: root_canon,
        files,
        skipped_dirs,
    })
}

/// Recursively collect `.rs` file paths, skipping common non-source directories
/// and symlinked directories.
fn collect_rs_paths(
    dir: &Path,
    options: &WalkOptions,
    out: &mut Vec<PathBuf>,
    skipped: &mut Vec<SkippedFile>,
) {
    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(e) => {
            log::warn!("skipping unreadable directory {}: {}", dir.display(), e);
            skipped.push(SkippedFile {
                path: normalize_path(dir),
                reason: e.to_string(),
            });
            return;
        }
    };

    let mut entries: Vec<(PathBuf, fs::FileType)> = listing
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_type().ok().map(|ty| (e.path(), ty)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (entry_path, file_type) in entries {
        // Symlinked directories are not followed; they can loop back up the tree.
        if file_type.is_symlink() && entry_path.is_dir() {
            log::debug!("not following symlinked directory {}", entry_path.display());
            continue;
        }
        if file_type.is_dir() {
            let skip = entry_path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| should_skip_dir(name, options));
            if skip {
                continue;
            }
            collect_rs_paths(&entry_path, options, out, skipped);
        } else if entry_path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(entry_path);
        }
    }
}

/// Directories to skip during traversal.
fn should_skip_dir(name: &str, options: &WalkOptions) -> bool {
    matches!(
        name,
        ".git" | "target" | "node_modules" | ".idea" | ".vscode" | "out"
    ) || options.exclude_dirs.iter().any(|d| d == name)
}

/// Normalize path separators to forward slashes.
pub fn normalize_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_only_rs_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("src/readme.md"), "# hello").unwrap();
        fs::write(dir.path().join("src/lib.txt"), "not rust").unwrap();

        let set = load_rust_sources(dir.path()).unwrap();
        assert_eq!(set.files.len(), 1);
        assert_eq!(set.files[0].rel_path, "src/main.rs");
        assert!(set.files[0].path.ends_with("/src/main.rs"));
        assert!(Path::new(&set.files[0].path).is_absolute());
    }

    #[test]
    fn skips_target_git_and_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::create_dir_all(root.join("benches")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn f() {}").unwrap();
        fs::write(root.join("target/debug/build.rs"), "fn build() {}").unwrap();
        fs::write(root.join(".git/objects/hook.rs"), "fn hook() {}").unwrap();
        fs::write(root.join("benches/bench.rs"), "fn bench() {}").unwrap();

        let set = load_rust_sources(root).unwrap();
        let rels: Vec<&str> = set.files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["benches/bench.rs", "src/lib.rs"]);

        let options = WalkOptions {
            exclude_dirs: vec!["benches".to_string()],
        };
        let set = load_rust_sources_with(root, &options).unwrap();
        assert_eq!(set.files.len(), 1);
        assert_eq!(set.files[0].rel_path, "src/lib.rs");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/net")).unwrap();
        fs::write(root.join("src/net/a.rs"), "#[derive(Component)] struct Pos;").unwrap();
        std::os::unix::fs::symlink(root.join("src"), root.join("src/net/back")).unwrap();
        fs::write(root.join("shared.rs"), "fn shared() {}").unwrap();
        std::os::unix::fs::symlink(root.join("shared.rs"), root.join("src/linked.rs")).unwrap();

        let set = load_rust_sources(root).unwrap();
        let rels: Vec<&str> = set.files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["shared.rs", "src/linked.rs", "src/net/a.rs"]);
        assert!(set.skipped_dirs.is_empty());
    }

    #[test]
    fn files_are_sorted_by_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/b")).unwrap();
        fs::write(root.join("src/z.rs"), "").unwrap();
        fs::write(root.join("src/b/a.rs"), "").unwrap();
        fs::write(root.join("src/a.rs"), "").unwrap();

        let set = load_rust_sources(root).unwrap();
        let rels: Vec<&str> = set.files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rels, vec!["src/a.rs", "src/b/a.rs", "src/z.rs"]);
    }

    #[test]
    fn missing_root_cannot_start() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rust_sources(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScanError::RootUnavailable { .. }));
    }

    #[test]
    fn file_root_cannot_start() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lib.rs");
        fs::write(&file, "fn f() {}").unwrap();
        let err = load_rust_sources(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn corpus_hash_tracks_content() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.rs"), "fn a() {}").unwrap();
        let first = load_rust_sources(root).unwrap().corpus_sha256();
        let again = load_rust_sources(root).unwrap().corpus_sha256();
        assert_eq!(first, again);
        assert_eq!(first.len(), 64);

        fs::write(root.join("a.rs"), "fn b() {}").unwrap();
        let changed = load_rust_sources(root).unwrap().corpus_sha256();
        assert_ne!(first, changed);
    }

    #[test]
    fn normalizes_paths_to_forward_slashes() {
        let p = Path::new("foo\\bar\\baz.rs");
        assert_eq!(normalize_path(p), "foo/bar/baz.rs");
    }

    #[test]
    fn from_text_hashes_content() {
        let file = RustSourceFile::from_text("/p/src/a.rs", "fn a() {}");
        assert_eq!(file.sha256, sha256_hex(b"fn a() {}"));
        assert_eq!(file.rel_path, "/p/src/a.rs");
        assert!(file.load_error.is_none());
    }
}
