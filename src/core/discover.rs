//! Recursive source discovery.
//!
//! Walks a directory tree collecting files whose path ends with a given
//! suffix. Every path is identified by its canonical form, so symlink
//! cycles terminate and a location reachable through several aliases is
//! only reported once. Children that no longer exist (vanished entries,
//! dangling links) are reported as warnings and skipped.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::util::diagnostic::Diagnostic;
use crate::util::fs::{normalize_path, relative_path};

/// Result of one discovery run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredSources {
    /// Matching files, relative to the base directory, in walk order.
    pub files: Vec<PathBuf>,
    /// Anomalies encountered along the way.
    pub warnings: Vec<Diagnostic>,
}

impl DiscoveredSources {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }
}

/// Discover files under `root` whose full path ends with `extension`.
///
/// Results are reported relative to `base`. `root` may be a single file.
/// A `root` that does not exist yields an empty result.
pub fn discover(root: &Path, extension: &str, base: &Path) -> DiscoveredSources {
    let mut discovery = Discovery::new(base, extension);
    discovery.visit(root);

    tracing::debug!(
        "discovered {} `{}` files under {}",
        discovery.sources.files.len(),
        extension,
        root.display()
    );
    discovery.sources
}

/// State for a single discovery run.
struct Discovery<'a> {
    base: &'a Path,
    extension: &'a str,
    visited: HashSet<PathBuf>,
    sources: DiscoveredSources,
}

impl<'a> Discovery<'a> {
    fn new(base: &'a Path, extension: &'a str) -> Self {
        Discovery {
            base,
            extension,
            visited: HashSet::new(),
            sources: DiscoveredSources::default(),
        }
    }

    fn visit(&mut self, path: &Path) {
        if !self.visited.insert(normalize_path(path)) {
            tracing::trace!("already visited {}", path.display());
            return;
        }

        if path.is_file() {
            if self.matches(path) {
                self.sources.files.push(relative_path(self.base, path));
            }
            return;
        }

        if path.is_dir() {
            for child in self.children(path) {
                if child.exists() {
                    self.visit(&child);
                } else {
                    self.warn(
                        Diagnostic::warning(format!(
                            "path {} does not exist or is a broken symbolic link",
                            child.display()
                        ))
                        .with_location(&child),
                    );
                }
            }
        }
    }

    /// Immediate children of `dir`, sorted by name.
    fn children(&mut self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.warn(
                    Diagnostic::warning(format!(
                        "cannot read directory {}: {}",
                        dir.display(),
                        e
                    ))
                    .with_location(dir),
                );
                return Vec::new();
            }
        };

        let mut children: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        children.sort();
        children
    }

    fn matches(&self, path: &Path) -> bool {
        path.to_string_lossy().ends_with(self.extension)
    }

    fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic.message);
        self.sources.warnings.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// source").unwrap();
    }

    fn sorted(sources: &DiscoveredSources) -> Vec<PathBuf> {
        let mut files = sources.files.clone();
        files.sort();
        files
    }

    #[test]
    fn test_acyclic_tree() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(base, "src/trac_ik.cpp");
        write(base, "src/kdl_tl.cpp");
        write(base, "src/nlopt_ik.hpp");
        write(base, "src/bindings/pytracik.cpp");
        write(base, "src/bindings/README.md");

        let sources = discover(&base.join("src"), ".cpp", base);

        assert_eq!(
            sorted(&sources),
            vec![
                PathBuf::from("src/bindings/pytracik.cpp"),
                PathBuf::from("src/kdl_tl.cpp"),
                PathBuf::from("src/trac_ik.cpp"),
            ]
        );
        assert!(sources.warnings.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_suffix_matches_full_path() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(base, "src/kdl/chain.cpp");
        write(base, "src/other/chain.cpp");

        let sources = discover(&base.join("src"), "kdl/chain.cpp", base);
        assert_eq!(sources.files, vec![PathBuf::from("src/kdl/chain.cpp")]);
    }

    #[test]
    fn test_root_is_file() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(base, "src/main.cpp");

        let sources = discover(&base.join("src/main.cpp"), ".cpp", base);
        assert_eq!(sources.files, vec![PathBuf::from("src/main.cpp")]);

        let none = discover(&base.join("src/main.cpp"), ".c", base);
        assert!(none.is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let sources = discover(&tmp.path().join("nope"), ".cpp", tmp.path());
        assert!(sources.is_empty());
        assert!(sources.warnings.is_empty());
    }

    #[test]
    fn test_deterministic_order() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        for name in ["z.cpp", "a.cpp", "m/b.cpp", "c.cpp"] {
            write(base, &format!("src/{}", name));
        }

        let first = discover(&base.join("src"), ".cpp", base);
        let second = discover(&base.join("src"), ".cpp", base);
        assert_eq!(first.files, second.files);
        assert_eq!(first.files[0], PathBuf::from("src/a.cpp"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        use crate::util::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(base, "src/a/one.cpp");
        write(base, "src/two.cpp");
        symlink(&base.join("src"), &base.join("src/a/back")).unwrap();

        let sources = discover(&base.join("src"), ".cpp", base);

        assert_eq!(
            sorted(&sources),
            vec![PathBuf::from("src/a/one.cpp"), PathBuf::from("src/two.cpp")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_aliases_visited_once() {
        use crate::util::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(base, "src/real/solver.cpp");
        symlink(&base.join("src/real"), &base.join("src/alias1")).unwrap();
        symlink(&base.join("src/real"), &base.join("src/alias2")).unwrap();
        symlink(
            &base.join("src/real/solver.cpp"),
            &base.join("src/linked.cpp"),
        )
        .unwrap();

        let sources = discover(&base.join("src"), ".cpp", base);

        // alias1 sorts first, so the directory is reported through it
        assert_eq!(sources.files, vec![PathBuf::from("src/alias1/solver.cpp")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_link_warns_once() {
        use crate::util::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(base, "src/keep.cpp");
        write(base, "src/gone.cpp");
        symlink(&base.join("src/gone.cpp"), &base.join("src/dangling.cpp")).unwrap();
        fs::remove_file(base.join("src/gone.cpp")).unwrap();

        let sources = discover(&base.join("src"), ".cpp", base);

        assert_eq!(sources.files, vec![PathBuf::from("src/keep.cpp")]);
        assert_eq!(sources.warnings.len(), 1);
        let warning = &sources.warnings[0];
        assert!(warning.message.contains("dangling.cpp"));
        assert_eq!(
            warning.location.as_deref(),
            Some(base.join("src/dangling.cpp").as_path())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_warns() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let base = tmp.path();
        write(base, "src/keep.cpp");
        write(base, "src/locked/hidden.cpp");
        write(base, "src/zeta.cpp");
        let locked = base.join("src/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores the mode bits
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let sources = discover(&base.join("src"), ".cpp", base);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(
            sources.files,
            vec![PathBuf::from("src/keep.cpp"), PathBuf::from("src/zeta.cpp")]
        );
        assert_eq!(sources.warnings.len(), 1);
        let warning = &sources.warnings[0];
        assert!(warning.message.contains("cannot read directory"));
        assert!(warning.message.contains("locked"));
        assert_eq!(warning.location.as_deref(), Some(locked.as_path()));
    }
}
