//! Dependency manifest (`requirements.txt`).
//!
//! The package manager owns the semantics of each line. Parsing here only
//! extracts the entries for reporting and for the install marker.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Ordered list of package requirements read from a fixed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyManifest {
    path: PathBuf,
    entries: Vec<String>,
}

impl DependencyManifest {
    /// Load the manifest at `path`; `Ok(None)` when the file is absent.
    pub fn load(path: &Path) -> io::Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(Self {
                path: path.to_path_buf(),
                entries: parse_entries(&content),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Requirement lines with comments and blank lines removed.
pub fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(strip_comment)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

// pip treats `#` as a comment at line start or after whitespace; a `#`
// inside a URL fragment (`pkg @ https://host/x#egg=pkg`) is kept.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    line.find(" #")
        .or_else(|| line.find("\t#"))
        .map_or(line, |idx| &line[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "# game deps\npygame==2.5.2\n\nnoise>=1.2  # perlin\n   \n";
        assert_eq!(parse_entries(content), vec!["pygame==2.5.2", "noise>=1.2"]);
    }

    #[test]
    fn test_url_fragment_is_not_a_comment() {
        let content = "pkg @ https://example.com/pkg.zip#egg=pkg\n";
        assert_eq!(
            parse_entries(content),
            vec!["pkg @ https://example.com/pkg.zip#egg=pkg"]
        );
    }

    #[test]
    fn test_missing_manifest_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = DependencyManifest::load(&tmp.path().join("requirements.txt")).unwrap();
        assert!(manifest.is_none());
    }

    #[test]
    fn test_load_keeps_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("requirements.txt");
        fs::write(&path, "pygame\nnoise\n").unwrap();

        let manifest = DependencyManifest::load(&path).unwrap().unwrap();
        assert_eq!(manifest.entries(), ["pygame", "noise"]);
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.path(), path);
    }
}
