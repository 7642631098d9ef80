//! Native library discovery.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

/// Find the file called `name` below `roots`.
///
/// Roots are searched in order, each breadth-first down to `max_depth`
/// directory levels, with entries visited in sorted order so the result
/// does not depend on filesystem enumeration order. Anything under
/// `exclude` is skipped. Symlinked directories are not followed;
/// symlinked files are accepted when they resolve to a file.
pub fn find_library(
    roots: &[PathBuf],
    name: &str,
    max_depth: usize,
    exclude: Option<&Path>,
) -> Option<PathBuf> {
    roots.iter().find_map(|root| {
        let found = search_root(root, name, max_depth, exclude);
        if found.is_none() {
            trace!(root = %root.display(), name, "Library not under root");
        }
        found
    })
}

fn search_root(
    root: &Path,
    name: &str,
    max_depth: usize,
    exclude: Option<&Path>,
) -> Option<PathBuf> {
    let mut queue = VecDeque::from([(root.to_path_buf(), 0usize)]);

    while let Some((dir, depth)) = queue.pop_front() {
        if exclude.is_some_and(|prefix| dir.starts_with(prefix)) {
            debug!(dir = %dir.display(), "Skipping directory under foreign prefix");
            continue;
        }

        let Ok(read_dir) = fs::read_dir(&dir) else {
            continue;
        };
        let mut entries: Vec<_> = read_dir.filter_map(Result::ok).collect();
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in &entries {
            let path = entry.path();
            if entry.file_name() == name && path.is_file() {
                return Some(path);
            }
        }

        if depth < max_depth {
            for entry in entries {
                if entry.file_type().is_ok_and(|t| t.is_dir()) {
                    queue.push_back((entry.path(), depth + 1));
                }
            }
        }
    }

    None
}
