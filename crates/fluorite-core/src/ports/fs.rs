//! Filesystem port for destructive directory operations.

use std::io;
use std::path::Path;

/// Removes directory trees.
///
/// Only removal goes through a port: it is the operation that can fail
/// for reasons outside this process (open file handles on Windows).
pub trait DirRemover: Send + Sync {
    /// Remove `path` and everything below it.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}
