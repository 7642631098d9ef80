//! Local filesystem adapter.

use std::io;
use std::path::Path;

use fluorite_core::ports::DirRemover;

/// Removes directories from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl DirRemover for LocalFs {
    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}
