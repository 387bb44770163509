//! Request-scoped scratch directories for transient download artifacts

use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Scratch directory created fresh for one request and removed on drop.
///
/// No two requests ever share a scratch location, so handlers can write
/// freely without coordinating with each other.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a new scratch directory under `root`, creating `root` itself
    /// if it does not exist yet.
    pub fn create(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix("delinkify-")
            .tempdir_in(root)?;
        tracing::debug!(path = %dir.path().display(), "created scratch dir");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
