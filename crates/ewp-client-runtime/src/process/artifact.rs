//! Per-run config artifact on disk.
//!
//! The materialized config is written under a name unique to this host
//! process and run, so a previous artifact that failed to delete can never
//! be picked up by a later run. Written atomically via temp file + rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// A generated config file owned by exactly one core run.
///
/// Removed from disk when dropped, which covers every way a run can end:
/// graceful stop, crash, startup failure, and supervisor teardown.
#[derive(Debug)]
pub(crate) struct ConfigArtifact {
    path: PathBuf,
}

impl ConfigArtifact {
    /// Write `contents` to a fresh artifact for run `run_seq`.
    pub fn write(contents: &[u8], run_seq: u64) -> io::Result<Self> {
        let dir = std::env::temp_dir();
        let name = format!("ewp-client-{}-{}.json", std::process::id(), run_seq);
        let path = dir.join(&name);
        let temp_path = dir.join(format!("{name}.tmp"));

        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &path)?;

        debug!(path = %path.display(), "config artifact written");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ConfigArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "config artifact removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove config artifact");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_contents_and_removes_on_drop() {
        let artifact = ConfigArtifact::write(b"{\"log\":{}}", 9001).expect("write failed");
        let path = artifact.path().to_path_buf();
        assert_eq!(fs::read(&path).unwrap(), b"{\"log\":{}}");
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn run_sequence_makes_paths_unique() {
        let first = ConfigArtifact::write(b"{}", 9002).unwrap();
        let second = ConfigArtifact::write(b"{}", 9003).unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn drop_tolerates_an_already_missing_file() {
        let artifact = ConfigArtifact::write(b"{}", 9004).unwrap();
        fs::remove_file(artifact.path()).unwrap();
        drop(artifact); // must not panic or warn-loop
    }
}
