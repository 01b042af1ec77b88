//! Core executable resolution.
//!
//! Search order: explicit override, next to the host executable, one
//! directory up, then PATH. The returned path is known to exist at the
//! moment of resolution; the spawn itself re-validates.

use std::path::{Path, PathBuf};

use super::error::SupervisorError;

/// Platform-appropriate name of the core client binary.
#[must_use]
pub fn core_executable_name() -> &'static str {
    if cfg!(windows) {
        "ewp-core-client.exe"
    } else {
        "ewp-core-client"
    }
}

/// Resolve the core executable, preferring an explicit override.
///
/// # Errors
///
/// `SupervisorError::ExecutableNotFound` when no candidate exists.
pub fn resolve_core_executable(
    override_path: Option<&Path>,
) -> Result<PathBuf, SupervisorError> {
    if let Some(path) = override_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(SupervisorError::ExecutableNotFound {
            path: path.to_path_buf(),
        });
    }

    let name = core_executable_name();

    if let Ok(host_exe) = std::env::current_exe() {
        if let Some(dir) = host_exe.parent() {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Ok(candidate);
            }
            if let Some(parent) = dir.parent() {
                let candidate = parent.join(name);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
        }
    }

    which::which(name).map_err(|_| SupervisorError::ExecutableNotFound {
        path: PathBuf::from(name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_override_is_rejected() {
        let bogus = Path::new("/nonexistent/ewp-core-client");
        let err = resolve_core_executable(Some(bogus)).unwrap_err();
        assert!(matches!(err, SupervisorError::ExecutableNotFound { path } if path == bogus));
    }

    #[test]
    fn existing_override_is_used_verbatim() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolved = resolve_core_executable(Some(file.path())).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn binary_name_matches_platform() {
        let name = core_executable_name();
        if cfg!(windows) {
            assert!(name.ends_with(".exe"));
        } else {
            assert_eq!(name, "ewp-core-client");
        }
    }
}
