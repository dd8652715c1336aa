//! PATH registration for the install directory.
//!
//! Registration is idempotent: if the directory is already a PATH
//! component, nothing is written. Failures here never abort the run; the
//! binary is installed and reachable by absolute path regardless.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

use crate::reporter::Reporter;
use std::path::Path;
use tracing::{debug, warn};

/// Whether `dir` already appears as a PATH component. `Path` equality
/// compares components, so trailing separators do not produce false
/// negatives.
#[must_use]
pub fn already_on_path(dir: &Path) -> bool {
    let Some(path_var) = std::env::var_os("PATH") else {
        return false;
    };

    std::env::split_paths(&path_var).any(|component| component == dir)
}

/// Make `dir` reachable from PATH, persisting across sessions.
///
/// On Unix this appends a guarded export line to the shell profile; on
/// Windows it updates the per-user `Path` registry value. Either way the
/// current process PATH is updated too. Never fatal.
pub fn register(dir: &Path, reporter: &Reporter) {
    if already_on_path(dir) {
        debug!("{} is already on PATH", dir.display());
        return;
    }

    #[cfg(unix)]
    let result = unix::persist(dir);
    #[cfg(windows)]
    let result = windows::persist(dir);

    match result {
        Ok(notice) => {
            extend_session_path(dir);
            reporter.detail(&notice);
        }
        Err(e) => {
            warn!("could not register {} on PATH: {e}", dir.display());
            reporter.warn(&format!(
                "could not add {} to PATH: {e}. Add it manually to use 'awsomarchy' directly",
                dir.display()
            ));
        }
    }
}

/// Prepend `dir` to the current process PATH so follow-up commands in the
/// same session can find the binary.
fn extend_session_path(dir: &Path) {
    let current = std::env::var_os("PATH").unwrap_or_default();
    let mut parts = vec![dir.to_path_buf()];
    parts.extend(std::env::split_paths(&current));

    if let Ok(joined) = std::env::join_paths(parts) {
        // SAFETY: the installer is single-threaded at this point; the
        // pipeline runs stages sequentially on the main task.
        unsafe { std::env::set_var("PATH", joined) };
    }
}
