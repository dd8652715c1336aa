//! Installation directory selection.
//!
//! Candidates are probed in a fixed priority order and the first writable
//! one wins; later candidates are never touched once a directory is
//! selected. Writability is proven empirically by creating and removing a
//! marker file, because permission bits lie (read-only mounts, ACLs,
//! containers).

use crate::constants::WRITE_PROBE_MARKER;
use crate::core::InstallerError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Why a directory is in the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// Supplied on the command line; always probed first.
    Explicit,
    /// System-wide default (`/usr/local/bin`, `C:\Program Files\...`).
    SystemDefault,
    /// Per-user location that usually needs no elevation.
    UserLocal,
    /// `~/bin` style last resort.
    UserBin,
}

/// One entry of the prioritized candidate list.
#[derive(Debug, Clone)]
pub struct CandidateDirectory {
    /// The directory path.
    pub path: PathBuf,
    /// Why this candidate is in the list.
    pub origin: CandidateOrigin,
}

/// Build the prioritized candidate list for this platform.
///
/// An explicit directory always sorts first. The rest of the list prefers
/// system-wide locations over per-user ones, so an elevated run lands in
/// the conventional place.
#[must_use]
pub fn candidate_directories(explicit: Option<&Path>) -> Vec<CandidateDirectory> {
    let mut candidates = Vec::new();

    if let Some(dir) = explicit {
        candidates.push(CandidateDirectory {
            path: dir.to_path_buf(),
            origin: CandidateOrigin::Explicit,
        });
    }

    if cfg!(windows) {
        if let Ok(program_files) = std::env::var("ProgramFiles") {
            candidates.push(CandidateDirectory {
                path: PathBuf::from(program_files).join("awsomarchy"),
                origin: CandidateOrigin::SystemDefault,
            });
        }
        if let Some(data_local) = dirs::data_local_dir() {
            candidates.push(CandidateDirectory {
                path: data_local.join("Programs").join("awsomarchy"),
                origin: CandidateOrigin::UserLocal,
            });
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(CandidateDirectory {
                path: home.join("bin"),
                origin: CandidateOrigin::UserBin,
            });
        }
    } else {
        candidates.push(CandidateDirectory {
            path: PathBuf::from("/usr/local/bin"),
            origin: CandidateOrigin::SystemDefault,
        });
        if let Some(home) = dirs::home_dir() {
            candidates.push(CandidateDirectory {
                path: home.join(".local").join("bin"),
                origin: CandidateOrigin::UserLocal,
            });
            candidates.push(CandidateDirectory {
                path: home.join("bin"),
                origin: CandidateOrigin::UserBin,
            });
        }
    }

    candidates
}

/// Probe whether `dir` is writable by creating and deleting a marker file.
///
/// The directory itself is created first if missing; a directory we can
/// create is still only accepted if the marker write succeeds.
fn probe_writable(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let marker = dir.join(WRITE_PROBE_MARKER);
    match std::fs::File::create(&marker) {
        Ok(_) => {
            // Best effort; a leftover zero-byte marker is harmless.
            let _ = std::fs::remove_file(&marker);
            true
        }
        Err(_) => false,
    }
}

/// Select the installation directory: the first writable candidate in
/// priority order.
///
/// # Errors
///
/// `NoWritableDirectory` listing every probed candidate when none accepts
/// a write.
pub fn resolve_install_dir(explicit: Option<&Path>) -> Result<PathBuf, InstallerError> {
    let candidates = candidate_directories(explicit);
    let mut tried = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        debug!("probing candidate directory ({:?}): {}", candidate.origin, candidate.path.display());
        if probe_writable(&candidate.path) {
            debug!("selected install directory: {}", candidate.path.display());
            return Ok(candidate.path);
        }
        tried.push(candidate.path);
    }

    Err(InstallerError::NoWritableDirectory { tried })
}
