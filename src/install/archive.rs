//! Archive extraction and final binary placement.
//!
//! Extraction happens entirely inside the scratch workspace. Entries whose
//! paths are absolute or contain `..` components are rejected outright so
//! a malformed archive cannot write outside the staging directory. The
//! binary is then located anywhere in the extracted tree (release archives
//! have nested the binary under a directory before) and moved into the
//! install directory in one final step.

use crate::core::InstallerError;
use crate::platform::ArchiveFormat;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Extract `archive` into `staging` using the container format for the
/// current target.
///
/// # Errors
///
/// Malformed archives and unsafe entry paths are `General` errors; IO
/// failures propagate as such.
pub fn extract_archive(
    archive: &Path,
    staging: &Path,
    format: ArchiveFormat,
) -> Result<(), InstallerError> {
    debug!("extracting {} into {}", archive.display(), staging.display());
    match format {
        ArchiveFormat::TarGz => extract_tar_gz(archive, staging),
        ArchiveFormat::Zip => extract_zip(archive, staging),
    }
}

fn entry_is_safe(path: &Path) -> bool {
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn unsafe_entry(name: &str) -> InstallerError {
    InstallerError::Other {
        message: format!("archive entry '{name}' escapes the extraction directory"),
    }
}

fn extract_tar_gz(archive: &Path, staging: &Path) -> Result<(), InstallerError> {
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    for entry in tar.entries().map_err(|e| InstallerError::Other {
        message: format!("malformed tar archive: {e}"),
    })? {
        let mut entry = entry.map_err(|e| InstallerError::Other {
            message: format!("malformed tar entry: {e}"),
        })?;
        let path = entry
            .path()
            .map_err(|e| InstallerError::Other {
                message: format!("undecodable tar entry path: {e}"),
            })?
            .into_owned();

        if !entry_is_safe(&path) {
            return Err(unsafe_entry(&path.display().to_string()));
        }

        entry.unpack(staging.join(&path)).map_err(|e| InstallerError::Other {
            message: format!("failed to unpack '{}': {e}", path.display()),
        })?;
    }

    Ok(())
}

fn extract_zip(archive: &Path, staging: &Path) -> Result<(), InstallerError> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| InstallerError::Other {
        message: format!("malformed zip archive: {e}"),
    })?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| InstallerError::Other {
            message: format!("malformed zip entry: {e}"),
        })?;

        // enclosed_name already rejects absolute paths and traversal.
        let Some(relative) = entry.enclosed_name() else {
            return Err(unsafe_entry(entry.name()));
        };
        let dest = staging.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest)?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&dest)?;
        io::copy(&mut entry, &mut out)?;
    }

    Ok(())
}

/// Find the named binary anywhere in the extracted tree.
///
/// # Errors
///
/// `BinaryMissing` when no file with that name exists, which means the
/// archive is mis-packaged.
pub fn locate_binary(root: &Path, binary_name: &str) -> Result<PathBuf, InstallerError> {
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_file() && entry.file_name() == binary_name {
            debug!("found binary at {}", entry.path().display());
            return Ok(entry.path().to_path_buf());
        }
    }

    Err(InstallerError::BinaryMissing { binary: binary_name.to_string() })
}

/// Set the executable bits on a staged binary. No-op on Windows.
///
/// # Errors
///
/// Propagates IO errors from reading or updating the file metadata.
pub fn make_executable(path: &Path) -> Result<(), InstallerError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Move the staged binary into the install directory.
///
/// Rename is attempted first; when staging and destination live on
/// different filesystems (the usual case with a tmpfs workspace), it falls
/// back to copy-then-remove. Any write failure here is a permission error
/// because the directory was probed writable moments ago.
pub fn place_binary(staged: &Path, install_dir: &Path, binary_name: &str) -> Result<PathBuf, InstallerError> {
    let dest = install_dir.join(binary_name);
    debug!("placing binary at {}", dest.display());

    if std::fs::rename(staged, &dest).is_err() {
        std::fs::copy(staged, &dest).map_err(|_| InstallerError::PermissionDenied {
            operation: "writing the binary".to_string(),
            path: dest.display().to_string(),
        })?;
        let _ = std::fs::remove_file(staged);
    }

    Ok(dest)
}
