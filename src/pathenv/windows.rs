//! Per-user PATH persistence through the Windows registry.
//!
//! Updates the `Path` value under `HKCU\Environment`, which applies to
//! new processes for the current user without elevation. The value is
//! written back as an expandable string so `%VAR%` references already in
//! it keep working.

use std::path::Path;
use windows_registry::CURRENT_USER;

/// Append `dir` to the per-user `Path` registry value unless it is
/// already a component. Returns a notice for the user on success.
pub fn persist(dir: &Path) -> std::io::Result<String> {
    let key = CURRENT_USER
        .create("Environment")
        .map_err(|e| std::io::Error::other(format!("opening HKCU\\Environment: {e}")))?;

    let current = key.get_hstring("Path").map(|v| v.to_string_lossy()).unwrap_or_default();
    let dir_str = dir.display().to_string();

    let already = current
        .split(';')
        .map(|component| component.trim_end_matches(['\\', '/']))
        .any(|component| component.eq_ignore_ascii_case(dir_str.trim_end_matches(['\\', '/'])));
    if already {
        return Ok(format!("user PATH already references {dir_str}"));
    }

    let updated = if current.is_empty() || current.ends_with(';') {
        format!("{current}{dir_str}")
    } else {
        format!("{current};{dir_str}")
    };

    key.set_expand_hstring("Path", &updated.as_str().into())
        .map_err(|e| std::io::Error::other(format!("writing HKCU\\Environment Path: {e}")))?;

    Ok(format!(
        "added {dir_str} to the user PATH; open a new terminal for it to take effect"
    ))
}
