//! Shell profile PATH persistence for Unix hosts.
//!
//! The export line is appended to the profile of the user's login shell,
//! guarded by a marker comment so repeated runs never append a second
//! copy.

use std::io::Write;
use std::path::{Path, PathBuf};

const MARKER: &str = "# added by awsomarchy installer";

/// Profile file for the user's login shell, from `$SHELL`.
fn profile_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let shell = std::env::var("SHELL").unwrap_or_default();
    let shell_name = Path::new(&shell)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let profile = match shell_name.as_str() {
        "zsh" => home.join(".zshrc"),
        "bash" => home.join(".bashrc"),
        "fish" => home.join(".config").join("fish").join("config.fish"),
        _ => home.join(".profile"),
    };
    Some(profile)
}

fn export_line(dir: &Path, fish: bool) -> String {
    if fish {
        format!("fish_add_path {}", dir.display())
    } else {
        format!("export PATH=\"{}:$PATH\"", dir.display())
    }
}

/// Append the guarded export line to the login shell's profile unless it
/// is already there. Returns a notice for the user on success.
pub fn persist(dir: &Path) -> std::io::Result<String> {
    let Some(profile) = profile_path() else {
        return Err(std::io::Error::other("could not determine home directory"));
    };
    persist_to(&profile, dir)
}

fn persist_to(profile: &Path, dir: &Path) -> std::io::Result<String> {
    let fish = profile.extension().is_some_and(|e| e == "fish");
    let line = export_line(dir, fish);

    let existing = std::fs::read_to_string(profile).unwrap_or_default();
    if existing.lines().any(|l| l.trim() == line) {
        return Ok(format!("{} already references {}", profile.display(), dir.display()));
    }

    if let Some(parent) = profile.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(profile)?;
    writeln!(file, "\n{MARKER}\n{line}")?;

    Ok(format!(
        "added {} to PATH in {}; restart your shell or source the profile",
        dir.display(),
        profile.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_line_shapes_per_shell() {
        let dir = Path::new("/home/user/.local/bin");
        assert_eq!(
            export_line(dir, false),
            "export PATH=\"/home/user/.local/bin:$PATH\""
        );
        assert_eq!(export_line(dir, true), "fish_add_path /home/user/.local/bin");
    }

    #[test]
    fn appends_guarded_line_once() {
        let dir = Path::new("/opt/tools/bin");
        let profile_dir = tempfile::tempdir().unwrap();
        let profile = profile_dir.path().join(".bashrc");
        std::fs::write(&profile, "alias ll='ls -l'\n").unwrap();

        persist_to(&profile, dir).unwrap();
        let contents = std::fs::read_to_string(&profile).unwrap();
        assert!(contents.contains(MARKER));
        assert!(contents.contains(&export_line(dir, false)));
        assert!(contents.starts_with("alias ll='ls -l'\n"));
    }

    #[test]
    fn existing_entry_leaves_profile_untouched() {
        let dir = Path::new("/opt/tools/bin");
        let profile_dir = tempfile::tempdir().unwrap();
        let profile = profile_dir.path().join(".zshrc");
        std::fs::write(
            &profile,
            format!("setopt autocd\n{MARKER}\n{}\n", export_line(dir, false)),
        )
        .unwrap();
        let before = std::fs::read_to_string(&profile).unwrap();

        let notice = persist_to(&profile, dir).unwrap();
        assert!(notice.contains("already references"));
        let after = std::fs::read_to_string(&profile).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn missing_profile_is_created_with_parents() {
        let dir = Path::new("/opt/tools/bin");
        let home = tempfile::tempdir().unwrap();
        let profile = home.path().join(".config").join("fish").join("config.fish");

        persist_to(&profile, dir).unwrap();
        let contents = std::fs::read_to_string(&profile).unwrap();
        assert!(contents.contains("fish_add_path /opt/tools/bin"));
    }
}
