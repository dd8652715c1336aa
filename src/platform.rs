//! Platform resolution: maps the running OS and CPU architecture to the
//! canonical target triple used in release artifact names.
//!
//! The target is derived once at startup and never recomputed mid-run. The
//! same type also answers the two platform questions later stages need:
//! which archive container the release uses and what the shipped executable
//! is called. This keeps every platform difference behind one seam, with
//! the PATH persistence mechanism living in [`crate::pathenv`].

use crate::constants::BINARY_NAME;
use crate::core::InstallerError;

/// Operating system family of the running host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Linux (glibc targets).
    Linux,
    /// macOS.
    MacOs,
    /// Windows (MSVC target).
    Windows,
}

/// CPU architecture of the running host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostArch {
    /// 64-bit x86.
    X86_64,
    /// 64-bit ARM.
    Aarch64,
}

/// Container format of the release archive for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// tar + gzip, used by the POSIX targets.
    TarGz,
    /// zip, used by the Windows target.
    Zip,
}

impl ArchiveFormat {
    /// File extension as it appears in artifact names.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// The resolved platform target, derived once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformTarget {
    /// Operating system family.
    pub os: HostOs,
    /// CPU architecture.
    pub arch: HostArch,
    /// Canonical target triple embedded in artifact filenames.
    pub triple: &'static str,
}

impl PlatformTarget {
    /// Resolve the target for the running host.
    ///
    /// # Errors
    ///
    /// Returns a `General`-category error naming the unsupported OS/arch
    /// pair when no release artifact exists for it. This is fatal and not
    /// recoverable.
    pub fn detect() -> Result<Self, InstallerError> {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Resolve a target from explicit OS/arch strings, as reported by the
    /// operating system. Split out from [`detect`](Self::detect) so the
    /// mapping is testable on any host.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self, InstallerError> {
        let (host_os, host_arch, triple) = match (os, arch) {
            ("linux", "x86_64") => (HostOs::Linux, HostArch::X86_64, "x86_64-unknown-linux-gnu"),
            ("linux", "aarch64") => {
                (HostOs::Linux, HostArch::Aarch64, "aarch64-unknown-linux-gnu")
            }
            ("macos", "x86_64") => (HostOs::MacOs, HostArch::X86_64, "x86_64-apple-darwin"),
            ("macos", "aarch64") => (HostOs::MacOs, HostArch::Aarch64, "aarch64-apple-darwin"),
            ("windows", "x86_64") => {
                (HostOs::Windows, HostArch::X86_64, "x86_64-pc-windows-msvc")
            }
            _ => {
                return Err(InstallerError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: arch.to_string(),
                });
            }
        };

        Ok(Self { os: host_os, arch: host_arch, triple })
    }

    /// Archive container used by this target's releases.
    #[must_use]
    pub const fn archive_format(&self) -> ArchiveFormat {
        match self.os {
            HostOs::Windows => ArchiveFormat::Zip,
            HostOs::Linux | HostOs::MacOs => ArchiveFormat::TarGz,
        }
    }

    /// Name of the executable inside the archive, with the platform
    /// suffix applied.
    #[must_use]
    pub fn binary_name(&self) -> String {
        match self.os {
            HostOs::Windows => format!("{BINARY_NAME}.exe"),
            HostOs::Linux | HostOs::MacOs => BINARY_NAME.to_string(),
        }
    }

    /// Whether the placed binary needs executable permission bits set.
    #[must_use]
    pub const fn needs_exec_bit(&self) -> bool {
        !matches!(self.os, HostOs::Windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_matrix_maps_to_triples() {
        let cases = [
            ("linux", "x86_64", "x86_64-unknown-linux-gnu"),
            ("linux", "aarch64", "aarch64-unknown-linux-gnu"),
            ("macos", "x86_64", "x86_64-apple-darwin"),
            ("macos", "aarch64", "aarch64-apple-darwin"),
            ("windows", "x86_64", "x86_64-pc-windows-msvc"),
        ];

        for (os, arch, triple) in cases {
            let target = PlatformTarget::from_parts(os, arch).unwrap();
            assert_eq!(target.triple, triple);
        }
    }

    #[test]
    fn unsupported_combinations_are_fatal() {
        let err = PlatformTarget::from_parts("windows", "aarch64").unwrap_err();
        assert!(err.to_string().contains("windows-aarch64"));

        assert!(PlatformTarget::from_parts("freebsd", "x86_64").is_err());
        assert!(PlatformTarget::from_parts("linux", "riscv64").is_err());
    }

    #[test]
    fn archive_format_follows_os_family() {
        let linux = PlatformTarget::from_parts("linux", "x86_64").unwrap();
        assert_eq!(linux.archive_format(), ArchiveFormat::TarGz);
        assert_eq!(linux.binary_name(), "awsomarchy");
        assert!(linux.needs_exec_bit());

        let windows = PlatformTarget::from_parts("windows", "x86_64").unwrap();
        assert_eq!(windows.archive_format(), ArchiveFormat::Zip);
        assert_eq!(windows.binary_name(), "awsomarchy.exe");
        assert!(!windows.needs_exec_bit());
    }
}
