//! awsomarchy-installer - bootstrap installer and updater for the
//! awsomarchy terminal UI.
//!
//! The crate implements a one-shot install protocol: resolve the platform
//! target and release version, pick the first writable installation
//! directory, probe that the release artifact actually exists, download
//! and checksum-verify the archive, place the binary, and register the
//! directory on PATH. Every stage failure is fatal at the point of
//! detection; there is no retry layer.
//!
//! Library consumers drive the pipeline through [`install::run`]; the CLI
//! in [`cli`] is a thin wrapper over it.

pub mod cli;
pub mod client;
pub mod constants;
pub mod core;
pub mod install;
pub mod pathenv;
pub mod platform;
pub mod release;
pub mod reporter;
pub mod verify;
pub mod version;
pub mod workspace;
