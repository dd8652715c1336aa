//! Core types shared across the installer: the error taxonomy and its
//! user-facing display layer.

pub mod error;

pub use error::{ErrorCategory, ErrorContext, InstallerError, user_friendly_error};
