//! Error types and helpers for user-friendly error messages
//!
//! Every error this tool can raise is fatal: there are no retries and no
//! partial-failure recovery. The variants below cover the full taxonomy —
//! unsupported target values, unsupported host environments, missing
//! required configuration, failed child processes and unrecognized
//! operations.

use thiserror::Error;

/// Fatal error conditions raised while resolving configuration or driving CMake.
#[derive(Error, Debug)]
pub enum DobuildError {
    /// A platform/arch/config/compiler value outside the allowed set.
    #[error("Building {value} {what} for {platform} is not supported")]
    UnsupportedTarget {
        what: &'static str,
        value: String,
        platform: String,
    },

    /// The requested target platform does not match the detected host.
    #[error("Building for {platform} on this host environment is not supported")]
    UnsupportedHost { platform: String },

    /// The requested target platform is not in the supported set at all.
    #[error("Currently builds for {platform} are not supported")]
    UnsupportedPlatform { platform: String },

    /// No `--platform` given and the host OS is unrecognized.
    #[error("Target platform was not specified and could not be deduced from the current host environment")]
    UnknownHost,

    /// The generate phase needs the vcpkg root and none was configured.
    #[error("vcpkg root directory was not specified")]
    MissingVcpkgRoot,

    /// A required external tool is not on PATH.
    #[error("Missing tool: {tool}")]
    MissingTool { tool: String, hint: String },

    /// A child process exited with a nonzero status.
    #[error("Running `{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    /// Unrecognized `--operation` value.
    #[error("Invalid operation specified: {operation}")]
    InvalidOperation { operation: String },
}

impl DobuildError {
    /// Actionable hint for this error, when one exists.
    fn hint(&self) -> Option<&str> {
        match self {
            DobuildError::MissingVcpkgRoot => Some(
                "Pass --vcpkgdir <path> or set the BUILD_VCPKGDIR environment \
                 variable to your vcpkg checkout.",
            ),
            DobuildError::MissingTool { hint, .. } => Some(hint),
            DobuildError::UnknownHost => {
                Some("Pass --platform windows, --platform linux or --platform osx.")
            }
            _ => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("{} {}", style("ERROR:").red().bold(), self);
        if let Some(hint) = self.hint() {
            eprintln!("{} {}", style("HINT:").yellow().bold(), hint);
        }
    }
}

/// Common error hints for missing tools
pub mod hints {
    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake"
    }
}
