//! CLI argument parsing using clap derive macros, plus host-platform dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::build::runner::BuildRunner;
use crate::build::{BuildConfig, TargetPlatform};
use crate::error::DobuildError;
use crate::exec::subprocess::Verbosity;
use crate::utils::env;

/// dobuild - builds the Delivery Optimization cross-platform client
///
/// Resolves the target flavor from flags, environment variables and
/// per-platform defaults, then drives the CMake generate and build phases.
#[derive(Parser, Debug)]
#[command(name = "dobuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The operation to perform: generate, build or cleanonly.
    /// Default is generate followed by build.
    #[arg(long)]
    pub operation: Option<String>,

    /// The target platform: windows, linux or osx.
    /// Default is the current host platform.
    #[arg(long)]
    pub platform: Option<String>,

    /// The target architecture: x86, x64 or arm.
    #[arg(long)]
    pub arch: Option<String>,

    /// The target configuration: debug or release.
    #[arg(long)]
    pub config: Option<String>,

    /// The compiler to use: msvc, gnu or clang.
    #[arg(long)]
    pub compiler: Option<String>,

    /// The cmake target to build, e.g. dosvc or dosvc_unity.
    #[arg(long)]
    pub cmaketarget: Option<String>,

    /// The vcpkg root directory providing the dependency toolchain file.
    #[arg(long, env = "BUILD_VCPKGDIR")]
    pub vcpkgdir: Option<PathBuf>,

    /// Remove built binaries before re-building them.
    #[arg(long)]
    pub clean: bool,

    /// Run the unit test executable from its default location.
    #[arg(long)]
    pub runtests: bool,

    /// Build the client for running as a daemon.
    #[arg(long = "as-service")]
    pub as_service: bool,

    /// Suppress child process output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Resolve the configuration for this invocation and execute the run.
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Verbose
        };

        let platform = select_target_platform(self.platform.as_deref())?;
        let config = BuildConfig::resolve(platform, &self)?;
        BuildRunner::new(config, verbosity).run()
    }
}

/// Pick the target platform variant, validating it against the host.
///
/// Without an explicit `--platform` the host decides; with one, the request
/// must match the host since none of the targets cross-build.
fn select_target_platform(requested: Option<&str>) -> Result<TargetPlatform, DobuildError> {
    match requested {
        None => {
            if env::is_running_on_windows() {
                Ok(TargetPlatform::Windows)
            } else if env::is_running_on_linux() {
                Ok(TargetPlatform::Linux)
            } else if env::is_running_on_osx() {
                Ok(TargetPlatform::Osx)
            } else {
                Err(DobuildError::UnknownHost)
            }
        }
        Some(requested) => {
            let requested = requested.to_lowercase();
            let (platform, host_matches) = match requested.as_str() {
                "windows" => (TargetPlatform::Windows, env::is_running_on_windows()),
                "linux" => (TargetPlatform::Linux, env::is_running_on_linux()),
                "osx" => (TargetPlatform::Osx, env::is_running_on_osx()),
                _ => {
                    return Err(DobuildError::UnsupportedPlatform {
                        platform: requested,
                    })
                }
            };
            if host_matches {
                Ok(platform)
            } else {
                Err(DobuildError::UnsupportedHost {
                    platform: requested,
                })
            }
        }
    }
}
