//! Build configuration resolution and orchestration
//!
//! A [`BuildConfig`] is resolved exactly once at startup by merging CLI
//! flags, environment variables and hard-coded platform defaults, in that
//! precedence order, and is immutable afterwards. Platform-specific command
//! line construction lives in [`platforms`]; phase sequencing lives in
//! [`runner`].

pub mod platforms;
pub mod runner;

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Cli;
use crate::error::DobuildError;
use crate::utils::{env, paths, terminal};

/// The closed set of target platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPlatform {
    Windows,
    Linux,
    Osx,
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPlatform::Windows => write!(f, "windows"),
            TargetPlatform::Linux => write!(f, "linux"),
            TargetPlatform::Osx => write!(f, "osx"),
        }
    }
}

/// Target processor architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86,
    X64,
    Arm,
}

impl Arch {
    fn parse(value: &str, platform: TargetPlatform) -> Result<Self, DobuildError> {
        match value {
            "x86" => Ok(Arch::X86),
            "x64" => Ok(Arch::X64),
            "arm" => Ok(Arch::Arm),
            other => Err(DobuildError::UnsupportedTarget {
                what: "architecture",
                value: other.to_string(),
                platform: platform.to_string(),
            }),
        }
    }

    pub fn is_arm(self) -> bool {
        matches!(self, Arch::Arm)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arch::X86 => write!(f, "x86"),
            Arch::X64 => write!(f, "x64"),
            Arch::Arm => write!(f, "arm"),
        }
    }
}

/// Debug or release build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    fn parse(value: &str, platform: TargetPlatform) -> Result<Self, DobuildError> {
        match value {
            "debug" => Ok(BuildMode::Debug),
            "release" => Ok(BuildMode::Release),
            other => Err(DobuildError::UnsupportedTarget {
                what: "configuration",
                value: other.to_string(),
                platform: platform.to_string(),
            }),
        }
    }

    /// The value CMAKE_BUILD_TYPE expects.
    pub fn cmake_build_type(self) -> &'static str {
        match self {
            BuildMode::Debug => "Debug",
            BuildMode::Release => "Release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Debug => write!(f, "debug"),
            BuildMode::Release => write!(f, "release"),
        }
    }
}

/// Compiler toolset, constrained per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compiler {
    Msvc,
    Gnu,
    Clang,
}

impl Compiler {
    /// Resolve the compiler for a platform.
    ///
    /// Windows is fixed to msvc and rejects any other explicit request; the
    /// BUILD_COMPILER variable is not consulted there. Linux and macOS take
    /// CLI flag, then BUILD_COMPILER, then gnu, accepting only gnu or clang.
    fn resolve(
        platform: TargetPlatform,
        cli_value: Option<&str>,
    ) -> Result<Self, DobuildError> {
        match platform {
            TargetPlatform::Windows => match cli_value.map(str::to_lowercase) {
                None => Ok(Compiler::Msvc),
                Some(ref v) if v == "msvc" => Ok(Compiler::Msvc),
                Some(other) => Err(DobuildError::UnsupportedTarget {
                    what: "compiler",
                    value: other,
                    platform: platform.to_string(),
                }),
            },
            TargetPlatform::Linux | TargetPlatform::Osx => {
                let value = cli_value
                    .map(str::to_owned)
                    .or_else(|| env::get_env_var("BUILD_COMPILER"))
                    .unwrap_or_else(|| "gnu".to_string())
                    .to_lowercase();
                match value.as_str() {
                    "gnu" => Ok(Compiler::Gnu),
                    "clang" => Ok(Compiler::Clang),
                    other => Err(DobuildError::UnsupportedTarget {
                        what: "compiler",
                        value: other.to_string(),
                        platform: platform.to_string(),
                    }),
                }
            }
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compiler::Msvc => write!(f, "msvc"),
            Compiler::Gnu => write!(f, "gnu"),
            Compiler::Clang => write!(f, "clang"),
        }
    }
}

/// The fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub platform: TargetPlatform,
    pub arch: Arch,
    pub mode: BuildMode,
    pub compiler: Compiler,
    /// The cmake target to build; `None` suppresses the whole build group.
    pub cmake_target: Option<String>,
    /// vcpkg checkout root; its absence only matters once generate runs.
    pub vcpkg_root: Option<PathBuf>,
    pub project_root: PathBuf,
    /// Raw `--operation` value; validated when the build group runs.
    pub operation: Option<String>,
    pub as_service: bool,
    pub clean: bool,
    pub run_tests: bool,
}

impl BuildConfig {
    /// Resolve the configuration for `platform` from CLI flags, environment
    /// variables and defaults, in that precedence order.
    pub fn resolve(platform: TargetPlatform, cli: &Cli) -> Result<Self> {
        let arch_value = cli
            .arch
            .clone()
            .or_else(|| env::get_env_var("BUILD_ARCHITECTURE"))
            .unwrap_or_else(|| "x64".to_string())
            .to_lowercase();
        let arch = Arch::parse(&arch_value, platform)?;

        let mode_value = cli
            .config
            .clone()
            .or_else(|| env::get_env_var("BUILD_CONFIGURATION"))
            .unwrap_or_else(|| "debug".to_string())
            .to_lowercase();
        let mode = BuildMode::parse(&mode_value, platform)?;

        let compiler = Compiler::resolve(platform, cli.compiler.as_deref())?;

        if platform == TargetPlatform::Windows && arch.is_arm() {
            terminal::print_warning(
                "Windows arm builds are broken right now. Expect errors when \
                 running arm flavors of the build.",
            );
        }

        // No explicit target defaults to "all", except when only tests were
        // requested; an absent target skips the build group entirely.
        let cmake_target = match &cli.cmaketarget {
            Some(target) => Some(target.clone()),
            None if !cli.runtests => Some("all".to_string()),
            None => None,
        };

        Ok(Self {
            platform,
            arch,
            mode,
            compiler,
            cmake_target,
            vcpkg_root: cli.vcpkgdir.clone(),
            project_root: paths::project_root_path()?,
            operation: cli.operation.clone(),
            as_service: cli.as_service,
            clean: cli.clean,
            run_tests: cli.runtests,
        })
    }

    /// The unique flavor string for this build, e.g. `linux-arm-clang-release`.
    pub fn flavor(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.platform, self.arch, self.compiler, self.mode
        )
    }

    /// Build output directory for this flavor.
    pub fn build_path(&self) -> PathBuf {
        paths::default_build_path(&self.flavor())
    }
}
