//! Build orchestration: clean → generate → build → test
//!
//! Phases execute strictly in sequence within one run. Clean (when
//! requested) always precedes generate, generate always precedes build, and
//! the test phase runs after the build group even when the build group is
//! skipped entirely. Each phase's elapsed time is recorded and printed in
//! the completion summary.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::build::{platforms, BuildConfig};
use crate::error::DobuildError;
use crate::exec::subprocess::{self, Verbosity};
use crate::utils::{env, terminal};

/// Elapsed time per phase; observational only, reset scope is a single run.
#[derive(Debug, Default)]
pub struct PhaseTimings {
    pub clean: Duration,
    pub generate: Duration,
    pub build: Duration,
}

/// Restores the original working directory when dropped, so a failing
/// generate phase cannot leak its directory change into later phases.
struct WorkingDirGuard {
    original: PathBuf,
}

impl WorkingDirGuard {
    fn change_to(path: &Path) -> Result<Self> {
        let original =
            std::env::current_dir().context("Failed to read the current working directory")?;
        std::env::set_current_dir(path)
            .with_context(|| format!("Failed to change directory to {}", path.display()))?;
        Ok(Self { original })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Drives the phases of one build run.
pub struct BuildRunner {
    config: BuildConfig,
    verbosity: Verbosity,
    timings: PhaseTimings,
}

impl BuildRunner {
    pub fn new(config: BuildConfig, verbosity: Verbosity) -> Self {
        Self {
            config,
            verbosity,
            timings: PhaseTimings::default(),
        }
    }

    /// Execute the run: the build group when a cmake target resolved, then
    /// the test phase when requested.
    pub fn run(&mut self) -> Result<()> {
        if let Some(cmake_target) = self.config.cmake_target.clone() {
            self.print_start_banner(&cmake_target);

            let mut cleaned = false;
            if self.config.clean {
                self.clean()?;
                cleaned = true;
            }

            match self.config.operation.clone() {
                Some(operation) => match operation.to_lowercase().as_str() {
                    "generate" => self.generate()?,
                    "build" => self.build(&cmake_target)?,
                    "cleanonly" => {
                        if !cleaned {
                            self.clean()?;
                        }
                    }
                    _ => {
                        return Err(DobuildError::InvalidOperation { operation }.into());
                    }
                },
                None => {
                    self.generate()?;
                    self.build(&cmake_target)?;
                }
            }

            terminal::print_heading("Build Complete");
            self.print_times();
        }

        if self.config.run_tests {
            self.run_tests()?;
        }
        Ok(())
    }

    fn print_start_banner(&self, cmake_target: &str) {
        terminal::print_heading("Starting Build");
        println!("Target OS: {}", capitalize(&self.config.platform.to_string()));
        println!("Flavor: {}", self.config.flavor());
        println!("Arch: {}", self.config.arch);
        println!("Config: {}", self.config.mode);
        println!("CMake Target: {cmake_target}");
        println!("CMake Generator: {}", platforms::generator(&self.config));
        println!("Compiler: {}", self.config.compiler);
        println!("Clean: {}", self.config.clean);
        println!("Source Path: {}", self.config.project_root.display());
        println!("Build Path: {}", self.config.build_path().display());
    }

    fn print_times(&self) {
        println!("Time to clean: {:.2}s", self.timings.clean.as_secs_f64());
        println!(
            "Time to generate: {:.2}s",
            self.timings.generate.as_secs_f64()
        );
        println!("Time to build: {:.2}s", self.timings.build.as_secs_f64());
    }

    /// Delete the build output directory for this flavor, if present.
    fn clean(&mut self) -> Result<()> {
        let build_path = self.config.build_path();
        println!("Purging: {}", build_path.display());
        let start = Instant::now();
        if build_path.exists() {
            let reclaimed = dir_size(&build_path);
            std::fs::remove_dir_all(&build_path)
                .with_context(|| format!("Failed to remove {}", build_path.display()))?;
            println!("Reclaimed {}", format_size(reclaimed));
        }
        self.timings.clean = start.elapsed();
        Ok(())
    }

    /// Run the cmake generate phase inside the build output directory.
    ///
    /// Older cmake releases only accept `-S`/`-B` on some platforms, so we
    /// run cmake from the build directory instead and point it back at the
    /// source tree. The directory change is scoped to this phase.
    fn generate(&mut self) -> Result<()> {
        let vcpkg_root = self
            .config
            .vcpkg_root
            .clone()
            .ok_or(DobuildError::MissingVcpkgRoot)?;

        let cmake = subprocess::find_cmake()?;
        let build_path = self.config.build_path();
        std::fs::create_dir_all(&build_path)
            .with_context(|| format!("Failed to create {}", build_path.display()))?;

        let mut command = vec![
            cmake.display().to_string(),
            self.config.project_root.display().to_string(),
        ];
        command.extend(platforms::generate_options(&self.config, &vcpkg_root));

        let _guard = WorkingDirGuard::change_to(&build_path)?;
        let start = Instant::now();
        subprocess::run_command(&command, self.verbosity)?;
        self.timings.generate = start.elapsed();
        Ok(())
    }

    /// Run the cmake build phase against the generated tree.
    fn build(&mut self, cmake_target: &str) -> Result<()> {
        let cmake = subprocess::find_cmake()?;
        let build_path = self.config.build_path();
        let mut command = vec![
            cmake.display().to_string(),
            "--build".to_string(),
            build_path.display().to_string(),
        ];
        command.extend(platforms::build_options(&self.config, cmake_target));

        let start = Instant::now();
        subprocess::run_command(&command, self.verbosity)?;
        self.timings.build = start.elapsed();
        Ok(())
    }

    /// Execute the unit test binary from its conventional location.
    ///
    /// The tests' exit code is not interpreted; only a failure to launch the
    /// binary is an error.
    fn run_tests(&self) -> Result<()> {
        let test_exe_name = if env::is_running_on_windows() {
            "docs_tests.exe"
        } else {
            "docs_tests"
        };
        let test_exe = self.config.build_path().join("test").join(test_exe_name);
        subprocess::run_unchecked(&[test_exe.display().to_string()])
    }
}

/// Uppercase the first character, for the banner's platform name.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Total size in bytes of all files under a directory.
fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}

/// Render a byte count with a human-friendly unit.
fn format_size(size_bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }
    format!("{:.2} {}", size, UNITS[unit_idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Arch, BuildMode, Compiler, TargetPlatform};
    use serial_test::serial;

    fn config_with_flavor_suffix(suffix: &str) -> BuildConfig {
        // The build path derives from the flavor, so tests that touch the
        // filesystem pick distinct arch/mode/compiler triples to get
        // distinct directories under the temp dir.
        let (arch, mode, compiler) = match suffix {
            "clean-missing" => (Arch::X86, BuildMode::Debug, Compiler::Clang),
            "clean-existing" => (Arch::X86, BuildMode::Release, Compiler::Clang),
            "no-vcpkg" => (Arch::Arm, BuildMode::Debug, Compiler::Gnu),
            _ => (Arch::Arm, BuildMode::Release, Compiler::Gnu),
        };
        BuildConfig {
            platform: TargetPlatform::Linux,
            arch,
            mode,
            compiler,
            cmake_target: Some("all".to_string()),
            vcpkg_root: None,
            project_root: PathBuf::from("/repo"),
            operation: None,
            as_service: false,
            clean: false,
            run_tests: false,
        }
    }

    #[test]
    fn clean_on_missing_directory_is_a_noop() {
        let config = config_with_flavor_suffix("clean-missing");
        let build_path = config.build_path();
        if build_path.exists() {
            std::fs::remove_dir_all(&build_path).unwrap();
        }
        let mut runner = BuildRunner::new(config, Verbosity::Quiet);
        runner.clean().unwrap();
        assert!(!build_path.exists());
    }

    #[test]
    fn clean_removes_existing_directory() {
        let config = config_with_flavor_suffix("clean-existing");
        let build_path = config.build_path();
        std::fs::create_dir_all(&build_path).unwrap();
        std::fs::write(build_path.join("CMakeCache.txt"), "stale").unwrap();

        let mut runner = BuildRunner::new(config, Verbosity::Quiet);
        runner.clean().unwrap();
        assert!(!build_path.exists());
    }

    #[test]
    fn generate_without_vcpkg_root_fails_before_spawning() {
        let config = config_with_flavor_suffix("no-vcpkg");
        let build_path = config.build_path();
        if build_path.exists() {
            std::fs::remove_dir_all(&build_path).unwrap();
        }
        let mut runner = BuildRunner::new(config, Verbosity::Quiet);
        let err = runner.generate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DobuildError>(),
            Some(DobuildError::MissingVcpkgRoot)
        ));
        // Raised before the build directory is even created.
        assert!(!build_path.exists());
    }

    #[test]
    fn invalid_operation_is_fatal() {
        let mut config = config_with_flavor_suffix("bad-op");
        config.operation = Some("assemble".to_string());
        let mut runner = BuildRunner::new(config, Verbosity::Quiet);
        let err = runner.run().unwrap_err();
        match err.downcast_ref::<DobuildError>() {
            Some(DobuildError::InvalidOperation { operation }) => {
                assert_eq!(operation, "assemble");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn working_dir_guard_restores_on_drop() {
        let original = std::env::current_dir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        {
            let _guard = WorkingDirGuard::change_to(temp.path()).unwrap();
            assert_eq!(
                std::env::current_dir().unwrap().canonicalize().unwrap(),
                temp.path().canonicalize().unwrap()
            );
        }
        assert_eq!(std::env::current_dir().unwrap(), original);
    }

    #[test]
    fn capitalize_matches_banner_casing() {
        assert_eq!(capitalize("windows"), "Windows");
        assert_eq!(capitalize("osx"), "Osx");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn format_size_picks_sensible_units() {
        assert_eq!(format_size(0), "0.00 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn dir_size_sums_file_lengths() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("a"), vec![0u8; 100]).unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub").join("b"), vec![0u8; 50]).unwrap();
        assert_eq!(dir_size(temp.path()), 150);
    }
}
