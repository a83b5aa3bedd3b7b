//! Per-platform generator and flag computation
//!
//! Platform behavior is a closed set of variants dispatched on
//! [`TargetPlatform`] — selected once at startup, no runtime polymorphism.
//! Common flags are assembled here; each platform module contributes its
//! generator name and toolchain-specific flags.

pub mod linux;
pub mod osx;
pub mod windows;

use std::path::Path;

use crate::build::{BuildConfig, TargetPlatform};

/// The CMake generator for this configuration.
pub fn generator(config: &BuildConfig) -> String {
    match config.platform {
        TargetPlatform::Windows => windows::generator(config.arch).to_string(),
        TargetPlatform::Linux => linux::generator().to_string(),
        TargetPlatform::Osx => osx::generator().to_string(),
    }
}

/// Flags for the generate phase, appended after the source directory.
///
/// Ordering matters only for readability; cmake accepts these in any order.
/// Generator and build-type first, then the per-platform toolchain flags.
pub fn generate_options(config: &BuildConfig, vcpkg_root: &Path) -> Vec<String> {
    let mut options = vec![
        "-G".to_string(),
        generator(config),
        format!("-DCMAKE_BUILD_TYPE={}", config.mode.cmake_build_type()),
    ];
    if config.as_service {
        options.push("-DDO_BUILD_AS_SERVICE=ON".to_string());
    }
    match config.platform {
        TargetPlatform::Windows => {
            options.extend(windows::generate_options(config, vcpkg_root))
        }
        TargetPlatform::Linux => options.extend(linux::generate_options(config, vcpkg_root)),
        TargetPlatform::Osx => options.extend(osx::generate_options(config, vcpkg_root)),
    }
    options
}

/// Flags for the build phase, appended after `--build <build dir>`.
///
/// Callers must only invoke this once a cmake target has resolved.
pub fn build_options(config: &BuildConfig, cmake_target: &str) -> Vec<String> {
    let mut options = vec!["--target".to_string(), cmake_target.to_string()];
    if config.platform == TargetPlatform::Windows {
        options.extend(windows::build_options(config));
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Arch, BuildMode, Compiler};
    use serial_test::serial;
    use std::path::PathBuf;

    fn config(platform: TargetPlatform, arch: Arch, mode: BuildMode, compiler: Compiler) -> BuildConfig {
        BuildConfig {
            platform,
            arch,
            mode,
            compiler,
            cmake_target: Some("all".to_string()),
            vcpkg_root: Some(PathBuf::from("/opt/vcpkg")),
            project_root: PathBuf::from("/repo"),
            operation: None,
            as_service: false,
            clean: false,
            run_tests: false,
        }
    }

    #[test]
    fn unix_platforms_use_makefile_generator() {
        let linux = config(
            TargetPlatform::Linux,
            Arch::X64,
            BuildMode::Release,
            Compiler::Clang,
        );
        assert_eq!(generator(&linux), "Unix Makefiles");
        let osx = config(
            TargetPlatform::Osx,
            Arch::X64,
            BuildMode::Debug,
            Compiler::Gnu,
        );
        assert_eq!(generator(&osx), "Unix Makefiles");
    }

    #[test]
    fn windows_generator_depends_on_arch() {
        let x64 = config(
            TargetPlatform::Windows,
            Arch::X64,
            BuildMode::Debug,
            Compiler::Msvc,
        );
        assert_eq!(generator(&x64), "Visual Studio 15 2017 Win64");
        let arm = config(
            TargetPlatform::Windows,
            Arch::Arm,
            BuildMode::Debug,
            Compiler::Msvc,
        );
        assert_eq!(generator(&arm), "Visual Studio 15 2017");
    }

    #[test]
    #[serial]
    fn linux_release_clang_flags() {
        std::env::remove_var("ZLIB_ROOT_DIR");
        let cfg = config(
            TargetPlatform::Linux,
            Arch::X64,
            BuildMode::Release,
            Compiler::Clang,
        );
        let options = generate_options(&cfg, Path::new("/opt/vcpkg"));
        assert!(options.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
        assert!(options.iter().any(|o| o
            == "-DCMAKE_TOOLCHAIN_FILE=/opt/vcpkg/scripts/buildsystems/vcpkg.cmake"));
        assert!(options.iter().any(|o| o.starts_with("-DVCPKG_CHAINLOAD_TOOLCHAIN_FILE=")
            && o.ends_with("toolchain-linux-x64-clang.cmake")));
        assert!(!options.iter().any(|o| o.starts_with("-DZLIB_ROOT=")));
    }

    #[test]
    fn windows_flags_include_triplet_and_config_selector() {
        let cfg = config(
            TargetPlatform::Windows,
            Arch::Arm,
            BuildMode::Release,
            Compiler::Msvc,
        );
        let options = generate_options(&cfg, Path::new("/opt/vcpkg"));
        assert!(options
            .contains(&"-DVCPKG_TARGET_TRIPLET=arm-windows".to_string()));
        assert!(!options.iter().any(|o| o.contains("CHAINLOAD")));

        let build = build_options(&cfg, "all");
        assert_eq!(build, vec!["--target", "all", "--config", "release"]);
    }

    #[test]
    fn unix_build_options_are_target_only() {
        let cfg = config(
            TargetPlatform::Linux,
            Arch::X64,
            BuildMode::Release,
            Compiler::Gnu,
        );
        assert_eq!(build_options(&cfg, "dosvc"), vec!["--target", "dosvc"]);
    }

    #[test]
    #[serial]
    fn arm_appends_zlib_root_only_when_set() {
        std::env::set_var("ZLIB_ROOT_DIR", "/opt/zlib-arm");
        let cfg = config(
            TargetPlatform::Linux,
            Arch::Arm,
            BuildMode::Debug,
            Compiler::Gnu,
        );
        let options = generate_options(&cfg, Path::new("/opt/vcpkg"));
        assert!(options.contains(&"-DZLIB_ROOT=/opt/zlib-arm".to_string()));

        // Not appended for non-arm even with the variable set.
        let x64 = config(
            TargetPlatform::Osx,
            Arch::X64,
            BuildMode::Debug,
            Compiler::Gnu,
        );
        let options = generate_options(&x64, Path::new("/opt/vcpkg"));
        assert!(!options.iter().any(|o| o.starts_with("-DZLIB_ROOT=")));
        std::env::remove_var("ZLIB_ROOT_DIR");
    }

    #[test]
    fn as_service_flag_is_appended() {
        let mut cfg = config(
            TargetPlatform::Linux,
            Arch::X64,
            BuildMode::Debug,
            Compiler::Gnu,
        );
        cfg.as_service = true;
        let options = generate_options(&cfg, Path::new("/opt/vcpkg"));
        assert!(options.contains(&"-DDO_BUILD_AS_SERVICE=ON".to_string()));
    }
}
