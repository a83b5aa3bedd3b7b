//! Windows platform variant
//!
//! Fixed to the msvc toolset. Visual Studio is a multi-config generator, so
//! the build phase always selects the configuration explicitly.

use std::path::Path;

use crate::build::{Arch, BuildConfig};
use crate::utils::paths;

/// Visual Studio generator for the architecture; x64 needs the Win64 variant.
pub fn generator(arch: Arch) -> &'static str {
    if arch == Arch::X64 {
        "Visual Studio 15 2017 Win64"
    } else {
        "Visual Studio 15 2017"
    }
}

pub fn generate_options(config: &BuildConfig, vcpkg_root: &Path) -> Vec<String> {
    vec![
        format!(
            "-DCMAKE_TOOLCHAIN_FILE={}",
            paths::vcpkg_toolchain_file_path(vcpkg_root).display()
        ),
        format!("-DVCPKG_TARGET_TRIPLET={}", vcpkg_triplet(config)),
    ]
}

pub fn build_options(config: &BuildConfig) -> Vec<String> {
    vec!["--config".to_string(), config.mode.to_string()]
}

/// The triplet string vcpkg keys its installed packages on.
/// The plain `{arch}-windows` triplet, not the `-static` one.
fn vcpkg_triplet(config: &BuildConfig) -> String {
    format!("{}-{}", config.arch, config.platform)
}
