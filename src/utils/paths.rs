//! Path resolution for the build driver
//!
//! Deterministic path joins only; the single piece of I/O is reading this
//! executable's own location to derive the project root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Directory name under the system temp dir that namespaces build output.
pub const BUILD_OUTPUT_DIR_NAME: &str = "build_do_proxywrapper";

/// Get the root path of the project checkout.
///
/// The tool installs into `<root>/build/`, so the root is the parent of the
/// directory containing this executable. May differ from the current working
/// directory, which the generate phase changes temporarily.
pub fn project_root_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate this executable")?;
    let tool_dir = exe
        .parent()
        .context("Executable path has no parent directory")?;
    let root = tool_dir
        .parent()
        .context("Executable directory has no parent directory")?;
    Ok(root.to_path_buf())
}

/// Directory containing the custom cmake include files for this project.
pub fn cmake_files_path(root_path: &Path) -> PathBuf {
    root_path.join("build").join("cmake")
}

/// The cmake toolchain file name for the given platform/arch/compiler.
pub fn cmake_toolchain_file_name(platform: &str, arch: &str, compiler: &str) -> String {
    format!("toolchain-{platform}-{arch}-{compiler}.cmake")
}

/// Full path to the cmake toolchain file for the given platform/arch/compiler.
pub fn cmake_toolchain_file_path(
    platform: &str,
    arch: &str,
    compiler: &str,
    root_path: &Path,
) -> PathBuf {
    cmake_files_path(root_path).join(cmake_toolchain_file_name(platform, arch, compiler))
}

/// Path to the toolchain file a vcpkg checkout provides.
pub fn vcpkg_toolchain_file_path(vcpkg_root: &Path) -> PathBuf {
    vcpkg_root
        .join("scripts")
        .join("buildsystems")
        .join("vcpkg.cmake")
}

/// Default build output directory for a flavor, under the system temp dir.
pub fn default_build_path(flavor: &str) -> PathBuf {
    std::env::temp_dir().join(BUILD_OUTPUT_DIR_NAME).join(flavor)
}
