//! Linux platform variant
//!
//! Always generates makefiles; the compiler choice flows through a
//! project-local toolchain file chain-loaded after the vcpkg one. Arm cross
//! builds can point ZLIB_ROOT_DIR at a cross-compiled zlib.

use std::path::Path;

use crate::build::BuildConfig;
use crate::utils::{env, paths};

pub fn generator() -> &'static str {
    "Unix Makefiles"
}

pub fn generate_options(config: &BuildConfig, vcpkg_root: &Path) -> Vec<String> {
    let toolchain_file = paths::cmake_toolchain_file_path(
        &config.platform.to_string(),
        &config.arch.to_string(),
        &config.compiler.to_string(),
        &config.project_root,
    );
    let mut options = vec![
        format!(
            "-DCMAKE_TOOLCHAIN_FILE={}",
            paths::vcpkg_toolchain_file_path(vcpkg_root).display()
        ),
        format!(
            "-DVCPKG_CHAINLOAD_TOOLCHAIN_FILE={}",
            toolchain_file.display()
        ),
    ];
    if config.arch.is_arm() {
        if let Some(zlib_dir) = env::get_env_var("ZLIB_ROOT_DIR") {
            options.push(format!("-DZLIB_ROOT={zlib_dir}"));
        }
    }
    options
}
