//! Host environment probing
//!
//! Pure read-only queries against the process environment. The host OS
//! identity can be overridden with the `AGENT_OS` variable, which CI agents
//! set; local runs fall back to the compiled-in platform identifier.

/// Get an environment variable's value, or `None` if unset.
///
/// Names are looked up uppercased, so callers may pass any casing.
pub fn get_env_var(name: &str) -> Option<String> {
    std::env::var(name.to_uppercase()).ok()
}

/// The lowercased OS identifier for the current host.
///
/// Prefers the `AGENT_OS` override; otherwise reports the runtime platform,
/// normalized to the conventional `windows`/`linux`/`darwin` identifiers.
pub fn os_name() -> String {
    if let Some(agent_os) = get_env_var("AGENT_OS") {
        return agent_os.to_lowercase();
    }
    match std::env::consts::OS {
        "macos" => "darwin".to_string(),
        other => other.to_string(),
    }
}

/// True iff this process is running on a Windows agent/machine.
pub fn is_running_on_windows() -> bool {
    os_name().starts_with("win")
}

/// True iff this process is running on a Linux agent/machine.
pub fn is_running_on_linux() -> bool {
    os_name().starts_with("linux")
}

/// True iff this process is running on a macOS agent/machine.
pub fn is_running_on_osx() -> bool {
    os_name().starts_with("darwin")
}
