use crate::types::PlatformOs;
use std::path::PathBuf;

pub const HOME_VARS: [&str; 2] = ["HOME", "USERPROFILE"];

pub fn detect_operating_system() -> PlatformOs {
    platform_os_from(std::env::consts::OS)
}

fn platform_os_from(os: &str) -> PlatformOs {
    match os {
        "macos" => PlatformOs::Mac,
        "windows" => PlatformOs::Windows,
        "linux" => PlatformOs::Linux,
        _ => PlatformOs::Unknown,
    }
}

/// Resolve the user's home directory from the environment.
///
/// `HOME` is checked first and `USERPROFILE` is the Windows fallback. Empty
/// values count as unset.
pub fn resolve_home_dir() -> Option<PathBuf> {
    home_dir_from(|var| std::env::var(var).ok())
}

pub fn home_dir_from<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let home = HOME_VARS
        .iter()
        .filter_map(|&var| lookup(var))
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from);
    tracing::trace!("Resolved home directory: {:?}", home);
    home
}
