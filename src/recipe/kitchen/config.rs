// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::recipe::package_info::PackageInfo;
use std::path::PathBuf;

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Directory for downloaded source archives
    pub source_cache: PathBuf,
    /// Number of parallel compile jobs
    pub jobs: u32,
    /// CMake generator (`-G`); CMake picks its default when unset
    pub generator: Option<String>,
    /// CMake executable
    pub cmake: PathBuf,
    /// Prefix package manager commands with `sudo` when not running as root
    pub use_sudo: bool,
    /// Distribution id override (normally read from `/etc/os-release`)
    pub distro: Option<String>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        let source_cache = dirs::cache_dir()
            .map(|d| d.join("vtk-recipe").join("sources"))
            .unwrap_or_else(|| PathBuf::from(".vtk-recipe-cache"));

        Self {
            source_cache,
            jobs,
            generator: None,
            cmake: PathBuf::from("cmake"),
            use_sudo: true,
            distro: None,
        }
    }
}

/// Result of cooking the recipe end to end
#[derive(Debug)]
pub struct CookResult {
    /// Patched source tree
    pub sources_dir: PathBuf,
    /// System packages installed by this run
    pub installed_packages: Vec<String>,
    /// Where the per-phase CMake logs were written
    pub log_dir: PathBuf,
    /// Published package metadata
    pub package_info: PackageInfo,
}
