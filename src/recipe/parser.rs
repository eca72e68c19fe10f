// src/recipe/parser.rs

//! Configuration file parsing
//!
//! The configuration file is an optional TOML document that overrides parts of
//! the built-in recipe and the kitchen defaults. Every table and key is
//! optional; unknown keys are rejected so typos do not go unnoticed.

use crate::error::{Error, Result};
use crate::hash::Checksum;
use crate::recipe::format::{InjectionMode, Recipe, RecipeOptions};
use crate::recipe::kitchen::KitchenConfig;
use crate::settings::{BuildType, Os};
use crate::version::ReleaseVersion;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vtk-recipe.toml";

/// Parsed configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeConfig {
    #[serde(default)]
    pub package: PackageOverrides,
    #[serde(default)]
    pub source: SourceOverrides,
    /// Missing keys keep their defaults
    pub options: Option<RecipeOptions>,
    #[serde(default)]
    pub settings: SettingsOverrides,
    #[serde(default)]
    pub kitchen: KitchenOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageOverrides {
    pub version: Option<ReleaseVersion>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceOverrides {
    pub base_url: Option<String>,
    pub checksum: Option<String>,
    pub injection: Option<InjectionMode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsOverrides {
    pub os: Option<Os>,
    pub compiler: Option<String>,
    pub build_type: Option<String>,
    pub arch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitchenOverrides {
    pub source_cache: Option<PathBuf>,
    pub jobs: Option<u32>,
    pub generator: Option<String>,
    pub cmake: Option<PathBuf>,
    pub use_sudo: Option<bool>,
    /// Force a distribution id instead of reading `/etc/os-release`
    pub distro: Option<String>,
}

impl RecipeConfig {
    /// Apply the overrides on top of a recipe and kitchen configuration
    pub fn apply(&self, recipe: &mut Recipe, kitchen: &mut KitchenConfig) -> Result<()> {
        if let Some(version) = &self.package.version {
            recipe.package.version = version.clone();
        }

        if let Some(base_url) = &self.source.base_url {
            recipe.source.base_url = base_url.clone();
        }
        if let Some(checksum) = &self.source.checksum {
            recipe.source.checksum = Some(checksum.clone());
        }
        if let Some(injection) = self.source.injection {
            recipe.source.injection = injection;
        }

        if let Some(options) = self.options {
            recipe.options = options;
        }

        if let Some(os) = self.settings.os {
            recipe.settings.os = os;
        }
        if let Some(compiler) = &self.settings.compiler {
            recipe.settings.compiler = Some(compiler.clone());
        }
        if let Some(build_type) = &self.settings.build_type {
            recipe.settings.build_type = parse_build_type(build_type)?;
        }
        if let Some(arch) = &self.settings.arch {
            recipe.settings.arch = arch.clone();
        }

        if let Some(cache) = &self.kitchen.source_cache {
            kitchen.source_cache = cache.clone();
        }
        if let Some(jobs) = self.kitchen.jobs {
            kitchen.jobs = jobs;
        }
        if let Some(generator) = &self.kitchen.generator {
            kitchen.generator = Some(generator.clone());
        }
        if let Some(cmake) = &self.kitchen.cmake {
            kitchen.cmake = cmake.clone();
        }
        if let Some(use_sudo) = self.kitchen.use_sudo {
            kitchen.use_sudo = use_sudo;
        }
        if let Some(distro) = &self.kitchen.distro {
            kitchen.distro = Some(distro.clone());
        }

        Ok(())
    }
}

/// Parse a build type name, rejecting unknown values
pub fn parse_build_type(s: &str) -> Result<BuildType> {
    BuildType::parse(s).ok_or_else(|| {
        Error::Config(format!(
            "unknown build type '{s}' (expected Debug, Release, RelWithDebInfo or MinSizeRel)"
        ))
    })
}

/// Parse a configuration from a TOML string
pub fn parse_config(content: &str) -> Result<RecipeConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("invalid configuration: {e}")))
}

/// Parse a configuration from a file
pub fn parse_config_file(path: &Path) -> Result<RecipeConfig> {
    let content =
        std::fs::read_to_string(path).map_err(Error::io_at("failed to read config file", path))?;

    parse_config(&content)
}

/// Validate a recipe before any side effect happens
///
/// Returns warnings for things that are allowed but worth pointing out.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::Config("package name cannot be empty".to_string()));
    }

    if !recipe.source.base_url.starts_with("https://")
        && !recipe.source.base_url.starts_with("http://")
    {
        return Err(Error::Config(format!(
            "source base_url must be an http(s) URL: {}",
            recipe.source.base_url
        )));
    }

    match &recipe.source.checksum {
        Some(checksum) => {
            Checksum::parse(checksum)?;
        }
        None => warnings.push(format!(
            "No checksum configured for {}; the download will not be verified",
            recipe.archive_filename()
        )),
    }

    if recipe.source.base_url.starts_with("http://") {
        warnings.push("Source base_url uses plain http".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.package.version.is_none());
        assert!(config.options.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[package]
version = "9.2.6"

[source]
base_url = "https://mirror.example.org/vtk"
injection = "project-include"

[options]
shared = true
with_web = false

[settings]
build_type = "relwithdebinfo"
compiler = "clang"

[kitchen]
jobs = 3
generator = "Ninja"
use_sudo = false
distro = "arch"
"#;

        let config = parse_config(content).unwrap();
        let mut recipe = Recipe::vtk_with_settings(Settings::host());
        let mut kitchen = KitchenConfig::default();
        config.apply(&mut recipe, &mut kitchen).unwrap();

        assert_eq!(recipe.package.version.as_str(), "9.2.6");
        assert_eq!(recipe.source.base_url, "https://mirror.example.org/vtk");
        assert_eq!(recipe.source.injection, InjectionMode::ProjectInclude);
        assert!(recipe.options.shared);
        assert!(recipe.options.with_python);
        assert!(!recipe.options.with_web);
        assert_eq!(recipe.settings.build_type, BuildType::RelWithDebInfo);
        assert_eq!(recipe.settings.compiler.as_deref(), Some("clang"));
        assert_eq!(kitchen.jobs, 3);
        assert_eq!(kitchen.generator.as_deref(), Some("Ninja"));
        assert!(!kitchen.use_sudo);
        assert_eq!(kitchen.distro.as_deref(), Some("arch"));
    }

    #[test]
    fn test_reject_unknown_key() {
        assert!(parse_config("[options]\nwith_java = true\n").is_err());
        assert!(parse_config("[packge]\nversion = \"9.1.0\"\n").is_err());
    }

    #[test]
    fn test_reject_short_version() {
        assert!(parse_config("[package]\nversion = \"9.1\"\n").is_err());
    }

    #[test]
    fn test_reject_unknown_build_type() {
        let config = parse_config("[settings]\nbuild_type = \"Fastest\"\n").unwrap();
        let mut recipe = Recipe::vtk();
        let mut kitchen = KitchenConfig::default();
        assert!(config.apply(&mut recipe, &mut kitchen).is_err());
    }

    #[test]
    fn test_validate_warns_without_checksum() {
        let recipe = Recipe::vtk();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("checksum")));
    }

    #[test]
    fn test_validate_bad_checksum() {
        let mut recipe = Recipe::vtk();
        recipe.source.checksum = Some("md5:abc123".to_string());
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_url() {
        let mut recipe = Recipe::vtk();
        recipe.source.base_url = "ftp://example.org".to_string();
        assert!(validate_recipe(&recipe).is_err());
    }
}
