// src/commands/mod.rs
//! Command handlers for the vtk-recipe CLI

mod build;
mod cook;
mod imports;
mod package_info;
mod source;
mod system;

pub use build::cmd_build;
pub use cook::cmd_cook;
pub use imports::cmd_imports;
pub use package_info::cmd_package_info;
pub use source::cmd_source;
pub use system::cmd_system_requirements;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use vtk_recipe::recipe::parser::{parse_build_type, parse_config_file, DEFAULT_CONFIG_FILE};
use vtk_recipe::recipe::validate_recipe;
use vtk_recipe::{KitchenConfig, Recipe, ReleaseVersion};

/// Command-line overrides, applied on top of the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub version: Option<String>,
    pub shared: bool,
    pub without_python: bool,
    pub without_web: bool,
    pub build_type: Option<String>,
    pub jobs: Option<u32>,
    pub generator: Option<String>,
    pub no_sudo: bool,
}

/// Everything a command needs to run a lifecycle step
pub struct RecipeContext {
    pub recipe: Recipe,
    pub kitchen: KitchenConfig,
    pub workdir: PathBuf,
}

/// Build the recipe and kitchen configuration for a command
///
/// Precedence is command line, then configuration file, then defaults.
/// The result is validated before any step touches the disk or network.
pub fn load_context(
    config_path: Option<&Path>,
    workdir: &Path,
    overrides: &Overrides,
) -> Result<RecipeContext> {
    let mut recipe = Recipe::vtk();
    let mut kitchen = KitchenConfig::default();

    let config_path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = workdir.join(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    };

    if let Some(path) = &config_path {
        debug!("Reading configuration from {}", path.display());
        let config = parse_config_file(path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?;
        config
            .apply(&mut recipe, &mut kitchen)
            .with_context(|| format!("Invalid configuration: {}", path.display()))?;
    }

    if let Some(version) = &overrides.version {
        recipe.package.version = ReleaseVersion::parse(version)?;
    }
    if overrides.shared {
        recipe.options.shared = true;
    }
    if overrides.without_python {
        recipe.options.with_python = false;
    }
    if overrides.without_web {
        recipe.options.with_web = false;
    }
    if let Some(build_type) = &overrides.build_type {
        recipe.settings.build_type = parse_build_type(build_type)?;
    }
    if let Some(jobs) = overrides.jobs {
        kitchen.jobs = jobs;
    }
    if let Some(generator) = &overrides.generator {
        kitchen.generator = Some(generator.clone());
    }
    if overrides.no_sudo {
        kitchen.use_sudo = false;
    }

    let warnings = validate_recipe(&recipe).context("Recipe validation failed")?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok(RecipeContext {
        recipe,
        kitchen,
        workdir: workdir.to_path_buf(),
    })
}
