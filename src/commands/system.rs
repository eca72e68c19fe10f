// src/commands/system.rs

//! System requirements command - native packages for the build

use super::{load_context, Overrides};
use anyhow::{Context, Result};
use std::path::Path;
use vtk_recipe::Kitchen;

/// Install (or, with `dry_run`, list) the native packages VTK needs
pub fn cmd_system_requirements(
    config: Option<&Path>,
    workdir: &Path,
    overrides: &Overrides,
    dry_run: bool,
) -> Result<()> {
    let ctx = load_context(config, workdir, overrides)?;
    let kitchen = Kitchen::new(ctx.kitchen);
    let cook = kitchen.cook_in(&ctx.recipe, &ctx.workdir);

    if dry_run {
        match cook
            .planned_system_packages()
            .context("Failed to determine the distribution")?
        {
            Some(packages) => {
                println!("System packages for {}:", kitchen.distro()?);
                for package in packages {
                    println!("  - {}", package);
                }
            }
            None => println!("No system packages needed on {}", ctx.recipe.settings.os),
        }
        return Ok(());
    }

    let installed = cook
        .system_requirements()
        .context("Failed to install system requirements")?;

    if installed.is_empty() {
        println!("[OK] System requirements satisfied");
    } else {
        println!("\n[COMPLETE] Installed {} package(s):", installed.len());
        for package in &installed {
            println!("  - {}", package);
        }
    }
    Ok(())
}
