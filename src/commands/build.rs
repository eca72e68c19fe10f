// src/commands/build.rs

//! Build command - CMake configure, build and install

use super::{load_context, Overrides};
use anyhow::{Context, Result};
use std::path::Path;
use vtk_recipe::Kitchen;
use vtk_recipe::recipe::kitchen::Phase;

/// Build and install the prepared sources
pub fn cmd_build(config: Option<&Path>, workdir: &Path, overrides: &Overrides, dry_run: bool) -> Result<()> {
    let ctx = load_context(config, workdir, overrides)?;
    let kitchen = Kitchen::new(ctx.kitchen);
    let cook = kitchen.cook_in(&ctx.recipe, &ctx.workdir);

    if dry_run {
        let plan = cook.build_plan();
        println!("Build configuration:");
        for (key, value) in plan.configuration.iter() {
            println!("  {} = {}", key, value);
        }
        println!("\nCommands:");
        for phase in [Phase::Configure, Phase::Build, Phase::Install] {
            println!("  {}", plan.command(phase).display());
        }
        return Ok(());
    }

    println!(
        "Building {} {} ({}, {} jobs)...",
        ctx.recipe.package.name,
        ctx.recipe.package.version,
        ctx.recipe.settings.build_type,
        kitchen.config().jobs
    );

    cook.build().with_context(|| {
        format!("Build failed; full logs are in {}", cook.log_dir().display())
    })?;

    println!("\n[COMPLETE] Installed into {}", cook.package_dir().display());
    Ok(())
}
