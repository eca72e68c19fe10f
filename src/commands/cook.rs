// src/commands/cook.rs

//! Cook command - run the whole lifecycle

use super::{load_context, Overrides};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use vtk_recipe::Kitchen;

/// Run source, system requirements, build and package info in order
pub fn cmd_cook(config: Option<&Path>, workdir: &Path, overrides: &Overrides, force: bool) -> Result<()> {
    let ctx = load_context(config, workdir, overrides)?;
    let recipe = &ctx.recipe;

    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);
    println!(
        "Options: shared={} with_python={} with_web={}",
        recipe.options.shared, recipe.options.with_python, recipe.options.with_web
    );
    println!("Cooking with {} parallel jobs...", ctx.kitchen.jobs);

    let kitchen = Kitchen::new(ctx.kitchen.clone());
    let result = kitchen
        .cook(recipe, &ctx.workdir, force)
        .with_context(|| format!("Failed to cook {}", recipe.package.name))?;

    if !result.installed_packages.is_empty() {
        println!("\nInstalled system packages:");
        for package in &result.installed_packages {
            println!("  - {}", package);
        }
    }

    println!(
        "\n[COMPLETE] Cooked {} {}: {} libraries, include dir {}",
        result.package_info.name,
        result.package_info.version,
        result.package_info.libs.len(),
        result.package_info.include_dirs.join(", ")
    );

    info!(
        "Successfully cooked {} in {}",
        recipe.package.name,
        ctx.workdir.display()
    );
    Ok(())
}
