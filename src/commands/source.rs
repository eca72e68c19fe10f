// src/commands/source.rs

//! Source command - fetch, extract and patch the VTK sources

use super::{load_context, Overrides};
use anyhow::{Context, Result};
use std::path::Path;
use vtk_recipe::Kitchen;

/// Fetch and prepare the source tree in the working directory
pub fn cmd_source(config: Option<&Path>, workdir: &Path, overrides: &Overrides, force: bool) -> Result<()> {
    let ctx = load_context(config, workdir, overrides)?;
    let kitchen = Kitchen::new(ctx.kitchen);
    let recipe = &ctx.recipe;

    println!("Source: {}", recipe.archive_url());

    let sources = kitchen
        .cook_in(recipe, &ctx.workdir)
        .source(force)
        .with_context(|| format!("Failed to prepare sources for {} {}", recipe.package.name, recipe.package.version))?;

    println!("\n[COMPLETE] Sources ready: {}", sources.display());
    Ok(())
}
