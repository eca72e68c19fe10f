// src/commands/package_info.rs

//! Package info command - publish metadata for consumers

use super::{load_context, Overrides};
use anyhow::{Context, Result};
use std::path::Path;
use vtk_recipe::Kitchen;

/// Compute, write and print the package metadata
pub fn cmd_package_info(config: Option<&Path>, workdir: &Path, overrides: &Overrides, json: bool) -> Result<()> {
    let ctx = load_context(config, workdir, overrides)?;
    let kitchen = Kitchen::new(ctx.kitchen);
    let cook = kitchen.cook_in(&ctx.recipe, &ctx.workdir);

    let info = cook
        .package_info()
        .context("Failed to collect package info")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Package: {} {}", info.name, info.version);
    println!("Include dirs: {}", info.include_dirs.join(", "));
    println!("Lib dirs: {}", info.lib_dirs.join(", "));
    println!("Bin dirs: {}", info.bin_dirs.join(", "));
    println!("Libraries ({}):", info.libs.len());
    for lib in &info.libs {
        println!("  {}", lib);
    }
    println!("Defines:");
    for define in &info.defines {
        println!("  {}", define);
    }
    Ok(())
}
