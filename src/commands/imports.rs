// src/commands/imports.rs

//! Imports command - copy runtime libraries to a consumer

use anyhow::{Context, Result};
use std::path::Path;
use vtk_recipe::recipe::kitchen::{import_runtime_libraries, PACKAGE_DIR};

/// Copy the installed DLLs and dylibs into `dest`
pub fn cmd_imports(workdir: &Path, dest: &Path) -> Result<()> {
    let package_dir = workdir.join(PACKAGE_DIR);
    let copied = import_runtime_libraries(&package_dir, dest).with_context(|| {
        format!("Failed to import runtime libraries from {}", package_dir.display())
    })?;

    if copied.is_empty() {
        println!("No runtime libraries to import");
        return Ok(());
    }

    println!("[COMPLETE] Imported {} file(s):", copied.len());
    for path in &copied {
        println!("  - {}", path.display());
    }
    Ok(())
}
