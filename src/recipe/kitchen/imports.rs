// src/recipe/kitchen/imports.rs

//! Copying runtime libraries out of an installed package
//!
//! Consumers that link against a shared build need the DLLs next to their
//! executables on Windows and the dylibs in their library folder on macOS.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// (source folder, destination folder, filename predicate)
type ImportRule = (&'static str, &'static str, fn(&str) -> bool);

fn is_dll(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".dll")
}

/// `libfoo.dylib` as well as versioned `libfoo.9.1.dylib` / `libfoo.dylib.1`
fn is_dylib(name: &str) -> bool {
    name.contains(".dylib")
}

const RULES: &[ImportRule] = &[("bin", "bin", is_dll), ("lib", "lib", is_dylib)];

/// Copy runtime libraries from `package_dir` into `dest`
///
/// `bin/*.dll` goes to `<dest>/bin` and `lib/*.dylib*` to `<dest>/lib`.
/// Missing source folders are skipped. Returns the copied files in their
/// destination, sorted.
pub fn import_runtime_libraries(package_dir: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let mut copied = Vec::new();

    for (src_folder, dest_folder, matches) in RULES {
        let src = package_dir.join(src_folder);
        if !src.is_dir() {
            debug!("No {} folder in {}, skipping", src_folder, package_dir.display());
            continue;
        }

        let mut names: Vec<String> = Vec::new();
        for entry in fs::read_dir(&src).map_err(Error::io_at("failed to read", &src))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && matches(name)
            {
                names.push(name.to_string());
            }
        }
        names.sort();

        if names.is_empty() {
            continue;
        }

        let target_dir = dest.join(dest_folder);
        fs::create_dir_all(&target_dir).map_err(Error::io_at("failed to create", &target_dir))?;

        for name in names {
            let from = src.join(&name);
            let to = target_dir.join(&name);
            fs::copy(&from, &to).map_err(Error::io_at("failed to copy", &from))?;
            copied.push(to);
        }
    }

    info!("Imported {} runtime file(s) into {}", copied.len(), dest.display());
    Ok(copied)
}
