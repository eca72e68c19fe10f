// src/recipe/package_info.rs

//! Package metadata published to consumers after installation
//!
//! Consumers need the library names to link, the include directory and the
//! auto-init preprocessor defines that register VTK's OpenGL2 rendering
//! backends.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the published metadata inside the install prefix
pub const PACKAGE_INFO_FILE: &str = "package-info.json";

/// Library folders scanned under the install prefix
const LIB_SCAN_DIRS: &[&str] = &["lib", "lib64"];

/// Object-factory auto-initialisation defines, emitted verbatim in this order
pub const AUTOINIT_DEFINES: [&str; 6] = [
    "vtkDomainsChemistry_AUTOINIT=1(vtkDomainsChemistryOpenGL2)",
    "vtkIOExport_AUTOINIT=1(vtkIOExportOpenGL2)",
    "vtkRenderingContext2D_AUTOINIT=1(vtkRenderingContextOpenGL2)",
    "vtkRenderingCore_AUTOINIT=3(vtkInteractionStyle,vtkRenderingFreeType,vtkRenderingOpenGL2)",
    "vtkRenderingOpenGL2_AUTOINIT=1(vtkRenderingGL2PSOpenGL2)",
    "vtkRenderingVolume_AUTOINIT=1(vtkRenderingVolumeOpenGL2)",
];

/// Metadata describing an installed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub settings: Settings,
    /// Link names, without `lib` prefix or extension
    pub libs: Vec<String>,
    /// Relative to the package root
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
    pub defines: Vec<String>,
}

impl PackageInfo {
    /// Compute the metadata for a recipe installed into `package_dir`
    ///
    /// Fails with [`Error::ArtifactsMissing`] if the install produced no
    /// libraries at all.
    pub fn compute(recipe: &Recipe, package_dir: &Path) -> Result<Self> {
        let libs = collect_libs(package_dir)?;
        if libs.is_empty() {
            return Err(Error::ArtifactsMissing {
                dir: package_dir.join("lib"),
            });
        }
        debug!("Collected {} libraries from {}", libs.len(), package_dir.display());

        Ok(Self {
            name: recipe.package.name.clone(),
            version: recipe.package.version.to_string(),
            settings: recipe.settings.clone(),
            libs,
            include_dirs: vec![recipe.include_dir()],
            lib_dirs: vec!["lib".to_string()],
            bin_dirs: vec!["bin".to_string()],
            defines: AUTOINIT_DEFINES.iter().map(|d| d.to_string()).collect(),
        })
    }

    /// Write the metadata as pretty JSON into `package_dir`
    pub fn write_json(&self, package_dir: &Path) -> Result<PathBuf> {
        let path = package_dir.join(PACKAGE_INFO_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(Error::io_at("failed to write", &path))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Load previously published metadata from `package_dir`
    pub fn load(package_dir: &Path) -> Result<Self> {
        let path = package_dir.join(PACKAGE_INFO_FILE);
        let content = fs::read_to_string(&path).map_err(Error::io_at("failed to read", &path))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Link name for a library file, or `None` if it is not a library
///
/// Versioned shared objects (`libfoo.so.1`) map to the same name as their
/// unversioned link (`libfoo.so`).
pub fn library_name(filename: &str) -> Option<String> {
    let (stem, strip_prefix) = if let Some(stem) = filename.strip_suffix(".dll.a") {
        (stem, true)
    } else if let Some(stem) = filename.strip_suffix(".lib") {
        (stem, false)
    } else if let Some(stem) = filename.strip_suffix(".a") {
        (stem, true)
    } else if let Some(stem) = filename.strip_suffix(".dylib") {
        (stem, true)
    } else if let Some(idx) = filename.rfind(".so")
        && is_so_suffix(&filename[idx + 3..])
    {
        (&filename[..idx], true)
    } else {
        return None;
    };

    let name = if strip_prefix {
        stem.strip_prefix("lib").unwrap_or(stem)
    } else {
        stem
    };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// `""` or `.1`, `.1.2.3`...
fn is_so_suffix(rest: &str) -> bool {
    rest.is_empty()
        || rest
            .strip_prefix('.')
            .is_some_and(|v| v.split('.').all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())))
}

/// Whether `name` is `base` followed by a numeric version suffix
fn is_versioned_alias(name: &str, base: &str) -> bool {
    name.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|v| v.split('.').all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())))
}

/// Collect link names from the library folders of an install prefix
///
/// Sorted and de-duplicated. Versioned dylib names (`libfoo.1.dylib`) are
/// dropped when the unversioned one is also present.
pub fn collect_libs(package_dir: &Path) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();

    for folder in LIB_SCAN_DIRS {
        let dir = package_dir.join(folder);
        if !dir.is_dir() {
            continue;
        }

        for entry in fs::read_dir(&dir).map_err(Error::io_at("failed to read", &dir))? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str().and_then(library_name) {
                names.insert(name);
            }
        }
    }

    let libs = names
        .iter()
        .filter(|name| !names.iter().any(|base| is_versioned_alias(name, base)))
        .cloned()
        .collect();
    Ok(libs)
}
