// src/recipe/format.rs

//! Recipe definition for the Visualization Toolkit
//!
//! The recipe is a fixed description of one package. Only the version, the
//! source location, the option set and the platform settings can be changed,
//! either from the configuration file or from the command line.

use crate::settings::Settings;
use crate::version::ReleaseVersion;
use serde::{Deserialize, Serialize};

/// Default location of VTK release tarballs
pub const DEFAULT_BASE_URL: &str = "https://www.vtk.org/files/release";

/// Version the recipe is written for
pub const DEFAULT_VERSION: &str = "9.1.0";

/// Canonical name of the extracted source tree
pub const SOURCES_DIR: &str = "sources";

/// A complete recipe for building the package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Where and how to obtain the sources
    pub source: SourceSection,

    /// Build-time feature options
    pub options: RecipeOptions,

    /// Target platform descriptor
    pub settings: Settings,
}

/// Identifying metadata, immutable for the life of the recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    pub name: String,
    pub version: ReleaseVersion,
    pub license: String,
    pub homepage: String,
    /// Recipe repository
    pub url: String,
    pub author: String,
    pub description: String,
}

/// Source archive location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Release directory root; `<X.Y>/<stem>-<version>.tar.gz` is appended
    pub base_url: String,
    /// Archive and top-level directory prefix used upstream
    pub archive_stem: String,
    /// Optional `sha256:<hex>` of the archive
    pub checksum: Option<String>,
    /// How the build metadata is wired into the upstream build
    pub injection: InjectionMode,
}

/// How the generated build metadata reaches the upstream CMake project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionMode {
    /// Rewrite the top-level `CMakeLists.txt` after the `project()` call
    #[default]
    Rewrite,
    /// Leave upstream files untouched and pass `CMAKE_PROJECT_<name>_INCLUDE`
    ProjectInclude,
}

/// The option set
///
/// Defaults are declared here and nowhere else; a build receives its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipeOptions {
    /// Build shared libraries instead of static ones
    pub shared: bool,
    /// Generate the Python wrappers
    pub with_python: bool,
    /// Enable the Web module group (WebCore, WebGLExporter)
    pub with_web: bool,
}

impl Default for RecipeOptions {
    fn default() -> Self {
        Self {
            shared: false,
            with_python: true,
            with_web: true,
        }
    }
}

impl Recipe {
    /// The VTK recipe at its default version, targeting the host
    pub fn vtk() -> Self {
        Self::vtk_with_settings(Settings::host())
    }

    /// The VTK recipe at its default version, for the given settings
    pub fn vtk_with_settings(settings: Settings) -> Self {
        Self {
            package: PackageSection {
                name: "vtk".to_string(),
                version: ReleaseVersion::new_unchecked(9, 1, DEFAULT_VERSION),
                license: "BSD license".to_string(),
                homepage: "https://www.vtk.org/".to_string(),
                url: "https://github.com/darcamo/conan-vtk".to_string(),
                author: "Darlan Cavalcante Moreira (darcamo@gmail.com)".to_string(),
                description: "The Visualization Toolkit (VTK) is an open-source, freely \
                    available software system for 3D computer graphics, image processing, \
                    and visualization."
                    .to_string(),
            },
            source: SourceSection {
                base_url: DEFAULT_BASE_URL.to_string(),
                archive_stem: "VTK".to_string(),
                checksum: None,
                injection: InjectionMode::default(),
            },
            options: RecipeOptions::default(),
            settings,
        }
    }

    /// Name of the downloaded tarball, e.g. `VTK-9.1.0.tar.gz`
    pub fn archive_filename(&self) -> String {
        format!("{}.tar.gz", self.extracted_dir_name())
    }

    /// Top-level directory inside the tarball, e.g. `VTK-9.1.0`
    pub fn extracted_dir_name(&self) -> String {
        format!("{}-{}", self.source.archive_stem, self.package.version)
    }

    /// Download URL; only the `X.Y` series names the release directory
    pub fn archive_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.source.base_url.trim_end_matches('/'),
            self.package.version.major_minor(),
            self.archive_filename()
        )
    }

    /// Include directory relative to the package root, e.g. `include/vtk-9.1`
    pub fn include_dir(&self) -> String {
        format!(
            "include/{}-{}",
            self.package.name,
            self.package.version.major_minor()
        )
    }

    /// Name the upstream project uses in its `project()` call
    pub fn cmake_project_name(&self) -> &str {
        &self.source.archive_stem
    }
}
