// src/recipe/kitchen/cook.rs

//! Cook: one run of the recipe lifecycle in one working directory
//!
//! The steps are exposed individually because the packaging front end calls
//! them one at a time. Each step only relies on what the previous steps left
//! on disk, so a later step can run in a fresh process.

use super::cmake::{BuildConfiguration, CMakeBuild};
use super::inject::{self, BUILDINFO_FILE};
use super::system_deps::{self, Distro, PackageTool, SystemPackageInstaller};
use super::archive::extract_archive;
use super::Kitchen;
use crate::error::{Error, Result};
use crate::recipe::format::{InjectionMode, Recipe, SOURCES_DIR};
use crate::recipe::package_info::PackageInfo;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info};

/// CMake binary directory inside the working directory
pub const BUILD_DIR: &str = "build";

/// Install prefix inside the working directory
pub const PACKAGE_DIR: &str = "package";

/// Per-phase logs inside the build directory
pub const LOG_DIR: &str = "logs";

/// A single cook operation
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    recipe: &'a Recipe,
    workdir: PathBuf,
}

impl<'a> Cook<'a> {
    pub fn new(kitchen: &'a Kitchen, recipe: &'a Recipe, workdir: impl Into<PathBuf>) -> Self {
        Self {
            kitchen,
            recipe,
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.workdir.join(SOURCES_DIR)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.workdir.join(BUILD_DIR)
    }

    pub fn package_dir(&self) -> PathBuf {
        self.workdir.join(PACKAGE_DIR)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.build_dir().join(LOG_DIR)
    }

    /// Step 1: fetch, extract, rename to `sources/` and inject the build setup
    ///
    /// An existing `sources/` is only replaced when `force` is set.
    pub fn source(&self, force: bool) -> Result<PathBuf> {
        let sources_dir = self.sources_dir();

        if sources_dir.exists() && !force {
            return Err(Error::IoAt {
                action: "refusing to overwrite",
                path: sources_dir,
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "source tree already exists (use --force to re-extract)",
                ),
            });
        }

        // The old tree survives a failed fetch
        let archive = self.kitchen.fetch(self.recipe)?;

        if sources_dir.exists() {
            info!("Removing existing {}", sources_dir.display());
            fs::remove_dir_all(&sources_dir)
                .map_err(Error::io_at("failed to remove", &sources_dir))?;
        }

        fs::create_dir_all(&self.workdir).map_err(Error::io_at("failed to create", &self.workdir))?;

        // Extract next to the final location so the rename stays on one filesystem
        let staging = TempDir::new_in(&self.workdir)
            .map_err(Error::io_at("failed to create staging directory in", &self.workdir))?;
        extract_archive(&archive, staging.path())?;

        let extracted = staging.path().join(self.recipe.extracted_dir_name());
        if !extracted.is_dir() {
            return Err(Error::Extract {
                archive,
                message: format!(
                    "expected top-level directory '{}' in archive",
                    self.recipe.extracted_dir_name()
                ),
            });
        }

        fs::rename(&extracted, &sources_dir).map_err(Error::io_at("failed to rename", &extracted))?;
        info!(
            "Extracted {} to {}",
            self.recipe.extracted_dir_name(),
            sources_dir.display()
        );

        self.inject_build_setup()?;

        Ok(sources_dir)
    }

    /// Wire the build metadata into the top-level `CMakeLists.txt`
    pub fn inject_build_setup(&self) -> Result<()> {
        let cmakelists = self.sources_dir().join("CMakeLists.txt");
        match self.recipe.source.injection {
            InjectionMode::Rewrite => {
                inject::inject_into_file(&cmakelists, self.recipe.cmake_project_name())?;
            }
            InjectionMode::ProjectInclude => {
                debug!(
                    "Leaving {} untouched; setup is passed through CMAKE_PROJECT_{}_INCLUDE",
                    cmakelists.display(),
                    self.recipe.cmake_project_name()
                );
            }
        }
        Ok(())
    }

    /// Packages step 2 would install, or `None` when the target is not Linux
    pub fn planned_system_packages(&self) -> Result<Option<&'static [&'static str]>> {
        if !self.recipe.settings.os.is_linux() {
            return Ok(None);
        }
        let distro = self.kitchen.distro()?;
        Ok(system_deps::system_packages_for(&self.recipe.settings, &distro))
    }

    /// Step 2: install the native packages VTK needs
    ///
    /// Does nothing unless the target OS is Linux. Returns the packages that
    /// were newly installed.
    pub fn system_requirements(&self) -> Result<Vec<String>> {
        if !self.recipe.settings.os.is_linux() {
            info!(
                "No system requirements on {}",
                self.recipe.settings.os
            );
            return Ok(Vec::new());
        }

        let distro = self.kitchen.distro()?;
        let Some(packages) = system_deps::system_packages_for(&self.recipe.settings, &distro)
        else {
            return Ok(Vec::new());
        };
        info!("System requirements for {}: {}", distro, packages.join(", "));

        let installer = self.installer_for(&distro)?;
        let installed = system_deps::install_packages(installer.as_ref(), packages)?;

        if installed.is_empty() {
            info!("All system requirements already installed");
        }
        Ok(installed)
    }

    fn installer_for(&self, distro: &Distro) -> Result<Arc<dyn SystemPackageInstaller>> {
        if let Some(installer) = &self.kitchen.installer {
            return Ok(installer.clone());
        }
        let tool = PackageTool::for_distro(
            distro,
            self.kitchen.runner.clone(),
            self.kitchen.config.use_sudo,
        )?;
        Ok(Arc::new(tool))
    }

    /// The CMake build step 3 runs
    pub fn build_plan(&self) -> CMakeBuild {
        let config = &self.kitchen.config;
        let build_dir = self.build_dir();

        let mut extra_definitions = Vec::new();
        if self.recipe.source.injection == InjectionMode::ProjectInclude {
            extra_definitions.push((
                format!("CMAKE_PROJECT_{}_INCLUDE", self.recipe.cmake_project_name()),
                build_dir.join(BUILDINFO_FILE).display().to_string(),
            ));
        }

        CMakeBuild {
            cmake: config.cmake.clone(),
            source_dir: self.sources_dir(),
            build_dir,
            install_prefix: self.package_dir(),
            build_type: self.recipe.settings.build_type,
            generator: config.generator.clone(),
            jobs: config.jobs.max(1),
            configuration: BuildConfiguration::from_options(&self.recipe.options),
            extra_definitions,
        }
    }

    /// Step 3: write the build metadata and run configure, build and install
    ///
    /// The install prefix is emptied first, so a failed build leaves no
    /// package behind.
    pub fn build(&self) -> Result<()> {
        let sources_dir = self.sources_dir();
        if !sources_dir.is_dir() {
            return Err(Error::IoAt {
                action: "source tree missing at",
                path: sources_dir,
                source: io::Error::new(io::ErrorKind::NotFound, "run the source step first"),
            });
        }

        let build_dir = self.build_dir();
        let log_dir = self.log_dir();
        fs::create_dir_all(&log_dir).map_err(Error::io_at("failed to create", &log_dir))?;

        let generated = self.workdir.join(BUILDINFO_FILE);
        fs::write(&generated, inject::render_buildinfo(self.recipe))
            .map_err(Error::io_at("failed to write", &generated))?;
        let target = build_dir.join(BUILDINFO_FILE);
        if target.exists() {
            fs::remove_file(&target).map_err(Error::io_at("failed to remove", &target))?;
        }
        fs::rename(&generated, &target).map_err(Error::io_at("failed to move", &generated))?;
        debug!("Build metadata at {}", target.display());

        // Only this build's artifacts may end up in the published package
        let package_dir = self.package_dir();
        match fs::remove_dir_all(&package_dir) {
            Ok(()) => debug!("Cleared previous install at {}", package_dir.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io_at("failed to remove", &package_dir)(e)),
        }
        fs::create_dir_all(&package_dir).map_err(Error::io_at("failed to create", &package_dir))?;

        let plan = self.build_plan();
        for (key, value) in plan.configuration.iter() {
            debug!("  {} = {}", key, value);
        }
        plan.run_all(self.kitchen.runner.as_ref(), &log_dir)?;

        info!("Installed into {}", package_dir.display());
        Ok(())
    }

    /// Step 4: compute and publish the package metadata
    pub fn package_info(&self) -> Result<PackageInfo> {
        let info = PackageInfo::compute(self.recipe, &self.package_dir())?;
        info.write_json(&self.package_dir())?;
        Ok(info)
    }
}
