// src/recipe/kitchen/mod.rs

//! Kitchen: where the recipe is cooked
//!
//! The Kitchen holds the configuration and the seams to the outside world
//! (subprocesses and the system package manager). A [`Cook`] runs the
//! lifecycle for one working directory:
//! - source: fetch, extract, rename and inject the build setup
//! - system requirements: install native packages (Linux only)
//! - build: CMake configure, build and install
//! - package info: publish libraries, include dirs and defines

mod archive;
pub mod cmake;
mod config;
mod cook;
pub mod imports;
pub mod inject;
pub mod runner;
pub mod system_deps;

pub use cmake::{BuildConfiguration, CMakeBuild, ModuleEnable, Phase};
pub use config::{CookResult, KitchenConfig};
pub use cook::{Cook, BUILD_DIR, LOG_DIR, PACKAGE_DIR};
pub use imports::import_runtime_libraries;
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use system_deps::{Distro, PackageManager, PackageTool, SystemPackageInstaller};

use crate::error::{Error, Result};
use crate::hash::Checksum;
use crate::recipe::format::Recipe;
use archive::download_file;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    pub(crate) runner: Arc<dyn CommandRunner>,
    /// Overrides the package manager picked from the distribution
    pub(crate) installer: Option<Arc<dyn SystemPackageInstaller>>,
}

impl Kitchen {
    /// Create a new Kitchen that runs real processes
    pub fn new(config: KitchenConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    /// Create a new Kitchen with a custom command runner
    pub fn with_runner(config: KitchenConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            runner,
            installer: None,
        }
    }

    /// Set the system package installer
    pub fn set_installer(&mut self, installer: Arc<dyn SystemPackageInstaller>) {
        self.installer = Some(installer);
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Start a cook in `workdir`
    pub fn cook_in<'a>(&'a self, recipe: &'a Recipe, workdir: &Path) -> Cook<'a> {
        Cook::new(self, recipe, workdir)
    }

    /// The distribution family of the host, honouring the configured override
    pub fn distro(&self) -> Result<Distro> {
        match &self.config.distro {
            Some(id) => Ok(Distro::from_id(id)),
            None => Distro::detect(),
        }
    }

    /// Cook the recipe end to end in `workdir`
    ///
    /// Runs source, system requirements, build and package info strictly in
    /// order; the first failure ends the run.
    pub fn cook(&self, recipe: &Recipe, workdir: &Path, force: bool) -> Result<CookResult> {
        info!(
            "Cooking {} version {}",
            recipe.package.name, recipe.package.version
        );

        let cook = self.cook_in(recipe, workdir);

        info!("Fetching and patching sources...");
        let sources_dir = cook.source(force)?;

        info!("Checking system requirements...");
        let installed_packages = cook.system_requirements()?;

        info!("Building...");
        cook.build()?;

        info!("Publishing package info...");
        let package_info = cook.package_info()?;

        Ok(CookResult {
            sources_dir,
            installed_packages,
            log_dir: cook.log_dir(),
            package_info,
        })
    }

    /// Fetch the source archive into the source cache
    ///
    /// A cached archive is reused when it still matches the configured
    /// checksum (or when no checksum is configured). A download that does not
    /// match is removed before the error is returned.
    pub fn fetch(&self, recipe: &Recipe) -> Result<PathBuf> {
        let checksum = recipe
            .source
            .checksum
            .as_deref()
            .map(Checksum::parse)
            .transpose()?;

        let cache = &self.config.source_cache;
        fs::create_dir_all(cache).map_err(Error::io_at("failed to create", cache))?;
        let cached = cache.join(recipe.archive_filename());

        if cached.exists() {
            match &checksum {
                None => {
                    debug!("Using cached {}", cached.display());
                    return Ok(cached);
                }
                Some(expected) => match expected.verify_file(&cached) {
                    Ok(()) => {
                        debug!("Using cached {} (checksum ok)", cached.display());
                        return Ok(cached);
                    }
                    Err(e) => {
                        warn!("Discarding cached {}: {}", cached.display(), e);
                        fs::remove_file(&cached).map_err(Error::io_at("failed to remove", &cached))?;
                    }
                },
            }
        }

        let url = recipe.archive_url();
        let partial = cache.join(format!("{}.part", recipe.archive_filename()));
        if let Err(e) = download_file(&url, &partial) {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        if let Some(expected) = &checksum
            && let Err(e) = expected.verify_file(&partial)
        {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        fs::rename(&partial, &cached).map_err(Error::io_at("failed to rename", &partial))?;
        info!("Cached {}", cached.display());
        Ok(cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256_file;
    use crate::recipe::format::InjectionMode;
    use crate::settings::{Os, Settings};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::sync::Mutex;
    use crate::recipe::kitchen::system_deps::tests::MockInstaller;

    /// Runner that records commands and fakes a successful install
    struct FakeCmake {
        calls: Mutex<Vec<CommandSpec>>,
        fail_phase: Option<&'static str>,
    }

    impl FakeCmake {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_phase: None,
            }
        }
    }

    impl CommandRunner for FakeCmake {
        fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
            self.calls.lock().unwrap().push(spec.clone());
            let phase = spec.args.first().map(String::as_str).unwrap_or("");
            if Some(phase) == self.fail_phase {
                return Ok(CommandOutput {
                    success: false,
                    code: Some(2),
                    stdout: String::new(),
                    stderr: "make: *** [all] Error 2\n".to_string(),
                });
            }
            if phase == "--install" {
                let prefix = spec.cwd.as_ref().unwrap().parent().unwrap().join(PACKAGE_DIR);
                fs::create_dir_all(prefix.join("lib")).unwrap();
                fs::write(prefix.join("lib/libvtkCommonCore-9.1.a"), b"").unwrap();
            }
            Ok(CommandOutput {
                success: true,
                code: Some(0),
                stdout: format!("ran {}\n", spec.display()),
                stderr: String::new(),
            })
        }

        fn program_exists(&self, _program: &str) -> bool {
            true
        }
    }

    fn seed_cache(cache: &Path, recipe: &Recipe, cmakelists: &str) -> PathBuf {
        fs::create_dir_all(cache).unwrap();
        let path = cache.join(recipe.archive_filename());
        let encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::fast());
        let mut builder = tar::Builder::new(encoder);
        let mut header = tar::Header::new_gnu();
        header.set_size(cmakelists.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("{}/CMakeLists.txt", recipe.extracted_dir_name()),
                cmakelists.as_bytes(),
            )
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();
        path
    }

    fn kitchen(cache: &Path, runner: Arc<dyn CommandRunner>) -> Kitchen {
        let config = KitchenConfig {
            source_cache: cache.to_path_buf(),
            jobs: 2,
            distro: Some("ubuntu".to_string()),
            ..Default::default()
        };
        Kitchen::with_runner(config, runner)
    }

    fn linux_recipe() -> Recipe {
        Recipe::vtk_with_settings(Settings {
            os: Os::Linux,
            ..Settings::host()
        })
    }

    #[test]
    fn test_fetch_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let mut recipe = linux_recipe();
        let seeded = seed_cache(&cache, &recipe, "project(VTK)\n");
        recipe.source.checksum = Some(format!("sha256:{}", sha256_file(&seeded).unwrap()));

        let kitchen = kitchen(&cache, Arc::new(FakeCmake::new()));
        assert_eq!(kitchen.fetch(&recipe).unwrap(), seeded);
    }

    #[test]
    fn test_source_step_patches_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let workdir = dir.path().join("work");
        let recipe = linux_recipe();
        seed_cache(&cache, &recipe, "cmake_minimum_required(VERSION 3.12)\nproject(VTK)\n");

        let kitchen = kitchen(&cache, Arc::new(FakeCmake::new()));
        let cook = kitchen.cook_in(&recipe, &workdir);
        let sources = cook.source(false).unwrap();
        assert_eq!(sources, workdir.join("sources"));

        let content = fs::read_to_string(sources.join("CMakeLists.txt")).unwrap();
        assert_eq!(content.matches("project(VTK)").count(), 1);
        assert!(content.contains("recipe_basic_setup()"));

        // Without --force an existing tree is kept and reported
        assert!(cook.source(false).is_err());
        cook.source(true).unwrap();
        let content = fs::read_to_string(sources.join("CMakeLists.txt")).unwrap();
        assert_eq!(content.matches("recipe_basic_setup()").count(), 1);
    }

    #[test]
    fn test_source_step_missing_marker() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let recipe = linux_recipe();
        seed_cache(&cache, &recipe, "project(NotVTK)\n");

        let kitchen = kitchen(&cache, Arc::new(FakeCmake::new()));
        let result = kitchen.cook_in(&recipe, &dir.path().join("work")).source(false);
        assert!(matches!(result, Err(Error::PatchMarkerNotFound { .. })));
    }

    #[test]
    fn test_project_include_mode_leaves_sources_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let workdir = dir.path().join("work");
        let mut recipe = linux_recipe();
        recipe.source.injection = InjectionMode::ProjectInclude;
        seed_cache(&cache, &recipe, "project(VTK)\n");

        let kitchen = kitchen(&cache, Arc::new(FakeCmake::new()));
        let cook = kitchen.cook_in(&recipe, &workdir);
        cook.source(false).unwrap();
        assert_eq!(
            fs::read_to_string(workdir.join("sources/CMakeLists.txt")).unwrap(),
            "project(VTK)\n"
        );

        let plan = cook.build_plan();
        assert_eq!(
            plan.configure_command().args.last().cloned(),
            Some(format!(
                "-DCMAKE_PROJECT_VTK_INCLUDE={}",
                workdir.join("build/recipebuildinfo.cmake").display()
            ))
        );
    }

    #[test]
    fn test_cook_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let workdir = dir.path().join("work");
        let recipe = linux_recipe();
        seed_cache(&cache, &recipe, "project(VTK)\n");

        let runner = Arc::new(FakeCmake::new());
        let mut kitchen = kitchen(&cache, runner.clone());
        let installer = Arc::new(MockInstaller::new(&[]));
        kitchen.set_installer(installer.clone());

        let result = kitchen.cook(&recipe, &workdir, false).unwrap();

        assert_eq!(result.installed_packages.len(), 5);
        assert!(installer.calls().contains(&"mesa-common-dev".to_string()));
        assert_eq!(result.package_info.libs, vec!["vtkCommonCore-9.1"]);
        assert_eq!(result.package_info.defines.len(), 6);
        assert!(workdir.join("build/recipebuildinfo.cmake").is_file());
        assert!(!workdir.join("recipebuildinfo.cmake").exists());
        assert!(workdir.join("package/package-info.json").is_file());
        assert!(result.log_dir.join("build.log").is_file());

        let calls = runner.calls.lock().unwrap();
        let phases: Vec<&str> = calls.iter().map(|c| c.args[0].as_str()).collect();
        assert_eq!(phases, vec!["-S", "--build", "--install"]);
    }

    #[test]
    fn test_build_failure_carries_log_tail() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let workdir = dir.path().join("work");
        let recipe = linux_recipe();
        seed_cache(&cache, &recipe, "project(VTK)\n");

        let runner = Arc::new(FakeCmake {
            calls: Mutex::new(Vec::new()),
            fail_phase: Some("--build"),
        });
        let kitchen = kitchen(&cache, runner.clone());
        let cook = kitchen.cook_in(&recipe, &workdir);
        cook.source(false).unwrap();

        match cook.build() {
            Err(Error::BuildPhase { phase, log_tail, .. }) => {
                assert_eq!(phase, "build");
                assert!(log_tail.contains("Error 2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // install never ran
        assert_eq!(runner.calls.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_build_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = linux_recipe();
        let kitchen = kitchen(dir.path(), Arc::new(FakeCmake::new()));
        assert!(kitchen.cook_in(&recipe, dir.path()).build().is_err());
    }

    #[test]
    fn test_system_requirements_skipped_off_linux() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = Recipe::vtk_with_settings(Settings {
            os: Os::Windows,
            ..Settings::host()
        });
        let mut kitchen = kitchen(dir.path(), Arc::new(FakeCmake::new()));
        let installer = Arc::new(MockInstaller::new(&[]));
        kitchen.set_installer(installer.clone());

        let cook = kitchen.cook_in(&recipe, dir.path());
        assert!(cook.system_requirements().unwrap().is_empty());
        assert!(cook.planned_system_packages().unwrap().is_none());
        assert!(installer.calls().is_empty());
    }
}
