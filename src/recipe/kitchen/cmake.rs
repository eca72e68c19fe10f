// src/recipe/kitchen/cmake.rs

//! CMake configuration and invocation
//!
//! [`BuildConfiguration`] is the set of cache variables derived from the
//! option set. [`CMakeBuild`] turns it into configure/build/install command
//! lines and runs them through a [`CommandRunner`].

use super::runner::{tail_lines, CommandOutput, CommandRunner, CommandSpec};
use crate::error::{Error, Result};
use crate::recipe::format::RecipeOptions;
use crate::settings::BuildType;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Number of output lines carried in a phase failure
pub const LOG_TAIL_LINES: usize = 40;

pub const BUILD_TESTING: &str = "BUILD_TESTING";
pub const BUILD_EXAMPLES: &str = "BUILD_EXAMPLES";
pub const BUILD_SHARED_LIBS: &str = "BUILD_SHARED_LIBS";
pub const VTK_WRAP_PYTHON: &str = "VTK_WRAP_PYTHON";
pub const VTK_GROUP_ENABLE_WEB: &str = "VTK_GROUP_ENABLE_Web";
pub const VTK_MODULE_ENABLE_WEBCORE: &str = "VTK_MODULE_ENABLE_VTK_WebCore";
pub const VTK_MODULE_ENABLE_WEBGLEXPORTER: &str = "VTK_MODULE_ENABLE_VTK_WebGLExporter";

/// Value of a VTK group/module enable variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleEnable {
    Yes,
    No,
    /// Let VTK decide
    Default,
}

impl ModuleEnable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Default => "DEFAULT",
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// CMake cache variables derived from the option set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    definitions: BTreeMap<String, String>,
}

impl BuildConfiguration {
    /// Derive the configuration from the option set
    ///
    /// Testing and examples are always off, whatever the options say.
    pub fn from_options(options: &RecipeOptions) -> Self {
        let web = if options.with_web {
            ModuleEnable::Yes
        } else {
            ModuleEnable::Default
        };
        let python = if options.with_python {
            ModuleEnable::Yes
        } else {
            ModuleEnable::No
        };

        let mut definitions = BTreeMap::new();
        definitions.insert(BUILD_TESTING.to_string(), on_off(false).to_string());
        definitions.insert(BUILD_EXAMPLES.to_string(), on_off(false).to_string());
        definitions.insert(BUILD_SHARED_LIBS.to_string(), on_off(options.shared).to_string());
        definitions.insert(VTK_WRAP_PYTHON.to_string(), python.as_str().to_string());
        definitions.insert(VTK_GROUP_ENABLE_WEB.to_string(), web.as_str().to_string());
        definitions.insert(VTK_MODULE_ENABLE_WEBCORE.to_string(), web.as_str().to_string());
        definitions.insert(
            VTK_MODULE_ENABLE_WEBGLEXPORTER.to_string(),
            web.as_str().to_string(),
        );

        Self { definitions }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.definitions.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `-DKEY=VALUE` arguments in key order
    pub fn to_cmake_args(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("-D{k}={v}")).collect()
    }
}

/// The three CMake phases, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Build,
    Install,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Install => "install",
        }
    }
}

/// One CMake build of a patched source tree
#[derive(Debug, Clone)]
pub struct CMakeBuild {
    pub cmake: PathBuf,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub install_prefix: PathBuf,
    pub build_type: BuildType,
    pub generator: Option<String>,
    pub jobs: u32,
    pub configuration: BuildConfiguration,
    /// Extra `-D` definitions appended after the configuration
    pub extra_definitions: Vec<(String, String)>,
}

impl CMakeBuild {
    pub fn configure_command(&self) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.cmake)
            .arg("-S")
            .arg(self.source_dir.display().to_string())
            .arg("-B")
            .arg(self.build_dir.display().to_string());

        if let Some(generator) = &self.generator {
            spec = spec.arg("-G").arg(generator.clone());
        }

        spec.arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_type))
            .arg(format!(
                "-DCMAKE_INSTALL_PREFIX={}",
                self.install_prefix.display()
            ))
            .args(self.configuration.to_cmake_args())
            .args(
                self.extra_definitions
                    .iter()
                    .map(|(k, v)| format!("-D{k}={v}")),
            )
            .current_dir(&self.build_dir)
    }

    pub fn build_command(&self) -> CommandSpec {
        CommandSpec::new(&self.cmake)
            .arg("--build")
            .arg(self.build_dir.display().to_string())
            .arg("--config")
            .arg(self.build_type.as_str())
            .arg("--parallel")
            .arg(self.jobs.to_string())
            .current_dir(&self.build_dir)
    }

    pub fn install_command(&self) -> CommandSpec {
        CommandSpec::new(&self.cmake)
            .arg("--install")
            .arg(self.build_dir.display().to_string())
            .arg("--config")
            .arg(self.build_type.as_str())
            .current_dir(&self.build_dir)
    }

    pub fn command(&self, phase: Phase) -> CommandSpec {
        match phase {
            Phase::Configure => self.configure_command(),
            Phase::Build => self.build_command(),
            Phase::Install => self.install_command(),
        }
    }

    /// Run one phase, writing its full output to `<log_dir>/<phase>.log`
    ///
    /// Runs exactly once. A failing phase is reported with its exit status
    /// and the tail of its output.
    pub fn run_phase(
        &self,
        runner: &dyn CommandRunner,
        phase: Phase,
        log_dir: &Path,
    ) -> Result<CommandOutput> {
        let spec = self.command(phase);
        info!("Running cmake {} phase", phase.as_str());

        let output = runner.run(&spec)?;
        let log = output.combined();

        let log_path = log_dir.join(format!("{}.log", phase.as_str()));
        if let Err(e) = fs::write(&log_path, format!("$ {}\n{}", spec.display(), log)) {
            warn!("Failed to write {}: {}", log_path.display(), e);
        }

        if !output.success {
            return Err(Error::BuildPhase {
                phase: phase.as_str().to_string(),
                status: output.status(),
                log_tail: tail_lines(&log, LOG_TAIL_LINES),
            });
        }

        Ok(output)
    }

    /// Run configure, build and install in order, stopping at the first failure
    pub fn run_all(&self, runner: &dyn CommandRunner, log_dir: &Path) -> Result<()> {
        for phase in [Phase::Configure, Phase::Build, Phase::Install] {
            self.run_phase(runner, phase, log_dir)?;
        }
        Ok(())
    }
}
