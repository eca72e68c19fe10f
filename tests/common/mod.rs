// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use vtk_recipe::recipe::kitchen::{
    CommandOutput, CommandRunner, CommandSpec, SystemPackageInstaller, PACKAGE_DIR,
};
use vtk_recipe::{Error, Recipe, Result};

/// Upstream-looking top-level CMakeLists.txt
pub const VTK_CMAKELISTS: &str = "cmake_minimum_required(VERSION 3.12...3.16 FATAL_ERROR)\n\
                                  project(VTK)\n\
                                  \n\
                                  set(VTK_CMAKE_DIR \"${VTK_SOURCE_DIR}/CMake\")\n";

/// Write a VTK-like source tarball into the source cache so no download happens.
pub fn seed_source_cache(cache: &Path, recipe: &Recipe, cmakelists: &str) -> PathBuf {
    fs::create_dir_all(cache).unwrap();
    let path = cache.join(recipe.archive_filename());
    let encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::fast());
    let mut builder = tar::Builder::new(encoder);

    let root = recipe.extracted_dir_name();
    for (name, content) in [
        ("CMakeLists.txt", cmakelists),
        ("Common/Core/vtkObject.h", "class vtkObject;\n"),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{root}/{name}"), content.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
    path
}

/// Stand-in for CMake: records invocations and lays out an install tree.
pub struct FakeCmake {
    pub calls: Mutex<Vec<CommandSpec>>,
    /// First argument of the phase that should fail (`-S`, `--build`, `--install`)
    pub fail_phase: Option<&'static str>,
    /// Lines printed by the failing phase
    pub failure_output: String,
    /// Library files created under `package/lib` by the install phase
    pub installed_libs: Vec<&'static str>,
}

impl FakeCmake {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_phase: None,
            failure_output: String::new(),
            installed_libs: vec![
                "libvtkCommonCore-9.1.a",
                "libvtkRenderingOpenGL2-9.1.a",
                "libvtksys-9.1.a",
            ],
        }
    }

    pub fn failing(phase: &'static str, output: &str) -> Self {
        Self {
            fail_phase: Some(phase),
            failure_output: output.to_string(),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeCmake {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        let phase = spec.args.first().cloned().unwrap_or_default();

        if self.fail_phase == Some(phase.as_str()) {
            return Ok(CommandOutput {
                success: false,
                code: Some(1),
                stdout: self.failure_output.clone(),
                stderr: String::new(),
            });
        }

        if phase == "--install" {
            let workdir = spec.cwd.as_ref().unwrap().parent().unwrap();
            let lib = workdir.join(PACKAGE_DIR).join("lib");
            fs::create_dir_all(&lib).unwrap();
            for name in &self.installed_libs {
                fs::write(lib.join(name), b"").unwrap();
            }
        }

        Ok(CommandOutput {
            success: true,
            code: Some(0),
            stdout: format!("-- {}\n", spec.display()),
            stderr: String::new(),
        })
    }

    fn program_exists(&self, _program: &str) -> bool {
        false
    }
}

/// Installer that remembers what it was asked to install.
pub struct RecordingInstaller {
    pub installed: Mutex<HashSet<String>>,
    pub calls: Mutex<Vec<String>>,
    pub fail_on: Option<&'static str>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self {
            installed: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SystemPackageInstaller for RecordingInstaller {
    fn is_installed(&self, package: &str) -> Result<bool> {
        Ok(self.installed.lock().unwrap().contains(package))
    }

    fn install(&self, package: &str) -> Result<()> {
        self.calls.lock().unwrap().push(package.to_string());
        if self.fail_on == Some(package) {
            return Err(Error::SystemPackage {
                package: package.to_string(),
                message: "E: Unable to locate package".to_string(),
            });
        }
        self.installed.lock().unwrap().insert(package.to_string());
        Ok(())
    }
}
