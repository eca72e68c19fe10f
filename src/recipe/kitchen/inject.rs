// src/recipe/kitchen/inject.rs

//! Wiring the generated build metadata into the upstream CMake project
//!
//! Two strategies exist (see [`InjectionMode`]):
//! - rewrite the top-level `CMakeLists.txt`, replacing the `project()` line
//!   with itself followed by the include, setup call and RPATH setting
//! - leave upstream untouched and let CMake include the file through
//!   `CMAKE_PROJECT_<name>_INCLUDE`, in which case the generated file carries
//!   the setup call and RPATH itself
//!
//! The marker must occur exactly once; a missing or repeated marker is an
//! error.

use crate::error::{Error, Result};
use crate::recipe::format::{InjectionMode, Recipe};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Generated build metadata file name
pub const BUILDINFO_FILE: &str = "recipebuildinfo.cmake";

/// Macro defined by the build metadata file
pub const SETUP_MACRO: &str = "recipe_basic_setup";

/// Install RPATH relative to the installed binary
const INSTALL_RPATH: &str = r#"SET(CMAKE_INSTALL_RPATH "$ORIGIN")"#;

/// The `project()` call the injection anchors on, e.g. `project(VTK)`
pub fn marker(project: &str) -> String {
    format!("project({project})")
}

fn include_line() -> String {
    format!("include(${{CMAKE_BINARY_DIR}}/{BUILDINFO_FILE})")
}

/// Block that replaces the marker; starts with the marker itself
pub fn injection_block(project: &str) -> String {
    format!(
        "{}\n{}\n{}()\n{}",
        marker(project),
        include_line(),
        SETUP_MACRO,
        INSTALL_RPATH
    )
}

/// Outcome of an injection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// The content was rewritten
    Patched(String),
    /// The block is already present; nothing to do
    AlreadyPatched,
}

/// Count how often the marker occurs, failing unless it is exactly once
pub fn check_marker(content: &str, project: &str, file: &Path) -> Result<()> {
    let marker = marker(project);
    match content.matches(marker.as_str()).count() {
        0 => Err(Error::PatchMarkerNotFound {
            marker,
            file: file.to_path_buf(),
        }),
        1 => Ok(()),
        count => Err(Error::PatchMarkerAmbiguous {
            marker,
            file: file.to_path_buf(),
            count,
        }),
    }
}

/// Inject the build metadata block into CMake source text
///
/// `file` is only used for error messages.
pub fn inject(content: &str, project: &str, file: &Path) -> Result<Injection> {
    check_marker(content, project, file)?;

    let block = injection_block(project);
    if content.contains(&block) {
        return Ok(Injection::AlreadyPatched);
    }

    Ok(Injection::Patched(content.replacen(&marker(project), &block, 1)))
}

/// Inject the build metadata block into a file in place
///
/// Returns `true` if the file was changed.
pub fn inject_into_file(path: &Path, project: &str) -> Result<bool> {
    let content = fs::read_to_string(path).map_err(Error::io_at("failed to read", path))?;

    match inject(&content, project, path)? {
        Injection::Patched(patched) => {
            fs::write(path, patched).map_err(Error::io_at("failed to write", path))?;
            info!("Injected build setup into {}", path.display());
            Ok(true)
        }
        Injection::AlreadyPatched => {
            debug!("{} already carries the build setup", path.display());
            Ok(false)
        }
    }
}

/// Render the generated build metadata file
pub fn render_buildinfo(recipe: &Recipe) -> String {
    let settings = &recipe.settings;
    let mut out = String::new();

    out.push_str("# Generated by vtk-recipe. Do not edit.\n\n");
    out.push_str(&format!(
        "set(RECIPE_PACKAGE_NAME \"{}\")\n",
        recipe.package.name
    ));
    out.push_str(&format!(
        "set(RECIPE_PACKAGE_VERSION \"{}\")\n",
        recipe.package.version
    ));
    out.push_str(&format!("set(RECIPE_SETTINGS_OS \"{}\")\n", settings.os));
    out.push_str(&format!("set(RECIPE_SETTINGS_ARCH \"{}\")\n", settings.arch));
    out.push_str(&format!(
        "set(RECIPE_SETTINGS_BUILD_TYPE \"{}\")\n",
        settings.build_type
    ));
    if let Some(compiler) = &settings.compiler {
        out.push_str(&format!("set(RECIPE_SETTINGS_COMPILER \"{compiler}\")\n"));
    }

    out.push_str(&format!(
        r#"
macro({SETUP_MACRO})
    message(STATUS "vtk-recipe: basic setup for ${{RECIPE_PACKAGE_NAME}} ${{RECIPE_PACKAGE_VERSION}}")
    if(NOT CMAKE_BUILD_TYPE AND NOT CMAKE_CONFIGURATION_TYPES)
        set(CMAKE_BUILD_TYPE "${{RECIPE_SETTINGS_BUILD_TYPE}}" CACHE STRING "" FORCE)
    endif()
    set(CMAKE_RUNTIME_OUTPUT_DIRECTORY "${{CMAKE_CURRENT_BINARY_DIR}}/bin")
    set(CMAKE_ARCHIVE_OUTPUT_DIRECTORY "${{CMAKE_CURRENT_BINARY_DIR}}/lib")
    set(CMAKE_LIBRARY_OUTPUT_DIRECTORY "${{CMAKE_CURRENT_BINARY_DIR}}/lib")
    set(CMAKE_SKIP_RPATH OFF)
endmacro()
"#
    ));

    if recipe.source.injection == InjectionMode::ProjectInclude {
        out.push('\n');
        out.push_str(&format!("{SETUP_MACRO}()\n"));
        out.push_str(INSTALL_RPATH);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMAKELISTS: &str = "cmake_minimum_required(VERSION 3.12 FATAL_ERROR)\n\
                              project(VTK)\n\
                              set(VTK_CMAKE_DIR \"${VTK_SOURCE_DIR}/CMake\")\n";

    fn patched(content: &str) -> String {
        match inject(content, "VTK", Path::new("CMakeLists.txt")).unwrap() {
            Injection::Patched(s) => s,
            Injection::AlreadyPatched => panic!("expected a patch"),
        }
    }

    #[test]
    fn test_injection_block_layout() {
        let block = injection_block("VTK");
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            vec![
                "project(VTK)",
                "include(${CMAKE_BINARY_DIR}/recipebuildinfo.cmake)",
                "recipe_basic_setup()",
                "SET(CMAKE_INSTALL_RPATH \"$ORIGIN\")",
            ]
        );
    }

    #[test]
    fn test_inject_keeps_marker_exactly_once() {
        let out = patched(CMAKELISTS);
        assert_eq!(out.matches("project(VTK)").count(), 1);
        assert!(out.contains("include(${CMAKE_BINARY_DIR}/recipebuildinfo.cmake)"));
        assert!(out.starts_with("cmake_minimum_required"));
        assert!(out.ends_with("set(VTK_CMAKE_DIR \"${VTK_SOURCE_DIR}/CMake\")\n"));
    }

    #[test]
    fn test_inject_is_idempotent() {
        let once = patched(CMAKELISTS);
        let again = inject(&once, "VTK", Path::new("CMakeLists.txt")).unwrap();
        assert_eq!(again, Injection::AlreadyPatched);
        assert_eq!(once.matches("project(VTK)").count(), 1);
    }

    #[test]
    fn test_inject_missing_marker_fails() {
        let result = inject(
            "cmake_minimum_required(VERSION 3.12)\nproject(Other)\n",
            "VTK",
            Path::new("CMakeLists.txt"),
        );
        assert!(matches!(result, Err(Error::PatchMarkerNotFound { .. })));
    }

    #[test]
    fn test_inject_duplicate_marker_fails() {
        let result = inject(
            "project(VTK)\nproject(VTK)\n",
            "VTK",
            Path::new("CMakeLists.txt"),
        );
        assert!(matches!(
            result,
            Err(Error::PatchMarkerAmbiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_inject_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CMakeLists.txt");
        fs::write(&path, CMAKELISTS).unwrap();

        assert!(inject_into_file(&path, "VTK").unwrap());
        assert!(!inject_into_file(&path, "VTK").unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("project(VTK)").count(), 1);
        assert_eq!(content.matches("recipe_basic_setup()").count(), 1);
    }

    #[test]
    fn test_render_buildinfo_rewrite_mode() {
        let recipe = Recipe::vtk();
        let info = render_buildinfo(&recipe);
        assert!(info.contains("set(RECIPE_PACKAGE_VERSION \"9.1.0\")"));
        assert!(info.contains("macro(recipe_basic_setup)"));
        // The rewritten CMakeLists.txt calls the macro; the file must not.
        assert!(!info.contains("\nrecipe_basic_setup()\n"));
        assert!(!info.contains("CMAKE_INSTALL_RPATH"));
    }

    #[test]
    fn test_render_buildinfo_project_include_mode() {
        let mut recipe = Recipe::vtk();
        recipe.source.injection = InjectionMode::ProjectInclude;
        recipe.settings.compiler = Some("gcc".to_string());
        let info = render_buildinfo(&recipe);
        assert!(info.contains("\nrecipe_basic_setup()\n"));
        assert!(info.contains("SET(CMAKE_INSTALL_RPATH \"$ORIGIN\")"));
        assert!(info.contains("set(RECIPE_SETTINGS_COMPILER \"gcc\")"));
    }
}
