// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe version override
fn version_arg() -> Arg {
    Arg::new("version")
        .long("version")
        .value_name("X.Y.Z")
        .help("VTK release to build")
}

/// Common argument: re-extract sources
fn force_arg() -> Arg {
    Arg::new("force")
        .short('f')
        .long("force")
        .action(ArgAction::SetTrue)
        .help("Remove an existing sources/ tree and extract again")
}

fn no_sudo_arg() -> Arg {
    Arg::new("no_sudo")
        .long("no-sudo")
        .action(ArgAction::SetTrue)
        .help("Never prefix package manager commands with sudo")
}

/// Option set and build setting overrides shared by build and cook
fn build_args() -> Vec<Arg> {
    vec![
        Arg::new("shared")
            .long("shared")
            .action(ArgAction::SetTrue)
            .help("Build shared libraries"),
        Arg::new("without_python")
            .long("without-python")
            .action(ArgAction::SetTrue)
            .help("Do not generate the Python wrappers"),
        Arg::new("without_web")
            .long("without-web")
            .action(ArgAction::SetTrue)
            .help("Leave the Web module group at VTK's default"),
        Arg::new("build_type")
            .long("build-type")
            .help("CMake build type (Debug, Release, RelWithDebInfo, MinSizeRel)"),
        Arg::new("jobs")
            .short('j')
            .long("jobs")
            .help("Number of parallel compile jobs"),
        Arg::new("generator")
            .short('G')
            .long("generator")
            .help("CMake generator"),
    ]
}

fn build_cli() -> Command {
    Command::new("vtk-recipe")
        .version(env!("CARGO_PKG_VERSION"))
        .author("vtk-recipe contributors")
        .about("Fetch, patch, build and package the Visualization Toolkit")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file (default: vtk-recipe.toml in the working directory)"),
        )
        .arg(
            Arg::new("workdir")
                .short('w')
                .long("workdir")
                .default_value(".")
                .help("Working directory holding sources/, build/ and package/"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("source")
                .about("Download and extract the sources, then inject the build setup")
                .arg(version_arg())
                .arg(force_arg()),
        )
        .subcommand(
            Command::new("system-requirements")
                .about("Install the native packages VTK needs (Linux only)")
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the packages without installing them"),
                )
                .arg(no_sudo_arg()),
        )
        .subcommand(
            Command::new("build")
                .about("Configure, build and install with CMake")
                .arg(version_arg())
                .args(build_args())
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the build configuration and CMake commands"),
                ),
        )
        .subcommand(
            Command::new("package-info")
                .about("Publish the package metadata of an installed build")
                .arg(version_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the metadata as JSON"),
                ),
        )
        .subcommand(
            Command::new("cook")
                .about("Run source, system-requirements, build and package-info in order")
                .arg(version_arg())
                .args(build_args())
                .arg(force_arg())
                .arg(no_sudo_arg()),
        )
        .subcommand(
            Command::new("imports")
                .about("Copy runtime libraries (DLLs, dylibs) of the installed package")
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .help("Destination directory of the consumer"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("vtk-recipe.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
