// src/cli.rs
//! CLI definitions for vtk-recipe
//!
//! Each lifecycle step is its own subcommand so a packaging front end can
//! drive them one at a time; `cook` runs all of them in order. The command
//! implementations live in the `commands` module.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vtk-recipe")]
#[command(author = "vtk-recipe contributors")]
#[command(version)]
#[command(about = "Fetch, patch, build and package the Visualization Toolkit", long_about = None)]
pub struct Cli {
    /// Configuration file (default: vtk-recipe.toml in the working directory, if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory holding sources/, build/ and package/
    #[arg(short, long, global = true, default_value = ".")]
    pub workdir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides of the recipe version
#[derive(Args, Debug, Clone, Default)]
pub struct VersionArgs {
    /// VTK release to build (X.Y.Z)
    #[arg(long = "version", value_name = "X.Y.Z")]
    pub version: Option<String>,
}

/// Overrides of the option set and build settings
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Build shared libraries
    #[arg(long)]
    pub shared: bool,

    /// Do not generate the Python wrappers
    #[arg(long)]
    pub without_python: bool,

    /// Leave the Web module group at VTK's default
    #[arg(long)]
    pub without_web: bool,

    /// CMake build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long)]
    pub build_type: Option<String>,

    /// Number of parallel compile jobs
    #[arg(short, long)]
    pub jobs: Option<u32>,

    /// CMake generator
    #[arg(short = 'G', long)]
    pub generator: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and extract the sources, then inject the build setup
    Source {
        #[command(flatten)]
        version: VersionArgs,

        /// Remove an existing sources/ tree and extract again
        #[arg(short, long)]
        force: bool,
    },

    /// Install the native packages VTK needs (Linux only)
    SystemRequirements {
        /// Print the packages without installing them
        #[arg(long)]
        dry_run: bool,

        /// Never prefix package manager commands with sudo
        #[arg(long)]
        no_sudo: bool,
    },

    /// Configure, build and install with CMake
    Build {
        #[command(flatten)]
        version: VersionArgs,

        #[command(flatten)]
        build: BuildArgs,

        /// Print the build configuration and CMake commands without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Publish the package metadata of an installed build
    PackageInfo {
        #[command(flatten)]
        version: VersionArgs,

        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run source, system-requirements, build and package-info in order
    Cook {
        #[command(flatten)]
        version: VersionArgs,

        #[command(flatten)]
        build: BuildArgs,

        /// Remove an existing sources/ tree and extract again
        #[arg(short, long)]
        force: bool,

        /// Never prefix package manager commands with sudo
        #[arg(long)]
        no_sudo: bool,
    },

    /// Copy runtime libraries (DLLs, dylibs) of the installed package
    Imports {
        /// Destination directory of the consumer
        #[arg(long)]
        to: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
