// src/recipe/mod.rs

//! The VTK package recipe
//!
//! The recipe is fixed: it always builds the Visualization Toolkit. What
//! varies is the version, the source location, the option set and the
//! target settings, all of which come from an optional TOML file.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: what to build and with which options
//! - **Kitchen**: configuration plus the seams to processes and packages
//! - **Cook**: one run of the lifecycle in one working directory
//!
//! # Example Configuration
//!
//! ```toml
//! [package]
//! version = "9.1.0"
//!
//! [source]
//! checksum = "sha256:..."
//!
//! [options]
//! shared = true
//! with_python = false
//! ```

pub mod format;
pub mod kitchen;
pub mod package_info;
pub mod parser;

pub use format::{InjectionMode, PackageSection, Recipe, RecipeOptions, SourceSection};
pub use kitchen::{Cook, CookResult, Kitchen, KitchenConfig};
pub use package_info::{PackageInfo, AUTOINIT_DEFINES};
pub use parser::{parse_config, parse_config_file, validate_recipe, RecipeConfig};
