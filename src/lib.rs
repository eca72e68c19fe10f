// src/lib.rs

//! VTK package recipe
//!
//! Fetches a VTK release, patches its top-level CMake project so the build
//! picks up recipe-generated metadata, installs the native packages VTK
//! needs on Linux, drives CMake, and publishes the metadata consumers link
//! against.
//!
//! # Architecture
//!
//! - Recipe: fixed package description plus options and settings
//! - Kitchen/Cook: the four lifecycle steps, run strictly in order
//! - Seams: subprocesses and system packages go through traits

mod error;
pub mod hash;
pub mod recipe;
pub mod settings;
pub mod version;

pub use error::{Error, Result};
pub use recipe::{Cook, CookResult, Kitchen, KitchenConfig, PackageInfo, Recipe, RecipeOptions};
pub use settings::{BuildType, Os, Settings};
pub use version::ReleaseVersion;
