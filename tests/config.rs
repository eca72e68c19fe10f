// tests/config.rs

//! Configuration file handling through the public API.

use std::fs;
use vtk_recipe::recipe::parser::{parse_config, parse_config_file};
use vtk_recipe::recipe::{InjectionMode, validate_recipe};
use vtk_recipe::{BuildType, KitchenConfig, Recipe};

const FULL_CONFIG: &str = r#"
[package]
version = "9.2.6"

[source]
base_url = "https://mirror.example.org/vtk/"
checksum = "sha256:dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
injection = "project-include"

[options]
shared = true
with_python = false

[settings]
build_type = "RelWithDebInfo"
compiler = "gcc"

[kitchen]
jobs = 16
generator = "Ninja"
use_sudo = false
"#;

#[test]
fn test_full_config_applies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vtk-recipe.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = parse_config_file(&path).unwrap();
    let mut recipe = Recipe::vtk();
    let mut kitchen = KitchenConfig::default();
    config.apply(&mut recipe, &mut kitchen).unwrap();

    assert_eq!(
        recipe.archive_url(),
        "https://mirror.example.org/vtk/9.2/VTK-9.2.6.tar.gz"
    );
    assert_eq!(recipe.include_dir(), "include/vtk-9.2");
    assert_eq!(recipe.source.injection, InjectionMode::ProjectInclude);
    assert!(recipe.options.shared);
    assert!(!recipe.options.with_python);
    // Unset keys in [options] keep their defaults
    assert!(recipe.options.with_web);
    assert_eq!(recipe.settings.build_type, BuildType::RelWithDebInfo);
    assert_eq!(recipe.settings.compiler.as_deref(), Some("gcc"));
    assert_eq!(kitchen.jobs, 16);
    assert_eq!(kitchen.generator.as_deref(), Some("Ninja"));
    assert!(!kitchen.use_sudo);

    assert!(validate_recipe(&recipe).unwrap().is_empty());
}

#[test]
fn test_unknown_keys_rejected() {
    assert!(parse_config("[options]\nwith_qt = true\n").is_err());
    assert!(parse_config("[build]\njobs = 2\n").is_err());
}

#[test]
fn test_bad_version_rejected() {
    assert!(parse_config("[package]\nversion = \"9.1\"\n").is_err());
}
