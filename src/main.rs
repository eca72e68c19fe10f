// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{BuildArgs, Cli, Commands, VersionArgs};
use commands::Overrides;
use tracing_subscriber::EnvFilter;

fn to_overrides(version: VersionArgs, build: BuildArgs, no_sudo: bool) -> Overrides {
    Overrides {
        version: version.version,
        shared: build.shared,
        without_python: build.without_python,
        without_web: build.without_web,
        build_type: build.build_type,
        jobs: build.jobs,
        generator: build.generator,
        no_sudo,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `package-info --json` stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let workdir = cli.workdir.as_path();

    match cli.command {
        Commands::Source { version, force } => {
            let overrides = to_overrides(version, BuildArgs::default(), false);
            commands::cmd_source(config, workdir, &overrides, force)
        }
        Commands::SystemRequirements { dry_run, no_sudo } => {
            let overrides = to_overrides(VersionArgs::default(), BuildArgs::default(), no_sudo);
            commands::cmd_system_requirements(config, workdir, &overrides, dry_run)
        }
        Commands::Build {
            version,
            build,
            dry_run,
        } => commands::cmd_build(config, workdir, &to_overrides(version, build, false), dry_run),
        Commands::PackageInfo { version, json } => {
            let overrides = to_overrides(version, BuildArgs::default(), false);
            commands::cmd_package_info(config, workdir, &overrides, json)
        }
        Commands::Cook {
            version,
            build,
            force,
            no_sudo,
        } => commands::cmd_cook(config, workdir, &to_overrides(version, build, no_sudo), force),
        Commands::Imports { to } => commands::cmd_imports(workdir, &to),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "vtk-recipe",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
