// src/recipe/kitchen/system_deps.rs

//! Native system packages VTK needs on Linux
//!
//! The package list depends only on the distribution family. Installation
//! goes through [`SystemPackageInstaller`] so the Kitchen stays decoupled
//! from whichever package manager the host uses.

use super::runner::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::{Error, Result};
use crate::settings::Settings;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Location of the distribution identification file
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

const ARCH_PACKAGES: &[&str] = &["freeglut", "libxt"];

const DEFAULT_PACKAGES: &[&str] = &[
    "freeglut3-dev",
    "mesa-common-dev",
    "mesa-utils-extra",
    "libgl1-mesa-dev",
    "libglapi-mesa",
];

/// Linux distribution family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distro {
    Arch,
    /// Debian and its derivatives (Ubuntu, Mint, Pop!_OS)
    Debian,
    /// Anything else, keeping the reported id
    Unrecognized(String),
}

impl Distro {
    /// Map an os-release `ID` to a family
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "arch" => Self::Arch,
            "ubuntu" | "debian" | "linuxmint" | "pop" => Self::Debian,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Parse the contents of an os-release file
    ///
    /// A file without an `ID=` line yields an unrecognised, empty id.
    pub fn from_os_release(content: &str) -> Self {
        let id = content
            .lines()
            .filter_map(|line| line.trim().strip_prefix("ID="))
            .map(|value| value.trim().trim_matches('"').trim_matches('\''))
            .next()
            .unwrap_or("");
        Self::from_id(id)
    }

    /// Detect the host distribution from `/etc/os-release`
    pub fn detect() -> Result<Self> {
        Self::detect_from(Path::new(OS_RELEASE_PATH))
    }

    pub fn detect_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(Error::io_at("failed to read", path))?;
        Ok(Self::from_os_release(&content))
    }

    /// The packages to install on this distribution family
    ///
    /// This is the only place the package lists are selected.
    pub fn system_packages(&self) -> &'static [&'static str] {
        match self {
            Self::Arch => ARCH_PACKAGES,
            Self::Debian | Self::Unrecognized(_) => DEFAULT_PACKAGES,
        }
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arch => f.write_str("arch"),
            Self::Debian => f.write_str("debian"),
            Self::Unrecognized(id) if id.is_empty() => f.write_str("unknown"),
            Self::Unrecognized(id) => f.write_str(id),
        }
    }
}

/// Packages required for `settings`, or `None` when the target is not Linux
pub fn system_packages_for(settings: &Settings, distro: &Distro) -> Option<&'static [&'static str]> {
    if settings.os.is_linux() {
        Some(distro.system_packages())
    } else {
        None
    }
}

/// Installs native packages through the host package manager
pub trait SystemPackageInstaller: Send + Sync {
    /// Whether the package is already installed
    fn is_installed(&self, package: &str) -> Result<bool>;

    /// Install one package
    fn install(&self, package: &str) -> Result<()>;
}

/// Host package manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pacman,
    Apt,
}

impl PackageManager {
    /// Pick the package manager for a distribution family
    ///
    /// Unrecognised distributions are probed through `PATH`.
    pub fn for_distro(distro: &Distro, runner: &dyn CommandRunner) -> Option<Self> {
        match distro {
            Distro::Arch => Some(Self::Pacman),
            Distro::Debian => Some(Self::Apt),
            Distro::Unrecognized(_) => {
                if runner.program_exists("apt-get") {
                    Some(Self::Apt)
                } else if runner.program_exists("pacman") {
                    Some(Self::Pacman)
                } else {
                    None
                }
            }
        }
    }

    fn query_command(&self, package: &str) -> CommandSpec {
        match self {
            Self::Pacman => CommandSpec::new("pacman").args(["-Qq", package]),
            Self::Apt => {
                CommandSpec::new("dpkg-query").args(["-W", "--showformat=${Status}", package])
            }
        }
    }

    /// Interpret the output of [`query_command`](Self::query_command)
    ///
    /// dpkg also knows removed packages whose config files remain, so only the
    /// `install ok installed` status counts.
    fn is_installed_from(&self, output: &CommandOutput) -> bool {
        match self {
            Self::Pacman => output.success,
            Self::Apt => output.success && output.stdout.trim() == "install ok installed",
        }
    }

    fn install_args(&self, package: &str) -> Vec<String> {
        match self {
            Self::Pacman => vec!["pacman", "-S", "--needed", "--noconfirm", package],
            Self::Apt => vec!["apt-get", "install", "-y", package],
        }
        .into_iter()
        .map(String::from)
        .collect()
    }
}

/// [`SystemPackageInstaller`] that shells out to pacman or apt-get
pub struct PackageTool {
    manager: PackageManager,
    runner: Arc<dyn CommandRunner>,
    sudo: bool,
}

impl PackageTool {
    /// `use_sudo` only takes effect when not already running as root
    pub fn new(manager: PackageManager, runner: Arc<dyn CommandRunner>, use_sudo: bool) -> Self {
        Self {
            manager,
            runner,
            sudo: use_sudo && !running_as_root(),
        }
    }

    /// Set up the tool for a distribution family
    pub fn for_distro(
        distro: &Distro,
        runner: Arc<dyn CommandRunner>,
        use_sudo: bool,
    ) -> Result<Self> {
        let manager = PackageManager::for_distro(distro, runner.as_ref()).ok_or_else(|| {
            Error::SystemPackage {
                package: distro.system_packages().join(" "),
                message: format!("no supported package manager found on '{distro}'"),
            }
        })?;
        debug!("Using {:?} for system packages on {}", manager, distro);
        Ok(Self::new(manager, runner, use_sudo))
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    pub fn install_command(&self, package: &str) -> CommandSpec {
        let args = self.manager.install_args(package);
        if self.sudo {
            CommandSpec::new("sudo").args(args)
        } else {
            let (program, rest) = args.split_at(1);
            CommandSpec::new(&program[0]).args(rest.to_vec())
        }
    }
}

impl SystemPackageInstaller for PackageTool {
    fn is_installed(&self, package: &str) -> Result<bool> {
        let output = self
            .runner
            .run(&self.manager.query_command(package))
            .map_err(|e| Error::SystemPackage {
                package: package.to_string(),
                message: e.to_string(),
            })?;
        Ok(self.manager.is_installed_from(&output))
    }

    fn install(&self, package: &str) -> Result<()> {
        let spec = self.install_command(package);
        info!("Running: {}", spec.display());
        let output = self.runner.run(&spec).map_err(|e| Error::SystemPackage {
            package: package.to_string(),
            message: e.to_string(),
        })?;

        if !output.success {
            return Err(Error::SystemPackage {
                package: package.to_string(),
                message: format!("{}\n{}", output.status(), output.combined().trim_end()),
            });
        }
        Ok(())
    }
}

fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Install every package in `packages` that is not yet present
///
/// Packages are handled in order. The first failure stops the run and names
/// the package; nothing after it is attempted. Returns the packages that
/// were newly installed.
pub fn install_packages(
    installer: &dyn SystemPackageInstaller,
    packages: &[&str],
) -> Result<Vec<String>> {
    let mut installed = Vec::new();

    for package in packages {
        if installer.is_installed(package)? {
            debug!("{} is already installed", package);
            continue;
        }

        info!("Installing system package {}", package);
        installer.install(package)?;
        installed.push(package.to_string());
    }

    Ok(installed)
}
