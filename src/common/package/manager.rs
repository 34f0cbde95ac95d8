//! Package manager and install method enums, with their exact command forms.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::common::exec::CommandLine;

/// Native distribution package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// APT - Debian/Ubuntu family
    Apt,
    /// DNF - Fedora/RHEL family
    Dnf,
    /// Pacman - Arch Linux family
    Pacman,
    /// Zypper - openSUSE
    Zypper,
}

impl PackageManager {
    /// Name of the executable.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Zypper => "zypper",
        }
    }

    /// Get a human-readable name for this package manager.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Apt => "APT",
            Self::Dnf => "DNF",
            Self::Pacman => "Pacman",
            Self::Zypper => "Zypper",
        }
    }

    pub fn install_command(&self, packages: &[&str]) -> CommandLine {
        let base = CommandLine::new(self.program());
        match self {
            Self::Apt => base.arg("install").args(packages.iter().copied()).arg("-y"),
            Self::Dnf => base.arg("install").args(packages.iter().copied()).arg("-y"),
            Self::Pacman => base
                .arg("-S")
                .args(packages.iter().copied())
                .args(["--noconfirm", "--needed"]),
            Self::Zypper => base
                .args(["install", "--no-confirm"])
                .args(packages.iter().copied()),
        }
    }

    pub fn uninstall_command(&self, packages: &[&str]) -> CommandLine {
        let base = CommandLine::new(self.program());
        match self {
            Self::Apt => base.arg("remove").args(packages.iter().copied()).arg("-y"),
            Self::Dnf => base.arg("remove").args(packages.iter().copied()).arg("-y"),
            Self::Pacman => base
                .arg("-Rsun")
                .args(packages.iter().copied())
                .arg("--noconfirm"),
            Self::Zypper => base
                .args(["remove", "--no-confirm"])
                .args(packages.iter().copied()),
        }
    }

    /// Enable versioned module streams. `None` when the manager has no modules.
    pub fn module_enable_command(&self, modules: &[&str]) -> Option<CommandLine> {
        match self {
            Self::Dnf => Some(
                CommandLine::new("dnf")
                    .args(["module", "enable"])
                    .args(modules.iter().copied())
                    .arg("-y"),
            ),
            Self::Apt | Self::Pacman | Self::Zypper => None,
        }
    }

    pub fn list_installed_command(&self) -> CommandLine {
        let base = CommandLine::new(self.program());
        match self {
            Self::Apt => base.args(["list", "--installed"]),
            Self::Dnf => base.args(["list", "installed"]),
            Self::Pacman => base.arg("-Q"),
            Self::Zypper => base.args(["packages", "--installed-only"]),
        }
    }

    /// Refresh metadata and upgrade everything, in order.
    pub fn update_commands(&self) -> Vec<CommandLine> {
        match self {
            Self::Apt => vec![
                CommandLine::new("apt").arg("update"),
                CommandLine::new("apt").args(["upgrade", "-y"]),
            ],
            Self::Dnf => vec![CommandLine::new("dnf").args(["upgrade", "--refresh", "-y"])],
            Self::Pacman => vec![CommandLine::new("pacman").args(["-Syu", "--noconfirm"])],
            Self::Zypper => vec![CommandLine::new("zypper").args(["update", "--no-confirm"])],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// How a package ends up on the system.
///
/// Declaration order is the detection precedence: when a package is present
/// through several methods, the first one is reported as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    Repository,
    Flatpak,
    Snap,
}

impl InstallMethod {
    pub const ALL: [InstallMethod; 3] = [Self::Repository, Self::Flatpak, Self::Snap];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Flatpak => "flatpak",
            Self::Snap => "snap",
        }
    }

    /// Program providing this method and the catalog key of the package
    /// that installs it. `None` for the native repository.
    pub fn runtime(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Repository => None,
            Self::Flatpak => Some(("flatpak", "flatpak")),
            Self::Snap => Some(("snap", "snapd")),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Repository => "Repository",
            Self::Flatpak => "Flatpak",
            Self::Snap => "Snap",
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "repository" | "repo" => Ok(Self::Repository),
            "flatpak" => Ok(Self::Flatpak),
            "snap" => Ok(Self::Snap),
            other => Err(format!(
                "unknown install method '{}' (expected repository, flatpak or snap)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_commands() {
        assert_eq!(
            PackageManager::Apt
                .install_command(&["nodejs", "npm"])
                .to_string(),
            "apt install nodejs npm -y"
        );
        assert_eq!(
            PackageManager::Dnf.install_command(&["vim-enhanced"]).to_string(),
            "dnf install vim-enhanced -y"
        );
        assert_eq!(
            PackageManager::Pacman.install_command(&["rustup"]).to_string(),
            "pacman -S rustup --noconfirm --needed"
        );
        assert_eq!(
            PackageManager::Zypper
                .install_command(&["nodejs16", "npm16"])
                .to_string(),
            "zypper install --no-confirm nodejs16 npm16"
        );
    }

    #[test]
    fn test_uninstall_commands() {
        assert_eq!(
            PackageManager::Apt.uninstall_command(&["vim"]).to_string(),
            "apt remove vim -y"
        );
        assert_eq!(
            PackageManager::Pacman.uninstall_command(&["vim"]).to_string(),
            "pacman -Rsun vim --noconfirm"
        );
        assert_eq!(
            PackageManager::Zypper.uninstall_command(&["vim"]).to_string(),
            "zypper remove --no-confirm vim"
        );
    }

    #[test]
    fn test_module_enable_only_on_dnf() {
        assert_eq!(
            PackageManager::Dnf
                .module_enable_command(&["nodejs:18"])
                .unwrap()
                .to_string(),
            "dnf module enable nodejs:18 -y"
        );
        assert!(PackageManager::Apt.module_enable_command(&["nodejs:18"]).is_none());
        assert!(PackageManager::Pacman.module_enable_command(&["x"]).is_none());
    }

    #[test]
    fn test_update_commands() {
        let apt: Vec<String> = PackageManager::Apt
            .update_commands()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(apt, vec!["apt update", "apt upgrade -y"]);
        assert_eq!(
            PackageManager::Pacman.update_commands()[0].to_string(),
            "pacman -Syu --noconfirm"
        );
    }

    #[test]
    fn test_install_method_parse() {
        assert_eq!("repo".parse::<InstallMethod>(), Ok(InstallMethod::Repository));
        assert_eq!("Flatpak".parse::<InstallMethod>(), Ok(InstallMethod::Flatpak));
        assert!("appimage".parse::<InstallMethod>().is_err());
    }

    #[test]
    fn test_install_method_precedence() {
        assert!(InstallMethod::Repository < InstallMethod::Flatpak);
        assert!(InstallMethod::Flatpak < InstallMethod::Snap);
    }
}
