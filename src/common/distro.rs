use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::common::package::PackageManager;

/// Identification files, checked in this order. The first one that exists wins.
pub const IDENTIFICATION_FILES: &[&str] =
    &["/etc/os-release", "/usr/lib/os-release", "/etc/lsb-release"];

/// Substrings used to classify identification text.
///
/// Derivatives come before their parents so that e.g. "LMDE" is not caught by
/// a later, more generic name.
const KNOWN_NAMES: &[(&str, OperatingSystem)] = &[
    ("LMDE", OperatingSystem::Lmde),
    ("Mint", OperatingSystem::Mint),
    ("Pop!_OS", OperatingSystem::PopOS),
    ("Manjaro", OperatingSystem::Manjaro),
    ("EndeavourOS", OperatingSystem::EndeavourOS),
    ("Arch", OperatingSystem::Arch),
    ("Alma", OperatingSystem::Alma),
    ("CentOS", OperatingSystem::CentOS),
    ("Rocky", OperatingSystem::Rocky),
    ("Fedora", OperatingSystem::Fedora),
    ("SUSE", OperatingSystem::OpenSUSE),
    ("Ubuntu", OperatingSystem::Ubuntu),
    ("Debian", OperatingSystem::Debian),
];

/// Represents a detected operating system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatingSystem {
    /// Vanilla Arch Linux
    Arch,
    /// Manjaro Linux
    Manjaro,
    /// EndeavourOS
    EndeavourOS,
    /// AlmaLinux
    Alma,
    /// CentOS Stream
    CentOS,
    /// Rocky Linux
    Rocky,
    /// Fedora
    Fedora,
    /// Debian
    Debian,
    /// Linux Mint Debian Edition
    Lmde,
    /// Ubuntu
    Ubuntu,
    /// Linux Mint (Ubuntu based)
    Mint,
    /// Pop!_OS
    PopOS,
    /// openSUSE (Leap and Tumbleweed)
    OpenSUSE,
    /// Unrecognized system. Nothing is safe to run on it.
    Unknown(String),
}

/// Group of distributions sharing compatible repositories and naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RepositoryFamily {
    Debian,
    Ubuntu,
    Fedora,
    RedHat,
    Suse,
    Arch,
}

impl RepositoryFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debian => "debian",
            Self::Ubuntu => "ubuntu",
            Self::Fedora => "fedora",
            Self::RedHat => "redhat",
            Self::Suse => "suse",
            Self::Arch => "arch",
        }
    }
}

impl fmt::Display for RepositoryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OperatingSystem {
    /// Detect the current operating system from the identification files.
    pub fn detect() -> Self {
        Self::detect_from(IDENTIFICATION_FILES)
    }

    /// Detect using an explicit list of candidate files.
    pub fn detect_from<P: AsRef<Path>>(candidates: &[P]) -> Self {
        let Some(path) = candidates.iter().map(AsRef::as_ref).find(|p| p.exists()) else {
            return Self::Unknown("no identification file found".to_string());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::classify(&content),
            Err(e) => Self::Unknown(format!("failed to read {}: {}", path.display(), e)),
        }
    }

    /// Classify identification file content.
    ///
    /// The pretty-name line is preferred; the whole file is the fallback.
    pub fn classify(content: &str) -> Self {
        let pretty = content.lines().find_map(|line| {
            line.strip_prefix("PRETTY_NAME=")
                .or_else(|| line.strip_prefix("DISTRIB_DESCRIPTION="))
                .map(|v| v.trim().trim_matches('"'))
        });

        if let Some(name) = pretty
            && let Some(os) = Self::match_name(name)
        {
            return os;
        }

        Self::match_name(content).unwrap_or_else(|| {
            Self::Unknown(pretty.unwrap_or("unrecognized distribution").to_string())
        })
    }

    fn match_name(text: &str) -> Option<Self> {
        KNOWN_NAMES
            .iter()
            .find(|(needle, _)| text.contains(needle))
            .map(|(_, os)| os.clone())
    }

    pub fn repository_family(&self) -> Option<RepositoryFamily> {
        match self {
            Self::Arch | Self::Manjaro | Self::EndeavourOS => Some(RepositoryFamily::Arch),
            Self::Alma | Self::CentOS | Self::Rocky => Some(RepositoryFamily::RedHat),
            Self::Fedora => Some(RepositoryFamily::Fedora),
            Self::Debian | Self::Lmde => Some(RepositoryFamily::Debian),
            Self::Ubuntu | Self::Mint | Self::PopOS => Some(RepositoryFamily::Ubuntu),
            Self::OpenSUSE => Some(RepositoryFamily::Suse),
            Self::Unknown(_) => None,
        }
    }

    /// Get the native package manager for this operating system
    pub fn package_manager(&self) -> Option<PackageManager> {
        self.repository_family().map(|family| match family {
            RepositoryFamily::Arch => PackageManager::Pacman,
            RepositoryFamily::Debian | RepositoryFamily::Ubuntu => PackageManager::Apt,
            RepositoryFamily::Fedora | RepositoryFamily::RedHat => PackageManager::Dnf,
            RepositoryFamily::Suse => PackageManager::Zypper,
        })
    }

    /// Short identifier, as accepted by `--distro`.
    pub fn id(&self) -> &str {
        match self {
            Self::Arch => "arch",
            Self::Manjaro => "manjaro",
            Self::EndeavourOS => "endeavouros",
            Self::Alma => "alma",
            Self::CentOS => "centos",
            Self::Rocky => "rocky",
            Self::Fedora => "fedora",
            Self::Debian => "debian",
            Self::Lmde => "lmde",
            Self::Ubuntu => "ubuntu",
            Self::Mint => "mint",
            Self::PopOS => "pop",
            Self::OpenSUSE => "suse",
            Self::Unknown(_) => "",
        }
    }

    /// Get the display name of the operating system
    pub fn name(&self) -> &str {
        match self {
            Self::Arch => "Arch Linux",
            Self::Manjaro => "Manjaro",
            Self::EndeavourOS => "EndeavourOS",
            Self::Alma => "AlmaLinux",
            Self::CentOS => "CentOS",
            Self::Rocky => "Rocky Linux",
            Self::Fedora => "Fedora",
            Self::Debian => "Debian",
            Self::Lmde => "LMDE",
            Self::Ubuntu => "Ubuntu",
            Self::Mint => "Linux Mint",
            Self::PopOS => "Pop!_OS",
            Self::OpenSUSE => "openSUSE",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(reason) => write!(f, "Unknown ({})", reason),
            _ => write!(f, "{}", self.name()),
        }
    }
}

impl FromStr for OperatingSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let os = match s.to_ascii_lowercase().as_str() {
            "arch" => Self::Arch,
            "manjaro" => Self::Manjaro,
            "endeavouros" => Self::EndeavourOS,
            "alma" | "almalinux" => Self::Alma,
            "centos" => Self::CentOS,
            "rocky" => Self::Rocky,
            "fedora" => Self::Fedora,
            "debian" => Self::Debian,
            "lmde" => Self::Lmde,
            "ubuntu" => Self::Ubuntu,
            "mint" | "linuxmint" => Self::Mint,
            "pop" | "popos" => Self::PopOS,
            "suse" | "opensuse" => Self::OpenSUSE,
            other => return Err(format!("unknown distribution id '{}'", other)),
        };
        Ok(os)
    }
}

/// The resolved (distribution, repository family, package manager) triple.
///
/// Only known systems can produce one, so anything holding a `Distribution`
/// is safe to drive a package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub id: OperatingSystem,
    pub family: RepositoryFamily,
    pub package_manager: PackageManager,
}

impl Distribution {
    pub fn from_os(os: OperatingSystem) -> Option<Self> {
        let family = os.repository_family()?;
        let package_manager = os.package_manager()?;
        Some(Self {
            id: os,
            family,
            package_manager,
        })
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (family: {}, package manager: {})",
            self.id, self.family, self.package_manager
        )
    }
}
