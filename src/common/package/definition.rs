//! Package definition - how one catalog entry maps onto each install method.

use std::fmt;
use std::str::FromStr;

use super::{InstallMethod, NameRule};
use crate::common::desktop::DesktopEnvironment;
use crate::common::distro::Distribution;

/// Menu grouping for catalog entries. Declaration order is menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Server,
    Desktop,
    Applications,
    Browsers,
    Communication,
    Games,
    MultiMedia,
    Editors,
    Software,
    Utilities,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Self::Server,
        Self::Desktop,
        Self::Applications,
        Self::Browsers,
        Self::Communication,
        Self::Games,
        Self::MultiMedia,
        Self::Editors,
        Self::Software,
        Self::Utilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "Server",
            Self::Desktop => "Desktop",
            Self::Applications => "Applications",
            Self::Browsers => "Browsers",
            Self::Communication => "Communication",
            Self::Games => "Games",
            Self::MultiMedia => "Multi Media",
            Self::Editors => "Editors",
            Self::Software => "Software",
            Self::Utilities => "Utilities",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| c.is_alphanumeric()).collect();
        Self::ALL
            .into_iter()
            .find(|c| {
                c.as_str()
                    .chars()
                    .filter(|ch| ch.is_alphanumeric())
                    .collect::<String>()
                    .eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Flatpak application id and the remote it comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatpakSpec {
    pub id: &'static str,
    /// `None` installs from the configured default remote.
    pub remote: Option<&'static str>,
}

impl FlatpakSpec {
    pub const fn new(id: &'static str) -> Self {
        Self { id, remote: None }
    }

    pub const fn from_remote(mut self, remote: &'static str) -> Self {
        self.remote = Some(remote);
        self
    }
}

/// Snap name plus install flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapSpec {
    pub id: &'static str,
    /// Published by the upstream project (verified publisher).
    pub is_official: bool,
    pub is_classic: bool,
    /// Empty means the default channel.
    pub channel: &'static str,
}

impl SnapSpec {
    /// An official, strictly confined snap on the default channel.
    pub const fn new(id: &'static str) -> Self {
        Self {
            id,
            is_official: true,
            is_classic: false,
            channel: "",
        }
    }

    pub const fn classic(mut self) -> Self {
        self.is_classic = true;
        self
    }

    pub const fn unofficial(mut self) -> Self {
        self.is_official = false;
        self
    }

    pub const fn channel(mut self, channel: &'static str) -> Self {
        self.channel = channel;
        self
    }

    /// Channel to follow when switching an installed snap to this entry.
    pub fn channel_or_default(&self) -> &'static str {
        if self.channel.is_empty() {
            "latest/stable"
        } else {
            self.channel
        }
    }
}

/// Track part of a snap channel: `18/stable` is `18`, `esr-stable` is `esr`,
/// and a bare risk level or an empty channel is `latest`.
pub fn channel_track(channel: &str) -> &str {
    const RISKS: [&str; 4] = ["stable", "candidate", "beta", "edge"];
    let track = match channel.split_once('/') {
        Some((track, _)) => track,
        None => RISKS
            .iter()
            .find_map(|risk| channel.strip_suffix(risk)?.strip_suffix('-'))
            .unwrap_or(channel),
    };
    if track.is_empty() || RISKS.contains(&track) {
        "latest"
    } else {
        track
    }
}

/// A catalog entry.
#[derive(Debug, Clone)]
pub struct PackageSpec {
    /// Stable identifier used on the command line and in config.
    pub key: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    /// Concrete repository package names.
    pub repository: NameRule,
    /// Module streams to enable before a repository install.
    pub modules: NameRule,
    pub flatpak: Option<FlatpakSpec>,
    pub snap: Option<SnapSpec>,
    /// Only offered on this desktop environment.
    pub desktop_environment: Option<DesktopEnvironment>,
}

impl PackageSpec {
    pub fn repository_names(&self, distribution: &Distribution) -> &'static [&'static str] {
        self.repository.resolve(distribution)
    }

    pub fn module_names(&self, distribution: &Distribution) -> &'static [&'static str] {
        self.modules.resolve(distribution)
    }

    /// Concrete identifiers for a method on this distribution. Empty means
    /// the method cannot install this package here.
    pub fn identifiers(
        &self,
        method: InstallMethod,
        distribution: &Distribution,
    ) -> Vec<&'static str> {
        match method {
            InstallMethod::Repository => self.repository_names(distribution).to_vec(),
            InstallMethod::Flatpak => self.flatpak.iter().map(|f| f.id).collect(),
            InstallMethod::Snap => self.snap.iter().map(|s| s.id).collect(),
        }
    }

    pub fn is_available(&self, method: InstallMethod, distribution: &Distribution) -> bool {
        !self.identifiers(method, distribution).is_empty()
    }

    /// Methods that can install this package here, in precedence order.
    pub fn available_methods(&self, distribution: &Distribution) -> Vec<InstallMethod> {
        InstallMethod::ALL
            .into_iter()
            .filter(|m| self.is_available(*m, distribution))
            .collect()
    }

    /// Whether the entry should be shown on the given desktop.
    pub fn visible_on(&self, desktop: Option<DesktopEnvironment>) -> bool {
        match self.desktop_environment {
            None => true,
            Some(required) => desktop == Some(required),
        }
    }
}
