pub mod tweaks;

use std::env;
use std::fmt;

/// Desktop environments some catalog entries are tied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesktopEnvironment {
    Gnome,
    Plasma,
}

impl DesktopEnvironment {
    /// Detect the running desktop from the session environment.
    ///
    /// Returns `None` on servers, in plain TTY sessions and on desktops that
    /// no catalog entry targets.
    pub fn detect() -> Option<Self> {
        ["XDG_CURRENT_DESKTOP", "XDG_SESSION_DESKTOP", "DESKTOP_SESSION"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find_map(|value| Self::from_session(&value))
    }

    /// Classify a session name such as `ubuntu:GNOME` or `KDE`.
    pub fn from_session(value: &str) -> Option<Self> {
        value.split(':').find_map(|part| {
            match part.trim().to_ascii_lowercase().as_str() {
                "gnome" | "gnome-classic" | "gnome-xorg" => Some(Self::Gnome),
                "kde" | "plasma" | "plasmawayland" => Some(Self::Plasma),
                _ => None,
            }
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gnome => "gnome",
            Self::Plasma => "plasma",
        }
    }
}

impl fmt::Display for DesktopEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gnome => write!(f, "GNOME"),
            Self::Plasma => write!(f, "KDE Plasma"),
        }
    }
}
