//! Ordered override chains for concrete identifiers.

use crate::common::distro::{Distribution, OperatingSystem, RepositoryFamily};

use super::PackageManager;

/// What an override applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTarget {
    /// A single distribution.
    Distro(OperatingSystem),
    /// Every distribution in a repository family.
    Family(RepositoryFamily),
    /// Every distribution using a package manager.
    Manager(PackageManager),
    /// Every distribution.
    All,
}

impl RuleTarget {
    /// Lower rank is more specific and is consulted first.
    fn rank(&self) -> u8 {
        match self {
            Self::Distro(_) => 0,
            Self::Family(_) => 1,
            Self::Manager(_) => 2,
            Self::All => 3,
        }
    }

    fn matches(&self, distribution: &Distribution) -> bool {
        match self {
            Self::Distro(os) => *os == distribution.id,
            Self::Family(family) => *family == distribution.family,
            Self::Manager(manager) => *manager == distribution.package_manager,
            Self::All => true,
        }
    }
}

/// A default identifier list overridden per distro, family, manager or all.
///
/// Lookup order is distro, then family, then manager, then `All`, then the
/// default. The first matching override wins, even when its list is empty:
/// an empty list means "unavailable here", which is different from having no
/// override at all.
#[derive(Debug, Clone)]
pub struct NameRule {
    pub default: &'static [&'static str],
    pub overrides: &'static [(RuleTarget, &'static [&'static str])],
}

impl NameRule {
    /// No identifiers anywhere.
    pub const NONE: NameRule = NameRule {
        default: &[],
        overrides: &[],
    };

    pub fn resolve(&self, distribution: &Distribution) -> &'static [&'static str] {
        (0..=3)
            .find_map(|rank| {
                self.overrides
                    .iter()
                    .find(|(target, _)| target.rank() == rank && target.matches(distribution))
            })
            .map(|(_, names)| *names)
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(os: OperatingSystem) -> Distribution {
        Distribution::from_os(os).unwrap()
    }

    // Every tier present: each distribution should see the most specific one.
    static ALL_TIERS: NameRule = NameRule {
        default: &["default"],
        overrides: &[
            (RuleTarget::All, &["all"]),
            (RuleTarget::Manager(PackageManager::Dnf), &["manager"]),
            (RuleTarget::Family(RepositoryFamily::RedHat), &["family"]),
            (RuleTarget::Distro(OperatingSystem::Rocky), &["distro"]),
        ],
    };

    #[test]
    fn test_distro_beats_family_manager_and_all() {
        assert_eq!(ALL_TIERS.resolve(&dist(OperatingSystem::Rocky)), ["distro"]);
    }

    #[test]
    fn test_family_beats_manager() {
        assert_eq!(ALL_TIERS.resolve(&dist(OperatingSystem::Alma)), ["family"]);
        assert_eq!(ALL_TIERS.resolve(&dist(OperatingSystem::CentOS)), ["family"]);
    }

    #[test]
    fn test_manager_beats_all() {
        assert_eq!(ALL_TIERS.resolve(&dist(OperatingSystem::Fedora)), ["manager"]);
    }

    #[test]
    fn test_all_beats_default() {
        assert_eq!(ALL_TIERS.resolve(&dist(OperatingSystem::Arch)), ["all"]);
    }

    static NO_ALL: NameRule = NameRule {
        default: &["default"],
        overrides: &[
            (RuleTarget::Manager(PackageManager::Apt), &["manager"]),
            (RuleTarget::Family(RepositoryFamily::Ubuntu), &["family"]),
        ],
    };

    #[test]
    fn test_falls_through_to_default() {
        assert_eq!(NO_ALL.resolve(&dist(OperatingSystem::OpenSUSE)), ["default"]);
        assert_eq!(NO_ALL.resolve(&dist(OperatingSystem::Debian)), ["manager"]);
        assert_eq!(NO_ALL.resolve(&dist(OperatingSystem::Mint)), ["family"]);
    }

    static EMPTY_OVERRIDE: NameRule = NameRule {
        default: &["id3v2"],
        overrides: &[
            (RuleTarget::Manager(PackageManager::Dnf), &["id3v2-dnf"]),
            (RuleTarget::Family(RepositoryFamily::RedHat), &[]),
        ],
    };

    #[test]
    fn test_empty_override_is_a_match() {
        assert!(EMPTY_OVERRIDE.resolve(&dist(OperatingSystem::CentOS)).is_empty());
        assert_eq!(
            EMPTY_OVERRIDE.resolve(&dist(OperatingSystem::Fedora)),
            ["id3v2-dnf"]
        );
    }

    static SAME_TIER: NameRule = NameRule {
        default: &[],
        overrides: &[
            (RuleTarget::Manager(PackageManager::Pacman), &["first"]),
            (RuleTarget::Manager(PackageManager::Pacman), &["second"]),
        ],
    };

    #[test]
    fn test_first_override_within_tier_wins_deterministically() {
        let arch = dist(OperatingSystem::Arch);
        for _ in 0..3 {
            assert_eq!(SAME_TIER.resolve(&arch), ["first"]);
        }
    }
}
