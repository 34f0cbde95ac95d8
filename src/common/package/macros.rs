//! Macros for defining catalog entries.

/// Build a [`NameRule`](crate::common::package::NameRule) from a default list
/// and optional `target => [names]` overrides.
///
/// # Examples
///
/// ```ignore
/// // Same name everywhere
/// names!(["curl"]);
///
/// // Different name on one family, unavailable on another
/// names!(["vim"]; Manager(Pm::Dnf) => ["vim-enhanced"], Family(Fam::RedHat) => []);
/// ```
#[macro_export]
macro_rules! names {
    ([$($default:literal),* $(,)?]) => {
        $crate::common::package::NameRule {
            default: &[$($default),*],
            overrides: &[],
        }
    };

    ([$($default:literal),* $(,)?]; $($target:expr => [$($name:literal),* $(,)?]),+ $(,)?) => {
        $crate::common::package::NameRule {
            default: &[$($default),*],
            overrides: &[$(($target, &[$($name),*])),+],
        }
    };
}

/// Define a [`PackageSpec`](crate::common::package::PackageSpec).
///
/// Only key, display name, category and repository rule are required. The
/// optional fields must appear in the order `modules`, `flatpak`, `snap`,
/// `desktop`.
///
/// ```ignore
/// package! {
///     "node", "Node.js - JavaScript RE", Server,
///     repo: names!(["nodejs", "npm"]; Manager(Pm::Zypper) => ["nodejs16", "npm16"]),
///     modules: names!([]; Manager(Pm::Dnf) => ["nodejs:18"]),
///     snap: SnapSpec::new("node").classic().channel("18/stable"),
/// }
/// ```
#[macro_export]
macro_rules! package {
    (@or [] $fallback:expr) => {
        $fallback
    };
    (@or [$value:expr] $fallback:expr) => {
        $value
    };
    (@some []) => {
        None
    };
    (@some [$value:expr]) => {
        Some($value)
    };

    (
        $key:literal, $display:literal, $category:ident,
        repo: $repo:expr
        $(, modules: $modules:expr)?
        $(, flatpak: $flatpak:expr)?
        $(, snap: $snap:expr)?
        $(, desktop: $desktop:ident)?
        $(,)?
    ) => {
        $crate::common::package::PackageSpec {
            key: $key,
            display_name: $display,
            category: $crate::common::package::Category::$category,
            repository: $repo,
            modules: $crate::package!(@or [$($modules)?] $crate::common::package::NameRule::NONE),
            flatpak: $crate::package!(@some [$($flatpak)?]),
            snap: $crate::package!(@some [$($snap)?]),
            desktop_environment: $crate::package!(
                @some [$($crate::common::desktop::DesktopEnvironment::$desktop)?]
            ),
        }
    };
}
