//! Reconciliation of desired install methods against what is installed.
//!
//! [`plan`] is pure: it turns a desired state into an ordered list of
//! operations. [`Reconciler::apply`] runs them, isolates per-package failures
//! and keeps the in-memory [`InstallState`] current without listing again.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::catalog::{Catalog, CatalogError};
use super::installed::Snapshot;
use super::provider::Providers;
use super::{InstallMethod, PackageSpec, SnapSpec, channel_track};
use crate::common::distro::Distribution;
use crate::ui::prelude::*;

/// What the user wants for one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "target", content = "method")]
pub enum Target {
    NotInstalled,
    Via(InstallMethod),
}

impl Target {
    pub fn method(&self) -> Option<InstallMethod> {
        match self {
            Self::NotInstalled => None,
            Self::Via(method) => Some(*method),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled => f.write_str("none"),
            Self::Via(method) => write!(f, "{}", method),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "remove" | "uninstall" => Ok(Self::NotInstalled),
            other => other.parse().map(Self::Via),
        }
    }
}

/// Desired target per package key. Keys not listed are left alone.
pub type DesiredState = BTreeMap<String, Target>;

/// Parse `key=method` into a desired-state entry.
pub fn parse_assignment(s: &str) -> Result<(String, Target), String> {
    let (key, target) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=METHOD, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing package key in '{}'", s));
    }
    Ok((key.to_string(), target.trim().parse()?))
}

/// Which method each package is currently installed through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallState {
    active: BTreeMap<String, InstallMethod>,
    snapshot: Snapshot,
}

impl InstallState {
    /// Derive per-package state from an installed-state snapshot.
    ///
    /// A package found through several methods is reported under the first
    /// one in [`InstallMethod::ALL`] order.
    pub fn from_snapshot(
        catalog: &Catalog,
        distribution: &Distribution,
        snapshot: Snapshot,
    ) -> Self {
        let active = catalog
            .iter()
            .filter_map(|spec| {
                detect(catalog, spec, distribution, &snapshot).map(|m| (spec.key.to_string(), m))
            })
            .collect();
        Self { active, snapshot }
    }

    pub fn active(&self, key: &str) -> Option<InstallMethod> {
        self.active.get(key).copied()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, InstallMethod)> {
        self.active.iter().map(|(k, m)| (k.as_str(), *m))
    }

    /// Note identifiers installed through `method`. `channel` is the snap
    /// channel now tracked, for snaps.
    fn record_installed(
        &mut self,
        catalog: &Catalog,
        distribution: &Distribution,
        key: &str,
        method: InstallMethod,
        ids: &[String],
        channel: Option<&str>,
    ) {
        self.snapshot.ids_mut(method).extend(ids.iter().cloned());
        if let Some(channel) = channel {
            for id in ids {
                self.snapshot
                    .snap_tracking
                    .insert(id.clone(), channel.to_string());
            }
        }
        self.refresh(catalog, distribution, key, method, ids);
    }

    fn record_removed(
        &mut self,
        catalog: &Catalog,
        distribution: &Distribution,
        key: &str,
        method: InstallMethod,
        ids: &[String],
    ) {
        for id in ids {
            self.snapshot.ids_mut(method).remove(id);
            if method == InstallMethod::Snap {
                self.snapshot.snap_tracking.remove(id);
            }
        }
        self.refresh(catalog, distribution, key, method, ids);
    }

    /// Re-derive the active method of `key` and of every package sharing one
    /// of the touched identifiers.
    fn refresh(
        &mut self,
        catalog: &Catalog,
        distribution: &Distribution,
        key: &str,
        method: InstallMethod,
        ids: &[String],
    ) {
        for spec in catalog.iter() {
            let touched = spec.key == key
                || spec
                    .identifiers(method, distribution)
                    .iter()
                    .any(|id| ids.iter().any(|touched| touched == id));
            if !touched {
                continue;
            }
            match detect(catalog, spec, distribution, &self.snapshot) {
                Some(active) => self.active.insert(spec.key.to_string(), active),
                None => self.active.remove(spec.key),
            };
        }
    }
}

fn detect(
    catalog: &Catalog,
    spec: &PackageSpec,
    distribution: &Distribution,
    snapshot: &Snapshot,
) -> Option<InstallMethod> {
    InstallMethod::ALL.into_iter().find(|&method| match (method, spec.snap) {
        (InstallMethod::Snap, Some(snap)) => snap_claims(catalog, &snap, snapshot),
        _ => spec
            .identifiers(method, distribution)
            .iter()
            .any(|id| snapshot.contains(method, id)),
    })
}

/// Whether an installed snap belongs to the entry described by `snap`.
///
/// Entries sharing a snap name are told apart by the tracked channel. When
/// the channel is unknown, or no entry follows it, every entry claims the snap.
fn snap_claims(catalog: &Catalog, snap: &SnapSpec, snapshot: &Snapshot) -> bool {
    if !snapshot.contains(InstallMethod::Snap, snap.id) {
        return false;
    }
    let Some(tracking) = snapshot.snap_tracking.get(snap.id) else {
        return true;
    };
    let tracked = channel_track(tracking);
    if channel_track(snap.channel) == tracked {
        return true;
    }
    !catalog
        .iter()
        .filter_map(|other| other.snap)
        .any(|other| other.id == snap.id && channel_track(other.channel) == tracked)
}

/// One step of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Operation {
    EnableModules {
        key: String,
        modules: Vec<String>,
    },
    Remove {
        key: String,
        method: InstallMethod,
        ids: Vec<String>,
    },
    Install {
        key: String,
        method: InstallMethod,
        ids: Vec<String>,
    },
    /// The desired method has no identifier on this distribution.
    Unavailable {
        key: String,
        method: InstallMethod,
    },
}

impl Operation {
    pub fn key(&self) -> &str {
        match self {
            Self::EnableModules { key, .. }
            | Self::Remove { key, .. }
            | Self::Install { key, .. }
            | Self::Unavailable { key, .. } => key,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnableModules { key, modules } => {
                write!(f, "enable modules {} for {}", modules.join(" "), key)
            }
            Self::Remove { key, method, ids } if ids.is_empty() => {
                write!(f, "forget {} ({} install already gone)", key, method)
            }
            Self::Remove { key, method, ids } => {
                write!(f, "remove {} via {}: {}", key, method, ids.join(" "))
            }
            Self::Install { key, method, ids } => {
                write!(f, "install {} via {}: {}", key, method, ids.join(" "))
            }
            Self::Unavailable { key, method } => {
                write!(f, "{} is not available via {} here", key, method)
            }
        }
    }
}

/// Compute the operations that move `state` to `desired`.
///
/// Per package, any active method that differs from the desired one is
/// removed before the desired one is installed. A desired method without
/// identifiers on this distribution yields [`Operation::Unavailable`] and
/// leaves the current install untouched.
pub fn plan(
    catalog: &Catalog,
    distribution: &Distribution,
    state: &InstallState,
    desired: &DesiredState,
) -> Result<Vec<Operation>, CatalogError> {
    let mut operations = Vec::new();

    for (key, target) in desired {
        let spec = catalog.spec(key)?;
        let active = state.active(key);
        let wanted = target.method();
        if active == wanted {
            continue;
        }

        let install_ids = wanted.map(|method| spec.identifiers(method, distribution));
        if let (Some(method), Some(ids)) = (wanted, &install_ids)
            && ids.is_empty()
        {
            operations.push(Operation::Unavailable {
                key: key.clone(),
                method,
            });
            continue;
        }

        if let Some(method) = active {
            let present = state
                .snapshot()
                .present(method, &spec.identifiers(method, distribution));
            operations.push(Operation::Remove {
                key: key.clone(),
                method,
                ids: present.iter().map(|id| id.to_string()).collect(),
            });
        }

        if let (Some(method), Some(ids)) = (wanted, install_ids) {
            if method == InstallMethod::Repository {
                let modules = catalog.resolve_modules(key, distribution)?;
                if !modules.is_empty() {
                    operations.push(Operation::EnableModules {
                        key: key.clone(),
                        modules,
                    });
                }
            }
            operations.push(Operation::Install {
                key: key.clone(),
                method,
                ids: ids.iter().map(|id| id.to_string()).collect(),
            });
        }
    }

    Ok(operations)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum Outcome {
    Ok,
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub operation: Operation,
    pub outcome: Outcome,
}

impl OperationReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

/// Result of the one-time Flatpak / Snap setup, kept for the whole session.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    flatpak: Option<Result<(), String>>,
    snap: Option<Result<(), String>>,
}

impl Bootstrap {
    fn slot(&mut self, method: InstallMethod) -> Option<&mut Option<Result<(), String>>> {
        match method {
            InstallMethod::Repository => None,
            InstallMethod::Flatpak => Some(&mut self.flatpak),
            InstallMethod::Snap => Some(&mut self.snap),
        }
    }
}

/// Runs planned operations against the system.
pub struct Reconciler<'a> {
    catalog: &'a Catalog,
    distribution: &'a Distribution,
    providers: Providers<'a>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        catalog: &'a Catalog,
        distribution: &'a Distribution,
        providers: Providers<'a>,
    ) -> Self {
        Self {
            catalog,
            distribution,
            providers,
        }
    }

    /// Run `operations` in order and report each one.
    ///
    /// Failures stay inside the returned reports. If removing a package's
    /// previous install fails, its new install is skipped so a package never
    /// ends up active through two methods.
    pub fn apply(
        &self,
        state: &mut InstallState,
        bootstrap: &mut Bootstrap,
        operations: &[Operation],
    ) -> Vec<OperationReport> {
        let mut failed_removals = BTreeSet::new();

        operations
            .iter()
            .map(|operation| {
                let outcome = match operation {
                    Operation::EnableModules { modules, .. } => self.enable_modules(modules),
                    Operation::Remove { key, method, ids } => {
                        let outcome = self.remove(state, key, *method, ids);
                        if matches!(outcome, Outcome::Failed(_)) {
                            failed_removals.insert(key.clone());
                        }
                        outcome
                    }
                    Operation::Install { key, .. } if failed_removals.contains(key) => {
                        Outcome::Skipped("previous install could not be removed".to_string())
                    }
                    Operation::Install { key, method, ids } => {
                        self.install(state, bootstrap, key, *method, ids)
                    }
                    Operation::Unavailable { method, .. } => Outcome::Skipped(format!(
                        "no {} package for {}",
                        method.display_name(),
                        self.distribution.id
                    )),
                };
                report(operation, &outcome);
                OperationReport {
                    operation: operation.clone(),
                    outcome,
                }
            })
            .collect()
    }

    fn enable_modules(&self, modules: &[String]) -> Outcome {
        let modules: Vec<&str> = modules.iter().map(String::as_str).collect();
        emit(
            Level::Info,
            "reconcile.modules",
            &format!("Enabling module streams: {}", modules.join(" ")),
            None,
        );
        match self.providers.enable_modules(&modules) {
            Ok(true) => Outcome::Ok,
            Ok(false) => Outcome::Skipped(format!(
                "{} has no module streams",
                self.providers.manager().display_name()
            )),
            Err(e) => Outcome::Failed(format!("{:#}", e)),
        }
    }

    fn remove(
        &self,
        state: &mut InstallState,
        key: &str,
        method: InstallMethod,
        ids: &[String],
    ) -> Outcome {
        // An earlier operation on a package sharing these identifiers already
        // replaced this install.
        if state.active(key) != Some(method) {
            return Outcome::Skipped(format!(
                "{} is no longer installed via {}",
                key,
                method.display_name()
            ));
        }
        if ids.is_empty() {
            state.record_removed(self.catalog, self.distribution, key, method, ids);
            return Outcome::Ok;
        }

        emit(
            Level::Info,
            "reconcile.remove",
            &format!("Removing {} via {}: {}", key, method.display_name(), ids.join(" ")),
            Some(serde_json::json!({ "key": key, "method": method, "ids": ids })),
        );

        let result = match method {
            InstallMethod::Repository => {
                let names: Vec<&str> = ids.iter().map(String::as_str).collect();
                self.providers.remove_repository(&names)
            }
            InstallMethod::Flatpak => ids
                .iter()
                .try_for_each(|id| self.providers.remove_flatpak(id)),
            InstallMethod::Snap => ids.iter().try_for_each(|id| self.providers.remove_snap(id)),
        };

        match result {
            Ok(()) => {
                state.record_removed(self.catalog, self.distribution, key, method, ids);
                Outcome::Ok
            }
            Err(e) => Outcome::Failed(format!("{:#}", e)),
        }
    }

    fn install(
        &self,
        state: &mut InstallState,
        bootstrap: &mut Bootstrap,
        key: &str,
        method: InstallMethod,
        ids: &[String],
    ) -> Outcome {
        if let Err(reason) = self.ensure_bootstrapped(state, bootstrap, method) {
            return Outcome::Failed(reason);
        }

        emit(
            Level::Info,
            "reconcile.install",
            &format!("Installing {} via {}: {}", key, method.display_name(), ids.join(" ")),
            Some(serde_json::json!({ "key": key, "method": method, "ids": ids })),
        );

        let spec = match self.catalog.spec(key) {
            Ok(spec) => spec,
            Err(e) => return Outcome::Failed(e.to_string()),
        };
        let mut channel = None;
        let result = match method {
            InstallMethod::Repository => {
                let names: Vec<&str> = ids.iter().map(String::as_str).collect();
                self.providers.install_repository(&names)
            }
            InstallMethod::Flatpak => match &spec.flatpak {
                Some(flatpak) => self.providers.install_flatpak(flatpak),
                None => Err(anyhow::anyhow!("{} has no Flatpak", key)),
            },
            InstallMethod::Snap => match &spec.snap {
                Some(snap) => {
                    channel = Some(snap.channel_or_default());
                    // Another entry owns this snap name on a different channel.
                    if state.snapshot().contains(InstallMethod::Snap, snap.id) {
                        self.providers.switch_snap(snap)
                    } else {
                        self.providers.install_snap(snap)
                    }
                }
                None => Err(anyhow::anyhow!("{} has no Snap", key)),
            },
        };

        match result {
            Ok(()) => {
                state.record_installed(self.catalog, self.distribution, key, method, ids, channel);
                Outcome::Ok
            }
            Err(e) => Outcome::Failed(format!("{:#}", e)),
        }
    }

    /// Set up Flatpak or Snap the first time one of them is needed.
    fn ensure_bootstrapped(
        &self,
        state: &mut InstallState,
        bootstrap: &mut Bootstrap,
        method: InstallMethod,
    ) -> Result<(), String> {
        let Some(slot) = bootstrap.slot(method) else {
            return Ok(());
        };
        if let Some(previous) = slot {
            return previous.clone();
        }

        let runtime = self.catalog.runtime_packages(method, self.distribution);
        let result = match method {
            InstallMethod::Flatpak => self.providers.bootstrap_flatpak(runtime, self.distribution),
            InstallMethod::Snap => self.providers.bootstrap_snap(runtime, self.distribution),
            InstallMethod::Repository => Ok(Vec::new()),
        };

        let result = match result {
            Ok(installed) => {
                let installed: Vec<String> = installed.iter().map(|n| n.to_string()).collect();
                if let Some((_, runtime_key)) = method.runtime()
                    && !installed.is_empty()
                {
                    state.record_installed(
                        self.catalog,
                        self.distribution,
                        runtime_key,
                        InstallMethod::Repository,
                        &installed,
                        None,
                    );
                }
                Ok(())
            }
            Err(e) => Err(format!("{} setup failed: {:#}", method.display_name(), e)),
        };
        *slot = Some(result.clone());
        result
    }
}

fn report(operation: &Operation, outcome: &Outcome) {
    let data = serde_json::to_value(OperationReport {
        operation: operation.clone(),
        outcome: outcome.clone(),
    })
    .ok();
    match outcome {
        Outcome::Ok => emit(Level::Success, "reconcile.ok", &format!("Done: {}", operation), data),
        Outcome::Failed(reason) => emit(
            Level::Error,
            "reconcile.failed",
            &format!("Failed to {}: {}", operation, reason),
            data,
        ),
        Outcome::Skipped(reason) => emit(
            Level::Warn,
            "reconcile.skipped",
            &format!("Skipped {}: {}", operation.key(), reason),
            data,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::Config;
    use crate::common::distro::OperatingSystem;
    use crate::common::exec::testing::RecordingRunner;
    use crate::common::package::{
        FlatpakSpec, NameRule, PackageManager, PackageSpec, RuleTarget, SnapSpec,
    };
    use crate::{names, package};

    static TABLE: &[PackageSpec] = &[
        package! {
            "node", "Node.js", Server,
            repo: names!(["nodejs", "npm"]; RuleTarget::Manager(PackageManager::Zypper) => ["nodejs16", "npm16"]),
            modules: names!([]; RuleTarget::Manager(PackageManager::Dnf) => ["nodejs:18"]),
            snap: SnapSpec::new("node").classic().channel("18/stable"),
        },
        package! {
            "code", "VS Code", Editors,
            repo: names!(["code"]),
            flatpak: FlatpakSpec::new("com.visualstudio.code"),
            snap: SnapSpec::new("code").classic(),
        },
        package! {
            "id3v2", "MP3 Metadata Editor", Desktop,
            repo: names!(["id3v2"]; RuleTarget::Family(crate::common::distro::RepositoryFamily::RedHat) => []),
        },
        package! {
            "flatpak", "Flatpak", Server,
            repo: names!(["flatpak"]),
        },
        package! {
            "snapd", "Snap", Server,
            repo: names!(["snapd"]; RuleTarget::Manager(PackageManager::Pacman) => []),
        },
        package! {
            "gimp", "GIMP", MultiMedia,
            repo: NameRule::NONE,
            flatpak: FlatpakSpec::new("org.gimp.GIMP"),
        },
    ];

    fn catalog() -> Catalog {
        Catalog::new(TABLE).unwrap()
    }

    fn dist(os: OperatingSystem) -> Distribution {
        Distribution::from_os(os).unwrap()
    }

    fn snapshot(repository: &[&str], flatpak: &[&str], snap: &[&str]) -> Snapshot {
        let set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Snapshot {
            repository: set(repository),
            flatpak: set(flatpak),
            snap: set(snap),
            ..Snapshot::default()
        }
    }

    /// Flatpak already set up earlier in the session.
    fn flatpak_ready() -> Bootstrap {
        Bootstrap {
            flatpak: Some(Ok(())),
            snap: None,
        }
    }

    fn desired(entries: &[(&str, Target)]) -> DesiredState {
        entries
            .iter()
            .map(|(k, t)| (k.to_string(), *t))
            .collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_state_precedence() {
        let catalog = catalog();
        let fedora = dist(OperatingSystem::Fedora);
        let state = InstallState::from_snapshot(
            &catalog,
            &fedora,
            snapshot(&["code"], &["com.visualstudio.code"], &["code", "node"]),
        );
        assert_eq!(state.active("code"), Some(InstallMethod::Repository));
        assert_eq!(state.active("node"), Some(InstallMethod::Snap));
        assert_eq!(state.active("gimp"), None);
    }

    #[test]
    fn test_switch_snap_to_repository() {
        let catalog = catalog();
        let fedora = dist(OperatingSystem::Fedora);
        let runner = RecordingRunner::new().with_commands(&["dnf", "snap"]);
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &fedora, snapshot(&[], &[], &["node"]));
        let mut bootstrap = Bootstrap::default();

        let want = desired(&[("node", Target::Via(InstallMethod::Repository))]);
        let operations = plan(&catalog, &fedora, &state, &want).unwrap();
        assert_eq!(
            operations,
            vec![
                Operation::Remove {
                    key: "node".into(),
                    method: InstallMethod::Snap,
                    ids: strings(&["node"]),
                },
                Operation::EnableModules {
                    key: "node".into(),
                    modules: strings(&["nodejs:18"]),
                },
                Operation::Install {
                    key: "node".into(),
                    method: InstallMethod::Repository,
                    ids: strings(&["nodejs", "npm"]),
                },
            ]
        );

        let reconciler = Reconciler::new(
            &catalog,
            &fedora,
            Providers::new(&runner, PackageManager::Dnf, &config),
        );
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);
        assert!(reports.iter().all(|r| r.outcome == Outcome::Ok));
        assert_eq!(
            runner.calls(),
            vec![
                "snap remove node",
                "dnf module enable nodejs:18 -y",
                "dnf install nodejs npm -y"
            ]
        );
        assert_eq!(state.active("node"), Some(InstallMethod::Repository));
        assert!(!state.snapshot().contains(InstallMethod::Snap, "node"));
    }

    #[test]
    fn test_switch_repository_to_flatpak() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let runner = RecordingRunner::new().with_commands(&["pacman", "flatpak"]);
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &arch, snapshot(&["code"], &[], &[]));
        let mut bootstrap = flatpak_ready();

        let want = desired(&[("code", Target::Via(InstallMethod::Flatpak))]);
        let operations = plan(&catalog, &arch, &state, &want).unwrap();
        assert_eq!(
            operations,
            vec![
                Operation::Remove {
                    key: "code".into(),
                    method: InstallMethod::Repository,
                    ids: strings(&["code"]),
                },
                Operation::Install {
                    key: "code".into(),
                    method: InstallMethod::Flatpak,
                    ids: strings(&["com.visualstudio.code"]),
                },
            ]
        );

        let reconciler = Reconciler::new(
            &catalog,
            &arch,
            Providers::new(&runner, PackageManager::Pacman, &config),
        );
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);
        assert!(reports.iter().all(|r| r.outcome == Outcome::Ok));
        assert_eq!(
            runner.calls(),
            vec![
                "pacman -Rsun code --noconfirm",
                "flatpak install flathub com.visualstudio.code -y"
            ]
        );
        assert_eq!(state.active("code"), Some(InstallMethod::Flatpak));
    }

    #[test]
    fn test_removing_shared_snap_updates_every_owner() {
        let catalog = Catalog::builtin().unwrap();
        let ubuntu = dist(OperatingSystem::Ubuntu);
        let runner = RecordingRunner::new().with_commands(&["apt", "flatpak", "snap"]);
        let config = Config::default();
        let mut state =
            InstallState::from_snapshot(&catalog, &ubuntu, snapshot(&[], &[], &["firefox"]));
        let mut bootstrap = flatpak_ready();
        assert_eq!(state.active("firefox"), Some(InstallMethod::Snap));
        assert_eq!(state.active("firefox-esr"), Some(InstallMethod::Snap));

        let want = desired(&[("firefox", Target::Via(InstallMethod::Flatpak))]);
        let operations = plan(&catalog, &ubuntu, &state, &want).unwrap();
        let reconciler = Reconciler::new(
            &catalog,
            &ubuntu,
            Providers::new(&runner, PackageManager::Apt, &config),
        );
        reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert_eq!(
            runner.calls(),
            vec![
                "snap remove firefox",
                "flatpak install flathub org.mozilla.firefox -y"
            ]
        );
        assert_eq!(state.active("firefox"), Some(InstallMethod::Flatpak));
        assert_eq!(state.active("firefox-esr"), None);
    }

    #[test]
    fn test_shared_snap_follows_tracked_channel() {
        let catalog = Catalog::builtin().unwrap();
        let ubuntu = dist(OperatingSystem::Ubuntu);
        let runner = RecordingRunner::new().with_commands(&["apt", "snap"]);
        let config = Config::default();
        let mut snapshot = snapshot(&[], &[], &["firefox"]);
        snapshot
            .snap_tracking
            .insert("firefox".into(), "esr/stable".into());
        let mut state = InstallState::from_snapshot(&catalog, &ubuntu, snapshot);
        let mut bootstrap = Bootstrap::default();
        assert_eq!(state.active("firefox"), None);
        assert_eq!(state.active("firefox-esr"), Some(InstallMethod::Snap));

        let want = desired(&[("firefox", Target::Via(InstallMethod::Snap))]);
        let operations = plan(&catalog, &ubuntu, &state, &want).unwrap();
        assert_eq!(
            operations,
            vec![Operation::Install {
                key: "firefox".into(),
                method: InstallMethod::Snap,
                ids: strings(&["firefox"]),
            }]
        );

        let reconciler = Reconciler::new(
            &catalog,
            &ubuntu,
            Providers::new(&runner, PackageManager::Apt, &config),
        );
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);
        assert!(reports.iter().all(|r| r.outcome == Outcome::Ok));
        assert_eq!(
            runner.calls(),
            vec!["snap refresh firefox --channel latest/stable"]
        );
        assert_eq!(state.active("firefox"), Some(InstallMethod::Snap));
        assert_eq!(state.active("firefox-esr"), None);
        assert!(plan(&catalog, &ubuntu, &state, &want).unwrap().is_empty());
    }

    #[test]
    fn test_shared_flatpak_marks_both_entries() {
        let catalog = Catalog::builtin().unwrap();
        let fedora = dist(OperatingSystem::Fedora);
        let runner = RecordingRunner::new().with_commands(&["dnf", "flatpak"]);
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &fedora, Snapshot::default());
        let mut bootstrap = flatpak_ready();

        let want = desired(&[("transmission-gtk", Target::Via(InstallMethod::Flatpak))]);
        let operations = plan(&catalog, &fedora, &state, &want).unwrap();
        let reconciler = Reconciler::new(
            &catalog,
            &fedora,
            Providers::new(&runner, PackageManager::Dnf, &config),
        );
        reconciler.apply(&mut state, &mut bootstrap, &operations);
        assert_eq!(state.active("transmission-qt"), Some(InstallMethod::Flatpak));

        let want = desired(&[("transmission-qt", Target::NotInstalled)]);
        let operations = plan(&catalog, &fedora, &state, &want).unwrap();
        reconciler.apply(&mut state, &mut bootstrap, &operations);
        assert_eq!(state.active("transmission-gtk"), None);
        assert_eq!(
            runner.calls(),
            vec![
                "flatpak install flathub com.transmissionbt.Transmission -y",
                "flatpak remove com.transmissionbt.Transmission -y"
            ]
        );
    }

    #[test]
    fn test_reapplying_is_a_no_op() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let runner = RecordingRunner::new();
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &arch, Snapshot::default());
        let mut bootstrap = Bootstrap::default();
        let reconciler = Reconciler::new(
            &catalog,
            &arch,
            Providers::new(&runner, PackageManager::Pacman, &config),
        );

        let want = desired(&[
            ("code", Target::Via(InstallMethod::Repository)),
            ("node", Target::Via(InstallMethod::Repository)),
        ]);
        let first = plan(&catalog, &arch, &state, &want).unwrap();
        assert_eq!(first.len(), 2);
        reconciler.apply(&mut state, &mut bootstrap, &first);

        assert!(plan(&catalog, &arch, &state, &want).unwrap().is_empty());
    }

    #[test]
    fn test_unchanged_state_yields_no_operations() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let state = InstallState::from_snapshot(
            &catalog,
            &arch,
            snapshot(&["code"], &["org.gimp.GIMP"], &[]),
        );
        let want = desired(&[
            ("code", Target::Via(InstallMethod::Repository)),
            ("gimp", Target::Via(InstallMethod::Flatpak)),
            ("node", Target::NotInstalled),
        ]);
        assert!(plan(&catalog, &arch, &state, &want).unwrap().is_empty());
    }

    #[test]
    fn test_unavailable_method_never_runs_a_command() {
        let catalog = catalog();
        let centos = dist(OperatingSystem::CentOS);
        let runner = RecordingRunner::new();
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &centos, Snapshot::default());
        let mut bootstrap = Bootstrap::default();

        let want = desired(&[
            ("id3v2", Target::Via(InstallMethod::Repository)),
            ("gimp", Target::Via(InstallMethod::Snap)),
        ]);
        let operations = plan(&catalog, &centos, &state, &want).unwrap();
        assert_eq!(
            operations,
            vec![
                Operation::Unavailable {
                    key: "gimp".into(),
                    method: InstallMethod::Snap
                },
                Operation::Unavailable {
                    key: "id3v2".into(),
                    method: InstallMethod::Repository
                },
            ]
        );

        let reconciler = Reconciler::new(
            &catalog,
            &centos,
            Providers::new(&runner, PackageManager::Dnf, &config),
        );
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);
        assert!(reports.iter().all(|r| matches!(r.outcome, Outcome::Skipped(_))));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_unavailable_target_keeps_current_install() {
        let catalog = catalog();
        let centos = dist(OperatingSystem::CentOS);
        let state = InstallState::from_snapshot(
            &catalog,
            &centos,
            snapshot(&[], &["org.gimp.GIMP"], &[]),
        );
        let want = desired(&[("gimp", Target::Via(InstallMethod::Repository))]);
        let operations = plan(&catalog, &centos, &state, &want).unwrap();
        assert_eq!(
            operations,
            vec![Operation::Unavailable {
                key: "gimp".into(),
                method: InstallMethod::Repository
            }]
        );
    }

    #[test]
    fn test_failed_removal_skips_install() {
        let catalog = catalog();
        let ubuntu = dist(OperatingSystem::Ubuntu);
        let runner = RecordingRunner::new()
            .with_commands(&["apt", "snap", "flatpak"])
            .failing("snap remove code");
        let config = Config::default();
        let mut state =
            InstallState::from_snapshot(&catalog, &ubuntu, snapshot(&[], &[], &["code"]));
        let mut bootstrap = Bootstrap::default();

        let want = desired(&[("code", Target::Via(InstallMethod::Flatpak))]);
        let operations = plan(&catalog, &ubuntu, &state, &want).unwrap();
        let reconciler = Reconciler::new(
            &catalog,
            &ubuntu,
            Providers::new(&runner, PackageManager::Apt, &config),
        );
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert!(reports[0].is_failure());
        assert!(matches!(reports[1].outcome, Outcome::Skipped(_)));
        assert_eq!(runner.calls(), vec!["snap remove code"]);
        assert_eq!(state.active("code"), Some(InstallMethod::Snap));
    }

    #[test]
    fn test_failure_is_isolated_per_package() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let runner = RecordingRunner::new().failing("pacman -S code");
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &arch, Snapshot::default());
        let mut bootstrap = Bootstrap::default();

        let want = desired(&[
            ("code", Target::Via(InstallMethod::Repository)),
            ("node", Target::Via(InstallMethod::Repository)),
        ]);
        let operations = plan(&catalog, &arch, &state, &want).unwrap();
        let reconciler = Reconciler::new(
            &catalog,
            &arch,
            Providers::new(&runner, PackageManager::Pacman, &config),
        );
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert!(reports[0].is_failure());
        assert_eq!(reports[1].outcome, Outcome::Ok);
        assert_eq!(state.active("code"), None);
        assert_eq!(state.active("node"), Some(InstallMethod::Repository));
    }

    #[test]
    fn test_module_failure_does_not_block_install() {
        let catalog = catalog();
        let fedora = dist(OperatingSystem::Fedora);
        let runner = RecordingRunner::new().failing("dnf module");
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &fedora, Snapshot::default());
        let mut bootstrap = Bootstrap::default();

        let want = desired(&[("node", Target::Via(InstallMethod::Repository))]);
        let operations = plan(&catalog, &fedora, &state, &want).unwrap();
        let reconciler = Reconciler::new(
            &catalog,
            &fedora,
            Providers::new(&runner, PackageManager::Dnf, &config),
        );
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert!(reports[0].is_failure());
        assert_eq!(reports[1].outcome, Outcome::Ok);
        assert_eq!(state.active("node"), Some(InstallMethod::Repository));
    }

    #[test]
    fn test_flatpak_bootstrap_runs_once() {
        let catalog = catalog();
        let debian = dist(OperatingSystem::Debian);
        let runner = RecordingRunner::new().with_commands(&["apt"]);
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &debian, Snapshot::default());
        let mut bootstrap = Bootstrap::default();
        let reconciler = Reconciler::new(
            &catalog,
            &debian,
            Providers::new(&runner, PackageManager::Apt, &config),
        );

        let want = desired(&[
            ("code", Target::Via(InstallMethod::Flatpak)),
            ("gimp", Target::Via(InstallMethod::Flatpak)),
        ]);
        let operations = plan(&catalog, &debian, &state, &want).unwrap();
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert!(reports.iter().all(|r| r.outcome == Outcome::Ok));
        assert_eq!(
            runner.calls(),
            vec![
                "apt install flatpak -y",
                "flatpak remote-add --if-not-exists flathub https://flathub.org/repo/flathub.flatpakrepo",
                "flatpak install flathub com.visualstudio.code -y",
                "flatpak install flathub org.gimp.GIMP -y",
            ]
        );
        assert_eq!(state.active("flatpak"), Some(InstallMethod::Repository));
    }

    #[test]
    fn test_failed_bootstrap_fails_installs_without_retrying() {
        let catalog = catalog();
        let debian = dist(OperatingSystem::Debian);
        let runner = RecordingRunner::new().failing("apt install snapd");
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &debian, Snapshot::default());
        let mut bootstrap = Bootstrap::default();
        let reconciler = Reconciler::new(
            &catalog,
            &debian,
            Providers::new(&runner, PackageManager::Apt, &config),
        );

        let want = desired(&[
            ("code", Target::Via(InstallMethod::Snap)),
            ("node", Target::Via(InstallMethod::Snap)),
        ]);
        let operations = plan(&catalog, &debian, &state, &want).unwrap();
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert!(reports.iter().all(OperationReport::is_failure));
        assert_eq!(runner.calls(), vec!["apt install snapd -y"]);
    }

    #[test]
    fn test_snap_without_runtime_package_fails_without_commands() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let runner = RecordingRunner::new().with_commands(&["pacman"]);
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &arch, Snapshot::default());
        let mut bootstrap = Bootstrap::default();
        let reconciler = Reconciler::new(
            &catalog,
            &arch,
            Providers::new(&runner, PackageManager::Pacman, &config),
        );

        let want = desired(&[("code", Target::Via(InstallMethod::Snap))]);
        let operations = plan(&catalog, &arch, &state, &want).unwrap();
        let reports = reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert!(reports[0].is_failure());
        assert!(runner.calls().is_empty());
        assert_eq!(state.active("code"), None);
    }

    #[test]
    fn test_mutual_exclusion_after_apply() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let runner = RecordingRunner::new().with_commands(&["flatpak", "snap"]);
        let config = Config::default();
        let mut state = InstallState::from_snapshot(&catalog, &arch, snapshot(&["code"], &[], &[]));
        let mut bootstrap = Bootstrap::default();
        let reconciler = Reconciler::new(
            &catalog,
            &arch,
            Providers::new(&runner, PackageManager::Pacman, &config),
        );

        for method in [InstallMethod::Snap, InstallMethod::Flatpak, InstallMethod::Repository] {
            let want = desired(&[("code", Target::Via(method))]);
            let operations = plan(&catalog, &arch, &state, &want).unwrap();
            reconciler.apply(&mut state, &mut bootstrap, &operations);

            assert_eq!(state.active("code"), Some(method));
            let present: Vec<InstallMethod> = InstallMethod::ALL
                .into_iter()
                .filter(|m| {
                    catalog
                        .spec("code")
                        .unwrap()
                        .identifiers(*m, &arch)
                        .iter()
                        .any(|id| state.snapshot().contains(*m, id))
                })
                .collect();
            assert_eq!(present, vec![method]);
        }
    }

    #[test]
    fn test_remove_target() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let runner = RecordingRunner::new();
        let config = Config::default();
        let mut state =
            InstallState::from_snapshot(&catalog, &arch, snapshot(&["nodejs", "npm"], &[], &[]));
        let mut bootstrap = Bootstrap::default();

        let want = desired(&[("node", Target::NotInstalled)]);
        let operations = plan(&catalog, &arch, &state, &want).unwrap();
        let reconciler = Reconciler::new(
            &catalog,
            &arch,
            Providers::new(&runner, PackageManager::Pacman, &config),
        );
        reconciler.apply(&mut state, &mut bootstrap, &operations);

        assert_eq!(runner.calls(), vec!["pacman -Rsun nodejs npm --noconfirm"]);
        assert_eq!(state.active("node"), None);
    }

    #[test]
    fn test_unknown_key_halts_planning() {
        let catalog = catalog();
        let arch = dist(OperatingSystem::Arch);
        let state = InstallState::default();
        let want = desired(&[("nope", Target::NotInstalled)]);
        assert_eq!(
            plan(&catalog, &arch, &state, &want),
            Err(CatalogError::UnknownPackage("nope".into()))
        );
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("node=repo"),
            Ok(("node".to_string(), Target::Via(InstallMethod::Repository)))
        );
        assert_eq!(
            parse_assignment("code=none"),
            Ok(("code".to_string(), Target::NotInstalled))
        );
        assert!(parse_assignment("code").is_err());
        assert!(parse_assignment("=snap").is_err());
        assert!(parse_assignment("code=appimage").is_err());
    }
}
