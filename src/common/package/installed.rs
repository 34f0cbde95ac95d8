//! Installed-state listings.
//!
//! One listing per install method is taken at session start. Parsers are pure
//! functions over the listing output so they can be tested without the tools.

use std::collections::{BTreeMap, BTreeSet};

use super::{InstallMethod, PackageManager};
use crate::common::exec::{CommandLine, CommandRunner};
use crate::ui::prelude::*;

/// Installed identifiers per install method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub repository: BTreeSet<String>,
    pub flatpak: BTreeSet<String>,
    pub snap: BTreeSet<String>,
    /// Channel each installed snap tracks, when `snap list` shows one.
    pub snap_tracking: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn ids(&self, method: InstallMethod) -> &BTreeSet<String> {
        match method {
            InstallMethod::Repository => &self.repository,
            InstallMethod::Flatpak => &self.flatpak,
            InstallMethod::Snap => &self.snap,
        }
    }

    pub fn ids_mut(&mut self, method: InstallMethod) -> &mut BTreeSet<String> {
        match method {
            InstallMethod::Repository => &mut self.repository,
            InstallMethod::Flatpak => &mut self.flatpak,
            InstallMethod::Snap => &mut self.snap,
        }
    }

    pub fn contains(&self, method: InstallMethod, id: &str) -> bool {
        self.ids(method).contains(id)
    }

    /// Which of `ids` are present for `method`, in the given order.
    pub fn present<'a>(&self, method: InstallMethod, ids: &[&'a str]) -> Vec<&'a str> {
        ids.iter()
            .copied()
            .filter(|id| self.contains(method, id))
            .collect()
    }
}

/// Program that must be on PATH for a method's listing.
fn listing_program(manager: PackageManager, method: InstallMethod) -> &'static str {
    match method {
        InstallMethod::Repository => manager.program(),
        InstallMethod::Flatpak => "flatpak",
        InstallMethod::Snap => "snap",
    }
}

pub fn listing_command(manager: PackageManager, method: InstallMethod) -> CommandLine {
    match method {
        InstallMethod::Repository => manager.list_installed_command(),
        InstallMethod::Flatpak => {
            CommandLine::new("flatpak").args(["list", "--app", "--columns=application"])
        }
        InstallMethod::Snap => CommandLine::new("snap").arg("list"),
    }
}

/// Parse listing output into identifiers.
pub fn parse_listing(
    manager: PackageManager,
    method: InstallMethod,
    output: &str,
) -> BTreeSet<String> {
    match method {
        InstallMethod::Repository => match manager {
            PackageManager::Apt => parse_apt(output),
            PackageManager::Dnf => parse_dnf(output),
            PackageManager::Pacman => parse_pacman(output),
            PackageManager::Zypper => parse_zypper(output),
        },
        InstallMethod::Flatpak => parse_flatpak(output),
        InstallMethod::Snap => parse_snap(output),
    }
}

/// `apt list --installed`: `curl/jammy,now 7.81.0 amd64 [installed]`.
pub fn parse_apt(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_once('/'))
        .map(|(name, _)| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// `dnf list installed`: `nodejs.x86_64  1:18.19.0-1.fc39  @updates`.
///
/// Only the trailing architecture suffix is stripped, so names that contain
/// dots (`python3.11`) survive. Header and wrapped continuation lines have no
/// `name.arch` column and are skipped.
pub fn parse_dnf(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_whitespace().next())
        .filter_map(|column| column.rsplit_once('.'))
        .map(|(name, _arch)| name.to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// `pacman -Q`: `name version`.
pub fn parse_pacman(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// `zypper packages --installed-only`: a `|` separated table, name in the
/// third column.
pub fn parse_zypper(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.split('|').nth(2))
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "Name" && !name.starts_with('-'))
        .map(str::to_string)
        .collect()
}

/// `flatpak list --app --columns=application`: one id per line.
pub fn parse_flatpak(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|id| *id != "Application")
        .map(str::to_string)
        .collect()
}

/// `snap list`: header row, then the name in the first column.
pub fn parse_snap(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|name| *name != "Name")
        .map(str::to_string)
        .collect()
}

/// `snap list`: the tracked channel in the fourth column. Local installs
/// show `-` and are left out.
pub fn parse_snap_tracking(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            match columns.as_slice() {
                ["Name", ..] => None,
                [name, _, _, tracking, ..] if *tracking != "-" => {
                    Some((name.to_string(), tracking.to_string()))
                }
                _ => None,
            }
        })
        .collect()
}

/// Raw listing output for one method.
///
/// A missing tool yields `None` silently. A failing listing yields `None`
/// and a warning.
fn read_listing(
    runner: &dyn CommandRunner,
    manager: PackageManager,
    method: InstallMethod,
) -> Option<String> {
    let program = listing_program(manager, method);
    if !runner.has_command(program) {
        emit(
            Level::Debug,
            "listing.skipped",
            &format!("{} not found, assuming nothing installed via {}", program, method),
            None,
        );
        return None;
    }

    match runner.read(&listing_command(manager, method)) {
        Ok(output) => Some(output),
        Err(e) => {
            emit(
                Level::Warn,
                "listing.failed",
                &format!("Could not list {} packages: {:#}", method.display_name(), e),
                None,
            );
            None
        }
    }
}

/// List installed identifiers for one method.
pub fn list_installed(
    runner: &dyn CommandRunner,
    manager: PackageManager,
    method: InstallMethod,
) -> BTreeSet<String> {
    read_listing(runner, manager, method)
        .map(|output| parse_listing(manager, method, &output))
        .unwrap_or_default()
}

/// Take a snapshot of all three methods.
pub fn snapshot(runner: &dyn CommandRunner, manager: PackageManager) -> Snapshot {
    let repository = list_installed(runner, manager, InstallMethod::Repository);
    let flatpak = list_installed(runner, manager, InstallMethod::Flatpak);
    let snap_listing = read_listing(runner, manager, InstallMethod::Snap).unwrap_or_default();
    Snapshot {
        repository,
        flatpak,
        snap: parse_snap(&snap_listing),
        snap_tracking: parse_snap_tracking(&snap_listing),
    }
}
