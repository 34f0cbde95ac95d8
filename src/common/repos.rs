//! Extra repository setup for dnf systems: parallel downloads, EPEL and
//! RPM Fusion.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::common::distro::RepositoryFamily;
use crate::common::exec::CommandLine;
use crate::common::package::{PackageManager, Session};
use crate::menu::Prompter;
use crate::ui::prelude::*;

pub const DNF_CONF: &str = "/etc/dnf/dnf.conf";
const PARALLEL_DOWNLOADS_KEY: &str = "max_parallel_downloads";

const RPMFUSION: &str = "https://download1.rpmfusion.org";
const EPEL: &str = "https://dl.fedoraproject.org/pub/epel";

/// Append `max_parallel_downloads=<n>` to dnf.conf unless the key is set.
///
/// Returns whether the file was changed. The file is replaced atomically and
/// keeps its permissions.
pub fn ensure_parallel_downloads(path: &Path, downloads: u32) -> Result<bool> {
    let current = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    if current
        .lines()
        .any(|line| line.trim_start().starts_with(PARALLEL_DOWNLOADS_KEY))
    {
        return Ok(false);
    }

    let mut updated = current;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&format!("{}={}\n", PARALLEL_DOWNLOADS_KEY, downloads));

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(updated.as_bytes())
        .context("Failed to write temporary dnf.conf")?;
    if let Ok(metadata) = fs::metadata(path) {
        file.as_file()
            .set_permissions(metadata.permissions())
            .context("Failed to copy dnf.conf permissions")?;
    }
    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(true)
}

/// Release packages enabling EPEL / RPM Fusion for a family and release.
pub fn release_packages(family: RepositoryFamily, release: &str, nonfree: bool) -> Vec<String> {
    match (family, nonfree) {
        (RepositoryFamily::Fedora, false) => vec![format!(
            "{}/free/fedora/rpmfusion-free-release-{}.noarch.rpm",
            RPMFUSION, release
        )],
        (RepositoryFamily::Fedora, true) => vec![format!(
            "{}/nonfree/fedora/rpmfusion-nonfree-release-{}.noarch.rpm",
            RPMFUSION, release
        )],
        (RepositoryFamily::RedHat, false) => vec![
            format!("{}/epel-release-latest-{}.noarch.rpm", EPEL, release),
            format!("{}/free/el/rpmfusion-free-release-{}.noarch.rpm", RPMFUSION, release),
        ],
        (RepositoryFamily::RedHat, true) => vec![format!(
            "{}/nonfree/el/rpmfusion-nonfree-release-{}.noarch.rpm",
            RPMFUSION, release
        )],
        _ => Vec::new(),
    }
}

fn release_macro(family: RepositoryFamily) -> Option<&'static str> {
    match family {
        RepositoryFamily::Fedora => Some("%fedora"),
        RepositoryFamily::RedHat => Some("%rhel"),
        _ => None,
    }
}

fn install_release_packages(session: &Session<'_>, urls: &[String]) -> Result<()> {
    let mut command = CommandLine::new("dnf").arg("install");
    if session.distribution().family == RepositoryFamily::RedHat {
        command = command.arg("--nogpgcheck");
    }
    let command = command.args(urls.iter().cloned()).arg("-y");
    emit(
        Level::Info,
        "repos.install",
        &format!("Installing {}", urls.join(" ")),
        None,
    );
    session
        .runner()
        .run(&command)
        .context("Failed to install repository release packages")
}

/// Configure dnf and, after confirmation, the extra repositories.
pub fn setup(session: &Session<'_>, prompter: &mut dyn Prompter, dnf_conf: &Path) -> Result<()> {
    let distribution = session.distribution();
    if distribution.package_manager != PackageManager::Dnf {
        emit(
            Level::Info,
            "repos.skipped",
            &format!("Nothing to set up for {}", distribution.package_manager.display_name()),
            None,
        );
        return Ok(());
    }

    emit(Level::Info, "repos.setup", "Setting up repositories...", None);
    if ensure_parallel_downloads(dnf_conf, session.config().dnf_parallel_downloads)? {
        emit(
            Level::Success,
            "repos.dnf_conf",
            &format!("Enabled parallel downloads in {}", dnf_conf.display()),
            None,
        );
    }

    let Some(release_macro) = release_macro(distribution.family) else {
        return Ok(());
    };
    if !prompter.confirm("Do you want to enable EPEL/RPM Fusion Repositories?")? {
        return Ok(());
    }

    let release = session
        .runner()
        .read(&CommandLine::new("rpm").args(["-E", release_macro]))
        .context("Failed to determine release version")?
        .trim()
        .to_string();

    install_release_packages(session, &release_packages(distribution.family, &release, false))?;
    if distribution.family == RepositoryFamily::RedHat {
        session
            .runner()
            .run(&CommandLine::new("dnf").args(["config-manager", "--set-enabled", "crb"]))
            .context("Failed to enable the CRB repository")?;
    }

    if prompter.confirm("Do you want to enable Non-Free EPEL/RPM Fusion Repositories?")? {
        install_release_packages(session, &release_packages(distribution.family, &release, true))?;
    }

    session.update()
}
