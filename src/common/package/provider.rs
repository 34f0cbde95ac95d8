//! Install backends: repository, Flatpak and Snap.
//!
//! Every command runs through the session's [`CommandRunner`]. Nothing here
//! tracks state; the reconciler decides what to run and records the outcome.

use anyhow::{Context, Result, bail};

use super::installed::parse_zypper;
use super::{FlatpakSpec, PackageManager, SnapSpec};
use crate::common::config::Config;
use crate::common::distro::Distribution;
use crate::common::exec::{CommandLine, CommandRunner};
use crate::ui::prelude::*;

/// Fedora's own Flatpak registry, added next to the default remote on dnf systems.
pub const FEDORA_REMOTE: (&str, &str) = ("fedora", "oci+https://registry.fedoraproject.org");

pub fn flatpak_install_command(remote: &str, id: &str) -> CommandLine {
    CommandLine::new("flatpak").args(["install", remote, id, "-y"])
}

pub fn flatpak_remove_command(id: &str) -> CommandLine {
    CommandLine::new("flatpak").args(["remove", id, "-y"])
}

pub fn flatpak_remote_add_command(name: &str, url: &str) -> CommandLine {
    CommandLine::new("flatpak").args(["remote-add", "--if-not-exists", name, url])
}

pub fn snap_install_command(spec: &SnapSpec) -> CommandLine {
    let mut command = CommandLine::new("snap").args(["install", spec.id]);
    if spec.is_classic {
        command = command.arg("--classic");
    }
    if !spec.channel.is_empty() {
        command = command.args(["--channel", spec.channel]);
    }
    command
}

/// Move an installed snap to the channel `spec` follows.
pub fn snap_switch_command(spec: &SnapSpec) -> CommandLine {
    CommandLine::new("snap").args(["refresh", spec.id, "--channel", spec.channel_or_default()])
}

pub fn snap_remove_command(id: &str) -> CommandLine {
    CommandLine::new("snap").args(["remove", id])
}

/// Runs install-method commands for one distribution.
pub struct Providers<'a> {
    runner: &'a dyn CommandRunner,
    manager: PackageManager,
    config: &'a Config,
}

impl<'a> Providers<'a> {
    pub fn new(runner: &'a dyn CommandRunner, manager: PackageManager, config: &'a Config) -> Self {
        Self {
            runner,
            manager,
            config,
        }
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    pub fn install_repository(&self, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        self.runner
            .run(&self.manager.install_command(names))
            .with_context(|| format!("Failed to install packages with {}", self.manager))
    }

    pub fn remove_repository(&self, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        self.runner
            .run(&self.manager.uninstall_command(names))
            .with_context(|| format!("Failed to remove packages with {}", self.manager))
    }

    /// Enable module streams. Returns `false` when the manager has no modules.
    pub fn enable_modules(&self, modules: &[&str]) -> Result<bool> {
        if modules.is_empty() {
            return Ok(false);
        }
        let Some(command) = self.manager.module_enable_command(modules) else {
            return Ok(false);
        };
        self.runner
            .run(&command)
            .context("Failed to enable module streams")?;
        Ok(true)
    }

    pub fn install_flatpak(&self, spec: &FlatpakSpec) -> Result<()> {
        let remote = spec.remote.unwrap_or(self.config.flatpak_remote.as_str());
        self.runner
            .run(&flatpak_install_command(remote, spec.id))
            .with_context(|| format!("Failed to install {} from {}", spec.id, remote))
    }

    pub fn remove_flatpak(&self, id: &str) -> Result<()> {
        self.runner
            .run(&flatpak_remove_command(id))
            .with_context(|| format!("Failed to remove flatpak {}", id))
    }

    pub fn install_snap(&self, spec: &SnapSpec) -> Result<()> {
        self.runner
            .run(&snap_install_command(spec))
            .with_context(|| format!("Failed to install snap {}", spec.id))
    }

    /// Install a snap whose name is already taken by another channel.
    pub fn switch_snap(&self, spec: &SnapSpec) -> Result<()> {
        self.runner
            .run(&snap_switch_command(spec))
            .with_context(|| format!("Failed to switch snap {} to {}", spec.id, spec.channel_or_default()))
    }

    pub fn remove_snap(&self, id: &str) -> Result<()> {
        self.runner
            .run(&snap_remove_command(id))
            .with_context(|| format!("Failed to remove snap {}", id))
    }

    /// Make Flatpak usable: the runtime package and the configured remotes.
    ///
    /// `runtime` is what the catalog resolves `flatpak` to here. Returns the
    /// repository packages installed on the way.
    pub fn bootstrap_flatpak(
        &self,
        runtime: &[&'static str],
        distribution: &Distribution,
    ) -> Result<Vec<&'static str>> {
        emit(Level::Info, "flatpak.setup", "Setting up Flatpak...", None);
        let installed = self.install_runtime("flatpak", "Flatpak", runtime, distribution)?;

        self.runner
            .run(&flatpak_remote_add_command(
                &self.config.flatpak_remote,
                &self.config.flatpak_remote_url,
            ))
            .with_context(|| format!("Failed to add remote {}", self.config.flatpak_remote))?;

        if self.manager == PackageManager::Dnf {
            let (name, url) = FEDORA_REMOTE;
            self.runner
                .run(&flatpak_remote_add_command(name, url))
                .with_context(|| format!("Failed to add remote {}", name))?;
        }

        Ok(installed)
    }

    /// Make Snap usable: the daemon package and, on dnf systems, the socket
    /// and the `/snap` link classic snaps expect.
    pub fn bootstrap_snap(
        &self,
        runtime: &[&'static str],
        distribution: &Distribution,
    ) -> Result<Vec<&'static str>> {
        emit(Level::Info, "snap.setup", "Setting up Snap...", None);
        let installed = self.install_runtime("snap", "Snap", runtime, distribution)?;

        if self.manager == PackageManager::Dnf {
            self.runner
                .run(&CommandLine::new("systemctl").args(["enable", "--now", "snapd.socket"]))
                .context("Failed to enable snapd.socket")?;
            self.runner
                .run(&CommandLine::new("ln").args(["-sfn", "/var/lib/snapd/snap", "/snap"]))
                .context("Failed to link /snap")?;
        }

        Ok(installed)
    }

    fn install_runtime(
        &self,
        program: &str,
        name: &str,
        runtime: &[&'static str],
        distribution: &Distribution,
    ) -> Result<Vec<&'static str>> {
        if self.runner.has_command(program) {
            return Ok(Vec::new());
        }
        if runtime.is_empty() {
            bail!(
                "{} cannot be set up on {}: no {} package in its repositories",
                name,
                distribution.id,
                program
            );
        }
        self.install_repository(runtime)?;
        Ok(runtime.to_vec())
    }

    /// Upgrade the repository, then Flatpak and Snap when present.
    ///
    /// Every step runs even if an earlier one failed.
    pub fn update(&self) -> Result<()> {
        let mut steps = self.manager.update_commands();
        if self.runner.has_command("flatpak") {
            steps.push(CommandLine::new("flatpak").args(["update", "-y"]));
        }
        if self.runner.has_command("snap") {
            steps.push(CommandLine::new("snap").arg("refresh"));
        }
        self.run_all("update", &steps)
    }

    /// Remove packages nothing depends on anymore.
    pub fn autoremove(&self) -> Result<()> {
        let mut steps = Vec::new();
        match self.manager {
            PackageManager::Apt => steps.push(CommandLine::new("apt").args(["autoremove", "-y"])),
            PackageManager::Dnf => steps.push(CommandLine::new("dnf").args(["autoremove", "-y"])),
            PackageManager::Pacman => {
                // Exits non-zero when there are no orphans.
                let orphans = match self.runner.read(&CommandLine::new("pacman").arg("-Qdtq")) {
                    Ok(orphans) => orphans,
                    Err(e) => {
                        emit(
                            Level::Debug,
                            "autoremove.orphans",
                            &format!("No orphans listed: {:#}", e),
                            None,
                        );
                        String::new()
                    }
                };
                let orphans: Vec<&str> = orphans.split_whitespace().collect();
                if !orphans.is_empty() {
                    steps.push(self.manager.uninstall_command(&orphans));
                }
            }
            PackageManager::Zypper => {
                let output = self
                    .runner
                    .read(&CommandLine::new("zypper").args(["packages", "--unneeded"]))
                    .context("Failed to list unneeded packages")?;
                let unneeded = parse_zypper(&output);
                if !unneeded.is_empty() {
                    steps.push(
                        CommandLine::new("zypper")
                            .args(["remove", "--clean-deps", "--no-confirm"])
                            .args(unneeded),
                    );
                }
            }
        }
        if self.runner.has_command("flatpak") {
            steps.push(CommandLine::new("flatpak").args(["remove", "--unused", "-y"]));
        }

        if steps.is_empty() {
            emit(Level::Info, "autoremove.none", "Nothing to remove", None);
            return Ok(());
        }
        self.run_all("autoremove", &steps)
    }

    fn run_all(&self, what: &str, steps: &[CommandLine]) -> Result<()> {
        let mut failed = 0;
        for step in steps {
            emit(Level::Info, &format!("{}.run", what), &format!("Running {}", step), None);
            if let Err(e) = self.runner.run(step) {
                failed += 1;
                emit(Level::Error, &format!("{}.failed", what), &format!("{:#}", e), None);
            }
        }
        if failed > 0 {
            anyhow::bail!("{} of {} {} step(s) failed", failed, steps.len(), what);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::distro::OperatingSystem;
    use crate::common::exec::testing::RecordingRunner;

    #[test]
    fn test_snap_install_command() {
        let node = SnapSpec::new("node").classic().channel("18/stable");
        assert_eq!(
            snap_install_command(&node).to_string(),
            "snap install node --classic --channel 18/stable"
        );
        assert_eq!(
            snap_install_command(&SnapSpec::new("vlc")).to_string(),
            "snap install vlc"
        );
    }

    #[test]
    fn test_flatpak_install_uses_spec_remote_or_config() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Apt, &config);

        providers
            .install_flatpak(&FlatpakSpec::new("org.gimp.GIMP"))
            .unwrap();
        providers
            .install_flatpak(&FlatpakSpec::new("org.gnome.Maps").from_remote("fedora"))
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "flatpak install flathub org.gimp.GIMP -y",
                "flatpak install fedora org.gnome.Maps -y"
            ]
        );
    }

    fn dist(os: OperatingSystem) -> Distribution {
        Distribution::from_os(os).unwrap()
    }

    #[test]
    fn test_snap_switch_command() {
        let esr = SnapSpec::new("firefox").channel("esr-stable");
        assert_eq!(
            snap_switch_command(&esr).to_string(),
            "snap refresh firefox --channel esr-stable"
        );
        assert_eq!(
            snap_switch_command(&SnapSpec::new("firefox")).to_string(),
            "snap refresh firefox --channel latest/stable"
        );
    }

    #[test]
    fn test_bootstrap_flatpak_on_dnf() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Dnf, &config);

        assert_eq!(
            providers
                .bootstrap_flatpak(&["flatpak"], &dist(OperatingSystem::Fedora))
                .unwrap(),
            vec!["flatpak"]
        );
        assert_eq!(
            runner.calls(),
            vec![
                "dnf install flatpak -y",
                "flatpak remote-add --if-not-exists flathub https://flathub.org/repo/flathub.flatpakrepo",
                "flatpak remote-add --if-not-exists fedora oci+https://registry.fedoraproject.org",
            ]
        );
    }

    #[test]
    fn test_bootstrap_snap_skips_install_when_present() {
        let runner = RecordingRunner::new().with_commands(&["snap"]);
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Apt, &config);

        let installed = providers
            .bootstrap_snap(&["snapd"], &dist(OperatingSystem::Ubuntu))
            .unwrap();
        assert!(installed.is_empty());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_bootstrap_snap_without_runtime_package_runs_nothing() {
        let runner = RecordingRunner::new().with_commands(&["pacman"]);
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Pacman, &config);

        let err = providers
            .bootstrap_snap(&[], &dist(OperatingSystem::Arch))
            .unwrap_err();
        assert!(err.to_string().contains("Snap cannot be set up on Arch"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_bootstrap_snap_on_dnf() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Dnf, &config);

        providers
            .bootstrap_snap(&["snapd"], &dist(OperatingSystem::Fedora))
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "dnf install snapd -y",
                "systemctl enable --now snapd.socket",
                "ln -sfn /var/lib/snapd/snap /snap",
            ]
        );
    }

    #[test]
    fn test_enable_modules_is_noop_off_dnf() {
        let runner = RecordingRunner::new();
        let config = Config::default();
        let apt = Providers::new(&runner, PackageManager::Apt, &config);
        assert!(!apt.enable_modules(&["nodejs:18"]).unwrap());
        assert!(runner.calls().is_empty());

        let dnf = Providers::new(&runner, PackageManager::Dnf, &config);
        assert!(dnf.enable_modules(&["nodejs:18"]).unwrap());
        assert_eq!(runner.calls(), vec!["dnf module enable nodejs:18 -y"]);
    }

    #[test]
    fn test_update_runs_every_step() {
        let runner = RecordingRunner::new()
            .with_commands(&["flatpak", "snap"])
            .failing("apt update");
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Apt, &config);

        assert!(providers.update().is_err());
        assert_eq!(
            runner.calls(),
            vec!["apt update", "apt upgrade -y", "flatpak update -y", "snap refresh"]
        );
    }

    #[test]
    fn test_autoremove_pacman_orphans() {
        let runner = RecordingRunner::new().with_output("pacman -Qdtq", "libfoo\nlibbar\n");
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Pacman, &config);

        providers.autoremove().unwrap();
        assert_eq!(
            runner.calls(),
            vec!["pacman -Qdtq", "pacman -Rsun libfoo libbar --noconfirm"]
        );
    }

    #[test]
    fn test_autoremove_pacman_without_orphans() {
        let runner = RecordingRunner::new().failing("pacman -Qdtq");
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Pacman, &config);

        providers.autoremove().unwrap();
        assert_eq!(runner.calls(), vec!["pacman -Qdtq"]);
    }

    #[test]
    fn test_autoremove_zypper() {
        let runner = RecordingRunner::new().with_output(
            "zypper packages --unneeded",
            "S | Repository | Name | Version | Arch\n\
             --+------------+------+---------+-----\n\
             i | repo-oss   | libold | 1.0   | x86_64\n",
        );
        let config = Config::default();
        let providers = Providers::new(&runner, PackageManager::Zypper, &config);

        providers.autoremove().unwrap();
        assert_eq!(
            runner.calls(),
            vec![
                "zypper packages --unneeded",
                "zypper remove --clean-deps --no-confirm libold"
            ]
        );
    }
}
