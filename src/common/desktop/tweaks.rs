//! Desktop preferences applied by the GNOME and KDE setup entries.
//!
//! Settings are written with `gsettings` and `kwriteconfig5`/`kwriteconfig6`
//! through the [`CommandRunner`]. Those tools act on the session of the
//! invoking user, so when the tool runs under `sudo` every command is wrapped
//! to run as `SUDO_USER` against that user's session bus.

use anyhow::{Result, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::DesktopEnvironment;
use crate::common::distro::RepositoryFamily;
use crate::common::exec::{CommandLine, CommandRunner};
use crate::ui::prelude::*;

/// Plasma panel layout, in the user's config directory.
const APPLETS_FILE: &str = "plasma-org.kde.plasma.desktop-appletsrc";

/// One preference write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tweak {
    Gsettings {
        schema: &'static str,
        key: &'static str,
        value: &'static str,
    },
    Kconfig {
        file: &'static str,
        groups: Vec<String>,
        key: &'static str,
        value: &'static str,
    },
}

impl Tweak {
    fn gsettings(schema: &'static str, key: &'static str, value: &'static str) -> Self {
        Self::Gsettings { schema, key, value }
    }

    fn kconfig(file: &'static str, groups: &[&str], key: &'static str, value: &'static str) -> Self {
        Self::Kconfig {
            file,
            groups: groups.iter().map(|g| g.to_string()).collect(),
            key,
            value,
        }
    }

    /// `kwriteconfig` is the binary used for [`Tweak::Kconfig`].
    pub fn command(&self, kwriteconfig: &str) -> CommandLine {
        match self {
            Self::Gsettings { schema, key, value } => {
                CommandLine::new("gsettings").args(["set", *schema, *key, *value])
            }
            Self::Kconfig {
                file,
                groups,
                key,
                value,
            } => {
                let mut line = CommandLine::new(kwriteconfig).args(["--file", *file]);
                for group in groups {
                    line = line.args(["--group", group.as_str()]);
                }
                line.args(["--key", *key, *value])
            }
        }
    }
}

pub fn gnome_tweaks(family: RepositoryFamily) -> Vec<Tweak> {
    const INTERFACE: &str = "org.gnome.desktop.interface";
    const KEYBOARD: &str = "org.gnome.desktop.peripherals.keyboard";
    const TOUCHPAD: &str = "org.gnome.desktop.peripherals.touchpad";

    let mut tweaks = vec![
        Tweak::gsettings(INTERFACE, "clock-format", "12h"),
        Tweak::gsettings(INTERFACE, "clock-show-date", "true"),
        Tweak::gsettings(INTERFACE, "clock-show-seconds", "true"),
        Tweak::gsettings(INTERFACE, "clock-show-weekday", "true"),
        Tweak::gsettings(INTERFACE, "show-battery-percentage", "true"),
        Tweak::gsettings(INTERFACE, "enable-hot-corners", "true"),
        Tweak::gsettings("org.gnome.desktop.session", "idle-delay", "900"),
        Tweak::gsettings(KEYBOARD, "numlock-state", "true"),
        Tweak::gsettings(TOUCHPAD, "tap-to-click", "true"),
        Tweak::gsettings(TOUCHPAD, "natural-scroll", "false"),
        Tweak::gsettings("org.gnome.desktop.peripherals.mouse", "natural-scroll", "false"),
    ];

    if family == RepositoryFamily::Ubuntu {
        const DOCK: &str = "org.gnome.shell.extensions.dash-to-dock";
        tweaks.extend([
            Tweak::gsettings("org.gnome.shell.extensions.ding", "show-home", "false"),
            Tweak::gsettings(DOCK, "dash-max-icon-size", "28"),
            Tweak::gsettings(DOCK, "show-favorites", "true"),
            Tweak::gsettings(DOCK, "show-mounts", "true"),
            Tweak::gsettings(DOCK, "show-trash", "false"),
        ]);
    }

    tweaks
}

/// Group path of the first applet in a Plasma layout using `plugin`.
///
/// An applet section looks like `[Containments][2][Applets][5]` followed by a
/// `plugin=org.kde.plasma.digitalclock` line.
pub fn applet_groups(content: &str, plugin: &str) -> Option<Vec<String>> {
    let mut section: Option<&str> = None;
    for line in content.lines().map(str::trim) {
        if line.starts_with('[') && line.ends_with(']') {
            section = Some(&line[1..line.len() - 1]);
        } else if line.strip_prefix("plugin=") == Some(plugin) {
            return section.map(|s| s.split("][").map(str::to_string).collect());
        }
    }
    None
}

/// KDE preferences. Panel applets are only touched when the layout is known.
pub fn kde_tweaks(applets: Option<&str>) -> Vec<Tweak> {
    let mut tweaks = Vec::new();

    if let Some(content) = applets {
        if let Some(clock) = applet_groups(content, "org.kde.plasma.digitalclock") {
            let groups = [clock, vec!["Configuration".into(), "Appearance".into()]].concat();
            for (key, value) in [
                ("dateDisplayFormat", "BesideTime"),
                ("dateFormat", "isoDate"),
                ("showSeconds", "true"),
            ] {
                tweaks.push(Tweak::Kconfig {
                    file: APPLETS_FILE,
                    groups: groups.clone(),
                    key,
                    value,
                });
            }
        }
        if let Some(battery) = applet_groups(content, "org.kde.plasma.battery") {
            tweaks.push(Tweak::Kconfig {
                file: APPLETS_FILE,
                groups: [battery, vec!["Configuration".into(), "General".into()]].concat(),
                key: "showPercentage",
                value: "true",
            });
        }
    }

    tweaks.extend([
        Tweak::kconfig("kcminputrc", &["Keyboard"], "NumLock", "0"),
        Tweak::kconfig("kdeglobals", &["KDE"], "SingleClick", "false"),
        Tweak::kconfig("dolphinrc", &["General"], "RememberOpenedTabs", "false"),
        Tweak::kconfig("kscreenlockerrc", &["Daemon"], "Timeout", "15"),
        Tweak::kconfig("ksmserverrc", &["General"], "loginMode", "emptySession"),
        Tweak::kconfig("katerc", &["General"], "Show welcome view for new window", "false"),
        Tweak::kconfig("katerc", &["KTextEditor Renderer"], "Show Line Count", "true"),
        Tweak::kconfig("katerc", &["KTextEditor Renderer"], "Show Word Count", "true"),
    ]);

    tweaks
}

/// Whose desktop session the preferences are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopUser {
    Current,
    Sudo { user: String, uid: u32 },
}

impl DesktopUser {
    /// The invoking user when running under `sudo`, otherwise the current one.
    pub fn detect() -> Self {
        let root = matches!(sudo::check(), sudo::RunningAs::Root);
        Self::from_sudo_env(
            root,
            env::var("SUDO_USER").ok().as_deref(),
            env::var("SUDO_UID").ok().as_deref(),
        )
    }

    pub fn from_sudo_env(root: bool, user: Option<&str>, uid: Option<&str>) -> Self {
        match (root, user, uid.and_then(|u| u.parse().ok())) {
            (true, Some(user), Some(uid)) if !user.is_empty() && user != "root" => Self::Sudo {
                user: user.to_string(),
                uid,
            },
            _ => Self::Current,
        }
    }

    pub fn wrap(&self, command: CommandLine) -> CommandLine {
        match self {
            Self::Current => command,
            Self::Sudo { user, uid } => CommandLine::new("sudo")
                .args(["-H", "-u", user.as_str(), "env"])
                .arg(format!("DBUS_SESSION_BUS_ADDRESS=unix:path=/run/user/{uid}/bus"))
                .arg(format!("XDG_RUNTIME_DIR=/run/user/{uid}"))
                .arg(command.program)
                .args(command.args),
        }
    }

    fn home(&self, runner: &dyn CommandRunner) -> Option<PathBuf> {
        match self {
            Self::Current => dirs::home_dir(),
            Self::Sudo { .. } => runner
                .read(&self.wrap(CommandLine::new("printenv").arg("HOME")))
                .ok()
                .map(|out| out.trim().to_string())
                .filter(|home| !home.is_empty())
                .map(PathBuf::from),
        }
    }
}

fn read_applets(home: &Path) -> Option<String> {
    fs::read_to_string(home.join(".config").join(APPLETS_FILE)).ok()
}

/// Apply the preferences for `desktop`.
///
/// Every write is attempted; failures are reported and counted.
pub fn setup(
    runner: &dyn CommandRunner,
    desktop: DesktopEnvironment,
    family: RepositoryFamily,
    user: &DesktopUser,
) -> Result<()> {
    let (tweaks, kwriteconfig) = match desktop {
        DesktopEnvironment::Gnome => {
            if !runner.has_command("gsettings") {
                bail!("gsettings is not available; is GNOME installed?");
            }
            (gnome_tweaks(family), "")
        }
        DesktopEnvironment::Plasma => {
            let kwriteconfig = ["kwriteconfig6", "kwriteconfig5"]
                .into_iter()
                .find(|program| runner.has_command(program));
            let Some(kwriteconfig) = kwriteconfig else {
                bail!("kwriteconfig5 is not available; is KDE Plasma installed?");
            };
            let applets = user.home(runner).and_then(|home| read_applets(&home));
            if applets.is_none() {
                emit(
                    Level::Debug,
                    "desktop.applets",
                    "No Plasma panel layout found; leaving panel applets alone",
                    None,
                );
            }
            (kde_tweaks(applets.as_deref()), kwriteconfig)
        }
    };

    emit(
        Level::Info,
        "desktop.setup",
        &format!("Applying {} preferences", desktop),
        None,
    );

    let mut failed = 0;
    for tweak in &tweaks {
        let command = user.wrap(tweak.command(kwriteconfig));
        if let Err(e) = runner.run(&command) {
            failed += 1;
            emit(Level::Warn, "desktop.tweak", &format!("{:#}", e), None);
        }
    }

    if failed > 0 {
        bail!("{} of {} {} settings failed", failed, tweaks.len(), desktop);
    }
    emit(
        Level::Success,
        "desktop.done",
        &format!("{} preferences applied", desktop),
        None,
    );
    Ok(())
}
