use anyhow::{Result, bail};
use clap::{Subcommand, ValueHint};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::common::config::Config;
use crate::common::desktop::DesktopEnvironment;
use crate::common::desktop::tweaks::{self, DesktopUser};
use crate::common::distro::{Distribution, OperatingSystem};
use crate::common::exec::{CommandRunner, DetachedRunner, SystemRunner};
use crate::common::package::reconcile::parse_assignment;
use crate::common::package::session::resolve_distribution;
use crate::common::package::{
    Catalog, Category, DesiredState, InstallMethod, OperationReport, Session, Target,
};
use crate::common::{privileges, repos};
use crate::menu::{self, DialoguerPrompter};
use crate::ui::prelude::*;

/// Exit code when some package operations failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Show the detected distribution, family and package manager
    Info,
    /// List catalog packages and how they can be installed here
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Show the concrete identifiers of a package on this distribution
    Resolve {
        /// Package key
        key: String,
    },
    /// Show which packages are installed and through which method
    Status {
        /// Show every package of this category, installed or not
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Print the operations needed to reach a state, without running them
    Plan {
        /// KEY=METHOD with METHOD one of repository, flatpak, snap, none
        #[arg(required = true, value_parser = parse_assignment)]
        changes: Vec<(String, Target)>,
    },
    /// Reach a state: install, switch or remove packages
    Apply {
        /// KEY=METHOD with METHOD one of repository, flatpak, snap, none
        #[arg(required = true, value_parser = parse_assignment)]
        changes: Vec<(String, Target)>,
    },
    /// Install packages
    Install {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Install method
        #[arg(long, default_value = "repository")]
        via: InstallMethod,
    },
    /// Remove packages, whichever way they were installed
    Remove {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Upgrade the system, Flatpaks and Snaps
    Update,
    /// Remove packages that are no longer needed
    Autoremove,
    /// Apply the GNOME or KDE Plasma preferences for the running desktop
    DesktopSetup,
    /// Set up dnf and the EPEL / RPM Fusion repositories
    SetupRepos {
        /// dnf configuration file
        #[arg(long, default_value = repos::DNF_CONF, value_hint = ValueHint::FilePath)]
        dnf_conf: PathBuf,
    },
}

impl Commands {
    fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::Info | Self::List { .. } | Self::Resolve { .. } | Self::Status { .. } | Self::Plan { .. }
        )
    }

    /// Desktop preferences belong to the user and are written without root.
    fn needs_root(&self) -> bool {
        !self.is_read_only() && !matches!(self, Self::DesktopSetup)
    }
}

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub distro: Option<OperatingSystem>,
}

/// Run a command and return the process exit code.
pub fn handle_command(command: Commands, options: &GlobalOptions) -> Result<i32> {
    if options.distro.is_some() && !command.is_read_only() {
        bail!("--distro only applies to info, list, resolve, status and plan");
    }

    let os = match &options.distro {
        Some(os) => os.clone(),
        None => OperatingSystem::detect(),
    };
    let distribution = resolve_distribution(os)?;
    let config = Config::load(options.config.as_deref())?;

    if command.needs_root() {
        privileges::require_root()?;
    }

    // A foreign distribution is described, never inspected: its installed
    // state reads as empty.
    let reader: &dyn CommandRunner = if options.distro.is_some() {
        &DetachedRunner
    } else {
        &SystemRunner
    };

    match command {
        Commands::Info => show_info(&distribution),
        Commands::List { category } => list_packages(&distribution, &config, category),
        Commands::Resolve { key } => resolve_package(&distribution, &config, &key),
        Commands::Status { category } => {
            let session = open_session(distribution, config, reader)?;
            show_status(&session, category);
            Ok(0)
        }
        Commands::Plan { changes } => {
            let session = open_session(distribution, config, reader)?;
            show_plan(&session, &desired_from(changes))
        }
        Commands::Apply { changes } => {
            let mut session = open_session(distribution, config, &SystemRunner)?;
            apply(&mut session, &desired_from(changes))
        }
        Commands::Install { keys, via } => {
            let mut session = open_session(distribution, config, &SystemRunner)?;
            let desired = keys.into_iter().map(|k| (k, Target::Via(via))).collect();
            apply(&mut session, &desired)
        }
        Commands::Remove { keys } => {
            let mut session = open_session(distribution, config, &SystemRunner)?;
            let desired = keys.into_iter().map(|k| (k, Target::NotInstalled)).collect();
            apply(&mut session, &desired)
        }
        Commands::Update => {
            open_session(distribution, config, &SystemRunner)?.update()?;
            Ok(0)
        }
        Commands::Autoremove => {
            open_session(distribution, config, &SystemRunner)?.autoremove()?;
            Ok(0)
        }
        Commands::DesktopSetup => {
            let Some(desktop) = DesktopEnvironment::detect() else {
                bail!("No GNOME or KDE Plasma session detected");
            };
            tweaks::setup(
                &SystemRunner,
                desktop,
                distribution.family,
                &DesktopUser::detect(),
            )?;
            Ok(0)
        }
        Commands::SetupRepos { dnf_conf } => {
            let session = open_session(distribution, config, &SystemRunner)?;
            repos::setup(&session, &mut DialoguerPrompter, &dnf_conf)?;
            Ok(0)
        }
        Commands::Menu => {
            let mut session = open_session(distribution, config, &SystemRunner)?;
            menu::run(&mut session, &mut DialoguerPrompter, Path::new(repos::DNF_CONF))?;
            Ok(0)
        }
    }
}

fn open_session<'a>(
    distribution: Distribution,
    config: Config,
    runner: &'a dyn CommandRunner,
) -> Result<Session<'a>> {
    let session = Session::open(distribution, Catalog::builtin()?, config, runner)?;
    Ok(session.with_desktop(DesktopEnvironment::detect()))
}

fn desired_from(changes: Vec<(String, Target)>) -> DesiredState {
    // Later assignments for the same key win.
    changes.into_iter().collect::<BTreeMap<_, _>>()
}

fn show_info(distribution: &Distribution) -> Result<i32> {
    emit(
        Level::Info,
        "info.distribution",
        &format!(
            "{} {}\n{} {}\n{} {}",
            "Distribution:".bold(),
            distribution.id,
            "Repository family:".bold(),
            distribution.family,
            "Package manager:".bold(),
            distribution.package_manager
        ),
        Some(serde_json::json!({
            "distribution": distribution.id.id(),
            "family": distribution.family.as_str(),
            "package_manager": distribution.package_manager,
        })),
    );
    Ok(0)
}

fn method_list(methods: &[InstallMethod]) -> String {
    if methods.is_empty() {
        return "unavailable".dimmed().to_string();
    }
    methods
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_packages(
    distribution: &Distribution,
    config: &Config,
    category: Option<Category>,
) -> Result<i32> {
    let catalog = Catalog::builtin()?.with_module_overrides(config.modules.clone())?;
    let categories = match category {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    for category in categories {
        if get_output_format() == OutputFormat::Text {
            println!("{}", category.as_str().bold());
        }
        for spec in catalog.by_category(category) {
            let methods = spec.available_methods(distribution);
            let desktop = spec
                .desktop_environment
                .map(|de| format!(" ({} only)", de))
                .unwrap_or_default();
            emit(
                Level::Info,
                "list.package",
                &format!(
                    "  {:<24} {:<40} {}{}",
                    spec.key,
                    spec.display_name,
                    method_list(&methods),
                    desktop
                ),
                Some(serde_json::json!({
                    "key": spec.key,
                    "name": spec.display_name,
                    "category": category.as_str(),
                    "methods": methods,
                    "desktop": spec.desktop_environment.map(|de| de.as_str()),
                })),
            );
        }
    }
    Ok(0)
}

fn resolve_package(distribution: &Distribution, config: &Config, key: &str) -> Result<i32> {
    let catalog = Catalog::builtin()?.with_module_overrides(config.modules.clone())?;
    let names = catalog.resolve_names(key, distribution)?;
    let modules = catalog.resolve_modules(key, distribution)?;
    let flatpak = catalog.resolve_flatpak(key)?;
    let snap = catalog.resolve_snap(key)?;

    let or_none = |s: String| if s.is_empty() { "-".to_string() } else { s };
    let snap_text = snap
        .map(|s| {
            let mut text = s.id.to_string();
            if s.is_classic {
                text.push_str(" --classic");
            }
            if !s.channel.is_empty() {
                text.push_str(&format!(" --channel {}", s.channel));
            }
            text
        })
        .unwrap_or_default();

    emit(
        Level::Info,
        "resolve.package",
        &format!(
            "{} on {}\n  repository: {}\n  modules:    {}\n  flatpak:    {}\n  snap:       {}",
            key.bold(),
            distribution.id,
            or_none(names.join(" ")),
            or_none(modules.join(" ")),
            or_none(flatpak.map(|f| f.id.to_string()).unwrap_or_default()),
            or_none(snap_text),
        ),
        Some(serde_json::json!({
            "key": key,
            "distribution": distribution.id.id(),
            "repository": names,
            "modules": modules,
            "flatpak": flatpak.map(|f| f.id),
            "snap": snap.map(|s| serde_json::json!({
                "id": s.id,
                "classic": s.is_classic,
                "official": s.is_official,
                "channel": s.channel,
            })),
        })),
    );
    Ok(0)
}

fn show_status(session: &Session<'_>, category: Option<Category>) {
    let specs: Vec<_> = match category {
        Some(category) => session
            .catalog()
            .visible(category, session.desktop())
            .collect(),
        None => session
            .catalog()
            .iter()
            .filter(|spec| session.state().active(spec.key).is_some())
            .collect(),
    };

    if specs.is_empty() {
        emit(Level::Info, "status.empty", "No catalog packages installed", None);
        return;
    }

    for spec in specs {
        let active = session.state().active(spec.key);
        let text = match active {
            Some(method) => method.display_name().green().to_string(),
            None => "not installed".dimmed().to_string(),
        };
        emit(
            Level::Info,
            "status.package",
            &format!("{:<24} {}", spec.key, text),
            Some(serde_json::json!({ "key": spec.key, "method": active })),
        );
    }
}

fn show_plan(session: &Session<'_>, desired: &DesiredState) -> Result<i32> {
    let operations = session.plan(desired)?;
    if operations.is_empty() {
        emit(
            Level::Info,
            "plan.empty",
            "Everything is already in the requested state",
            None,
        );
    }
    for (position, operation) in operations.iter().enumerate() {
        emit(
            Level::Info,
            "plan.operation",
            &format!("{:>3}. {}", position + 1, operation),
            serde_json::to_value(operation).ok(),
        );
    }
    Ok(0)
}

fn apply(session: &mut Session<'_>, desired: &DesiredState) -> Result<i32> {
    let reports = session.apply(desired)?;
    Ok(summarize(&reports))
}

/// Print a one-line summary and pick the exit code.
fn summarize(reports: &[OperationReport]) -> i32 {
    let failed = reports.iter().filter(|r| r.is_failure()).count();
    if reports.is_empty() {
        return 0;
    }

    separator(true);
    if failed == 0 {
        emit(
            Level::Success,
            "apply.done",
            &format!("{} operation(s) completed", reports.len()),
            None,
        );
        0
    } else {
        emit(
            Level::Error,
            "apply.failed",
            &format!("{} of {} operation(s) failed", failed, reports.len()),
            None,
        );
        EXIT_PARTIAL_FAILURE
    }
}
