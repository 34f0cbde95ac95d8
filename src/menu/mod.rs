//! Interactive menu.
//!
//! Navigation is an explicit state machine: [`step`] maps the current state
//! and a selection to the next state plus the action to perform. Rendering
//! and input go through a [`Prompter`], so the loop runs the same against a
//! terminal or a script.

pub(crate) mod prompt;

pub use prompt::{DialoguerPrompter, Prompter};

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::common::desktop::DesktopEnvironment;
use crate::common::desktop::tweaks::{self, DesktopUser};
use crate::common::package::{Category, DesiredState, InstallMethod, PackageSpec, Session, Target};
use crate::common::repos;
use crate::ui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    CategorySelected(Category),
    PackageSelected(Category, &'static str),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainEntry {
    Update,
    Autoremove,
    SetupRepositories,
    GnomeSetup,
    KdeSetup,
    Category(Category),
    Exit,
}

impl MainEntry {
    /// Main menu entries. Desktop setup is only offered on its own desktop.
    pub fn all(desktop: Option<DesktopEnvironment>) -> Vec<MainEntry> {
        let mut entries = vec![Self::Update, Self::Autoremove, Self::SetupRepositories];
        match desktop {
            Some(DesktopEnvironment::Gnome) => entries.push(Self::GnomeSetup),
            Some(DesktopEnvironment::Plasma) => entries.push(Self::KdeSetup),
            None => {}
        }
        entries.extend(Category::ALL.into_iter().map(Self::Category));
        entries.push(Self::Exit);
        entries
    }

    pub fn label(&self) -> String {
        match self {
            Self::Update => "Update".to_string(),
            Self::Autoremove => "Autoremove".to_string(),
            Self::SetupRepositories => "Repository setup".to_string(),
            Self::GnomeSetup => "GNOME setup".to_string(),
            Self::KdeSetup => "KDE setup".to_string(),
            Self::Category(category) => category.to_string(),
            Self::Exit => "Exit".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageChoice {
    Via(InstallMethod),
    Uninstall,
    Back,
}

/// What the user picked on the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Main(MainEntry),
    Package(&'static str),
    Choice(PackageChoice),
    /// Escape or an explicit back entry.
    Back,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Update,
    Autoremove,
    SetupRepositories,
    DesktopSetup(DesktopEnvironment),
    Apply(DesiredState),
}

/// Advance the menu. Selections that do not belong to the current screen
/// leave the state unchanged.
pub fn step(state: MenuState, selection: Selection) -> (MenuState, Action) {
    use MenuState::*;

    match (state, selection) {
        (MainMenu, Selection::Main(entry)) => match entry {
            MainEntry::Update => (MainMenu, Action::Update),
            MainEntry::Autoremove => (MainMenu, Action::Autoremove),
            MainEntry::SetupRepositories => (MainMenu, Action::SetupRepositories),
            MainEntry::GnomeSetup => (MainMenu, Action::DesktopSetup(DesktopEnvironment::Gnome)),
            MainEntry::KdeSetup => (MainMenu, Action::DesktopSetup(DesktopEnvironment::Plasma)),
            MainEntry::Category(category) => (CategorySelected(category), Action::None),
            MainEntry::Exit => (Exit, Action::None),
        },
        (MainMenu, Selection::Back) => (Exit, Action::None),

        (CategorySelected(category), Selection::Package(key)) => {
            (PackageSelected(category, key), Action::None)
        }
        (CategorySelected(_), Selection::Back) => (MainMenu, Action::None),

        (PackageSelected(category, key), Selection::Choice(choice)) => match choice {
            PackageChoice::Via(method) => (
                CategorySelected(category),
                Action::Apply(BTreeMap::from([(key.to_string(), Target::Via(method))])),
            ),
            PackageChoice::Uninstall => (
                CategorySelected(category),
                Action::Apply(BTreeMap::from([(key.to_string(), Target::NotInstalled)])),
            ),
            PackageChoice::Back => (CategorySelected(category), Action::None),
        },
        (PackageSelected(category, _), Selection::Back) => (CategorySelected(category), Action::None),

        (state, _) => (state, Action::None),
    }
}

/// Packages offered in a category on this session's desktop.
///
/// With `hide_unavailable`, packages that no usable method can install here
/// are left out.
pub fn category_packages<'s>(session: &'s Session<'_>, category: Category) -> Vec<&'s PackageSpec> {
    let hide = session.config().hide_unavailable;
    session
        .catalog()
        .visible(category, session.desktop())
        .filter(|spec| !hide || !session.usable_methods(spec).is_empty())
        .collect()
}

/// Choices for one package: the methods usable here, then uninstall when it
/// is installed, then back.
pub fn package_choices(session: &Session<'_>, spec: &PackageSpec) -> Vec<PackageChoice> {
    let mut choices: Vec<PackageChoice> = session
        .usable_methods(spec)
        .into_iter()
        .map(PackageChoice::Via)
        .collect();
    if session.state().active(spec.key).is_some() {
        choices.push(PackageChoice::Uninstall);
    }
    choices.push(PackageChoice::Back);
    choices
}

fn status_label(session: &Session<'_>, spec: &PackageSpec) -> String {
    match session.state().active(spec.key) {
        Some(method) => format!("{} [{}]", spec.display_name, method.display_name()),
        None => spec.display_name.to_string(),
    }
}

fn choice_label(session: &Session<'_>, key: &str, choice: PackageChoice) -> String {
    match choice {
        PackageChoice::Via(method) if session.state().active(key) == Some(method) => {
            format!("{} (installed)", method.display_name())
        }
        PackageChoice::Via(method) => method.display_name().to_string(),
        PackageChoice::Uninstall => "Uninstall".to_string(),
        PackageChoice::Back => "Back".to_string(),
    }
}

/// Ask for the selection belonging to the current screen.
fn prompt(session: &Session<'_>, prompter: &mut dyn Prompter, state: MenuState) -> Result<Selection> {
    let picked = match state {
        MenuState::MainMenu => {
            let entries = MainEntry::all(session.desktop());
            let labels: Vec<String> = entries.iter().map(MainEntry::label).collect();
            let title = format!("Linux Setup - {}", session.distribution().id);
            prompter
                .select(&title, &labels)?
                .and_then(|i| entries.get(i).copied())
                .map(Selection::Main)
        }
        MenuState::CategorySelected(category) => {
            let packages = category_packages(session, category);
            let mut labels: Vec<String> = packages.iter().map(|s| status_label(session, s)).collect();
            labels.push("Back".to_string());
            prompter
                .select(category.as_str(), &labels)?
                .and_then(|i| packages.get(i))
                .map(|spec| Selection::Package(spec.key))
        }
        MenuState::PackageSelected(_, key) => {
            let spec = session.catalog().spec(key)?;
            let choices = package_choices(session, spec);
            let labels: Vec<String> = choices
                .iter()
                .map(|choice| choice_label(session, key, *choice))
                .collect();
            prompter
                .select(spec.display_name, &labels)?
                .and_then(|i| choices.get(i).copied())
                .map(Selection::Choice)
        }
        MenuState::Exit => None,
    };
    Ok(picked.unwrap_or(Selection::Back))
}

fn perform(
    session: &mut Session<'_>,
    prompter: &mut dyn Prompter,
    dnf_conf: &Path,
    action: Action,
) -> Result<()> {
    let result = match action {
        Action::None => return Ok(()),
        Action::Update => session.update(),
        Action::Autoremove => session.autoremove(),
        Action::SetupRepositories => repos::setup(session, prompter, dnf_conf),
        Action::DesktopSetup(desktop) => tweaks::setup(
            session.runner(),
            desktop,
            session.distribution().family,
            &DesktopUser::detect(),
        ),
        Action::Apply(desired) => {
            let reports = session.apply(&desired)?;
            let failed = reports.iter().filter(|r| r.is_failure()).count();
            if failed > 0 {
                emit(
                    Level::Warn,
                    "menu.apply",
                    &format!("{} operation(s) failed", failed),
                    None,
                );
            }
            Ok(())
        }
    };

    // The session continues after a failed maintenance action.
    if let Err(e) = result {
        emit(Level::Error, "menu.action", &format!("{:#}", e), None);
    }
    Ok(())
}

/// Run the menu until the user exits.
pub fn run(session: &mut Session<'_>, prompter: &mut dyn Prompter, dnf_conf: &Path) -> Result<()> {
    let mut state = MenuState::MainMenu;
    while state != MenuState::Exit {
        let selection = prompt(session, prompter, state)?;
        let (next, action) = step(state, selection);
        perform(session, prompter, dnf_conf, action)?;
        state = next;
    }
    Ok(())
}
