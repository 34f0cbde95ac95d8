//! One provisioning session: the resolved distribution, the catalog, the
//! detected install state and the runner every command goes through.

use thiserror::Error;

use super::catalog::{Catalog, CatalogError};
use super::installed;
use super::provider::Providers;
use super::{InstallMethod, PackageSpec};
use super::reconcile::{self, Bootstrap, DesiredState, InstallState, Operation, OperationReport, Reconciler};
use crate::common::config::Config;
use crate::common::desktop::DesktopEnvironment;
use crate::common::distro::{Distribution, OperatingSystem};
use crate::common::exec::CommandRunner;
use crate::ui::prelude::*;

/// Conditions that end the session before anything is changed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unsupported or unrecognized distribution: {0}")]
    UnknownDistribution(String),

    #[error("this operation requires root privileges")]
    NotRoot,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Turn a detected system into a usable triple.
pub fn resolve_distribution(os: OperatingSystem) -> Result<Distribution, SessionError> {
    let name = os.to_string();
    Distribution::from_os(os).ok_or(SessionError::UnknownDistribution(name))
}

pub struct Session<'a> {
    distribution: Distribution,
    catalog: Catalog,
    config: Config,
    runner: &'a dyn CommandRunner,
    desktop: Option<DesktopEnvironment>,
    state: InstallState,
    bootstrap: Bootstrap,
}

impl<'a> Session<'a> {
    /// Validate the catalog and read what is installed.
    pub fn open(
        distribution: Distribution,
        catalog: Catalog,
        config: Config,
        runner: &'a dyn CommandRunner,
    ) -> Result<Self, SessionError> {
        let catalog = catalog.with_module_overrides(config.modules.clone())?;
        let snapshot = installed::snapshot(runner, distribution.package_manager);
        let state = InstallState::from_snapshot(&catalog, &distribution, snapshot);

        emit(
            Level::Debug,
            "session.open",
            &format!(
                "Session on {} with {} installed catalog packages",
                distribution,
                state.iter().count()
            ),
            None,
        );

        Ok(Self {
            distribution,
            catalog,
            config,
            runner,
            desktop: None,
            state,
            bootstrap: Bootstrap::default(),
        })
    }

    pub fn with_desktop(mut self, desktop: Option<DesktopEnvironment>) -> Self {
        self.desktop = desktop;
        self
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn desktop(&self) -> Option<DesktopEnvironment> {
        self.desktop
    }

    pub fn state(&self) -> &InstallState {
        &self.state
    }

    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    /// Whether `method` works here: the repository always does, Flatpak and
    /// Snap when their tool is present or the catalog can install it.
    pub fn can_use(&self, method: InstallMethod) -> bool {
        match method.runtime() {
            None => true,
            Some((program, _)) => {
                self.runner.has_command(program)
                    || !self
                        .catalog
                        .runtime_packages(method, &self.distribution)
                        .is_empty()
            }
        }
    }

    /// Methods that can install `spec` on this system, in precedence order.
    pub fn usable_methods(&self, spec: &PackageSpec) -> Vec<InstallMethod> {
        spec.available_methods(&self.distribution)
            .into_iter()
            .filter(|method| self.can_use(*method))
            .collect()
    }

    pub fn providers(&self) -> Providers<'_> {
        Providers::new(self.runner, self.distribution.package_manager, &self.config)
    }

    pub fn plan(&self, desired: &DesiredState) -> Result<Vec<Operation>, CatalogError> {
        reconcile::plan(&self.catalog, &self.distribution, &self.state, desired)
    }

    /// Plan and run the move to `desired`. Only an unknown key is an error;
    /// package failures come back as reports.
    pub fn apply(&mut self, desired: &DesiredState) -> Result<Vec<OperationReport>, CatalogError> {
        let operations = self.plan(desired)?;
        if operations.is_empty() {
            emit(
                Level::Info,
                "reconcile.nothing",
                "Everything is already in the requested state",
                None,
            );
            return Ok(Vec::new());
        }

        let providers = Providers::new(self.runner, self.distribution.package_manager, &self.config);
        let reconciler = Reconciler::new(&self.catalog, &self.distribution, providers);
        Ok(reconciler.apply(&mut self.state, &mut self.bootstrap, &operations))
    }

    pub fn update(&self) -> anyhow::Result<()> {
        self.providers().update()
    }

    pub fn autoremove(&self) -> anyhow::Result<()> {
        self.providers().autoremove()
    }
}
