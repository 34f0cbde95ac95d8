//! Package catalog lookups.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::entries::PACKAGES;
use super::{Category, FlatpakSpec, InstallMethod, PackageSpec, SnapSpec};
use crate::common::desktop::DesktopEnvironment;
use crate::common::distro::Distribution;

/// Errors in catalog authoring or lookup. These are bugs, not runtime
/// conditions, and end the session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("package '{0}' is not in the catalog")]
    UnknownPackage(String),

    #[error("package key '{0}' is defined more than once")]
    DuplicateKey(String),

    #[error("catalog entry '{0}' has an empty key")]
    EmptyKey(String),
}

/// Indexed view over a static package table.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: &'static [PackageSpec],
    index: HashMap<&'static str, usize>,
    module_overrides: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Validate and index a table. Keys must be non-empty and unique.
    pub fn new(specs: &'static [PackageSpec]) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(specs.len());
        for (position, spec) in specs.iter().enumerate() {
            if spec.key.trim().is_empty() {
                return Err(CatalogError::EmptyKey(spec.display_name.to_string()));
            }
            if index.insert(spec.key, position).is_some() {
                return Err(CatalogError::DuplicateKey(spec.key.to_string()));
            }
        }

        Ok(Self {
            specs,
            index,
            module_overrides: BTreeMap::new(),
        })
    }

    /// The built-in table.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(PACKAGES)
    }

    /// Replace the module streams of some packages, e.g. from user config.
    ///
    /// Every key must exist in the catalog.
    pub fn with_module_overrides(
        mut self,
        overrides: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, CatalogError> {
        for key in overrides.keys() {
            self.spec(key)?;
        }
        self.module_overrides = overrides;
        Ok(self)
    }

    pub fn spec(&self, key: &str) -> Result<&PackageSpec, CatalogError> {
        self.index
            .get(key)
            .map(|&position| &self.specs[position])
            .ok_or_else(|| CatalogError::UnknownPackage(key.to_string()))
    }

    /// All entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &PackageSpec> {
        self.specs.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &PackageSpec> {
        self.specs.iter().filter(move |s| s.category == category)
    }

    /// Entries of a category that should be offered on this desktop.
    pub fn visible(
        &self,
        category: Category,
        desktop: Option<DesktopEnvironment>,
    ) -> impl Iterator<Item = &PackageSpec> {
        self.by_category(category)
            .filter(move |s| s.visible_on(desktop))
    }

    /// Concrete repository package names for `key` on `distribution`.
    pub fn resolve_names(
        &self,
        key: &str,
        distribution: &Distribution,
    ) -> Result<&'static [&'static str], CatalogError> {
        Ok(self.spec(key)?.repository_names(distribution))
    }

    /// Repository packages that provide Flatpak or Snap here. Empty when the
    /// method cannot be set up on `distribution`, and always for the
    /// repository itself.
    pub fn runtime_packages(
        &self,
        method: InstallMethod,
        distribution: &Distribution,
    ) -> &'static [&'static str] {
        method
            .runtime()
            .and_then(|(_, key)| self.resolve_names(key, distribution).ok())
            .unwrap_or_default()
    }

    /// Module streams to enable before a repository install.
    pub fn resolve_modules(
        &self,
        key: &str,
        distribution: &Distribution,
    ) -> Result<Vec<String>, CatalogError> {
        let spec = self.spec(key)?;
        if let Some(modules) = self.module_overrides.get(key) {
            return Ok(modules.clone());
        }
        Ok(spec
            .module_names(distribution)
            .iter()
            .map(|m| m.to_string())
            .collect())
    }

    pub fn resolve_flatpak(&self, key: &str) -> Result<Option<FlatpakSpec>, CatalogError> {
        Ok(self.spec(key)?.flatpak)
    }

    pub fn resolve_snap(&self, key: &str) -> Result<Option<SnapSpec>, CatalogError> {
        Ok(self.spec(key)?.snap)
    }
}
