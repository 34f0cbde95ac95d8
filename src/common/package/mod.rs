//! Package catalog and reconciliation across distributions.
//!
//! # Architecture
//!
//! - [`PackageSpec`]: one catalog entry, with a [`NameRule`] per distribution
//!   for repository names and optional Flatpak / Snap identifiers
//! - [`Catalog`]: indexed lookups over the static table in `entries`
//! - [`installed`]: what is installed right now, per [`InstallMethod`]
//! - [`reconcile`]: plan and apply the move to a desired state
//!
//! # Precedence
//!
//! When a package is present through more than one method it is reported as
//! installed via the first of: repository, Flatpak, Snap.
//!
//! # Example
//!
//! ```ignore
//! use crate::common::package::{FlatpakSpec, PackageSpec};
//! use crate::{names, package};
//!
//! static CODE: PackageSpec = package! {
//!     "code", "VS Code", Editors,
//!     repo: names!([]; Manager(Pm::Pacman) => ["code"]),
//!     flatpak: FlatpakSpec::new("com.visualstudio.code"),
//! };
//! ```

mod catalog;
mod definition;
mod entries;
mod macros;
mod manager;
pub mod installed;
pub mod provider;
pub mod reconcile;
mod rule;
pub mod session;

pub use catalog::Catalog;
pub use definition::{Category, FlatpakSpec, PackageSpec, SnapSpec, channel_track};
pub use manager::{InstallMethod, PackageManager};
pub use reconcile::{DesiredState, OperationReport, Target};
pub use rule::{NameRule, RuleTarget};
pub use session::Session;
