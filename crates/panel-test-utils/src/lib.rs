//! Shared test utilities for the smart-panel extension workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`package`]: [`PackageBuilder`] for writing `package.json` fixtures
//! - [`workspace`]: [`TestWorkspace`], a temporary directory laid out like an
//!   application checkout with install trees

pub mod package;
pub mod workspace;

pub use package::PackageBuilder;
pub use workspace::TestWorkspace;
