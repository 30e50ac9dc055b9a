//! `actions` crate — the automation catalog consulted by the workflow editor.
//!
//! The catalog lists the automated actions an `automated` node may reference
//! together with the parameter names each action requires. The simulator
//! never consults it; only editing surfaces and field checks do.

pub mod builtin;
pub mod error;
pub mod mock;
pub mod traits;

pub use builtin::StaticCatalog;
pub use error::CatalogError;
pub use traits::{AutomationAction, AutomationCatalog};
