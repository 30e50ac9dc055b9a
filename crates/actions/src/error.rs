//! Catalog-level error type.

use thiserror::Error;

/// Errors returned by an [`AutomationCatalog`](crate::AutomationCatalog).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog backend could not be reached.
    #[error("automation catalog unavailable: {0}")]
    Unavailable(String),

    /// No action with this ID exists in the catalog.
    #[error("unknown automation action '{0}'")]
    UnknownAction(String),

    /// Two catalog entries share an ID.
    #[error("duplicate automation action '{0}'")]
    DuplicateAction(String),

    /// A catalog definition file could not be parsed.
    #[error("invalid catalog definition: {0}")]
    Parse(String),
}
