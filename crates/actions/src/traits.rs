//! The `AutomationCatalog` trait — the lookup every catalog backend provides.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// One automated action an `automated` workflow node can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationAction {
    /// Identifier stored in the node's `actionId`.
    pub id: String,
    /// Human-readable label shown by the editor.
    pub label: String,
    /// Names of the parameters the action requires.
    #[serde(default)]
    pub params: Vec<String>,
}

impl AutomationAction {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

/// Source of the available automation actions.
///
/// Lookups are asynchronous because real catalogs live behind a service
/// boundary; the built-in one answers immediately.
#[async_trait]
pub trait AutomationCatalog: Send + Sync {
    /// All actions, in catalog order.
    async fn list(&self) -> Result<Vec<AutomationAction>, CatalogError>;

    /// A single action by ID.
    async fn get(&self, id: &str) -> Result<AutomationAction, CatalogError> {
        self.list()
            .await?
            .into_iter()
            .find(|action| action.id == id)
            .ok_or_else(|| CatalogError::UnknownAction(id.to_owned()))
    }
}
