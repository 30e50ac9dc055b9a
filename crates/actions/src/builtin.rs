//! `StaticCatalog` — an in-memory catalog, either the built-in action set or
//! one loaded from a JSON definition.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::debug;

use crate::{AutomationAction, AutomationCatalog, CatalogError};

/// Fixed list of actions held in memory.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    actions: Vec<AutomationAction>,
}

impl StaticCatalog {
    /// The actions every installation ships with.
    pub fn builtin() -> Self {
        Self {
            actions: vec![
                AutomationAction::new("send_email", "Send Email", ["to", "subject"]),
                AutomationAction::new(
                    "generate_doc",
                    "Generate Document",
                    ["template", "recipient"],
                ),
            ],
        }
    }

    /// Build a catalog from an explicit list of actions.
    ///
    /// # Errors
    /// [`CatalogError::DuplicateAction`] if two actions share an ID.
    pub fn from_actions(actions: Vec<AutomationAction>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for action in &actions {
            if !seen.insert(action.id.as_str()) {
                return Err(CatalogError::DuplicateAction(action.id.clone()));
            }
        }
        Ok(Self { actions })
    }

    /// Parse a JSON array of `{ id, label, params }` objects.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let actions: Vec<AutomationAction> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        debug!("loaded {} automation actions", actions.len());
        Self::from_actions(actions)
    }

    /// Borrow the actions without going through the async trait.
    pub fn actions(&self) -> &[AutomationAction] {
        &self.actions
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl AutomationCatalog for StaticCatalog {
    async fn list(&self) -> Result<Vec<AutomationAction>, CatalogError> {
        Ok(self.actions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_lists_email_and_document_actions() {
        let catalog = StaticCatalog::builtin();
        let actions = catalog.list().await.unwrap();

        let ids: Vec<&str> = actions.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["send_email", "generate_doc"]);
        assert_eq!(actions[0].params, vec!["to", "subject"]);
        assert_eq!(actions[1].label, "Generate Document");
    }

    #[tokio::test]
    async fn get_finds_action_by_id() {
        let catalog = StaticCatalog::builtin();
        let action = catalog.get("generate_doc").await.unwrap();
        assert_eq!(action.params, vec!["template", "recipient"]);
    }

    #[tokio::test]
    async fn get_unknown_action_is_an_error() {
        let catalog = StaticCatalog::builtin();
        assert_eq!(
            catalog.get("launch_rocket").await,
            Err(CatalogError::UnknownAction("launch_rocket".into()))
        );
    }

    #[test]
    fn json_definition_is_loaded() {
        let catalog = StaticCatalog::from_json_str(
            r#"[{ "id": "notify_slack", "label": "Notify Slack", "params": ["channel"] },
                { "id": "noop", "label": "Do nothing" }]"#,
        )
        .unwrap();

        assert_eq!(catalog.actions().len(), 2);
        assert_eq!(catalog.actions()[0].params, vec!["channel"]);
        assert!(catalog.actions()[1].params.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = StaticCatalog::from_json_str(
            r#"[{ "id": "a", "label": "A" }, { "id": "a", "label": "Again" }]"#,
        );
        assert!(matches!(result, Err(CatalogError::DuplicateAction(id)) if id == "a"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            StaticCatalog::from_json_str("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
