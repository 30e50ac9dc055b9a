//! `MockCatalog` — a test double for `AutomationCatalog`.
//!
//! Useful in API and editor tests where the catalog's answers (or its
//! failure) must be controlled and its usage observed.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{AutomationAction, AutomationCatalog, CatalogError};

/// Behaviour injected into `MockCatalog` at construction time.
pub enum MockBehaviour {
    /// Return these actions.
    Returning(Vec<AutomationAction>),
    /// Fail every lookup with `Unavailable`.
    Unavailable(String),
}

/// A mock catalog that counts how often it is listed.
pub struct MockCatalog {
    pub behaviour: MockBehaviour,
    calls: AtomicUsize,
}

impl MockCatalog {
    /// Create a mock that always answers with the given actions.
    pub fn returning(actions: Vec<AutomationAction>) -> Self {
        Self {
            behaviour: MockBehaviour::Returning(actions),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always fails.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::Unavailable(msg.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `list` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AutomationCatalog for MockCatalog {
    async fn list(&self) -> Result<Vec<AutomationAction>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behaviour {
            MockBehaviour::Returning(actions) => Ok(actions.clone()),
            MockBehaviour::Unavailable(msg) => Err(CatalogError::Unavailable(msg.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_each_list_call() {
        let catalog = MockCatalog::returning(vec![AutomationAction::new("x", "X", ["p"])]);

        catalog.list().await.unwrap();
        catalog.get("x").await.unwrap();

        assert_eq!(catalog.call_count(), 2);
    }

    #[tokio::test]
    async fn unavailable_mock_fails() {
        let catalog = MockCatalog::unavailable("backend down");
        assert_eq!(
            catalog.list().await,
            Err(CatalogError::Unavailable("backend down".into()))
        );
    }
}
