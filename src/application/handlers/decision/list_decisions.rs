//! ListDecisionsHandler - Query handler for the decision index.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{CommandMetadata, WorkflowError};
use crate::ports::{DecisionReader, DecisionSummary, PendingCounts};

/// Query for the decision index, optionally narrowed to one category.
#[derive(Debug, Clone, Default)]
pub struct ListDecisionsQuery {
    pub category: Option<String>,
}

/// What the caller sees on the index.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionListing {
    /// The caller's own decisions, newest first. Empty for anonymous callers.
    pub own: Vec<DecisionSummary>,
    /// Public decisions owned by someone else, newest first.
    pub public: Vec<DecisionSummary>,
    /// Every distinct non-empty category, sorted.
    pub categories: Vec<String>,
    /// Pending feedback on the caller's decisions.
    pub pending: Option<PendingCounts>,
}

/// Handler for listing decisions.
pub struct ListDecisionsHandler {
    reader: Arc<dyn DecisionReader>,
}

impl ListDecisionsHandler {
    pub fn new(reader: Arc<dyn DecisionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListDecisionsQuery,
        metadata: CommandMetadata,
    ) -> Result<DecisionListing, WorkflowError> {
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let caller = metadata.actor.user_id();

        let own = match caller {
            Some(user) => self.reader.list_owned(user, category).await?,
            None => Vec::new(),
        };
        let public = self.reader.list_public(caller, category).await?;
        let categories = self.reader.categories().await?;
        let pending = match caller {
            Some(user) => Some(self.reader.pending_counts(user).await?),
            None => None,
        };

        Ok(DecisionListing {
            own,
            public,
            categories,
            pending,
        })
    }
}
