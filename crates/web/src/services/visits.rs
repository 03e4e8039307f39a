//! Visit registration service.
//!
//! Registration is find-or-create-then-increment inside one store
//! transaction. The store locks the name for the life of the transaction, so
//! concurrent registrations of the same name queue up rather than racing on
//! the unique constraint.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use greeter_core::{Page, PageRequest, Visitor};

use crate::db::{RepositoryError, VisitorStore};

/// Visit registration and listing.
///
/// Cheaply cloneable; clones share the same store.
#[derive(Clone)]
pub struct VisitService {
    store: Arc<dyn VisitorStore>,
}

impl VisitService {
    /// Create a new visit service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Record one visit for `name`, creating the visitor on first sight.
    ///
    /// Any string is accepted as a name, including the empty string.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the visitor's counter
    /// is saturated. Nothing is written in that case.
    #[instrument(skip(self))]
    pub async fn register_visit(&self, name: &str) -> Result<Visitor, RepositoryError> {
        let mut tx = self.store.begin().await?;

        let mut visitor = match tx.find_by_name(name).await? {
            Some(existing) => existing,
            None => {
                debug!("First visit, creating visitor");
                Visitor::new(name)
            }
        };
        visitor.record_visit()?;

        let saved = tx.save(visitor).await?;
        tx.commit().await?;

        info!(
            name = %saved.name,
            visitor_id = ?saved.id,
            visit_count = saved.visit_count,
            "Visit registered"
        );
        Ok(saved)
    }

    /// Read one page of registered visitors.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    #[instrument(skip(self))]
    pub async fn get_all_registered_users(
        &self,
        page: PageRequest,
    ) -> Result<Page<Visitor>, RepositoryError> {
        self.store.find_all(page).await
    }
}
