//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::GreeterConfig;
use crate::db::VisitorStore;
use crate::services::VisitService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the visitor store, the visit service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GreeterConfig,
    store: Arc<dyn VisitorStore>,
    visits: VisitService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Greeter configuration
    /// * `store` - Visitor store shared by every request
    #[must_use]
    pub fn new(config: GreeterConfig, store: Arc<dyn VisitorStore>) -> Self {
        let visits = VisitService::new(Arc::clone(&store));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                visits,
            }),
        }
    }

    /// Get a reference to the greeter configuration.
    #[must_use]
    pub fn config(&self) -> &GreeterConfig {
        &self.inner.config
    }

    /// Get a reference to the visitor store.
    #[must_use]
    pub fn store(&self) -> &dyn VisitorStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the visit service.
    #[must_use]
    pub fn visits(&self) -> &VisitService {
        &self.inner.visits
    }
}
