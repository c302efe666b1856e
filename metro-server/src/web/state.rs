//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedRouter;

/// Shared application state.
///
/// The router owns the immutable graph and the cost-table cache, so this is
/// all a handler needs.
#[derive(Clone)]
pub struct AppState {
    /// Cached routing front-end over the loaded network.
    pub router: Arc<CachedRouter>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(router: CachedRouter) -> Self {
        Self {
            router: Arc::new(router),
        }
    }
}
