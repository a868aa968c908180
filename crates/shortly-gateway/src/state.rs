use std::sync::Arc;

use shortly_core::LinkStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn LinkStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn LinkStore {
        self.store.as_ref()
    }
}
