use crate::pkg::internal::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> AppState {
        AppState { store }
    }
}
