use crate::{
    availability::AvailabilityIndex, backend::StorageBackend, roster::default_roster,
    store::AppointmentStore,
};

pub mod availability;
pub mod backend;
pub mod configuration;
pub mod configuration_handler;
pub mod errors;
pub mod file_storage;
pub mod http;
pub mod local_storage;
pub mod roster;
pub mod seed;
pub mod store;
#[cfg(test)]
mod testutils;
pub mod types;
pub mod validation;

#[derive(Clone)]
pub struct AppState<B: StorageBackend> {
    pub store: AppointmentStore<B>,
    pub availability: AvailabilityIndex<B>,
}

impl<B: StorageBackend> AppState<B> {
    pub fn new(backend: B) -> Self {
        let store = AppointmentStore::new(backend);
        let availability = AvailabilityIndex::new(store.clone(), default_roster());
        Self {
            store,
            availability,
        }
    }
}
