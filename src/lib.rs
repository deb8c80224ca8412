pub mod bus;
pub mod config;
pub mod constants;
pub mod fetch;
pub mod models;
pub mod render;
pub mod routes;
pub mod session;
pub mod store;

use std::sync::Arc;

use anyhow::Result;

use crate::bus::Bus;
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::store::Store;

/// Shared state handed to every route.
pub struct AppState {
    pub store: Arc<Store>,
    pub bus: Bus,
    pub fetcher: Fetcher,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let store = Arc::new(Store::open(&config.store_path)?);
        let bus = Bus::new();
        let fetcher = Fetcher::new(&config.base_url, store.clone(), bus.clone());
        Ok(AppState { store, bus, fetcher })
    }
}
