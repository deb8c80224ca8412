use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_BASE_URL;

/// Runtime configuration, read once at startup from the environment
/// (`.env` is loaded by `main` before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub store_path: PathBuf,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            bind_addr: env::var("SLOTWATCH_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            store_path: env::var("SLOTWATCH_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("slotwatch-store.json")),
            base_url: env::var("SLOTWATCH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        }
    }
}
