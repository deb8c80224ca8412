use std::collections::BTreeMap;

// Fixed HTTP inputs for the appointment days endpoint
pub const TARGET_DOMAIN: &str = "usvisa-info.com";
pub const DEFAULT_BASE_URL: &str = "https://ais.usvisa-info.com";

// The site rejects obviously non-browser clients
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const MAX_LOG_ENTRIES: usize = 20;
pub const EVENT_BUS_CAPACITY: usize = 64;

/// Mappings a fresh store starts with, until the user edits them.
pub fn default_location_mappings() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("94".to_string(), "Toronto".to_string()),
        ("92".to_string(), "Ottawa".to_string()),
    ])
}
