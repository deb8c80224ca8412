use serde::{Deserialize, Serialize};

/// What the client lifts from the currently active, authenticated page:
/// its URL, its `document.cookie` string, the CSRF meta token when the page
/// carries one, and the browser-jar cookies for the target domain when the
/// client was allowed to read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub cookies: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
    #[serde(default)]
    pub jar_cookies: Option<String>,
}

/// Authentication material for one refresh cycle. Derived fresh from a
/// `PageSnapshot` each time, never cached beyond the schedule id.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMaterial {
    pub cookie_header: String,
    pub schedule_id: Option<String>,
}
