//! Derives per-cycle authentication material from a page snapshot.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::constants::TARGET_DOMAIN;
use crate::models::session::{PageSnapshot, SessionMaterial};

static SCHEDULE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/schedule/(\d+)").expect("schedule id pattern is valid"));

/// Builds a cookie header and optional schedule id from the active page.
///
/// Returns `None` when the page is not on the target site or no cookies are
/// available at all. Jar cookies win over page cookies on a name collision;
/// a CSRF meta token rides along as a `CSRF-TOKEN` cookie.
pub fn extract_session(page: &PageSnapshot) -> Option<SessionMaterial> {
    if !is_target_site(&page.url) {
        return None;
    }

    let mut pairs = parse_cookie_pairs(&page.cookies);

    if let Some(csrf) = page.csrf_token.as_deref() {
        upsert(&mut pairs, "CSRF-TOKEN", csrf);
    }

    if let Some(jar) = page.jar_cookies.as_deref() {
        for (name, value) in parse_cookie_pairs(jar) {
            upsert(&mut pairs, &name, &value);
        }
    }

    if pairs.is_empty() {
        return None;
    }

    let cookie_header = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");

    let schedule_id = SCHEDULE_ID_RE
        .captures(&page.url)
        .map(|caps| caps[1].to_string());

    Some(SessionMaterial {
        cookie_header,
        schedule_id,
    })
}

fn is_target_site(raw_url: &str) -> bool {
    let Ok(url) = Url::parse(raw_url) else {
        return false;
    };
    match url.host_str() {
        Some(host) => {
            host == TARGET_DOMAIN || host.ends_with(&format!(".{TARGET_DOMAIN}"))
        }
        None => false,
    }
}

fn parse_cookie_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|piece| {
            let piece = piece.trim();
            if piece.is_empty() {
                return None;
            }
            let (name, value) = piece.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

// Keeps first-seen ordering so the header stays stable across merges.
fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter_mut().find(|(n, _)| n == name) {
        Some(pair) => pair.1 = value.to_string(),
        None => pairs.push((name.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(url: &str, cookies: &str) -> PageSnapshot {
        PageSnapshot {
            url: url.to_string(),
            cookies: cookies.to_string(),
            csrf_token: None,
            jar_cookies: None,
        }
    }

    #[test]
    fn extracts_cookies_and_schedule_id() {
        let page = snapshot(
            "https://ais.usvisa-info.com/en-ca/niv/schedule/12345/appointment",
            "sid=abc; locale=en",
        );

        let session = extract_session(&page).unwrap();
        assert_eq!(session.cookie_header, "sid=abc; locale=en");
        assert_eq!(session.schedule_id.as_deref(), Some("12345"));
    }

    #[test]
    fn schedule_id_absent_outside_schedule_pages() {
        let page = snapshot("https://ais.usvisa-info.com/en-ca/niv/account", "sid=abc");
        let session = extract_session(&page).unwrap();
        assert_eq!(session.schedule_id, None);
    }

    #[test]
    fn jar_cookies_win_on_collision() {
        let mut page = snapshot("https://ais.usvisa-info.com/en-ca/niv", "sid=stale; locale=en");
        page.jar_cookies = Some("sid=fresh; extra=1".to_string());

        let session = extract_session(&page).unwrap();
        assert_eq!(session.cookie_header, "sid=fresh; locale=en; extra=1");
    }

    #[test]
    fn csrf_token_becomes_a_cookie() {
        let mut page = snapshot("https://ais.usvisa-info.com/en-ca/niv", "sid=abc");
        page.csrf_token = Some("tok123".to_string());

        let session = extract_session(&page).unwrap();
        assert_eq!(session.cookie_header, "sid=abc; CSRF-TOKEN=tok123");
    }

    #[test]
    fn rejects_other_sites() {
        assert!(extract_session(&snapshot("https://example.com/schedule/1", "sid=abc")).is_none());
        // Suffix match must be on the domain boundary.
        assert!(
            extract_session(&snapshot("https://evilusvisa-info.com/x", "sid=abc")).is_none()
        );
    }

    #[test]
    fn rejects_pages_without_cookies() {
        assert!(extract_session(&snapshot("https://ais.usvisa-info.com/en-ca", "")).is_none());
    }
}
