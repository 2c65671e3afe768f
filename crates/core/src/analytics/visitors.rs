//! Visitor identity for page-visit de-duplication.

use sha2::{Digest, Sha256};

use super::VisitRow;

/// Key shared by visits that carry no identifying data at all.
pub const ANONYMOUS_VISITOR: &str = "anonymous";

/// Stable key identifying the visitor behind a page visit.
///
/// Signed-in visits key on the profile, then the browser session id, then a
/// SHA-256 digest of `ip|user-agent` so raw addresses never reach the report.
#[must_use]
pub fn visitor_key(visit: &VisitRow) -> String {
    if let Some(profile) = visit.profile_id {
        return format!("profile:{profile}");
    }
    if let Some(session) = visit.session_id.as_deref().filter(|s| !s.is_empty()) {
        return format!("session:{session}");
    }

    let ip = visit.ip_address.as_deref().unwrap_or_default();
    let agent = visit.user_agent.as_deref().unwrap_or_default();
    if ip.is_empty() && agent.is_empty() {
        return ANONYMOUS_VISITOR.to_owned();
    }

    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hasher.update(b"|");
    hasher.update(agent.as_bytes());
    format!("fp:{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::ProfileId;

    fn visit() -> VisitRow {
        VisitRow {
            profile_id: None,
            session_id: None,
            ip_address: None,
            user_agent: None,
            path: "/".to_owned(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_profile_beats_session() {
        let mut v = visit();
        v.profile_id = Some(ProfileId::new(9));
        v.session_id = Some("abc".to_owned());
        assert_eq!(visitor_key(&v), "profile:9");

        v.profile_id = None;
        assert_eq!(visitor_key(&v), "session:abc");
    }

    #[test]
    fn test_fingerprint_is_hashed_and_stable() {
        let mut v = visit();
        v.ip_address = Some("203.0.113.7".to_owned());
        v.user_agent = Some("Mozilla/5.0".to_owned());

        let key = visitor_key(&v);
        assert!(key.starts_with("fp:"));
        assert!(!key.contains("203.0.113.7"));
        assert_eq!(key.len(), 3 + 64);
        assert_eq!(key, visitor_key(&v.clone()));

        v.user_agent = Some("curl/8".to_owned());
        assert_ne!(key, visitor_key(&v));
    }

    #[test]
    fn test_anonymous_visits_share_a_key() {
        let mut v = visit();
        v.session_id = Some(String::new());
        assert_eq!(visitor_key(&v), ANONYMOUS_VISITOR);
    }
}
