use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use url::Url;

use crate::visit::EntryRef;

/// Compute a visitor ID from the requester's network address.
///
/// Formula: sha256(ip) encoded as 64 lowercase hex chars. The address is the
/// only input so the same requester keeps one pseudonymous identity across
/// entries and days; the raw address never reaches storage.
pub fn compute_visitor_id(ip: &str) -> String {
    hex::encode(Sha256::digest(ip.as_bytes()))
}

/// Compute the dedup key for a visit.
///
/// Formula: sha256("{identity}-{date}-{ip}") as 64 hex chars, where identity is
/// [`EntryRef::dedup_identity`]. Catalog entries are keyed by id rather than
/// slug so that every alias of an entry collides onto one row per day.
pub fn compute_visit_hash(entry: &EntryRef, date: NaiveDate, ip: &str) -> String {
    let input = format!(
        "{}-{}-{}",
        entry.dedup_identity(),
        date.format("%Y-%m-%d"),
        ip
    );
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Canonicalise a referrer to its origin, e.g. `https://news.ycombinator.com/`.
///
/// Returns `None` when the referrer is empty, points back at `site_url`,
/// cannot be parsed as a URL, or has no host. Ports 80 and 443 are dropped;
/// any other explicit port is kept.
pub fn normalize_referrer(raw: Option<&str>, site_url: &str) -> Option<String> {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;

    let site = site_url.trim().trim_end_matches('/');
    if !site.is_empty() && raw.to_ascii_lowercase().contains(&site.to_ascii_lowercase()) {
        return None;
    }

    let referrer = origin(&Url::parse(raw).ok()?)?;
    let site_origin = Url::parse(site).ok().and_then(|u| origin(&u));
    if site_origin.as_deref() == Some(referrer.as_str()) {
        return None;
    }
    Some(referrer)
}

/// `scheme://host[:port]/`, lowercased by the URL parser, ports 80 and 443 dropped.
fn origin(parsed: &Url) -> Option<String> {
    let host = parsed.host_str().filter(|h| !h.is_empty())?;
    let port = parsed
        .port()
        .filter(|p| !matches!(p, 80 | 443))
        .map(|p| format!(":{p}"))
        .unwrap_or_default();

    Some(format!("{}://{}{}/", parsed.scheme(), host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://blog.example.org";

    #[test]
    fn visitor_id_is_64_hex_chars() {
        let id = compute_visitor_id("1.2.3.4");
        assert_eq!(id.len(), 64, "visitor ID must be a full sha256 hex digest");
        assert!(
            id.chars().all(|c| c.is_ascii_hexdigit()),
            "visitor ID must contain only hex digits"
        );
        assert!(!id.contains("1.2.3.4"));
    }

    #[test]
    fn visitor_id_is_deterministic_and_address_specific() {
        assert_eq!(compute_visitor_id("1.2.3.4"), compute_visitor_id("1.2.3.4"));
        assert_ne!(compute_visitor_id("1.2.3.4"), compute_visitor_id("5.6.7.8"));
        assert_ne!(compute_visitor_id("::1"), compute_visitor_id("127.0.0.1"));
    }

    #[test]
    fn visit_hash_changes_with_each_component() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).expect("date");
        let next = day.succ_opt().expect("date");
        let base = compute_visit_hash(&EntryRef::post(42), day, "1.2.3.4");

        assert_eq!(base, compute_visit_hash(&EntryRef::post(42), day, "1.2.3.4"));
        assert_ne!(base, compute_visit_hash(&EntryRef::post(42), next, "1.2.3.4"));
        assert_ne!(base, compute_visit_hash(&EntryRef::post(42), day, "1.2.3.5"));
        assert_ne!(base, compute_visit_hash(&EntryRef::page(42), day, "1.2.3.4"));
    }

    #[test]
    fn visit_hash_distinguishes_virtual_paths() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).expect("date");
        let blog = compute_visit_hash(&EntryRef::virtual_entry("Blog", "blog"), day, "1.2.3.4");
        let tag = compute_visit_hash(
            &EntryRef::virtual_entry("Tag: rust", "tags/rust"),
            day,
            "1.2.3.4",
        );
        assert_ne!(blog, tag);
    }

    #[test]
    fn referrer_keeps_non_default_port_and_strips_path() {
        assert_eq!(
            normalize_referrer(Some("https://example.com:8443/some/path?x=1"), SITE).as_deref(),
            Some("https://example.com:8443/")
        );
    }

    #[test]
    fn referrer_port_matrix() {
        let cases = [
            ("https://example.com/path", Some("https://example.com/")),
            ("https://example.com:443/path", Some("https://example.com/")),
            ("http://example.com:80/a?b=c", Some("http://example.com/")),
            ("http://example.com:443/", Some("http://example.com/")),
            ("https://example.com:80/", Some("https://example.com/")),
            ("http://example.com:8080", Some("http://example.com:8080/")),
            ("https://News.YCombinator.com/item?id=1", Some("https://news.ycombinator.com/")),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                normalize_referrer(Some(raw), SITE).as_deref(),
                expected,
                "referrer {raw}"
            );
        }
    }

    #[test]
    fn referrer_missing_or_empty_is_absent() {
        assert_eq!(normalize_referrer(None, SITE), None);
        assert_eq!(normalize_referrer(Some(""), SITE), None);
        assert_eq!(normalize_referrer(Some("   "), SITE), None);
    }

    #[test]
    fn referrer_pointing_at_site_is_absent() {
        assert_eq!(normalize_referrer(Some(SITE), SITE), None);
        assert_eq!(
            normalize_referrer(Some("https://blog.example.org/hello-world"), SITE),
            None
        );
        assert_eq!(
            normalize_referrer(Some("https://blog.example.org/blog"), "https://blog.example.org/"),
            None
        );
    }

    #[test]
    fn self_referral_ignores_case_and_default_port() {
        assert_eq!(normalize_referrer(Some("HTTPS://BLOG.EXAMPLE.ORG/x"), SITE), None);
        assert_eq!(
            normalize_referrer(Some("https://blog.example.org/x"), "https://blog.example.org:443/"),
            None
        );
    }

    #[test]
    fn malformed_referrer_is_dropped() {
        assert_eq!(normalize_referrer(Some("not a url"), SITE), None);
        assert_eq!(normalize_referrer(Some("://missing-scheme"), SITE), None);
        assert_eq!(normalize_referrer(Some("mailto:someone@example.com"), SITE), None);
    }

    #[test]
    fn empty_site_url_never_matches() {
        assert_eq!(
            normalize_referrer(Some("https://google.com/search?q=x"), "").as_deref(),
            Some("https://google.com/")
        );
    }
}
