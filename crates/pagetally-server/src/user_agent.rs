//! User-Agent classification via `woothee`.

use woothee::parser::Parser;

/// Label stored when woothee cannot name the browser or OS.
pub const UNKNOWN: &str = "Unknown";

/// Browser and device (operating system) names for a visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UaInfo {
    pub browser: String,
    pub device: String,
}

/// Classify a `User-Agent` header. Never fails: empty or unrecognised input
/// yields `Unknown` for both fields.
pub fn classify(user_agent: &str) -> UaInfo {
    let result = if user_agent.trim().is_empty() {
        None
    } else {
        Parser::new().parse(user_agent)
    };

    match result {
        Some(r) => UaInfo {
            browser: known_or_unknown(r.name),
            device: known_or_unknown(r.os),
        },
        None => UaInfo {
            browser: UNKNOWN.to_string(),
            device: UNKNOWN.to_string(),
        },
    }
}

// woothee reports "UNKNOWN" rather than an empty string.
fn known_or_unknown(value: &str) -> String {
    if value.is_empty() || value == "UNKNOWN" {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    #[test]
    fn desktop_chrome() {
        let ua = classify(CHROME_MAC);
        assert_eq!(ua.browser, "Chrome");
        assert_eq!(ua.device, "Mac OSX");
    }

    #[test]
    fn empty_header_is_unknown() {
        let ua = classify("");
        assert_eq!(ua.browser, UNKNOWN);
        assert_eq!(ua.device, UNKNOWN);
    }

    #[test]
    fn garbage_is_unknown() {
        let ua = classify("definitely-not-a-browser");
        assert_eq!(ua.browser, UNKNOWN);
        assert_eq!(ua.device, UNKNOWN);
    }
}
