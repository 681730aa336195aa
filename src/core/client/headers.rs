//! Outbound header hygiene.
//!
//! Caller-supplied headers pass through a deny-list before every request.
//! Hop-by-hop and fingerprinting headers are stripped; comparison is
//! case-insensitive while the original casing of surviving keys is kept
//! for transmission. An `accept` header is guaranteed: a caller-supplied
//! value (any casing) survives, otherwise `application/json` is inserted.

use std::collections::HashMap;

/// Header names removed from every outbound request.
pub const UNSAFE_HEADERS: [&str; 6] = [
    "host",
    "connection",
    "sec-fetch-mode",
    "accept-encoding",
    "accept-language",
    "content-length",
];

/// Default media type when the caller supplied no accept header.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Produce a sanitized copy of `headers`.
pub fn sanitized_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    let mut clean: HashMap<String, String> = headers
        .iter()
        .filter(|(name, _)| {
            let lower = name.to_ascii_lowercase();
            !UNSAFE_HEADERS.contains(&lower.as_str())
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let has_accept = clean.keys().any(|k| k.eq_ignore_ascii_case("accept"));
    if !has_accept {
        clean.insert("accept".to_string(), DEFAULT_ACCEPT.to_string());
    }

    clean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_removes_unsafe_headers() {
        let clean = sanitized_headers(&headers(&[
            ("host", "evil.test"),
            ("Connection", "keep-alive"),
            ("Sec-Fetch-Mode", "cors"),
            ("accept-encoding", "gzip"),
            ("Accept-Language", "en"),
            ("Content-Length", "42"),
            ("X-Custom", "ok"),
        ]));

        for bad in UNSAFE_HEADERS {
            assert!(
                !clean.keys().any(|k| k.eq_ignore_ascii_case(bad)),
                "{bad} survived sanitization"
            );
        }
        assert_eq!(clean["X-Custom"], "ok");
    }

    #[test]
    fn test_inserts_accept_default() {
        let clean = sanitized_headers(&headers(&[("X-Custom", "ok")]));
        assert_eq!(clean["accept"], DEFAULT_ACCEPT);
    }

    #[test]
    fn test_preserves_caller_accept() {
        let clean = sanitized_headers(&headers(&[("Accept", "text/csv")]));
        assert_eq!(clean["Accept"], "text/csv");
        assert!(!clean.contains_key("accept"));
    }

    #[test]
    fn test_preserves_key_casing() {
        let clean = sanitized_headers(&headers(&[("X-Request-Id", "abc")]));
        assert!(clean.contains_key("X-Request-Id"));
    }

    #[test]
    fn test_empty_input_gets_accept_only() {
        let clean = sanitized_headers(&HashMap::new());
        assert_eq!(clean.len(), 1);
        assert_eq!(clean["accept"], DEFAULT_ACCEPT);
    }
}
