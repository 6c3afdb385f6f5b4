//! Canonical request construction.

use percent_encoding::percent_decode_str;
use std::fmt::{self, Write};
use url::Url;

use crate::SignableRequest;

/// Deterministic text form of a request, the input to the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Upper-case HTTP method.
    pub method: String,
    /// Encoded path.
    pub uri: String,
    /// Sorted, encoded query string.
    pub query: String,
    /// `name:value\n` lines sorted by name.
    pub headers: String,
    /// `;`-joined list of signed header names.
    pub signed_headers: String,
    /// Hex SHA-256 of the body.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Build the canonical form of `request`.
    ///
    /// `double_encode_path` is true for every service except S3, whose
    /// paths are encoded once.
    pub fn from_request(
        request: &SignableRequest,
        payload_hash: &str,
        double_encode_path: bool,
    ) -> Self {
        let mut headers = String::new();
        let mut names = Vec::new();

        // SignableRequest keeps headers lower-cased and sorted by name.
        for (name, value) in request.headers() {
            let _ = writeln!(headers, "{}:{}", name, normalize_header_value(value));
            names.push(name);
        }

        Self {
            method: request.method().as_str().to_ascii_uppercase(),
            uri: canonical_uri(request.uri(), double_encode_path),
            query: canonical_query(request.uri()),
            headers,
            signed_headers: names.join(";"),
            payload_hash: payload_hash.to_string(),
        }
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method, self.uri, self.query, self.headers, self.signed_headers, self.payload_hash
        )
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub(crate) fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

fn canonical_uri(uri: &Url, double_encode: bool) -> String {
    let path = uri.path();
    if path.is_empty() {
        return "/".to_string();
    }

    if !double_encode {
        return path.to_string();
    }

    path.split('/')
        .map(|segment| uri_encode(segment, true))
        .collect::<Vec<_>>()
        .join("/")
}

// `+` is a literal plus here, not a form-encoded space.
fn canonical_query(uri: &Url) -> String {
    let Some(query) = uri.query() else {
        return String::new();
    };

    let mut pairs: Vec<(String, String)> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                uri_encode(&percent_decode_str(key).decode_utf8_lossy(), true),
                uri_encode(&percent_decode_str(value).decode_utf8_lossy(), true),
            )
        })
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use http::Method;

    fn request(uri: &str) -> SignableRequest {
        SignableRequest::new(
            Method::GET,
            Url::parse(uri).unwrap(),
            Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap(),
        )
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("abc-XYZ_0.9~", true), "abc-XYZ_0.9~");
        assert_eq!(uri_encode("a b", true), "a%20b");
        assert_eq!(uri_encode("a/b", true), "a%2Fb");
        assert_eq!(uri_encode("a/b", false), "a/b");
        assert_eq!(uri_encode("é", true), "%C3%A9");
    }

    #[test]
    fn test_path_double_encoded() {
        let req = request("https://example.com/my%20index/_search");

        let double = CanonicalRequest::from_request(&req, "", true);
        assert_eq!(double.uri, "/my%2520index/_search");

        let single = CanonicalRequest::from_request(&req, "", false);
        assert_eq!(single.uri, "/my%20index/_search");
    }

    #[test]
    fn test_query_sorted_and_encoded() {
        let req = request("https://example.com/?b=2&a=z&a=y&c=hello world");
        let canonical = CanonicalRequest::from_request(&req, "", true);

        assert_eq!(canonical.query, "a=y&a=z&b=2&c=hello%20world");
    }

    #[test]
    fn test_query_plus_is_literal() {
        let req = request("https://example.com/?q=a+b&r=c%2Bd&flag");
        let canonical = CanonicalRequest::from_request(&req, "", true);

        assert_eq!(canonical.query, "flag=&q=a%2Bb&r=c%2Bd");
    }

    #[test]
    fn test_header_values_trimmed_and_collapsed() {
        let req = request("https://example.com/")
            .with_header("My-Header", "  a   b  c ")
            .with_header("Host", "example.com");
        let canonical = CanonicalRequest::from_request(&req, "", true);

        assert_eq!(canonical.headers, "host:example.com\nmy-header:a b c\n");
        assert_eq!(canonical.signed_headers, "host;my-header");
    }

    #[test]
    fn test_display_layout() {
        let req = request("https://example.amazonaws.com/")
            .with_header("host", "example.amazonaws.com")
            .with_header("x-amz-date", "20150830T123600Z");
        let canonical = CanonicalRequest::from_request(
            &req,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            true,
        );

        assert_eq!(
            canonical.to_string(),
            "GET\n/\n\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
