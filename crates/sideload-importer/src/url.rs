//! URL normalization and validation

use reqwest::Url;

/// Prefix a scheme when `raw` has none. Scheme-relative input (`//host/..`)
/// gets `http:`. Matching is case-sensitive.
pub fn normalize(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else if raw.starts_with("//") {
        format!("http:{}", raw)
    } else {
        format!("http://{}", raw)
    }
}

/// Parse `url` and require an http(s) scheme and a non-empty host.
pub fn parse_http_url(url: &str) -> Result<Url, String> {
    let parsed = Url::parse(url).map_err(|e| format!("{}: {}", url, e))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{}: only HTTP and HTTPS URLs are allowed", url));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(format!("{}: missing host", url)),
    }
}

pub fn validate(url: &str) -> bool {
    parse_http_url(url).is_ok()
}
