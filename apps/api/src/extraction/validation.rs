use url::Url;

use crate::extraction::error::ExtractionError;

/// Checks that `raw` is an absolute http(s) URL before anything touches the network.
///
/// The raw string must itself begin with the scheme (no leading whitespace, no
/// upper-case scheme) and carry something after `://`.
pub fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .ok_or_else(|| ExtractionError::InvalidUrl(raw.to_string()))?;

    if rest.is_empty() {
        return Err(ExtractionError::InvalidUrl(raw.to_string()));
    }

    let url = Url::parse(raw).map_err(|_| ExtractionError::InvalidUrl(raw.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ExtractionError::InvalidUrl(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("https://jobs.example.com/posting/42").is_ok());
        assert!(validate_url("http://example.com").is_ok());
    }

    #[test]
    fn test_keeps_query_and_path() {
        let url = validate_url("https://boards.example.io/acme/jobs/123?gh_src=abc").unwrap();
        assert_eq!(url.path(), "/acme/jobs/123");
        assert_eq!(url.query(), Some("gh_src=abc"));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in [
            "ftp://example.com/file",
            "file:///etc/passwd",
            "javascript:alert(1)",
            "mailto:jobs@example.com",
        ] {
            let err = validate_url(input).unwrap_err();
            assert!(err.is_validation(), "{input} should be a validation error");
        }
    }

    #[test]
    fn test_rejects_bare_scheme_and_junk() {
        for input in ["", "http://", "https://", "example.com/jobs", "not a url", " https://example.com"] {
            assert!(validate_url(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_unparseable_host() {
        assert!(validate_url("http://exa mple.com").is_err());
        assert!(validate_url("https://[::1").is_err());
    }
}
