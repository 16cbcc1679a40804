use crate::error::ApiError;

/// Hosts accepted by the validator: the primary domain and the two
/// short-link subdomains.
const VALID_DOMAINS: [&str; 3] = ["tiktok.com", "vm.tiktok.com", "vt.tiktok.com"];

/// Validate that the URL points at TikTok.
///
/// This is a substring containment check, not a URL-authority parse; a URL
/// that merely embeds one of the domains (e.g. in a query parameter) passes.
/// The permissiveness is preserved on purpose to keep the accept/reject
/// behavior observable-compatible with the service this replaces.
pub fn validate_tiktok_url(url: &str) -> Result<(), ApiError> {
    if url.is_empty() {
        return Err(ApiError::MissingUrl);
    }

    if !VALID_DOMAINS.iter().any(|domain| url.contains(domain)) {
        return Err(ApiError::InvalidUrl);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tiktok_urls() {
        assert!(validate_tiktok_url("https://www.tiktok.com/@user/video/123").is_ok());
        assert!(validate_tiktok_url("https://vm.tiktok.com/ZMabcdef/").is_ok());
        assert!(validate_tiktok_url("https://vt.tiktok.com/ZSabcdef/").is_ok());
    }

    #[test]
    fn rejects_empty_url() {
        assert!(matches!(validate_tiktok_url(""), Err(ApiError::MissingUrl)));
    }

    #[test]
    fn rejects_other_hosts() {
        assert!(matches!(
            validate_tiktok_url("https://www.youtube.com/watch?v=abc"),
            Err(ApiError::InvalidUrl)
        ));
        assert!(matches!(
            validate_tiktok_url("not a url at all"),
            Err(ApiError::InvalidUrl)
        ));
    }

    #[test]
    fn substring_check_is_permissive() {
        // Known looseness: the domain may appear anywhere in the string.
        assert!(validate_tiktok_url("https://evil.example/?u=tiktok.com").is_ok());
    }
}
