//! URL utilities for consistent endpoint construction
//!
//! Base URLs from config or the environment may carry trailing slashes; these
//! helpers keep the final endpoint free of double slashes.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use finchat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://example.com/v1beta/"), "https://example.com/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Endpoint for a `generateContent` call against `model`.
///
/// A `models/` prefix on the model name is accepted and not doubled.
///
/// # Examples
///
/// ```
/// use finchat::utils::url::generate_content_url;
///
/// assert_eq!(
///     generate_content_url("https://example.com/v1beta/", "gemini-1.5-flash"),
///     "https://example.com/v1beta/models/gemini-1.5-flash:generateContent"
/// );
/// ```
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches('/');
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!(
        "{}/models/{}:generateContent",
        normalize_base_url(base_url),
        model
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1"),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url(" https://api.example.com/v1/// "),
            "https://api.example.com/v1"
        );
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_generate_content_url() {
        assert_eq!(
            generate_content_url("http://127.0.0.1:8080", "test-model"),
            "http://127.0.0.1:8080/models/test-model:generateContent"
        );
        assert_eq!(
            generate_content_url("http://127.0.0.1:8080/", "models/test-model"),
            "http://127.0.0.1:8080/models/test-model:generateContent"
        );
    }
}
