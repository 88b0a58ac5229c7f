use url::Url;

/// URL utility functions.
pub struct UrlUtil;

impl UrlUtil {
    /// Normalize an API base URL: it must parse as an absolute HTTP(S) URL,
    /// and any trailing slash is removed so paths can be appended verbatim.
    pub fn normalize_base_url(base_url: &str) -> Result<String, String> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err("base URL cannot be empty".to_string());
        }

        let url = Url::parse(trimmed).map_err(|e| format!("invalid base URL '{trimmed}': {e}"))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "base URL must use HTTP or HTTPS scheme, got '{scheme}'"
                ));
            }
        }

        if url.host_str().is_none() {
            return Err("base URL must have a host".to_string());
        }

        Ok(trimmed.trim_end_matches('/').to_string())
    }

    /// Append an API path (which must start with `/`) to a normalized base URL.
    pub fn join(base_url: &str, path: &str) -> String {
        if path.starts_with('/') {
            format!("{base_url}{path}")
        } else {
            format!("{base_url}/{path}")
        }
    }
}
