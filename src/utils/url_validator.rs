//! URL validation for agent submissions

use url::Url;

/// Validate an agent target URL
///
/// Requires an absolute http(s) URL with a host.
pub fn validate_url(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("URL must not be empty".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|e| format!("Invalid URL: {}", e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!(
                "Unsupported URL scheme '{}'. Use http:// or https://",
                other
            ));
        }
    }

    if parsed.host_str().is_none() {
        return Err("URL must include a host".to_string());
    }

    Ok(())
}
