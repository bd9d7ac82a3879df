//! URL helpers shared by the HTTP-backed sources.

/// Extracts the hostname from a URL for use in error messages and logs.
///
/// Falls back to the full URL string if parsing fails.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// Normalizes a website address as listed by a directory into an absolute
/// `http(s)` URL.
///
/// Listings often carry bare hosts such as `"glowspa.com"`; those get an
/// `https://` scheme. Anything that still does not parse, or uses another
/// scheme, is rejected.
pub fn normalize_website_url(raw: &str) -> Result<reqwest::Url, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty URL".to_owned());
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        match reqwest::Url::parse(trimmed) {
            Ok(url) if !has_port_after_colon(trimmed) => {
                return Err(format!("unsupported scheme \"{}\"", url.scheme()));
            }
            _ => format!("https://{}", trimmed.trim_start_matches("//")),
        }
    };

    let url = reqwest::Url::parse(&candidate).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err("URL has no host".to_owned()),
        other => Err(format!("unsupported scheme \"{other}\"")),
    }
}

/// `"localhost:8080/path"` parses as scheme `localhost`; treat a numeric
/// segment after the colon as a port instead.
fn has_port_after_colon(value: &str) -> bool {
    value
        .split_once(':')
        .map(|(_, rest)| rest.split('/').next().unwrap_or(""))
        .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
}
