use std::sync::Arc;
use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// An origin is allowed when it equals a configured origin, or extends one
/// with an explicit port (`http://localhost` admits `http://localhost:5173`).
pub fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|a| match origin.strip_prefix(a.as_str()) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())),
        None => false,
    })
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed: Arc<[String]> = allowed_origins.into();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &http::request::Parts| {
                let ok = origin
                    .to_str()
                    .map(|o| origin_allowed(&allowed, o))
                    .unwrap_or(false);
                if !ok {
                    tracing::warn!(origin = ?origin, "cors_origin_blocked");
                }
                ok
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, X_REQUESTED_WITH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(24 * 60 * 60))
}

#[cfg(test)]
mod tests {
    use super::origin_allowed;

    fn allowed() -> Vec<String> {
        vec!["http://localhost".into(), "http://frontend:3000".into()]
    }

    #[test]
    fn matches_exact_and_port_extended_origins() {
        assert!(origin_allowed(&allowed(), "http://localhost"));
        assert!(origin_allowed(&allowed(), "http://localhost:5173"));
        assert!(origin_allowed(&allowed(), "http://frontend:3000"));
    }

    #[test]
    fn rejects_lookalike_hosts() {
        assert!(!origin_allowed(&allowed(), "http://localhost.evil.com"));
        assert!(!origin_allowed(&allowed(), "http://frontend:30001x"));
        assert!(!origin_allowed(&allowed(), "https://localhost"));
    }
}
