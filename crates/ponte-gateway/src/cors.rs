// SPDX-FileCopyrightText: 2026 Ponte Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-origin and private-network access negotiation.
//!
//! Browsers calling a private-network address from a public page need two
//! opt-ins from the server: CORS headers naming the calling origin (a
//! wildcard cannot be combined with credentials) and the
//! Private-Network-Access allowance. This middleware negotiates both on
//! every response and short-circuits preflight requests before routing.
//!
//! Reflecting an arbitrary Origin with credentials enabled is a deliberate
//! policy for arbitrary-LAN deployments; hardened installations turn
//! [`CorsPolicy::allow_any_origin_with_credentials`] off and enumerate their
//! frontends in [`CorsPolicy::allowed_origins`] instead.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const ALLOW_PRIVATE_NETWORK: &str = "access-control-allow-private-network";

/// Which origins may authenticate cross-origin.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    /// Reflect every Origin header with `Allow-Credentials: true`.
    pub allow_any_origin_with_credentials: bool,
    /// Origins reflected with credentials when the blanket toggle is off.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_any_origin_with_credentials: true,
            allowed_origins: Vec::new(),
        }
    }
}

impl CorsPolicy {
    fn allows(&self, origin: &str) -> bool {
        self.allow_any_origin_with_credentials
            || self.allowed_origins.iter().any(|o| o == origin)
    }
}

/// Attach negotiated access-control headers to every response.
///
/// Preflight (`OPTIONS`) requests return a bare 204 before reaching any
/// route handler.
pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    apply_headers(response.headers_mut(), origin.as_deref(), &policy);
    response
}

/// Write the negotiated header set.
///
/// With a permitted Origin: reflect it and allow credentials. Without one
/// (server-to-server callers, or an origin outside the allow-list): fall
/// back to the credential-less wildcard. The private-network allowance is
/// unconditional.
fn apply_headers(headers: &mut HeaderMap, origin: Option<&str>, policy: &CorsPolicy) {
    let reflected = origin
        .filter(|o| policy.allows(o))
        .and_then(|o| HeaderValue::from_str(o).ok());

    match reflected {
        Some(value) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        None => {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        }
    }

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ALLOW_PRIVATE_NETWORK,
        HeaderValue::from_static("true"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_origin_gets_wildcard_without_credentials() {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, None, &CorsPolicy::default());

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }

    #[test]
    fn origin_is_reflected_with_credentials() {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, Some("http://x"), &CorsPolicy::default());

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://x");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[test]
    fn private_network_allowance_is_unconditional() {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, None, &CorsPolicy::default());
        assert_eq!(headers[ALLOW_PRIVATE_NETWORK], "true");

        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, Some("http://x"), &CorsPolicy::default());
        assert_eq!(headers[ALLOW_PRIVATE_NETWORK], "true");
    }

    #[test]
    fn methods_and_headers_are_advertised() {
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, None, &CorsPolicy::default());
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }

    #[test]
    fn allow_list_restricts_credentialed_reflection() {
        let policy = CorsPolicy {
            allow_any_origin_with_credentials: false,
            allowed_origins: vec!["http://crm.lan".to_string()],
        };

        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, Some("http://crm.lan"), &policy);
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://crm.lan"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        // An origin outside the list degrades to the wildcard, never to a
        // credentialed reflection.
        let mut headers = HeaderMap::new();
        apply_headers(&mut headers, Some("http://evil.example"), &policy);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    }
}
