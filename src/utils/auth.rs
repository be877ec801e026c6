//! Authentication helpers for outgoing requests.

/// Attach `Authorization: Bearer <token>` when a token is configured.
///
/// Blank tokens are treated as absent so an empty config value never sends a
/// malformed header.
pub fn add_auth_headers(
    request: reqwest::RequestBuilder,
    auth_token: Option<&str>,
) -> reqwest::RequestBuilder {
    match auth_token.map(str::trim).filter(|token| !token.is_empty()) {
        Some(token) => request.header("Authorization", format!("Bearer {token}")),
        None => request,
    }
}
