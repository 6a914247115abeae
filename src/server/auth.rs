//! Access token extraction.

use axum_extra::headers::Cookie;
use axum_extra::TypedHeader;

use crate::error::RelayError;

/// Name of the cookie holding the upstream bearer token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The caller's access token, if the cookie is present and non-empty.
pub fn access_token(cookie: Option<&TypedHeader<Cookie>>) -> Option<String> {
    cookie
        .and_then(|TypedHeader(cookie)| cookie.get(ACCESS_TOKEN_COOKIE))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
}

/// Like [`access_token`], failing with `missing` when there is none.
pub fn require_token(
    cookie: Option<&TypedHeader<Cookie>>,
    missing: RelayError,
) -> Result<String, RelayError> {
    access_token(cookie).ok_or(missing)
}
