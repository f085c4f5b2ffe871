//! The `token` session cookie.

use axum::http::HeaderMap;

use super::jwt::JwtConfig;

/// Name of the cookie carrying the session JWT.
pub const SESSION_COOKIE: &str = "token";

/// `Set-Cookie` value installing a session token.
pub fn session_cookie(token: &str, config: &JwtConfig) -> String {
    build(token, config.expiry_secs(), config.cookie_secure)
}

/// `Set-Cookie` value expiring the session cookie.
pub fn clear_session_cookie(config: &JwtConfig) -> String {
    build("", 0, config.cookie_secure)
}

fn build(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find the session token in the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;

    fn config(secure: bool) -> JwtConfig {
        JwtConfig {
            secret: "s".into(),
            expiry_days: 7,
            cookie_secure: secure,
        }
    }

    #[test]
    fn session_cookie_attributes() {
        let c = session_cookie("abc", &config(true));
        assert!(c.starts_with("token=abc; "));
        assert!(c.contains("HttpOnly"));
        assert!(c.contains("Max-Age=604800"));
        assert!(c.ends_with("; Secure"));
        assert!(!session_cookie("abc", &config(false)).contains("Secure"));
    }

    #[test]
    fn clearing_cookie_expires_it() {
        assert!(clear_session_cookie(&config(false)).starts_with("token=; "));
        assert!(clear_session_cookie(&config(false)).contains("Max-Age=0"));
    }

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=jwt.value.here; x=1"));
        assert_eq!(token_from_headers(&headers), Some("jwt.value.here"));
    }

    #[test]
    fn empty_or_missing_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(token_from_headers(&headers), None);
    }
}
