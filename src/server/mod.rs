pub mod handlers;
pub mod rate_limiter;
pub mod routes;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

pub use handlers::AppState;
pub use rate_limiter::RateLimiter;
pub use routes::create_router;

pub const MAX_USERNAME_CHARS: usize = 39;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+(-[A-Za-z0-9]+)*$").expect("valid username regex"));

/// GitHub login rules: alphanumerics separated by single hyphens, at most
/// 39 characters.
pub fn validate_username(username: &str) -> Result<&str> {
    if username.len() <= MAX_USERNAME_CHARS && USERNAME_RE.is_match(username) {
        Ok(username)
    } else {
        Err(Error::InvalidUsername(username.to_string()))
    }
}
