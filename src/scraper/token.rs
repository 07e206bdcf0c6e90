// Guest token bootstrap
use crate::model::{SessionToken, TokenError};
use crate::utils::cookie_value;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::info;

pub const GUEST_TOKEN_COOKIE: &str = "tiki_guest_token";
const BOOTSTRAP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(15);

/// Visits the home page so the server drops a guest token into `jar`.
pub async fn acquire_guest_token(
    client: &Client,
    jar: &Jar,
    home: &Url,
) -> Result<SessionToken, TokenError> {
    info!("ℹ️ Requesting guest token...");
    let response = client
        .get(home.clone())
        .header(USER_AGENT, BOOTSTRAP_USER_AGENT)
        .timeout(BOOTSTRAP_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    let cookies = jar.cookies(home);
    let header = cookies.as_ref().and_then(|v| v.to_str().ok());
    guest_token_from(status, header)
}

/// Decides the token from the bootstrap response alone.
pub fn guest_token_from(
    status: StatusCode,
    cookie_header: Option<&str>,
) -> Result<SessionToken, TokenError> {
    if !status.is_success() {
        return Err(TokenError::Status(status));
    }
    cookie_header
        .and_then(|header| cookie_value(header, GUEST_TOKEN_COOKIE))
        .map(SessionToken::new)
        .ok_or(TokenError::MissingCookie(GUEST_TOKEN_COOKIE))
}
