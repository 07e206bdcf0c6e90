use crate::model::{FetchError, Observation, ProductIdentifier, SessionToken, TokenError};
use crate::parser::{Parser, TikiProductParser};
use crate::scraper::token::acquire_guest_token;
use crate::scraper::traits::ProductApi;
use crate::scraper::BASE_URL;
use crate::utils::local_timestamp;

use reqwest::cookie::Jar;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::{Client, Proxy, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const API_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";
const API_ACCEPT: &str = "application/json, text/plain, */*";
const API_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,vi;q=0.8";
const GUEST_TOKEN_HEADER: &str = "x-guest-token";
const API_VERSION: &str = "3";
const API_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP session for one run. Both clients share one cookie jar; only the
/// product API goes through the proxy.
pub struct TikiScraper {
    jar: Arc<Jar>,
    direct: Client,
    proxied: Client,
    base: Url,
    parser: TikiProductParser,
}

impl TikiScraper {
    pub fn open(proxy_url: &str) -> Result<Self, reqwest::Error> {
        let base = Url::parse(BASE_URL).expect("BASE_URL is a valid URL");
        Self::with_base_url(proxy_url, base)
    }

    /// Same session against another site root; used to point at a local server.
    pub fn with_base_url(proxy_url: &str, base: Url) -> Result<Self, reqwest::Error> {
        let jar = Arc::new(Jar::default());

        let direct = Client::builder()
            .cookie_provider(jar.clone())
            .build()?;
        let proxied = Client::builder()
            .cookie_provider(jar.clone())
            .proxy(Proxy::all(proxy_url)?)
            .build()?;

        Ok(Self {
            jar,
            direct,
            proxied,
            base,
            parser: TikiProductParser::new(),
        })
    }
}

fn site_root(base: &Url) -> &str {
    base.as_str().trim_end_matches('/')
}

pub fn product_api_url(base: &Url, ids: &ProductIdentifier) -> String {
    format!(
        "{}/api/v2/products/{}?platform=web&spid={}&version={}",
        site_root(base),
        ids.product_id,
        ids.variant_id,
        API_VERSION
    )
}

/// Product page the request pretends to come from.
pub fn product_referer(base: &Url, ids: &ProductIdentifier) -> String {
    format!("{}/-p{}.html", site_root(base), ids.product_id)
}

#[async_trait::async_trait]
impl ProductApi for TikiScraper {
    async fn acquire_token(&self) -> Result<SessionToken, TokenError> {
        acquire_guest_token(&self.direct, &self.jar, &self.base).await
    }

    async fn fetch_product(
        &self,
        ids: &ProductIdentifier,
        token: &SessionToken,
    ) -> Result<Observation, FetchError> {
        info!("🔄 [API] Fetching product {}", ids.product_id);

        let response = self
            .proxied
            .get(product_api_url(&self.base, ids))
            .header(USER_AGENT, API_USER_AGENT)
            .header(ACCEPT, API_ACCEPT)
            .header(ACCEPT_LANGUAGE, API_ACCEPT_LANGUAGE)
            .header(GUEST_TOKEN_HEADER, token.as_str())
            .header(REFERER, product_referer(&self.base, ids))
            .timeout(API_TIMEOUT)
            .send()
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        self.parser
            .parse(&body, local_timestamp())
            .map_err(|e| FetchError::Unknown(e.to_string()))
    }
}
