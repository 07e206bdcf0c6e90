use crate::model::{FetchError, Observation, ProductIdentifier, SessionToken, TokenError};

/// Remote side of one tracking run: a guest token, then product lookups with it.
#[async_trait::async_trait]
pub trait ProductApi: Send + Sync {
    async fn acquire_token(&self) -> Result<SessionToken, TokenError>;

    async fn fetch_product(
        &self,
        ids: &ProductIdentifier,
        token: &SessionToken,
    ) -> Result<Observation, FetchError>;
}
