// src/fetch/token.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::FetchError;
use crate::config::OauthConfig;

/// Supplies a bearer token for the spreadsheet API.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, FetchError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges a long-lived refresh token for an access token on every
/// call. Tokens are not cached; the values API is hit a handful of times
/// per snapshot, well inside the issuer's rate limits.
pub struct RefreshTokenSource {
    client: Client,
    config: OauthConfig,
}

impl RefreshTokenSource {
    pub fn new(client: Client, config: OauthConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl AccessTokenProvider for RefreshTokenSource {
    async fn access_token(&self) -> Result<String, FetchError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|error| FetchError::Token(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Token(format!(
                "{} returned HTTP {status}",
                self.config.token_url
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|error| FetchError::Token(error.to_string()))?;
        debug!("access token refreshed");
        Ok(body.access_token)
    }
}

/// Fixed token for tests and pre-issued credentials.
pub struct StaticToken(pub String);

#[async_trait]
impl AccessTokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, FetchError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn oauth_config(token_url: String) -> OauthConfig {
        OauthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            refresh_token: "refresh-token".to_string(),
            token_url,
        }
    }

    #[tokio::test]
    async fn exchanges_the_refresh_token_for_an_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "access_token": "issued-token" })),
            )
            .mount(&server)
            .await;

        let source =
            RefreshTokenSource::new(Client::new(), oauth_config(format!("{}/token", server.uri())));
        let token = source.access_token().await.unwrap();

        assert_eq!(token, "issued-token");
    }

    #[tokio::test]
    async fn non_success_status_surfaces_as_a_token_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source =
            RefreshTokenSource::new(Client::new(), oauth_config(format!("{}/token", server.uri())));
        let error = source.access_token().await.unwrap_err();

        assert!(matches!(error, FetchError::Token(_)));
        assert!(error.to_string().contains("401"));
    }

    #[tokio::test]
    async fn static_token_returns_its_value() {
        let token = StaticToken("fixed".to_string()).access_token().await.unwrap();
        assert_eq!(token, "fixed");
    }
}
