//! OAuth client-credentials exchange and the shared credential cell.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;

use crate::config::SalesforceConfig;
use crate::error::SalesforceError;

/// Bearer token plus the org-specific base URL it is valid against.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub instance_url: String,
}

impl Credential {
    /// Base URL of the versioned REST API for this org.
    pub fn api_base(&self, api_version: &str) -> String {
        format!(
            "{}/services/data/{}",
            self.instance_url.trim_end_matches('/'),
            api_version
        )
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

/// Body of a successful token response. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    instance_url: String,
}

/// Obtains credentials from the Salesforce token endpoint and caches the
/// most recent successful one.
///
/// Shared across sync runs behind an `Arc`. A failed exchange never clears
/// a previously cached credential.
pub struct SalesforceAuth {
    client: reqwest::Client,
    config: SalesforceConfig,
    credential: RwLock<Option<Credential>>,
}

impl SalesforceAuth {
    pub fn new(config: SalesforceConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, config: SalesforceConfig) -> Self {
        Self {
            client,
            config,
            credential: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &SalesforceConfig {
        &self.config
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Run the client-credentials exchange.
    ///
    /// Sends `POST {login_url}/services/oauth2/token` with a form body. On
    /// success the credential is stored in the cell and returned. Non-2xx
    /// responses, transport faults and malformed bodies all return `Err`
    /// with the cell left as it was. There is no retry.
    pub async fn authenticate(&self) -> Result<Credential, SalesforceError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(self.config.token_url())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Salesforce authentication rejected");
            return Err(SalesforceError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;

        let credential = Credential {
            access_token: token.access_token,
            instance_url: token.instance_url,
        };
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());

        tracing::info!(instance_url = %credential.instance_url, "Authenticated with Salesforce");
        Ok(credential)
    }

    /// The most recently obtained credential, if any.
    pub fn current(&self) -> Option<Credential> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
