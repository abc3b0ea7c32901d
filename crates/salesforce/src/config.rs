use std::fmt;

/// Default OAuth host for production orgs.
const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";

/// REST API version used for query and sobject endpoints.
const DEFAULT_API_VERSION: &str = "v59.0";

/// Connection settings for the Salesforce org.
#[derive(Clone)]
pub struct SalesforceConfig {
    /// OAuth host, e.g. `https://login.salesforce.com` or a My Domain URL.
    pub login_url: String,
    /// Connected-app consumer key.
    pub client_id: String,
    /// Connected-app consumer secret.
    pub client_secret: String,
    /// REST API version segment, e.g. `v59.0`.
    pub api_version: String,
}

impl SalesforceConfig {
    /// Build a config with the default API version.
    pub fn new(
        login_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            login_url: login_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Load Salesforce configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default                        |
    /// |----------------------------|----------|--------------------------------|
    /// | `SALESFORCE_LOGIN_URL`     | no       | `https://login.salesforce.com` |
    /// | `SALESFORCE_CLIENT_ID`     | **yes**  | --                             |
    /// | `SALESFORCE_CLIENT_SECRET` | **yes**  | --                             |
    /// | `SALESFORCE_API_VERSION`   | no       | `v59.0`                        |
    ///
    /// # Panics
    ///
    /// Panics if the client id or secret is not set or is empty.
    pub fn from_env() -> Self {
        let login_url =
            std::env::var("SALESFORCE_LOGIN_URL").unwrap_or_else(|_| DEFAULT_LOGIN_URL.into());

        let client_id = std::env::var("SALESFORCE_CLIENT_ID")
            .expect("SALESFORCE_CLIENT_ID must be set in the environment");
        assert!(!client_id.is_empty(), "SALESFORCE_CLIENT_ID must not be empty");

        let client_secret = std::env::var("SALESFORCE_CLIENT_SECRET")
            .expect("SALESFORCE_CLIENT_SECRET must be set in the environment");
        assert!(
            !client_secret.is_empty(),
            "SALESFORCE_CLIENT_SECRET must not be empty"
        );

        let api_version = std::env::var("SALESFORCE_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.into());

        Self {
            login_url,
            client_id,
            client_secret,
            api_version,
        }
    }

    /// The OAuth token endpoint for this org.
    pub fn token_url(&self) -> String {
        format!(
            "{}/services/oauth2/token",
            self.login_url.trim_end_matches('/')
        )
    }
}

impl fmt::Debug for SalesforceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesforceConfig")
            .field("login_url", &self.login_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}
