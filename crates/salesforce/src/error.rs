/// Errors from the Salesforce REST layer.
#[derive(Debug, thiserror::Error)]
pub enum SalesforceError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Salesforce returned a non-2xx status code.
    #[error("Salesforce API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not the JSON shape we expect.
    #[error("Unexpected Salesforce response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A remote call was attempted before any successful authentication.
    #[error("Not authenticated with Salesforce")]
    NotAuthenticated,
}
