//! Error handling for the backend API module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, refused connection, timeout, broken body stream.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The response body was not the JSON shape expected for the endpoint.
    #[error("Decoding error for {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Non-success status, only raised under the strict status policy.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }

    pub fn decode(endpoint: &str, source: serde_json::Error) -> ApiError {
        ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    }
}
