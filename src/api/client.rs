//! Shadow Realm API Client
//!
//! Plain HTTP/JSON client for the four read-only backend endpoints.

use crate::api::LedgerApi;
use crate::api::error::ApiError;
use crate::models::{Extrinsic, Tick};
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::fmt::{self, Display};
use std::str::FromStr;

// User-Agent string with dashboard version
const USER_AGENT: &str = concat!("shadow-realm-dash/", env!("CARGO_PKG_VERSION"));

/// How non-success HTTP statuses are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// The body is decoded regardless of status; only transport and
    /// decode failures are errors.
    #[default]
    Lenient,
    /// Any non-2xx status is an [`ApiError::Http`].
    Strict,
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(StatusPolicy::Lenient),
            "strict" => Ok(StatusPolicy::Strict),
            other => Err(format!(
                "unknown status policy '{other}', expected 'lenient' or 'strict'"
            )),
        }
    }
}

impl Display for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPolicy::Lenient => write!(f, "lenient"),
            StatusPolicy::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    status_policy: StatusPolicy,
}

impl ApiClient {
    /// Builds a client with the transport's default timeouts.
    pub fn new(base_url: &str, status_policy: StatusPolicy) -> Result<Self, ApiError> {
        Ok(Self {
            client: ClientBuilder::new().user_agent(USER_AGENT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            status_policy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, ApiError> {
        if self.status_policy == StatusPolicy::Strict && !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        limit: Option<u32>,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.get(&url);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response = request.send().await?;

        let response = self.handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        serde_json::from_slice(&response_bytes).map_err(|e| ApiError::decode(endpoint, e))
    }
}

#[async_trait::async_trait]
impl LedgerApi for ApiClient {
    async fn ticks_count(&self) -> Result<u64, ApiError> {
        self.get_json("ticks/count", None).await
    }

    async fn extrinsics_count(&self) -> Result<u64, ApiError> {
        self.get_json("extrinsics/count", None).await
    }

    async fn ticks(&self, limit: u32) -> Result<Vec<Tick>, ApiError> {
        self.get_json("ticks", Some(limit)).await
    }

    async fn extrinsics(&self, limit: u32) -> Result<Vec<Extrinsic>, ApiError> {
        self.get_json("extrinsics", Some(limit)).await
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Minimal HTTP/1.1 responder for exercising the client end to end.

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Canned `(status, body)` per request target, e.g. `"/ticks?limit=50"`.
    pub type Routes = HashMap<String, (u16, String)>;

    pub struct TestServer {
        pub base_url: String,
        pub requests: Arc<Mutex<Vec<String>>>,
    }

    pub async fn spawn(routes: Routes) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let seen = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&buf);
                    let target = head
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    seen.lock().unwrap().push(target.clone());

                    let (status, body) = routes
                        .get(&target)
                        .cloned()
                        .unwrap_or((404, "{\"detail\":\"Not Found\"}".to_string()));
                    let response = format!(
                        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        TestServer { base_url, requests }
    }
}
