// Liveness client: one GET per call, bounded by a per-call timeout.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::RequestError;

pub trait LivenessClient {
    /// Issue one liveness request and return the HTTP status code.
    fn check(&self, timeout: Duration) -> impl Future<Output = Result<u16, RequestError>> + Send;
}

pub struct HttpLivenessClient {
    client: Client,
    url: Url,
}

impl HttpLivenessClient {
    /// `endpoint` is the service base URL; `health_path` is appended to it.
    pub fn new(endpoint: &str, health_path: &str) -> anyhow::Result<Self> {
        let raw = format!("{}{}", endpoint.trim_end_matches('/'), health_path);
        let url = Url::parse(&raw).map_err(|e| anyhow::anyhow!("invalid endpoint {}: {}", raw, e))?;
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("http client: {}", e))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl LivenessClient for HttpLivenessClient {
    async fn check(&self, timeout: Duration) -> Result<u16, RequestError> {
        let response = self
            .client
            .get(self.url.clone())
            .timeout(timeout)
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}
