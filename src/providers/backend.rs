use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ConstellationError;
use crate::types::{HealthResponse, QueryRequest, QueryResponse, ResponseData, StopResponse};

/// The agent backend the constellation polls.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn latest_answer(&self) -> Result<ResponseData>;

    async fn health(&self) -> Result<HealthResponse>;

    async fn send_query(&self, request: QueryRequest) -> Result<QueryResponse>;

    async fn stop(&self) -> Result<StopResponse>;
}

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| "http://localhost:8000".to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ConstellationError::Backend {
                endpoint: path.to_string(),
                status,
                body,
            }
            .into());
        }

        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        self.read_json(path, response).await
    }
}

#[async_trait]
impl AgentBackend for HttpBackend {
    async fn latest_answer(&self) -> Result<ResponseData> {
        self.get("/latest_answer").await
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.get("/health").await
    }

    async fn send_query(&self, request: QueryRequest) -> Result<QueryResponse> {
        let response = self
            .client
            .post(self.url("/query"))
            .json(&request)
            .send()
            .await?;
        self.read_json("/query", response).await
    }

    async fn stop(&self) -> Result<StopResponse> {
        self.get("/stop").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_backend_creation() {
        let backend = HttpBackend::new(None);
        assert_eq!(backend.base_url(), "http://localhost:8000");

        let backend = HttpBackend::new(Some("http://agents.local:9000/".to_string()));
        assert_eq!(backend.base_url(), "http://agents.local:9000");
        assert_eq!(backend.url("/health"), "http://agents.local:9000/health");
    }

    #[tokio::test]
    async fn test_unreachable_backend_errors() {
        let backend = HttpBackend::new(Some("http://127.0.0.1:9".to_string()));
        assert!(backend.latest_answer().await.is_err());
    }
}
