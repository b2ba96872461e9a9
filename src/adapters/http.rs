use crate::adapters::payload::parse_snapshot;
use crate::domain::model::StockSnapshot;
use crate::domain::ports::StockSource;
use crate::utils::error::{Result, StockError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::Client;
use std::collections::HashMap;

/// Fetches the stock document over HTTP, one GET per call.
#[derive(Debug, Clone)]
pub struct HttpStockFetcher {
    client: Client,
    endpoint: String,
    headers: HeaderMap,
}

impl HttpStockFetcher {
    pub fn new(client: Client, endpoint: impl Into<String>, referer: &str) -> Result<Self> {
        Self::with_extra_headers(client, endpoint, referer, &HashMap::new())
    }

    pub fn with_extra_headers(
        client: Client,
        endpoint: impl Into<String>,
        referer: &str,
        extra: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("priority", HeaderValue::from_static("u=1, i"));
        headers.insert("trpc-accept", HeaderValue::from_static("application/json"));
        headers.insert("x-trpc-source", HeaderValue::from_static("gag"));
        headers.insert(REFERER, header_value("referer", referer)?);

        for (name, value) in extra {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                StockError::InvalidConfigValueError {
                    field: "upstream.headers".to_string(),
                    value: name.clone(),
                    reason: format!("Invalid header name: {}", e),
                }
            })?;
            headers.insert(header_name, header_value(name, value)?);
        }

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            headers,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| StockError::InvalidConfigValueError {
        field: format!("upstream.headers.{}", name),
        value: value.to_string(),
        reason: format!("Invalid header value: {}", e),
    })
}

#[async_trait]
impl StockSource for HttpStockFetcher {
    async fn fetch_stock(&self) -> Result<StockSnapshot> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(StockError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let document: serde_json::Value = serde_json::from_slice(&body)?;
        parse_snapshot(document)
    }
}
