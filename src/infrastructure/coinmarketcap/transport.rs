use super::models::vendor_status;
use crate::domain::errors::QuoteError;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Raw GET against the quote vendor, returning the decoded JSON document
#[async_trait]
pub trait VendorTransport: Send + Sync {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, QuoteError>;
}

pub struct HttpVendorTransport {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpVendorTransport {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, QuoteError> {
        let client = HttpClientFactory::create_client(timeout).map_err(|e| QuoteError::Transport {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl VendorTransport for HttpVendorTransport {
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, QuoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("CoinMarketCap GET {} {:?}", path, params);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| QuoteError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        match response.json::<Value>().await {
            // Error bodies carrying a vendor status are reported as vendor errors upstream
            Ok(payload) if status.is_success() || vendor_status(&payload).is_some() => Ok(payload),
            Ok(_) => Err(QuoteError::Http {
                status: status.as_u16(),
            }),
            Err(_) if !status.is_success() => Err(QuoteError::Http {
                status: status.as_u16(),
            }),
            Err(e) => Err(QuoteError::Transport {
                reason: e.to_string(),
            }),
        }
    }
}
