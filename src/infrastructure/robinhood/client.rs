//! Robinhood Crypto Trading API client
//!
//! Provides typed operations for the brokerage REST surface:
//! - Account and holdings retrieval
//! - Best bid/ask and estimated price market data
//! - Trading pairs listing
//! - Order listing, lookup, cancellation and placement
//! - Ed25519 request signing
//!
//! Every call returns the response JSON. Transport failures come back as a
//! `client_error` payload instead of an `Err`, so callers check payload shape
//! in one place. Server error bodies are returned verbatim.

use super::models::parse_holdings_page;
use super::signer::{AuthHeaders, RequestSigner};
use crate::config::{BrokerCapability, RobinhoodConfig};
use crate::domain::envelope::{ErrorEnvelope, client_error_of, error_envelope_of};
use crate::domain::errors::{ClientError, ConfigurationError, PortfolioError};
use crate::domain::orders::{OrderFilter, OrderRequest, OrderSide};
use crate::domain::portfolio::Holding;
use crate::domain::ports::HoldingsProvider;
use crate::infrastructure::core::http_client_factory::{HttpClientFactory, build_path_with_query};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, info, warn};

const ACCOUNTS_PATH: &str = "/api/v1/crypto/trading/accounts/";
const BEST_BID_ASK_PATH: &str = "/api/v1/crypto/marketdata/best_bid_ask/";
const ESTIMATED_PRICE_PATH: &str = "/api/v1/crypto/marketdata/estimated_price/";
const TRADING_PAIRS_PATH: &str = "/api/v1/crypto/trading/trading_pairs/";
const HOLDINGS_PATH: &str = "/api/v1/crypto/trading/holdings/";
const ORDERS_PATH: &str = "/api/v1/crypto/trading/orders/";

/// Upper bound on pages followed when collecting every holding
const MAX_HOLDINGS_PAGES: usize = 100;

pub struct RobinhoodClient {
    client: Client,
    base_url: String,
    signer: Option<RequestSigner>,
}

impl RobinhoodClient {
    /// Construction never needs credentials; signed calls check for them.
    pub fn new(config: &RobinhoodConfig) -> Result<Self, ClientError> {
        let client =
            HttpClientFactory::create_client(config.timeout).map_err(|e| ClientError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            signer: config.credentials().map(RequestSigner::new),
        })
    }

    pub fn capability(&self) -> BrokerCapability {
        if self.signer.is_some() {
            BrokerCapability::Authenticated
        } else {
            BrokerCapability::Unauthenticated
        }
    }

    fn auth_headers(&self, method: &Method, path: &str, body: &str) -> Result<AuthHeaders, ClientError> {
        let signer = self.signer.as_ref().ok_or(ConfigurationError::MissingCredential {
            names: "API_KEY and BASE64_PRIVATE_KEY",
        })?;
        let timestamp = chrono::Utc::now().timestamp();
        Ok(signer.headers(method.as_str(), path, body, timestamp)?)
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ClientError> {
        // Serialized once: these exact bytes are both signed and sent
        let body = match body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };
        let headers = self.auth_headers(&method, path, &body)?;

        let url = format!("{}{}", self.base_url, path);
        debug!("Robinhood {} {}", method, path);

        let mut request = self.client.request(method, &url);
        for (name, value) in headers.to_pairs() {
            request = request.header(name, value);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            let payload = response.json::<Value>().await?;
            if !status.is_success() {
                warn!("Robinhood {} returned status {}", path, status);
            }
            Ok::<Value, reqwest::Error>(payload)
        }
        .await;

        match result {
            Ok(payload) => Ok(payload),
            Err(e) => {
                warn!("Robinhood request to {} failed: {}", path, e);
                Ok(ErrorEnvelope::client_error(format!("Request error: {}", e)).into_value())
            }
        }
    }

    // Accounts

    pub async fn get_account(&self) -> Result<Value, ClientError> {
        self.request(Method::GET, ACCOUNTS_PATH, None).await
    }

    // Market Data

    pub async fn get_best_bid_ask(&self, symbols: &[&str]) -> Result<Value, ClientError> {
        let params: Vec<(&str, Option<&str>)> = symbols
            .iter()
            .map(|s| ("symbol", Some(*s).filter(|s| !s.is_empty())))
            .collect();
        let path = build_path_with_query(BEST_BID_ASK_PATH, &params);
        self.request(Method::GET, &path, None).await
    }

    /// `quantity` may be a comma-separated list of quantities to price at once.
    pub async fn get_estimated_price(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: &str,
    ) -> Result<Value, ClientError> {
        let path = build_path_with_query(
            ESTIMATED_PRICE_PATH,
            &[
                ("symbol", Some(symbol)),
                ("side", Some(side.as_str())),
                ("quantity", Some(quantity)),
            ],
        );
        self.request(Method::GET, &path, None).await
    }

    // Trading

    pub async fn get_trading_pairs(
        &self,
        symbols: &[&str],
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<Value, ClientError> {
        let path = build_path_with_query(TRADING_PAIRS_PATH, &paged_params("symbol", symbols, limit, cursor));
        self.request(Method::GET, &path, None).await
    }

    pub async fn get_holdings(
        &self,
        asset_codes: &[&str],
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<Value, ClientError> {
        let path = build_path_with_query(HOLDINGS_PATH, &paged_params("asset_code", asset_codes, limit, cursor));
        self.request(Method::GET, &path, None).await
    }

    pub async fn get_orders(&self, filter: &OrderFilter) -> Result<Value, ClientError> {
        let path = build_path_with_query(ORDERS_PATH, &filter.query_pairs());
        self.request(Method::GET, &path, None).await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Value, ClientError> {
        let path = format!("{}{}/", ORDERS_PATH, order_id);
        self.request(Method::GET, &path, None).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<Value, ClientError> {
        let path = format!("{}{}/cancel/", ORDERS_PATH, order_id);
        self.request(Method::POST, &path, None).await
    }

    pub async fn place_order(&self, order: &OrderRequest) -> Result<Value, ClientError> {
        info!(
            "Placing {} {} order for {} (client_order_id={})",
            order.side,
            order.config.order_type().as_str(),
            order.symbol,
            order.client_order_id
        );
        self.request(Method::POST, ORDERS_PATH, Some(&order.to_body())).await
    }
}

fn paged_params(
    key: &'static str,
    values: &[&str],
    limit: Option<u32>,
    cursor: Option<&str>,
) -> Vec<(&'static str, Option<String>)> {
    let mut params: Vec<(&'static str, Option<String>)> = values
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| (key, Some(v.to_string())))
        .collect();
    params.push(("limit", limit.map(|l| l.to_string())));
    params.push(("cursor", cursor.map(str::to_string)));
    params
}

#[async_trait]
impl HoldingsProvider for RobinhoodClient {
    async fn holdings(&self, asset_codes: &[String]) -> Result<Vec<Holding>, PortfolioError> {
        let codes: Vec<&str> = asset_codes.iter().map(String::as_str).collect();
        let mut holdings = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_HOLDINGS_PAGES {
            let payload = self.get_holdings(&codes, None, cursor.as_deref()).await?;

            if let Some(envelope) = client_error_of(&payload) {
                return Err(PortfolioError::Transport(envelope));
            }
            if let Some(envelope) = error_envelope_of(&payload) {
                return Err(PortfolioError::Api(envelope));
            }

            let page = parse_holdings_page(&payload)?;
            holdings.extend(page.results);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(holdings),
            }
        }

        warn!(
            "Stopped following holdings pages after {} pages",
            MAX_HOLDINGS_PAGES
        );
        Ok(holdings)
    }
}
