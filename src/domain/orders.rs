//! Request types for the brokerage order endpoints.
//!
//! These only describe requests. Nothing in this crate decides when to place or
//! cancel an order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
    StopLimit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::StopLoss => "stop_loss",
            OrderType::StopLimit => "stop_limit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    #[default]
    Gtc,
}

/// Order size, either in units of the asset or in quote currency
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderQuantity {
    Asset(Decimal),
    Quote(Decimal),
}

impl OrderQuantity {
    fn write_into(&self, config: &mut Map<String, Value>) {
        match self {
            OrderQuantity::Asset(q) => config.insert("asset_quantity".to_string(), json!(q)),
            OrderQuantity::Quote(q) => config.insert("quote_amount".to_string(), json!(q)),
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderConfig {
    Market {
        asset_quantity: Decimal,
    },
    Limit {
        quantity: OrderQuantity,
        limit_price: Decimal,
        time_in_force: TimeInForce,
    },
    StopLoss {
        quantity: OrderQuantity,
        stop_price: Decimal,
        time_in_force: TimeInForce,
    },
    StopLimit {
        quantity: OrderQuantity,
        limit_price: Decimal,
        stop_price: Decimal,
        time_in_force: TimeInForce,
    },
}

impl OrderConfig {
    pub fn order_type(&self) -> OrderType {
        match self {
            OrderConfig::Market { .. } => OrderType::Market,
            OrderConfig::Limit { .. } => OrderType::Limit,
            OrderConfig::StopLoss { .. } => OrderType::StopLoss,
            OrderConfig::StopLimit { .. } => OrderType::StopLimit,
        }
    }

    fn to_value(&self) -> Value {
        let mut config = Map::new();
        match self {
            OrderConfig::Market { asset_quantity } => {
                config.insert("asset_quantity".to_string(), json!(asset_quantity));
            }
            OrderConfig::Limit {
                quantity,
                limit_price,
                time_in_force,
            } => {
                quantity.write_into(&mut config);
                config.insert("limit_price".to_string(), json!(limit_price));
                config.insert("time_in_force".to_string(), json!(time_in_force));
            }
            OrderConfig::StopLoss {
                quantity,
                stop_price,
                time_in_force,
            } => {
                quantity.write_into(&mut config);
                config.insert("stop_price".to_string(), json!(stop_price));
                config.insert("time_in_force".to_string(), json!(time_in_force));
            }
            OrderConfig::StopLimit {
                quantity,
                limit_price,
                stop_price,
                time_in_force,
            } => {
                quantity.write_into(&mut config);
                config.insert("limit_price".to_string(), json!(limit_price));
                config.insert("stop_price".to_string(), json!(stop_price));
                config.insert("time_in_force".to_string(), json!(time_in_force));
            }
        }
        Value::Object(config)
    }
}

/// Body of `POST /api/v1/crypto/trading/orders/`.
///
/// `client_order_id` is the only idempotency key: resubmitting the same id is
/// how a caller avoids duplicate orders. The client never retries writes.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub client_order_id: String,
    pub side: OrderSide,
    pub symbol: String,
    pub config: OrderConfig,
}

impl OrderRequest {
    pub fn new(side: OrderSide, symbol: impl Into<String>, config: OrderConfig) -> Self {
        Self {
            client_order_id: Uuid::new_v4().to_string(),
            side,
            symbol: symbol.into(),
            config,
        }
    }

    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = id.into();
        self
    }

    pub fn to_body(&self) -> Value {
        let order_type = self.config.order_type();
        let mut body = Map::new();
        body.insert("client_order_id".to_string(), json!(self.client_order_id));
        body.insert("side".to_string(), json!(self.side.as_str()));
        body.insert("type".to_string(), json!(order_type.as_str()));
        body.insert("symbol".to_string(), json!(self.symbol));
        body.insert(
            format!("{}_order_config", order_type.as_str()),
            self.config.to_value(),
        );
        Value::Object(body)
    }
}

/// Filters for the orders listing; unset fields are left out of the query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub symbol: Option<String>,
    pub side: Option<OrderSide>,
    pub state: Option<String>,
    pub order_type: Option<OrderType>,
    pub created_at_start: Option<String>,
    pub created_at_end: Option<String>,
    pub updated_at_start: Option<String>,
    pub updated_at_end: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl OrderFilter {
    /// Query parameters in the order the brokerage documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.map(|s| s.as_str().to_string())),
            ("state", self.state.clone()),
            ("type", self.order_type.map(|t| t.as_str().to_string())),
            ("created_at_start", self.created_at_start.clone()),
            ("created_at_end", self.created_at_end.clone()),
            ("updated_at_start", self.updated_at_start.clone()),
            ("updated_at_end", self.updated_at_end.clone()),
            ("limit", self.limit.map(|l| l.to_string())),
            ("cursor", self.cursor.clone()),
        ]
    }
}
