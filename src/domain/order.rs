//! Orders and their construction-time validation.
//!
//! An [`Order`] is immutable once built; every constructor validates the
//! quantity and order type, so a value of this type is always well-formed.
//! Inbound orders from the event boundary arrive as an [`OrderRequest`]
//! carrying raw strings and optional fields, converted with `TryFrom`.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use uuid::Uuid;

use super::error::OrderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(OrderError::InvalidSide(s.to_string())),
        }
    }
}

/// Order type. A limit price exists only on `Limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum OrderType {
    Market,
    Limit(f64),
}

impl OrderType {
    /// Parse `MARKET` / `LIMIT` together with the optional price field.
    ///
    /// A price supplied alongside `MARKET` is dropped.
    pub fn parse(kind: &str, price: Option<f64>) -> Result<Self, OrderError> {
        match kind.trim().to_ascii_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => price.map(OrderType::Limit).ok_or(OrderError::MissingLimitPrice),
            _ => Err(OrderError::InvalidOrderType(kind.to_string())),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit(_) => write!(f, "LIMIT"),
        }
    }
}

/// On the wire an order has the flat [`OrderRequest`] shape, and decoding
/// goes through the same validation as every constructor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "OrderRequest", into = "OrderRequest"))]
pub struct Order {
    id: String,
    symbol: String,
    side: Side,
    quantity: i64,
    order_type: OrderType,
    timestamp: i64,
}

impl Order {
    /// Build an order with a fresh id and the current time.
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        quantity: i64,
        order_type: OrderType,
    ) -> Result<Self, OrderError> {
        Self::build(None, symbol.into(), side, quantity, order_type, None)
    }

    pub fn market(symbol: impl Into<String>, side: Side, quantity: i64) -> Result<Self, OrderError> {
        Self::new(symbol, side, quantity, OrderType::Market)
    }

    pub fn limit(
        symbol: impl Into<String>,
        side: Side,
        quantity: i64,
        price: f64,
    ) -> Result<Self, OrderError> {
        Self::new(symbol, side, quantity, OrderType::Limit(price))
    }

    /// Market order stamped with an explicit timestamp (e.g. the tick that
    /// produced it) instead of the wall clock.
    pub fn market_at(
        symbol: impl Into<String>,
        side: Side,
        quantity: i64,
        timestamp: i64,
    ) -> Result<Self, OrderError> {
        Self::build(
            None,
            symbol.into(),
            side,
            quantity,
            OrderType::Market,
            Some(timestamp),
        )
    }

    fn build(
        id: Option<String>,
        symbol: String,
        side: Side,
        quantity: i64,
        order_type: OrderType,
        timestamp: Option<i64>,
    ) -> Result<Self, OrderError> {
        if quantity <= 0 {
            return Err(OrderError::NonPositiveQuantity(quantity));
        }
        Ok(Order {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            symbol,
            side,
            quantity,
            order_type,
            timestamp: timestamp.unwrap_or_else(|| Utc::now().timestamp()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Limit price; `None` for market orders.
    pub fn price(&self) -> Option<f64> {
        match self.order_type {
            OrderType::Market => None,
            OrderType::Limit(price) => Some(price),
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Raw inbound order message: `{symbol, side, quantity, id?, timestamp?,
/// order_type, price?}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderRequest {
    pub symbol: String,
    pub side: String,
    pub quantity: i64,
    pub id: Option<String>,
    pub timestamp: Option<i64>,
    pub order_type: String,
    pub price: Option<f64>,
}

impl OrderRequest {
    pub fn market(symbol: &str, side: &str, quantity: i64) -> Self {
        OrderRequest {
            symbol: symbol.to_string(),
            side: side.to_string(),
            quantity,
            id: None,
            timestamp: None,
            order_type: "MARKET".to_string(),
            price: None,
        }
    }
}

impl From<Order> for OrderRequest {
    fn from(order: Order) -> Self {
        let price = order.price();
        OrderRequest {
            symbol: order.symbol,
            side: order.side.to_string(),
            quantity: order.quantity,
            id: Some(order.id),
            timestamp: Some(order.timestamp),
            order_type: order.order_type.to_string(),
            price,
        }
    }
}

impl TryFrom<OrderRequest> for Order {
    type Error = OrderError;

    fn try_from(req: OrderRequest) -> Result<Self, Self::Error> {
        let side: Side = req.side.parse()?;
        if req.quantity <= 0 {
            return Err(OrderError::NonPositiveQuantity(req.quantity));
        }
        let order_type = OrderType::parse(&req.order_type, req.price)?;
        Order::build(
            req.id,
            req.symbol,
            side,
            req.quantity,
            order_type,
            req.timestamp,
        )
    }
}
