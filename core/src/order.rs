//! The `Order` entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of orderable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderItem {
    /// "Tea Table Green"
    #[serde(rename = "Tea Table Green")]
    TeaTableGreen,
    /// "Tea Table White"
    #[serde(rename = "Tea Table White")]
    TeaTableWhite,
}

impl OrderItem {
    /// Every member, in declaration order.
    pub const ALL: [Self; 2] = [Self::TeaTableGreen, Self::TeaTableWhite];

    /// Wire name of the item.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TeaTableGreen => "Tea Table Green",
            Self::TeaTableWhite => "Tea Table White",
        }
    }
}

impl fmt::Display for OrderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no [`OrderItem`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order item: {0}")]
pub struct UnknownOrderItem(pub String);

impl FromStr for OrderItem {
    type Err = UnknownOrderItem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|item| item.as_str() == s)
            .ok_or_else(|| UnknownOrderItem(s.to_string()))
    }
}

/// Body of `PUT /order/{id}`.
///
/// Both fields are optional; absent fields are left out of the encoded body
/// rather than sent as zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// What is being ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<OrderItem>,

    /// Agreed price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
}

impl Order {
    /// An order with both fields absent.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            item: None,
            price: None,
        }
    }

    /// Sets the item.
    #[must_use]
    pub const fn with_item(mut self, item: OrderItem) -> Self {
        self.item = Some(item);
        self
    }

    /// Sets the price.
    #[must_use]
    pub const fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{item: ")?;
        match self.item {
            Some(item) => write!(f, "{item}")?,
            None => f.write_str("<absent>")?,
        }
        f.write_str(", price: ")?;
        match self.price {
            Some(price) => write!(f, "{price}")?,
            None => f.write_str("<absent>")?,
        }
        f.write_str("}")
    }
}
