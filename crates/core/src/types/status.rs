//! Status enums for orders.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How an order is paid.
///
/// The storefront only ever creates cash orders, but order history may list
/// orders paid by card through other channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    #[serde(other)]
    Other,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Other => "other",
        })
    }
}

/// Order fulfillment progress derived from the paid/delivered flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Delivered,
}

impl OrderStatus {
    /// Derive the status from the API's boolean flags.
    #[must_use]
    pub const fn from_flags(is_paid: bool, is_delivered: bool) -> Self {
        if is_delivered {
            Self::Delivered
        } else if is_paid {
            Self::Paid
        } else {
            Self::Pending
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Delivered => "Delivered",
        }
    }
}
