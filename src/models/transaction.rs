use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A sale or purchase between a producer and a collection center.
/// `transaction_type` holds the serialized form of [`TransactionType`];
/// `total` is always `quantity_kg * unit_price`, computed server-side.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub center_id: Uuid,
    pub transaction_type: String,
    pub product: String,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Per-type aggregate for a producer's transaction history.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct TransactionSummary {
    pub transaction_type: String,
    pub count: i64,
    pub total_amount: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Purchase,
}

impl TransactionType {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Sale => "Sale",
            TransactionType::Purchase => "Purchase",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            TransactionType::Sale => "green",
            TransactionType::Purchase => "blue",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionType::Sale => "sale",
            TransactionType::Purchase => "purchase",
        };
        f.write_str(s)
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(TransactionType::Sale),
            "purchase" => Ok(TransactionType::Purchase),
            other => Err(format!("unknown transaction type: {}", other)),
        }
    }
}
