use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supply {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub minimum_stock: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only stock ledger entry. `movement_type` holds the serialized
/// form of [`MovementType`].
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryMovement {
    pub id: Uuid,
    pub supply_id: Uuid,
    pub movement_type: String,
    pub quantity: Decimal,
    pub note: Option<String>,
    pub moved_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    In,
    Out,
    Adjustment,
}

impl MovementType {
    pub fn label(&self) -> &'static str {
        match self {
            MovementType::In => "Stock in",
            MovementType::Out => "Stock out",
            MovementType::Adjustment => "Adjustment",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MovementType::In => "green",
            MovementType::Out => "orange",
            MovementType::Adjustment => "gray",
        }
    }

    /// Sign applied when folding a movement into the running stock.
    /// Adjustments carry their own sign in the quantity.
    pub fn signum(&self) -> Decimal {
        match self {
            MovementType::In => Decimal::ONE,
            MovementType::Out => -Decimal::ONE,
            MovementType::Adjustment => Decimal::ONE,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MovementType::In => "in",
            MovementType::Out => "out",
            MovementType::Adjustment => "adjustment",
        };
        f.write_str(s)
    }
}

impl FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(MovementType::In),
            "out" => Ok(MovementType::Out),
            "adjustment" => Ok(MovementType::Adjustment),
            other => Err(format!("unknown movement type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn movement_signs() {
        assert_eq!(MovementType::In.signum() * dec!(5), dec!(5));
        assert_eq!(MovementType::Out.signum() * dec!(5), dec!(-5));
        assert_eq!(MovementType::Adjustment.signum() * dec!(-2), dec!(-2));
    }

    #[test]
    fn parse_rejects_unknown_types() {
        assert!("in".parse::<MovementType>().is_ok());
        assert!("transfer".parse::<MovementType>().is_err());
    }
}
