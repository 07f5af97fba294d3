use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A planted area tied to a producer. The `status` column holds the
/// serialized form of [`CropStatus`].
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Crop {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub plot_id: Option<Uuid>,
    pub product: String,
    pub variety: Option<String>,
    pub hectares: f64,
    pub planted_at: NaiveDate,
    pub expected_harvest_at: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Crop {
    pub fn status(&self) -> Option<CropStatus> {
        self.status.parse().ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropStatus {
    Planted,
    Growing,
    Harvested,
    Failed,
}

impl CropStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CropStatus::Planted => "Planted",
            CropStatus::Growing => "Growing",
            CropStatus::Harvested => "Harvested",
            CropStatus::Failed => "Failed",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CropStatus::Planted => "blue",
            CropStatus::Growing => "green",
            CropStatus::Harvested => "gray",
            CropStatus::Failed => "red",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CropStatus::Harvested | CropStatus::Failed)
    }

    /// Forward-only lifecycle. Any non-terminal status may fail.
    pub fn can_transition_to(&self, next: CropStatus) -> bool {
        match (self, next) {
            (CropStatus::Planted, CropStatus::Growing) => true,
            (CropStatus::Growing, CropStatus::Harvested) => true,
            (CropStatus::Planted | CropStatus::Growing, CropStatus::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CropStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CropStatus::Planted => "planted",
            CropStatus::Growing => "growing",
            CropStatus::Harvested => "harvested",
            CropStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl FromStr for CropStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planted" => Ok(CropStatus::Planted),
            "growing" => Ok(CropStatus::Growing),
            "harvested" => Ok(CropStatus::Harvested),
            "failed" => Ok(CropStatus::Failed),
            other => Err(format!("unknown crop status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_forward_only() {
        assert!(CropStatus::Planted.can_transition_to(CropStatus::Growing));
        assert!(CropStatus::Growing.can_transition_to(CropStatus::Harvested));
        assert!(!CropStatus::Growing.can_transition_to(CropStatus::Planted));
        assert!(!CropStatus::Harvested.can_transition_to(CropStatus::Growing));
        assert!(!CropStatus::Planted.can_transition_to(CropStatus::Harvested));
    }

    #[test]
    fn any_live_status_can_fail() {
        assert!(CropStatus::Planted.can_transition_to(CropStatus::Failed));
        assert!(CropStatus::Growing.can_transition_to(CropStatus::Failed));
        assert!(!CropStatus::Failed.can_transition_to(CropStatus::Failed));
        assert!(!CropStatus::Harvested.can_transition_to(CropStatus::Failed));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for status in [
            CropStatus::Planted,
            CropStatus::Growing,
            CropStatus::Harvested,
            CropStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<CropStatus>(), Ok(status));
        }
    }

    #[test]
    fn status_colors() {
        assert_eq!(CropStatus::Growing.color(), "green");
        assert_eq!(CropStatus::Failed.color(), "red");
        assert_eq!(CropStatus::Harvested.label(), "Harvested");
    }
}
