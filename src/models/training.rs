use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrainingSession {
    pub id: Uuid,
    pub topic: String,
    pub trainer: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session/producer pivot carrying progress. `status` holds the
/// serialized form of [`EnrollmentStatus`].
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub session_id: Uuid,
    pub producer_id: Uuid,
    pub status: String,
    pub progress_percent: i32,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment joined with the names a listing screen shows.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct EnrollmentDetail {
    pub id: Uuid,
    pub session_id: Uuid,
    pub producer_id: Uuid,
    pub status: String,
    pub progress_percent: i32,
    pub enrolled_at: DateTime<Utc>,
    pub topic: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Enrolled,
    InProgress,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "Enrolled",
            EnrollmentStatus::InProgress => "In progress",
            EnrollmentStatus::Completed => "Completed",
            EnrollmentStatus::Dropped => "Dropped",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "blue",
            EnrollmentStatus::InProgress => "yellow",
            EnrollmentStatus::Completed => "green",
            EnrollmentStatus::Dropped => "red",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::InProgress => "in_progress",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
        };
        f.write_str(s)
    }
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrolled" => Ok(EnrollmentStatus::Enrolled),
            "in_progress" => Ok(EnrollmentStatus::InProgress),
            "completed" => Ok(EnrollmentStatus::Completed),
            "dropped" => Ok(EnrollmentStatus::Dropped),
            other => Err(format!("unknown enrollment status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_from_str() {
        for status in [
            EnrollmentStatus::Enrolled,
            EnrollmentStatus::InProgress,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Dropped,
        ] {
            assert_eq!(status.to_string().parse::<EnrollmentStatus>(), Ok(status));
        }
    }
}
