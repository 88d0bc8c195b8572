use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which half of a booking's transport this leg covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Pickup,
    Return,
}

/// One assignable transport leg, derived from a booking whose driver
/// field for this leg is still unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLeg {
    pub id: Uuid,
    pub leg: Leg,
    pub pickup_address: String,
    pub scheduled_at: DateTime<Utc>,
    pub is_manual: bool,
    pub assigned_driver: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Record of a committed driver-to-leg assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAssignment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub driver_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}
