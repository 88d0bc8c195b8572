use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Subscription tiers form a closed ordered set; comparisons go through
/// `ordinal`, never string comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Analytics,
    Premium,
}

impl SubscriptionTier {
    pub fn ordinal(self) -> u8 {
        match self {
            SubscriptionTier::Free => 0,
            SubscriptionTier::Analytics => 1,
            SubscriptionTier::Premium => 2,
        }
    }
}

/// Marketplace trust indicators. Independent flags; any subset applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Premium,
    TopRated,
    QuickResponder,
    Trusted,
    Reliable,
}

/// Per-search projection joined from garage, review, subscription and
/// booking-history data. `distance_km` is present only when the searcher
/// supplied coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarageCandidate {
    pub id: Uuid,
    pub name: String,
    pub tier: SubscriptionTier,
    pub is_featured: bool,
    pub average_rating: f64,
    pub total_reviews: u32,
    pub avg_response_hours: f64,
    pub completion_rate: f64,
    pub cancellation_rate: f64,
    pub distance_km: Option<f64>,
    pub completed_bookings: u32,
}

/// Ranking output for one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct RankedGarage {
    pub garage_id: Uuid,
    pub name: String,
    pub score: f64,
    pub badges: Vec<Badge>,
    pub is_featured: bool,
    pub response_time_label: &'static str,
    /// Rounded to one decimal for display; ordering uses the raw value.
    pub distance_km: Option<f64>,
}

/// Persistent garage entity the search handler projects from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garage {
    pub id: Uuid,
    pub name: String,
    pub location: GeoPoint,
    pub tier: SubscriptionTier,
    pub is_featured: bool,
    pub average_rating: f64,
    pub total_reviews: u32,
    pub avg_response_hours: f64,
    pub completion_rate: f64,
    pub cancellation_rate: f64,
    pub completed_bookings: u32,
}
