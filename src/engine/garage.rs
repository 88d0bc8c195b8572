use serde::{Deserialize, Serialize};

use crate::models::garage::{Badge, GarageCandidate, RankedGarage, SubscriptionTier};

// Relevance weights over normalized [0..1] signals. Business policy, not
// structural contract; tune here only.
const TIER_WEIGHT: f64 = 0.15;
const FEATURED_BOOST: f64 = 0.10;
const RATING_WEIGHT: f64 = 0.30;
const RESPONSE_WEIGHT: f64 = 0.15;
const COMPLETION_WEIGHT: f64 = 0.15;
const CANCELLATION_PENALTY: f64 = 0.10;
const DISTANCE_WEIGHT: f64 = 0.15;

/// Ratings backed by fewer reviews than this are proportionally
/// down-weighted.
const FULL_CONFIDENCE_REVIEWS: u32 = 10;

// Badge thresholds, all inclusive cutoffs.
const TOP_RATED_MIN_RATING: f64 = 4.5;
const TOP_RATED_MIN_REVIEWS: u32 = 10;
const QUICK_RESPONDER_MAX_HOURS: f64 = 2.0;
const TRUSTED_MIN_REVIEWS: u32 = 50;
const RELIABLE_MIN_BOOKINGS: u32 = 20;
const RELIABLE_MIN_COMPLETION_RATE: f64 = 0.95;

/// Alternate total orders for search results. `Rating` and `Distance`
/// bypass the composite score entirely.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Relevance,
    Rating,
    Distance,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub tier_score: f64,
    pub rating_score: f64,
    pub response_score: f64,
    pub completion_score: f64,
    pub cancellation_penalty: f64,
    pub distance_score: Option<f64>,
}

pub fn rank_garages(candidates: Vec<GarageCandidate>) -> Vec<RankedGarage> {
    rank_garages_with(candidates, SortBy::Relevance)
}

pub fn rank_garages_with(candidates: Vec<GarageCandidate>, sort: SortBy) -> Vec<RankedGarage> {
    let mut scored: Vec<(GarageCandidate, f64)> = candidates
        .into_iter()
        .map(|candidate| {
            let score = weighted_score(&score_breakdown(&candidate), candidate.is_featured);
            (candidate, score)
        })
        .collect();

    match sort {
        SortBy::Relevance => scored.sort_by(|a, b| b.1.total_cmp(&a.1)),
        SortBy::Rating => {
            scored.sort_by(|a, b| b.0.average_rating.total_cmp(&a.0.average_rating))
        }
        // Ascending; candidates without a distance sort after all that
        // have one.
        SortBy::Distance => scored.sort_by(|a, b| match (a.0.distance_km, b.0.distance_km) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
    }

    scored
        .into_iter()
        .map(|(candidate, score)| RankedGarage {
            garage_id: candidate.id,
            name: candidate.name.clone(),
            score,
            badges: derive_badges(&candidate),
            is_featured: candidate.is_featured,
            response_time_label: response_time_label(candidate.avg_response_hours),
            distance_km: candidate.distance_km.map(round_display_km),
        })
        .collect()
}

pub fn score_breakdown(candidate: &GarageCandidate) -> ScoreBreakdown {
    ScoreBreakdown {
        tier_score: tier_score(candidate.tier),
        rating_score: rating_score(candidate.average_rating, candidate.total_reviews),
        response_score: response_score(candidate.avg_response_hours),
        completion_score: candidate.completion_rate.clamp(0.0, 1.0),
        cancellation_penalty: candidate.cancellation_rate.clamp(0.0, 1.0),
        distance_score: candidate.distance_km.map(distance_score),
    }
}

pub fn weighted_score(breakdown: &ScoreBreakdown, is_featured: bool) -> f64 {
    let mut score = (breakdown.tier_score * TIER_WEIGHT)
        + (breakdown.rating_score * RATING_WEIGHT)
        + (breakdown.response_score * RESPONSE_WEIGHT)
        + (breakdown.completion_score * COMPLETION_WEIGHT)
        - (breakdown.cancellation_penalty * CANCELLATION_PENALTY);

    if is_featured {
        score += FEATURED_BOOST;
    }

    // Absent distance omits the term rather than scoring it as zero:
    // zero would tie with "exactly here".
    if let Some(distance_score) = breakdown.distance_score {
        score += distance_score * DISTANCE_WEIGHT;
    }

    score
}

fn tier_score(tier: SubscriptionTier) -> f64 {
    f64::from(tier.ordinal()) / f64::from(SubscriptionTier::Premium.ordinal())
}

fn rating_score(average_rating: f64, total_reviews: u32) -> f64 {
    let confidence =
        (f64::from(total_reviews) / f64::from(FULL_CONFIDENCE_REVIEWS)).clamp(0.0, 1.0);
    (average_rating / 5.0).clamp(0.0, 1.0) * confidence
}

fn response_score(avg_response_hours: f64) -> f64 {
    1.0 / (1.0 + avg_response_hours.max(0.0))
}

fn distance_score(distance_km: f64) -> f64 {
    1.0 / (1.0 + distance_km.max(0.0))
}

pub fn derive_badges(candidate: &GarageCandidate) -> Vec<Badge> {
    let mut badges = Vec::new();

    if candidate.tier == SubscriptionTier::Premium {
        badges.push(Badge::Premium);
    }
    if candidate.average_rating >= TOP_RATED_MIN_RATING
        && candidate.total_reviews >= TOP_RATED_MIN_REVIEWS
    {
        badges.push(Badge::TopRated);
    }
    if candidate.avg_response_hours <= QUICK_RESPONDER_MAX_HOURS {
        badges.push(Badge::QuickResponder);
    }
    if candidate.total_reviews >= TRUSTED_MIN_REVIEWS {
        badges.push(Badge::Trusted);
    }
    if candidate.completed_bookings >= RELIABLE_MIN_BOOKINGS
        && candidate.completion_rate >= RELIABLE_MIN_COMPLETION_RATE
    {
        badges.push(Badge::Reliable);
    }

    badges
}

/// Display bucket for an average response time. Edges at exactly 1, 2,
/// 4, 12 and 24 hours; ranking uses the raw hours, display uses this
/// label.
pub fn response_time_label(avg_response_hours: f64) -> &'static str {
    if avg_response_hours < 1.0 {
        "< 1 hour"
    } else if avg_response_hours < 2.0 {
        "~1 hour"
    } else if avg_response_hours < 4.0 {
        "2-4 hours"
    } else if avg_response_hours < 12.0 {
        "4-12 hours"
    } else if avg_response_hours < 24.0 {
        "< 1 day"
    } else {
        "> 1 day"
    }
}

/// One decimal place for display. Never feed the rounded value back into
/// sorting.
pub fn round_display_km(distance_km: f64) -> f64 {
    (distance_km * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{
        derive_badges, rank_garages, rank_garages_with, response_time_label, round_display_km,
        score_breakdown, weighted_score, SortBy,
    };
    use crate::models::garage::{Badge, GarageCandidate, SubscriptionTier};

    fn garage(id_seed: u128) -> GarageCandidate {
        GarageCandidate {
            id: Uuid::from_u128(id_seed),
            name: format!("garage-{id_seed}"),
            tier: SubscriptionTier::Free,
            is_featured: false,
            average_rating: 4.0,
            total_reviews: 25,
            avg_response_hours: 3.0,
            completion_rate: 0.9,
            cancellation_rate: 0.05,
            distance_km: None,
            completed_bookings: 30,
        }
    }

    #[test]
    fn empty_pool_ranks_to_empty() {
        assert!(rank_garages(Vec::new()).is_empty());
    }

    #[test]
    fn many_good_reviews_outrank_two_perfect_ones() {
        let mut boutique = garage(1);
        boutique.average_rating = 5.0;
        boutique.total_reviews = 2;

        let mut established = garage(2);
        established.average_rating = 4.6;
        established.total_reviews = 200;

        let ranked = rank_garages(vec![boutique, established]);
        assert_eq!(ranked[0].garage_id.as_u128(), 2);
    }

    #[test]
    fn featured_boost_applies_independently_of_tier() {
        let plain = garage(1);
        let mut featured = garage(2);
        featured.is_featured = true;

        let plain_score = weighted_score(&score_breakdown(&plain), plain.is_featured);
        let featured_score = weighted_score(&score_breakdown(&featured), featured.is_featured);
        assert!(featured_score > plain_score);
    }

    #[test]
    fn premium_tier_outscores_free_all_else_equal() {
        let free = garage(1);
        let mut premium = garage(2);
        premium.tier = SubscriptionTier::Premium;

        let ranked = rank_garages(vec![free, premium]);
        assert_eq!(ranked[0].garage_id.as_u128(), 2);
    }

    #[test]
    fn missing_distance_omits_the_term() {
        let garage_without = garage(1);
        let mut garage_at_zero = garage(2);
        garage_at_zero.distance_km = Some(0.0);

        let without = weighted_score(&score_breakdown(&garage_without), false);
        let at_zero = weighted_score(&score_breakdown(&garage_at_zero), false);
        // "exactly here" scores the full distance term; no coordinates
        // scores none of it.
        assert!(at_zero > without);
    }

    #[test]
    fn closer_garage_outscores_farther_one() {
        let mut near = garage(1);
        near.distance_km = Some(1.2);
        let mut far = garage(2);
        far.distance_km = Some(40.0);

        let ranked = rank_garages(vec![far, near]);
        assert_eq!(ranked[0].garage_id.as_u128(), 1);
    }

    #[test]
    fn high_cancellation_rate_drags_the_score_down() {
        let steady = garage(1);
        let mut flaky = garage(2);
        flaky.cancellation_rate = 0.6;

        let ranked = rank_garages(vec![flaky, steady]);
        assert_eq!(ranked[0].garage_id.as_u128(), 1);
    }

    #[test]
    fn top_rated_badge_boundaries() {
        let mut candidate = garage(1);
        candidate.average_rating = 4.5;
        candidate.total_reviews = 10;
        assert!(derive_badges(&candidate).contains(&Badge::TopRated));

        candidate.total_reviews = 9;
        assert!(!derive_badges(&candidate).contains(&Badge::TopRated));

        candidate.total_reviews = 10;
        candidate.average_rating = 4.49999;
        assert!(!derive_badges(&candidate).contains(&Badge::TopRated));
    }

    #[test]
    fn quick_responder_is_inclusive_at_two_hours() {
        let mut candidate = garage(1);
        candidate.avg_response_hours = 2.0;
        assert!(derive_badges(&candidate).contains(&Badge::QuickResponder));

        candidate.avg_response_hours = 2.01;
        assert!(!derive_badges(&candidate).contains(&Badge::QuickResponder));
    }

    #[test]
    fn trusted_and_reliable_badge_boundaries() {
        let mut candidate = garage(1);
        candidate.total_reviews = 50;
        assert!(derive_badges(&candidate).contains(&Badge::Trusted));
        candidate.total_reviews = 49;
        assert!(!derive_badges(&candidate).contains(&Badge::Trusted));

        candidate.completed_bookings = 20;
        candidate.completion_rate = 0.95;
        assert!(derive_badges(&candidate).contains(&Badge::Reliable));
        candidate.completion_rate = 0.949;
        assert!(!derive_badges(&candidate).contains(&Badge::Reliable));
        candidate.completion_rate = 0.95;
        candidate.completed_bookings = 19;
        assert!(!derive_badges(&candidate).contains(&Badge::Reliable));
    }

    #[test]
    fn premium_badge_tracks_tier() {
        let mut candidate = garage(1);
        candidate.tier = SubscriptionTier::Premium;
        assert!(derive_badges(&candidate).contains(&Badge::Premium));

        candidate.tier = SubscriptionTier::Analytics;
        assert!(!derive_badges(&candidate).contains(&Badge::Premium));
    }

    #[test]
    fn response_bucket_edges_are_exact() {
        assert_eq!(response_time_label(0.5), "< 1 hour");
        assert_eq!(response_time_label(1.0), "~1 hour");
        assert_eq!(response_time_label(2.0), "2-4 hours");
        assert_eq!(response_time_label(4.0), "4-12 hours");
        assert_eq!(response_time_label(12.0), "< 1 day");
        assert_eq!(response_time_label(24.0), "> 1 day");
    }

    #[test]
    fn sort_by_rating_ignores_the_composite_score() {
        let mut low_rated_premium = garage(1);
        low_rated_premium.tier = SubscriptionTier::Premium;
        low_rated_premium.is_featured = true;
        low_rated_premium.average_rating = 3.1;

        let mut high_rated_free = garage(2);
        high_rated_free.average_rating = 4.9;

        let ranked = rank_garages_with(vec![low_rated_premium, high_rated_free], SortBy::Rating);
        assert_eq!(ranked[0].garage_id.as_u128(), 2);
    }

    #[test]
    fn sort_by_distance_puts_unknown_distances_last() {
        let mut near = garage(1);
        near.distance_km = Some(2.0);
        let unknown = garage(2);
        let mut far = garage(3);
        far.distance_km = Some(9.0);

        let ranked = rank_garages_with(vec![unknown, far, near], SortBy::Distance);
        let ids: Vec<u128> = ranked.iter().map(|g| g.garage_id.as_u128()).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn display_distance_is_rounded_to_one_decimal() {
        let mut candidate = garage(1);
        candidate.distance_km = Some(12.345);

        let ranked = rank_garages(vec![candidate]);
        assert_eq!(ranked[0].distance_km, Some(12.3));
        assert_eq!(round_display_km(0.05), 0.1);
    }
}
