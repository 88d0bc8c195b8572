use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::garage::{rank_garages_with, SortBy};
use crate::error::AppError;
use crate::geo::haversine_km;
use crate::models::garage::{Garage, GarageCandidate, GeoPoint, RankedGarage, SubscriptionTier};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/garages", post(register_garage).get(list_garages))
        .route("/garages/search", get(search_garages))
}

#[derive(Deserialize)]
pub struct RegisterGarageRequest {
    pub name: String,
    pub location: GeoPoint,
    pub tier: SubscriptionTier,
    #[serde(default)]
    pub is_featured: bool,
    pub average_rating: f64,
    pub total_reviews: u32,
    pub avg_response_hours: f64,
    pub completion_rate: f64,
    pub cancellation_rate: f64,
    pub completed_bookings: u32,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub sort_by: SortBy,
    pub page: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<RankedGarage>,
    pub page: usize,
    pub total: usize,
}

async fn register_garage(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterGarageRequest>,
) -> Result<Json<Garage>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let garage = Garage {
        id: Uuid::new_v4(),
        name: payload.name,
        location: payload.location,
        tier: payload.tier,
        is_featured: payload.is_featured,
        average_rating: payload.average_rating.clamp(0.0, 5.0),
        total_reviews: payload.total_reviews,
        avg_response_hours: payload.avg_response_hours.max(0.0),
        completion_rate: payload.completion_rate.clamp(0.0, 1.0),
        cancellation_rate: payload.cancellation_rate.clamp(0.0, 1.0),
        completed_bookings: payload.completed_bookings,
    };

    state.garages.insert(garage.id, garage.clone());
    Ok(Json(garage))
}

async fn list_garages(State(state): State<Arc<AppState>>) -> Json<Vec<Garage>> {
    let garages = state
        .garages
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(garages)
}

async fn search_garages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    // Distance only enters the ranking when the searcher gave both
    // coordinates.
    let searcher = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "lat and lng must be supplied together".to_string(),
            ))
        }
    };

    let candidates: Vec<GarageCandidate> = state
        .garages
        .iter()
        .map(|entry| candidate_for(entry.value(), searcher.as_ref()))
        .collect();

    let ranked = rank_garages_with(candidates, params.sort_by);

    let sort_label = match params.sort_by {
        SortBy::Relevance => "relevance",
        SortBy::Rating => "rating",
        SortBy::Distance => "distance",
    };
    state
        .metrics
        .garage_searches_total
        .with_label_values(&[sort_label])
        .inc();

    let total = ranked.len();
    let page = params.page.unwrap_or(0);
    let results = ranked
        .into_iter()
        .skip(page * state.search_page_size)
        .take(state.search_page_size)
        .collect();

    Ok(Json(SearchResponse {
        results,
        page,
        total,
    }))
}

fn candidate_for(garage: &Garage, searcher: Option<&GeoPoint>) -> GarageCandidate {
    GarageCandidate {
        id: garage.id,
        name: garage.name.clone(),
        tier: garage.tier,
        is_featured: garage.is_featured,
        average_rating: garage.average_rating,
        total_reviews: garage.total_reviews,
        avg_response_hours: garage.avg_response_hours,
        completion_rate: garage.completion_rate,
        cancellation_rate: garage.cancellation_rate,
        distance_km: searcher.map(|point| haversine_km(point, &garage.location)),
        completed_bookings: garage.completed_bookings,
    }
}
