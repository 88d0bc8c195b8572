use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::onboarding::{apply_invariants, can_work, insurance_eligible};
use crate::error::AppError;
use crate::models::driver::{
    ApprovalStatus, Contracts, Driver, EmploymentType, OnboardingRecord, OnboardingStatus,
    PoliceCheck,
};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(register_driver).get(list_drivers))
        .route("/drivers/:id", axum::routing::get(get_driver))
        .route("/drivers/:id/clock-in", post(clock_in))
        .route("/drivers/:id/clock-out", post(clock_out))
        .route("/drivers/:id/onboarding", patch(update_onboarding))
}

#[derive(Deserialize)]
pub struct RegisterDriverRequest {
    pub name: String,
    #[serde(default)]
    pub preferred_areas: Vec<String>,
    pub max_jobs_per_day: u32,
}

/// Partial onboarding update. Absent fields keep their stored value; the
/// merged record is normalized before commit.
#[derive(Deserialize)]
pub struct UpdateOnboardingRequest {
    pub onboarding_status: Option<OnboardingStatus>,
    pub employment_type: Option<EmploymentType>,
    pub contracts: Option<Contracts>,
    pub police_check: Option<PoliceCheck>,
    pub can_accept_jobs: Option<bool>,
}

/// Driver plus the read-time derived fields. `insurance_eligible` and
/// `can_work` are never stored.
#[derive(Serialize)]
pub struct DriverResponse {
    #[serde(flatten)]
    pub driver: Driver,
    pub insurance_eligible: bool,
    pub can_work: bool,
}

fn driver_response(driver: Driver) -> DriverResponse {
    let insurance_eligible = insurance_eligible(&driver.onboarding);
    let can_work = can_work(&driver);
    DriverResponse {
        driver,
        insurance_eligible,
        can_work,
    }
}

async fn register_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterDriverRequest>,
) -> Result<Json<DriverResponse>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.max_jobs_per_day == 0 {
        return Err(AppError::BadRequest(
            "max_jobs_per_day must be > 0".to_string(),
        ));
    }

    let driver = Driver {
        id: Uuid::new_v4(),
        name: payload.name,
        approval_status: ApprovalStatus::Approved,
        onboarding: OnboardingRecord::default(),
        preferred_areas: payload.preferred_areas,
        max_jobs_per_day: payload.max_jobs_per_day,
        todays_job_count: 0,
        completed_jobs: 0,
        is_active: true,
        clocked_in: false,
        updated_at: Utc::now(),
    };

    state.drivers.insert(driver.id, driver.clone());
    Ok(Json(driver_response(driver)))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<DriverResponse>> {
    let drivers = state
        .drivers
        .iter()
        .map(|entry| driver_response(entry.value().clone()))
        .collect();
    Json(drivers)
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverResponse>, AppError> {
    let driver = state
        .drivers
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", id)))?;

    Ok(Json(driver_response(driver.value().clone())))
}

async fn clock_in(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverResponse>, AppError> {
    set_clocked_in(&state, id, true)
}

async fn clock_out(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverResponse>, AppError> {
    set_clocked_in(&state, id, false)
}

fn set_clocked_in(
    state: &AppState,
    id: Uuid,
    clocked_in: bool,
) -> Result<Json<DriverResponse>, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", id)))?;

    driver.clocked_in = clocked_in;
    driver.updated_at = Utc::now();

    Ok(Json(driver_response(driver.clone())))
}

/// Merges the submitted fields into the stored record, runs the
/// onboarding guard, then commits the corrected record. Corrections are
/// reported in the response, logged, and counted, never raised as
/// errors.
async fn update_onboarding(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOnboardingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {} not found", id)))?;

    let mut submitted = driver.onboarding.clone();
    if let Some(status) = payload.onboarding_status {
        submitted.onboarding_status = status;
    }
    if let Some(employment_type) = payload.employment_type {
        submitted.employment_type = employment_type;
    }
    if let Some(contracts) = payload.contracts {
        submitted.contracts = contracts;
    }
    if let Some(police_check) = payload.police_check {
        submitted.police_check = police_check;
    }
    if let Some(can_accept_jobs) = payload.can_accept_jobs {
        submitted.can_accept_jobs = can_accept_jobs;
    }

    let (corrected, corrections) = apply_invariants(submitted);
    for correction in &corrections {
        state
            .metrics
            .onboarding_corrections_total
            .with_label_values(&[correction.as_str()])
            .inc();
    }

    driver.onboarding = corrected;
    driver.updated_at = Utc::now();
    let response = driver_response(driver.clone());
    drop(driver);

    Ok(Json(serde_json::json!({
        "driver": response,
        "corrections": corrections,
    })))
}
