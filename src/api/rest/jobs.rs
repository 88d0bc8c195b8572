use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::engine::dispatch::rank_drivers;
use crate::error::AppError;
use crate::models::driver::DriverCandidate;
use crate::models::job::{JobAssignment, JobLeg, Leg};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", post(create_job).get(list_jobs))
        .route("/jobs/:id", get(get_job))
        .route("/jobs/:id/candidates", get(list_candidates))
        .route("/jobs/:id/assign", post(assign_driver))
        .route("/assignments", get(list_assignments))
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub leg: Leg,
    pub pickup_address: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub is_manual: bool,
}

#[derive(Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

/// Ranked candidate with the presentation flags callers use to disable
/// selection. Nobody is filtered out of the list.
#[derive(Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: DriverCandidate,
    pub at_capacity: bool,
}

async fn create_job(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<Json<JobLeg>, AppError> {
    if payload.pickup_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "pickup_address cannot be empty".to_string(),
        ));
    }

    let job = JobLeg {
        id: Uuid::new_v4(),
        leg: payload.leg,
        pickup_address: payload.pickup_address,
        scheduled_at: payload.scheduled_at,
        is_manual: payload.is_manual,
        assigned_driver: None,
        created_at: Utc::now(),
    };

    state.jobs.insert(job.id, job.clone());
    Ok(Json(job))
}

async fn list_jobs(State(state): State<Arc<AppState>>) -> Json<Vec<JobLeg>> {
    let jobs = state.jobs.iter().map(|entry| entry.value().clone()).collect();
    Json(jobs)
}

async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobLeg>, AppError> {
    let job = state
        .jobs
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("job {} not found", id)))?;

    Ok(Json(job.value().clone()))
}

async fn list_candidates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RankedCandidate>>, AppError> {
    let job = state
        .jobs
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("job {} not found", id)))?
        .value()
        .clone();

    let pool: Vec<DriverCandidate> = state
        .drivers
        .iter()
        .filter(|entry| entry.value().is_active)
        .map(|entry| DriverCandidate::from(entry.value()))
        .collect();

    let ranked = rank_drivers(&job, pool);
    state.metrics.driver_rankings_total.inc();

    let response = ranked
        .into_iter()
        .map(|candidate| {
            let at_capacity = candidate.at_capacity();
            RankedCandidate {
                candidate,
                at_capacity,
            }
        })
        .collect();

    Ok(Json(response))
}

/// Conditional write: the leg must still be unassigned when the admin's
/// choice lands, otherwise the race surfaces as a 409.
async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignDriverRequest>,
) -> Result<Json<JobAssignment>, AppError> {
    if !state.drivers.contains_key(&payload.driver_id) {
        return Err(AppError::NotFound(format!(
            "driver {} not found",
            payload.driver_id
        )));
    }

    let assignment = {
        let mut job = state
            .jobs
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("job {} not found", id)))?;

        if let Some(existing) = job.assigned_driver {
            state
                .metrics
                .assignments_total
                .with_label_values(&["conflict"])
                .inc();
            return Err(AppError::Conflict(format!(
                "job {} already assigned to driver {}",
                id, existing
            )));
        }

        job.assigned_driver = Some(payload.driver_id);

        JobAssignment {
            id: Uuid::new_v4(),
            job_id: job.id,
            driver_id: payload.driver_id,
            assigned_at: Utc::now(),
        }
    };

    if let Some(mut driver) = state.drivers.get_mut(&payload.driver_id) {
        driver.todays_job_count = driver.todays_job_count.saturating_add(1);
        driver.updated_at = Utc::now();
    }

    state.assignments.insert(assignment.id, assignment.clone());
    state
        .metrics
        .assignments_total
        .with_label_values(&["success"])
        .inc();

    info!(
        job_id = %assignment.job_id,
        driver_id = %assignment.driver_id,
        "job leg assigned"
    );

    Ok(Json(assignment))
}

async fn list_assignments(State(state): State<Arc<AppState>>) -> Json<Vec<JobAssignment>> {
    let assignments = state
        .assignments
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Json(assignments)
}
