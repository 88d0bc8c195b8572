use dashmap::DashMap;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::garage::Garage;
use crate::models::job::{JobAssignment, JobLeg};
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub drivers: DashMap<Uuid, Driver>,
    pub jobs: DashMap<Uuid, JobLeg>,
    pub garages: DashMap<Uuid, Garage>,
    pub assignments: DashMap<Uuid, JobAssignment>,
    pub search_page_size: usize,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(search_page_size: usize) -> Self {
        Self {
            drivers: DashMap::new(),
            jobs: DashMap::new(),
            garages: DashMap::new(),
            assignments: DashMap::new(),
            search_page_size,
            metrics: Metrics::new(),
        }
    }
}
