use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level account review status, separate from the onboarding
/// compliance machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Suspended,
}

/// Compliance stage a driver moves through before becoming dispatchable.
/// Strictly ordered: NotStarted < ContractsPending < Active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    NotStarted,
    ContractsPending,
    Active,
}

/// Only employee engagement is supported; contractor submissions are
/// normalized away by the onboarding guard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Employee,
    Contractor,
}

/// Four independent signature timestamps. A missing timestamp means the
/// contract is unsigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contracts {
    pub employment_contract_signed_at: Option<DateTime<Utc>>,
    pub driver_agreement_signed_at: Option<DateTime<Utc>>,
    pub work_health_safety_signed_at: Option<DateTime<Utc>>,
    pub code_of_conduct_signed_at: Option<DateTime<Utc>>,
}

impl Contracts {
    pub fn all_signed(&self) -> bool {
        self.employment_contract_signed_at.is_some()
            && self.driver_agreement_signed_at.is_some()
            && self.work_health_safety_signed_at.is_some()
            && self.code_of_conduct_signed_at.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PoliceCheck {
    pub completed: bool,
    pub document_url: Option<String>,
}

impl PoliceCheck {
    /// Completed with a non-empty document on file.
    pub fn is_cleared(&self) -> bool {
        self.completed
            && self
                .document_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
    }
}

/// The slice of a driver document the onboarding guard normalizes on
/// every write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnboardingRecord {
    pub onboarding_status: OnboardingStatus,
    pub employment_type: EmploymentType,
    pub contracts: Contracts,
    pub police_check: PoliceCheck,
    pub can_accept_jobs: bool,
}

impl Default for OnboardingRecord {
    fn default() -> Self {
        Self {
            onboarding_status: OnboardingStatus::NotStarted,
            employment_type: EmploymentType::Employee,
            contracts: Contracts::default(),
            police_check: PoliceCheck::default(),
            can_accept_jobs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub approval_status: ApprovalStatus,
    pub onboarding: OnboardingRecord,
    pub preferred_areas: Vec<String>,
    pub max_jobs_per_day: u32,
    pub todays_job_count: u32,
    pub completed_jobs: u32,
    pub is_active: bool,
    pub clocked_in: bool,
    pub updated_at: DateTime<Utc>,
}

/// Projection handed to the dispatch ranker. Built per request from the
/// driver store; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverCandidate {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub preferred_areas: Vec<String>,
    pub max_jobs_per_day: u32,
    pub todays_job_count: u32,
    pub completed_jobs: u32,
    pub clocked_in: bool,
}

impl DriverCandidate {
    /// Capacity is a presentation flag, never a ranking filter: callers
    /// disable selection instead of dropping the candidate.
    pub fn at_capacity(&self) -> bool {
        self.todays_job_count >= self.max_jobs_per_day
    }
}

impl From<&Driver> for DriverCandidate {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id,
            name: driver.name.clone(),
            preferred_areas: driver.preferred_areas.clone(),
            max_jobs_per_day: driver.max_jobs_per_day,
            todays_job_count: driver.todays_job_count,
            completed_jobs: driver.completed_jobs,
            clocked_in: driver.clocked_in,
        }
    }
}
