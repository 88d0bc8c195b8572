use serde::Serialize;
use tracing::warn;

use crate::models::driver::{
    ApprovalStatus, Driver, EmploymentType, OnboardingRecord, OnboardingStatus,
};

/// One normalization applied by [`apply_invariants`]. Returned so the
/// write path can log and count silent corrections instead of losing
/// them.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    ClearedCanAcceptJobs,
    DowngradedToContractsPending,
    PinnedEmploymentType,
}

impl Correction {
    pub fn as_str(self) -> &'static str {
        match self {
            Correction::ClearedCanAcceptJobs => "cleared_can_accept_jobs",
            Correction::DowngradedToContractsPending => "downgraded_to_contracts_pending",
            Correction::PinnedEmploymentType => "pinned_employment_type",
        }
    }
}

/// Normalizes an onboarding record before it is committed.
///
/// Never fails: an inconsistent record is corrected, not rejected. The
/// write path persists the returned record and reports the corrections.
///
/// Rules, in order:
/// - contractor employment is not supported, the type is pinned to employee
/// - `active` without every contract signed and a cleared police check is
///   downgraded to `contracts_pending`
/// - `can_accept_jobs` may only be true while `active`
pub fn apply_invariants(mut record: OnboardingRecord) -> (OnboardingRecord, Vec<Correction>) {
    let mut corrections = Vec::new();

    if record.employment_type != EmploymentType::Employee {
        record.employment_type = EmploymentType::Employee;
        corrections.push(Correction::PinnedEmploymentType);
    }

    if record.onboarding_status == OnboardingStatus::Active && !prerequisites_met(&record) {
        record.onboarding_status = OnboardingStatus::ContractsPending;
        corrections.push(Correction::DowngradedToContractsPending);
    }

    if record.can_accept_jobs && record.onboarding_status != OnboardingStatus::Active {
        record.can_accept_jobs = false;
        corrections.push(Correction::ClearedCanAcceptJobs);
    }

    for correction in &corrections {
        warn!(correction = correction.as_str(), "onboarding record corrected");
    }

    (record, corrections)
}

fn prerequisites_met(record: &OnboardingRecord) -> bool {
    record.contracts.all_signed() && record.police_check.is_cleared()
}

/// Derived at read time from employment type and onboarding status,
/// never stored.
pub fn insurance_eligible(record: &OnboardingRecord) -> bool {
    record.employment_type == EmploymentType::Employee
        && record.onboarding_status == OnboardingStatus::Active
}

/// Whether the driver can be offered work right now. All five conditions
/// must hold; failing any one quietly drops the driver from available
/// pools.
pub fn can_work(driver: &Driver) -> bool {
    driver.approval_status == ApprovalStatus::Approved
        && driver.onboarding.onboarding_status == OnboardingStatus::Active
        && driver.onboarding.can_accept_jobs
        && driver.is_active
        && driver.clocked_in
}
