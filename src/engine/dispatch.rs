use std::cmp::Ordering;

use crate::models::driver::DriverCandidate;
use crate::models::job::JobLeg;

/// Orders candidates for a job leg, most suitable first.
///
/// Successive tie-breaks: clocked-in first, then preferred-area match
/// against the pickup address, then fewest jobs today, then most lifetime
/// completed jobs. Nothing is filtered out here; capacity and off-clock
/// ineligibility are presentation concerns for the caller. The sort is
/// stable, so equal-rank candidates keep their input order.
pub fn rank_drivers(job: &JobLeg, mut candidates: Vec<DriverCandidate>) -> Vec<DriverCandidate> {
    candidates.sort_by(|a, b| compare_candidates(a, b, &job.pickup_address));
    candidates
}

fn compare_candidates(a: &DriverCandidate, b: &DriverCandidate, pickup_address: &str) -> Ordering {
    b.clocked_in
        .cmp(&a.clocked_in)
        .then_with(|| {
            let a_match = matches_preferred_area(&a.preferred_areas, pickup_address);
            let b_match = matches_preferred_area(&b.preferred_areas, pickup_address);
            b_match.cmp(&a_match)
        })
        .then_with(|| a.todays_job_count.cmp(&b.todays_job_count))
        .then_with(|| b.completed_jobs.cmp(&a.completed_jobs))
}

/// Case-insensitive substring containment of any preferred area in the
/// free-text address. Deliberately not word-boundary matching.
pub fn matches_preferred_area(preferred_areas: &[String], pickup_address: &str) -> bool {
    let address = pickup_address.to_lowercase();
    preferred_areas
        .iter()
        .any(|area| !area.trim().is_empty() && address.contains(&area.trim().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{matches_preferred_area, rank_drivers};
    use crate::models::driver::DriverCandidate;
    use crate::models::job::{JobLeg, Leg};

    fn job(pickup_address: &str) -> JobLeg {
        JobLeg {
            id: Uuid::new_v4(),
            leg: Leg::Pickup,
            pickup_address: pickup_address.to_string(),
            scheduled_at: Utc::now(),
            is_manual: false,
            assigned_driver: None,
            created_at: Utc::now(),
        }
    }

    fn candidate(
        id_seed: u128,
        areas: &[&str],
        clocked_in: bool,
        todays: u32,
        completed: u32,
    ) -> DriverCandidate {
        DriverCandidate {
            id: Uuid::from_u128(id_seed),
            name: format!("driver-{id_seed}"),
            preferred_areas: areas.iter().map(|a| a.to_string()).collect(),
            max_jobs_per_day: 8,
            todays_job_count: todays,
            completed_jobs: completed,
            clocked_in,
        }
    }

    #[test]
    fn output_is_a_permutation_of_the_input() {
        let pool = vec![
            candidate(1, &["Newtown"], true, 3, 40),
            candidate(2, &[], false, 0, 5),
            candidate(3, &["Bondi"], true, 0, 12),
        ];
        let mut input_ids: Vec<_> = pool.iter().map(|c| c.id).collect();
        let ranked = rank_drivers(&job("12 King St, Newtown NSW"), pool);
        let mut output_ids: Vec<_> = ranked.iter().map(|c| c.id).collect();

        input_ids.sort();
        output_ids.sort();
        assert_eq!(input_ids, output_ids);
    }

    #[test]
    fn empty_pool_ranks_to_empty() {
        assert!(rank_drivers(&job("anywhere"), Vec::new()).is_empty());
    }

    #[test]
    fn clocked_in_area_match_beats_everything() {
        // D1: clocked in, area match, 2 today, 50 completed.
        // D2: clocked in, no match, 0 today, 10 completed.
        // D3: off clock, area match, 0 today, 100 completed.
        let d1 = candidate(1, &["Newtown"], true, 2, 50);
        let d2 = candidate(2, &["Bondi"], true, 0, 10);
        let d3 = candidate(3, &["Newtown"], false, 0, 100);

        let ranked = rank_drivers(&job("5 Station St, Newtown NSW 2042"), vec![d1, d2, d3]);
        let ids: Vec<u128> = ranked.iter().map(|c| c.id.as_u128()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn fewer_jobs_today_wins_among_equals() {
        let busy = candidate(1, &[], true, 4, 10);
        let idle = candidate(2, &[], true, 1, 10);

        let ranked = rank_drivers(&job("somewhere"), vec![busy, idle]);
        assert_eq!(ranked[0].id.as_u128(), 2);
    }

    #[test]
    fn experience_breaks_final_ties() {
        let veteran = candidate(1, &[], true, 2, 300);
        let rookie = candidate(2, &[], true, 2, 3);

        let ranked = rank_drivers(&job("somewhere"), vec![rookie, veteran]);
        assert_eq!(ranked[0].id.as_u128(), 1);
    }

    #[test]
    fn identical_candidates_keep_input_order() {
        let first = candidate(1, &[], true, 2, 10);
        let second = candidate(2, &[], true, 2, 10);

        let ranked = rank_drivers(&job("somewhere"), vec![first, second]);
        assert_eq!(ranked[0].id.as_u128(), 1);
        assert_eq!(ranked[1].id.as_u128(), 2);
    }

    #[test]
    fn off_clock_drivers_stay_in_the_list() {
        let off = candidate(1, &["Newtown"], false, 0, 10);
        let ranked = rank_drivers(&job("1 Newtown Rd"), vec![off]);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn area_match_is_case_insensitive_substring() {
        assert!(matches_preferred_area(
            &["newtown".to_string()],
            "12 King St, NEWTOWN NSW"
        ));
        assert!(matches_preferred_area(
            &["2042".to_string()],
            "5 Station St, Newtown NSW 2042"
        ));
        assert!(!matches_preferred_area(
            &["Bondi".to_string()],
            "12 King St, Newtown NSW"
        ));
        // Empty or whitespace-only areas never match.
        assert!(!matches_preferred_area(&[" ".to_string()], "anything"));
        assert!(!matches_preferred_area(&[], "anything"));
    }
}
