//! Plan desirability scoring.
//!
//! The score is only used to break near-ties between plans in the same
//! departure cluster. Lower is better.

use crate::domain::TripPlan;

use super::config::ScoreConfig;

/// Score a plan with the default configuration.
pub fn score(plan: &TripPlan) -> f64 {
    score_with(plan, &ScoreConfig::default())
}

/// Score a plan.
///
/// Four factors are normalized against fixed scales and combined by
/// weight:
/// 1. Total duration
/// 2. Transfers (one less than the segment count)
/// 3. Walking time
/// 4. Waiting time
///
/// Two multiplicative penalties then apply, in order: one for walking
/// beyond the threshold, one for transfers beyond the threshold.
pub fn score_with(plan: &TripPlan, config: &ScoreConfig) -> f64 {
    let weights = &config.weights;
    let walking_mins = minutes(plan.walking_duration());
    let transfers = plan.transfer_count();

    let duration_factor = minutes(plan.total_duration()) / config.duration_scale_mins;
    let transfer_factor = transfers as f64 / config.transfer_scale;
    let walking_factor = walking_mins / config.walking_scale_mins;
    let waiting_factor = minutes(plan.waiting_duration()) / config.waiting_scale_mins;

    let mut score = weights.duration * duration_factor
        + weights.transfers * transfer_factor
        + weights.walking * walking_factor
        + weights.waiting * waiting_factor;

    if walking_mins > config.walking_penalty_threshold_mins {
        let excess = (walking_mins - config.walking_penalty_threshold_mins)
            / config.walking_penalty_step_mins;
        score *= 1.0 + excess * (config.walking_penalty_factor - 1.0);
    }

    if transfers > config.transfer_penalty_threshold {
        let excess = (transfers - config.transfer_penalty_threshold) as f64;
        score *= 1.0 + excess * (config.transfer_penalty_factor - 1.0) / 2.0;
    }

    score
}

fn minutes(seconds: i64) -> f64 {
    seconds as f64 / 60.0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::PlanDurations;
    use crate::domain::fixtures::{at, plan_with, ride};
    use proptest::prelude::*;

    fn make_plan(segments: usize, total: i64, walking: i64, waiting: i64) -> TripPlan {
        let d = PlanDurations {
            total,
            walking,
            waiting,
            riding: 0,
        };
        plan_with(
            1,
            at(10, 0, 0),
            d,
            (0..segments).map(|_| ride("11", 60)).collect(),
        )
    }

    proptest! {
        #[test]
        fn score_is_finite_and_non_negative(
            segments in 0usize..8,
            total in 0i64..14_400,
            walking in 0i64..3_600,
            waiting in 0i64..3_600,
        ) {
            let s = score(&make_plan(segments, total, walking, waiting));
            prop_assert!(s.is_finite());
            prop_assert!(s >= 0.0);
        }

        #[test]
        fn more_walking_past_threshold_scores_higher(
            segments in 1usize..6,
            total in 600i64..10_800,
            walking in 721i64..3_000,
            extra in 1i64..1_200,
            waiting in 0i64..1_800,
        ) {
            let shorter = score(&make_plan(segments, total, walking, waiting));
            let longer = score(&make_plan(segments, total, walking + extra, waiting));
            prop_assert!(longer > shorter);
        }

        #[test]
        fn more_transfers_past_threshold_scores_higher(
            segments in 3usize..8,
            total in 600i64..10_800,
            walking in 0i64..1_200,
            waiting in 0i64..1_800,
        ) {
            let fewer = score(&make_plan(segments, total, walking, waiting));
            let more = score(&make_plan(segments + 1, total, walking, waiting));
            prop_assert!(more > fewer);
        }

        #[test]
        fn scoring_is_pure(
            segments in 0usize..6,
            total in 0i64..7_200,
            walking in 0i64..2_400,
        ) {
            let plan = make_plan(segments, total, walking, 0);
            let copy = plan.clone();
            prop_assert_eq!(score(&plan).to_bits(), score(&plan).to_bits());
            prop_assert_eq!(plan, copy);
        }
    }
}
