//! Plan ranking.
//!
//! Orders plans for presentation. The ordering is built from several
//! grouping levels, applied in this order:
//!
//! 1. Plans that start on foot go after plans that do not. Walking-first
//!    plans are pre-sorted by the length of that first walk.
//! 2. Within each of those groups, fewer segments come first.
//! 3. Within a segment count, plans are sorted by start time and split into
//!    departure clusters: a plan leaving more than a minute after the
//!    previous one starts a new cluster.
//! 4. Within a cluster, shorter total duration comes first, except that
//!    durations within a minute of each other are ordered by score.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;

use crate::domain::TripPlan;

use super::config::RankConfig;
use super::score::score_with;

/// Rank plans and keep the best `limit`, using default windows.
///
/// Empty input or a zero limit gives an empty result.
pub fn top_n(plans: Vec<TripPlan>, limit: usize) -> Vec<TripPlan> {
    rank_plans(plans, &RankConfig::with_limit(limit))
}

/// Rank plans best-first and truncate to `config.limit`.
///
/// Deterministic for a given input order. Does not de-duplicate; see
/// [`deduplicate`].
pub fn rank_plans(plans: Vec<TripPlan>, config: &RankConfig) -> Vec<TripPlan> {
    if plans.is_empty() || config.limit == 0 {
        return Vec::new();
    }

    let (mut walking_first, riding_first): (Vec<TripPlan>, Vec<TripPlan>) =
        plans.into_iter().partition(TripPlan::starts_with_walk);

    // Stable: equal first walks keep their input order.
    walking_first.sort_by_key(TripPlan::first_segment_duration);

    let mut ranked = order_group(riding_first, config);
    ranked.extend(order_group(walking_first, config));
    ranked.truncate(config.limit);
    ranked
}

/// Remove structurally identical plans.
///
/// Keeps the first occurrence. Plan numbers are ignored, so the same
/// itinerary returned twice by the backend collapses to one.
pub fn deduplicate(plans: Vec<TripPlan>) -> Vec<TripPlan> {
    if plans.len() <= 1 {
        return plans;
    }

    let mut seen: HashSet<TripPlan> = HashSet::with_capacity(plans.len());
    plans
        .into_iter()
        .filter(|plan| seen.insert(plan.clone()))
        .collect()
}

/// Order one walking/non-walking group.
fn order_group(plans: Vec<TripPlan>, config: &RankConfig) -> Vec<TripPlan> {
    let mut by_segment_count: BTreeMap<usize, Vec<TripPlan>> = BTreeMap::new();
    for plan in plans {
        by_segment_count
            .entry(plan.segment_count())
            .or_default()
            .push(plan);
    }

    let mut ordered = Vec::new();
    for (_, mut group) in by_segment_count {
        group.sort_by_key(TripPlan::start_time);
        for cluster in departure_clusters(group, config.cluster_window_secs) {
            ordered.extend(order_cluster(cluster, config));
        }
    }
    ordered
}

/// Split start-sorted plans into departure clusters.
///
/// Each plan is compared with the plan just before it, so a cluster can
/// span more than the window when departures are spaced evenly.
fn departure_clusters(plans: Vec<TripPlan>, window_secs: i64) -> Vec<Vec<TripPlan>> {
    let mut clusters: Vec<Vec<TripPlan>> = Vec::new();
    let mut previous_start: Option<NaiveDateTime> = None;

    for plan in plans {
        let start = plan.start_time();
        let joins_previous = previous_start
            .is_some_and(|previous| (start - previous).num_seconds() <= window_secs);

        match clusters.last_mut() {
            Some(cluster) if joins_previous => cluster.push(plan),
            _ => clusters.push(vec![plan]),
        }
        previous_start = Some(start);
    }

    clusters
}

/// A plan with its score computed once.
struct Scored {
    plan: TripPlan,
    score: f64,
}

/// Order one departure cluster.
fn order_cluster(plans: Vec<TripPlan>, config: &RankConfig) -> Vec<TripPlan> {
    let mut scored: Vec<Scored> = plans
        .into_iter()
        .map(|plan| {
            let score = score_with(&plan, &config.score);
            Scored { plan, score }
        })
        .collect();

    let tie_window = config.tie_window_secs;
    insertion_sort_by(&mut scored, |a, b| cluster_order(a, b, tie_window));

    scored.into_iter().map(|s| s.plan).collect()
}

/// Duration order, with near-equal durations decided by score.
///
/// This comparison is not transitive (durations 0s, 50s and 100s are each
/// within a minute of a neighbour but not of each other), so it is only
/// ever applied through [`insertion_sort_by`].
fn cluster_order(a: &Scored, b: &Scored, tie_window_secs: i64) -> Ordering {
    let a_duration = a.plan.total_duration();
    let b_duration = b.plan.total_duration();

    if a_duration.abs_diff(b_duration) <= tie_window_secs.unsigned_abs() {
        a.score.total_cmp(&b.score)
    } else {
        a_duration.cmp(&b_duration)
    }
}

/// Stable insertion sort.
///
/// Unlike `slice::sort_by`, this gives a well-defined, deterministic result
/// for any comparison, including ones that are not a total order. Each
/// element moves left past every earlier element it compares strictly less
/// than.
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j], &items[j - 1]) == Ordering::Less {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::fixtures::{at, plan, ride, wait, walk};
    use crate::domain::Segment;
    use proptest::prelude::*;

    fn segment_strategy() -> impl Strategy<Value = Segment> {
        (0u8..3, 60i64..1800).prop_map(|(kind, secs)| match kind {
            0 => walk(secs),
            1 => wait(secs),
            _ => ride("11", secs),
        })
    }

    fn plan_strategy() -> impl Strategy<Value = TripPlan> {
        (
            0i64..1000,                                       // plan number
            0u32..1800,                                       // start offset (seconds)
            600i64..5400,                                     // total duration
            prop::collection::vec(segment_strategy(), 0..6), // segments
        )
            .prop_map(|(number, offset, total, segments)| {
                plan(number, at(10, offset / 60, offset % 60), total, segments)
            })
    }

    fn plans_strategy() -> impl Strategy<Value = Vec<TripPlan>> {
        prop::collection::vec(plan_strategy(), 0..15)
    }

    proptest! {
        #[test]
        fn ranking_is_deterministic(plans in plans_strategy(), limit in 0usize..20) {
            let first = top_n(plans.clone(), limit);
            let second = top_n(plans, limit);
            prop_assert_eq!(
                first.iter().map(TripPlan::plan_number).collect::<Vec<_>>(),
                second.iter().map(TripPlan::plan_number).collect::<Vec<_>>()
            );
            prop_assert_eq!(first, second);
        }

        #[test]
        fn result_length_is_min_of_limit_and_input(plans in plans_strategy(), limit in 0usize..20) {
            let expected = limit.min(plans.len());
            prop_assert_eq!(top_n(plans, limit).len(), expected);
        }

        #[test]
        fn walking_first_plans_come_last(plans in plans_strategy()) {
            let n = plans.len();
            let ranked = top_n(plans, n);
            let first_walker = ranked.iter().position(TripPlan::starts_with_walk);
            if let Some(first_walker) = first_walker {
                prop_assert!(ranked[first_walker..].iter().all(TripPlan::starts_with_walk));
            }
        }

        #[test]
        fn ranking_preserves_elements(plans in plans_strategy()) {
            let n = plans.len();
            let mut expected: Vec<i64> = plans.iter().map(TripPlan::plan_number).collect();
            let mut actual: Vec<i64> = top_n(plans, n).iter().map(TripPlan::plan_number).collect();
            expected.sort_unstable();
            actual.sort_unstable();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn segment_counts_ascend_within_group(plans in plans_strategy()) {
            let n = plans.len();
            let ranked = top_n(plans, n);
            for window in ranked.windows(2) {
                if window[0].starts_with_walk() == window[1].starts_with_walk() {
                    prop_assert!(window[0].segment_count() <= window[1].segment_count());
                }
            }
        }

        #[test]
        fn deduplicate_leaves_no_equal_pairs(plans in plans_strategy()) {
            let result = deduplicate(plans);
            for (i, a) in result.iter().enumerate() {
                for b in &result[i + 1..] {
                    prop_assert_ne!(a, b);
                }
            }
        }
    }
}
