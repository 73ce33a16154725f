//! Task urgency integration tests
//!
//! Tests for the smart task engine including:
//! - Due-date modifiers strictly order urgency for a fixed priority
//! - Missing due dates cost a flat 20 points
//! - Recommendation tiers are monotonic in score
//! - Ranking is a stable, score-descending sort

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use shared::{
    base_score, build_suggestions, rank_by_urgency, urgency_score, DueWindow, Priority,
    Recommendation, TaskSnapshot, TaskStats,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 18)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap()
}

fn due_in(days: i64) -> Option<NaiveDateTime> {
    Some(now() + Duration::days(days))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_reference_scores() {
        assert_eq!(urgency_score(Some(Priority::Urgent), due_in(-1), now()), 150);
        assert_eq!(urgency_score(Some(Priority::Low), None, now()), 5);
        assert_eq!(urgency_score(Some(Priority::Medium), due_in(5), now()), 70);
    }

    #[test]
    fn test_window_boundaries() {
        let cases = [
            (-1, 50),
            (0, 40),
            (1, 30),
            (2, 20),
            (7, 20),
            (8, 10),
            (14, 10),
            (15, 0),
        ];
        for (days, modifier) in cases {
            assert_eq!(
                urgency_score(Some(Priority::High), due_in(days), now()),
                75 + modifier,
                "{} days out",
                days
            );
        }
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        let late_tonight = NaiveDate::from_ymd_opt(2024, 1, 18)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let early_today = NaiveDate::from_ymd_opt(2024, 1, 18)
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();

        assert_eq!(
            urgency_score(Some(Priority::Medium), Some(late_tonight), now()),
            90
        );
        // Earlier today but not yesterday: still due today, not overdue
        assert_eq!(
            urgency_score(Some(Priority::Medium), Some(early_today), now()),
            90
        );
    }

    #[test]
    fn test_unknown_priority_scores_as_medium() {
        let snapshot = TaskSnapshot::new(Priority::parse_lenient("someday"), due_in(3));
        assert_eq!(snapshot.urgency_score(now()), 70);
    }

    #[test]
    fn test_scoring_ignores_completion_flag() {
        let mut snapshot = TaskSnapshot::new(Some(Priority::High), due_in(0));
        let open = snapshot.urgency_score(now());
        snapshot.is_completed = true;
        assert_eq!(snapshot.urgency_score(now()), open);
    }

    #[test]
    fn test_suggestions_for_backlog() {
        let tasks: Vec<TaskSnapshot> = (0..25)
            .map(|i| TaskSnapshot::new(Some(Priority::Low), due_in(30 + i)))
            .collect();
        let stats = TaskStats::tally(&tasks, now());
        assert_eq!(stats.total_incomplete, 25);

        let suggestions = build_suggestions(&stats);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("25"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn priority_strategy() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High),
            Just(Priority::Urgent),
        ]
    }

    fn maybe_priority_strategy() -> impl Strategy<Value = Option<Priority>> {
        prop_oneof![
            1 => Just(None),
            4 => priority_strategy().prop_map(Some),
        ]
    }

    fn due_offset_strategy() -> impl Strategy<Value = Option<i64>> {
        prop_oneof![
            1 => Just(None),
            6 => (-400i64..400).prop_map(Some),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Overdue > today > tomorrow > this week > next week > later > no date
        #[test]
        fn prop_due_windows_strictly_order_urgency(
            priority in maybe_priority_strategy(),
            this_week in 2i64..=7,
            next_week in 8i64..=14,
            later in 15i64..1000,
            overdue in 1i64..1000,
        ) {
            let scores = [
                urgency_score(priority, due_in(-overdue), now()),
                urgency_score(priority, due_in(0), now()),
                urgency_score(priority, due_in(1), now()),
                urgency_score(priority, due_in(this_week), now()),
                urgency_score(priority, due_in(next_week), now()),
                urgency_score(priority, due_in(later), now()),
                urgency_score(priority, None, now()),
            ];
            for pair in scores.windows(2) {
                prop_assert!(pair[0] > pair[1]);
            }
        }

        #[test]
        fn prop_no_due_date_is_base_minus_twenty(priority in maybe_priority_strategy()) {
            prop_assert_eq!(urgency_score(priority, None, now()), base_score(priority) - 20);
        }

        #[test]
        fn prop_score_is_base_plus_window_modifier(
            priority in maybe_priority_strategy(),
            offset in due_offset_strategy(),
        ) {
            let due = offset.and_then(due_in);
            let window = DueWindow::from_days(offset);
            prop_assert_eq!(
                urgency_score(priority, due, now()),
                base_score(priority) + window.modifier()
            );
        }

        #[test]
        fn prop_recommendation_monotonic(a in -100i32..300, b in -100i32..300) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Recommendation::from_score(low) <= Recommendation::from_score(high));
        }

        #[test]
        fn prop_ranking_sorted_and_stable(
            tasks in prop::collection::vec((maybe_priority_strategy(), due_offset_strategy()), 0..40)
        ) {
            let indexed: Vec<(usize, Option<Priority>, Option<i64>)> = tasks
                .iter()
                .enumerate()
                .map(|(i, (p, d))| (i, *p, *d))
                .collect();

            let ranked = rank_by_urgency(indexed, now(), |(_, p, d)| {
                TaskSnapshot::new(*p, d.and_then(due_in))
            });

            prop_assert_eq!(ranked.len(), tasks.len());
            for pair in ranked.windows(2) {
                let ((first, _, _), first_score) = &pair[0];
                let ((second, _, _), second_score) = &pair[1];
                prop_assert!(first_score >= second_score);
                if first_score == second_score {
                    prop_assert!(first < second);
                }
            }
        }

        #[test]
        fn prop_suggestions_never_empty(
            tasks in prop::collection::vec((maybe_priority_strategy(), due_offset_strategy()), 0..60)
        ) {
            let snapshots: Vec<TaskSnapshot> = tasks
                .iter()
                .map(|(p, d)| TaskSnapshot::new(*p, d.and_then(due_in)))
                .collect();
            let stats = TaskStats::tally(&snapshots, now());

            prop_assert_eq!(stats.total_incomplete as usize, snapshots.len());
            prop_assert!(stats.overdue + stats.due_today + stats.due_this_week <= stats.total_incomplete);
            prop_assert!(!build_suggestions(&stats).is_empty());
        }
    }
}
