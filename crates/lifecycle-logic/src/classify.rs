//! Lifecycle classifier
//!
//! Maps a point-in-time tournament snapshot plus the wall clock to exactly
//! one action. Pure and total: every (status, time, players) combination
//! resolves to one of the four actions.

use serde::{Deserialize, Serialize};

use crate::status::{TournamentStatus, MIN_PLAYERS};

/// The single action a tournament needs this tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Nothing to do (or nothing this keeper is allowed to do)
    NoOp,
    /// Registration closed with too few players; cancel and let the
    /// contract refund entry fees
    Cancel,
    /// Tournament is running; generate and submit scores if none exist yet
    SimulateScores,
    /// Tournament ran past its end time; close it out and pay winners
    Finalize,
}

/// Classify one tournament.
///
/// Decision table, in precedence order:
/// - Registration past its start time with fewer than [`MIN_PLAYERS`]
///   players → `Cancel`. With enough players the contract auto-starts on
///   fill (or an admin starts it manually), so the keeper stays out.
/// - InProgress before `end_time` → `SimulateScores` (the executor probes
///   whether scores already exist; that needs a chain read and is not done
///   here).
/// - InProgress at or past `end_time` → `Finalize`. The boundary is
///   inclusive: a tournament observed exactly at its end time finalizes.
/// - Completed and Canceled tournaments → `NoOp`.
pub fn classify(
    status: TournamentStatus,
    start_time: u64,
    end_time: u64,
    current_players: u32,
    now: u64,
) -> Action {
    match status {
        TournamentStatus::Registration => {
            if now >= start_time && current_players < MIN_PLAYERS {
                Action::Cancel
            } else {
                Action::NoOp
            }
        }
        TournamentStatus::InProgress => {
            if now >= end_time {
                Action::Finalize
            } else {
                Action::SimulateScores
            }
        }
        TournamentStatus::Completed | TournamentStatus::Canceled => Action::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const START: u64 = 1_700_000_000;
    const END: u64 = 1_700_003_600;

    #[test]
    fn test_registration_underfilled_past_start_cancels() {
        let action = classify(TournamentStatus::Registration, START, END, 1, START);
        assert_eq!(action, Action::Cancel);

        let action = classify(TournamentStatus::Registration, START, END, 0, START + 10);
        assert_eq!(action, Action::Cancel);
    }

    #[test]
    fn test_registration_at_threshold_is_noop() {
        // Exactly MIN_PLAYERS: the contract starts it, not the keeper
        let action = classify(TournamentStatus::Registration, START, END, 2, START);
        assert_eq!(action, Action::NoOp);

        let action = classify(TournamentStatus::Registration, START, END, 3, START + 10);
        assert_eq!(action, Action::NoOp);
    }

    #[test]
    fn test_registration_before_start_is_noop() {
        // Underfilled but registration is still open
        let action = classify(TournamentStatus::Registration, START, END, 0, START - 1);
        assert_eq!(action, Action::NoOp);

        let action = classify(TournamentStatus::Registration, START, END, 4, START - 100);
        assert_eq!(action, Action::NoOp);
    }

    #[test]
    fn test_in_progress_before_end_simulates() {
        let action = classify(TournamentStatus::InProgress, START, END, 4, END - 1);
        assert_eq!(action, Action::SimulateScores);
    }

    #[test]
    fn test_finalize_boundary_inclusive() {
        // now == end_time finalizes; one second earlier still simulates
        let action = classify(TournamentStatus::InProgress, START, END, 4, END);
        assert_eq!(action, Action::Finalize);

        let action = classify(TournamentStatus::InProgress, START, END, 4, END - 1);
        assert_eq!(action, Action::SimulateScores);

        let action = classify(TournamentStatus::InProgress, START, END, 4, END + 500);
        assert_eq!(action, Action::Finalize);
    }

    #[test]
    fn test_terminal_states_are_noop() {
        for status in [TournamentStatus::Completed, TournamentStatus::Canceled] {
            for now in [START - 1, START, END, END + 1000] {
                assert_eq!(classify(status, START, END, 0, now), Action::NoOp);
                assert_eq!(classify(status, START, END, 8, now), Action::NoOp);
            }
        }
    }

    fn any_status() -> impl Strategy<Value = TournamentStatus> {
        prop_oneof![
            Just(TournamentStatus::Registration),
            Just(TournamentStatus::InProgress),
            Just(TournamentStatus::Completed),
            Just(TournamentStatus::Canceled),
        ]
    }

    proptest! {
        /// Totality + the structural invariants of the decision table hold
        /// for arbitrary inputs.
        #[test]
        fn prop_classifier_total(
            status in any_status(),
            start in 0u64..2_000_000_000,
            duration in 1u64..10_000_000,
            players in 0u32..10_000,
            now in 0u64..4_000_000_000,
        ) {
            let end = start + duration;
            let action = classify(status, start, end, players, now);

            // Cancel only ever comes out of Registration
            if action == Action::Cancel {
                prop_assert_eq!(status, TournamentStatus::Registration);
                prop_assert!(now >= start);
                prop_assert!(players < MIN_PLAYERS);
            }

            // Simulate/Finalize only ever come out of InProgress
            if matches!(action, Action::SimulateScores | Action::Finalize) {
                prop_assert_eq!(status, TournamentStatus::InProgress);
            }

            // Terminal states never act
            if status.is_terminal() {
                prop_assert_eq!(action, Action::NoOp);
            }

            // Determinism
            prop_assert_eq!(action, classify(status, start, end, players, now));
        }
    }
}
