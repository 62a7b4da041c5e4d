//! Streak Tracker - Daily-engagement continuity
//!
//! A small date-arithmetic state machine over calendar days. Two pure
//! functions do all the work:
//!
//! - [`advance`] runs on every successful journal-entry creation.
//! - [`apply_decay`] runs on every profile read: a streak that was not
//!   extended yesterday is forced to zero without an explicit "break"
//!   event. Reading can therefore change stored state; the storage
//!   layer persists the decayed value deliberately.
//!
//! Back-dated entries (a journal date before the last recorded one)
//! take the gap branch and restart the streak at 1. That mirrors the
//! original system's date-only comparison; see DESIGN.md.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// STREAK STATE
// ============================================================================

/// Per-profile engagement counters
///
/// Created once per profile with all counters at zero; mutated only by
/// the transition functions in this module (via the storage layer).
/// `longest_streak` and `total_journal_days` are monotonically
/// non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    /// Consecutive journal days ending at `last_journal_date`
    pub current_streak: i64,
    /// Highest streak ever reached
    pub longest_streak: i64,
    /// Total distinct days with at least one journal entry
    pub total_journal_days: i64,
    /// Calendar date of the most recent journal entry
    pub last_journal_date: Option<NaiveDate>,
}

/// A profile record as stored: streak counters plus the open
/// preferences map collaborators maintain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakProfile {
    /// Profile identifier
    pub profile_id: String,
    /// Engagement counters
    #[serde(flatten)]
    pub streak: StreakState,
    /// Free-form preferences, owned by external collaborators
    pub preferences: BTreeMap<String, Value>,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Apply one journal-creation event to the streak state.
///
/// `days_diff = new_date - last_journal_date` in whole calendar days:
/// - no prior date: streak starts at 1
/// - 0: same-day re-entry, state unchanged (never double-counts)
/// - 1: consecutive day, streak extends
/// - anything else (gap forward, or a back-dated entry): streak restarts
///   at 1; the day still counts toward `total_journal_days`
pub fn advance(state: &StreakState, new_date: NaiveDate) -> StreakState {
    let mut next = state.clone();

    match state.last_journal_date {
        None => {
            next.current_streak = 1;
            next.total_journal_days += 1;
            next.last_journal_date = Some(new_date);
        }
        Some(last) => {
            let days_diff = (new_date - last).num_days();
            if days_diff == 0 {
                return next;
            }
            if days_diff == 1 {
                next.current_streak += 1;
            } else {
                next.current_streak = 1;
            }
            next.total_journal_days += 1;
            next.last_journal_date = Some(new_date);
        }
    }

    next.longest_streak = next.longest_streak.max(next.current_streak);
    next
}

/// Recompute the current streak as of `today` without a journal event.
///
/// Idempotent. If more than one full day has passed since the last
/// entry, the running streak is forfeited; `longest_streak`,
/// `total_journal_days`, and `last_journal_date` are untouched.
pub fn apply_decay(state: &StreakState, today: NaiveDate) -> StreakState {
    let mut next = state.clone();
    if let Some(last) = state.last_journal_date {
        if (today - last).num_days() > 1 {
            next.current_streak = 0;
        }
    }
    next
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_first_entry_starts_streak() {
        let state = advance(&StreakState::default(), day(1));
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 1);
        assert_eq!(state.total_journal_days, 1);
        assert_eq!(state.last_journal_date, Some(day(1)));
    }

    #[test]
    fn test_same_day_is_noop() {
        let state = advance(&StreakState::default(), day(1));
        let again = advance(&state, day(1));
        assert_eq!(again, state);
    }

    #[test]
    fn test_consecutive_gap_decay_sequence() {
        // Day 1, day 2 consecutive, gap to day 5, read on day 8.
        let state = advance(&StreakState::default(), day(1));
        assert_eq!(state.current_streak, 1);

        let state = advance(&state, day(2));
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.longest_streak, 2);

        let state = advance(&state, day(5));
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 2);
        assert_eq!(state.total_journal_days, 3);

        let state = apply_decay(&state, day(8));
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.longest_streak, 2);
        assert_eq!(state.total_journal_days, 3);
        assert_eq!(state.last_journal_date, Some(day(5)));
    }

    #[test]
    fn test_decay_spares_fresh_streak() {
        let state = advance(&StreakState::default(), day(5));
        // Same day and next day: streak intact.
        assert_eq!(apply_decay(&state, day(5)).current_streak, 1);
        assert_eq!(apply_decay(&state, day(6)).current_streak, 1);
        // Two days out: forfeited.
        assert_eq!(apply_decay(&state, day(7)).current_streak, 0);
    }

    #[test]
    fn test_decay_is_idempotent() {
        let state = advance(&StreakState::default(), day(1));
        let once = apply_decay(&state, day(10));
        let twice = apply_decay(&once, day(10));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_back_dated_entry_restarts_streak() {
        // days_diff < 0 takes the gap branch: restart at 1. Preserved
        // from the original date-only comparison, not "fixed".
        let state = advance(&StreakState::default(), day(10));
        let state = advance(&state, day(11));
        assert_eq!(state.current_streak, 2);

        let state = advance(&state, day(4));
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.longest_streak, 2);
        assert_eq!(state.total_journal_days, 3);
        assert_eq!(state.last_journal_date, Some(day(4)));
    }

    #[test]
    fn test_longest_streak_monotonic() {
        let mut state = StreakState::default();
        for d in 1..=4 {
            state = advance(&state, day(d));
        }
        assert_eq!(state.longest_streak, 4);
        state = advance(&state, day(20));
        state = advance(&state, day(21));
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.longest_streak, 4);
    }
}
