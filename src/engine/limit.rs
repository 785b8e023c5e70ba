/*
  Woodpusher, a UCI chess engine.
  Copyright (C) 2026 The Woodpusher Authors.

  Woodpusher is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Woodpusher is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Search limiting.
//!
//! A search runs to a fixed depth, but the caller may also hand it a deadline. The deadline is
//! polled at the entry of every node; once it has passed, the search unwinds with
//! [`CalculationWasDue`] and reports whatever it had completed.

use std::time::Instant;

use thiserror::Error;

use super::pv::MAX_SEARCH_DEPTH;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("calculation was due before the search finished")]
/// The error raised through all levels of the search when its deadline passes.
pub struct CalculationWasDue;

#[derive(Debug, Clone, Copy)]
/// The bounds of one search: how deep to go, and optionally when the result is due.
pub struct AbortCondition {
    /// The depth to search to, in plies.
    pub full_search_depth: u8,
    /// The moment the result is due, or `None` for an untimed search.
    pub calculation_is_due: Option<Instant>,
}

impl AbortCondition {
    #[must_use]
    /// An untimed search to the given depth.
    ///
    /// # Panics
    ///
    /// This function will panic if `depth` exceeds the principal variation table's capacity,
    /// [`MAX_SEARCH_DEPTH`].
    pub fn depth(depth: u8) -> AbortCondition {
        assert!(
            depth as usize <= MAX_SEARCH_DEPTH,
            "search depth {depth} exceeds the maximum of {MAX_SEARCH_DEPTH}"
        );
        AbortCondition {
            full_search_depth: depth,
            calculation_is_due: None,
        }
    }

    #[must_use]
    /// A search to the given depth whose result is due at `due`.
    pub fn with_deadline(depth: u8, due: Instant) -> AbortCondition {
        AbortCondition {
            calculation_is_due: Some(due),
            ..AbortCondition::depth(depth)
        }
    }

    #[must_use]
    /// Whether the deadline has passed.
    pub fn expired(&self) -> bool {
        self.calculation_is_due
            .is_some_and(|due| Instant::now() >= due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn untimed_never_expires() {
        assert!(!AbortCondition::depth(4).expired());
    }

    #[test]
    fn past_deadline_expires() {
        let due = Instant::now() - Duration::from_millis(1);
        assert!(AbortCondition::with_deadline(4, due).expired());
    }

    #[test]
    fn future_deadline_does_not_expire_yet() {
        let due = Instant::now() + Duration::from_secs(3600);
        assert!(!AbortCondition::with_deadline(4, due).expired());
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum")]
    fn depth_beyond_the_table_is_rejected() {
        let _ = AbortCondition::depth(11);
    }
}
