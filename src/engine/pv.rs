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

//! The principal variation, stored as a triangular table.
//!
//! The table has space for the best line and all currently investigated sublines, flattened into
//! a single array whose length is the triangular number of the maximum search depth. The subline
//! for ply `d` starts at index `d * (2 * D + 1 - d) / 2` and has room for `D - d` moves.

use std::fmt::{Display, Formatter};

use crate::base::Move;

/// The maximum depth the search may be asked to run at, which bounds the line lengths the
/// table can hold.
pub const MAX_SEARCH_DEPTH: usize = 10;

/// The length of the flattened triangular table.
const TABLE_LENGTH: usize = MAX_SEARCH_DEPTH * (MAX_SEARCH_DEPTH + 1) / 2;

#[derive(Clone, Debug, PartialEq, Eq)]
/// The triangular principal variation table.
/// After a completed search the main line sits at the front; the sublines are scratch space for
/// lines still being investigated.
pub struct PrincipalVariation {
    table: [Move; TABLE_LENGTH],
}

impl PrincipalVariation {
    #[must_use]
    /// Create a table holding only null moves.
    pub const fn new() -> PrincipalVariation {
        PrincipalVariation {
            table: [Move::NULL; TABLE_LENGTH],
        }
    }

    #[must_use]
    /// The index where the subline for ply `ply` begins in the flattened table.
    pub const fn subline_start(ply: usize) -> usize {
        ply * (2 * MAX_SEARCH_DEPTH + 1 - ply) / 2
    }

    /// Reset the whole table to null moves.
    pub fn clear(&mut self) {
        self.table = [Move::NULL; TABLE_LENGTH];
    }

    /// Reset every subline, leaving the main line untouched.
    pub fn clear_sublines(&mut self) {
        for entry in &mut self.table[Self::subline_start(1)..] {
            *entry = Move::NULL;
        }
    }

    /// Terminate the subline at `ply`, marking that the node there has no continuation.
    pub fn truncate_at(&mut self, ply: usize) {
        if ply < MAX_SEARCH_DEPTH {
            self.table[Self::subline_start(ply)] = Move::NULL;
        }
    }

    /// Record that `m` is the new best move at `ply`, prepending it to the subline found one ply
    /// deeper.
    ///
    /// # Panics
    ///
    /// This function will panic if `ply` is not below [`MAX_SEARCH_DEPTH`].
    pub fn record(&mut self, ply: usize, m: Move) {
        assert!(ply < MAX_SEARCH_DEPTH, "record beyond the table's depth");
        let own = Self::subline_start(ply);
        let child = Self::subline_start(ply + 1);
        self.table[own] = m;
        let child_length = MAX_SEARCH_DEPTH - ply - 1;
        self.table
            .copy_within(child..child + child_length, own + 1);
    }

    #[must_use]
    /// The main line: the best play for both sides found by the last search, ending before the
    /// first null move.
    pub fn main_line(&self) -> &[Move] {
        let line = &self.table[..MAX_SEARCH_DEPTH];
        let length = line.iter().position(|m| m.is_null()).unwrap_or(line.len());
        &line[..length]
    }
}

impl Default for PrincipalVariation {
    fn default() -> PrincipalVariation {
        PrincipalVariation::new()
    }
}

impl Display for PrincipalVariation {
    /// Render the whole triangle, one line per ply, with the main line first.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for ply in 0..MAX_SEARCH_DEPTH {
            let start = Self::subline_start(ply);
            let end = Self::subline_start(ply + 1);
            for _ in 0..ply {
                write!(f, "      ")?;
            }
            for m in &self.table[start..end] {
                write!(f, "{:5} ", m.to_uci())?;
            }
            if ply == 0 {
                write!(f, "(main line)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
