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

//! Compass directions and the bit shifts which realize them.
//!
//! Each direction pairs a shift amount with a "legal after-shift" mask which clears any bit that
//! would have wrapped across the edge of the board.

use super::Bitboard;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// One of the eight compass directions, from White's point of view.
/// West is toward the A file and north is toward rank 8.
pub enum Direction {
    /// Toward the A file.
    West = 0,
    /// Toward the A file and rank 8.
    NorthWest,
    /// Toward rank 8, the direction a white pawn travels.
    North,
    /// Toward the H file and rank 8.
    NorthEast,
    /// Toward the H file.
    East,
    /// Toward the H file and rank 1.
    SouthEast,
    /// Toward rank 1, the direction a black pawn travels.
    South,
    /// Toward the A file and rank 1.
    SouthWest,
}

impl Direction {
    /// All eight directions, in clockwise order starting from west.
    pub const ALL: [Direction; 8] = [
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
    ];

    /// The directions a bishop slides in.
    pub const BISHOP: [Direction; 4] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// The directions a rook slides in.
    pub const ROOK: [Direction; 4] = [
        Direction::West,
        Direction::North,
        Direction::East,
        Direction::South,
    ];

    #[must_use]
    /// Get the bit shift which moves a square one step in this direction.
    pub const fn shift(self) -> i8 {
        // In the H1=bit-0 layout a step west is a shift up by one and a step north a shift up by
        // eight.
        const SHIFTS: [i8; 8] = [1, 9, 8, 7, -1, -9, -8, -7];
        SHIFTS[self as usize]
    }

    #[must_use]
    /// Get the set of squares a single step in this direction may legally land on.
    /// Any bit outside this set after the shift has wrapped across the board edge.
    pub const fn legal_after_shift(self) -> Bitboard {
        const FILE_A: u64 = Bitboard::FILE_A.as_u64();
        const FILE_H: u64 = Bitboard::FILE_H.as_u64();
        const RANK_1: u64 = Bitboard::RANK_1.as_u64();
        const RANK_8: u64 = Bitboard::RANK_8.as_u64();
        const MASKS: [Bitboard; 8] = [
            Bitboard::new(!FILE_H),
            Bitboard::new(!(FILE_H | RANK_1)),
            Bitboard::new(!RANK_1),
            Bitboard::new(!(RANK_1 | FILE_A)),
            Bitboard::new(!FILE_A),
            Bitboard::new(!(FILE_A | RANK_8)),
            Bitboard::new(!RANK_8),
            Bitboard::new(!(RANK_8 | FILE_H)),
        ];
        MASKS[self as usize]
    }
}

#[must_use]
/// Shift the given bitboard one step in the given direction, clearing any square that wrapped
/// across the board edge.
pub const fn single_step(value: Bitboard, direction: Direction) -> Bitboard {
    let shift = direction.shift();
    let shifted = if shift > 0 {
        value.as_u64() << shift
    } else {
        value.as_u64() >> -shift
    };
    Bitboard::new(shifted & direction.legal_after_shift().as_u64())
}

#[must_use]
/// Get all squares reachable from `source` in up to seven steps in the given direction on an
/// empty board, excluding `source` itself.
pub const fn ray(source: Bitboard, direction: Direction) -> Bitboard {
    let mut result = 0u64;
    let mut step = single_step(source, direction);
    let mut loop_count = 0;
    while loop_count < 7 {
        result |= step.as_u64();
        step = single_step(step, direction);
        loop_count += 1;
    }
    Bitboard::new(result)
}
