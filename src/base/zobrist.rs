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

//! Hash key generation for positions.
//!
//! The hash is computed from scratch and is only used outside the search hot path, for the
//! repetition bookkeeping of [`crate::base::Game`]. Make and unmake do not maintain it
//! incrementally.

use once_cell::sync::Lazy;

use super::{
    position::{
        CASTLING_BLACK_KINGSIDE, CASTLING_BLACK_QUEENSIDE, CASTLING_WHITE_KINGSIDE,
        CASTLING_WHITE_QUEENSIDE, SLOT_BLACK, SLOT_WHITE,
    },
    Piece, Position, Side,
};

/// The keys for one category of position feature.
struct Keys {
    /// One key per square, piece kind, and side. The kind axis excludes the empty kind.
    squares: [[[u64; 2]; 6]; 64],
    /// The key applied when Black is to move.
    black_to_move: u64,
    /// One key per castling right, ordered white kingside, white queenside, black kingside,
    /// black queenside.
    castling: [u64; 4],
    /// One key per possible en-passant file.
    en_passant_files: [u64; 8],
}

/// The key table, generated once at first use from a fixed seed.
static KEYS: Lazy<Keys> = Lazy::new(|| {
    let mut rng = fastrand::Rng::with_seed(0x0039_B9E7_25C5_D14A);
    let mut squares = [[[0u64; 2]; 6]; 64];
    for per_square in &mut squares {
        for per_kind in per_square.iter_mut() {
            for key in per_kind.iter_mut() {
                *key = rng.u64(..);
            }
        }
    }
    Keys {
        squares,
        black_to_move: rng.u64(..),
        castling: [rng.u64(..), rng.u64(..), rng.u64(..), rng.u64(..)],
        en_passant_files: [
            rng.u64(..),
            rng.u64(..),
            rng.u64(..),
            rng.u64(..),
            rng.u64(..),
            rng.u64(..),
            rng.u64(..),
            rng.u64(..),
        ],
    }
});

#[must_use]
/// Compute the Zobrist hash of a position.
///
/// Two positions hash equally exactly when they agree on piece placement, side to move, castling
/// rights, and en-passant target, which is the notion of sameness the repetition rule uses.
pub fn hash(position: &Position) -> u64 {
    let keys = &*KEYS;
    let mut result = 0;

    for (side, slot) in [(Side::White, SLOT_WHITE), (Side::Black, SLOT_BLACK)] {
        for kind in Piece::ALL {
            for square in position[slot + kind.index()] {
                result ^= keys.squares[square as usize][kind.index() - 1][side.index()];
            }
        }
    }

    if !position.white_to_move() {
        result ^= keys.black_to_move;
    }

    for (index, right) in [
        CASTLING_WHITE_KINGSIDE,
        CASTLING_WHITE_QUEENSIDE,
        CASTLING_BLACK_KINGSIDE,
        CASTLING_BLACK_QUEENSIDE,
    ]
    .into_iter()
    .enumerate()
    {
        if position.has_castling_right(right) {
            result ^= keys.castling[index];
        }
    }

    let en_passant = position.en_passant_index();
    if en_passant != 0 {
        result ^= keys.en_passant_files[(en_passant & 7) as usize];
    }

    result
}
