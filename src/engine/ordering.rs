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

//! Move ordering for better pruning: promising moves first.

use crate::base::{Move, Piece};

use super::evaluate::PIECE_VALUES;

/// The material gained by each promotion kind, which is its value minus the promoted pawn.
const PROMOTION_GAINS: [i32; Piece::NUM] = {
    let mut gains = [0; Piece::NUM];
    let mut kind = 2;
    while kind < Piece::NUM {
        gains[kind] = PIECE_VALUES[kind] - PIECE_VALUES[Piece::Pawn.index()];
        kind += 1;
    }
    gains
};

#[must_use]
/// The material difference a move promises: the value of the captured piece plus the gain of its
/// promotion. Quiet moves score zero.
pub fn material_difference(m: Move) -> i32 {
    PIECE_VALUES[m.captured_piece().index()] + PROMOTION_GAINS[m.promotion().index()]
}

/// Sort a slice of generated moves so that the largest material differences come first.
/// The sort is stable, so moves of equal promise keep their generation order.
/// Insertion sort runs in place; the slices one node generates are short, and the search must
/// not allocate per node.
pub fn sort_by_material_difference(moves: &mut [Move]) {
    for sorted_end in 1..moves.len() {
        let m = moves[sorted_end];
        let key = material_difference(m);
        let mut slot = sorted_end;
        while slot > 0 && material_difference(moves[slot - 1]) < key {
            moves[slot] = moves[slot - 1];
            slot -= 1;
        }
        moves[slot] = m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{MoveKind, Square};

    fn compose(captured: Piece, promotion: Piece, kind: MoveKind) -> Move {
        Move::compose(
            Square::E4 as u32,
            Square::D5 as u32,
            Piece::Pawn,
            captured,
            promotion,
            kind,
        )
    }

    #[test]
    fn captures_score_their_victim() {
        assert_eq!(
            material_difference(compose(Piece::Queen, Piece::None, MoveKind::Capture)),
            9
        );
        assert_eq!(
            material_difference(compose(Piece::None, Piece::None, MoveKind::PawnSinglePush)),
            0
        );
    }

    #[test]
    fn promotion_gain_subtracts_the_pawn() {
        assert_eq!(
            material_difference(compose(Piece::None, Piece::Queen, MoveKind::Promotion)),
            8
        );
        assert_eq!(
            material_difference(compose(Piece::Rook, Piece::Knight, MoveKind::Promotion)),
            5 + 2
        );
    }

    #[test]
    /// Captures of the most valuable pieces come first, and equal moves keep their order.
    fn sort_is_stable_and_descending() {
        let quiet = compose(Piece::None, Piece::None, MoveKind::QuietNonPawn);
        let pawn_capture_a = Move::compose(
            Square::A2 as u32,
            Square::B3 as u32,
            Piece::Pawn,
            Piece::Pawn,
            Piece::None,
            MoveKind::Capture,
        );
        let pawn_capture_b = Move::compose(
            Square::C2 as u32,
            Square::B3 as u32,
            Piece::Pawn,
            Piece::Pawn,
            Piece::None,
            MoveKind::Capture,
        );
        let queen_capture = compose(Piece::Queen, Piece::None, MoveKind::Capture);

        let mut moves = [quiet, pawn_capture_a, pawn_capture_b, queen_capture];
        sort_by_material_difference(&mut moves);
        assert_eq!(moves, [queen_capture, pawn_capture_a, pawn_capture_b, quiet]);
    }
}
