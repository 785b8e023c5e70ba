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

//! Full-width tree walks without pruning: perft and a plain minimax reference.
//!
//! Both exist to validate the move generator and the search: perft counts the legal leaves of
//! the move tree against well-known reference values, and the minimax walk produces the
//! evaluation that alpha-beta must reproduce exactly.

use crate::base::{movegen::generate_moves, MoveStack, Position};

use super::evaluate::{Evaluate, Evaluation};

/// Count the leaf nodes of the legal move tree of `position`, `depth` plies deep.
/// Pseudo-legal moves which leave the mover's king in check are not counted.
pub fn perft(position: &mut Position, move_stack: &mut MoveStack, first: usize, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let last = generate_moves(position, move_stack, first);
    let mut leaves = 0;
    for index in first..last {
        let m = move_stack[index];
        position.make_move(m);
        if !position.defenders_king_is_in_check() {
            leaves += perft(position, move_stack, last, depth - 1);
        }
        position.unmake_move(m);
    }
    leaves
}

/// A search without pruning that visits all leaves.
///
/// Returns the minimax evaluation from White's point of view and adds every evaluated leaf to
/// `leaf_count`. Terminal nodes score mates and stalemates the same way the alpha-beta search
/// does, so the two must agree exactly on every position.
pub fn minimax_reference<E: Evaluate>(
    position: &mut Position,
    evaluator: &E,
    move_stack: &mut MoveStack,
    first: usize,
    depth: u8,
    ply: usize,
    leaf_count: &mut u64,
) -> Evaluation {
    if depth == 0 {
        *leaf_count += 1;
        return evaluator.evaluate(position);
    }

    let last = generate_moves(position, move_stack, first);
    let white_to_move = position.white_to_move();
    let mut best: Option<Evaluation> = None;
    for index in first..last {
        let m = move_stack[index];
        position.make_move(m);
        if !position.defenders_king_is_in_check() {
            let child = minimax_reference(
                position,
                evaluator,
                move_stack,
                last,
                depth - 1,
                ply + 1,
                leaf_count,
            );
            best = Some(match best {
                None => child,
                Some(current) if white_to_move => current.max(child),
                Some(current) => current.min(child),
            });
        }
        position.unmake_move(m);
    }

    best.unwrap_or_else(|| {
        if position.attackers_king_is_in_check() {
            // the side to move is mated; negate for Black so the value stays white-relative
            let mated = Evaluation::checkmated(ply);
            if white_to_move {
                mated
            } else {
                -mated
            }
        } else {
            Evaluation::DRAW
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{fen::STARTING_POSITION_FEN, Move, MOVE_STACK_CAPACITY};
    use crate::engine::evaluate::EvaluateMaterial;
    use crate::engine::limit::AbortCondition;
    use crate::engine::pv::PrincipalVariation;
    use crate::engine::search::{find_best_move, GenerateAllPseudoLegalMoves};

    fn start_perft(depth: u8) -> u64 {
        let mut position = Position::from_fen(STARTING_POSITION_FEN).unwrap();
        let mut move_stack = Box::new([Move::NULL; MOVE_STACK_CAPACITY]);
        perft(&mut position, &mut move_stack, 0, depth)
    }

    #[test]
    fn perft_shallow() {
        assert_eq!(start_perft(0), 1);
        assert_eq!(start_perft(1), 20);
        assert_eq!(start_perft(2), 400);
        assert_eq!(start_perft(3), 8_902);
    }

    #[test]
    fn perft_depth_4() {
        assert_eq!(start_perft(4), 197_281);
    }

    #[test]
    fn perft_depth_5() {
        assert_eq!(start_perft(5), 4_865_609);
    }

    #[test]
    #[ignore = "verifies the full reference sequence but takes minutes to run"]
    fn perft_depth_6() {
        assert_eq!(start_perft(6), 119_060_324);
    }

    #[test]
    /// A full-width visitor with null pruning evaluates exactly the perft-3 number of leaves
    /// from the start.
    fn reference_walk_counts_leaves() {
        let mut position = Position::from_fen(STARTING_POSITION_FEN).unwrap();
        let mut move_stack = Box::new([Move::NULL; MOVE_STACK_CAPACITY]);
        let mut leaf_count = 0;
        let evaluation = minimax_reference(
            &mut position,
            &EvaluateMaterial,
            &mut move_stack,
            0,
            3,
            0,
            &mut leaf_count,
        );
        assert_eq!(leaf_count, 8_902);
        // no material can be won by force this early
        assert_eq!(evaluation, Evaluation::Advantage(0.0));
    }

    #[test]
    /// Pruning must not alter the root score: alpha-beta and plain minimax agree.
    fn alpha_beta_equals_minimax() {
        let fens = [
            "k7/8/8/3q4/8/8/3R4/K7 w - - 0 1",
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 4 4",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ];
        for fen in fens {
            for depth in 1..=3u8 {
                let mut position = Position::from_fen(fen).unwrap();
                let mut move_stack = Box::new([Move::NULL; MOVE_STACK_CAPACITY]);
                let mut leaf_count = 0;
                let reference = minimax_reference(
                    &mut position,
                    &EvaluateMaterial,
                    &mut move_stack,
                    0,
                    depth,
                    0,
                    &mut leaf_count,
                );

                let mut pv = PrincipalVariation::new();
                let (_, evaluation) = find_best_move(
                    &mut position,
                    &GenerateAllPseudoLegalMoves,
                    &EvaluateMaterial,
                    &mut move_stack,
                    &mut pv,
                    &AbortCondition::depth(depth),
                )
                .unwrap();

                assert_eq!(
                    evaluation, reference,
                    "pruned and unpruned scores differ for {fen} at depth {depth}"
                );
            }
        }
    }
}
