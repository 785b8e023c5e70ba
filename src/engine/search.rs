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

//! The search: negamax with alpha-beta pruning.
//!
//! The search is generic over its move generator and its evaluator so that either can be
//! replaced with a test double. It makes each pseudo-legal move on the shared position, rejects
//! it if the attack oracle reports the mover's king in check, and otherwise recurses, threading
//! a cursor into the shared move stack so that every level owns a disjoint suffix.
//!
//! Cutoffs are fail-hard: a node never returns a value outside its alpha-beta window. This is
//! what keeps the principal variation table consistent with the returned score.

use crate::base::{movegen, Move, MoveStack, Position};

use super::{
    evaluate::{Evaluate, Evaluation},
    limit::{AbortCondition, CalculationWasDue},
    ordering,
    pv::{PrincipalVariation, MAX_SEARCH_DEPTH},
};

/// A source of pseudo-legal moves for the search.
/// The engine uses [`GenerateAllPseudoLegalMoves`]; tests substitute scripted doubles.
pub trait GenerateMoves {
    /// Write the pseudo-legal moves of `position` into `move_stack` starting at `first`,
    /// returning the index one past the last move written.
    fn generate_moves(
        &self,
        position: &Position,
        move_stack: &mut MoveStack,
        first: usize,
    ) -> usize;
}

#[derive(Clone, Copy, Debug, Default)]
/// The real move generator.
pub struct GenerateAllPseudoLegalMoves;

impl GenerateMoves for GenerateAllPseudoLegalMoves {
    fn generate_moves(
        &self,
        position: &Position,
        move_stack: &mut MoveStack,
        first: usize,
    ) -> usize {
        movegen::generate_moves(position, move_stack, first)
    }
}

/// Negate an evaluation when the negamax frame belongs to Black.
fn apply_sign(evaluation: Evaluation, sign: i8) -> Evaluation {
    if sign < 0 {
        -evaluation
    } else {
        evaluation
    }
}

/// Search for the best move in `position`, to the depth and deadline in `abort`.
///
/// On success, returns the best move together with its evaluation from White's point of view;
/// the principal variation table holds the expected line in its main line. When the position has
/// no legal move at all, the returned move is [`Move::NULL`] and the evaluation reports the mate
/// or stalemate.
///
/// The position is mutated during the search but restored before returning.
///
/// # Errors
///
/// This function will return an `Err` if the deadline passed before any root move was fully
/// searched. A deadline which passes later simply yields the best move completed so far.
///
/// # Panics
///
/// This function will panic if `abort` asks for a depth beyond the principal variation table's
/// capacity.
pub fn find_best_move<G: GenerateMoves, E: Evaluate>(
    position: &mut Position,
    generator: &G,
    evaluator: &E,
    move_stack: &mut MoveStack,
    pv: &mut PrincipalVariation,
    abort: &AbortCondition,
) -> Result<(Move, Evaluation), CalculationWasDue> {
    let depth = abort.full_search_depth;
    assert!(
        depth as usize <= MAX_SEARCH_DEPTH,
        "search depth {depth} exceeds the maximum of {MAX_SEARCH_DEPTH}"
    );
    pv.clear();
    let sign: i8 = if position.white_to_move() { 1 } else { -1 };
    if depth == 0 {
        return Ok((Move::NULL, evaluator.evaluate(position)));
    }

    let last = generator.generate_moves(position, move_stack, 0);
    ordering::sort_by_material_difference(&mut move_stack[..last]);

    let mut alpha = Evaluation::MIN;
    let beta = Evaluation::MAX;
    let mut best: Option<(Move, Evaluation)> = None;
    let mut any_legal_move = false;

    for index in 0..last {
        let m = move_stack[index];
        position.make_move(m);
        if position.defenders_king_is_in_check() {
            position.unmake_move(m);
            continue;
        }
        any_legal_move = true;
        let result = negamax(
            position,
            generator,
            evaluator,
            move_stack,
            last,
            pv,
            abort,
            depth - 1,
            1,
            -sign,
            -beta,
            -alpha,
        );
        position.unmake_move(m);
        let score = match result {
            Ok(value) => -value,
            Err(CalculationWasDue) => {
                // a timed-out search still answers if at least one root move completed
                return best
                    .map(|(best_move, evaluation)| (best_move, apply_sign(evaluation, sign)))
                    .ok_or(CalculationWasDue);
            }
        };
        // the root window is fully open, so no cutoff can occur here
        if score > alpha {
            alpha = score;
            pv.record(0, m);
            best = Some((m, score));
        }
    }

    if !any_legal_move {
        pv.truncate_at(0);
        let evaluation = if position.attackers_king_is_in_check() {
            Evaluation::checkmated(0)
        } else {
            Evaluation::DRAW
        };
        return Ok((Move::NULL, apply_sign(evaluation, sign)));
    }

    let (best_move, evaluation) =
        best.expect("any completed legal root move raises alpha above the minimum");
    Ok((best_move, apply_sign(evaluation, sign)))
}

#[allow(clippy::too_many_arguments)]
/// One node of the negamax recursion.
///
/// `first` is the end of the parent's moves on the shared stack, and the window
/// `(alpha, beta)` as well as the returned score are from the point of view of the side to move
/// at this node. Fail-hard: the return value is clamped into the window.
fn negamax<G: GenerateMoves, E: Evaluate>(
    position: &mut Position,
    generator: &G,
    evaluator: &E,
    move_stack: &mut MoveStack,
    first: usize,
    pv: &mut PrincipalVariation,
    abort: &AbortCondition,
    remaining: u8,
    ply: usize,
    sign: i8,
    mut alpha: Evaluation,
    beta: Evaluation,
) -> Result<Evaluation, CalculationWasDue> {
    if abort.expired() {
        return Err(CalculationWasDue);
    }
    if remaining == 0 {
        pv.truncate_at(ply);
        return Ok(apply_sign(evaluator.evaluate(position), sign));
    }

    let last = generator.generate_moves(position, move_stack, first);
    ordering::sort_by_material_difference(&mut move_stack[first..last]);

    let mut any_legal_move = false;
    for index in first..last {
        let m = move_stack[index];
        position.make_move(m);
        if position.defenders_king_is_in_check() {
            position.unmake_move(m);
            continue;
        }
        any_legal_move = true;
        let result = negamax(
            position,
            generator,
            evaluator,
            move_stack,
            last,
            pv,
            abort,
            remaining - 1,
            ply + 1,
            -sign,
            -beta,
            -alpha,
        );
        position.unmake_move(m);
        let score = -(result?);
        if score >= beta {
            return Ok(beta);
        }
        if score > alpha {
            alpha = score;
            pv.record(ply, m);
        }
    }

    if !any_legal_move {
        pv.truncate_at(ply);
        if position.attackers_king_is_in_check() {
            return Ok(Evaluation::checkmated(ply));
        }
        return Ok(Evaluation::DRAW);
    }

    Ok(alpha)
}
