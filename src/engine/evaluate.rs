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

//! Position evaluation.
//!
//! An [`Evaluation`] is one of three things: a decided game, a forced mate in some number of
//! moves, or a continuous material advantage. The ordering across the variants is total but not
//! numeric, so it is written out by hand rather than derived.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    ops::Neg,
};

use crate::base::{
    position::{SLOT_BLACK, SLOT_WHITE},
    Piece, Position, Side,
};

/// The conventional material values of the piece kinds, indexed by kind.
/// The king's value is large enough to dominate any combination of the others.
pub const PIECE_VALUES: [i32; Piece::NUM] = [0, 1, 3, 3, 5, 9, 100];

#[derive(Clone, Copy, Debug)]
/// The evaluation of a position, from White's point of view: the higher, the better for White.
///
/// # Examples
///
/// ```
/// use woodpusher::engine::Evaluation;
/// use woodpusher::base::Side;
///
/// assert!(Evaluation::Decided(Side::White) > Evaluation::MateIn(3));
/// assert!(Evaluation::MateIn(3) > Evaluation::Advantage(9.0));
/// assert!(Evaluation::Advantage(0.5) > Evaluation::Advantage(-0.5));
/// assert!(Evaluation::Advantage(-9.0) > Evaluation::MateIn(-3));
/// assert!(Evaluation::MateIn(-3) > Evaluation::Decided(Side::Black));
/// ```
pub enum Evaluation {
    /// The game is over; the carried side has won.
    Decided(Side),
    /// The game is decided: with perfect play the winner forces mate in the carried number of
    /// its own moves. Positive numbers are wins for White, negative for Black. A shorter mate is
    /// better for the winner, so `MateIn(2)` compares above `MateIn(5)` and `MateIn(-2)` below
    /// `MateIn(-5)`.
    MateIn(i8),
    /// The game is undecided; the carried value is the current advantage in pawns.
    Advantage(f32),
}

impl Evaluation {
    /// The lowest possible evaluation: Black has won.
    pub const MIN: Evaluation = Evaluation::Decided(Side::Black);

    /// The highest possible evaluation: White has won.
    pub const MAX: Evaluation = Evaluation::Decided(Side::White);

    /// The evaluation of a drawn or balanced position.
    pub const DRAW: Evaluation = Evaluation::Advantage(0.0);

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    /// The evaluation, from the mated player's point of view, of a node at which the side to
    /// move has been checkmated `ply` plies below the search root.
    ///
    /// Deeper mates map to a larger mate-in distance, so the comparator makes the search prefer
    /// the shortest forced mate it has found.
    pub const fn checkmated(ply: usize) -> Evaluation {
        Evaluation::MateIn(-((ply / 2 + 1) as i8))
    }

    /// Map a mate distance to a comparison key: shorter mates are more extreme.
    const fn mate_key(moves: i8) -> i32 {
        if moves >= 0 {
            1_000 - moves as i32
        } else {
            -1_000 - moves as i32
        }
    }

    #[must_use]
    /// Whether this evaluation is a forced mate or a decided game.
    pub const fn is_decisive(&self) -> bool {
        !matches!(self, Evaluation::Advantage(_))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Evaluation) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Evaluation {}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Evaluation) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Evaluation) -> Ordering {
        use Evaluation::{Advantage, Decided, MateIn};
        match (self, other) {
            (Decided(a), Decided(b)) => match (a, b) {
                (Side::White, Side::Black) => Ordering::Greater,
                (Side::Black, Side::White) => Ordering::Less,
                _ => Ordering::Equal,
            },
            (MateIn(a), MateIn(b)) => Evaluation::mate_key(*a).cmp(&Evaluation::mate_key(*b)),
            (Advantage(a), Advantage(b)) => a.total_cmp(b),
            (Decided(Side::White), _) | (_, Decided(Side::Black)) => Ordering::Greater,
            (Decided(Side::Black), _) | (_, Decided(Side::White)) => Ordering::Less,
            (MateIn(a), Advantage(_)) => {
                if *a > 0 {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (Advantage(_), MateIn(b)) => {
                if *b > 0 {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
        }
    }
}

impl Neg for Evaluation {
    type Output = Evaluation;

    /// Negation mirrors an evaluation between the two players' points of view, which is what the
    /// negamax recursion needs when it changes frames.
    fn neg(self) -> Evaluation {
        match self {
            Evaluation::Decided(side) => Evaluation::Decided(!side),
            Evaluation::MateIn(moves) => Evaluation::MateIn(-moves),
            Evaluation::Advantage(pawns) => Evaluation::Advantage(-pawns),
        }
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Evaluation::Decided(Side::White) => write!(f, "white wins"),
            Evaluation::Decided(Side::Black) => write!(f, "black wins"),
            Evaluation::MateIn(moves) => write!(f, "mate {moves}"),
            Evaluation::Advantage(pawns) => write!(f, "{pawns:+}"),
        }
    }
}

/// A pure function assigning a scalar evaluation to a position.
/// The search is generic over this trait so tests can substitute a double.
pub trait Evaluate {
    /// Evaluate the position from White's point of view.
    fn evaluate(&self, position: &Position) -> Evaluation;
}

#[derive(Clone, Copy, Debug, Default)]
/// The minimal evaluator: the material sum of the board, white positive.
pub struct EvaluateMaterial;

impl Evaluate for EvaluateMaterial {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, position: &Position) -> Evaluation {
        let mut material = 0i32;
        for kind in Piece::ALL {
            let value = PIECE_VALUES[kind.index()];
            material += value * i32::from(position[SLOT_WHITE + kind.index()].len());
            material -= value * i32::from(position[SLOT_BLACK + kind.index()].len());
        }
        Evaluation::Advantage(material as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// The required total order across the three variants.
    fn ordering_across_variants() {
        let descending = [
            Evaluation::Decided(Side::White),
            Evaluation::MateIn(1),
            Evaluation::MateIn(4),
            Evaluation::Advantage(3.5),
            Evaluation::Advantage(0.0),
            Evaluation::Advantage(-2.0),
            Evaluation::MateIn(-6),
            Evaluation::MateIn(-2),
            Evaluation::Decided(Side::Black),
        ];
        for (i, a) in descending.iter().enumerate() {
            for b in &descending[i + 1..] {
                assert!(a > b, "{a} should be greater than {b}");
            }
        }
    }

    #[test]
    /// A shorter forced mate is preferred by the winner.
    fn shorter_mates_are_more_extreme() {
        assert!(Evaluation::MateIn(2) > Evaluation::MateIn(3));
        assert!(Evaluation::MateIn(-2) < Evaluation::MateIn(-3));
    }

    #[test]
    fn negation_is_an_involution() {
        let samples = [
            Evaluation::Decided(Side::White),
            Evaluation::MateIn(3),
            Evaluation::Advantage(1.25),
            Evaluation::MateIn(-1),
            Evaluation::Decided(Side::Black),
        ];
        for eval in samples {
            assert_eq!(-(-eval), eval);
        }
        assert_eq!(-Evaluation::MateIn(3), Evaluation::MateIn(-3));
        assert_eq!(
            -Evaluation::Decided(Side::White),
            Evaluation::Decided(Side::Black)
        );
    }

    #[test]
    fn checkmated_maps_plies_to_moves() {
        assert_eq!(Evaluation::checkmated(0), Evaluation::MateIn(-1));
        assert_eq!(Evaluation::checkmated(1), Evaluation::MateIn(-1));
        assert_eq!(Evaluation::checkmated(3), Evaluation::MateIn(-2));
        assert_eq!(Evaluation::checkmated(5), Evaluation::MateIn(-3));
    }

    #[test]
    fn material_sum_of_the_start_position_is_zero() {
        let position =
            Position::from_fen(crate::base::fen::STARTING_POSITION_FEN).unwrap();
        assert_eq!(
            EvaluateMaterial.evaluate(&position),
            Evaluation::Advantage(0.0)
        );
    }

    #[test]
    fn material_counts_a_missing_knight() {
        let position =
            Position::from_fen("r1bqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        assert_eq!(
            EvaluateMaterial.evaluate(&position),
            Evaluation::Advantage(3.0)
        );
    }
}
