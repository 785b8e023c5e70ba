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

//! The bitboard position representation and its make/unmake machinery.
//!
//! A position is sixteen 64-bit words. Slot 0 holds packed auxiliary state ("extras"), slots 1
//! and 9 hold the aggregate boards of Black and White, and adding a piece kind to an aggregate
//! slot yields the per-kind board of that side.

use std::{
    fmt::{Display, Formatter},
    mem::swap,
    ops::Index,
};

use super::{
    direction::{single_step, Direction},
    lookup::{BISHOP_RAY_ATTACKS, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACK_ORIGINS, ROOK_RAY_ATTACKS},
    Bitboard, Move, MoveKind, Piece, Side, Square,
};

/// The slot of the extras word in the board array.
pub const SLOT_EXTRAS: usize = 0;

/// The slot of Black's aggregate board. Add a piece kind to get a per-kind board.
pub const SLOT_BLACK: usize = 1;

/// The slot of White's aggregate board. Add a piece kind to get a per-kind board.
pub const SLOT_WHITE: usize = 9;

const fn square_mask(sq: Square) -> u64 {
    1 << sq as u8
}

/// The castling-rights bits of the extras word.
///
/// Each right lives on the home square of the piece it involves, so ANDing the extras with the
/// complement of a move's source and target squares revokes exactly the rights that the move
/// kills: a rook leaving (or being captured on) its corner clears that corner's bit, and a king
/// leaving E1/E8 clears the bit both of its rights require.
pub const MASK_CASTLING_RIGHTS: u64 = square_mask(Square::H1)
    | square_mask(Square::E1)
    | square_mask(Square::A1)
    | square_mask(Square::H8)
    | square_mask(Square::E8)
    | square_mask(Square::A8);

/// White's kingside castling right: both the king and the H1 rook are still at home.
pub const CASTLING_WHITE_KINGSIDE: u64 = square_mask(Square::H1) | square_mask(Square::E1);

/// White's queenside castling right.
pub const CASTLING_WHITE_QUEENSIDE: u64 = square_mask(Square::A1) | square_mask(Square::E1);

/// Black's kingside castling right.
pub const CASTLING_BLACK_KINGSIDE: u64 = square_mask(Square::H8) | square_mask(Square::E8);

/// Black's queenside castling right.
pub const CASTLING_BLACK_QUEENSIDE: u64 = square_mask(Square::A8) | square_mask(Square::E8);

/// The halfmove clock since the last pawn move or capture, saturating at 63.
pub const MASK_STATIC_PLIES: u64 = 0x3F00;

/// The value of one tick of the halfmove clock.
pub const INCREMENT_STATIC_PLIES: u64 = 0x0100;

/// The bit offset of the halfmove clock.
pub const SHIFT_STATIC_PLIES: u32 = 8;

/// Flag: queenside castling occurred on the last move, regardless of side.
pub const MASK_QUEENSIDE_CASTLING_ON_LAST_MOVE: u64 = 1 << 14;

/// Flag: kingside castling occurred on the last move, regardless of side.
pub const MASK_KINGSIDE_CASTLING_ON_LAST_MOVE: u64 = 1 << 15;

/// The en-passant target square index; 0 when there is no target.
pub const MASK_EN_PASSANT: u64 = 0x00FF_0000;

/// The bit offset of the en-passant square index.
pub const SHIFT_EN_PASSANT: u32 = 16;

/// The count of plies played since the start of the game, kept for FEN emission only.
pub const MASK_TOTAL_PLIES: u64 = 0x00FF_FF00_0000;

/// The bit offset of the total-plies count.
pub const SHIFT_TOTAL_PLIES: u32 = 24;

/// The value of one ply in the total-plies field.
pub const INCREMENT_TOTAL_PLIES: u64 = 1 << 24;

/// Tick the halfmove clock without overflowing it into the neighboring fields.
const fn increment_static_plies(extras: u64) -> u64 {
    if extras & MASK_STATIC_PLIES == MASK_STATIC_PLIES {
        extras
    } else {
        extras + INCREMENT_STATIC_PLIES
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A chess position: sixteen bitboards, the side to move, and the history of extras words needed
/// to unmake moves in LIFO order.
pub struct Position {
    /// The board array. See the module documentation for the slot layout.
    boards: [Bitboard; 16],
    /// Whether it is White's turn to move.
    white_to_move: bool,
    /// The aggregate slot of the side to move. Recomputed on every move.
    attacking_side: usize,
    /// The aggregate slot of the side which just moved. Recomputed on every move.
    defending_side: usize,
    /// The extras words pushed by `make_move`, popped by `unmake_move`.
    extras_history: Vec<Bitboard>,
}

impl Position {
    #[must_use]
    /// Construct a position with no pieces, no rights, and White to move.
    pub fn empty() -> Position {
        Position {
            boards: [Bitboard::EMPTY; 16],
            white_to_move: true,
            attacking_side: SLOT_WHITE,
            defending_side: SLOT_BLACK,
            extras_history: Vec::with_capacity(64),
        }
    }

    #[must_use]
    /// Construct a position directly from a board array.
    /// The attacking and defending slots are derived from `white_to_move`.
    pub fn from_boards(boards: [Bitboard; 16], white_to_move: bool) -> Position {
        let (attacking_side, defending_side) = if white_to_move {
            (SLOT_WHITE, SLOT_BLACK)
        } else {
            (SLOT_BLACK, SLOT_WHITE)
        };
        Position {
            boards,
            white_to_move,
            attacking_side,
            defending_side,
            extras_history: Vec::with_capacity(64),
        }
    }

    #[inline(always)]
    #[must_use]
    /// Whether it is White's turn to move.
    pub const fn white_to_move(&self) -> bool {
        self.white_to_move
    }

    #[inline(always)]
    #[must_use]
    /// The aggregate-board slot of the side to move.
    pub const fn attacking_side(&self) -> usize {
        self.attacking_side
    }

    #[inline(always)]
    #[must_use]
    /// The aggregate-board slot of the side which just moved.
    pub const fn defending_side(&self) -> usize {
        self.defending_side
    }

    #[must_use]
    /// The set of all occupied squares.
    pub fn occupancy(&self) -> Bitboard {
        self.boards[SLOT_BLACK] | self.boards[SLOT_WHITE]
    }

    #[must_use]
    /// The bit index of the en-passant target square, or 0 if there is none.
    /// The target is always the empty square the capturing pawn would move to.
    pub fn en_passant_index(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        {
            ((self.boards[SLOT_EXTRAS].as_u64() & MASK_EN_PASSANT) >> SHIFT_EN_PASSANT) as u32
        }
    }

    #[must_use]
    /// The number of plies since the last pawn move or capture, saturating at 63.
    pub fn halfmove_clock(&self) -> u64 {
        (self.boards[SLOT_EXTRAS].as_u64() & MASK_STATIC_PLIES) >> SHIFT_STATIC_PLIES
    }

    #[must_use]
    /// The number of plies played since the start of the game.
    pub fn total_plies(&self) -> u64 {
        (self.boards[SLOT_EXTRAS].as_u64() & MASK_TOTAL_PLIES) >> SHIFT_TOTAL_PLIES
    }

    #[must_use]
    /// Whether the given castling right (one of the four `CASTLING_*` constants) is intact.
    pub fn has_castling_right(&self, right: u64) -> bool {
        self.boards[SLOT_EXTRAS].as_u64() & right == right
    }

    #[must_use]
    /// Find which piece kind of the given side occupies the square, or the empty kind.
    /// At most one per-kind board of a side may contain the square.
    pub fn piece_kind_on(&self, side_slot: usize, square: Bitboard) -> Piece {
        for kind in Piece::ALL {
            if self.boards[side_slot + kind.index()].intersects(square) {
                return kind;
            }
        }
        Piece::None
    }

    /// Mutate this position to reflect playing `m`.
    /// The move must be a pseudo-legal move for the side to move; legality of the resulting
    /// position is checked separately with [`Position::defenders_king_is_in_check`].
    pub fn make_move(&mut self, m: Move) {
        self.extras_history.push(self.boards[SLOT_EXTRAS]);

        let source = Bitboard::from_index(m.source());
        let target = Bitboard::from_index(m.target());
        let from_to = source | target;
        let attacker = self.attacking_side;
        let defender = self.defending_side;

        let mut extras = self.boards[SLOT_EXTRAS].as_u64();
        // transient state from the previous move; this move's own effects re-set it below
        extras &= !(MASK_EN_PASSANT
            | MASK_KINGSIDE_CASTLING_ON_LAST_MOVE
            | MASK_QUEENSIDE_CASTLING_ON_LAST_MOVE);
        extras += INCREMENT_TOTAL_PLIES;

        match m.kind() {
            MoveKind::QuietNonPawn => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + m.moved_piece().index()] ^= from_to;
                extras = increment_static_plies(extras);
            }
            MoveKind::Capture => {
                self.boards[defender] ^= target;
                self.boards[defender + m.captured_piece().index()] ^= target;
                self.boards[attacker] ^= from_to;
                self.boards[attacker + m.moved_piece().index()] ^= from_to;
                extras &= !MASK_STATIC_PLIES;
            }
            MoveKind::PawnSinglePush => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::Pawn.index()] ^= from_to;
                extras &= !MASK_STATIC_PLIES;
            }
            MoveKind::PawnDoublePush => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::Pawn.index()] ^= from_to;
                extras &= !MASK_STATIC_PLIES;
                // the passed-over square is halfway between source and target
                extras |= u64::from((m.source() + m.target()) / 2) << SHIFT_EN_PASSANT;
            }
            MoveKind::EnPassantCapture => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::Pawn.index()] ^= from_to;
                let harmed = if self.white_to_move {
                    target >> 8
                } else {
                    target << 8
                };
                self.boards[defender] ^= harmed;
                self.boards[defender + Piece::Pawn.index()] ^= harmed;
                extras &= !MASK_STATIC_PLIES;
            }
            MoveKind::KingsideCastling => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::King.index()] ^= from_to;
                let rook_from_to = if self.white_to_move {
                    Square::H1.bitboard() | Square::F1.bitboard()
                } else {
                    Square::H8.bitboard() | Square::F8.bitboard()
                };
                self.boards[attacker] ^= rook_from_to;
                self.boards[attacker + Piece::Rook.index()] ^= rook_from_to;
                extras = increment_static_plies(extras);
                extras |= MASK_KINGSIDE_CASTLING_ON_LAST_MOVE;
            }
            MoveKind::QueensideCastling => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::King.index()] ^= from_to;
                let rook_from_to = if self.white_to_move {
                    Square::A1.bitboard() | Square::D1.bitboard()
                } else {
                    Square::A8.bitboard() | Square::D8.bitboard()
                };
                self.boards[attacker] ^= rook_from_to;
                self.boards[attacker + Piece::Rook.index()] ^= rook_from_to;
                extras = increment_static_plies(extras);
                extras |= MASK_QUEENSIDE_CASTLING_ON_LAST_MOVE;
            }
            MoveKind::Promotion => {
                if m.captured_piece() != Piece::None {
                    self.boards[defender] ^= target;
                    self.boards[defender + m.captured_piece().index()] ^= target;
                }
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::Pawn.index()] ^= source;
                self.boards[attacker + m.promotion().index()] ^= target;
                extras &= !MASK_STATIC_PLIES;
            }
        }

        self.white_to_move = !self.white_to_move;
        swap(&mut self.attacking_side, &mut self.defending_side);

        // auto-revoke castling rights for any king or rook that left its home square or was
        // captured there; the single AND handles all four rights for all moves
        extras &= !(from_to.as_u64() & MASK_CASTLING_RIGHTS);
        self.boards[SLOT_EXTRAS] = Bitboard::new(extras);
    }

    /// Exactly reverse a previous [`Position::make_move`] of `m`.
    /// Moves must be unmade in LIFO order.
    ///
    /// # Panics
    ///
    /// This function will panic if there is no matching `make_move` to reverse.
    pub fn unmake_move(&mut self, m: Move) {
        // restore the mover's point of view before reversing the edits
        self.white_to_move = !self.white_to_move;
        swap(&mut self.attacking_side, &mut self.defending_side);

        let source = Bitboard::from_index(m.source());
        let target = Bitboard::from_index(m.target());
        let from_to = source | target;
        let attacker = self.attacking_side;
        let defender = self.defending_side;

        match m.kind() {
            MoveKind::QuietNonPawn | MoveKind::PawnSinglePush | MoveKind::PawnDoublePush => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + m.moved_piece().index()] ^= from_to;
            }
            MoveKind::Capture => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + m.moved_piece().index()] ^= from_to;
                self.boards[defender] ^= target;
                self.boards[defender + m.captured_piece().index()] ^= target;
            }
            MoveKind::EnPassantCapture => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::Pawn.index()] ^= from_to;
                let harmed = if self.white_to_move {
                    target >> 8
                } else {
                    target << 8
                };
                self.boards[defender] ^= harmed;
                self.boards[defender + Piece::Pawn.index()] ^= harmed;
            }
            MoveKind::KingsideCastling => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::King.index()] ^= from_to;
                let rook_from_to = if self.white_to_move {
                    Square::H1.bitboard() | Square::F1.bitboard()
                } else {
                    Square::H8.bitboard() | Square::F8.bitboard()
                };
                self.boards[attacker] ^= rook_from_to;
                self.boards[attacker + Piece::Rook.index()] ^= rook_from_to;
            }
            MoveKind::QueensideCastling => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::King.index()] ^= from_to;
                let rook_from_to = if self.white_to_move {
                    Square::A1.bitboard() | Square::D1.bitboard()
                } else {
                    Square::A8.bitboard() | Square::D8.bitboard()
                };
                self.boards[attacker] ^= rook_from_to;
                self.boards[attacker + Piece::Rook.index()] ^= rook_from_to;
            }
            MoveKind::Promotion => {
                self.boards[attacker] ^= from_to;
                self.boards[attacker + Piece::Pawn.index()] ^= source;
                self.boards[attacker + m.promotion().index()] ^= target;
                if m.captured_piece() != Piece::None {
                    self.boards[defender] ^= target;
                    self.boards[defender + m.captured_piece().index()] ^= target;
                }
            }
        }

        self.boards[SLOT_EXTRAS] = self
            .extras_history
            .pop()
            .expect("unmake_move without a matching make_move");
    }

    #[must_use]
    /// Determine whether the king of the side which just moved is attacked, i.e. whether the move
    /// just made was illegal.
    ///
    /// If the last move was a castling move, the squares the king left and passed through are
    /// scanned as well, rejecting castling out of or through check.
    pub fn defenders_king_is_in_check(&self) -> bool {
        let attacker = self.attacking_side;
        let defender = self.defending_side;
        let king_board = self.boards[defender + Piece::King.index()];
        if king_board.is_empty() {
            // positions without kings only appear in test setups
            return false;
        }
        if self.square_is_attacked_by(king_board.trailing_zeros(), attacker) {
            return true;
        }

        let extras = self.boards[SLOT_EXTRAS].as_u64();
        let castling_flags =
            extras & (MASK_KINGSIDE_CASTLING_ON_LAST_MOVE | MASK_QUEENSIDE_CASTLING_ON_LAST_MOVE);
        if castling_flags != 0 {
            let defender_is_white = defender == SLOT_WHITE;
            let (passed, origin) = if extras & MASK_KINGSIDE_CASTLING_ON_LAST_MOVE != 0 {
                if defender_is_white {
                    (Square::F1, Square::E1)
                } else {
                    (Square::F8, Square::E8)
                }
            } else if defender_is_white {
                (Square::D1, Square::E1)
            } else {
                (Square::D8, Square::E8)
            };
            if self.square_is_attacked_by(passed as u32, attacker)
                || self.square_is_attacked_by(origin as u32, attacker)
            {
                return true;
            }
        }

        false
    }

    #[must_use]
    /// Determine whether the king of the side to move is attacked.
    /// Used to distinguish checkmate from stalemate at nodes without legal moves.
    pub fn attackers_king_is_in_check(&self) -> bool {
        let king_board = self.boards[self.attacking_side + Piece::King.index()];
        if king_board.is_empty() {
            return false;
        }
        self.square_is_attacked_by(king_board.trailing_zeros(), self.defending_side)
    }

    #[must_use]
    /// Determine whether any piece of the side with aggregate slot `attacker_slot` attacks the
    /// square with bit index `square`.
    ///
    /// Slider attacks step outward from the square and stop at the first occupied square in each
    /// direction; the empty-board ray tables are used to skip directionless scans early.
    pub fn square_is_attacked_by(&self, square: u32, attacker_slot: usize) -> bool {
        let index = square as usize;
        let attacker_side_index = if attacker_slot == SLOT_WHITE {
            Side::White.index()
        } else {
            Side::Black.index()
        };

        if PAWN_ATTACK_ORIGINS[attacker_side_index][index]
            .intersects(self.boards[attacker_slot + Piece::Pawn.index()])
        {
            return true;
        }
        if KNIGHT_ATTACKS[index].intersects(self.boards[attacker_slot + Piece::Knight.index()]) {
            return true;
        }
        if KING_ATTACKS[index].intersects(self.boards[attacker_slot + Piece::King.index()]) {
            return true;
        }

        let occupancy = self.occupancy();
        let source = Bitboard::from_index(square);

        let diagonal_attackers = self.boards[attacker_slot + Piece::Bishop.index()]
            | self.boards[attacker_slot + Piece::Queen.index()];
        if BISHOP_RAY_ATTACKS[index].intersects(diagonal_attackers) {
            for direction in Direction::BISHOP {
                let mut step = single_step(source, direction);
                while !step.is_empty() {
                    if step.intersects(occupancy) {
                        if step.intersects(diagonal_attackers) {
                            return true;
                        }
                        break;
                    }
                    step = single_step(step, direction);
                }
            }
        }

        let orthogonal_attackers = self.boards[attacker_slot + Piece::Rook.index()]
            | self.boards[attacker_slot + Piece::Queen.index()];
        if ROOK_RAY_ATTACKS[index].intersects(orthogonal_attackers) {
            for direction in Direction::ROOK {
                let mut step = single_step(source, direction);
                while !step.is_empty() {
                    if step.intersects(occupancy) {
                        if step.intersects(orthogonal_attackers) {
                            return true;
                        }
                        break;
                    }
                    step = single_step(step, direction);
                }
            }
        }

        false
    }
}

impl Index<usize> for Position {
    type Output = Bitboard;

    fn index(&self, index: usize) -> &Bitboard {
        &self.boards[index]
    }
}

impl Display for Position {
    /// Display the board as an 8x8 grid with rank 8 at the top, white pieces uppercase and black
    /// pieces lowercase.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8u32).rev() {
            for file in 0..8u32 {
                let square = Bitboard::from_index(8 * rank + (7 - file));
                let white = self.piece_kind_on(SLOT_WHITE, square);
                let black = self.piece_kind_on(SLOT_BLACK, square);
                match (white.code(), black.code()) {
                    (Some(c), _) => write!(f, "{c} ")?,
                    (None, Some(c)) => write!(f, "{} ", c.to_ascii_lowercase())?,
                    (None, None) => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "{} to move",
            if self.white_to_move { "White" } else { "Black" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal position with the given boards set; all other slots stay empty.
    fn position_with(settings: &[(usize, Bitboard)], extras: u64, white_to_move: bool) -> Position {
        let mut boards = [Bitboard::EMPTY; 16];
        boards[SLOT_EXTRAS] = Bitboard::new(extras);
        for &(slot, board) in settings {
            boards[slot] = board;
        }
        Position::from_boards(boards, white_to_move)
    }

    fn compose(
        source: Square,
        target: Square,
        moved: Piece,
        captured: Piece,
        promotion: Piece,
        kind: MoveKind,
    ) -> Move {
        Move::compose(
            source as u32,
            target as u32,
            moved,
            captured,
            promotion,
            kind,
        )
    }

    #[test]
    /// Any move must switch the side to move, append to the extras history, and clear the
    /// en-passant target.
    fn make_switches_side_and_clears_transients() {
        let knight = Square::C3.bitboard();
        let extras = 42 << SHIFT_EN_PASSANT;
        let mut position = position_with(
            &[
                (SLOT_WHITE, knight),
                (SLOT_WHITE + Piece::Knight.index(), knight),
            ],
            extras,
            true,
        );

        position.make_move(compose(
            Square::C3,
            Square::E4,
            Piece::Knight,
            Piece::None,
            Piece::None,
            MoveKind::QuietNonPawn,
        ));

        assert!(!position.white_to_move());
        assert_eq!(position.attacking_side(), SLOT_BLACK);
        assert_eq!(position.en_passant_index(), 0);
        assert_eq!(position[SLOT_WHITE], Square::E4.bitboard());
        assert_eq!(position.total_plies(), 1);
    }

    #[test]
    fn quiet_move_increments_halfmove_clock() {
        let knight = Square::G1.bitboard();
        let mut position = position_with(
            &[
                (SLOT_WHITE, knight),
                (SLOT_WHITE + Piece::Knight.index(), knight),
            ],
            7 << SHIFT_STATIC_PLIES,
            true,
        );

        position.make_move(compose(
            Square::G1,
            Square::F3,
            Piece::Knight,
            Piece::None,
            Piece::None,
            MoveKind::QuietNonPawn,
        ));

        assert_eq!(
            position[SLOT_WHITE + Piece::Knight.index()],
            Square::F3.bitboard()
        );
        assert_eq!(position.halfmove_clock(), 8);
    }

    #[test]
    fn halfmove_clock_saturates() {
        let rook = Square::A1.bitboard();
        let mut position = position_with(
            &[(SLOT_WHITE, rook), (SLOT_WHITE + Piece::Rook.index(), rook)],
            63 << SHIFT_STATIC_PLIES,
            true,
        );

        position.make_move(compose(
            Square::A1,
            Square::A4,
            Piece::Rook,
            Piece::None,
            Piece::None,
            MoveKind::QuietNonPawn,
        ));

        assert_eq!(position.halfmove_clock(), 63);
    }

    #[test]
    fn capture_removes_harmed_piece_and_resets_clock() {
        let queen = Square::D1.bitboard();
        let pawn = Square::D5.bitboard();
        let mut position = position_with(
            &[
                (SLOT_WHITE, queen),
                (SLOT_WHITE + Piece::Queen.index(), queen),
                (SLOT_BLACK, pawn),
                (SLOT_BLACK + Piece::Pawn.index(), pawn),
            ],
            9 << SHIFT_STATIC_PLIES,
            true,
        );

        position.make_move(compose(
            Square::D1,
            Square::D5,
            Piece::Queen,
            Piece::Pawn,
            Piece::None,
            MoveKind::Capture,
        ));

        assert_eq!(
            position[SLOT_WHITE + Piece::Queen.index()],
            Square::D5.bitboard()
        );
        assert_eq!(position[SLOT_BLACK], Bitboard::EMPTY);
        assert_eq!(position[SLOT_BLACK + Piece::Pawn.index()], Bitboard::EMPTY);
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let pawn = Square::F2.bitboard();
        let mut position = position_with(
            &[(SLOT_WHITE, pawn), (SLOT_WHITE + Piece::Pawn.index(), pawn)],
            10 << SHIFT_STATIC_PLIES,
            true,
        );

        position.make_move(compose(
            Square::F2,
            Square::F4,
            Piece::Pawn,
            Piece::None,
            Piece::None,
            MoveKind::PawnDoublePush,
        ));

        assert_eq!(
            position[SLOT_WHITE + Piece::Pawn.index()],
            Square::F4.bitboard()
        );
        assert_eq!(position.en_passant_index(), Square::F3 as u32);
        assert_eq!(position.halfmove_clock(), 0);
    }

    #[test]
    fn en_passant_capture_removes_pawn_behind_target() {
        let white_pawn = Square::E5.bitboard();
        let black_pawn = Square::D5.bitboard();
        let extras = (Square::D6 as u64) << SHIFT_EN_PASSANT;
        let mut position = position_with(
            &[
                (SLOT_WHITE, white_pawn),
                (SLOT_WHITE + Piece::Pawn.index(), white_pawn),
                (SLOT_BLACK, black_pawn),
                (SLOT_BLACK + Piece::Pawn.index(), black_pawn),
            ],
            extras,
            true,
        );

        position.make_move(compose(
            Square::E5,
            Square::D6,
            Piece::Pawn,
            Piece::Pawn,
            Piece::None,
            MoveKind::EnPassantCapture,
        ));

        assert_eq!(
            position[SLOT_WHITE + Piece::Pawn.index()],
            Square::D6.bitboard()
        );
        assert_eq!(position[SLOT_BLACK], Bitboard::EMPTY);
        assert_eq!(position[SLOT_BLACK + Piece::Pawn.index()], Bitboard::EMPTY);
    }

    #[test]
    fn kingside_castling_moves_king_and_rook_and_revokes_rights() {
        let king = Square::E1.bitboard();
        let rook = Square::H1.bitboard();
        let extras = CASTLING_WHITE_KINGSIDE | CASTLING_WHITE_QUEENSIDE;
        let mut position = position_with(
            &[
                (SLOT_WHITE, king | rook),
                (SLOT_WHITE + Piece::King.index(), king),
                (SLOT_WHITE + Piece::Rook.index(), rook),
            ],
            extras,
            true,
        );

        position.make_move(compose(
            Square::E1,
            Square::G1,
            Piece::King,
            Piece::None,
            Piece::None,
            MoveKind::KingsideCastling,
        ));

        assert_eq!(
            position[SLOT_WHITE + Piece::King.index()],
            Square::G1.bitboard()
        );
        assert_eq!(
            position[SLOT_WHITE + Piece::Rook.index()],
            Square::F1.bitboard()
        );
        assert!(!position.has_castling_right(CASTLING_WHITE_KINGSIDE));
        assert!(!position.has_castling_right(CASTLING_WHITE_QUEENSIDE));
        assert_ne!(
            position[SLOT_EXTRAS].as_u64() & MASK_KINGSIDE_CASTLING_ON_LAST_MOVE,
            0
        );
    }

    #[test]
    fn queenside_castling_moves_king_and_rook() {
        let king = Square::E8.bitboard();
        let rook = Square::A8.bitboard();
        let mut position = position_with(
            &[
                (SLOT_BLACK, king | rook),
                (SLOT_BLACK + Piece::King.index(), king),
                (SLOT_BLACK + Piece::Rook.index(), rook),
            ],
            CASTLING_BLACK_QUEENSIDE,
            false,
        );

        position.make_move(compose(
            Square::E8,
            Square::C8,
            Piece::King,
            Piece::None,
            Piece::None,
            MoveKind::QueensideCastling,
        ));

        assert_eq!(
            position[SLOT_BLACK + Piece::King.index()],
            Square::C8.bitboard()
        );
        assert_eq!(
            position[SLOT_BLACK + Piece::Rook.index()],
            Square::D8.bitboard()
        );
        assert!(!position.has_castling_right(CASTLING_BLACK_QUEENSIDE));
    }

    #[test]
    /// A rook captured on its home corner loses its side the corresponding right through the
    /// single extras AND.
    fn capturing_a_rook_at_home_revokes_rights() {
        let white_rook = Square::H4.bitboard();
        let black_rook = Square::H8.bitboard();
        let extras = CASTLING_BLACK_KINGSIDE | CASTLING_BLACK_QUEENSIDE;
        let mut position = position_with(
            &[
                (SLOT_WHITE, white_rook),
                (SLOT_WHITE + Piece::Rook.index(), white_rook),
                (SLOT_BLACK, black_rook),
                (SLOT_BLACK + Piece::Rook.index(), black_rook),
            ],
            extras,
            true,
        );

        position.make_move(compose(
            Square::H4,
            Square::H8,
            Piece::Rook,
            Piece::Rook,
            Piece::None,
            MoveKind::Capture,
        ));

        assert!(!position.has_castling_right(CASTLING_BLACK_KINGSIDE));
        assert!(position.has_castling_right(CASTLING_BLACK_QUEENSIDE));
    }

    #[test]
    fn promotion_replaces_pawn() {
        let pawn = Square::H2.bitboard();
        let mut position = position_with(
            &[(SLOT_BLACK, pawn), (SLOT_BLACK + Piece::Pawn.index(), pawn)],
            0,
            false,
        );

        position.make_move(compose(
            Square::H2,
            Square::H1,
            Piece::Pawn,
            Piece::None,
            Piece::Queen,
            MoveKind::Promotion,
        ));

        assert_eq!(position[SLOT_BLACK + Piece::Pawn.index()], Bitboard::EMPTY);
        assert_eq!(
            position[SLOT_BLACK + Piece::Queen.index()],
            Square::H1.bitboard()
        );
        assert_eq!(position[SLOT_BLACK], Square::H1.bitboard());
    }

    #[test]
    fn promotion_capture_also_removes_harmed_piece() {
        let pawn = Square::B7.bitboard();
        let bishop = Square::B8.bitboard();
        let mut position = position_with(
            &[
                (SLOT_WHITE, pawn),
                (SLOT_WHITE + Piece::Pawn.index(), pawn),
                (SLOT_BLACK, bishop),
                (SLOT_BLACK + Piece::Bishop.index(), bishop),
            ],
            0,
            true,
        );

        position.make_move(compose(
            Square::B7,
            Square::B8,
            Piece::Pawn,
            Piece::Bishop,
            Piece::Queen,
            MoveKind::Promotion,
        ));

        assert_eq!(position[SLOT_WHITE + Piece::Pawn.index()], Bitboard::EMPTY);
        assert_eq!(
            position[SLOT_WHITE + Piece::Queen.index()],
            Square::B8.bitboard()
        );
        assert_eq!(position[SLOT_BLACK + Piece::Bishop.index()], Bitboard::EMPTY);
        assert_eq!(position[SLOT_BLACK], Bitboard::EMPTY);
    }

    #[test]
    /// Every make must be exactly reversed by its unmake, extras history included.
    fn make_unmake_restores_bit_identity() {
        let moves = [
            compose(
                Square::E2,
                Square::E4,
                Piece::Pawn,
                Piece::None,
                Piece::None,
                MoveKind::PawnDoublePush,
            ),
            compose(
                Square::G1,
                Square::F3,
                Piece::Knight,
                Piece::None,
                Piece::None,
                MoveKind::QuietNonPawn,
            ),
        ];
        let pieces = Square::E2.bitboard() | Square::G1.bitboard();
        let original = position_with(
            &[
                (SLOT_WHITE, pieces),
                (SLOT_WHITE + Piece::Pawn.index(), Square::E2.bitboard()),
                (SLOT_WHITE + Piece::Knight.index(), Square::G1.bitboard()),
            ],
            CASTLING_WHITE_KINGSIDE | (5 << SHIFT_STATIC_PLIES),
            true,
        );

        for m in moves {
            let mut position = original.clone();
            position.make_move(m);
            assert_ne!(position, original);
            position.unmake_move(m);
            assert_eq!(position, original);
        }
    }

    /// Check that per-kind boards are pairwise disjoint, union to their aggregate, and that the
    /// two sides do not overlap.
    fn assert_aggregates_consistent(position: &Position) {
        for side_slot in [SLOT_WHITE, SLOT_BLACK] {
            let mut union = Bitboard::EMPTY;
            for kind in Piece::ALL {
                let board = position[side_slot + kind.index()];
                assert!(
                    !union.intersects(board),
                    "two piece kinds share a square:\n{position}"
                );
                union |= board;
            }
            assert_eq!(
                union, position[side_slot],
                "per-kind boards do not union to the aggregate:\n{position}"
            );
        }
        assert!(
            !position[SLOT_WHITE].intersects(position[SLOT_BLACK]),
            "the sides overlap:\n{position}"
        );
    }

    #[test]
    /// Aggregate consistency holds after every legal move reachable within two plies of the
    /// start.
    fn aggregate_invariants_hold_through_make() {
        use crate::base::movegen::generate_moves;
        use crate::base::MOVE_STACK_CAPACITY;

        let mut position =
            Position::from_fen(crate::base::fen::STARTING_POSITION_FEN).unwrap();
        let mut move_stack = [Move::NULL; MOVE_STACK_CAPACITY];
        let first_last = generate_moves(&position, &mut move_stack, 0);
        for i in 0..first_last {
            let first_move = move_stack[i];
            position.make_move(first_move);
            if !position.defenders_king_is_in_check() {
                assert_aggregates_consistent(&position);
                let second_last = generate_moves(&position, &mut move_stack, first_last);
                for j in first_last..second_last {
                    let second_move = move_stack[j];
                    position.make_move(second_move);
                    assert_aggregates_consistent(&position);
                    position.unmake_move(second_move);
                }
            }
            position.unmake_move(first_move);
        }
        assert_aggregates_consistent(&position);
    }

    #[test]
    /// Random walks through legal games: every make must be exactly undone by its unmake, and
    /// the whole walk must rewind to the starting position.
    fn randomized_make_unmake_walks() {
        use crate::base::movegen::generate_moves;
        use crate::base::MOVE_STACK_CAPACITY;

        let mut rng = fastrand::Rng::with_seed(0x00DE_FACE_D0C5_0DA5);
        for _ in 0..20 {
            let mut position =
                Position::from_fen(crate::base::fen::STARTING_POSITION_FEN).unwrap();
            let original = position.clone();
            let mut move_stack = [Move::NULL; MOVE_STACK_CAPACITY];
            let mut walk = Vec::new();

            for _ in 0..40 {
                let last = generate_moves(&position, &mut move_stack, 0);
                let mut legal = Vec::new();
                for i in 0..last {
                    let m = move_stack[i];
                    position.make_move(m);
                    if !position.defenders_king_is_in_check() {
                        legal.push(m);
                    }
                    position.unmake_move(m);
                }
                if legal.is_empty() {
                    break;
                }

                let m = legal[rng.usize(..legal.len())];
                let before = position.clone();
                position.make_move(m);
                assert_aggregates_consistent(&position);
                let mut check = position.clone();
                check.unmake_move(m);
                assert_eq!(check, before, "unmake did not restore {m:?}");
                walk.push(m);
            }

            for m in walk.into_iter().rev() {
                position.unmake_move(m);
            }
            assert_eq!(position, original);
        }
    }

    #[test]
    fn oracle_sees_knight_check() {
        let king = Square::E1.bitboard();
        let knight = Square::F3.bitboard();
        // black just moved a knight to F3; white's king is the attacker's target
        let position = position_with(
            &[
                (SLOT_WHITE, king),
                (SLOT_WHITE + Piece::King.index(), king),
                (SLOT_BLACK, knight),
                (SLOT_BLACK + Piece::Knight.index(), knight),
            ],
            0,
            false,
        );
        assert!(position.defenders_king_is_in_check());
    }

    #[test]
    fn oracle_sees_sliding_check_through_open_line() {
        let king = Square::E1.bitboard();
        let rook = Square::E8.bitboard();
        let position = position_with(
            &[
                (SLOT_WHITE, king),
                (SLOT_WHITE + Piece::King.index(), king),
                (SLOT_BLACK, rook),
                (SLOT_BLACK + Piece::Rook.index(), rook),
            ],
            0,
            false,
        );
        assert!(position.defenders_king_is_in_check());
    }

    #[test]
    fn oracle_respects_blockers() {
        let king = Square::E1.bitboard();
        let blocker = Square::E4.bitboard();
        let rook = Square::E8.bitboard();
        let position = position_with(
            &[
                (SLOT_WHITE, king | blocker),
                (SLOT_WHITE + Piece::King.index(), king),
                (SLOT_WHITE + Piece::Pawn.index(), blocker),
                (SLOT_BLACK, rook),
                (SLOT_BLACK + Piece::Rook.index(), rook),
            ],
            0,
            false,
        );
        assert!(!position.defenders_king_is_in_check());
    }

    #[test]
    fn oracle_sees_pawn_check() {
        let king = Square::E4.bitboard();
        let pawn = Square::D5.bitboard();
        let position = position_with(
            &[
                (SLOT_WHITE, king),
                (SLOT_WHITE + Piece::King.index(), king),
                (SLOT_BLACK, pawn),
                (SLOT_BLACK + Piece::Pawn.index(), pawn),
            ],
            0,
            false,
        );
        assert!(position.defenders_king_is_in_check());
    }

    #[test]
    /// A king which castled through an attacked square is caught by the pass-through scan even
    /// though its landing square is safe.
    fn oracle_rejects_castling_through_check() {
        let king = Square::E1.bitboard();
        let rook = Square::H1.bitboard();
        let enemy_rook = Square::F8.bitboard();
        let mut position = position_with(
            &[
                (SLOT_WHITE, king | rook),
                (SLOT_WHITE + Piece::King.index(), king),
                (SLOT_WHITE + Piece::Rook.index(), rook),
                (SLOT_BLACK, enemy_rook),
                (SLOT_BLACK + Piece::Rook.index(), enemy_rook),
            ],
            CASTLING_WHITE_KINGSIDE,
            true,
        );

        position.make_move(compose(
            Square::E1,
            Square::G1,
            Piece::King,
            Piece::None,
            Piece::None,
            MoveKind::KingsideCastling,
        ));

        // the king on G1 is not attacked, but the F1 square it crossed is
        assert!(position.defenders_king_is_in_check());
    }
}
