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

//! Pseudo-legal move generation.
//!
//! "Pseudo" in the sense that the king may be left in check by a generated move; the search
//! rejects such moves by making them and asking the attack oracle.

use super::{
    direction::{single_step, Direction},
    lookup::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS},
    position::{
        CASTLING_BLACK_KINGSIDE, CASTLING_BLACK_QUEENSIDE, CASTLING_WHITE_KINGSIDE,
        CASTLING_WHITE_QUEENSIDE,
    },
    Bitboard, Move, MoveKind, MoveStack, Piece, Position, Side, Square,
};

/// Writes generated moves into a caller-supplied suffix of a move stack.
struct Emitter<'a> {
    move_stack: &'a mut MoveStack,
    cursor: usize,
}

impl Emitter<'_> {
    fn push(&mut self, m: Move) {
        self.move_stack[self.cursor] = m;
        self.cursor += 1;
    }

    /// Emit the four possible promotions for a pawn arriving on its last rank.
    fn push_all_promotions(&mut self, source: u32, target: u32, captured_piece: Piece) {
        for promotion in Piece::PROMOTING {
            self.push(Move::compose(
                source,
                target,
                Piece::Pawn,
                captured_piece,
                promotion,
                MoveKind::Promotion,
            ));
        }
    }
}

/// Generate all pseudo-legal moves from `position`, writing them into `move_stack` starting at
/// index `first`.
///
/// Returns the index one past the last generated move. Within each piece kind, moves are emitted
/// by ascending source-square bit index, which makes generation deterministic.
///
/// # Panics
///
/// This function will panic if the move stack has no room left, which cannot happen for a stack
/// sized for the search depth it serves.
pub fn generate_moves(position: &Position, move_stack: &mut MoveStack, first: usize) -> usize {
    let mut emitter = Emitter { move_stack, cursor: first };

    let white_to_move = position.white_to_move();
    let attacking_side = position.attacking_side();
    let defending_side = position.defending_side();
    let side = if white_to_move { Side::White } else { Side::Black };
    let own_pieces = position[attacking_side];
    let enemy_pieces = position[defending_side];
    let free_squares = !(own_pieces | enemy_pieces);

    // pawn moves
    let mut pawns = position[attacking_side + Piece::Pawn.index()];
    while !pawns.is_empty() {
        let source_bit = pawns.trailing_zeros();
        let source = Bitboard::from_index(source_bit);
        pawns ^= source;

        // captures, promoting when the target is on the last rank
        let mut capture_targets = PAWN_ATTACKS[side.index()][source_bit as usize] & enemy_pieces;
        while !capture_targets.is_empty() {
            let target_bit = capture_targets.trailing_zeros();
            let target = Bitboard::from_index(target_bit);
            capture_targets ^= target;

            let captured_piece = position.piece_kind_on(defending_side, target);
            if target.intersects(Bitboard::PROMOTION_RANKS) {
                emitter.push_all_promotions(source_bit, target_bit, captured_piece);
            } else {
                emitter.push(Move::compose(
                    source_bit,
                    target_bit,
                    Piece::Pawn,
                    captured_piece,
                    Piece::None,
                    MoveKind::Capture,
                ));
            }
        }

        // en passant
        let en_passant_index = position.en_passant_index();
        if en_passant_index != 0
            && PAWN_ATTACKS[side.index()][source_bit as usize]
                .intersects(Bitboard::from_index(en_passant_index))
        {
            emitter.push(Move::compose(
                source_bit,
                en_passant_index,
                Piece::Pawn,
                Piece::Pawn,
                Piece::None,
                MoveKind::EnPassantCapture,
            ));
        }

        // single push, promoting on the last rank
        let single_push_target = if white_to_move { source << 8 } else { source >> 8 };
        let single_push_is_free = single_push_target.intersects(free_squares);
        if single_push_is_free {
            if single_push_target.intersects(Bitboard::PROMOTION_RANKS) {
                emitter.push_all_promotions(
                    source_bit,
                    single_push_target.trailing_zeros(),
                    Piece::None,
                );
            } else {
                emitter.push(Move::compose(
                    source_bit,
                    single_push_target.trailing_zeros(),
                    Piece::Pawn,
                    Piece::None,
                    Piece::None,
                    MoveKind::PawnSinglePush,
                ));
            }
        }

        // double push, only from the start rank and only across two free squares
        if source.intersects(side.pawn_start_rank()) {
            let double_push_target = if white_to_move { source << 16 } else { source >> 16 };
            if single_push_is_free && double_push_target.intersects(free_squares) {
                emitter.push(Move::compose(
                    source_bit,
                    double_push_target.trailing_zeros(),
                    Piece::Pawn,
                    Piece::None,
                    Piece::None,
                    MoveKind::PawnDoublePush,
                ));
            }
        }
    }

    // sliding pieces step one square at a time, stopping at the first blocker
    let mut generate_ray_moves = |piece: Piece, directions: &[Direction]| {
        let mut sliders = position[attacking_side + piece.index()];
        while !sliders.is_empty() {
            let source_bit = sliders.trailing_zeros();
            let source = Bitboard::from_index(source_bit);
            sliders ^= source;

            for &direction in directions {
                let mut target = single_step(source, direction);
                while !target.is_empty() {
                    if target.intersects(own_pieces) {
                        break;
                    }
                    if target.intersects(free_squares) {
                        emitter.push(Move::compose(
                            source_bit,
                            target.trailing_zeros(),
                            piece,
                            Piece::None,
                            Piece::None,
                            MoveKind::QuietNonPawn,
                        ));
                    } else {
                        let captured_piece = position.piece_kind_on(defending_side, target);
                        emitter.push(Move::compose(
                            source_bit,
                            target.trailing_zeros(),
                            piece,
                            captured_piece,
                            Piece::None,
                            MoveKind::Capture,
                        ));
                        break;
                    }
                    target = single_step(target, direction);
                }
            }
        }
    };

    generate_ray_moves(Piece::Bishop, &Direction::BISHOP);
    generate_ray_moves(Piece::Rook, &Direction::ROOK);
    generate_ray_moves(Piece::Queen, &Direction::ALL);

    // jumping pieces only consider the landing square
    let mut generate_jump_moves = |piece: Piece, attack_table: &[Bitboard; 64]| {
        let mut jumpers = position[attacking_side + piece.index()];
        while !jumpers.is_empty() {
            let source_bit = jumpers.trailing_zeros();
            let source = Bitboard::from_index(source_bit);
            jumpers ^= source;

            let mut targets = attack_table[source_bit as usize] & !own_pieces;
            while !targets.is_empty() {
                let target_bit = targets.trailing_zeros();
                let target = Bitboard::from_index(target_bit);
                targets ^= target;

                if target.intersects(free_squares) {
                    emitter.push(Move::compose(
                        source_bit,
                        target_bit,
                        piece,
                        Piece::None,
                        Piece::None,
                        MoveKind::QuietNonPawn,
                    ));
                } else {
                    let captured_piece = position.piece_kind_on(defending_side, target);
                    emitter.push(Move::compose(
                        source_bit,
                        target_bit,
                        piece,
                        captured_piece,
                        Piece::None,
                        MoveKind::Capture,
                    ));
                }
            }
        }
    };

    generate_jump_moves(Piece::Knight, &KNIGHT_ATTACKS);
    generate_jump_moves(Piece::King, &KING_ATTACKS);

    // castling: the right must be intact and the squares between king and rook free; whether the
    // king crosses an attacked square is left to the attack oracle after make
    struct CastlingCase {
        right: u64,
        required_free: Bitboard,
        source: Square,
        target: Square,
        kind: MoveKind,
    }
    let castling_cases = if white_to_move {
        [
            CastlingCase {
                right: CASTLING_WHITE_KINGSIDE,
                required_free: Square::F1.bitboard().union(Square::G1.bitboard()),
                source: Square::E1,
                target: Square::G1,
                kind: MoveKind::KingsideCastling,
            },
            CastlingCase {
                right: CASTLING_WHITE_QUEENSIDE,
                required_free: Square::D1
                    .bitboard()
                    .union(Square::C1.bitboard())
                    .union(Square::B1.bitboard()),
                source: Square::E1,
                target: Square::C1,
                kind: MoveKind::QueensideCastling,
            },
        ]
    } else {
        [
            CastlingCase {
                right: CASTLING_BLACK_KINGSIDE,
                required_free: Square::F8.bitboard().union(Square::G8.bitboard()),
                source: Square::E8,
                target: Square::G8,
                kind: MoveKind::KingsideCastling,
            },
            CastlingCase {
                right: CASTLING_BLACK_QUEENSIDE,
                required_free: Square::D8
                    .bitboard()
                    .union(Square::C8.bitboard())
                    .union(Square::B8.bitboard()),
                source: Square::E8,
                target: Square::C8,
                kind: MoveKind::QueensideCastling,
            },
        ]
    };
    for case in castling_cases {
        let space_is_free = free_squares & case.required_free == case.required_free;
        if position.has_castling_right(case.right) && space_is_free {
            emitter.push(Move::compose(
                case.source as u32,
                case.target as u32,
                Piece::King,
                Piece::None,
                Piece::None,
                case.kind,
            ));
        }
    }

    emitter.cursor
}
