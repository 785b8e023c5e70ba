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

//! Conversion between positions and Forsyth-Edwards Notation.
//!
//! The H1=bit-0 board layout makes this pleasant: counting the bit index down from 63 visits the
//! squares in exactly the order a FEN string lists them, rank 8 to rank 1 and the A file first.

use thiserror::Error;

use super::{
    position::{
        CASTLING_BLACK_KINGSIDE, CASTLING_BLACK_QUEENSIDE, CASTLING_WHITE_KINGSIDE,
        CASTLING_WHITE_QUEENSIDE, MASK_STATIC_PLIES, SHIFT_EN_PASSANT, SHIFT_STATIC_PLIES,
        SHIFT_TOTAL_PLIES, SLOT_BLACK, SLOT_EXTRAS, SLOT_WHITE,
    },
    Bitboard, Piece, Position, Square,
};

/// The FEN of the standard starting position.
pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// The ways in which a FEN string can fail to describe a position.
pub enum FenError {
    /// The FEN did not consist of exactly six whitespace-separated tokens.
    #[error("FEN contains {0} tokens instead of 6")]
    TokenCount(usize),
    /// The piece-placement token contained an unknown character.
    #[error("FEN contains invalid piece symbol: {0:?}")]
    InvalidPieceSymbol(char),
    /// The piece-placement token described more than 64 squares.
    #[error("FEN piece placement does not cover exactly 64 squares")]
    InvalidPlacement,
    /// The side-to-move token was neither `w` nor `b`.
    #[error("FEN contains invalid token for side to play: {0:?}")]
    InvalidSideToMove(String),
    /// The castling token contained a character other than `K`, `Q`, `k`, or `q`.
    #[error("FEN contains invalid castling token: {0:?}")]
    InvalidCastling(String),
    /// The en-passant token was neither `-` nor a square on rank 3 or 6.
    #[error("FEN contains invalid en passant token: {0:?}")]
    InvalidEnPassant(String),
    /// The halfmove-clock token was not a number.
    #[error("FEN contains invalid halfmove clock: {0:?}")]
    InvalidHalfmoveClock(String),
    /// The fullmove-number token was not a positive number.
    #[error("FEN contains invalid fullmove number: {0:?}")]
    InvalidFullmoveNumber(String),
}

impl Position {
    /// Load a position from a FEN string.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` describing the first malformed token if `fen` is not a
    /// well-formed FEN string. The position is only returned when every token parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use woodpusher::base::{fen::STARTING_POSITION_FEN, Position};
    ///
    /// let position = Position::from_fen(STARTING_POSITION_FEN).unwrap();
    /// assert!(position.white_to_move());
    /// assert_eq!(position.to_fen(), STARTING_POSITION_FEN);
    /// ```
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let tokens: Vec<&str> = fen.split_whitespace().collect();
        if tokens.len() != 6 {
            return Err(FenError::TokenCount(tokens.len()));
        }

        let mut boards = [Bitboard::EMPTY; 16];

        // piece placement, walking the bit index down from A8
        let mut next_index: i32 = 63;
        for symbol in tokens[0].chars() {
            if symbol == '/' {
                continue;
            }
            if let Some(run) = symbol.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidPieceSymbol(symbol));
                }
                #[allow(clippy::cast_possible_wrap)]
                {
                    next_index -= run as i32;
                }
                continue;
            }
            let side_slot = if symbol.is_ascii_uppercase() {
                SLOT_WHITE
            } else {
                SLOT_BLACK
            };
            let kind = Piece::from_code(symbol.to_ascii_uppercase())
                .ok_or(FenError::InvalidPieceSymbol(symbol))?;
            if next_index < 0 {
                return Err(FenError::InvalidPlacement);
            }
            #[allow(clippy::cast_sign_loss)]
            let square = Bitboard::from_index(next_index as u32);
            boards[side_slot] |= square;
            boards[side_slot + kind.index()] |= square;
            next_index -= 1;
        }
        if next_index != -1 {
            return Err(FenError::InvalidPlacement);
        }

        let white_to_move = match tokens[1] {
            "w" => true,
            "b" => false,
            other => return Err(FenError::InvalidSideToMove(other.into())),
        };

        let mut extras = 0u64;
        if tokens[2] != "-" {
            if tokens[2].is_empty() {
                return Err(FenError::InvalidCastling(tokens[2].into()));
            }
            for right in tokens[2].chars() {
                extras |= match right {
                    'K' => CASTLING_WHITE_KINGSIDE,
                    'Q' => CASTLING_WHITE_QUEENSIDE,
                    'k' => CASTLING_BLACK_KINGSIDE,
                    'q' => CASTLING_BLACK_QUEENSIDE,
                    _ => return Err(FenError::InvalidCastling(tokens[2].into())),
                };
            }
        }

        if tokens[3] != "-" {
            let square = Square::from_algebraic(tokens[3])
                .map_err(|_| FenError::InvalidEnPassant(tokens[3].into()))?;
            // a target square can only ever sit behind a just-double-pushed pawn
            if square.rank() != 2 && square.rank() != 5 {
                return Err(FenError::InvalidEnPassant(tokens[3].into()));
            }
            extras |= (square as u64) << SHIFT_EN_PASSANT;
        }

        let halfmove_clock: u64 = tokens[4]
            .parse()
            .map_err(|_| FenError::InvalidHalfmoveClock(tokens[4].into()))?;
        // the clock field saturates at 63
        extras |= (halfmove_clock << SHIFT_STATIC_PLIES) & MASK_STATIC_PLIES;
        if halfmove_clock > 63 {
            extras |= MASK_STATIC_PLIES;
        }

        let fullmove_number: u64 = tokens[5]
            .parse()
            .map_err(|_| FenError::InvalidFullmoveNumber(tokens[5].into()))?;
        if fullmove_number == 0 {
            return Err(FenError::InvalidFullmoveNumber(tokens[5].into()));
        }
        let total_plies = 2 * (fullmove_number - 1) + u64::from(!white_to_move);
        extras |= total_plies << SHIFT_TOTAL_PLIES;

        boards[SLOT_EXTRAS] = Bitboard::new(extras);
        Ok(Position::from_boards(boards, white_to_move))
    }

    #[must_use]
    /// Emit this position as a FEN string.
    /// `from_fen` and `to_fen` round-trip exactly for every legal position.
    pub fn to_fen(&self) -> String {
        let mut pieces = String::new();
        let mut empty_squares = 0;
        for index in (0..64u32).rev() {
            let square = Bitboard::from_index(index);
            let white_kind = self.piece_kind_on(SLOT_WHITE, square);
            let black_kind = self.piece_kind_on(SLOT_BLACK, square);
            match (white_kind.code(), black_kind.code()) {
                (Some(code), _) => {
                    if empty_squares > 0 {
                        pieces += &empty_squares.to_string();
                        empty_squares = 0;
                    }
                    pieces.push(code);
                }
                (None, Some(code)) => {
                    if empty_squares > 0 {
                        pieces += &empty_squares.to_string();
                        empty_squares = 0;
                    }
                    pieces.push(code.to_ascii_lowercase());
                }
                (None, None) => empty_squares += 1,
            }
            if index % 8 == 0 {
                if empty_squares > 0 {
                    pieces += &empty_squares.to_string();
                    empty_squares = 0;
                }
                if index > 0 {
                    pieces.push('/');
                }
            }
        }

        let side = if self.white_to_move() { "w" } else { "b" };

        let mut castling = String::new();
        if self.has_castling_right(CASTLING_WHITE_KINGSIDE) {
            castling.push('K');
        }
        if self.has_castling_right(CASTLING_WHITE_QUEENSIDE) {
            castling.push('Q');
        }
        if self.has_castling_right(CASTLING_BLACK_KINGSIDE) {
            castling.push('k');
        }
        if self.has_castling_right(CASTLING_BLACK_QUEENSIDE) {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = match Square::from_index(self.en_passant_index()) {
            Some(square) if self.en_passant_index() != 0 => square.to_string(),
            _ => "-".into(),
        };

        let halfmove_clock = self.halfmove_clock();
        let fullmove_number = self.total_plies() / 2 + 1;

        format!("{pieces} {side} {castling} {en_passant} {halfmove_clock} {fullmove_number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_boards() {
        let position = Position::from_fen(STARTING_POSITION_FEN).unwrap();
        assert_eq!(
            position[SLOT_WHITE + Piece::Pawn.index()],
            Bitboard::RANK_2
        );
        assert_eq!(
            position[SLOT_BLACK + Piece::Pawn.index()],
            Bitboard::RANK_7
        );
        assert_eq!(
            position[SLOT_WHITE + Piece::King.index()],
            Square::E1.bitboard()
        );
        assert_eq!(
            position[SLOT_BLACK + Piece::Queen.index()],
            Square::D8.bitboard()
        );
        assert_eq!(position[SLOT_WHITE].len(), 16);
        assert_eq!(position[SLOT_BLACK].len(), 16);
        assert!(position.has_castling_right(CASTLING_WHITE_KINGSIDE));
        assert!(position.has_castling_right(CASTLING_BLACK_QUEENSIDE));
    }

    #[test]
    /// The round-trip scenario from an arbitrary middlegame position.
    fn round_trip_middlegame() {
        let fen = "2r3k1/pp2npp1/3r2qp/8/2BBp3/1PP3Rb/P4P2/R2Q3K b - - 0 28";
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(position.to_fen(), fen);
    }

    #[test]
    fn round_trip_en_passant_and_clock() {
        let fens = [
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "8/8/8/8/8/4k3/8/4K3 w - - 17 61",
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 20",
        ];
        for fen in fens {
            let position = Position::from_fen(fen).unwrap();
            assert_eq!(position.to_fen(), fen, "round trip failed for {fen}");
        }
    }

    #[test]
    fn round_trip_through_structural_equality() {
        let fen = "r2q1rk1/pb3p1p/1pn3p1/2p1R2Q/2P5/2BB4/P4PPP/R5K1 w - - 0 21";
        let position = Position::from_fen(fen).unwrap();
        let again = Position::from_fen(&position.to_fen()).unwrap();
        assert_eq!(position, again);
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - -"),
            Err(FenError::TokenCount(4))
        );
        assert_eq!(Position::from_fen(""), Err(FenError::TokenCount(0)));
    }

    #[test]
    fn rejects_unknown_piece_letter() {
        assert_eq!(
            Position::from_fen("8/8/8/8/3x4/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPieceSymbol('x'))
        );
    }

    #[test]
    fn rejects_bad_side_token() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::InvalidSideToMove("x".into()))
        );
    }

    #[test]
    fn rejects_malformed_castling() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(FenError::InvalidCastling("KX".into()))
        );
    }

    #[test]
    fn rejects_bad_en_passant_square() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - z9 0 1"),
            Err(FenError::InvalidEnPassant("z9".into()))
        );
        // e4 is a real square, but never an en-passant target
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassant("e4".into()))
        );
    }

    #[test]
    fn rejects_short_placement() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPlacement)
        );
    }

    #[test]
    fn rejects_bad_counters() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::InvalidHalfmoveClock("x".into()))
        );
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(FenError::InvalidFullmoveNumber("0".into()))
        );
    }

    #[test]
    /// The capture scenario: taking the H8 rook revokes black's kingside right, and the emitted
    /// FEN shows it.
    fn captured_rook_disappears_from_castling_token() {
        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let m = crate::base::Move::compose(
            Square::H1 as u32,
            Square::H8 as u32,
            Piece::Rook,
            Piece::Rook,
            Piece::None,
            crate::base::MoveKind::Capture,
        );
        position.make_move(m);
        let fen = position.to_fen();
        let castling_token: Vec<&str> = fen.split_whitespace().collect();
        // white loses kingside (its own rook left H1), black loses kingside (rook captured on H8)
        assert_eq!(castling_token[2], "Qq");
    }
}
