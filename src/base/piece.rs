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

//! Piece kinds, which contain no information about their color or current square.

use std::fmt::{Display, Formatter, Result};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
/// The kind of a piece.
/// This contains no information about the location of a piece, or of its color.
///
/// The numbering of this enumeration is highly intentional: adding the discriminant of a kind to
/// the aggregate-board slot of a side yields the slot of that side's board for the kind, and the
/// discriminant 0 stands for "no piece", which is how captures and promotions express their
/// absence in a packed move.
pub enum Piece {
    /// The empty kind, used where no capture or promotion is implied.
    None = 0,
    /// A pawn, which has especially limited movement.
    Pawn = 1,
    /// A knight, which can move in an L-shape (two squares out, then one square sideways).
    Knight = 2,
    /// A bishop, which can move arbitrarily far diagonally.
    Bishop = 3,
    /// A rook, which can move arbitrarily far horizontally or vertically.
    Rook = 4,
    /// A queen, which can move like both a rook and a bishop.
    Queen = 5,
    /// A king, which can move one square in any direction and must never be captured.
    King = 6,
}

impl Piece {
    /// Total number of piece kinds, including the empty kind.
    pub const NUM: usize = 7;

    /// Array containing all piece kinds which can actually sit on a board.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// The kinds that a pawn can be promoted to, in the order the generator emits them.
    pub const PROMOTING: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Knight, Piece::Bishop];

    #[must_use]
    /// Construct a piece kind from the value of a packed 3-bit move field.
    ///
    /// # Panics
    ///
    /// This function will panic if `index` is not a valid piece kind. A packed move composed by
    /// the generator never contains an invalid kind, so a panic here indicates a corrupt move.
    pub const fn from_index(index: u32) -> Piece {
        match index {
            0 => Piece::None,
            1 => Piece::Pawn,
            2 => Piece::Knight,
            3 => Piece::Bishop,
            4 => Piece::Rook,
            5 => Piece::Queen,
            6 => Piece::King,
            _ => panic!("invalid piece kind in packed move"),
        }
    }

    #[must_use]
    /// Get the FEN code of this piece as an uppercase character.
    /// The empty kind has no code.
    pub const fn code(self) -> Option<char> {
        match self {
            Piece::None => None,
            Piece::Pawn => Some('P'),
            Piece::Knight => Some('N'),
            Piece::Bishop => Some('B'),
            Piece::Rook => Some('R'),
            Piece::Queen => Some('Q'),
            Piece::King => Some('K'),
        }
    }

    #[must_use]
    /// Given an uppercase FEN character, convert it to a piece kind.
    pub const fn from_code(c: char) -> Option<Piece> {
        match c {
            'P' => Some(Piece::Pawn),
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }

    #[must_use]
    /// Get the discriminant of this kind as a board-slot offset.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.code() {
            Some(c) => write!(f, "{c}"),
            None => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that every kind survives a trip through its packed-field representation.
    fn packed_field_round_trip() {
        for kind in Piece::ALL {
            assert_eq!(Piece::from_index(kind as u32), kind);
        }
        assert_eq!(Piece::from_index(0), Piece::None);
    }

    #[test]
    fn codes() {
        assert_eq!(Piece::Pawn.code(), Some('P'));
        assert_eq!(Piece::from_code('Q'), Some(Piece::Queen));
        assert_eq!(Piece::from_code('x'), None);
        assert_eq!(Piece::None.code(), None);
    }
}
