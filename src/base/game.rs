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

//! A full game: a position plus the played history and draw bookkeeping.
//!
//! The game is what the driver owns. The search itself never sees it; repetition counting lives
//! here, in an auxiliary hash table outside the position, so the hot path stays untouched.

use std::collections::HashMap;

use log::info;
use nohash_hasher::BuildNoHashHasher;
use thiserror::Error;

use super::{
    fen::STARTING_POSITION_FEN, movegen::generate_moves, zobrist, FenError, Move, MoveStack,
    Position, MOVE_STACK_CAPACITY,
};

/// Counts how many times each position (by Zobrist hash) has occurred in the game.
/// The keys are already hashes, so the map hashes them with the identity function.
type RepetitionCounts = HashMap<u64, u8, BuildNoHashHasher<u64>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// The ways in which updating a game from the outside can fail.
pub enum GameError {
    /// A move in the history is not legal in the position it would be played from.
    #[error("move {0:?} is not legal in the current position")]
    IllegalMove(String),
    /// The starting position could not be parsed.
    #[error(transparent)]
    Fen(#[from] FenError),
}

#[derive(Debug, Clone)]
/// A game in progress: the current position, the moves which led to it, and a repetition
/// counter keyed by position hash.
pub struct Game {
    position: Position,
    played_moves: Vec<Move>,
    repetition_counts: RepetitionCounts,
}

impl Game {
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    /// Start a game from the standard starting position.
    pub fn new() -> Game {
        let position = Position::from_fen(STARTING_POSITION_FEN)
            .expect("the standard starting position must parse");
        Game::with_position(position)
    }

    /// Start a game from an arbitrary FEN.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if `fen` is malformed.
    pub fn from_fen(fen: &str) -> Result<Game, GameError> {
        Ok(Game::with_position(Position::from_fen(fen)?))
    }

    fn with_position(position: Position) -> Game {
        let mut repetition_counts =
            RepetitionCounts::with_capacity_and_hasher(64, BuildNoHashHasher::default());
        repetition_counts.insert(zobrist::hash(&position), 1);
        Game {
            position,
            played_moves: Vec::new(),
            repetition_counts,
        }
    }

    #[must_use]
    /// The current position of the game.
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    /// Exclusive access to the current position, for running a search on it.
    /// The search unmakes every move it makes, so the position is unchanged once it returns.
    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    #[must_use]
    /// The moves played so far.
    pub fn played_moves(&self) -> &[Move] {
        &self.played_moves
    }

    /// Play a move given in coordinate notation, such as `"e2e4"` or `"a7a8q"`.
    ///
    /// The move is matched against the generated legal moves of the current position; castling,
    /// en passant, and captures are recognized from the position itself.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` if `notation` does not name a legal move.
    pub fn play_move(&mut self, notation: &str) -> Result<(), GameError> {
        let mut move_stack: MoveStack = [Move::NULL; MOVE_STACK_CAPACITY];
        let last = generate_moves(&self.position, &mut move_stack, 0);
        for m in &move_stack[..last] {
            if m.to_uci() != notation {
                continue;
            }
            self.position.make_move(*m);
            if self.position.defenders_king_is_in_check() {
                self.position.unmake_move(*m);
                break;
            }
            self.played_moves.push(*m);
            let count = self
                .repetition_counts
                .entry(zobrist::hash(&self.position))
                .or_insert(0);
            *count += 1;
            if *count >= 3 {
                info!("position repeated {count} times; draw may be claimed");
            }
            return Ok(());
        }
        Err(GameError::IllegalMove(notation.into()))
    }

    /// Reset to the standard starting position, then replay the given coordinate-notation moves.
    ///
    /// # Errors
    ///
    /// This function will return an `Err` on the first illegal move, leaving the game at the
    /// position just before it.
    pub fn replay_from_start(&mut self, moves: &[String]) -> Result<(), GameError> {
        *self = Game::new();
        for notation in moves {
            self.play_move(notation)?;
        }
        Ok(())
    }

    #[must_use]
    /// Whether the current position has occurred at least three times in this game.
    /// The counter lives outside the position; the search does not consult it.
    pub fn is_drawn_by_repetition(&self) -> bool {
        self.repetition_counts
            .get(&zobrist::hash(&self.position))
            .is_some_and(|count| *count >= 3)
    }

    #[must_use]
    /// The number of plies since the last pawn move or capture.
    /// The field saturates at 63, so the full 50-move rule cannot be decided from it; it is
    /// surfaced for reporting only, and the search never consults it.
    pub fn halfmove_clock(&self) -> u64 {
        self.position.halfmove_clock()
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}
