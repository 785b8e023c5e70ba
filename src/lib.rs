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

#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]

//! Woodpusher is a UCI chess engine.
//!
//! The crate is split into three parts:
//!
//! * [`base`] contains the bitboard position representation, move encoding,
//!   pseudo-legal move generation, and FEN conversion.
//! * [`engine`] contains the alpha-beta search, the evaluation types, and
//!   perft.
//! * [`uci`] contains the command parser and the driver loop which connects
//!   the engine to a GUI or a bot bridge.

pub mod base;
pub mod engine;
pub mod uci;
