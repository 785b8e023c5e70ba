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

//! The searching parts of the engine: evaluation, move ordering, the principal variation table,
//! and the alpha-beta search itself.

pub mod evaluate;
pub use evaluate::{Evaluate, EvaluateMaterial, Evaluation};

pub mod limit;
pub use limit::{AbortCondition, CalculationWasDue};

pub mod ordering;

pub mod perft;

pub mod pv;
pub use pv::PrincipalVariation;

pub mod search;
pub use search::{find_best_move, GenerateAllPseudoLegalMoves, GenerateMoves};
