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

//! The driver loop.
//!
//! One thread reads commands, the other runs searches; this module is the second thread. It
//! polls the interactor's flags, replays the move history onto a fresh game, searches, and
//! prints the chosen move. Because the loop is strictly sequential, best moves are emitted in
//! the order the requests came in.

use std::{
    io,
    sync::{atomic::Ordering, Arc},
    thread,
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};

use crate::base::{Game, Move, MoveStack, MOVE_STACK_CAPACITY};
use crate::engine::{
    find_best_move, pv::MAX_SEARCH_DEPTH, AbortCondition, EvaluateMaterial,
    GenerateAllPseudoLegalMoves, PrincipalVariation,
};

use super::interactor::{GameSetup, UciInteractor};

/// The depth searched when the GUI does not ask for one.
const DEFAULT_SEARCH_DEPTH: u8 = 6;

/// How long the driver sleeps between polls of the interactor's flags.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Run the engine: spawn the command-input thread over standard input and drive searches until
/// `quit`.
///
/// Returns the process exit code: zero after a graceful `quit`, nonzero after a rejected
/// command, an illegal move history, or an input failure.
#[must_use]
pub fn run() -> i32 {
    let interactor = Arc::new(UciInteractor::new());
    let input_interactor = Arc::clone(&interactor);
    let input_thread = thread::spawn(move || {
        let stdin = io::stdin();
        input_interactor.parse_incoming_commands_continuously(stdin.lock());
    });

    let exit_code = drive(&interactor);

    if input_thread.join().is_err() {
        error!("command-input thread panicked");
        return 1;
    }
    exit_code
}

/// The poll loop, separated from thread plumbing so the exit paths stay visible.
fn drive(interactor: &UciInteractor) -> i32 {
    let mut game = Game::new();
    let mut move_stack: Box<MoveStack> = Box::new([Move::NULL; MOVE_STACK_CAPACITY]);
    let mut pv = PrincipalVariation::new();

    loop {
        if interactor.quit_game.load(Ordering::Relaxed) {
            let failed = interactor.encountered_error.load(Ordering::Relaxed);
            return i32::from(failed);
        }

        if interactor.restart_game.swap(false, Ordering::Relaxed) {
            match rebuild_game(&interactor.game_setup()) {
                Ok(rebuilt) => game = rebuilt,
                Err(code) => return code,
            }
        }

        if interactor.find_best_move.swap(false, Ordering::Relaxed) {
            let setup = interactor.game_setup();
            #[allow(clippy::cast_possible_truncation)]
            let depth_cap = MAX_SEARCH_DEPTH as u8;
            let depth = setup.depth.unwrap_or(DEFAULT_SEARCH_DEPTH).min(depth_cap);
            match search_current_position(&mut game, &mut move_stack, &mut pv, depth) {
                Some(best_move) => UciInteractor::send_best_move_once(&best_move),
                None => return 1,
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

/// Build the game a `position` command described. A failed FEN or an illegal move in the
/// history is fatal; the GUI and the engine no longer agree on the game.
fn rebuild_game(setup: &GameSetup) -> Result<Game, i32> {
    let mut game = match &setup.fen {
        None => Game::new(),
        Some(fen) => match Game::from_fen(fen) {
            Ok(game) => game,
            Err(failure) => {
                error!("{failure}");
                return Err(1);
            }
        },
    };
    for notation in &setup.moves {
        if let Err(failure) = game.play_move(notation) {
            error!("{failure}");
            return Err(1);
        }
    }
    if game.is_drawn_by_repetition() {
        info!("current position is a draw by repetition");
    }
    Ok(game)
}

/// Search the game's current position and render the chosen move, or `None` on a failure the
/// driver cannot recover from.
fn search_current_position(
    game: &mut Game,
    move_stack: &mut MoveStack,
    pv: &mut PrincipalVariation,
    depth: u8,
) -> Option<String> {
    let started = Instant::now();
    let result = find_best_move(
        game.position_mut(),
        &GenerateAllPseudoLegalMoves,
        &EvaluateMaterial,
        move_stack,
        pv,
        &AbortCondition::depth(depth),
    );
    match result {
        Ok((best_move, evaluation)) => {
            info!(
                "depth {depth} search finished in {:?}: {} ({evaluation})",
                started.elapsed(),
                best_move.to_uci(),
            );
            debug!("principal variation:\n{pv}");
            if best_move.is_null() {
                warn!("no legal move available; the game is over");
            }
            Some(best_move.to_uci())
        }
        Err(failure) => {
            // untimed searches cannot abort, so this is unreachable today; report it anyway
            error!("{failure}");
            None
        }
    }
}
