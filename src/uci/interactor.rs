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

//! The interactor: the bridge between the command-input thread and the driver thread.
//!
//! The input thread parses stdin lines and communicates through three atomic flags and one
//! mutex-protected game setup. Those are the only things both threads touch; the position, move
//! stack, and principal variation belong to the driver alone.

use std::{
    io::BufRead,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use log::{error, info};

use super::parse::{parse_command, Command};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// What the next search should start from: an optional FEN and the moves played after it.
pub struct GameSetup {
    /// The FEN to start from, or `None` for the standard starting position.
    pub fen: Option<String>,
    /// The move history in coordinate notation.
    pub moves: Vec<String>,
    /// The requested search depth, or `None` for the engine default.
    pub depth: Option<u8>,
}

#[derive(Debug, Default)]
/// The shared state between the command-input thread and the driver thread.
pub struct UciInteractor {
    /// Set when the GUI asked for a fresh game.
    pub restart_game: AtomicBool,
    /// Set when the GUI asked for a best move.
    pub find_best_move: AtomicBool,
    /// Set when the GUI asked the engine to terminate.
    pub quit_game: AtomicBool,
    /// Set when the input thread hit a command it had to reject.
    pub encountered_error: AtomicBool,
    /// The game setup the next search should use.
    setup: Mutex<GameSetup>,
}

impl UciInteractor {
    #[must_use]
    /// Create an interactor with no pending requests.
    pub fn new() -> UciInteractor {
        UciInteractor::default()
    }

    /// Read and act on commands from `input` until `quit` or a rejected command.
    ///
    /// Handshake commands are answered directly from this thread; `position`, `go`, and `quit`
    /// only flip the shared flags so the driver can pick them up between searches.
    ///
    /// # Panics
    ///
    /// This function will panic if the setup mutex was poisoned, which means the driver thread
    /// already crashed.
    pub fn parse_incoming_commands_continuously(&self, input: impl BufRead) {
        for line in input.lines() {
            let Ok(line) = line else {
                error!("failed to read from standard input");
                self.encountered_error.store(true, Ordering::Relaxed);
                self.quit_game.store(true, Ordering::Relaxed);
                return;
            };
            if line.trim().is_empty() {
                continue;
            }
            info!("received: {line}");

            match parse_command(&line) {
                Ok(Command::Uci) => Self::respond("uciok"),
                Ok(Command::IsReady) => Self::respond("readyok"),
                Ok(Command::SetOption) => info!("(no action and no response)"),
                Ok(Command::Position { fen, moves }) => {
                    {
                        let mut setup = self.setup.lock().unwrap();
                        setup.fen = fen;
                        setup.moves = moves;
                    }
                    self.restart_game.store(true, Ordering::Relaxed);
                    info!("set: restart game from new setup");
                }
                Ok(Command::Go { depth }) => {
                    self.setup.lock().unwrap().depth = depth;
                    self.find_best_move.store(true, Ordering::Relaxed);
                    info!("set: find best move");
                }
                Ok(Command::Quit) => {
                    info!("quitting");
                    self.quit_game.store(true, Ordering::Relaxed);
                    return;
                }
                Err(rejection) => {
                    error!("{rejection}");
                    self.encountered_error.store(true, Ordering::Relaxed);
                    self.quit_game.store(true, Ordering::Relaxed);
                    return;
                }
            }
        }
        // end of input without `quit`: treat like a quit so the driver does not spin forever
        self.quit_game.store(true, Ordering::Relaxed);
    }

    /// Take a copy of the current game setup.
    ///
    /// # Panics
    ///
    /// This function will panic if the setup mutex was poisoned.
    pub fn game_setup(&self) -> GameSetup {
        self.setup.lock().unwrap().clone()
    }

    /// Print the chosen best move on standard output, where the GUI listens.
    pub fn send_best_move_once(best_move: &str) {
        let answer = format!("bestmove {best_move}");
        println!("{answer}");
        info!("sent: {answer}");
    }

    fn respond(answer: &str) {
        println!("{answer}");
        info!("sent: {answer}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn position_and_go_set_flags_and_setup() {
        let interactor = UciInteractor::new();
        let input = b"position startpos moves e2e4\ngo depth 3\nquit\n" as &[u8];
        interactor.parse_incoming_commands_continuously(input);

        assert!(interactor.restart_game.load(Ordering::Relaxed));
        assert!(interactor.find_best_move.load(Ordering::Relaxed));
        assert!(interactor.quit_game.load(Ordering::Relaxed));
        assert!(!interactor.encountered_error.load(Ordering::Relaxed));
        assert_eq!(
            interactor.game_setup(),
            GameSetup {
                fen: None,
                moves: vec!["e2e4".into()],
                depth: Some(3),
            }
        );
    }

    #[test]
    fn unknown_commands_fail_loudly() {
        let interactor = UciInteractor::new();
        let input = b"xyzzy\n" as &[u8];
        interactor.parse_incoming_commands_continuously(input);

        assert!(interactor.encountered_error.load(Ordering::Relaxed));
        assert!(interactor.quit_game.load(Ordering::Relaxed));
    }

    #[test]
    fn end_of_input_quits() {
        let interactor = UciInteractor::new();
        interactor.parse_incoming_commands_continuously(b"isready\n" as &[u8]);
        assert!(interactor.quit_game.load(Ordering::Relaxed));
        assert!(!interactor.encountered_error.load(Ordering::Relaxed));
    }
}
