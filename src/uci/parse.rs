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

//! Parsing of incoming UCI commands.
//!
//! Only the commands the driver acts on are modeled; anything else fails loudly, since a silent
//! misunderstanding between a GUI and the engine is worse than a crash.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// The ways in which an incoming command line can be rejected.
pub enum UciError {
    /// The line contained no tokens at all.
    #[error("empty command line")]
    EmptyCommand,
    /// The first token did not name a known command.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    /// A `position` command was not followed by `startpos` or `fen`.
    #[error("malformed position command: {0:?}")]
    MalformedPosition(String),
    /// A `go depth` clause did not carry a valid number.
    #[error("malformed go command: {0:?}")]
    MalformedGo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A parsed command from the GUI.
pub enum Command {
    /// Handshake; the engine replies `uciok`.
    Uci,
    /// Readiness probe; the engine replies `readyok`.
    IsReady,
    /// An engine option. Accepted and ignored.
    SetOption,
    /// Set up a position: from the given FEN or the standard start, then the given moves.
    Position {
        /// The FEN to start from, or `None` for the standard starting position.
        fen: Option<String>,
        /// Coordinate-notation moves to replay on top.
        moves: Vec<String>,
    },
    /// Start searching for a best move.
    Go {
        /// An explicit search depth, if the GUI gave one.
        depth: Option<u8>,
    },
    /// Terminate the engine.
    Quit,
}

/// Parse one line from the GUI into a [`Command`].
///
/// # Errors
///
/// This function will return an `Err` if the line is empty, names an unknown command, or is a
/// known command with a malformed tail.
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&command) = tokens.first() else {
        return Err(UciError::EmptyCommand);
    };

    match command {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "setoption" => Ok(Command::SetOption),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(&tokens[1..], line),
        "go" => parse_go(&tokens[1..], line),
        _ => Err(UciError::UnknownCommand(line.into())),
    }
}

fn parse_position(tokens: &[&str], line: &str) -> Result<Command, UciError> {
    match tokens.first() {
        Some(&"startpos") => {
            let moves = match tokens.get(1) {
                Some(&"moves") => tokens[2..].iter().map(ToString::to_string).collect(),
                Some(_) => return Err(UciError::MalformedPosition(line.into())),
                None => Vec::new(),
            };
            Ok(Command::Position { fen: None, moves })
        }
        Some(&"fen") => {
            // the FEN is the six tokens up to an optional "moves" keyword
            let rest = &tokens[1..];
            let fen_length = rest
                .iter()
                .position(|&token| token == "moves")
                .unwrap_or(rest.len());
            if fen_length != 6 {
                return Err(UciError::MalformedPosition(line.into()));
            }
            let fen = rest[..fen_length].join(" ");
            let moves = if fen_length < rest.len() {
                rest[fen_length + 1..].iter().map(ToString::to_string).collect()
            } else {
                Vec::new()
            };
            Ok(Command::Position {
                fen: Some(fen),
                moves,
            })
        }
        _ => Err(UciError::MalformedPosition(line.into())),
    }
}

fn parse_go(tokens: &[&str], line: &str) -> Result<Command, UciError> {
    match tokens.first() {
        None => Ok(Command::Go { depth: None }),
        Some(&"depth") => {
            let depth = tokens
                .get(1)
                .and_then(|token| token.parse().ok())
                .ok_or(UciError::MalformedGo(line.into()))?;
            Ok(Command::Go { depth: Some(depth) })
        }
        // other go clauses (time controls etc.) are not supported; searching at the default
        // depth is a better answer to them than a crash
        Some(_) => Ok(Command::Go { depth: None }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("uci"), Ok(Command::Uci));
        assert_eq!(parse_command("isready"), Ok(Command::IsReady));
        assert_eq!(
            parse_command("setoption name Hash value 64"),
            Ok(Command::SetOption)
        );
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn position_startpos() {
        assert_eq!(
            parse_command("position startpos"),
            Ok(Command::Position {
                fen: None,
                moves: vec![]
            })
        );
        assert_eq!(
            parse_command("position startpos moves e2e4 e7e5"),
            Ok(Command::Position {
                fen: None,
                moves: vec!["e2e4".into(), "e7e5".into()]
            })
        );
    }

    #[test]
    fn position_fen() {
        let line = "position fen 8/8/8/8/8/4k3/8/4K3 w - - 0 1 moves e1d1";
        assert_eq!(
            parse_command(line),
            Ok(Command::Position {
                fen: Some("8/8/8/8/8/4k3/8/4K3 w - - 0 1".into()),
                moves: vec!["e1d1".into()]
            })
        );
    }

    #[test]
    fn go_variants() {
        assert_eq!(parse_command("go"), Ok(Command::Go { depth: None }));
        assert_eq!(
            parse_command("go depth 4"),
            Ok(Command::Go { depth: Some(4) })
        );
        assert_eq!(
            parse_command("go movetime 1000"),
            Ok(Command::Go { depth: None })
        );
        assert_eq!(
            parse_command("go depth x"),
            Err(UciError::MalformedGo("go depth x".into()))
        );
    }

    #[test]
    fn rejected_lines() {
        assert_eq!(parse_command(""), Err(UciError::EmptyCommand));
        assert_eq!(
            parse_command("frobnicate"),
            Err(UciError::UnknownCommand("frobnicate".into()))
        );
        assert_eq!(
            parse_command("position e2e4"),
            Err(UciError::MalformedPosition("position e2e4".into()))
        );
        assert_eq!(
            parse_command("position fen 8/8/8/8 w - -"),
            Err(UciError::MalformedPosition("position fen 8/8/8/8 w - -".into()))
        );
    }
}
