//! Text command parser.
//!
//! Parses incoming protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on.

use tracing::warn;

use crate::board::Coord;

use super::notation::parse_coord;

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    /// Overrides the configured depth for this search only.
    pub depth: Option<u32>,
}

/// A parsed client-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Protocol handshake; engine replies with its id, options and `qubicok`.
    Qubic,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Start a new game on an empty board.
    NewGame,

    /// Load a position from its notation.
    Position { notation: String },

    /// Play a stone for the side to move.
    Move { coord: Coord },

    /// Take back the last move.
    Undo,

    /// Search the current position and report the best move.
    Go(GoParams),

    /// Print the current position.
    Board,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "qubic" => Some(Command::Qubic),
        "isready" => Some(Command::IsReady),
        "quit" => Some(Command::Quit),
        "newgame" => Some(Command::NewGame),
        "undo" => Some(Command::Undo),
        "board" => Some(Command::Board),

        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),
        "move" => parse_move(&tokens),
        "go" => parse_go(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name, value) = match tokens.iter().position(|&t| t == "value") {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                warn!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position <notation>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed position: expected 'position <notation>'");
        return None;
    }
    Some(Command::Position {
        notation: tokens[1].to_string(),
    })
}

/// Parses `move <x,y,z>`. Spaces after the commas are tolerated.
fn parse_move(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed move: expected 'move <x,y,z>'");
        return None;
    }
    match parse_coord(&tokens[1..].concat()) {
        Ok(coord) => Some(Command::Move { coord }),
        Err(e) => {
            warn!("malformed move: {}", e);
            None
        }
    }
}

/// Parses `go [depth <n>]`.
fn parse_go(tokens: &[&str]) -> Option<Command> {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                if i < tokens.len() {
                    match tokens[i].parse::<u32>() {
                        Ok(v) => params.depth = Some(v),
                        Err(_) => warn!("invalid depth value: '{}'", tokens[i]),
                    }
                }
            }
            other => warn!("unknown go parameter: '{}'", other),
        }
        i += 1;
    }

    Some(Command::Go(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_qubic_command() {
        assert_eq!(parse_command("qubic"), Some(Command::Qubic));
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("isready"), Some(Command::IsReady));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("newgame"), Some(Command::NewGame));
        assert_eq!(parse_command("undo"), Some(Command::Undo));
        assert_eq!(parse_command("board"), Some(Command::Board));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("\t"), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar"), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        let cmd = parse_command("setoption name Depth value 4").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "Depth".to_string(),
                value: Some("4".to_string()),
            }
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        let cmd = parse_command("setoption name Strategy").unwrap();
        assert_eq!(
            cmd,
            Command::SetOption {
                name: "Strategy".to_string(),
                value: None,
            }
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption"), None);
        assert_eq!(parse_command("setoption foo"), None);
        assert_eq!(parse_command("setoption name value 3"), None);
    }

    #[test]
    fn parse_position_notation() {
        let cmd = parse_command("position 2:o.../...x").unwrap();
        assert_eq!(
            cmd,
            Command::Position {
                notation: "2:o.../...x".to_string(),
            }
        );
    }

    #[test]
    fn parse_position_malformed_returns_none() {
        assert_eq!(parse_command("position"), None);
        assert_eq!(parse_command("position 2:.... ...."), None);
    }

    #[test]
    fn parse_move_coord() {
        assert_eq!(
            parse_command("move 1,2,3"),
            Some(Command::Move {
                coord: Coord::new(1, 2, 3)
            })
        );
        assert_eq!(
            parse_command("move 0, 3, 1"),
            Some(Command::Move {
                coord: Coord::new(0, 3, 1)
            })
        );
    }

    #[test]
    fn parse_move_malformed_returns_none() {
        assert_eq!(parse_command("move"), None);
        assert_eq!(parse_command("move 1,2"), None);
        assert_eq!(parse_command("move a,b,c"), None);
    }

    #[test]
    fn parse_go_no_params() {
        let cmd = parse_command("go").unwrap();
        assert_eq!(cmd, Command::Go(GoParams::default()));
    }

    #[test]
    fn parse_go_depth() {
        let cmd = parse_command("go depth 3").unwrap();
        assert_eq!(cmd, Command::Go(GoParams { depth: Some(3) }));
    }

    #[test]
    fn parse_go_bad_depth_is_ignored() {
        let cmd = parse_command("go depth deep").unwrap();
        assert_eq!(cmd, Command::Go(GoParams::default()));
    }

    #[test]
    fn parse_with_leading_trailing_whitespace() {
        assert_eq!(parse_command("  qubic  "), Some(Command::Qubic));
        assert_eq!(parse_command("  isready  "), Some(Command::IsReady));
    }
}
