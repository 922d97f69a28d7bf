//! Coordinate and position notation.
//!
//! A coordinate is written `x,y,z`. A position is written
//! `<n>:<layer0>/<layer1>/...` with one layer per `z`, each layer holding
//! `n*n` characters in row order (`y` outer, `x` inner): `.` for an empty
//! cell, `o` and `x` for the two players.
//!
//! Example (2-cube, `o` at the origin, `x` at (1,1,1)): `2:o.../...x`

use crate::board::{Board, BoardError, Coord, Line, Player};

/// Errors that can occur while parsing notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("invalid coordinate '{0}': expected x,y,z")]
    InvalidCoordinate(String),

    #[error("position is missing the '<size>:' prefix")]
    MissingSize,

    #[error("invalid board size '{0}'")]
    InvalidSize(String),

    #[error("expected {expected} layers, got {got}")]
    WrongLayerCount { expected: usize, got: usize },

    #[error("layer {layer} has {got} cells, expected {expected}")]
    WrongLayerLength {
        layer: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid cell character '{0}'")]
    InvalidCell(char),

    #[error("stone counts differ by more than one (o={o}, x={x})")]
    Unbalanced { o: usize, x: usize },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Parses `x,y,z`. Bounds are checked by the board, not here.
pub fn parse_coord(s: &str) -> Result<Coord, NotationError> {
    let invalid = || NotationError::InvalidCoordinate(s.to_string());
    let parts: Vec<&str> = s.trim().split(',').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let mut xyz = [0usize; 3];
    for (slot, part) in xyz.iter_mut().zip(&parts) {
        *slot = part.trim().parse().map_err(|_| invalid())?;
    }
    Ok(Coord::new(xyz[0], xyz[1], xyz[2]))
}

/// Formats a line as space-separated coordinates.
pub fn format_line(line: &Line) -> String {
    line.cells()
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a position string into a board.
///
/// The notation carries no side to move. When `x` has one stone more than
/// `o`, the board records `X` as the opener; otherwise `O`.
pub fn parse_position(s: &str) -> Result<Board, NotationError> {
    let (size_str, layers_str) = s.trim().split_once(':').ok_or(NotationError::MissingSize)?;
    let n: usize = size_str
        .parse()
        .map_err(|_| NotationError::InvalidSize(size_str.to_string()))?;
    let mut board = Board::new(n)?;

    let layers: Vec<&str> = layers_str.split('/').collect();
    if layers.len() != n {
        return Err(NotationError::WrongLayerCount {
            expected: n,
            got: layers.len(),
        });
    }

    for (z, layer) in layers.iter().enumerate() {
        let got = layer.chars().count();
        if got != n * n {
            return Err(NotationError::WrongLayerLength {
                layer: z,
                expected: n * n,
                got,
            });
        }
        for (i, ch) in layer.chars().enumerate() {
            let value = match ch {
                '.' => None,
                other => Some(Player::from_symbol(other).ok_or(NotationError::InvalidCell(other))?),
            };
            board.set_cell(z * n * n + i, value);
        }
    }

    let o = board.stone_count(Player::O);
    let x = board.stone_count(Player::X);
    if o.abs_diff(x) > 1 {
        return Err(NotationError::Unbalanced { o, x });
    }
    if x > o {
        board.set_opener(Player::X);
    }

    Ok(board)
}

/// Encodes a board in position notation.
pub fn encode_position(board: &Board) -> String {
    let n = board.size();
    let layers: Vec<String> = board
        .cells()
        .chunks(n * n)
        .map(|layer| {
            layer
                .iter()
                .map(|cell| cell.map_or('.', Player::symbol))
                .collect()
        })
        .collect();
    format!("{}:{}", n, layers.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_coord() {
        assert_eq!(parse_coord("2,0,1").unwrap(), Coord::new(2, 0, 1));
        assert_eq!(parse_coord(" 3, 3 ,0 ").unwrap(), Coord::new(3, 3, 0));
    }

    #[test]
    fn reject_bad_coords() {
        for bad in ["", "1,2", "1,2,3,4", "a,b,c", "-1,0,0", "1;2;3"] {
            assert!(
                matches!(parse_coord(bad), Err(NotationError::InvalidCoordinate(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn parse_two_cube_example() {
        let board = parse_position("2:o.../...x").unwrap();
        assert_eq!(board.size(), 2);
        assert_eq!(board.cell(Coord::new(0, 0, 0)), Some(Player::O));
        assert_eq!(board.cell(Coord::new(1, 1, 1)), Some(Player::X));
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn layer_order_is_y_then_x() {
        // Second character of layer 1 is (1,0,1); fourth is (0,1,1) on a 2-cube.
        let board = parse_position("2:..../.o.x").unwrap();
        assert_eq!(board.cell(Coord::new(1, 0, 1)), Some(Player::O));
        assert_eq!(board.cell(Coord::new(1, 1, 1)), Some(Player::X));
    }

    #[test]
    fn encode_matches_parse() {
        let text = "3:o..x...../....o..../........x";
        let board = parse_position(text).unwrap();
        assert_eq!(encode_position(&board), text);
    }

    #[test]
    fn encode_empty_board() {
        let board = Board::new(2).unwrap();
        assert_eq!(encode_position(&board), "2:..../....");
    }

    #[test]
    fn error_missing_size() {
        assert_eq!(parse_position("..../...."), Err(NotationError::MissingSize));
    }

    #[test]
    fn error_bad_size() {
        assert!(matches!(
            parse_position("q:...."),
            Err(NotationError::InvalidSize(_))
        ));
        assert_eq!(
            parse_position("1:."),
            Err(NotationError::Board(BoardError::InvalidSize(1)))
        );
    }

    #[test]
    fn error_wrong_layer_count() {
        assert_eq!(
            parse_position("2:...."),
            Err(NotationError::WrongLayerCount {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn error_wrong_layer_length() {
        assert_eq!(
            parse_position("2:..../..."),
            Err(NotationError::WrongLayerLength {
                layer: 1,
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn error_invalid_cell() {
        assert_eq!(
            parse_position("2:..q./...."),
            Err(NotationError::InvalidCell('q'))
        );
    }

    #[test]
    fn error_unbalanced() {
        assert_eq!(
            parse_position("2:ooo./...."),
            Err(NotationError::Unbalanced { o: 3, x: 0 })
        );
    }

    #[test]
    fn extra_x_stone_means_x_opened() {
        let board = parse_position("2:x.../....").unwrap();
        assert_eq!(board.opener(), Player::X);
        assert_eq!(board.side_to_move(), Player::O);

        let board = parse_position("2:xo../....").unwrap();
        assert_eq!(board.opener(), Player::O);
        assert_eq!(board.side_to_move(), Player::O);
    }

    #[test]
    fn format_winning_line() {
        let board = parse_position("2:oo../x...").unwrap();
        let line = board.check_winner(Player::O).unwrap();
        assert_eq!(format_line(line), "0,0,0 1,0,0");
    }
}
