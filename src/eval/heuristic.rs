//! Heuristic position evaluation.
//!
//! Scores a board from one player's perspective, larger being better for
//! that player. The score is a sum of up to three terms:
//!
//! - Line potential: every line still open to exactly one side contributes
//!   `base^stones`, boosted when the line is one stone short of a win, and
//!   counted negative (times a penalty multiplier) for the opponent.
//! - Positional: each owned cell earns a bonus depending on its role
//!   (corner, edge, center, plain).
//! - Mobility: `k * empty cells`, credited to the side to move.
//!
//! The last two terms only apply under [`Strategy::LayeredPositional`].
//!
//! Design: integer arithmetic only, saturating, and clamped strictly inside
//! `(-WIN_SCORE, WIN_SCORE)` so that no static estimate can tie a proven
//! result. The line scan walks the catalog's flat index table and never
//! allocates.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord, Player};

use super::positional::{CellRole, PositionalTable};

/// Score of a completed line for the evaluated side.
pub const WIN_SCORE: i64 = 1_000_000_000;

/// Largest magnitude a heuristic score may take.
pub const MAX_HEURISTIC: i64 = WIN_SCORE - 1;

/// Extra terms enabled on top of line potential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredConfig {
    pub enable_positional: bool,
    pub enable_mobility: bool,
    pub mobility_weight: i64,
    /// Overrides [`PositionalTable::for_size`] when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positional_bonus_table: Option<PositionalTable>,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        LayeredConfig {
            enable_positional: true,
            enable_mobility: true,
            mobility_weight: 1,
            positional_bonus_table: None,
        }
    }
}

/// Which terms the evaluator combines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Line potential only.
    Simple,
    /// Line potential plus the optional positional and mobility terms.
    LayeredPositional(LayeredConfig),
}

impl Strategy {
    /// Parses a strategy name as used by `setoption name Strategy`.
    pub fn from_name(name: &str) -> Option<Strategy> {
        match name.to_ascii_lowercase().as_str() {
            "simple" => Some(Strategy::Simple),
            "layered" | "layered_positional" => {
                Some(Strategy::LayeredPositional(LayeredConfig::default()))
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Simple => "simple",
            Strategy::LayeredPositional(_) => "layered",
        }
    }
}

/// Evaluation weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Base of the exponential line reward.
    pub line_weight_base: i64,
    /// Multiplier applied to lines held only by the opponent.
    pub opponent_penalty_multiplier: i64,
    /// Multiplier applied to lines one stone short of completion.
    pub immediate_threat_multiplier: i64,
    pub strategy: Strategy,
}

impl Default for EvalConfig {
    /// Plain line counting: `10^stones`, symmetric, no threat boost.
    fn default() -> Self {
        EvalConfig {
            line_weight_base: 10,
            opponent_penalty_multiplier: 1,
            immediate_threat_multiplier: 1,
            strategy: Strategy::Simple,
        }
    }
}

impl EvalConfig {
    /// Line potential with a threat boost, positional and mobility terms.
    pub fn layered() -> Self {
        EvalConfig {
            line_weight_base: 10,
            opponent_penalty_multiplier: 2,
            immediate_threat_multiplier: 5,
            strategy: Strategy::LayeredPositional(LayeredConfig::default()),
        }
    }
}

/// Scores `board` for `player`. Larger is better for `player`.
pub fn evaluate(player: Player, board: &Board, config: &EvalConfig) -> i64 {
    let mut score = line_potential(player, board, config);

    if let Strategy::LayeredPositional(layered) = &config.strategy {
        if layered.enable_positional {
            let table = layered
                .positional_bonus_table
                .unwrap_or_else(|| PositionalTable::for_size(board.size()));
            score = score.saturating_add(positional(player, board, &table));
        }
        if layered.enable_mobility {
            score = score.saturating_add(mobility(player, board, layered.mobility_weight));
        }
    }

    score.clamp(-MAX_HEURISTIC, MAX_HEURISTIC)
}

/// Evaluates the position for both players, indexed by player identifier.
pub fn evaluate_all(board: &Board, config: &EvalConfig) -> [i64; 2] {
    [
        evaluate(Player::O, board, config),
        evaluate(Player::X, board, config),
    ]
}

/// Sums the reward of every line open to a single side.
fn line_potential(player: Player, board: &Board, config: &EvalConfig) -> i64 {
    let own = Some(player);
    let opp = Some(player.opponent());
    let cells = board.cells();
    let threat_len = board.size() - 1;
    let base = config.line_weight_base;

    let mut score: i64 = 0;
    for line in board.catalog().iter_indices() {
        let mut pc = 0usize;
        let mut oc = 0usize;
        for &i in line {
            let cell = cells[i];
            if cell == own {
                pc += 1;
            } else if cell == opp {
                oc += 1;
            }
        }

        if pc > 0 && oc == 0 {
            let mut value = base.saturating_pow(pc as u32);
            if pc == threat_len {
                value = value.saturating_mul(config.immediate_threat_multiplier);
            }
            score = score.saturating_add(value);
        } else if oc > 0 && pc == 0 {
            let mut value = base
                .saturating_pow(oc as u32)
                .saturating_mul(config.opponent_penalty_multiplier);
            if oc == threat_len {
                value = value.saturating_mul(config.immediate_threat_multiplier);
            }
            score = score.saturating_sub(value);
        }
    }
    score
}

/// Role bonus for own cells minus role bonus for opponent cells.
fn positional(player: Player, board: &Board, table: &PositionalTable) -> i64 {
    let n = board.size();
    let centers = board.catalog().centers();
    let mut score: i64 = 0;
    for (i, cell) in board.cells().iter().enumerate() {
        let Some(owner) = cell else { continue };
        let role = CellRole::of(Coord::from_index(i, n), n, centers);
        let bonus = table.bonus(role);
        if *owner == player {
            score = score.saturating_add(bonus);
        } else {
            score = score.saturating_sub(bonus);
        }
    }
    score
}

/// Open cells, credited to the side to move.
fn mobility(player: Player, board: &Board, weight: i64) -> i64 {
    let open = weight.saturating_mul(board.available_count() as i64);
    if board.side_to_move() == player {
        open
    } else {
        -open
    }
}
