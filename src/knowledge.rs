//! Per-cell safety beliefs derived from percepts.
//!
//! Deduction is local: only the percepts at the agent's current cell are used,
//! and danger flags accumulate until the cell is visited, proven safe, or the
//! Wumpus is heard dying.

use crate::grid::{Position, Safety};
use crate::world::GameState;

pub const SCORE_OUT_OF_BOUNDS: i32 = -100;
pub const SCORE_VISITED: i32 = 10;
pub const SCORE_SAFE: i32 = 8;
pub const SCORE_BOTH_DANGERS: i32 = -5;
pub const SCORE_ONE_DANGER: i32 = -3;
pub const SCORE_UNKNOWN: i32 = 0;

/// Update beliefs from the percepts at the agent's position
pub fn infer(state: &GameState) -> GameState {
    let mut next = state.clone();
    update_beliefs(&mut next);
    next
}

/// In-place form of [`infer`], used by the transition engine on its own copy
pub(crate) fn update_beliefs(state: &mut GameState) {
    let pos = state.agent_position;
    let percepts = state.percepts;

    if let Some(cell) = state.grid.cell_mut(pos) {
        cell.mark_safe();
    }

    let neighbors: Vec<Position> = state.grid.neighbors(pos).map(|(_, p)| p).collect();

    if !percepts.stench && !percepts.breeze {
        for next in neighbors {
            if let Some(cell) = state.grid.cell_mut(next) {
                cell.mark_safe();
            }
        }
    } else {
        for next in neighbors {
            if let Some(cell) = state.grid.cell_mut(next) {
                if cell.safe == Safety::Safe {
                    continue;
                }
                cell.possible_wumpus |= percepts.stench;
                cell.possible_pit |= percepts.breeze;
            }
        }
    }

    if percepts.scream {
        for cell in state.grid.cells.iter_mut() {
            cell.possible_wumpus = false;
        }
    }
}

/// Ranking signal for a candidate cell (higher is safer). Not a probability.
pub fn safety_score(state: &GameState, pos: Position) -> i32 {
    let Some(cell) = state.cell(pos) else {
        return SCORE_OUT_OF_BOUNDS;
    };

    if cell.visited {
        return SCORE_VISITED;
    }
    match cell.safe {
        Safety::Safe => return SCORE_SAFE,
        Safety::Unsafe => return SCORE_BOTH_DANGERS,
        Safety::Unknown => {}
    }

    match (cell.possible_wumpus, cell.possible_pit) {
        (true, true) => SCORE_BOTH_DANGERS,
        (true, false) | (false, true) => SCORE_ONE_DANGER,
        (false, false) => SCORE_UNKNOWN,
    }
}

/// Highest-scoring unvisited cell; ties go to the first in row-major order
pub fn most_promising_cell(state: &GameState) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;

    for pos in state.grid.positions() {
        let visited = state.cell(pos).map(|c| c.visited).unwrap_or(true);
        if visited {
            continue;
        }
        let score = safety_score(state, pos);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((pos, score)),
        }
    }

    best.map(|(pos, _)| pos)
}
