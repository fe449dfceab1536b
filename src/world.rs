use crate::grid::{Cell, Direction, Grid, Position, Safety, MAX_GRID_SIZE};
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_GRID_SIZE: i32 = 4;
pub const DEFAULT_PIT_PROBABILITY: f64 = 0.2;

pub const MOVE_PENALTY: i32 = -1;
pub const ARROW_PENALTY: i32 = -10;
pub const WUMPUS_PENALTY: i32 = -1000;
pub const PIT_PENALTY: i32 = -1000;
pub const GOLD_REWARD: i32 = 1000;

/// Momentary sensations at the agent's cell, recomputed every step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Percepts {
    pub stench: bool,
    pub breeze: bool,
    pub glitter: bool,
    pub bump: bool,
    pub scream: bool,
}

/// Parameters for generating a fresh cave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldParams {
    pub grid_size: i32,
    pub pit_probability: f64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            pit_probability: DEFAULT_PIT_PROBABILITY,
        }
    }
}

/// Complete game state. Transitions produce a new value and leave the old one intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub grid_size: i32,
    pub agent_position: Position,
    pub agent_direction: Direction,
    pub grid: Grid,
    pub percepts: Percepts,
    pub has_arrow: bool,
    pub has_gold: bool,
    pub game_over: bool,
    pub game_won: bool,
    pub score: i32,
    pub moves: u32,
}

impl GameState {
    /// Generate a cave with the default 4x4 size and pit rate
    pub fn new_game(rng: &mut GameRng) -> Self {
        Self::generate(WorldParams::default(), rng)
    }

    /// Generate a random cave: one Wumpus, one gold, independent pits, all away from the origin
    pub fn generate(params: WorldParams, rng: &mut GameRng) -> Self {
        // Wumpus and gold need two distinct cells besides the origin
        let size = params.grid_size.clamp(2, MAX_GRID_SIZE);
        let mut grid = Grid::new(size);

        let wumpus = loop {
            let pos = Position::new(rng.below(size), rng.below(size));
            if !pos.is_origin() {
                break pos;
            }
        };

        let gold = loop {
            let pos = Position::new(rng.below(size), rng.below(size));
            if !pos.is_origin() && pos != wumpus {
                break pos;
            }
        };

        let mut pits = 0;
        for y in 0..size {
            for x in 0..size {
                let pos = Position::new(x, y);
                if pos.is_origin() || pos == wumpus || pos == gold {
                    continue;
                }
                if rng.chance(params.pit_probability) {
                    if let Some(cell) = grid.cell_mut(pos) {
                        cell.has_pit = true;
                        pits += 1;
                    }
                }
            }
        }

        if let Some(cell) = grid.cell_mut(wumpus) {
            cell.has_wumpus = true;
        }
        if let Some(cell) = grid.cell_mut(gold) {
            cell.has_gold = true;
        }

        debug!(seed = rng.seed(), size, %wumpus, %gold, pits, "generated world");

        Self::from_grid(grid)
    }

    /// Start a game on a prepared grid. The agent stands on the origin facing east.
    pub fn from_grid(mut grid: Grid) -> Self {
        if let Some(origin) = grid.cell_mut(Position::ORIGIN) {
            origin.visited = true;
            origin.safe = Safety::Safe;
        }

        let mut state = GameState {
            grid_size: grid.size,
            agent_position: Position::ORIGIN,
            agent_direction: Direction::East,
            grid,
            percepts: Percepts::default(),
            has_arrow: true,
            has_gold: false,
            game_over: false,
            game_won: false,
            score: 0,
            moves: 0,
        };
        state.percepts = state.sense();
        state
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.grid.in_bounds(pos)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.grid.cell(pos)
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.grid.cell_mut(pos)
    }

    /// The cell the agent stands on
    pub fn current_cell(&self) -> Option<&Cell> {
        self.grid.cell(self.agent_position)
    }

    /// Stench, breeze and glitter at the agent's position. Bump and scream are always false here.
    pub fn sense(&self) -> Percepts {
        let pos = self.agent_position;
        let mut percepts = Percepts {
            glitter: self.grid.cell(pos).map(|c| c.has_gold).unwrap_or(false),
            ..Percepts::default()
        };

        for (_, next) in self.grid.neighbors(pos) {
            if let Some(cell) = self.grid.cell(next) {
                percepts.stench |= cell.has_wumpus;
                percepts.breeze |= cell.has_pit;
            }
        }
        percepts
    }

    /// Recompute stench/breeze/glitter, dropping bump and scream
    pub fn refresh_percepts(&mut self) {
        self.percepts = self.sense();
    }

    pub fn visited_count(&self) -> usize {
        self.grid.count(|c| c.visited)
    }

    pub fn total_cells(&self) -> usize {
        self.grid.cells.len()
    }

    pub fn is_finished(&self) -> bool {
        self.game_over || self.game_won
    }

    pub fn wumpus_position(&self) -> Option<Position> {
        self.grid.positions().find(|&p| self.grid.cell(p).map(|c| c.has_wumpus).unwrap_or(false))
    }

    pub fn gold_position(&self) -> Option<Position> {
        self.grid.positions().find(|&p| self.grid.cell(p).map(|c| c.has_gold).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(state: &GameState, pred: impl Fn(&Cell) -> bool) -> usize {
        state.grid.count(pred)
    }

    #[test]
    fn test_generated_world_invariants() {
        for seed in 0..200 {
            let mut rng = GameRng::new(seed);
            let state = GameState::new_game(&mut rng);

            assert_eq!(count(&state, |c| c.has_wumpus), 1, "seed {}", seed);
            assert_eq!(count(&state, |c| c.has_gold), 1, "seed {}", seed);

            let wumpus = state.wumpus_position().unwrap();
            let gold = state.gold_position().unwrap();
            assert_ne!(wumpus, Position::ORIGIN);
            assert_ne!(gold, Position::ORIGIN);
            assert_ne!(wumpus, gold);

            let origin = state.cell(Position::ORIGIN).unwrap();
            assert!(!origin.is_hazard() && !origin.has_gold);
            assert!(origin.visited);
            assert_eq!(origin.safe, Safety::Safe);

            let gold_cell = state.cell(gold).unwrap();
            assert!(!gold_cell.has_pit);
            assert!(!state.cell(wumpus).unwrap().has_pit);
        }
    }

    #[test]
    fn test_initial_agent() {
        let state = GameState::new_game(&mut GameRng::new(3));
        assert_eq!(state.agent_position, Position::ORIGIN);
        assert_eq!(state.agent_direction, Direction::East);
        assert!(state.has_arrow);
        assert!(!state.has_gold);
        assert!(!state.game_over && !state.game_won);
        assert_eq!(state.score, 0);
        assert_eq!(state.moves, 0);
        assert_eq!(state.percepts, state.sense());
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new_game(&mut GameRng::new(99));
        let b = GameState::new_game(&mut GameRng::new(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_grid_clamped() {
        let params = WorldParams { grid_size: 1, pit_probability: 0.2 };
        let state = GameState::generate(params, &mut GameRng::new(5));
        assert_eq!(state.grid_size, 2);
        assert_eq!(count(&state, |c| c.has_wumpus), 1);
        assert_eq!(count(&state, |c| c.has_gold), 1);
    }

    #[test]
    fn test_huge_grid_clamped() {
        let params = WorldParams { grid_size: 50_000, pit_probability: 0.2 };
        let state = GameState::generate(params, &mut GameRng::new(5));
        assert_eq!(state.grid_size, MAX_GRID_SIZE);
        assert_eq!(state.total_cells(), (MAX_GRID_SIZE * MAX_GRID_SIZE) as usize);
    }

    #[test]
    fn test_breeze_from_pit_east_of_origin() {
        let mut grid = Grid::new(3);
        grid.cell_mut(Position::new(1, 0)).unwrap().has_pit = true;
        let state = GameState::from_grid(grid);

        assert!(state.percepts.breeze);
        assert!(!state.percepts.stench);
        assert!(!state.percepts.glitter);
    }

    #[test]
    fn test_diagonal_hazard_not_sensed() {
        let mut grid = Grid::new(3);
        grid.cell_mut(Position::new(1, 1)).unwrap().has_wumpus = true;
        let state = GameState::from_grid(grid);
        assert!(!state.percepts.stench);
    }
}
