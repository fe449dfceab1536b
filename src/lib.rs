pub mod action_log;
pub mod advisor;
pub mod config;
pub mod display;
pub mod engine;
pub mod grid;
pub mod heuristics;
pub mod knowledge;
pub mod pathfinding;
pub mod rng;
pub mod save_state;
pub mod session;
pub mod world;

pub use engine::{apply, apply_with, classify, Action, GameEvent};
pub use grid::{Cell, Direction, Grid, Position, Safety};
pub use heuristics::{actions_to_face, hint, policy};
pub use knowledge::{infer, most_promising_cell, safety_score};
pub use pathfinding::{astar, dfs, SearchGrid, SearchResult};
pub use rng::GameRng;
pub use session::Session;
pub use world::{GameState, Percepts, WorldParams};
