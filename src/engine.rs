use crate::grid::Position;
use crate::knowledge::update_beliefs;
use crate::rng::GameRng;
use crate::world::{
    GameState, WorldParams, ARROW_PENALTY, GOLD_REWARD, MOVE_PENALTY, PIT_PENALTY, WUMPUS_PENALTY,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Agent actions, using the exact tokens of the external vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    MoveForward,
    TurnLeft,
    TurnRight,
    Grab,
    Shoot,
    Restart,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveForward,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Grab,
        Action::Shoot,
        Action::Restart,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Action::MoveForward => "moveForward",
            Action::TurnLeft => "turnLeft",
            Action::TurnRight => "turnRight",
            Action::Grab => "grab",
            Action::Shoot => "shoot",
            Action::Restart => "restart",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.token() == s)
            .ok_or_else(|| format!("unknown action '{}'", s))
    }
}

/// Notable outcome of a single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEvent {
    Died,
    Won,
    Bumped,
    Scream,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameEvent::Died => "Game over! You died in the cave.",
            GameEvent::Won => "You grabbed the gold and won the game!",
            GameEvent::Bumped => "Bump! You hit a wall.",
            GameEvent::Scream => "You hear a scream! Your arrow hit the Wumpus!",
        };
        f.write_str(text)
    }
}

/// Apply an action. `restart` generates a default-sized world from entropy.
pub fn apply(state: &GameState, action: Action) -> GameState {
    apply_with(state, action, WorldParams::default(), &mut GameRng::from_entropy())
}

/// Apply an action, using `params` and `rng` if the action is `restart`
pub fn apply_with(state: &GameState, action: Action, params: WorldParams, rng: &mut GameRng) -> GameState {
    let mut next = state.clone();
    next.percepts.bump = false;
    next.percepts.scream = false;

    match action {
        Action::TurnLeft => {
            next.agent_direction = state.agent_direction.turn_left();
            charge_move(&mut next);
        }
        Action::TurnRight => {
            next.agent_direction = state.agent_direction.turn_right();
            charge_move(&mut next);
        }
        Action::MoveForward => move_forward(&mut next),
        Action::Grab => grab(&mut next),
        Action::Shoot => shoot(&mut next),
        Action::Restart => return GameState::generate(params, rng),
    }

    next
}

fn charge_move(state: &mut GameState) {
    state.moves += 1;
    state.score += MOVE_PENALTY;
}

fn move_forward(state: &mut GameState) {
    let target = state.agent_position.step(state.agent_direction);

    // A bump only sets the percept: no move, no count, no charge
    if !state.in_bounds(target) {
        state.percepts.bump = true;
        return;
    }

    state.agent_position = target;
    charge_move(state);

    let (wumpus, pit) = match state.cell_mut(target) {
        Some(cell) => {
            cell.visited = true;
            (cell.has_wumpus, cell.has_pit)
        }
        None => (false, false),
    };

    if wumpus || pit {
        state.game_over = true;
        state.score += if wumpus { WUMPUS_PENALTY } else { PIT_PENALTY };
        info!(%target, wumpus, score = state.score, "agent died");
    }

    state.refresh_percepts();
    update_beliefs(state);
}

fn grab(state: &mut GameState) {
    let took = match state.cell_mut(state.agent_position) {
        Some(cell) if cell.has_gold => {
            cell.has_gold = false;
            true
        }
        _ => false,
    };

    if !took {
        return;
    }

    state.has_gold = true;
    state.percepts.glitter = false;
    state.score += GOLD_REWARD;
    state.game_won = true;
    info!(position = %state.agent_position, score = state.score, "gold grabbed");
}

fn shoot(state: &mut GameState) {
    if !state.has_arrow {
        return;
    }
    state.has_arrow = false;
    state.score += ARROW_PENALTY;

    if let Some(hit) = trace_arrow(state) {
        if let Some(cell) = state.cell_mut(hit) {
            cell.has_wumpus = false;
        }
        state.percepts.scream = true;
        // scream is momentary, so the beliefs must absorb it now
        update_beliefs(state);
        info!(%hit, "wumpus killed");
    } else {
        debug!(from = %state.agent_position, direction = %state.agent_direction, "arrow missed");
    }
}

/// Follow the arrow from the agent's cell. The agent's own cell is never a target.
fn trace_arrow(state: &GameState) -> Option<Position> {
    let mut pos = state.agent_position;
    while state.in_bounds(pos) {
        pos = pos.step(state.agent_direction);
        match state.cell(pos) {
            None => return None,
            Some(cell) if cell.has_wumpus => return Some(pos),
            Some(_) => {}
        }
    }
    None
}

/// The notification a UI would show for `prev -> next` via `action`
pub fn classify(prev: &GameState, next: &GameState, action: Action) -> Option<GameEvent> {
    if action == Action::Restart {
        return None;
    }
    if next.game_over && !prev.game_over {
        Some(GameEvent::Died)
    } else if next.game_won && !prev.game_won {
        Some(GameEvent::Won)
    } else if next.percepts.bump {
        Some(GameEvent::Bumped)
    } else if next.percepts.scream {
        Some(GameEvent::Scream)
    } else {
        None
    }
}
