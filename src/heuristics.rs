use crate::engine::Action;
use crate::grid::{Direction, Position};
use crate::knowledge::{most_promising_cell, safety_score};
use crate::rng::GameRng;
use crate::world::GameState;

/// Turns needed to go from facing `current` to facing `target`.
///
/// A half turn is returned as two right turns; callers take one action per tick.
pub fn actions_to_face(current: Direction, target: Direction) -> Vec<Action> {
    if current == target {
        Vec::new()
    } else if current.turn_right() == target {
        vec![Action::TurnRight]
    } else if current.turn_left() == target {
        vec![Action::TurnLeft]
    } else {
        vec![Action::TurnRight, Action::TurnRight]
    }
}

/// Safest in-bounds neighbor. Visited cells are candidates only when `allow_visited`.
/// Ties keep the first direction in north/east/south/west order.
fn best_neighbor(state: &GameState, allow_visited: bool) -> Option<Direction> {
    let mut best: Option<(Direction, i32)> = None;

    for (dir, pos) in state.grid.neighbors(state.agent_position) {
        let visited = state.cell(pos).map(|c| c.visited).unwrap_or(false);
        if visited && !allow_visited {
            continue;
        }
        let score = safety_score(state, pos);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((dir, score)),
        }
    }

    best.map(|(dir, _)| dir)
}

/// Advisory hint, first matching rule wins
pub fn hint(state: &GameState) -> String {
    let percepts = &state.percepts;

    if state.has_gold {
        return "You have the gold! Head back to the starting point (0,0).".to_string();
    }
    if percepts.glitter {
        return "Something glitters here. Use 'grab' to pick up the gold.".to_string();
    }
    if percepts.stench {
        return "There is a stench. The Wumpus may be in an adjacent cell, so be careful!".to_string();
    }
    if percepts.breeze {
        return "You feel a breeze. A pit may be in an adjacent cell, so proceed with caution!".to_string();
    }

    if let Some(dir) = best_neighbor(state, false) {
        return if actions_to_face(state.agent_direction, dir).is_empty() {
            format!("Explore the {} cell. You are already facing it, so move forward.", dir)
        } else {
            format!("Explore the {} cell. Turn to face {} first.", dir, dir)
        };
    }

    if let Some(pos) = most_promising_cell(state) {
        return format!(
            "Every adjacent cell has been explored. Try heading towards {} to find new ground.",
            pos
        );
    }

    "Not sure what to do next. Keep exploring the cave!".to_string()
}

/// Greedy walk back to the origin: close the x gap facing west, then the y gap facing north
fn return_home(pos: Position, facing: Direction) -> Action {
    if pos.x > 0 && facing == Direction::West {
        return Action::MoveForward;
    }
    if pos.y > 0 && facing == Direction::North {
        return Action::MoveForward;
    }

    if pos.x > 0 {
        return match facing {
            Direction::North | Direction::East => Action::TurnLeft,
            Direction::South => Action::TurnRight,
            Direction::West => Action::MoveForward,
        };
    }
    if pos.y > 0 {
        return match facing {
            Direction::East | Direction::South => Action::TurnLeft,
            Direction::West => Action::TurnRight,
            Direction::North => Action::MoveForward,
        };
    }
    Action::MoveForward
}

/// Autonomous action for one bot tick
pub fn policy(state: &GameState, rng: &mut GameRng) -> Action {
    if state.percepts.glitter {
        return Action::Grab;
    }
    if state.has_gold && state.agent_position.is_origin() {
        return Action::Restart;
    }
    if state.has_gold {
        return return_home(state.agent_position, state.agent_direction);
    }

    if let Some(dir) = best_neighbor(state, state.has_gold) {
        return actions_to_face(state.agent_direction, dir)
            .first()
            .copied()
            .unwrap_or(Action::MoveForward);
    }

    // Boxed in with nothing to explore
    if rng.coin() {
        Action::TurnLeft
    } else {
        Action::TurnRight
    }
}
