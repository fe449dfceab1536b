use crate::grid::{Direction, Position, Safety};
use crate::world::GameState;

/// Arrow for the agent's facing
fn agent_glyph(dir: Direction) -> char {
    match dir {
        Direction::North => '^',
        Direction::East => '>',
        Direction::South => 'v',
        Direction::West => '<',
    }
}

/// ASCII map of what the agent knows.
///
/// `>` agent, `.` visited, `s` known safe, `W`/`P`/`!` suspected wumpus/pit/both,
/// `?` unknown. With `reveal`, true hazards and gold are drawn as `w`, `p`, `g`.
pub fn render_map(state: &GameState, reveal: bool) -> String {
    let mut out = String::new();

    for y in 0..state.grid_size {
        for x in 0..state.grid_size {
            let pos = Position::new(x, y);
            let Some(cell) = state.cell(pos) else { continue };

            let glyph = if pos == state.agent_position {
                agent_glyph(state.agent_direction)
            } else if reveal && cell.has_wumpus {
                'w'
            } else if reveal && cell.has_pit {
                'p'
            } else if reveal && cell.has_gold {
                'g'
            } else if cell.visited {
                '.'
            } else if cell.safe == Safety::Safe {
                's'
            } else if cell.possible_wumpus && cell.possible_pit {
                '!'
            } else if cell.possible_wumpus {
                'W'
            } else if cell.possible_pit {
                'P'
            } else {
                '?'
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// One-line status: position, facing, score, moves and active percepts
pub fn status_line(state: &GameState) -> String {
    let p = &state.percepts;
    let mut sensed = Vec::new();
    if p.stench {
        sensed.push("stench");
    }
    if p.breeze {
        sensed.push("breeze");
    }
    if p.glitter {
        sensed.push("glitter");
    }
    if p.bump {
        sensed.push("bump");
    }
    if p.scream {
        sensed.push("scream");
    }

    format!(
        "pos {} facing {} | score {} | moves {} | arrow {} | gold {} | percepts: {}",
        state.agent_position,
        state.agent_direction,
        state.score,
        state.moves,
        if state.has_arrow { "yes" } else { "no" },
        if state.has_gold { "yes" } else { "no" },
        if sensed.is_empty() { "none".to_string() } else { sensed.join(", ") }
    )
}
