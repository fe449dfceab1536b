use crate::engine::{Action, GameEvent};
use crate::grid::{Direction, Position};
use crate::world::GameState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// One applied action and where it left the agent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedAction {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub action: Action,
    pub position: Position,
    pub direction: Direction,
    pub score: i32,
    pub event: Option<GameEvent>,
}

/// Action logger
pub struct ActionLog {
    start_time: Instant,
    actions: Vec<LoggedAction>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            start_time: Instant::now(),
            actions: Vec::new(),
        }
    }

    /// Record `action` together with the state it produced
    pub fn log(&mut self, action: Action, result: &GameState, event: Option<GameEvent>) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;

        self.actions.push(LoggedAction {
            timestamp_ms,
            action,
            position: result.agent_position,
            direction: result.agent_direction,
            score: result.score,
            event,
        });
    }

    /// Drop the most recent entry (used when an action is undone)
    pub fn pop(&mut self) -> Option<LoggedAction> {
        self.actions.pop()
    }

    pub fn get_actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.actions)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Print log to console
    pub fn print(&self) {
        println!("\n=== Action Log ({} events) ===", self.actions.len());
        for (i, logged) in self.actions.iter().enumerate() {
            let event = logged.event.map(|e| format!(" [{:?}]", e)).unwrap_or_default();
            println!(
                "[{:6}ms] #{:3} {:<11} -> {} facing {}, score {}{}",
                logged.timestamp_ms,
                i + 1,
                logged.action.token(),
                logged.position,
                logged.direction,
                logged.score,
                event
            );
        }
        println!("=== End of Log ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut per_action: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut deaths = 0;
        let mut wins = 0;
        let mut bumps = 0;
        let mut kills = 0;

        for logged in &self.actions {
            *per_action.entry(logged.action.token()).or_insert(0) += 1;
            match logged.event {
                Some(GameEvent::Died) => deaths += 1,
                Some(GameEvent::Won) => wins += 1,
                Some(GameEvent::Bumped) => bumps += 1,
                Some(GameEvent::Scream) => kills += 1,
                None => {}
            }
        }

        let duration = self.actions.last().map(|l| l.timestamp_ms).unwrap_or(0);
        let final_score = self.actions.last().map(|l| l.score).unwrap_or(0);
        let counts = per_action
            .iter()
            .map(|(token, n)| format!("{} {}", n, token))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Session Duration: {}ms\n\
             Total Actions: {} ({})\n\
             Events: {} deaths, {} wins, {} bumps, {} wumpus kills\n\
             Final Score: {}",
            duration,
            self.actions.len(),
            if counts.is_empty() { "none".to_string() } else { counts },
            deaths,
            wins,
            bumps,
            kills,
            final_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_log_and_summary() {
        let state = GameState::from_grid(Grid::new(3));
        let mut log = ActionLog::new();
        assert!(log.summary().contains("Total Actions: 0 (none)"));

        log.log(Action::TurnLeft, &state, None);
        log.log(Action::MoveForward, &state, Some(GameEvent::Bumped));
        log.log(Action::MoveForward, &state, Some(GameEvent::Died));
        assert_eq!(log.len(), 3);

        let summary = log.summary();
        assert!(summary.contains("Total Actions: 3"), "{}", summary);
        assert!(summary.contains("2 moveForward"), "{}", summary);
        assert!(summary.contains("1 deaths"), "{}", summary);
        assert!(summary.contains("1 bumps"), "{}", summary);

        assert_eq!(log.pop().map(|l| l.event), Some(Some(GameEvent::Died)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_save_to_file() {
        let state = GameState::from_grid(Grid::new(3));
        let mut log = ActionLog::new();
        log.log(Action::Shoot, &state, Some(GameEvent::Scream));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        log.save_to_file(&path).unwrap();

        let loaded: Vec<LoggedAction> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, log.get_actions());
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"shoot\""));
    }
}
