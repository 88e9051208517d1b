use serde::Serialize;

use crate::roster::Team;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    Correct { team: Team, word: String },
    Skipped { team: Team, word: String },
    RoundEnded { team: Team, remaining_seconds: u32 },
}

impl HistoryEvent {
    pub fn team(&self) -> Team {
        match self {
            HistoryEvent::Correct { team, .. }
            | HistoryEvent::Skipped { team, .. }
            | HistoryEvent::RoundEnded { team, .. } => *team,
        }
    }
}

/// Append-only, stored oldest first.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    events: Vec<HistoryEvent>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: HistoryEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    pub fn latest_first(&self) -> impl Iterator<Item = &HistoryEvent> {
        self.events.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
