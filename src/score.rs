use std::collections::BTreeMap;

use serde::Serialize;

use crate::roster::Team;

pub const CORRECT_POINTS: i32 = 2;
pub const SKIP_PENALTY: i32 = -1;

/// Running total per team. Totals are unbounded and may go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBoard {
    totals: BTreeMap<Team, i32>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            totals: Team::ALL.iter().map(|&t| (t, 0)).collect(),
        }
    }

    pub fn award(&mut self, team: Team) {
        *self.totals.entry(team).or_default() += CORRECT_POINTS;
    }

    pub fn penalize(&mut self, team: Team) {
        *self.totals.entry(team).or_default() += SKIP_PENALTY;
    }

    pub fn score(&self, team: Team) -> i32 {
        self.totals.get(&team).copied().unwrap_or(0)
    }

    /// `(team A, team B)`
    pub fn pair(&self) -> (i32, i32) {
        (self.score(Team::A), self.score(Team::B))
    }

    /// `None` on a draw.
    pub fn leader(&self) -> Option<Team> {
        let (a, b) = self.pair();
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(Team::A),
            std::cmp::Ordering::Less => Some(Team::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn reset(&mut self) {
        for total in self.totals.values_mut() {
            *total = 0;
        }
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
