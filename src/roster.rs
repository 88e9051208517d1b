use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::Rejected, rng::GameRng};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Team {
    #[strum(to_string = "Team A")]
    A,
    #[strum(to_string = "Team B")]
    B,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::A, Team::B];

    pub fn other(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub team: Option<Team>,
}

/// Everyone at the table, in roster order. A player's position is its identity.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a player without a team. Returns the new position.
    pub fn add(&mut self, name: &str) -> Result<usize, Rejected> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejected::BlankName);
        }
        self.players.push(Player {
            name: name.to_string(),
            team: None,
        });
        Ok(self.players.len() - 1)
    }

    pub fn remove(&mut self, position: usize) -> Result<Player, Rejected> {
        if position >= self.players.len() {
            return Err(Rejected::NoSuchPlayer(position));
        }
        Ok(self.players.remove(position))
    }

    pub fn assign(&mut self, position: usize, team: Team) -> Result<(), Rejected> {
        let player = self
            .players
            .get_mut(position)
            .ok_or(Rejected::NoSuchPlayer(position))?;
        player.team = Some(team);
        Ok(())
    }

    /// Shuffles the roster in place, then deals the first `ceil(n/2)` players
    /// to Team A and the rest to Team B.
    pub fn randomize_teams(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.players);
        let half = self.players.len().div_ceil(2);
        for (idx, player) in self.players.iter_mut().enumerate() {
            player.team = Some(if idx < half { Team::A } else { Team::B });
        }
    }

    /// Players of `team` in roster order.
    pub fn by_team(&self, team: Team) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.team == Some(team))
            .collect()
    }

    pub fn team_size(&self, team: Team) -> usize {
        self.players.iter().filter(|p| p.team == Some(team)).count()
    }

    /// Whose turn it is within `team` for a given turn-order pointer.
    pub fn hint_giver(&self, team: Team, pointer: usize) -> Option<&Player> {
        let members = self.by_team(team);
        if members.is_empty() {
            return None;
        }
        Some(members[pointer % members.len()])
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Per-team pointer to the next hint-giver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOrder {
    pointers: BTreeMap<Team, usize>,
}

impl TurnOrder {
    pub fn new() -> Self {
        Self {
            pointers: Team::ALL.iter().map(|&t| (t, 0)).collect(),
        }
    }

    pub fn pointer(&self, team: Team) -> usize {
        self.pointers.get(&team).copied().unwrap_or(0)
    }

    /// Moves `team` on to its next player; an empty team stays at 0.
    pub fn advance(&mut self, team: Team, team_size: usize) {
        let next = self.pointer(team) + 1;
        self.pointers.insert(team, next % team_size.max(1));
    }

    pub fn reset(&mut self) {
        for pointer in self.pointers.values_mut() {
            *pointer = 0;
        }
    }
}

impl Default for TurnOrder {
    fn default() -> Self {
        Self::new()
    }
}
