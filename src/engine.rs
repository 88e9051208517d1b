//! The round/turn state machine.
//!
//! ```text
//! Setup --start_game--> ReadyGate --mark_ready--> ActiveRound
//!   ^                      ^                          |
//!   |                      +------- end of round -----+
//!   |                                                 |
//!   +------ back_to_setup / reset_game ---- GameOver <+
//! ```
//!
//! A round ends either when the clock runs out or when the hint-giver ends
//! it early; both go through the same bookkeeping. The game is over once
//! every player has had one turn, so teams of unequal size get unequal
//! numbers of turns.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    clock::{ClockEvent, RoundClock},
    error::Rejected,
    history::{HistoryEvent, HistoryLog},
    rng::GameRng,
    roster::{Player, Roster, Team, TurnOrder},
    score::ScoreBoard,
    words::{WordList, WordQueue, PLACEHOLDER},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum Phase {
    Setup,
    ReadyGate,
    ActiveRound,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Correct,
    Skipped,
}

/// What happened when a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub team: Team,
    pub remaining_seconds: u32,
    pub game_over: bool,
}

/// All state of one play-through. Only [`TurnEngine`] mutates it; everyone
/// else gets a shared reference.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: Phase,
    pub roster: Roster,
    pub words: WordQueue,
    pub clock: RoundClock,
    pub scores: ScoreBoard,
    pub history: HistoryLog,
    pub turn_order: TurnOrder,
    pub current_team: Team,
    pub turns_played: usize,
}

#[derive(Debug)]
pub struct TurnEngine {
    session: GameSession,
    rng: GameRng,
}

impl TurnEngine {
    pub fn new(words: WordList, round_secs: u32, mut rng: GameRng) -> Result<Self, Rejected> {
        let clock = RoundClock::new(round_secs)?;
        let words = WordQueue::shuffled(words.words, &mut rng);

        Ok(Self {
            session: GameSession {
                phase: Phase::Setup,
                roster: Roster::new(),
                words,
                clock,
                scores: ScoreBoard::new(),
                history: HistoryLog::new(),
                turn_order: TurnOrder::new(),
                current_team: Team::A,
                turns_played: 0,
            },
            rng,
        })
    }

    // ----- roster -----

    pub fn add_player(&mut self, name: &str) -> Result<usize, Rejected> {
        let position = self.session.roster.add(name).inspect_err(log_rejected)?;
        debug!(position, name = name.trim(), "player added");
        Ok(position)
    }

    /// Allowed in every phase; a team that empties mid-game simply has no
    /// hint-giver until someone joins it.
    pub fn remove_player(&mut self, position: usize) -> Result<Player, Rejected> {
        let player = self.session.roster.remove(position).inspect_err(log_rejected)?;
        debug!(position, name = %player.name, "player removed");
        Ok(player)
    }

    pub fn assign_team(&mut self, position: usize, team: Team) -> Result<(), Rejected> {
        self.expect_phase(Phase::Setup)?;
        self.session
            .roster
            .assign(position, team)
            .inspect_err(log_rejected)
    }

    pub fn randomize_teams(&mut self) -> Result<(), Rejected> {
        self.expect_phase(Phase::Setup)?;
        self.session.roster.randomize_teams(&mut self.rng);
        debug!(
            team_a = self.session.roster.team_size(Team::A),
            team_b = self.session.roster.team_size(Team::B),
            "teams drawn"
        );
        Ok(())
    }

    pub fn set_round_duration(&mut self, secs: u32) -> Result<(), Rejected> {
        if self.session.phase == Phase::ActiveRound {
            return Err(self.wrong_phase(Phase::Setup));
        }
        self.session.clock.reconfigure(secs).inspect_err(log_rejected)?;
        debug!(secs, "round duration set");
        Ok(())
    }

    // ----- phase transitions -----

    pub fn start_game(&mut self) -> Result<(), Rejected> {
        self.expect_phase(Phase::Setup)?;
        if let Some(&empty) = Team::ALL
            .iter()
            .find(|&&team| self.session.roster.team_size(team) == 0)
        {
            let err = Rejected::EmptyTeam(empty);
            log_rejected(&err);
            return Err(err);
        }

        let s = &mut self.session;
        s.scores.reset();
        s.current_team = Team::A;
        s.turn_order.reset();
        s.clock.reset();
        s.history.clear();
        s.turns_played = 0;
        if s.words.is_empty() {
            s.words.reshuffle(&mut self.rng);
        }
        s.phase = Phase::ReadyGate;

        info!(players = s.roster.len(), round_secs = s.clock.duration(), "game started");
        Ok(())
    }

    pub fn mark_ready(&mut self) -> Result<(), Rejected> {
        self.expect_phase(Phase::ReadyGate)?;
        let s = &mut self.session;
        s.clock.reset();
        s.clock.start();
        s.phase = Phase::ActiveRound;
        info!(team = %s.current_team, "round started");
        Ok(())
    }

    pub fn correct(&mut self) -> Result<(), Rejected> {
        self.adjudicate(Verdict::Correct)
    }

    pub fn skip(&mut self) -> Result<(), Rejected> {
        self.adjudicate(Verdict::Skipped)
    }

    pub fn pause(&mut self) -> Result<(), Rejected> {
        self.expect_phase(Phase::ActiveRound)?;
        self.session.clock.pause();
        debug!(remaining = self.session.clock.remaining(), "round paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), Rejected> {
        self.expect_phase(Phase::ActiveRound)?;
        self.session.clock.resume();
        debug!(remaining = self.session.clock.remaining(), "round resumed");
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<(), Rejected> {
        if self.session.clock.is_running() {
            self.pause()
        } else {
            self.resume()
        }
    }

    pub fn end_turn_early(&mut self) -> Result<RoundSummary, Rejected> {
        self.expect_phase(Phase::ActiveRound)?;
        Ok(self.end_round())
    }

    /// One elapsed second of round time.
    pub fn tick(&mut self) -> Option<RoundSummary> {
        if self.session.phase != Phase::ActiveRound {
            return None;
        }
        match self.session.clock.tick() {
            Some(ClockEvent::Expired) => Some(self.end_round()),
            _ => None,
        }
    }

    /// Wall time reported by the runtime; fires whole-second ticks.
    pub fn advance_clock(&mut self, elapsed: Duration) -> Option<RoundSummary> {
        if self.session.phase != Phase::ActiveRound {
            return None;
        }
        match self.session.clock.advance(elapsed) {
            Some(ClockEvent::Expired) => Some(self.end_round()),
            _ => None,
        }
    }

    /// Leaves the play-through; scores and history stay visible until the
    /// next `start_game`.
    pub fn back_to_setup(&mut self) {
        self.session.clock.pause();
        self.session.phase = Phase::Setup;
        info!("back to setup");
    }

    /// Wipes the play-through but keeps players and teams.
    pub fn reset_game(&mut self) {
        let s = &mut self.session;
        s.clock.reset();
        s.words.reshuffle(&mut self.rng);
        s.scores.reset();
        s.history.clear();
        s.turn_order.reset();
        s.current_team = Team::A;
        s.turns_played = 0;
        s.phase = Phase::Setup;
        info!("game reset");
    }

    // ----- observers -----

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.session.roster
    }

    pub fn current_team(&self) -> Team {
        self.session.current_team
    }

    pub fn hint_giver(&self, team: Team) -> Option<&Player> {
        self.session
            .roster
            .hint_giver(team, self.session.turn_order.pointer(team))
    }

    pub fn current_hint_giver(&self) -> Option<&Player> {
        self.hint_giver(self.session.current_team)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.session.clock.remaining()
    }

    pub fn round_duration(&self) -> u32 {
        self.session.clock.duration()
    }

    pub fn is_running(&self) -> bool {
        self.session.clock.is_running()
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.session.scores
    }

    /// Only defined while a round is being played.
    pub fn current_word(&self) -> Option<&str> {
        match self.session.phase {
            Phase::ActiveRound => self.session.words.current(),
            _ => None,
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.session.history
    }

    pub fn turns_played(&self) -> usize {
        self.session.turns_played
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let names = |team: Option<Team>| -> Vec<String> {
            self.session
                .roster
                .players()
                .iter()
                .filter(|p| p.team == team)
                .map(|p| p.name.clone())
                .collect()
        };

        GameSnapshot {
            phase: self.session.phase,
            team_a: names(Some(Team::A)),
            team_b: names(Some(Team::B)),
            unassigned: names(None),
            current_team: self.session.current_team,
            hint_giver: self.current_hint_giver().map(|p| p.name.clone()),
            remaining_seconds: self.remaining_seconds(),
            round_duration: self.round_duration(),
            running: self.is_running(),
            scores: self.session.scores.pair(),
            current_word: self.current_word().map(str::to_string),
            turns_played: self.session.turns_played,
            total_turns: self.session.roster.len(),
            history: self.session.history.events().to_vec(),
        }
    }

    // ----- internals -----

    fn adjudicate(&mut self, verdict: Verdict) -> Result<(), Rejected> {
        self.expect_phase(Phase::ActiveRound)?;
        if !self.session.clock.is_running() {
            log_rejected(&Rejected::ClockStopped);
            return Err(Rejected::ClockStopped);
        }

        let s = &mut self.session;
        let team = s.current_team;
        let word = s.words.current().unwrap_or(PLACEHOLDER).to_string();
        debug!(%team, %word, ?verdict, "word adjudicated");

        let event = match verdict {
            Verdict::Correct => {
                s.scores.award(team);
                HistoryEvent::Correct { team, word }
            }
            Verdict::Skipped => {
                s.scores.penalize(team);
                HistoryEvent::Skipped { team, word }
            }
        };
        s.history.record(event);
        s.words.advance(&mut self.rng);
        Ok(())
    }

    fn end_round(&mut self) -> RoundSummary {
        let s = &mut self.session;
        s.clock.pause();

        let team = s.current_team;
        let remaining_seconds = s.clock.remaining();
        s.history.record(HistoryEvent::RoundEnded {
            team,
            remaining_seconds,
        });
        s.turns_played += 1;

        let game_over = s.turns_played >= s.roster.len();
        if game_over {
            s.phase = Phase::GameOver;
            let (a, b) = s.scores.pair();
            info!(turns = s.turns_played, team_a = a, team_b = b, "game over");
        } else {
            let size = s.roster.team_size(team);
            s.turn_order.advance(team, size);
            s.current_team = team.other();
            s.phase = Phase::ReadyGate;
            info!(%team, remaining_seconds, turns = s.turns_played, "round ended");
        }

        RoundSummary {
            team,
            remaining_seconds,
            game_over,
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), Rejected> {
        if self.session.phase == expected {
            Ok(())
        } else {
            Err(self.wrong_phase(expected))
        }
    }

    fn wrong_phase(&self, expected: Phase) -> Rejected {
        let err = Rejected::WrongPhase {
            expected,
            actual: self.session.phase,
        };
        log_rejected(&err);
        err
    }
}

fn log_rejected(err: &Rejected) {
    debug!(%err, "intent rejected");
}

/// Read-only view handed to the presentation layer after each intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub unassigned: Vec<String>,
    pub current_team: Team,
    pub hint_giver: Option<String>,
    pub remaining_seconds: u32,
    pub round_duration: u32,
    pub running: bool,
    pub scores: (i32, i32),
    pub current_word: Option<String>,
    pub turns_played: usize,
    pub total_turns: usize,
    pub history: Vec<HistoryEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn engine_with(words: &[&str], secs: u32) -> TurnEngine {
        let list = WordList::new("test", words.iter().map(|w| w.to_string()).collect());
        TurnEngine::new(list, secs, GameRng::seeded(42)).unwrap()
    }

    /// A1, A2 on Team A; B1 on Team B.
    fn three_player_engine() -> TurnEngine {
        let mut engine = engine_with(&["pies", "kot", "dom", "las"], 60);
        for (name, team) in [("A1", Team::A), ("A2", Team::A), ("B1", Team::B)] {
            let pos = engine.add_player(name).unwrap();
            engine.assign_team(pos, team).unwrap();
        }
        engine
    }

    fn active_round() -> TurnEngine {
        let mut engine = three_player_engine();
        engine.start_game().unwrap();
        engine.mark_ready().unwrap();
        engine
    }

    #[test]
    fn starts_in_setup() {
        let engine = engine_with(&["a"], 60);
        assert_eq!(engine.phase(), Phase::Setup);
        assert_eq!(engine.remaining_seconds(), 60);
        assert_eq!(engine.current_word(), None);
    }

    #[test]
    fn zero_duration_is_rejected_at_construction() {
        let list = WordList::new("t", vec![]);
        assert_matches!(
            TurnEngine::new(list, 0, GameRng::seeded(1)),
            Err(Rejected::InvalidDuration(0))
        );
    }

    #[test]
    fn start_requires_both_teams() {
        let mut engine = engine_with(&["a"], 60);
        let pos = engine.add_player("A1").unwrap();
        engine.assign_team(pos, Team::A).unwrap();
        let before = engine.snapshot();

        assert_matches!(engine.start_game(), Err(Rejected::EmptyTeam(Team::B)));
        assert_eq!(engine.phase(), Phase::Setup);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn unassigned_players_do_not_count_as_a_team() {
        let mut engine = engine_with(&["a"], 60);
        engine.add_player("x").unwrap();
        engine.add_player("y").unwrap();
        assert_matches!(engine.start_game(), Err(Rejected::EmptyTeam(Team::A)));
    }

    #[test]
    fn start_game_enters_ready_gate_with_clean_state() {
        let mut engine = three_player_engine();
        engine.start_game().unwrap();

        assert_eq!(engine.phase(), Phase::ReadyGate);
        assert_eq!(engine.current_team(), Team::A);
        assert_eq!(engine.current_hint_giver().unwrap().name, "A1");
        assert_eq!(engine.scores().pair(), (0, 0));
        assert!(engine.history().is_empty());
        assert!(!engine.is_running());
        assert_matches!(engine.start_game(), Err(Rejected::WrongPhase { .. }));
    }

    #[test]
    fn mark_ready_starts_a_full_clock() {
        let engine = active_round();
        assert_eq!(engine.phase(), Phase::ActiveRound);
        assert!(engine.is_running());
        assert_eq!(engine.remaining_seconds(), 60);
        assert!(engine.current_word().is_some());
    }

    #[test]
    fn scoring_correct_for_a_then_skip_for_b() {
        let mut engine = active_round();
        engine.correct().unwrap();
        assert_eq!(engine.scores().pair(), (2, 0));

        engine.end_turn_early().unwrap();
        engine.mark_ready().unwrap();
        engine.skip().unwrap();
        assert_eq!(engine.scores().pair(), (2, -1));
    }

    #[test]
    fn adjudication_records_the_word_before_advancing() {
        let mut engine = active_round();
        let first = engine.current_word().unwrap().to_string();

        engine.skip().unwrap();

        assert_eq!(
            engine.history().events(),
            &[HistoryEvent::Skipped {
                team: Team::A,
                word: first.clone()
            }]
        );
        assert_eq!(engine.session().words.cursor(), 1);
    }

    #[test]
    fn adjudication_needs_a_running_clock() {
        let mut engine = active_round();
        engine.pause().unwrap();

        assert_matches!(engine.correct(), Err(Rejected::ClockStopped));
        assert_matches!(engine.skip(), Err(Rejected::ClockStopped));
        assert_eq!(engine.scores().pair(), (0, 0));
        assert!(engine.history().is_empty());

        engine.resume().unwrap();
        engine.correct().unwrap();
        assert_eq!(engine.scores().pair(), (2, 0));
    }

    #[test]
    fn adjudication_outside_a_round_is_rejected() {
        let mut engine = three_player_engine();
        assert_matches!(engine.correct(), Err(Rejected::WrongPhase { .. }));
        engine.start_game().unwrap();
        assert_matches!(engine.skip(), Err(Rejected::WrongPhase { .. }));
    }

    #[test]
    fn pause_keeps_phase_and_time() {
        let mut engine = active_round();
        engine.tick();
        engine.toggle_pause().unwrap();

        assert_eq!(engine.phase(), Phase::ActiveRound);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_seconds(), 59);
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.remaining_seconds(), 59);

        engine.toggle_pause().unwrap();
        assert!(engine.is_running());
    }

    #[test]
    fn timeout_ends_the_round_at_exactly_zero() {
        let mut engine = active_round();
        for _ in 0..59 {
            assert_eq!(engine.tick(), None);
        }
        let summary = engine.tick().unwrap();

        assert_eq!(summary.remaining_seconds, 0);
        assert_eq!(summary.team, Team::A);
        assert!(!summary.game_over);
        assert_eq!(
            engine.history().events().last(),
            Some(&HistoryEvent::RoundEnded {
                team: Team::A,
                remaining_seconds: 0
            })
        );
        assert_eq!(engine.phase(), Phase::ReadyGate);
    }

    #[test]
    fn advance_clock_drives_expiry() {
        let mut engine = active_round();
        assert_eq!(engine.advance_clock(Duration::from_secs(30)), None);
        assert_eq!(engine.remaining_seconds(), 30);

        let summary = engine.advance_clock(Duration::from_secs(45)).unwrap();
        assert_eq!(summary.remaining_seconds, 0);
        assert_eq!(engine.phase(), Phase::ReadyGate);
    }

    #[test]
    fn next_round_starts_from_a_fresh_clock() {
        let mut engine = active_round();
        engine.advance_clock(Duration::from_millis(10_500));
        engine.end_turn_early().unwrap();
        engine.mark_ready().unwrap();

        assert_eq!(engine.remaining_seconds(), 60);
        assert_eq!(engine.advance_clock(Duration::from_millis(600)), None);
        assert_eq!(engine.remaining_seconds(), 60);
    }

    #[test]
    fn game_ends_after_one_turn_per_player() {
        let mut engine = active_round();

        let first = engine.end_turn_early().unwrap();
        assert!(!first.game_over);
        engine.mark_ready().unwrap();
        let second = engine.end_turn_early().unwrap();
        assert!(!second.game_over);
        assert_eq!(engine.phase(), Phase::ReadyGate);

        engine.mark_ready().unwrap();
        let third = engine.end_turn_early().unwrap();
        assert!(third.game_over);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.turns_played(), 3);
    }

    #[test]
    fn hint_givers_rotate_within_each_team() {
        let mut engine = active_round();
        let mut givers = vec![engine.current_hint_giver().unwrap().name.clone()];
        for _ in 0..2 {
            engine.end_turn_early().unwrap();
            givers.push(engine.current_hint_giver().unwrap().name.clone());
            engine.mark_ready().unwrap();
        }
        assert_eq!(givers, vec!["A1", "B1", "A2"]);
    }

    #[test]
    fn game_over_rejects_gameplay_intents() {
        let mut engine = active_round();
        for _ in 0..3 {
            if engine.phase() == Phase::ReadyGate {
                engine.mark_ready().unwrap();
            }
            engine.end_turn_early().unwrap();
        }
        assert_eq!(engine.phase(), Phase::GameOver);

        assert_matches!(engine.mark_ready(), Err(Rejected::WrongPhase { .. }));
        assert_matches!(engine.correct(), Err(Rejected::WrongPhase { .. }));
        assert_matches!(engine.pause(), Err(Rejected::WrongPhase { .. }));
        assert_matches!(engine.end_turn_early(), Err(Rejected::WrongPhase { .. }));
        assert_eq!(engine.tick(), None);

        engine.back_to_setup();
        assert_eq!(engine.phase(), Phase::Setup);
    }

    #[test]
    fn back_to_setup_stops_the_clock() {
        let mut engine = active_round();
        engine.back_to_setup();

        assert_eq!(engine.phase(), Phase::Setup);
        assert!(!engine.is_running());
        assert_eq!(engine.tick(), None);
    }

    #[test]
    fn reset_keeps_roster_and_wipes_play_state() {
        let mut engine = active_round();
        engine.correct().unwrap();
        engine.end_turn_early().unwrap();

        engine.reset_game();

        assert_eq!(engine.phase(), Phase::Setup);
        assert_eq!(engine.roster().len(), 3);
        assert_eq!(engine.roster().team_size(Team::A), 2);
        assert_eq!(engine.scores().pair(), (0, 0));
        assert!(engine.history().is_empty());
        assert_eq!(engine.turns_played(), 0);
        assert_eq!(engine.current_team(), Team::A);
        assert_eq!(engine.session().turn_order.pointer(Team::A), 0);
        assert_eq!(engine.session().words.cursor(), 0);
        assert_eq!(engine.remaining_seconds(), 60);
    }

    #[test]
    fn round_duration_is_fixed_during_a_round() {
        let mut engine = active_round();
        assert_matches!(
            engine.set_round_duration(90),
            Err(Rejected::WrongPhase {
                actual: Phase::ActiveRound,
                ..
            })
        );

        engine.back_to_setup();
        engine.set_round_duration(90).unwrap();
        assert_eq!(engine.remaining_seconds(), 90);
        assert_matches!(engine.set_round_duration(0), Err(Rejected::InvalidDuration(0)));
    }

    #[test]
    fn team_changes_only_during_setup() {
        let mut engine = three_player_engine();
        engine.start_game().unwrap();
        assert_matches!(engine.randomize_teams(), Err(Rejected::WrongPhase { .. }));
        assert_matches!(engine.assign_team(0, Team::B), Err(Rejected::WrongPhase { .. }));
    }

    #[test]
    fn removing_a_whole_team_mid_game_does_not_panic() {
        let mut engine = active_round();
        engine.end_turn_early().unwrap();
        assert_eq!(engine.current_team(), Team::B);

        engine.remove_player(2).unwrap();
        assert!(engine.current_hint_giver().is_none());

        engine.mark_ready().unwrap();
        let summary = engine.end_turn_early().unwrap();
        assert!(summary.game_over);
    }

    #[test]
    fn empty_word_list_adjudicates_the_placeholder() {
        let mut engine = engine_with(&[], 60);
        for (name, team) in [("A1", Team::A), ("B1", Team::B)] {
            let pos = engine.add_player(name).unwrap();
            engine.assign_team(pos, team).unwrap();
        }
        engine.start_game().unwrap();
        engine.mark_ready().unwrap();

        assert_eq!(engine.current_word(), None);
        engine.correct().unwrap();
        assert_eq!(
            engine.history().events(),
            &[HistoryEvent::Correct {
                team: Team::A,
                word: PLACEHOLDER.to_string()
            }]
        );
    }

    #[test]
    fn snapshot_reflects_the_session() {
        let mut engine = active_round();
        engine.correct().unwrap();

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::ActiveRound);
        assert_eq!(snap.team_a, vec!["A1", "A2"]);
        assert_eq!(snap.team_b, vec!["B1"]);
        assert!(snap.unassigned.is_empty());
        assert_eq!(snap.hint_giver.as_deref(), Some("A1"));
        assert_eq!(snap.scores, (2, 0));
        assert_eq!(snap.total_turns, 3);
        assert!(snap.running);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["phase"], "ActiveRound");
        assert_eq!(json["history"][0]["type"], "correct");
    }
}
