use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;

use pword::{
    clock::ROUND_DURATIONS,
    history::HistoryEvent,
    words::PLACEHOLDER,
    Phase, Team, TurnEngine,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const HISTORY_HEIGHT: u16 = 8;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = &self.engine;
        let phase = engine.phase();

        let history_height = if phase == Phase::Setup { 0 } else { HISTORY_HEIGHT };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3),              // title
                Constraint::Min(6),                 // phase panel
                Constraint::Length(history_height), // history
                Constraint::Length(1),              // status
                Constraint::Length(1),              // legend
            ])
            .split(area);

        render_header(phase, chunks[0], buf);

        match phase {
            Phase::Setup => render_setup(self, chunks[1], buf),
            Phase::ReadyGate => render_ready_gate(engine, chunks[1], buf),
            Phase::ActiveRound => render_round(engine, chunks[1], buf),
            Phase::GameOver => render_game_over(engine, chunks[1], buf),
        }

        if phase != Phase::Setup {
            render_history(engine, chunks[2], buf);
        }

        if let Some(status) = &self.status {
            Paragraph::new(Span::styled(
                status.as_str(),
                Style::default().fg(Color::Yellow),
            ))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled(
            legend(phase),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }
}

fn render_header(phase: Phase, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::from(Span::styled(
        "pword · describe it using only words that start with P",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))];
    if phase == Phase::Setup {
        lines.push(Line::from(Span::styled(
            "One device, two teams taking turns. Hand the device to each hint-giver.",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let input_width = columns[0].width.saturating_sub(5) as usize;
    let mut players = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(tail_fitting(&app.name_input, input_width)),
            Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::default(),
    ];
    players.extend(
        engine
            .roster()
            .players()
            .iter()
            .enumerate()
            .map(|(idx, player)| {
                let team = match player.team {
                    Some(Team::A) => "A",
                    Some(Team::B) => "B",
                    None => "-",
                };
                let style = if app.selected == Some(idx) {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!("[{team}] {}", player.name), style))
            }),
    );
    Paragraph::new(players)
        .block(Block::default().borders(Borders::ALL).title("Players"))
        .render(columns[0], buf);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut durations = vec![Span::raw("Round: ")];
    let current = engine.round_duration();
    for secs in ROUND_DURATIONS {
        if secs == current {
            durations.push(Span::styled(format!("[{secs}s] "), bold.fg(Color::Green)));
        } else {
            durations.push(Span::raw(format!(" {secs}s  ")));
        }
    }
    if !ROUND_DURATIONS.contains(&current) {
        durations.push(Span::styled(format!("[{current}s]"), bold.fg(Color::Green)));
    }

    let lines = vec![
        Line::from(vec![Span::styled("Team A: ", bold), Span::raw(members(engine, Team::A))]),
        Line::from(vec![Span::styled("Team B: ", bold), Span::raw(members(engine, Team::B))]),
        Line::default(),
        Line::from(durations),
        Line::from(format!(
            "Words: {} ({})",
            app.word_list_name,
            engine.session().words.canonical().len()
        )),
    ];
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Teams"))
        .wrap(Wrap { trim: true })
        .render(columns[1], buf);
}

fn render_ready_gate(engine: &TurnEngine, area: Rect, buf: &mut Buffer) {
    let team = engine.current_team();
    let lines = vec![
        Line::from(Span::styled(
            format!("Now giving hints: {}", hint_giver_name(engine, team)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(team.to_string()),
        Line::default(),
        score_line(engine),
        Line::default(),
        Line::from(Span::styled(
            format!("Pass the device, then press (enter) to start {}s", engine.round_duration()),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Ready?"))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_round(engine: &TurnEngine, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    let teams = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    for (team, cell) in Team::ALL.into_iter().zip(teams.iter()) {
        let active = team == engine.current_team();
        let border = if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Paragraph::new(vec![
            Line::from(Span::styled(
                engine.scores().score(team).to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Player: {}", hint_giver_name(engine, team))),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(team.to_string()),
        )
        .alignment(Alignment::Center)
        .render(*cell, buf);
    }

    let (clock_label, clock_style) = if engine.is_running() {
        ("running", Style::default().fg(Color::Green))
    } else {
        ("paused", Style::default().fg(Color::Red))
    };
    Paragraph::new(Line::from(vec![
        Span::raw(format!(
            "{} · {} · ",
            engine.current_team(),
            hint_giver_name(engine, engine.current_team())
        )),
        Span::styled(
            format!("{}s", engine.remaining_seconds()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({clock_label})"), clock_style),
    ]))
    .alignment(Alignment::Center)
    .render(rows[1], buf);

    Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            engine.current_word().unwrap_or(PLACEHOLDER),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "guessed: (c) +2   skipped: (s) -1",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Word (hint-giver only)"),
    )
    .alignment(Alignment::Center)
    .render(rows[2], buf);
}

fn render_game_over(engine: &TurnEngine, area: Rect, buf: &mut Buffer) {
    let verdict = match engine.scores().leader() {
        Some(team) => format!("{team} wins!"),
        None => "It's a draw!".to_string(),
    };
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("Game over", bold.fg(Color::Magenta))),
        Line::from(Span::styled(verdict, bold)),
        Line::default(),
    ];
    for team in Team::ALL {
        lines.push(Line::from(vec![
            Span::styled(format!("{team}: {}", engine.scores().score(team)), bold),
            Span::raw(format!("  ({})", members(engine, team))),
        ]));
    }
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_history(engine: &TurnEngine, area: Rect, buf: &mut Buffer) {
    let history = engine.history();
    let lines: Vec<Line> = if history.is_empty() {
        vec![Line::from(Span::styled(
            "No actions yet.",
            Style::default().fg(Color::Gray),
        ))]
    } else {
        history
            .latest_first()
            .take(area.height.saturating_sub(2) as usize)
            .map(|event| {
                let color = match event {
                    HistoryEvent::Correct { .. } => Color::Green,
                    HistoryEvent::Skipped { .. } => Color::Yellow,
                    HistoryEvent::RoundEnded { .. } => Color::Gray,
                };
                Line::from(Span::styled(describe(event), Style::default().fg(color)))
            })
            .collect()
    };
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("History"))
        .render(area, buf);
}

pub fn describe(event: &HistoryEvent) -> String {
    match event {
        HistoryEvent::Correct { team, word } => format!("+2: {team} guessed {word}"),
        HistoryEvent::Skipped { team, word } => format!("-1: {team} skipped {word}"),
        HistoryEvent::RoundEnded {
            team,
            remaining_seconds,
        } => format!("~ Round over for {team} ({remaining_seconds}s left)"),
    }
}

fn legend(phase: Phase) -> &'static str {
    match phase {
        Phase::Setup => "name + (enter) add · (↑/↓) select · (←/→) team A/B · (del) remove · (F2) draw teams · (F3) round · (F5) start · (esc)",
        Phase::ReadyGate => "(enter) ready · (b)ack to setup · (r)eset · (esc)ape",
        Phase::ActiveRound => "(c) correct · (s)kip · (space) pause · (n)ext turn · (b)ack · (r)eset · (esc)ape",
        Phase::GameOver => "(enter) back to setup · (r)eset · (esc)ape",
    }
}

fn score_line(engine: &TurnEngine) -> Line<'static> {
    let (a, b) = engine.scores().pair();
    Line::from(format!("{} {a}  :  {b} {}", Team::A, Team::B))
}

fn members(engine: &TurnEngine, team: Team) -> String {
    let names = engine.roster().by_team(team);
    if names.is_empty() {
        return PLACEHOLDER.to_string();
    }
    names.iter().map(|p| p.name.as_str()).join(", ")
}

fn hint_giver_name(engine: &TurnEngine, team: Team) -> &str {
    engine
        .hint_giver(team)
        .map(|p| p.name.as_str())
        .unwrap_or(PLACEHOLDER)
}

/// The longest suffix of `s` that fits in `max` terminal columns.
fn tail_fitting(s: &str, max: usize) -> &str {
    let mut width = 0;
    let mut start = s.len();
    for (idx, ch) in s.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        start = idx;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeSettings;

    fn create_test_app(players: &[(&str, Team)]) -> App {
        let mut app = App::new(RuntimeSettings {
            round_secs: 90,
            word_list: "english".to_string(),
            words_file: None,
            players: Vec::new(),
            seed: Some(9),
        })
        .unwrap();
        for (name, team) in players {
            let pos = app.engine.add_player(name).unwrap();
            app.engine.assign_team(pos, *team).unwrap();
        }
        app
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_setup_lists_teams_and_duration() {
        let mut app = create_test_app(&[("Pola", Team::A), ("Piotr", Team::B)]);
        app.name_input = "Pat".to_string();

        let out = rendered(&app, Rect::new(0, 0, 120, 24));

        assert!(out.contains("> Pat"));
        assert!(out.contains("[A] Pola"));
        assert!(out.contains("Team B: Piotr"));
        assert!(out.contains("[90s]"));
        assert!(out.contains("Words: english"));
        assert!(!out.contains("History"));
    }

    #[test]
    fn test_round_shows_word_timer_and_history() {
        let mut app = create_test_app(&[("Pola", Team::A), ("Piotr", Team::B)]);
        app.engine.start_game().unwrap();
        app.engine.mark_ready().unwrap();
        let first = app.engine.current_word().unwrap().to_string();
        app.engine.correct().unwrap();
        app.engine.pause().unwrap();

        let out = rendered(&app, Rect::new(0, 0, 100, 30));

        assert!(out.contains("90s (paused)"));
        assert!(out.contains(app.engine.current_word().unwrap()));
        assert!(out.contains(&format!("+2: Team A guessed {first}")));
        assert!(out.contains("Player: Piotr"));
    }

    #[test]
    fn test_game_over_names_the_winner() {
        let mut app = create_test_app(&[("Pola", Team::A), ("Piotr", Team::B)]);
        app.engine.start_game().unwrap();
        app.engine.mark_ready().unwrap();
        app.engine.skip().unwrap();
        app.engine.end_turn_early().unwrap();
        app.engine.mark_ready().unwrap();
        app.engine.end_turn_early().unwrap();

        let out = rendered(&app, Rect::new(0, 0, 100, 30));

        assert!(out.contains("Team B wins!"));
        assert!(out.contains("Team A: -1"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let app = create_test_app(&[]);
        let _ = rendered(&app, Rect::new(0, 0, 20, 5));
    }

    #[test]
    fn test_describe_events() {
        assert_eq!(
            describe(&HistoryEvent::Skipped {
                team: Team::B,
                word: "kot".into()
            }),
            "-1: Team B skipped kot"
        );
        assert_eq!(
            describe(&HistoryEvent::RoundEnded {
                team: Team::A,
                remaining_seconds: 7
            }),
            "~ Round over for Team A (7s left)"
        );
    }

    #[test]
    fn test_tail_fitting() {
        assert_eq!(tail_fitting("Przemysław", 4), "sław");
        assert_eq!(tail_fitting("Pola", 10), "Pola");
        assert_eq!(tail_fitting("", 3), "");
    }
}
