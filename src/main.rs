mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pword::{
    app_dirs::AppDirs,
    clock::ROUND_DURATIONS,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    rng::GameRng,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    words::WordList,
    Phase, Rejected, RoundSummary, Team, TurnEngine,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

/// team word-guessing party game: describe the word using only words that start with P
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "One shared device, two teams taking turns. The hint-giver describes the word on screen using only words that start with the letter P; teammates guess. +2 for a correct guess, -1 for a skip. Honesty required: nobody is listening in."
)]
pub struct Cli {
    /// round length in seconds (60, 90, 120 or any positive number)
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// bundled word list to draw from
    #[clap(short = 'l', long, value_enum)]
    list: Option<BundledList>,

    /// custom word list file (.json or one word per line)
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// add a player to the roster (repeatable)
    #[clap(short = 'p', long = "player")]
    players: Vec<String>,

    /// seed for reproducible shuffles
    #[clap(long)]
    seed: Option<u64>,

    /// configuration file (defaults to the user config directory)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum BundledList {
    Polish,
    English,
}

/// Config file values with command-line flags layered on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub round_secs: u32,
    pub word_list: String,
    pub words_file: Option<PathBuf>,
    pub players: Vec<String>,
    pub seed: Option<u64>,
}

impl RuntimeSettings {
    fn resolve(cli: &Cli, config: Config) -> Self {
        let mut players = config.players;
        players.extend(cli.players.iter().cloned());

        Self {
            round_secs: cli.seconds.unwrap_or(config.round_secs),
            word_list: cli
                .list
                .map(|l| l.to_string().to_lowercase())
                .unwrap_or(config.word_list),
            words_file: cli.words.clone().or(config.words_file),
            players,
            seed: cli.seed.or(config.seed),
        }
    }

    fn load_words(&self) -> Result<WordList, Box<dyn Error>> {
        let list = match &self.words_file {
            Some(path) => WordList::from_file(path)?,
            None => WordList::embedded(&self.word_list)?,
        };
        Ok(list)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub engine: TurnEngine,
    pub settings: RuntimeSettings,
    pub word_list_name: String,
    pub name_input: String,
    pub selected: Option<usize>,
    /// Last thing worth telling the players, shown under the main panel.
    pub status: Option<String>,
}

impl App {
    pub fn new(settings: RuntimeSettings) -> Result<Self, Box<dyn Error>> {
        let words = settings.load_words()?;
        let rng = settings.seed.map(GameRng::seeded).unwrap_or_default();
        let word_list_name = words.name.clone();
        info!(list = %word_list_name, words = words.len(), "word list loaded");

        let mut engine = TurnEngine::new(words, settings.round_secs, rng)?;
        for name in &settings.players {
            // blank names from the config are skipped like blank typed names
            let _ = engine.add_player(name);
        }

        Ok(Self {
            selected: (!engine.roster().is_empty()).then_some(0),
            engine,
            settings,
            word_list_name,
            name_input: String::new(),
            status: None,
        })
    }

    pub fn on_tick(&mut self, elapsed: Duration) -> bool {
        let before = (self.engine.phase(), self.engine.remaining_seconds());
        if let Some(summary) = self.engine.advance_clock(elapsed) {
            self.report_round(summary, "Time's up!");
        }
        before != (self.engine.phase(), self.engine.remaining_seconds())
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Control::Quit;
        }

        let result = match self.engine.phase() {
            Phase::Setup => self.on_setup_key(key),
            Phase::ReadyGate => self.on_ready_key(key),
            Phase::ActiveRound => self.on_round_key(key),
            Phase::GameOver => self.on_game_over_key(key),
        };
        if let Err(err) = result {
            self.status = Some(err.to_string());
        }
        Control::Continue
    }

    fn on_setup_key(&mut self, key: KeyEvent) -> Result<(), Rejected> {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.name_input.push(c);
            }
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Enter => {
                let position = self.engine.add_player(&self.name_input)?;
                self.name_input.clear();
                self.selected = Some(position);
                self.status = None;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left => self.assign_selected(Team::A)?,
            KeyCode::Right => self.assign_selected(Team::B)?,
            KeyCode::Delete => {
                if let Some(position) = self.selected {
                    self.engine.remove_player(position)?;
                    let len = self.engine.roster().len();
                    self.selected = (len > 0).then(|| position.min(len - 1));
                }
            }
            KeyCode::F(2) => {
                self.engine.randomize_teams()?;
                self.status = Some("Teams drawn".to_string());
            }
            KeyCode::F(3) => {
                let next = next_duration(self.engine.round_duration());
                self.engine.set_round_duration(next)?;
            }
            KeyCode::F(5) => {
                self.engine.start_game()?;
                self.status = None;
            }
            _ => {}
        }
        Ok(())
    }

    fn on_ready_key(&mut self, key: KeyEvent) -> Result<(), Rejected> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.engine.mark_ready()?;
                self.status = None;
            }
            KeyCode::Char('b') => self.engine.back_to_setup(),
            KeyCode::Char('r') => self.engine.reset_game(),
            _ => {}
        }
        Ok(())
    }

    fn on_round_key(&mut self, key: KeyEvent) -> Result<(), Rejected> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('c') => self.engine.correct()?,
            KeyCode::Char('s') => self.engine.skip()?,
            KeyCode::Char(' ') | KeyCode::Char('p') => self.engine.toggle_pause()?,
            KeyCode::Char('n') => {
                let summary = self.engine.end_turn_early()?;
                self.report_round(summary, "Turn passed.");
            }
            KeyCode::Char('b') => self.engine.back_to_setup(),
            KeyCode::Char('r') => self.engine.reset_game(),
            _ => {}
        }
        Ok(())
    }

    fn on_game_over_key(&mut self, key: KeyEvent) -> Result<(), Rejected> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('b') => {
                self.engine.back_to_setup();
                self.status = None;
            }
            KeyCode::Char('r') => self.engine.reset_game(),
            _ => {}
        }
        Ok(())
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.engine.roster().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        self.selected = Some((current + delta).clamp(0, len as isize - 1) as usize);
    }

    fn assign_selected(&mut self, team: Team) -> Result<(), Rejected> {
        match self.selected {
            Some(position) => self.engine.assign_team(position, team),
            None => Ok(()),
        }
    }

    fn report_round(&mut self, summary: RoundSummary, reason: &str) {
        self.status = Some(if summary.game_over {
            format!("{reason} That was the last turn.")
        } else {
            format!("{reason} {} is up next.", summary.team.other())
        });
    }
}

fn next_duration(current: u32) -> u32 {
    ROUND_DURATIONS
        .iter()
        .position(|&d| d == current)
        .map(|idx| ROUND_DURATIONS[(idx + 1) % ROUND_DURATIONS.len()])
        .unwrap_or(ROUND_DURATIONS[0])
}

fn load_config(cli: &Cli) -> Config {
    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    store.load().unwrap_or_else(|err| {
        warn!(%err, path = %store.path().display(), "ignoring unreadable config");
        Config::default()
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(err) = logging::init_file(&path) {
            eprintln!("logging disabled: {err}");
        }
    }

    let settings = RuntimeSettings::resolve(&cli, load_config(&cli));
    let mut app = App::new(settings)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let outcome = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Tick(elapsed) => {
                if app.on_tick(elapsed) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            GameEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            GameEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    info!("quit");
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
