use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::seq::IndexedRandom;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::config::Settings;
use crate::content::{Catalog, Role};
use crate::game::engine::{Engine, GameEvent, Outcome, Phase, Resolution};
use crate::game::progress::ProgressState;
use crate::game::timeline::{TimerId, Timeline};
use crate::report::Report;
use crate::save::{load_snapshot, save_snapshot};

const TIPS: [&str; 5] = [
    "Always verify unexpected requests.",
    "Never share your password.",
    "Check URLs carefully.",
    "If it's urgent, it's probably a scam.",
    "Enable MFA everywhere.",
];

const TOAST_TIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    CharacterCreation,
    Playing,
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    NewGame,
    Continue,
    Quit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 3] = [MenuOption::NewGame, MenuOption::Continue, MenuOption::Quit];

    fn next(self) -> Self {
        match self {
            MenuOption::NewGame => MenuOption::Continue,
            MenuOption::Continue => MenuOption::Quit,
            MenuOption::Quit => MenuOption::NewGame,
        }
    }

    fn prev(self) -> Self {
        self.next().next()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::NewGame => "  NEW GAME  ",
            MenuOption::Continue => "  CONTINUE  ",
            MenuOption::Quit => "  QUIT  ",
        }
    }
}

/// Transitions that wait for the player to read something first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    Advance,
    RevealGameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
    expires: Duration,
}

pub struct App<'c> {
    pub(super) catalog: &'c Catalog,
    pub(super) settings: Settings,
    pub(super) screen: Screen,
    pub(super) menu: MenuOption,
    pub(super) name_input: TextArea<'static>,
    pub(super) role_index: usize,
    pub(super) engine: Option<Engine<'c>>,
    /// Choice the player picked and what it did, while feedback is shown.
    pub(super) last: Option<(String, Resolution)>,
    pub(super) selected: usize,
    pub(super) game_over_revealed: bool,
    pub(super) tip: &'static str,
    pub(super) report: Option<Report>,
    pub(super) report_scroll: u16,
    pub(super) toasts: Vec<Toast>,
    timeline: Timeline<Deferred>,
    pending: Option<TimerId>,
    pub(super) should_quit: bool,
}

fn name_editor() -> TextArea<'static> {
    let mut editor = TextArea::default();
    editor.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Agent name "),
    );
    editor.set_placeholder_text("Agent");
    editor.set_cursor_line_style(Style::default());
    editor.set_placeholder_style(Style::default().fg(Color::DarkGray));
    editor
}

impl<'c> App<'c> {
    pub fn new(catalog: &'c Catalog, settings: Settings) -> Self {
        App {
            catalog,
            settings,
            screen: Screen::Title,
            menu: MenuOption::NewGame,
            name_input: name_editor(),
            role_index: 0,
            engine: None,
            last: None,
            selected: 0,
            game_over_revealed: false,
            tip: TIPS[0],
            report: None,
            report_scroll: 0,
            toasts: Vec::new(),
            timeline: Timeline::new(),
            pending: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected_role(&self) -> Role {
        Role::ALL[self.role_index % Role::ALL.len()]
    }

    /// Feeds wall-clock (or test) time into the deferred-event timeline.
    pub fn tick(&mut self, elapsed: Duration) {
        for event in self.timeline.advance(elapsed) {
            self.pending = None;
            self.fire(event);
        }
        let now = self.timeline.now();
        self.toasts.retain(|t| t.expires > now);
    }

    fn fire(&mut self, event: Deferred) {
        match event {
            Deferred::Advance => {
                self.last = None;
                self.selected = 0;
                if let Some(engine) = self.engine.as_mut() {
                    if let Err(e) = engine.advance() {
                        log::warn!("deferred advance ignored: {e}");
                    }
                }
                self.after_engine_step();
            }
            Deferred::RevealGameOver => {
                self.game_over_revealed = true;
                self.tip = TIPS
                    .choose(&mut rand::rng())
                    .copied()
                    .unwrap_or(TIPS[0]);
            }
        }
    }

    fn schedule(&mut self, delay: Duration, event: Deferred) {
        if let Some(id) = self.pending.take() {
            self.timeline.cancel(id);
        }
        self.pending = Some(self.timeline.schedule(delay, event));
        log::trace!(
            "{event:?} in {delay:?} ({} pending)",
            self.timeline.pending()
        );
    }

    /// Fires the pending transition now instead of waiting it out.
    fn skip_wait(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Some(event) = self.timeline.cancel(id) {
                self.fire(event);
            }
        }
    }

    fn reset_run(&mut self) {
        self.timeline.clear();
        self.pending = None;
        self.engine = None;
        self.last = None;
        self.selected = 0;
        self.game_over_revealed = false;
        self.report = None;
        self.report_scroll = 0;
    }

    /// Converts engine events into toasts and arms the briefing timer.
    fn after_engine_step(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let events = engine.drain_events();
        let phase = engine.phase();
        for event in events {
            match event {
                GameEvent::LevelUp(level) => self.toast(
                    ToastKind::Success,
                    "Level Up!",
                    format!("You are now level {level}"),
                ),
                GameEvent::BossEngaged(name) => self.toast(
                    ToastKind::Warning,
                    "Boss Incoming",
                    format!("{name} is attacking!"),
                ),
                GameEvent::BossDefeated(name) => self.toast(
                    ToastKind::Success,
                    "Threat Neutralized",
                    format!("{name} has been defeated"),
                ),
                GameEvent::ChapterStarted(n) => log::debug!("briefing for chapter {n}"),
                GameEvent::GameOver { chapter } => log::debug!("game over in chapter {chapter}"),
                GameEvent::Completed => log::debug!("run complete"),
            }
        }
        if matches!(phase, Phase::Briefing(_)) && self.timeline.is_idle() {
            let delay = self.settings.delays.briefing();
            self.schedule(delay, Deferred::Advance);
        }
    }

    fn toast(&mut self, kind: ToastKind, title: &str, message: String) {
        let expires = self.timeline.now() + TOAST_TIME;
        self.toasts.push(Toast {
            kind,
            title: title.to_string(),
            message,
            expires,
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::Title => self.title_key(key),
            Screen::CharacterCreation => self.creation_key(key),
            Screen::Playing => self.playing_key(key),
            Screen::Report => self.report_key(key),
        }
    }

    fn title_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.menu = self.menu.next(),
            KeyCode::Up | KeyCode::Char('k') => self.menu = self.menu.prev(),
            KeyCode::Enter => match self.menu {
                MenuOption::NewGame => self.new_game(),
                MenuOption::Continue => self.continue_game(),
                MenuOption::Quit => self.should_quit = true,
            },
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn new_game(&mut self) {
        self.reset_run();
        self.name_input = name_editor();
        self.role_index = 0;
        self.screen = Screen::CharacterCreation;
    }

    fn continue_game(&mut self) {
        match load_snapshot(&self.settings.save_file) {
            Ok(Some(snapshot)) => {
                self.reset_run();
                self.engine = Some(Engine::restore(self.catalog, snapshot));
                self.screen = Screen::Playing;
                self.after_engine_step();
            }
            Ok(None) => self.toast(
                ToastKind::Warning,
                "No Save",
                "Start a new game!".to_string(),
            ),
            Err(e) => {
                log::warn!("refusing to load {}: {e}", self.settings.save_file.display());
                self.toast(ToastKind::Error, "Save Rejected", e.to_string());
            }
        }
    }

    fn creation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.screen = Screen::Title,
            KeyCode::Up => {
                self.role_index = (self.role_index + Role::ALL.len() - 1) % Role::ALL.len();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.role_index = (self.role_index + 1) % Role::ALL.len();
            }
            KeyCode::Enter => self.confirm_character(),
            _ => {
                self.name_input.input(key);
            }
        }
    }

    fn confirm_character(&mut self) {
        let name = self.name_input.lines().join(" ");
        let progress = ProgressState::new(&name, self.selected_role());
        log::info!(
            "new run: {} as {}",
            progress.player_name,
            progress.role.key()
        );
        self.reset_run();
        self.engine = Some(Engine::new(self.catalog, progress));
        self.screen = Screen::Playing;
        self.after_engine_step();
    }

    fn playing_key(&mut self, key: KeyEvent) {
        let Some(phase) = self.engine.as_ref().map(Engine::phase) else {
            self.screen = Screen::Title;
            return;
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.quit_to_title();
                return;
            }
            KeyCode::Char('s') if !phase.is_terminal() => {
                self.save();
                return;
            }
            _ => {}
        }

        match phase {
            Phase::Briefing(_) => {
                if key.code == KeyCode::Enter {
                    self.skip_wait();
                }
            }
            Phase::Scenario { .. } | Phase::Boss { .. } => self.question_key(key),
            Phase::Victory(_) => {
                if key.code == KeyCode::Enter {
                    if let Some(engine) = self.engine.as_mut() {
                        if let Err(e) = engine.continue_after_victory() {
                            log::warn!("{e}");
                        }
                    }
                    self.after_engine_step();
                }
            }
            Phase::GameOver => {
                if !self.game_over_revealed {
                    if key.code == KeyCode::Enter {
                        self.skip_wait();
                    }
                    return;
                }
                match key.code {
                    KeyCode::Char('r') | KeyCode::Enter => self.restart_from_checkpoint(),
                    _ => {}
                }
            }
            Phase::Complete => {
                if key.code == KeyCode::Enter {
                    self.show_report();
                }
            }
        }
    }

    fn question_key(&mut self, key: KeyEvent) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        if engine.is_answered() {
            if key.code == KeyCode::Enter {
                self.skip_wait();
            }
            return;
        }
        let Some(active) = engine.active_prompt() else {
            return;
        };
        let choices = active.prompt().choices();

        let choice = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + choices.len() - 1) % choices.len();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % choices.len();
                None
            }
            KeyCode::Enter => choices.get(self.selected).map(|c| c.id.clone()),
            KeyCode::Char(c) => {
                let id = c.to_ascii_lowercase().to_string();
                choices.iter().find(|ch| ch.id == id).map(|ch| ch.id.clone())
            }
            _ => None,
        };

        if let Some(choice) = choice {
            self.answer(&choice);
        }
    }

    /// Sends the player's pick to the engine and schedules what follows.
    pub fn answer(&mut self, choice: &str) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let boss_fight = matches!(engine.phase(), Phase::Boss { .. });
        let resolution = match engine.submit(choice) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("answer {choice:?} rejected: {e}");
                return;
            }
        };

        let delays = &self.settings.delays;
        let (delay, next) = match resolution.outcome {
            Outcome::GameOver => (delays.game_over(), Deferred::RevealGameOver),
            _ if boss_fight => (delays.boss_feedback(), Deferred::Advance),
            _ => (delays.scenario_feedback(), Deferred::Advance),
        };
        self.game_over_revealed = false;
        self.last = Some((choice.to_string(), resolution));
        self.schedule(delay, next);
        self.after_engine_step();
    }

    fn restart_from_checkpoint(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.restart_from_checkpoint() {
                log::warn!("{e}");
                return;
            }
        }
        self.last = None;
        self.selected = 0;
        self.game_over_revealed = false;
        self.after_engine_step();
    }

    fn save(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        match save_snapshot(&self.settings.save_file, &engine.snapshot()) {
            Ok(()) => self.toast(ToastKind::Success, "Saved", "Progress saved!".to_string()),
            Err(e) => {
                log::error!("save failed: {e}");
                self.toast(ToastKind::Error, "Save Failed", e.to_string());
            }
        }
    }

    fn show_report(&mut self) {
        if let Some(engine) = self.engine.as_ref() {
            let today = chrono::Local::now().date_naive();
            self.report = Some(Report::generate(
                engine.progress(),
                engine.tracker(),
                engine.mistakes(),
                today,
            ));
            self.report_scroll = 0;
            self.screen = Screen::Report;
        }
    }

    fn report_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::PageDown | KeyCode::Down | KeyCode::Char('j') => {
                self.report_scroll = self.report_scroll.saturating_add(3);
            }
            KeyCode::PageUp | KeyCode::Up | KeyCode::Char('k') => {
                self.report_scroll = self.report_scroll.saturating_sub(3);
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => self.quit_to_title(),
            _ => {}
        }
    }

    fn quit_to_title(&mut self) {
        self.reset_run();
        self.screen = Screen::Title;
        self.menu = MenuOption::NewGame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::catalog::fixtures::{attack, catalog_with, chapter, scenario};
    use crate::content::Category;

    fn press(app: &mut App<'_>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn catalog_with_damage(damage: u32) -> Catalog {
        catalog_with(vec![chapter(
            1,
            vec![
                scenario("t1", Category::Phishing, "a"),
                scenario("t2", Category::Malware, "b"),
            ],
            vec![
                attack("one", Category::Phishing, damage),
                attack("two", Category::Phishing, damage),
            ],
        )])
    }

    fn catalog() -> Catalog {
        catalog_with_damage(40)
    }

    fn settings(dir: &tempfile::TempDir) -> Settings {
        Settings {
            save_file: dir.path().join("firewall_save.json"),
            ..Settings::default()
        }
    }

    fn phase(app: &App<'_>) -> Phase {
        app.engine.as_ref().unwrap().phase()
    }

    fn into_first_scenario<'c>(catalog: &'c Catalog, dir: &tempfile::TempDir) -> App<'c> {
        let mut app = App::new(catalog, settings(dir));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::CharacterCreation);
        for c in "Kim".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Playing);
        assert_eq!(phase(&app), Phase::Briefing(1));
        app.tick(Duration::from_millis(1500));
        assert_eq!(phase(&app), Phase::Scenario { chapter: 1, index: 0 });
        app
    }

    #[test]
    fn character_creation_uses_typed_name_and_role() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let app = into_first_scenario(&catalog, &dir);
        let progress = app.engine.as_ref().unwrap().progress();
        assert_eq!(progress.player_name, "Kim");
        assert_eq!(progress.role, Role::Employee);
    }

    #[test]
    fn feedback_stays_up_until_the_delay_passes() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let mut app = into_first_scenario(&catalog, &dir);

        press(&mut app, KeyCode::Char('a'));
        assert!(app.last.as_ref().is_some_and(|(_, r)| r.correct));
        app.tick(Duration::from_millis(2999));
        assert_eq!(phase(&app), Phase::Scenario { chapter: 1, index: 0 });

        app.tick(Duration::from_millis(1));
        assert_eq!(phase(&app), Phase::Scenario { chapter: 1, index: 1 });
        assert!(app.last.is_none());
    }

    #[test]
    fn enter_skips_the_feedback_wait() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let mut app = into_first_scenario(&catalog, &dir);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.last.as_ref().is_some_and(|(choice, r)| choice == "b" && !r.correct));
        press(&mut app, KeyCode::Enter);
        assert_eq!(phase(&app), Phase::Scenario { chapter: 1, index: 1 });

        // the cancelled timer must not advance a second time
        app.tick(Duration::from_secs(10));
        assert_eq!(phase(&app), Phase::Scenario { chapter: 1, index: 1 });
    }

    #[test]
    fn keys_outside_the_choice_list_are_ignored() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let mut app = into_first_scenario(&catalog, &dir);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.last.is_none());
        assert_eq!(app.engine.as_ref().unwrap().tracker().totals(), (0, 0));
    }

    #[test]
    fn boss_fight_ends_when_attacks_run_out() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let mut app = into_first_scenario(&catalog, &dir);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(phase(&app), Phase::Boss { chapter: 1 });

        press(&mut app, KeyCode::Char('b'));
        app.tick(Duration::from_millis(2000));
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(phase(&app), Phase::Boss { chapter: 1 });
        press(&mut app, KeyCode::Enter);
        assert_eq!(phase(&app), Phase::Victory(1));
        assert_eq!(app.engine.as_ref().unwrap().progress().security, 20);
    }

    #[test]
    fn losing_the_run_then_restarting() {
        let catalog = catalog_with_damage(100);
        let dir = tempfile::tempdir().unwrap();
        let mut app = into_first_scenario(&catalog, &dir);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('b'));
        assert_eq!(phase(&app), Phase::GameOver);
        assert!(!app.game_over_revealed);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(phase(&app), Phase::GameOver);

        app.tick(Duration::from_millis(1500));
        assert!(app.game_over_revealed);
        assert!(TIPS.contains(&app.tip));

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(phase(&app), Phase::Briefing(1));
        let engine = app.engine.as_ref().unwrap();
        assert_eq!(engine.progress().security, 100);
        assert_eq!(engine.progress().xp, 40);
    }

    #[test]
    fn save_and_continue_round_trip_through_the_menu() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let mut app = into_first_scenario(&catalog, &dir);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.toasts.iter().any(|t| t.title == "Saved"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Title);
        assert!(app.engine.is_none());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Playing);
        let engine = app.engine.as_ref().unwrap();
        assert_eq!(engine.phase(), Phase::Briefing(1));
        assert_eq!(engine.progress().xp, 20);
        assert_eq!(engine.progress().player_name, "Kim");
    }

    #[test]
    fn continue_without_save_shows_a_warning() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(&catalog, settings(&dir));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Title);
        assert!(app.toasts.iter().any(|t| t.kind == ToastKind::Warning));

        app.tick(TOAST_TIME);
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn completed_run_opens_the_report() {
        let catalog = catalog();
        let dir = tempfile::tempdir().unwrap();
        let mut app = into_first_scenario(&catalog, &dir);
        for key in ['a', 'b', 'a', 'a'] {
            press(&mut app, KeyCode::Char(key));
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(phase(&app), Phase::Victory(1));
        press(&mut app, KeyCode::Enter);
        assert_eq!(phase(&app), Phase::Complete);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Report);
        let report = app.report.as_ref().unwrap();
        assert_eq!(report.accuracy, 100);
        assert_eq!(report.total_questions, 4);
    }
}
