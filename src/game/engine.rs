//! The scenario state machine for one role-run.
//!
//! `Chapter(n)` briefing -> scenarios -> boss attacks -> `Victory(n)` ->
//! `Chapter(n + 1)` ... -> `Complete`, with `GameOver` reachable from any
//! answer that empties the security pool. The engine never renders and
//! never waits; callers drive it with `submit` and `advance`.

use crate::content::{Attack, Boss, Catalog, Category, Chapter, Prompt, Role, Scenario};
use crate::error::EngineError;
use crate::save::Snapshot;

use super::progress::ProgressState;
use super::rules::{
    BOSS_DEFEAT_REPUTATION, BOSS_HIT, BOSS_REPUTATION, BOSS_XP, SCENARIO_PENALTY,
    SCENARIO_REPUTATION, SCENARIO_XP,
};
use super::tracker::{MistakeLog, MistakeRecord, PerformanceTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Chapter intro is on screen; `advance` loads the first scenario.
    Briefing(u32),
    Scenario { chapter: u32, index: usize },
    Boss { chapter: u32 },
    Victory(u32),
    Complete,
    GameOver,
}

impl Phase {
    fn describe(&self) -> &'static str {
        match self {
            Phase::Briefing(_) => "briefing",
            Phase::Scenario { .. } => "in a scenario",
            Phase::Boss { .. } => "fighting a boss",
            Phase::Victory(_) => "celebrating a victory",
            Phase::Complete => "the run is complete",
            Phase::GameOver => "the run is over",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::GameOver)
    }
}

/// Live state of the boss currently being fought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BossRuntime {
    pub health: i32,
    pub max_health: u32,
    pub attack_index: usize,
}

impl BossRuntime {
    fn new(boss: &Boss) -> Self {
        BossRuntime {
            health: i32::try_from(boss.health).unwrap_or(i32::MAX),
            max_health: boss.health,
            attack_index: 0,
        }
    }

    pub fn health_display(&self) -> u32 {
        self.health.max(0) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    BossDefeated,
    GameOver,
}

/// What one answer did to the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub correct: bool,
    pub category: Category,
    pub correct_choice: String,
    pub explanation: Option<String>,
    pub lesson: Option<String>,
    pub xp_gained: u32,
    pub reputation_gained: i64,
    pub security_lost: i32,
    pub boss_damage: i32,
    pub levels_gained: u32,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    ChapterStarted(u32),
    LevelUp(u32),
    BossEngaged(String),
    BossDefeated(String),
    GameOver { chapter: u32 },
    Completed,
}

/// The scenario or boss attack waiting for (or showing) an answer.
#[derive(Debug, Clone, Copy)]
pub enum ActivePrompt<'c> {
    Scenario(&'c Scenario),
    Attack(&'c Attack),
}

impl<'c> ActivePrompt<'c> {
    pub fn prompt(&self) -> &'c dyn Prompt {
        match self {
            ActivePrompt::Scenario(s) => *s,
            ActivePrompt::Attack(a) => &a.scenario,
        }
    }
}

/// Values for the heads-up display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub player_name: String,
    pub role: Role,
    pub level: u32,
    pub security: i32,
    pub security_percent: u16,
    pub xp_percent: u16,
    pub reputation: i64,
}

pub struct Engine<'c> {
    catalog: &'c Catalog,
    progress: ProgressState,
    tracker: PerformanceTracker,
    mistakes: MistakeLog,
    phase: Phase,
    boss: Option<BossRuntime>,
    answered: Option<Outcome>,
    events: Vec<GameEvent>,
}

impl<'c> Engine<'c> {
    /// Fresh run starting at chapter 1.
    pub fn new(catalog: &'c Catalog, mut progress: ProgressState) -> Self {
        progress.current_chapter = 1;
        Self::resume(catalog, progress, PerformanceTracker::new(), MistakeLog::new())
    }

    /// Replaces everything with the snapshot and re-enters the saved chapter
    /// from its first scenario.
    pub fn restore(catalog: &'c Catalog, snapshot: Snapshot) -> Self {
        log::info!(
            "restoring {} at chapter {} (saved scenario index {} is not resumed)",
            snapshot.progress.player_name,
            snapshot.progress.current_chapter,
            snapshot.progress.current_scenario
        );
        Self::resume(
            catalog,
            snapshot.progress,
            snapshot.performance,
            snapshot.mistakes,
        )
    }

    fn resume(
        catalog: &'c Catalog,
        progress: ProgressState,
        tracker: PerformanceTracker,
        mistakes: MistakeLog,
    ) -> Self {
        let chapter = progress.current_chapter;
        let mut engine = Engine {
            catalog,
            progress,
            tracker,
            mistakes,
            phase: Phase::Briefing(chapter),
            boss: None,
            answered: None,
            events: Vec::new(),
        };
        engine.start_chapter(chapter);
        engine
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.progress.clone(),
            self.tracker.clone(),
            self.mistakes.clone(),
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    pub fn mistakes(&self) -> &MistakeLog {
        &self.mistakes
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn is_answered(&self) -> bool {
        self.answered.is_some()
    }

    pub fn chapter(&self) -> Option<&'c Chapter> {
        self.catalog
            .chapter(self.progress.role, self.progress.current_chapter)
    }

    pub fn boss(&self) -> Option<(&'c Boss, &BossRuntime)> {
        let runtime = self.boss.as_ref()?;
        Some((&self.chapter()?.boss, runtime))
    }

    pub fn active_prompt(&self) -> Option<ActivePrompt<'c>> {
        match self.phase {
            Phase::Scenario { index, .. } => self
                .chapter()?
                .scenarios
                .get(index)
                .map(ActivePrompt::Scenario),
            Phase::Boss { .. } => {
                let (boss, runtime) = self.boss()?;
                boss.attacks
                    .get(runtime.attack_index)
                    .map(ActivePrompt::Attack)
            }
            _ => None,
        }
    }

    pub fn hud(&self) -> Hud {
        let p = &self.progress;
        Hud {
            player_name: p.player_name.clone(),
            role: p.role,
            level: p.level,
            security: p.security_display(),
            security_percent: p.security_percent(),
            xp_percent: p.xp_into_level() as u16,
            reputation: p.reputation,
        }
    }

    /// First three lessons of the current chapter, shown after its boss falls.
    pub fn victory_lessons(&self) -> Vec<&'c str> {
        self.chapter()
            .map(|c| c.scenarios.iter().take(3).map(|s| s.lesson.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Unknown chapters end the run as `Complete`.
    pub fn start_chapter(&mut self, number: u32) {
        self.boss = None;
        self.answered = None;

        if self.catalog.chapter(self.progress.role, number).is_none() {
            log::info!(
                "no chapter {} for {}, run complete",
                number,
                self.progress.role.key()
            );
            self.phase = Phase::Complete;
            self.events.push(GameEvent::Completed);
            return;
        }

        self.progress.current_chapter = number;
        self.progress.current_scenario = 0;
        self.phase = Phase::Briefing(number);
        log::info!("chapter {} started for {}", number, self.progress.role.key());
        self.events.push(GameEvent::ChapterStarted(number));
    }

    /// Moves past the briefing or past an answered question.
    pub fn advance(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Briefing(_) => {
                self.load_current();
                Ok(())
            }
            Phase::Scenario { .. } => {
                self.take_answer("advance")?;
                self.progress.current_scenario += 1;
                self.load_current();
                Ok(())
            }
            Phase::Boss { chapter } => match self.take_answer("advance")? {
                Outcome::BossDefeated => {
                    self.boss = None;
                    self.phase = Phase::Victory(chapter);
                    Ok(())
                }
                _ => {
                    if let Some(runtime) = self.boss.as_mut() {
                        runtime.attack_index += 1;
                    }
                    Ok(())
                }
            },
            other => Err(EngineError::WrongPhase {
                action: "advance",
                phase: other.describe(),
            }),
        }
    }

    fn take_answer(&mut self, action: &'static str) -> Result<Outcome, EngineError> {
        self.answered.take().ok_or(EngineError::WrongPhase {
            action,
            phase: "waiting for an answer",
        })
    }

    fn load_current(&mut self) {
        let Some(chapter) = self.chapter() else {
            self.phase = Phase::Complete;
            self.events.push(GameEvent::Completed);
            return;
        };
        let index = self.progress.current_scenario;
        if index < chapter.scenarios.len() {
            self.phase = Phase::Scenario {
                chapter: chapter.number,
                index,
            };
        } else {
            log::info!(
                "chapter {} scenarios done, engaging {} ({})",
                chapter.number,
                chapter.boss.name,
                chapter.boss.id
            );
            self.boss = Some(BossRuntime::new(&chapter.boss));
            self.phase = Phase::Boss {
                chapter: chapter.number,
            };
            self.events.push(GameEvent::BossEngaged(chapter.boss.name.clone()));
        }
    }

    /// Answers whatever is active, scenario or boss attack.
    pub fn submit(&mut self, choice: &str) -> Result<Resolution, EngineError> {
        match self.phase {
            Phase::Boss { .. } => self.submit_boss_answer(choice),
            _ => self.submit_answer(choice),
        }
    }

    pub fn submit_answer(&mut self, choice: &str) -> Result<Resolution, EngineError> {
        let Phase::Scenario { chapter, index } = self.phase else {
            return Err(self.no_prompt("answer a scenario"));
        };
        if self.answered.is_some() {
            return Err(EngineError::AlreadyAnswered);
        }
        let scenario = self
            .chapter()
            .and_then(|c| c.scenarios.get(index))
            .ok_or(EngineError::NoActivePrompt)?;
        if !scenario.has_choice(choice) {
            return Err(EngineError::UnknownChoice(choice.to_string()));
        }

        let correct = scenario.is_correct(choice);
        self.tracker.record(scenario.category, correct);

        let mut resolution = Resolution {
            correct,
            category: scenario.category,
            correct_choice: scenario.correct.clone(),
            explanation: Some(scenario.explanation.clone()),
            lesson: Some(scenario.lesson.clone()),
            xp_gained: 0,
            reputation_gained: 0,
            security_lost: 0,
            boss_damage: 0,
            levels_gained: 0,
            outcome: Outcome::Continue,
        };

        if correct {
            resolution.levels_gained = self.gain_xp(SCENARIO_XP);
            self.progress.gain_reputation(SCENARIO_REPUTATION);
            resolution.xp_gained = SCENARIO_XP;
            resolution.reputation_gained = SCENARIO_REPUTATION;
        } else {
            self.mistakes.push(MistakeRecord {
                chapter,
                category: scenario.category,
                question: scenario.question.clone(),
                your_answer: scenario.choice_text(choice).unwrap_or_default().to_string(),
                correct_answer: scenario
                    .choice_text(&scenario.correct)
                    .unwrap_or_default()
                    .to_string(),
                lesson: scenario.lesson.clone(),
            });
            self.progress.take_damage(SCENARIO_PENALTY);
            resolution.security_lost = SCENARIO_PENALTY;
        }
        log::debug!(
            "scenario {} answered {:?}: correct={} security={}",
            scenario.id,
            choice,
            correct,
            self.progress.security
        );

        resolution.outcome = if self.progress.is_defeated() {
            self.game_over();
            Outcome::GameOver
        } else {
            Outcome::Continue
        };
        self.answered = Some(resolution.outcome);
        Ok(resolution)
    }

    pub fn submit_boss_answer(&mut self, choice: &str) -> Result<Resolution, EngineError> {
        let Phase::Boss { chapter } = self.phase else {
            return Err(self.no_prompt("answer a boss attack"));
        };
        if self.answered.is_some() {
            return Err(EngineError::AlreadyAnswered);
        }
        let Some(ActivePrompt::Attack(attack)) = self.active_prompt() else {
            return Err(EngineError::NoActivePrompt);
        };
        let payload = &attack.scenario;
        if !payload.has_choice(choice) {
            return Err(EngineError::UnknownChoice(choice.to_string()));
        }

        let correct = payload.is_correct(choice);
        self.tracker.record(payload.category, correct);

        let mut resolution = Resolution {
            correct,
            category: payload.category,
            correct_choice: payload.correct.clone(),
            explanation: None,
            lesson: None,
            xp_gained: 0,
            reputation_gained: 0,
            security_lost: 0,
            boss_damage: 0,
            levels_gained: 0,
            outcome: Outcome::Continue,
        };

        if correct {
            if let Some(runtime) = self.boss.as_mut() {
                runtime.health -= BOSS_HIT;
            }
            resolution.boss_damage = BOSS_HIT;
            resolution.levels_gained = self.gain_xp(BOSS_XP);
            self.progress.gain_reputation(BOSS_REPUTATION);
            resolution.xp_gained = BOSS_XP;
            resolution.reputation_gained = BOSS_REPUTATION;
        } else {
            let lesson = attack.description.clone();
            self.mistakes.push(MistakeRecord {
                chapter,
                category: payload.category,
                question: payload.question.clone(),
                your_answer: payload.choice_text(choice).unwrap_or_default().to_string(),
                correct_answer: payload
                    .choice_text(&payload.correct)
                    .unwrap_or_default()
                    .to_string(),
                lesson: lesson.clone(),
            });
            let damage = i32::try_from(attack.damage).unwrap_or(i32::MAX);
            self.progress.take_damage(damage);
            resolution.security_lost = damage;
            resolution.lesson = Some(lesson);
        }
        log::debug!(
            "boss attack {:?} answered {:?}: correct={} security={}",
            attack.name,
            choice,
            correct,
            self.progress.security
        );

        if self.progress.is_defeated() {
            self.game_over();
            resolution.outcome = Outcome::GameOver;
        } else if self.boss_falls() {
            self.defeat_boss();
            resolution.outcome = Outcome::BossDefeated;
            resolution.reputation_gained += BOSS_DEFEAT_REPUTATION;
        }
        self.answered = Some(resolution.outcome);
        Ok(resolution)
    }

    fn boss_falls(&self) -> bool {
        match self.boss() {
            Some((boss, runtime)) => {
                runtime.health <= 0 || runtime.attack_index + 1 >= boss.attacks.len()
            }
            None => false,
        }
    }

    fn defeat_boss(&mut self) {
        self.progress.gain_reputation(BOSS_DEFEAT_REPUTATION);
        if let Some(boss) = self.chapter().map(|c| &c.boss) {
            log::info!("{} defeated", boss.name);
            self.events.push(GameEvent::BossDefeated(boss.name.clone()));
        }
    }

    fn gain_xp(&mut self, amount: u32) -> u32 {
        let gained = self.progress.gain_xp(amount);
        if gained > 0 {
            log::info!("level up: now level {}", self.progress.level);
            self.events.push(GameEvent::LevelUp(self.progress.level));
        }
        gained
    }

    fn game_over(&mut self) {
        let chapter = self.progress.current_chapter;
        log::info!(
            "security breached in chapter {} (security {})",
            chapter,
            self.progress.security
        );
        self.phase = Phase::GameOver;
        self.boss = None;
        self.events.push(GameEvent::GameOver { chapter });
    }

    pub fn continue_after_victory(&mut self) -> Result<(), EngineError> {
        let Phase::Victory(chapter) = self.phase else {
            return Err(EngineError::WrongPhase {
                action: "continue",
                phase: self.phase.describe(),
            });
        };
        self.start_chapter(chapter + 1);
        Ok(())
    }

    /// Full security, back to the first scenario of the current chapter.
    pub fn restart_from_checkpoint(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::GameOver {
            return Err(EngineError::WrongPhase {
                action: "restart",
                phase: self.phase.describe(),
            });
        }
        self.progress.restore_security();
        self.start_chapter(self.progress.current_chapter);
        Ok(())
    }

    fn no_prompt(&self, action: &'static str) -> EngineError {
        match self.phase {
            Phase::Scenario { .. } | Phase::Boss { .. } => EngineError::NoActivePrompt,
            other => EngineError::WrongPhase {
                action,
                phase: other.describe(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::catalog::fixtures::{attack, catalog_with, chapter, scenario};
    use crate::content::load_catalog;
    use std::path::PathBuf;

    const WRONG: &str = "d";

    /// Employee: chapter 1 with five phishing/malware scenarios (answer "a"),
    /// chapter 2 with one scenario. Bosses have two attacks (answer "a").
    fn two_chapter_catalog() -> Catalog {
        catalog_with(vec![
            chapter(
                1,
                vec![
                    scenario("c1_1", Category::Phishing, "a"),
                    scenario("c1_2", Category::Phishing, "a"),
                    scenario("c1_3", Category::Malware, "a"),
                    scenario("c1_4", Category::Phishing, "a"),
                    scenario("c1_5", Category::Malware, "a"),
                ],
                vec![
                    attack("first", Category::Phishing, 30),
                    attack("second", Category::Phishing, 30),
                ],
            ),
            chapter(
                2,
                vec![scenario("c2_1", Category::DataProtection, "a")],
                vec![
                    attack("third", Category::Malware, 25),
                    attack("fourth", Category::Malware, 25),
                ],
            ),
        ])
    }

    fn start(catalog: &Catalog) -> Engine<'_> {
        let mut engine = Engine::new(catalog, ProgressState::new("Tess", Role::Employee));
        engine.advance().unwrap();
        engine
    }

    fn answer(engine: &mut Engine<'_>, choice: &str) -> Resolution {
        let r = engine.submit(choice).unwrap();
        if r.outcome != Outcome::GameOver {
            engine.advance().unwrap();
        }
        r
    }

    #[test]
    fn new_run_opens_with_chapter_one_briefing() {
        let catalog = two_chapter_catalog();
        let mut engine = Engine::new(&catalog, ProgressState::new("Tess", Role::Employee));
        assert_eq!(engine.phase(), Phase::Briefing(1));
        assert!(engine.active_prompt().is_none());
        assert_eq!(engine.drain_events(), vec![GameEvent::ChapterStarted(1)]);

        engine.advance().unwrap();
        assert_eq!(engine.phase(), Phase::Scenario { chapter: 1, index: 0 });
        assert!(matches!(
            engine.active_prompt(),
            Some(ActivePrompt::Scenario(s)) if s.id == "c1_1"
        ));
    }

    #[test]
    fn correct_answer_rewards_player() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        let r = engine.submit_answer("a").unwrap();
        assert!(r.correct);
        assert_eq!((r.xp_gained, r.reputation_gained, r.security_lost), (20, 5, 0));
        assert_eq!(engine.progress().xp, 20);
        assert_eq!(engine.progress().reputation, 5);
        assert_eq!(engine.progress().security, 100);
        let score = engine.tracker().score(Category::Phishing);
        assert_eq!((score.correct, score.total), (1, 1));
        assert!(engine.mistakes().is_empty());
    }

    #[test]
    fn wrong_answer_costs_security_and_logs_mistake() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        let r = engine.submit_answer(WRONG).unwrap();
        assert!(!r.correct);
        assert_eq!(r.security_lost, 15);
        assert_eq!(r.correct_choice, "a");
        assert_eq!(engine.progress().security, 85);
        assert_eq!(engine.progress().xp, 0);

        let score = engine.tracker().score(Category::Phishing);
        assert_eq!((score.correct, score.total), (0, 1));

        let mistakes = engine.mistakes().all();
        assert_eq!(mistakes.len(), 1);
        assert_eq!(mistakes[0].chapter, 1);
        assert_eq!(mistakes[0].your_answer, "answer d");
        assert_eq!(mistakes[0].correct_answer, "answer a");
        assert_eq!(mistakes[0].lesson, "lesson c1_1");
    }

    #[test]
    fn answer_must_be_an_offered_choice() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        assert_eq!(
            engine.submit("z"),
            Err(EngineError::UnknownChoice("z".into()))
        );
        assert_eq!(engine.tracker().totals(), (0, 0));

        engine.submit("a").unwrap();
        assert_eq!(engine.submit("a"), Err(EngineError::AlreadyAnswered));
    }

    #[test]
    fn advance_requires_an_answer() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        assert!(matches!(
            engine.advance(),
            Err(EngineError::WrongPhase { .. })
        ));
    }

    #[test]
    fn three_right_two_wrong_in_a_chapter() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        for choice in ["a", WRONG, "a", WRONG, "a"] {
            answer(&mut engine, choice);
        }
        let p = engine.progress();
        assert_eq!(p.xp, 60);
        assert_eq!(p.security, 70);
        assert_eq!(p.reputation, 15);
        assert_eq!(engine.tracker().score(Category::Phishing).total, 3);
        assert_eq!(engine.tracker().score(Category::Malware).total, 2);
        assert_eq!(engine.mistakes().len(), 2);
    }

    #[test]
    fn exhausted_scenarios_hand_off_to_boss() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        for _ in 0..4 {
            answer(&mut engine, "a");
        }
        engine.drain_events();
        answer(&mut engine, "a");
        assert_eq!(engine.phase(), Phase::Boss { chapter: 1 });
        // the fifth answer reaches 100 xp before the boss shows up
        assert_eq!(
            engine.drain_events(),
            vec![
                GameEvent::LevelUp(2),
                GameEvent::BossEngaged("BOSS 1".into())
            ]
        );
        let (boss, runtime) = engine.boss().unwrap();
        assert_eq!(boss.id, "boss_1");
        assert_eq!((runtime.health, runtime.attack_index), (100, 0));
        assert!(matches!(
            engine.active_prompt(),
            Some(ActivePrompt::Attack(a)) if a.name == "first"
        ));
    }

    fn at_boss(catalog: &Catalog) -> Engine<'_> {
        let mut engine = start(catalog);
        for _ in 0..5 {
            answer(&mut engine, "a");
        }
        engine
    }

    #[test]
    fn boss_falls_after_two_hits() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        let rep_before = engine.progress().reputation;
        let xp_before = engine.progress().xp;

        let r = engine.submit_boss_answer("a").unwrap();
        assert_eq!(r.outcome, Outcome::Continue);
        assert_eq!(r.boss_damage, 50);
        assert_eq!(engine.boss().unwrap().1.health, 50);
        engine.advance().unwrap();
        assert_eq!(engine.boss().unwrap().1.attack_index, 1);

        let r = engine.submit_boss_answer("a").unwrap();
        assert_eq!(r.outcome, Outcome::BossDefeated);
        assert_eq!(r.reputation_gained, 10 + 50);
        assert_eq!(engine.progress().reputation, rep_before + 10 + 10 + 50);
        assert_eq!(engine.progress().xp, xp_before + 60);

        engine.advance().unwrap();
        assert_eq!(engine.phase(), Phase::Victory(1));
        assert!(engine.boss().is_none());
        assert_eq!(
            engine.victory_lessons(),
            vec!["lesson c1_1", "lesson c1_2", "lesson c1_3"]
        );
    }

    #[test]
    fn boss_wrong_answer_deals_attack_damage() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        let mistakes_before = engine.mistakes().len();

        let r = engine.submit_boss_answer("b").unwrap();
        assert!(!r.correct);
        assert_eq!(r.security_lost, 30);
        assert_eq!(engine.progress().security, 70);
        assert_eq!(engine.boss().unwrap().1.health, 100);
        assert_eq!(engine.mistakes().len(), mistakes_before + 1);
        assert_eq!(engine.tracker().score(Category::Phishing).total, 4);
    }

    #[test]
    fn boss_is_defeated_when_attacks_run_out() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        let rep_before = engine.progress().reputation;

        answer(&mut engine, "b");
        let r = engine.submit_boss_answer("a").unwrap();
        assert_eq!(r.outcome, Outcome::BossDefeated);
        assert_eq!(engine.boss().unwrap().1.health, 50);
        assert_eq!(engine.progress().reputation, rep_before + 10 + 50);
        engine.advance().unwrap();
        assert_eq!(engine.phase(), Phase::Victory(1));
    }

    #[test]
    fn victory_leads_to_next_chapter_then_completion() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        answer(&mut engine, "a");
        answer(&mut engine, "a");
        engine.continue_after_victory().unwrap();
        assert_eq!(engine.phase(), Phase::Briefing(2));
        assert_eq!(engine.progress().current_chapter, 2);

        engine.advance().unwrap();
        answer(&mut engine, "a");
        answer(&mut engine, "a");
        answer(&mut engine, "a");
        assert_eq!(engine.phase(), Phase::Victory(2));

        engine.drain_events();
        engine.continue_after_victory().unwrap();
        assert_eq!(engine.phase(), Phase::Complete);
        assert_eq!(engine.drain_events(), vec![GameEvent::Completed]);
        assert_eq!(engine.progress().current_chapter, 2);
        assert!(engine.advance().is_err());
    }

    #[test]
    fn unknown_chapter_completes_the_run() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        engine.start_chapter(9);
        assert_eq!(engine.phase(), Phase::Complete);
    }

    #[test]
    fn security_exhaustion_ends_the_run_immediately() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        engine.progress.security = 15;

        let r = engine.submit_answer(WRONG).unwrap();
        assert_eq!(r.outcome, Outcome::GameOver);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.progress().security, 0);
        assert!(engine.active_prompt().is_none());
        // the losing answer is still counted
        assert_eq!(engine.tracker().score(Category::Phishing).total, 1);
        assert_eq!(engine.mistakes().len(), 1);
        assert!(engine.advance().is_err());
        assert!(engine.submit("a").is_err());
    }

    #[test]
    fn boss_damage_can_push_security_negative() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        engine.progress.security = 15;

        let r = engine.submit_boss_answer("b").unwrap();
        assert_eq!(r.outcome, Outcome::GameOver);
        assert_eq!(engine.progress().security, -15);
        assert_eq!(engine.hud().security, 0);
        assert_eq!(engine.hud().security_percent, 0);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(engine.boss().is_none());
    }

    #[test]
    fn checkpoint_restart_resets_chapter_and_security() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        answer(&mut engine, "a");
        engine.progress.security = 10;
        engine.submit_boss_answer("b").unwrap();
        assert_eq!(engine.phase(), Phase::GameOver);
        let mistakes = engine.mistakes().len();

        engine.restart_from_checkpoint().unwrap();
        assert_eq!(engine.phase(), Phase::Briefing(1));
        assert_eq!(engine.progress().security, 100);
        assert_eq!(engine.progress().current_scenario, 0);
        assert!(engine.boss().is_none());
        assert_eq!(engine.mistakes().len(), mistakes);

        engine.advance().unwrap();
        assert_eq!(engine.phase(), Phase::Scenario { chapter: 1, index: 0 });
    }

    #[test]
    fn restart_only_after_game_over() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        assert!(engine.restart_from_checkpoint().is_err());
    }

    #[test]
    fn level_up_event_fires_at_hundred_xp() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        // 5 x 20 xp = 100
        assert_eq!(engine.progress().level, 2);
        engine.drain_events();
        let r = engine.submit_boss_answer("a").unwrap();
        assert_eq!(r.levels_gained, 0);
        assert!(!engine.drain_events().contains(&GameEvent::LevelUp(3)));
        assert_eq!(engine.progress().xp, 130);
    }

    #[test]
    fn restore_resumes_chapter_from_first_scenario() {
        let catalog = two_chapter_catalog();
        let mut engine = at_boss(&catalog);
        answer(&mut engine, "a");
        answer(&mut engine, "a");
        engine.continue_after_victory().unwrap();
        engine.advance().unwrap();

        let mut snapshot = engine.snapshot();
        snapshot.progress.current_scenario = 3;

        let restored = Engine::restore(&catalog, snapshot.clone());
        assert_eq!(restored.phase(), Phase::Briefing(2));
        assert_eq!(restored.progress().current_scenario, 0);
        assert_eq!(restored.progress().xp, snapshot.progress.xp);
        assert_eq!(restored.tracker(), &snapshot.performance);
    }

    #[test]
    fn hud_reports_percentages() {
        let catalog = two_chapter_catalog();
        let mut engine = start(&catalog);
        answer(&mut engine, WRONG);
        for _ in 0..4 {
            answer(&mut engine, "a");
        }
        let hud = engine.hud();
        assert_eq!(hud.player_name, "Tess");
        assert_eq!(hud.security, 85);
        assert_eq!(hud.security_percent, 85);
        assert_eq!(hud.xp_percent, 80);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.reputation, 20);
    }

    #[test]
    fn shipped_employee_chapter_one_plays_through() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content");
        let catalog = load_catalog(&root).unwrap();
        let mut engine = start(&catalog);

        let mut phishing = 0;
        for i in 0..5 {
            let prompt = engine.active_prompt().unwrap().prompt();
            if prompt.category() == Category::Phishing {
                phishing += 1;
            }
            let choice = if i % 2 == 0 {
                prompt.correct().to_string()
            } else {
                prompt
                    .choices()
                    .iter()
                    .find(|c| c.id != prompt.correct())
                    .unwrap()
                    .id
                    .clone()
            };
            answer(&mut engine, &choice);
        }

        let p = engine.progress();
        assert_eq!((p.xp, p.security, p.reputation), (60, 70, 15));
        assert_eq!(engine.tracker().score(Category::Phishing).total, phishing);
        assert!(matches!(engine.phase(), Phase::Boss { chapter: 1 }));
    }
}
