use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::content::Role;
use crate::game::engine::{ActivePrompt, Engine, Phase, Resolution};
use crate::report::{Band, CategoryStatus, Report};

use super::app::{App, MenuOption, Screen, ToastKind};
use super::artifact::artifact_lines;

const TITLE_ART: &str = r#"
    ╔════════════════════════════════════════════════════════════════╗
    ║                                                                ║
    ║   ███████╗██╗██████╗ ███████╗██╗    ██╗ █████╗ ██╗     ██╗     ║
    ║   ██╔════╝██║██╔══██╗██╔════╝██║    ██║██╔══██╗██║     ██║     ║
    ║   █████╗  ██║██████╔╝█████╗  ██║ █╗ ██║███████║██║     ██║     ║
    ║   ██╔══╝  ██║██╔══██╗██╔══╝  ██║███╗██║██╔══██║██║     ██║     ║
    ║   ██║     ██║██║  ██║███████╗╚███╔███╔╝██║  ██║███████╗███████╗║
    ║   ╚═╝     ╚═╝╚═╝  ╚═╝╚══════╝ ╚══╝╚══╝ ╚═╝  ╚═╝╚══════╝╚══════╝║
    ║                                                                ║
    ║                "Chronicles of the NetGuard"                    ║
    ║                                                                ║
    ╚════════════════════════════════════════════════════════════════╝
"#;

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn hint() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn meter_color(percent: u16) -> Color {
    if percent > 50 {
        Color::Green
    } else if percent > 20 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn draw_ui(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Title => draw_title_screen(f, app),
        Screen::CharacterCreation => draw_character_creation(f, app),
        Screen::Playing => match &app.engine {
            Some(engine) => draw_playing(f, app, engine),
            None => draw_title_screen(f, app),
        },
        Screen::Report => match &app.report {
            Some(report) => draw_report(f, report, app.report_scroll),
            None => draw_title_screen(f, app),
        },
    }
    draw_toasts(f, app);
}

fn draw_title_screen(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(15),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(f.area());

    let title = Paragraph::new(TITLE_ART)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    for (option, area) in MenuOption::ALL.iter().zip(&chunks[1..4]) {
        let style = if *option == app.menu {
            highlight()
        } else {
            Style::default().fg(Color::White)
        };
        let item = Paragraph::new(option.label())
            .style(style)
            .alignment(Alignment::Center);
        f.render_widget(item, *area);
    }

    let help = Paragraph::new("↑/↓ to select  •  ENTER to confirm  •  q to quit")
        .style(hint())
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[4]);
}

fn draw_character_creation(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(9),
            Constraint::Length(1),
        ])
        .split(f.area());

    let heading = Paragraph::new(" NEW AGENT REGISTRATION ")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(heading, chunks[0]);

    f.render_widget(&app.name_input, chunks[1]);

    let selected = app.selected_role();
    let mut lines = Vec::new();
    for role in Role::ALL {
        let marker = if role == selected { "▶ " } else { "  " };
        let style = if role == selected {
            highlight()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{} {}", role.icon(), role.name()), style),
        ]));
        if role == selected {
            lines.push(Line::styled(format!("    {}", role.description()), hint()));
        }
    }
    let roles = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Choose your role "))
        .wrap(Wrap { trim: false });
    f.render_widget(roles, chunks[2]);

    let help = Paragraph::new("type a name  •  ↑/↓/TAB role  •  ENTER begin  •  ESC back")
        .style(hint())
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[3]);
}

fn draw_playing(f: &mut Frame, app: &App, engine: &Engine) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(f.area());

    draw_status_bar(f, engine, chunks[0]);

    match engine.phase() {
        Phase::Briefing(number) => draw_briefing(f, engine, number, chunks[1]),
        Phase::Scenario { .. } => draw_question(f, app, engine, chunks[1]),
        Phase::Boss { .. } => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(6), Constraint::Min(6)])
                .split(chunks[1]);
            draw_boss_panel(f, engine, split[0]);
            draw_question(f, app, engine, split[1]);
        }
        Phase::Victory(number) => draw_victory(f, engine, number, chunks[1]),
        Phase::GameOver => draw_game_over(f, app, engine, chunks[1]),
        Phase::Complete => draw_complete(f, engine, chunks[1]),
    }

    draw_message_panel(f, app, engine, chunks[2]);
}

fn draw_status_bar(f: &mut Frame, engine: &Engine, area: Rect) {
    let hud = engine.hud();
    let chapter = engine.progress().current_chapter;
    let total = engine.catalog().chapter_count(hud.role);

    let status = Line::from(vec![
        Span::styled(
            " FIREWALL ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} {} ", hud.role.icon(), hud.player_name),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Chapter {}/{} ", chapter, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" LVL {} ({}%) ", hud.level, hud.xp_percent),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Security: {} ", hud.security),
            Style::default().fg(meter_color(hud.security_percent)),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Rep: {} ", hud.reputation),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    let status_block = Paragraph::new(status).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(status_block, area);
}

fn draw_briefing(f: &mut Frame, engine: &Engine, number: u32, area: Rect) {
    let Some(chapter) = engine.chapter() else {
        return;
    };
    let lines = vec![
        Line::raw(""),
        Line::styled(
            format!("CHAPTER {number}"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            chapter.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw(chapter.description.as_str()),
    ];
    let briefing = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Mission Briefing "));
    f.render_widget(briefing, area);
}

fn draw_question(f: &mut Frame, app: &App, engine: &Engine, area: Rect) {
    let Some(active) = engine.active_prompt() else {
        return;
    };
    let prompt = active.prompt();

    let (setup, title) = match active {
        ActivePrompt::Scenario(s) => (
            s.setup.as_str(),
            format!(" {} | {} ", s.category.label(), s.difficulty.tag()),
        ),
        ActivePrompt::Attack(a) => (
            a.description.as_str(),
            format!(" {} | {} ", a.name, prompt.category().label()),
        ),
    };

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let narrative = Paragraph::new(setup)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(narrative, main_chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(prompt.choices().len() as u16 + 4)])
        .split(main_chunks[1]);

    let artifact = Paragraph::new(artifact_lines(prompt.content()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", prompt.content().kind().to_uppercase())),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(artifact, right[0]);

    let picked = app.last.as_ref().map(|(choice, _)| choice.as_str());
    let mut lines = vec![Line::styled(
        prompt.question(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (i, choice) in prompt.choices().iter().enumerate() {
        let style = match picked {
            Some(_) if prompt.is_correct(&choice.id) => {
                Style::default().fg(Color::Black).bg(Color::Green)
            }
            Some(p) if p == choice.id => Style::default().fg(Color::White).bg(Color::Red),
            Some(_) => hint(),
            None if i == app.selected => highlight(),
            None => Style::default(),
        };
        lines.push(Line::styled(
            format!(" {}) {}", choice.id.to_uppercase(), choice.text),
            style,
        ));
    }
    let question = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Your call "))
        .wrap(Wrap { trim: false });
    f.render_widget(question, right[1]);
}

fn draw_boss_panel(f: &mut Frame, engine: &Engine, area: Rect) {
    let Some((boss, runtime)) = engine.boss() else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(
            " {} {} - {} ",
            boss.avatar.as_deref().unwrap_or("👾"),
            boss.name,
            boss.title
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let percent = if runtime.max_health == 0 {
        0
    } else {
        (runtime.health_display() * 100 / runtime.max_health).min(100) as u16
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Red).bg(Color::Black))
        .percent(percent)
        .label(format!("{}/{}", runtime.health_display(), runtime.max_health));
    f.render_widget(gauge, rows[0]);

    let attack = boss
        .attacks
        .get(runtime.attack_index)
        .map(|a| format!("Attack {}/{}: {}", runtime.attack_index + 1, boss.attacks.len(), a.name))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(attack).style(Style::default().fg(Color::Yellow)),
        rows[1],
    );

    if let Some(taunt) = boss
        .dialogue
        .get(runtime.attack_index)
        .or(boss.dialogue.first())
    {
        f.render_widget(
            Paragraph::new(format!("\"{taunt}\""))
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC))
                .wrap(Wrap { trim: true }),
            rows[2],
        );
    }
}

fn draw_victory(f: &mut Frame, engine: &Engine, number: u32, area: Rect) {
    let boss = engine.chapter().map(|c| c.boss.name.as_str()).unwrap_or("the threat");
    let mut lines = vec![
        Line::raw(""),
        Line::styled(
            format!("*** CHAPTER {number} COMPLETE ***"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!("{boss} has been neutralized.")),
        Line::raw(""),
        Line::styled("Key lessons:", Style::default().add_modifier(Modifier::BOLD)),
    ];
    lines.extend(
        engine
            .victory_lessons()
            .into_iter()
            .map(|lesson| Line::raw(format!("  ✓ {lesson}"))),
    );
    let victory = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" VICTORY! "));
    f.render_widget(victory, area);
}

fn draw_game_over(f: &mut Frame, app: &App, engine: &Engine, area: Rect) {
    if !app.game_over_revealed {
        let alarm = Paragraph::new("\n⚠️  Security integrity critical...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(alarm, area);
        return;
    }
    let lines = vec![
        Line::raw(""),
        Line::styled(
            "SECURITY BREACH",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!(
            "The network fell in chapter {}.",
            engine.progress().current_chapter
        )),
        Line::styled(
            format!("Reputation: {}", engine.progress().reputation),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(format!("Tip: {}", app.tip), Style::default().fg(Color::Yellow)),
    ];
    let over = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" GAME OVER "),
        );
    f.render_widget(over, area);
}

fn draw_complete(f: &mut Frame, engine: &Engine, area: Rect) {
    let p = engine.progress();
    let lines = vec![
        Line::raw(""),
        Line::styled(
            "MISSION COMPLETE",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!(
            "{} finished the {} track at level {}.",
            p.player_name,
            p.role.name(),
            p.level
        )),
        Line::raw(""),
        Line::raw(if engine.mistakes().is_empty() {
            "Flawless run. No mistakes logged.".to_string()
        } else {
            format!("{} mistake(s) logged for review.", engine.mistakes().len())
        }),
    ];
    let done = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(done, area);
}

fn feedback_lines(resolution: &Resolution) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    if resolution.correct {
        lines.push(Line::styled(
            format!(
                "✓ Correct!  +{} XP  +{} reputation",
                resolution.xp_gained, resolution.reputation_gained
            ),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
        if resolution.boss_damage > 0 {
            lines.push(Line::raw(format!("Boss takes {} damage.", resolution.boss_damage)));
        }
        if resolution.levels_gained > 0 {
            lines.push(Line::styled(
                "LEVEL UP!",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
        }
    } else {
        lines.push(Line::styled(
            format!(
                "✗ Wrong. Correct answer: {}  -{} security",
                resolution.correct_choice.to_uppercase(),
                resolution.security_lost
            ),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(explanation) = &resolution.explanation {
        lines.push(Line::raw(explanation.as_str()));
    }
    if let Some(lesson) = &resolution.lesson {
        lines.push(Line::styled(
            format!("Lesson ({}): {lesson}", resolution.category.label()),
            Style::default().fg(Color::Cyan),
        ));
    }
    lines
}

fn draw_message_panel(f: &mut Frame, app: &App, engine: &Engine, area: Rect) {
    let phase = engine.phase();
    let (lines, title, style) = match (&app.last, phase) {
        (_, Phase::GameOver) if app.game_over_revealed => (
            vec![Line::raw("r / ENTER restart chapter  •  q title screen")],
            " Checkpoint ",
            Style::default().fg(Color::White).bg(Color::Red),
        ),
        (Some((_, resolution)), _) => {
            let style = if resolution.correct {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            let mut lines = feedback_lines(resolution);
            lines.push(Line::styled("ENTER to continue", hint()));
            (lines, " Analysis ", style)
        }
        (None, Phase::Briefing(_)) => (
            vec![Line::raw("Stand by... (ENTER to skip)")],
            " Briefing ",
            hint(),
        ),
        (None, Phase::Victory(_)) => (
            vec![Line::raw("ENTER for the next chapter")],
            " VICTORY! ",
            Style::default().fg(Color::Black).bg(Color::Green),
        ),
        (None, Phase::Complete) => (
            vec![Line::raw("ENTER to view your security report")],
            " Complete ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        _ => (
            vec![Line::raw(
                "a-d or ↑/↓ + ENTER to answer  •  s save  •  q/ESC title screen",
            )],
            " Controls ",
            Style::default().fg(Color::Yellow),
        ),
    };
    let message = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .style(style);
    f.render_widget(message, area);
}

fn band_color(band: Band) -> Color {
    match band {
        Band::Good => Color::Green,
        Band::Warning => Color::Yellow,
        Band::Danger => Color::Red,
    }
}

fn status_color(status: CategoryStatus) -> Color {
    match status {
        CategoryStatus::Excellent | CategoryStatus::Good => Color::Green,
        CategoryStatus::NeedsWork => Color::Yellow,
        CategoryStatus::Poor => Color::Red,
    }
}

pub fn report_lines(report: &Report) -> Vec<Line<'_>> {
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::styled("SECURITY AWARENESS REPORT", heading),
        Line::raw(format!(
            "Agent: {}   Role: {} {}   Date: {}",
            report.player_name,
            report.role.icon(),
            report.role.name(),
            report.generated.format("%Y-%m-%d")
        )),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Overall accuracy: "),
            Span::styled(
                format!("{}%", report.accuracy),
                Style::default()
                    .fg(band_color(report.band))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "   Correct: {}/{}   Chapters: {}   Reputation: {}",
                report.total_correct, report.total_questions, report.chapters, report.reputation
            )),
        ]),
        Line::raw(""),
        Line::styled("Category breakdown", heading),
    ];

    for c in &report.categories {
        lines.push(Line::from(vec![
            Span::raw(format!(
                "  {:<28} {:>3}/{:<3} {:>3}%  ",
                c.category.label(),
                c.correct,
                c.total,
                c.percent
            )),
            Span::styled(c.status.label(), Style::default().fg(status_color(c.status))),
        ]));
    }
    if report.categories.is_empty() {
        lines.push(Line::styled("  No questions answered.", hint()));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("Recommendations", heading));
    for r in &report.recommendations {
        let title = match r.category {
            Some(category) => format!("  • {} ({})", r.title, category.label()),
            None => format!("  • {}", r.title),
        };
        lines.push(Line::styled(title, Style::default().add_modifier(Modifier::BOLD)));
        lines.push(Line::raw(format!("    {}", r.advice)));
    }

    if !report.mistakes.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Review your mistakes", heading));
        for m in &report.mistakes {
            lines.push(Line::from(vec![
                Span::styled(format!("  [{}] ", m.label), Style::default().fg(Color::Yellow)),
                Span::raw(m.lesson.as_str()),
            ]));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::raw(report.summary.as_str()));
    lines
}

fn draw_report(f: &mut Frame, report: &Report, scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let body = Paragraph::new(report_lines(report))
        .block(Block::default().borders(Borders::ALL).title(" Report "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, chunks[0]);

    let help = Paragraph::new("PgUp/PgDn to scroll  •  ENTER back to title")
        .style(hint())
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);
}

fn draw_toasts(f: &mut Frame, app: &App) {
    let area = f.area();
    let width = 40.min(area.width);
    for (i, toast) in app.toasts.iter().enumerate() {
        let y = area.y + 1 + (i as u16) * 4;
        if y + 4 > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, 4);
        let color = match toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Warning => Color::Yellow,
            ToastKind::Error => Color::Red,
        };
        let popup = Paragraph::new(toast.message.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", toast.title)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(popup, rect);
    }
}
