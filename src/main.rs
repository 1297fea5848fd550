mod config;
mod content;
mod error;
mod game;
mod report;
mod save;
mod ui;

use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::{Cli, Settings};
use content::{load_catalog, Catalog, Role};
use ui::{draw_ui, App};

const FRAME: Duration = Duration::from_millis(100);

fn init_logging(settings: &Settings) -> Result<()> {
    let file = File::create(&settings.log_file)
        .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .target(env_logger::Target::Pipe(Box::new(file)))
    .init();
    Ok(())
}

fn print_summary(catalog: &Catalog) {
    println!("content ok: {} scenarios", catalog.scenario_count());
    for role in Role::ALL {
        let chapters = catalog.chapters(role);
        let bosses: Vec<&str> = chapters.iter().map(|c| c.boss.name.as_str()).collect();
        println!(
            "  {:<10} {} chapter(s), bosses: {}",
            role.key(),
            chapters.len(),
            bosses.join(", ")
        );
    }
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last = Instant::now();
    while !app.should_quit() {
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        let now = Instant::now();
        app.tick(now - last);
        last = now;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    init_logging(&settings)?;

    let catalog = load_catalog(&settings.content_dir)?;
    if settings.check_only {
        print_summary(&catalog);
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&catalog, settings);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("terminal loop failed: {e:#}");
    }
    result?;
    println!("\nStay vigilant, agent.\n");
    Ok(())
}
