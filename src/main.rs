mod animation;
mod animation_logic;
mod board;
mod build_info;
mod click_logic;
mod config;
mod constants;
mod data;
mod entities;
mod game;
mod player;
mod threat;
mod transitions;
mod ui;

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use rand::rngs::ThreadRng;
use ratatui::{backend::CrosstermBackend, Terminal};

use animation::AnimationPhase;
use board::Annotation;
use click_logic::BoardEvent;
use config::{load_game_config, load_layouts, ConfigError, GameConfig, MapLayout};
use constants::TICK_INTERVAL_MS;
use game::GameSession;
use ui::UiScreen;

const GAME_CONFIG_PATH: &str = "config/game.json";
const MAPS_PATH: &str = "config/maps.json";
const MESSAGE_LOG_CAPACITY: usize = 50;

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!(
                    "mindsweeper {} ({})",
                    build_info::BUILD_DATE,
                    build_info::BUILD_COMMIT
                );
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("MindSweeper - Tile-Reveal Dungeon Crawler\n");
                println!("Usage: mindsweeper [command]\n");
                println!("Commands:");
                println!("  --version  Show version information");
                println!("  --help     Show this help message");
                println!();
                println!("Optional config files:");
                println!("  {GAME_CONFIG_PATH}  Entity catalog and starting stats");
                println!("  {MAPS_PATH}  Board layouts");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run 'mindsweeper --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    let session = match build_session() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Failed to load game data: {e}");
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, session);

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Loads config and maps from disk when present, falling back to the
/// built-in data otherwise.
fn build_session() -> Result<GameSession, ConfigError> {
    let config: GameConfig = if Path::new(GAME_CONFIG_PATH).exists() {
        load_game_config(Path::new(GAME_CONFIG_PATH))?
    } else {
        data::builtin_game_config()
    };

    let layouts: Vec<MapLayout> = if Path::new(MAPS_PATH).exists() {
        load_layouts(Path::new(MAPS_PATH))?
    } else {
        data::builtin_layouts()
    };

    GameSession::new(config, layouts, Utc::now().timestamp())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut session: GameSession,
) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut cursor = (session.rows() / 2, session.cols() / 2);
    let mut screen = UiScreen::Game;
    let mut messages = vec!["You descend into the cave. Good luck.".to_string()];

    loop {
        terminal.draw(|frame| ui::draw(frame, &session, cursor, screen, &messages))?;

        if event::poll(Duration::from_millis(TICK_INTERVAL_MS))? {
            if let Event::Key(key_event) = event::read()? {
                match screen {
                    UiScreen::Game => {
                        let keep_running = handle_game_key(
                            key_event.code,
                            &mut session,
                            &mut cursor,
                            &mut screen,
                            &mut messages,
                            &mut rng,
                        );
                        if !keep_running {
                            break;
                        }
                    }
                    UiScreen::Entities | UiScreen::Help => match key_event.code {
                        KeyCode::Esc | KeyCode::Char('q') => screen = UiScreen::Game,
                        KeyCode::Char('e') => screen = UiScreen::Game,
                        KeyCode::Char('?') => screen = UiScreen::Game,
                        _ => {}
                    },
                }
            }
        }

        // Advance animations every frame
        let events = session.tick(Instant::now(), &mut rng);
        push_event_messages(&mut messages, &events, &session);
        trim_messages(&mut messages);
    }

    Ok(())
}

/// Returns false when the player quits.
fn handle_game_key(
    code: KeyCode,
    session: &mut GameSession,
    cursor: &mut (usize, usize),
    screen: &mut UiScreen,
    messages: &mut Vec<String>,
    rng: &mut ThreadRng,
) -> bool {
    match code {
        KeyCode::Char('q') => return false,

        KeyCode::Up | KeyCode::Char('k') => move_cursor(cursor, -1, 0, session),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(cursor, 1, 0, session),
        KeyCode::Left | KeyCode::Char('h') => move_cursor(cursor, 0, -1, session),
        KeyCode::Right | KeyCode::Char('l') => move_cursor(cursor, 0, 1, session),

        KeyCode::Enter | KeyCode::Char(' ') => {
            let now = Instant::now();
            let events = session.handle_click(cursor.0, cursor.1, now, rng);

            // Cosmetic fade on the tile that killed us
            if events
                .iter()
                .any(|e| matches!(e, BoardEvent::PlayerDied { .. }))
            {
                session.start_animation(cursor.0, cursor.1, AnimationPhase::Dying, now);
            }

            push_event_messages(messages, &events, session);
        }

        KeyCode::Char('u') => {
            let events = session.level_up();
            push_event_messages(messages, &events, session);
        }

        KeyCode::Char('n') => match session.reset(Utc::now().timestamp(), rng) {
            Ok(()) => {
                *cursor = (session.rows() / 2, session.cols() / 2);
                messages.push("You descend into a new cave.".to_string());
            }
            Err(e) => messages.push(format!("Could not load a new cave: {e}")),
        },

        KeyCode::Char('e') => *screen = UiScreen::Entities,
        KeyCode::Char('?') => *screen = UiScreen::Help,

        // Admin: lay the whole cave bare
        KeyCode::Char('x') => {
            session.reveal_all();
            messages.push("The cave lies bare before you.".to_string());
        }

        // Annotations on the hovered tile
        KeyCode::Char('*') => session.set_annotation(cursor.0, cursor.1, Annotation::Danger),
        KeyCode::Char('f') => session.set_annotation(cursor.0, cursor.1, Annotation::Friendly),
        KeyCode::Char('c') => session.clear_annotation(cursor.0, cursor.1),
        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
            if let Some(level) = c.to_digit(10) {
                session.set_annotation(cursor.0, cursor.1, Annotation::Level(level as u8));
            }
        }

        _ => {}
    }

    trim_messages(messages);
    true
}

fn move_cursor(cursor: &mut (usize, usize), d_row: i32, d_col: i32, session: &GameSession) {
    let row = (cursor.0 as i32 + d_row).clamp(0, session.rows() as i32 - 1);
    let col = (cursor.1 as i32 + d_col).clamp(0, session.cols() as i32 - 1);
    *cursor = (row as usize, col as usize);
}

/// Maps board events to log lines.
fn push_event_messages(messages: &mut Vec<String>, events: &[BoardEvent], session: &GameSession) {
    for event in events {
        match event {
            BoardEvent::CombatResolved {
                name,
                damage,
                experience,
            } => {
                messages.push(format!("Fought {name}: -{damage} HP, +{experience} XP"));
            }
            BoardEvent::PlayerDied { cause } => {
                messages.push(format!("You died. Slain by {cause}."));
            }
            BoardEvent::VictoryAchieved { source } => {
                messages.push(format!("Victory! {source} is defeated."));
            }
            BoardEvent::TreasureClaimed { name } => {
                messages.push(format!("Claimed {name}."));
            }
            BoardEvent::Healed { amount } => {
                messages.push(format!("Recovered {amount} health."));
            }
            BoardEvent::ExperienceGained { amount } => {
                messages.push(format!("Gained {amount} experience."));
            }
            BoardEvent::TilesRevealed { count } => {
                messages.push(format!("{count} hidden tiles revealed."));
            }
            BoardEvent::MinesWeakened { count } => {
                messages.push(format!("{count} mines fizzle into duds."));
            }
            BoardEvent::EntityTransitioned { entity_id, .. } => {
                if let Some(def) = session.definition(*entity_id) {
                    if def.id != constants::EMPTY_ENTITY_ID {
                        messages.push(format!("A {} appears.", def.name));
                    }
                }
            }
            BoardEvent::LeveledUp { level } => {
                messages.push(format!("Level up! You are now level {level}."));
            }
            // Board feedback is enough for these
            BoardEvent::InputBlocked { .. } | BoardEvent::TileRevealed { .. } => {}
        }
    }
}

fn trim_messages(messages: &mut Vec<String>) {
    if messages.len() > MESSAGE_LOG_CAPACITY {
        let excess = messages.len() - MESSAGE_LOG_CAPACITY;
        messages.drain(..excess);
    }
}
