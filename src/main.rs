/// Entry point and turn loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::io;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::entity::{Direction, Intent};
use sim::event::GameEvent;
use sim::score;
use sim::step;
use sim::world::{Phase, Session};
use ui::input::{self, Action, Key};
use ui::renderer::{Renderer, Status};
use ui::replay::{Pace, Replay};

const INTRO: [&str; 3] = [
    "Stir crazy from shelter-in-place orders, you decide to go for a walk in the woods.",
    "There are a few infectious like-minded individuals in the forest on this day.",
    "Exit the forest while maintaining social distancing. You can gain points by removing trees.",
];

const ACTION_PROMPT: &str = "Move (h/j/k/l), chop (c) or fire (f): ";
const DIRECTION_PROMPT: &str = "Which direction? (h/j/k/l): ";
const EXIT_PROMPT: &str = "Press any key to exit.";

fn main() {
    init_tracing();
    let config = GameConfig::load();
    let high_score = score::load_high_score(&config.score_file);

    let dimension = match config.board.dimension {
        Some(d) => d,
        None => match input::prompt_dimension(&mut io::stdin().lock(), &mut io::stdout()) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("No board dimension given: {e}");
                return;
            }
        },
    };

    let seed = config.board.seed.unwrap_or_else(clock_seed);
    info!(seed, dimension, high_score, "starting session");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut session = match Session::new(dimension, high_score, &mut rng) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Could not start: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new(session.grid.side());

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    if let Some(msg) = end_message(session.phase) {
        println!("{msg}");
    }
    match score::save_if_higher(&config.score_file, session.score, session.high_score) {
        Ok(true) => println!("New high score!"),
        Ok(false) => {}
        Err(e) => warn!(path = %config.score_file.display(), error = %e, "could not save high score"),
    }
    println!("Final Score: {}", session.score);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn end_message(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Playing => None,
        Phase::LostEnergy => Some("You ran out of energy and died alone in the woods."),
        Phase::LostInfected => Some(
            "You've failed to maintain a radius of six feet from infected hikers and will now suffer the consequences.",
        ),
        Phase::Won => Some("You've managed to follow the safety guidelines. Humanity thanks you."),
    }
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    renderer.render_text(&INTRO)?;
    thread::sleep(config.timing.intro);

    let mut message = String::new();

    while !session.phase.is_over() {
        let Some(intent) = read_intent(session, renderer, &mut message)? else {
            info!(score = session.score, "aborted by player");
            return Ok(());
        };

        let before = session.clone();
        let events = step::step(session, intent)?;
        message.clear();
        if events.iter().any(|e| matches!(e, GameEvent::MoveBlocked { .. })) {
            message.push_str("You can't move there.");
        }
        play_events(renderer, before, &events, config)?;
    }

    let status = Status {
        message: end_message(session.phase).unwrap_or_default(),
        prompt: EXIT_PROMPT,
        ..Status::default()
    };
    renderer.render(&session.snapshot(), &status)?;
    input::read_key()?;
    Ok(())
}

/// Prompt until the player produces a complete intent. `None` on Ctrl+C.
fn read_intent(
    session: &Session,
    renderer: &mut Renderer,
    message: &mut String,
) -> io::Result<Option<Intent>> {
    // Chop / fire waiting for their direction key.
    let mut pending: Option<fn(Direction) -> Intent> = None;

    loop {
        let prompt = if pending.is_some() { DIRECTION_PROMPT } else { ACTION_PROMPT };
        let status = Status { message: message.as_str(), prompt, ..Status::default() };
        renderer.render(&session.snapshot(), &status)?;

        let code = match input::read_key()? {
            Key::Abort => return Ok(None),
            Key::Code(code) => code,
        };

        let parsed = match pending {
            Some(make) => input::parse_direction(code).map(|dir| Some(make(dir))),
            None => match input::parse_action(code) {
                Ok(Action::Move(dir)) => Ok(Some(Intent::Move(dir))),
                Ok(Action::Chop) => {
                    pending = Some(Intent::Chop);
                    Ok(None)
                }
                Ok(Action::Fire) => {
                    pending = Some(Intent::Fire);
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        };

        match parsed {
            Ok(Some(intent)) => return Ok(Some(intent)),
            Ok(None) => message.clear(),
            Err(e) => {
                debug!(error = %e, "key rejected");
                *message = "Invalid choice.".into();
            }
        }
    }
}

fn play_events(
    renderer: &mut Renderer,
    before: Session,
    events: &[GameEvent],
    config: &GameConfig,
) -> io::Result<()> {
    let mut replay = Replay::new(before, events);
    while let Some(beat) = replay.advance() {
        let status = Status { banner: &beat.banner, ..Status::default() };
        renderer.render(&replay.scene().snapshot(), &status)?;
        thread::sleep(match beat.pace {
            Pace::Chop => config.timing.chop_frame,
            Pace::Fire => config.timing.fire_frame,
            Pace::Victory => config.timing.victory_frame,
        });
    }
    Ok(())
}
