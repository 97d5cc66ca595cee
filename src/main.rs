//! Campus Dodge headless runner
//!
//! Plays one scripted run against the simulation core, feeding it uneven
//! frame times the way a real render loop would, and prints the outcome.
//!
//! Usage: `campus-dodge [settings.json]`

use campus_dodge::{
    Session, Settings,
    audio::{AudioManager, LogBackend},
    sim::{AnimationLibrary, Direction, DirectionSet},
};

/// Stop after this much simulated time even if the clock never runs out
const MAX_RUN_MS: f32 = 120_000.0;

/// Frame gaps cycled through to mimic a jittery display
const FRAME_TIMES_MS: [f32; 6] = [16.0, 17.0, 16.5, 33.0, 15.0, 8.0];

fn main() {
    env_logger::init();
    log::info!("Campus Dodge (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    if let Err(e) = run(settings) {
        eprintln!("Run failed: {}", e);
        std::process::exit(1);
    }
}

fn run(settings: Settings) -> Result<(), campus_dodge::SessionError> {
    let (width, height) = (settings.arena_width, settings.arena_height);
    let audio = AudioManager::from_settings(LogBackend, &settings);

    let mut session = Session::new(settings, AnimationLibrary::builtin())?;
    session.subscribe(Box::new(audio));
    session.init(width, height)?;

    let mut elapsed_ms = 0.0;
    let mut frame = 0usize;
    while !session.is_game_over() && elapsed_ms < MAX_RUN_MS {
        session.set_directional_input(scripted_keys(elapsed_ms));
        let dt = FRAME_TIMES_MS[frame % FRAME_TIMES_MS.len()];
        let report = session.tick(dt)?;
        if report.penalties > 0 {
            println!(
                "{:>7.1}s  bumped: -{}s, {}s left",
                elapsed_ms / 1000.0,
                report.penalty_seconds,
                session.remaining_seconds()
            );
        }
        elapsed_ms += dt;
        frame += 1;
    }

    let snapshot = session.snapshot()?;
    println!("\nRun finished after {:.1}s of frames", elapsed_ms / 1000.0);
    println!("  remaining seconds: {}", snapshot.remaining_seconds);
    println!("  game over:         {}", snapshot.is_game_over);
    println!("  enemies on field:  {}", snapshot.entities.len().saturating_sub(1));
    if let Some(stats) = session.stats() {
        println!("  steps simulated:   {}", stats.ticks);
        println!("  enemies spawned:   {}", stats.enemies_spawned);
        println!(
            "  penalties:         {} ({}s lost)",
            stats.penalties, stats.penalty_seconds
        );
    }
    Ok(())
}

/// Walk a slow square around the lower half of the arena
fn scripted_keys(elapsed_ms: f32) -> DirectionSet {
    let leg = (elapsed_ms / 1500.0) as u32 % 5;
    let keys: &[Direction] = match leg {
        0 => &[Direction::Left],
        1 => &[Direction::Up],
        2 => &[Direction::Right],
        3 => &[Direction::Down],
        _ => &[],
    };
    keys.iter().copied().collect()
}
