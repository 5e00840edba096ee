//! Dot Chase entry point
//!
//! Runs a headless demo round: a synthetic pointer chases the dot with a bit
//! of lag, the session scores the tracking, and the result lands in the high
//! score file. Useful for exercising the whole game loop without a window.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::IVec2;

use dot_chase::highscores::{self, HighScoreEntry, HighScoreTable};
use dot_chase::settings::Settings;
use dot_chase::sim::{GameEvent, GamePhase, GameSession};

/// Where the leaderboard lives
const SCORES_FILE: &str = "dot_chase_scores.txt";
/// Where user preferences live
const SETTINGS_FILE: &str = "dot_chase_settings.json";

/// Playing field used by the headless shell
const ARENA: IVec2 = IVec2::new(640, 480);
/// Demo loop step in seconds (10 ms, finer than any game interval)
const DEMO_DT: f32 = 0.010;
/// Fraction of the remaining gap the demo pointer closes per step.
/// First-order lag: it tracks well at low speeds and falls behind as
/// acceleration kicks in.
const POINTER_LAG: f32 = 0.08;
/// Hard cap on the demo, in steps, for infinite time limits
const MAX_DEMO_STEPS: u32 = 6000;

fn main() {
    env_logger::init();

    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xD07_CA5E);

    let mut session = GameSession::new(seed, ARENA);
    if !settings.apply(&mut session) {
        log::warn!("Some settings were out of range and kept their defaults");
    }

    log::info!("Starting demo round (seed {seed})");
    session.start();

    let mut pointer = session.dot().pos().as_vec2();
    let mut steps = 0;
    while session.phase() != GamePhase::GameOver && steps < MAX_DEMO_STEPS {
        pointer += (session.dot().pos().as_vec2() - pointer) * POINTER_LAG;
        for event in session.tick(DEMO_DT, pointer) {
            match event {
                GameEvent::Stats {
                    avg_error_ratio,
                    elapsed_secs,
                } => log::debug!("avg error ratio {avg_error_ratio:.2} at {elapsed_secs}s"),
                GameEvent::SpeedChanged(ms) => log::info!("dot speed now {ms} ms"),
                GameEvent::GameOver(reason) => log::info!("game over: {reason:?}"),
                GameEvent::DotMoved(_) => {}
            }
        }
        steps += 1;
    }

    println!("{}", session.score_text());
    record_result(&session);
}

/// Load the leaderboard, insert this round, and rewrite the file.
/// A broken score file costs the leaderboard entry, never the round.
fn record_result(session: &GameSession) {
    let path = Path::new(SCORES_FILE);
    let mut table = match HighScoreTable::load(path) {
        Ok(table) => table,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HighScoreTable::new(),
        Err(e) => {
            log::warn!("High score file unavailable, round not recorded: {e}");
            return;
        }
    };

    let score = session.score();
    if table.qualifies(score) {
        let entry = HighScoreEntry {
            name: highscores::sanitize_name("demo"),
            score,
            game_secs: session.elapsed_secs(),
            dot_diameter: session.dot().diameter(),
            final_speed_ms: session.speed_ms(),
        };
        if let Some(rank) = table.insert(entry) {
            println!("New high score! Rank {rank}");
        }
    }

    if let Err(e) = table.save(path) {
        log::warn!("Could not save high scores: {e}");
    }
}
