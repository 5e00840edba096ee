//! Dot Chase - a cursor-tracking casual game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (dot motion, scoring, state machine)
//! - `highscores`: Persistent top-10 leaderboard (flat text file)
//! - `settings`: Validated user configuration (JSON)
//!
//! The library is headless: it never reads a clock, the mouse, or a window.
//! A shell feeds it elapsed time and a pointer position through
//! [`sim::GameSession::tick`] and reacts to the returned [`sim::GameEvent`]s.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScoreTable;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fastest dot update interval, in milliseconds between moves
    pub const DOT_SPEED_MIN_MS: u32 = 2;
    /// Default dot update interval
    pub const DOT_SPEED_DEFAULT_MS: u32 = 40;
    /// Slowest dot update interval
    pub const DOT_SPEED_MAX_MS: u32 = 50;

    /// Minimum diameter of the dot, in pixels
    pub const DOT_DIAM_MIN: u32 = 8;
    /// Default diameter of the dot
    pub const DOT_DIAM_DEFAULT: u32 = 20;
    /// Maximum diameter of the dot
    pub const DOT_DIAM_MAX: u32 = 50;

    /// Speed-up rate that disables acceleration entirely
    pub const DOT_ACCEL_MIN: u32 = 0;
    /// Default speed-up rate (the update interval shrinks by this many ms per step)
    pub const DOT_ACCEL_DEFAULT: u32 = 1;
    /// Maximum speed-up rate
    pub const DOT_ACCEL_MAX: u32 = 5;
    /// Milliseconds between automatic speed increases
    pub const ACCEL_INTERVAL_MS: u32 = 2000;

    /// Weight of the previous motion vector when blending in a new random one.
    /// Must stay strictly between 0 and 1.
    pub const MOTION_WEIGHT: f32 = 0.7;

    /// Milliseconds between tracking-statistics samples
    pub const STATS_INTERVAL_MS: u32 = 80;
    /// Sample window of the error-ratio moving average
    pub const ERROR_AVERAGING_WINDOW: u32 = 16;
    /// Starting value of the running error average. Non-zero so the average
    /// stabilizes within a few samples instead of creeping up from zero.
    pub const ERROR_AVG_SEED: f32 = 3.0;
    /// Running error ratio at which the round ends
    pub const ERROR_RATIO_LIMIT: f32 = 30.0;

    /// Scale applied to the distance component of the score increment
    pub const SCORE_DIST_SCALE: f32 = 10.0;
    /// Divisor applied to the composite score increment
    pub const SCORE_DIVISOR: f32 = 40.0;

    /// Default length of a timed round, in seconds
    pub const GAME_LENGTH_DEFAULT_S: u32 = 10;
    /// Time limit value meaning "play forever"
    pub const GAME_LENGTH_INFINITE: u32 = 0;

    /// Default background hue (HSV degrees); 203 is a soft blue
    pub const BACKGROUND_HUE_DEFAULT: u32 = 203;
    /// Hues are HSV degrees
    pub const BACKGROUND_HUE_MAX: u32 = 360;
}
