//! Scoring, pacing, and the game state machine
//!
//! The session owns the dot and advances everything from a single
//! [`GameSession::tick`] entry point. The host decides how wall-clock time
//! maps onto ticks (a real timer loop, the demo shell, or a test stepping
//! manually); nothing in here reads a clock of its own.

use glam::{IVec2, Vec2};

use crate::consts::*;
use crate::sim::Dot;

/// Phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting to start or resume
    Paused,
    /// Round in progress
    Running,
    /// Round ended; a click starts a new one
    GameOver,
}

/// Why the last round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Survived the configured time limit
    TimeLimit,
    /// The running error average crossed `ERROR_RATIO_LIMIT`
    Distance,
}

/// Observable outputs of a tick, for whatever shell hosts the game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The dot moved
    DotMoved(IVec2),
    /// The dot's update interval changed, in milliseconds
    SpeedChanged(u32),
    /// Fresh tracking statistics for a status display
    Stats {
        avg_error_ratio: f32,
        elapsed_secs: u32,
    },
    /// The round ended
    GameOver(GameOverReason),
}

/// One player session: the dot, the score, and the state machine
#[derive(Debug, Clone)]
pub struct GameSession {
    dot: Dot,
    phase: GamePhase,
    over_reason: Option<GameOverReason>,
    /// Seconds of play in the current round, excluding paused time
    elapsed_secs: u32,
    /// Requested round length in seconds; `GAME_LENGTH_INFINITE` disables the limit
    time_limit_secs: u32,
    /// Cumulative score for the current round, non-decreasing while running
    score: f32,
    /// Exponential moving average of the pointer-to-dot error ratio
    avg_error_ratio: f32,
    /// Current milliseconds between dot moves (lower is faster)
    speed_ms: u32,
    /// Speed the user picked; restored at the start of a round when accelerating
    default_speed_ms: u32,
    /// Interval decrement applied every `ACCEL_INTERVAL_MS`; 0 disables
    acceleration: u32,
    /// True until acceleration bottoms out at `DOT_SPEED_MIN_MS`
    accelerating: bool,
    // Time accumulators for the periodic updates, in seconds
    motion_acc: f32,
    stats_acc: f32,
    second_acc: f32,
    accel_acc: f32,
    /// Events produced since the last drain, oldest first
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a paused session with the dot centered in `arena`
    pub fn new(seed: u64, arena: IVec2) -> Self {
        Self {
            dot: Dot::new(seed, arena, arena / 2),
            phase: GamePhase::Paused,
            over_reason: None,
            elapsed_secs: 0,
            time_limit_secs: GAME_LENGTH_DEFAULT_S,
            score: 0.0,
            avg_error_ratio: ERROR_AVG_SEED,
            speed_ms: DOT_SPEED_DEFAULT_MS,
            default_speed_ms: DOT_SPEED_DEFAULT_MS,
            acceleration: DOT_ACCEL_DEFAULT,
            accelerating: false,
            motion_acc: 0.0,
            stats_acc: 0.0,
            second_acc: 0.0,
            accel_acc: 0.0,
            events: Vec::new(),
        }
    }

    pub fn dot(&self) -> &Dot {
        &self.dot
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn over_reason(&self) -> Option<GameOverReason> {
        self.over_reason
    }

    pub fn score(&self) -> u32 {
        self.score as u32
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn avg_error_ratio(&self) -> f32 {
        self.avg_error_ratio
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Score rendered the way the HUD shows it
    pub fn score_text(&self) -> String {
        format!("Score: {:5}", self.score as u32)
    }

    // === State transitions ===

    /// Begin a new round: stats reset, then straight into Running
    pub fn start(&mut self) {
        self.reset_stats();
        self.unpause();
    }

    /// Halt all periodic updates. Only meaningful while running.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    /// Restart periodic updates. Only meaningful while paused.
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.unpause();
        }
    }

    /// Dispatch a click by phase: Running pauses, Paused resumes, GameOver
    /// starts a fresh round.
    pub fn handle_click(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => self.start(),
        }
    }

    fn unpause(&mut self) {
        // Periodic updates restart on fresh intervals, like timers would
        self.motion_acc = 0.0;
        self.stats_acc = 0.0;
        self.second_acc = 0.0;
        self.accel_acc = 0.0;
        self.accelerating = self.acceleration > 0;
        self.phase = GamePhase::Running;
    }

    fn reset_stats(&mut self) {
        self.score = 0.0;
        self.elapsed_secs = 0;
        self.over_reason = None;
        if self.acceleration > 0 {
            self.speed_ms = self.default_speed_ms;
            self.events.push(GameEvent::SpeedChanged(self.speed_ms));
        }
        self.avg_error_ratio = ERROR_AVG_SEED;
        // the dot stays wherever the last round left it
    }

    /// Record why the round ended and freeze play
    fn end_game(&mut self, reason: GameOverReason) {
        self.over_reason = Some(reason);
        self.pause();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver(reason));
    }

    // === Configuration ===

    /// Set how often the dot moves, in milliseconds between updates.
    ///
    /// While a round is running this only adjusts the live speed (the same
    /// path acceleration uses); otherwise it also becomes the default that is
    /// restored at the start of the next round. Returns false for values
    /// outside `DOT_SPEED_MIN_MS..=DOT_SPEED_MAX_MS`.
    pub fn set_speed(&mut self, speed_ms: u32) -> bool {
        if !(DOT_SPEED_MIN_MS..=DOT_SPEED_MAX_MS).contains(&speed_ms) {
            return false;
        }
        self.speed_ms = speed_ms;
        if self.phase != GamePhase::Running {
            self.default_speed_ms = speed_ms;
        }
        true
    }

    /// Set the per-interval speed-up amount; 0 disables acceleration.
    /// Returns false above `DOT_ACCEL_MAX`.
    pub fn set_acceleration(&mut self, acceleration: u32) -> bool {
        if acceleration > DOT_ACCEL_MAX {
            return false;
        }
        self.acceleration = acceleration;
        self.accelerating = acceleration > 0 && self.phase == GamePhase::Running;
        true
    }

    /// Set the round length in seconds. `GAME_LENGTH_INFINITE` (0) disables
    /// the limit; the type already rules out negative values.
    pub fn set_time_limit(&mut self, secs: u32) {
        self.time_limit_secs = secs;
    }

    /// Change the dot's diameter; rejects values outside the legal range
    pub fn set_dot_diameter(&mut self, diameter: u32) -> bool {
        self.dot.set_diameter(diameter)
    }

    /// Window-resize hook. The dot keeps its offset from the arena center.
    pub fn set_arena(&mut self, arena: IVec2) {
        self.dot.set_arena(arena);
        self.events.push(GameEvent::DotMoved(self.dot.pos()));
    }

    // === Periodic updates ===

    /// Move the dot one step. Fires on the speed interval while running.
    pub fn advance_dot(&mut self) -> IVec2 {
        let pos = self.dot.advance();
        self.events.push(GameEvent::DotMoved(pos));
        pos
    }

    /// Once-a-second bookkeeping: elapsed time and the time-limit check
    pub fn tick_second(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.elapsed_secs += 1;
        if self.time_limit_secs != GAME_LENGTH_INFINITE && self.elapsed_secs >= self.time_limit_secs
        {
            self.end_game(GameOverReason::TimeLimit);
        }
    }

    /// Sample tracking accuracy against `pointer` and grow the score.
    ///
    /// The error ratio feeds a 16-sample moving average. The score increment
    /// rewards a small average and a fast dot, cubed so near-perfect tracking
    /// pays disproportionately; a negative increment is dropped, keeping the
    /// score monotonic. An average at or past `ERROR_RATIO_LIMIT` ends the
    /// round.
    pub fn sample_stats(&mut self, pointer: Vec2) {
        if self.phase != GamePhase::Running {
            return;
        }
        let ratio = self.dot.error_ratio(pointer);
        let window = ERROR_AVERAGING_WINDOW as f32;
        self.avg_error_ratio = (self.avg_error_ratio * (window - 1.0) + ratio) / window;
        self.events.push(GameEvent::Stats {
            avg_error_ratio: self.avg_error_ratio,
            elapsed_secs: self.elapsed_secs,
        });

        let dist_comp =
            SCORE_DIST_SCALE * (ERROR_RATIO_LIMIT - self.avg_error_ratio) / ERROR_RATIO_LIMIT;
        let speed_comp = (DOT_SPEED_MAX_MS - self.speed_ms) as f32
            / (DOT_SPEED_MAX_MS - DOT_SPEED_MIN_MS) as f32;
        let increment = dist_comp.powi(3) * speed_comp / SCORE_DIVISOR;
        if increment > 0.0 {
            self.score += increment;
        }

        if self.avg_error_ratio >= ERROR_RATIO_LIMIT {
            self.end_game(GameOverReason::Distance);
        }
    }

    /// Speed the dot up by one acceleration step, stopping at the floor
    pub fn tick_accel(&mut self) {
        if self.phase != GamePhase::Running || !self.accelerating {
            return;
        }
        self.speed_ms = self
            .speed_ms
            .saturating_sub(self.acceleration)
            .max(DOT_SPEED_MIN_MS);
        if self.speed_ms == DOT_SPEED_MIN_MS {
            self.accelerating = false;
        }
        self.events.push(GameEvent::SpeedChanged(self.speed_ms));
    }

    /// Advance the session by `dt_secs` of real time.
    ///
    /// Drives the periodic updates at their own cadences: dot motion every
    /// `speed_ms`, statistics every `STATS_INTERVAL_MS`, elapsed time once a
    /// second, and acceleration every `ACCEL_INTERVAL_MS` while enabled.
    /// `pointer` is the shell's current cursor position in arena coordinates.
    /// Returns the events produced, oldest first. Does nothing while paused
    /// or after game over.
    pub fn tick(&mut self, dt_secs: f32, pointer: Vec2) -> Vec<GameEvent> {
        if self.phase == GamePhase::Running {
            self.motion_acc += dt_secs;
            self.stats_acc += dt_secs;
            self.second_acc += dt_secs;

            let motion_interval = self.speed_ms as f32 / 1000.0;
            while self.motion_acc >= motion_interval && self.phase == GamePhase::Running {
                self.motion_acc -= motion_interval;
                self.advance_dot();
            }

            let stats_interval = STATS_INTERVAL_MS as f32 / 1000.0;
            while self.stats_acc >= stats_interval && self.phase == GamePhase::Running {
                self.stats_acc -= stats_interval;
                self.sample_stats(pointer);
            }

            while self.second_acc >= 1.0 && self.phase == GamePhase::Running {
                self.second_acc -= 1.0;
                self.tick_second();
            }

            if self.accelerating {
                self.accel_acc += dt_secs;
                let accel_interval = ACCEL_INTERVAL_MS as f32 / 1000.0;
                while self.accel_acc >= accel_interval && self.accelerating {
                    self.accel_acc -= accel_interval;
                    self.tick_accel();
                }
            }
        }
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: IVec2 = IVec2::new(640, 480);

    fn running_session() -> GameSession {
        let mut session = GameSession::new(7, ARENA);
        session.start();
        session
    }

    /// Pointer sitting exactly on the dot
    fn on_dot(session: &GameSession) -> Vec2 {
        session.dot().pos().as_vec2()
    }

    #[test]
    fn test_new_session_is_paused() {
        let session = GameSession::new(1, ARENA);
        assert_eq!(session.phase(), GamePhase::Paused);
        assert_eq!(session.score(), 0);
        assert_eq!(session.elapsed_secs(), 0);
        assert!(session.over_reason().is_none());
    }

    #[test]
    fn test_click_dispatch() {
        let mut session = GameSession::new(1, ARENA);
        session.handle_click();
        assert_eq!(session.phase(), GamePhase::Running);
        session.handle_click();
        assert_eq!(session.phase(), GamePhase::Paused);
        session.handle_click();
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn test_click_after_game_over_starts_fresh_round() {
        let mut session = running_session();
        session.set_time_limit(1);
        session.tick_second();
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.over_reason(), Some(GameOverReason::TimeLimit));

        session.handle_click();
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.score(), 0);
        assert_eq!(session.elapsed_secs(), 0);
        assert!(session.over_reason().is_none());
    }

    #[test]
    fn test_avg_moves_by_one_sixteenth_on_perfect_sample() {
        let mut session = running_session();
        assert_eq!(session.speed_ms(), DOT_SPEED_DEFAULT_MS);
        assert!((session.avg_error_ratio() - ERROR_AVG_SEED).abs() < 1e-6);

        // Zero error distance: the average decays toward 0 by 1/16 of itself
        session.sample_stats(on_dot(&session));
        let expected = ERROR_AVG_SEED * 15.0 / 16.0;
        assert!((session.avg_error_ratio() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_score_grows_with_good_tracking() {
        let mut session = running_session();
        session.sample_stats(on_dot(&session));
        assert!(session.score > 0.0);
    }

    #[test]
    fn test_score_is_monotonic() {
        let mut session = running_session();
        let mut last = 0.0;
        // Alternate close and very distant samples; the score must never drop
        for i in 0..200 {
            let pointer = if i % 2 == 0 {
                on_dot(&session)
            } else {
                on_dot(&session) + Vec2::new(400.0, 0.0)
            };
            session.sample_stats(pointer);
            assert!(session.score >= last);
            last = session.score;
            if session.phase() != GamePhase::Running {
                break;
            }
        }
    }

    #[test]
    fn test_distance_game_over() {
        let mut session = running_session();
        // Keep the pointer hopeless; the average must cross the limit
        let far = Vec2::new(10_000.0, 10_000.0);
        for _ in 0..500 {
            session.sample_stats(far);
            if session.phase() == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.over_reason(), Some(GameOverReason::Distance));
    }

    #[test]
    fn test_time_limit_fires_exactly_once() {
        let mut session = running_session();
        session.set_time_limit(10);
        let mut over_events = 0;
        for _ in 0..15 {
            session.tick_second();
        }
        for event in session.tick(0.0, Vec2::ZERO) {
            if matches!(event, GameEvent::GameOver(GameOverReason::TimeLimit)) {
                over_events += 1;
            }
        }
        assert_eq!(over_events, 1);
        assert_eq!(session.phase(), GamePhase::GameOver);
        // The counter froze when the game ended
        assert_eq!(session.elapsed_secs(), 10);
    }

    #[test]
    fn test_infinite_game_never_times_out() {
        let mut session = running_session();
        session.set_time_limit(GAME_LENGTH_INFINITE);
        for _ in 0..100 {
            session.tick_second();
        }
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.elapsed_secs(), 100);
    }

    #[test]
    fn test_elapsed_only_counts_while_running() {
        let mut session = running_session();
        session.set_time_limit(GAME_LENGTH_INFINITE);
        session.tick_second();
        session.pause();
        session.tick_second();
        session.tick_second();
        assert_eq!(session.elapsed_secs(), 1);
    }

    #[test]
    fn test_set_speed_validation() {
        let mut session = GameSession::new(1, ARENA);
        assert!(!session.set_speed(DOT_SPEED_MIN_MS - 1));
        assert!(!session.set_speed(DOT_SPEED_MAX_MS + 1));
        assert_eq!(session.speed_ms(), DOT_SPEED_DEFAULT_MS);
        assert!(session.set_speed(25));
        assert_eq!(session.speed_ms(), 25);
    }

    #[test]
    fn test_speed_set_while_running_is_not_the_default() {
        let mut session = running_session();
        assert!(session.set_speed(10));
        assert_eq!(session.speed_ms(), 10);

        // A new round restores the user default when acceleration is on
        session.set_time_limit(1);
        session.tick_second();
        session.start();
        assert_eq!(session.speed_ms(), DOT_SPEED_DEFAULT_MS);
    }

    #[test]
    fn test_acceleration_floors_and_stops() {
        let mut session = running_session();
        assert!(session.set_acceleration(DOT_ACCEL_MAX));
        for _ in 0..20 {
            session.tick_accel();
        }
        assert_eq!(session.speed_ms(), DOT_SPEED_MIN_MS);

        // Once floored, further accel ticks are inert
        session.tick(0.0, Vec2::ZERO); // drain pending events
        session.tick_accel();
        assert!(session.tick(0.0, Vec2::ZERO).is_empty());
        assert_eq!(session.speed_ms(), DOT_SPEED_MIN_MS);
    }

    #[test]
    fn test_set_acceleration_rejects_above_max() {
        let mut session = GameSession::new(1, ARENA);
        assert!(!session.set_acceleration(DOT_ACCEL_MAX + 1));
        assert!(session.set_acceleration(0));
    }

    #[test]
    fn test_dot_size_rejection_scenario() {
        let mut session = GameSession::new(1, ARENA);
        assert!(!session.set_dot_diameter(7));
        assert_eq!(session.dot().diameter(), DOT_DIAM_DEFAULT);
    }

    #[test]
    fn test_tick_drives_all_periodic_updates() {
        let mut session = running_session();
        session.set_time_limit(GAME_LENGTH_INFINITE);
        let pointer = on_dot(&session);

        let mut moved = 0;
        let mut stats = 0;
        // One simulated second in a single slice keeps the float bookkeeping exact
        for event in session.tick(1.0, pointer) {
            match event {
                GameEvent::DotMoved(_) => moved += 1,
                GameEvent::Stats { .. } => stats += 1,
                _ => {}
            }
        }
        // 40 ms motion interval and 80 ms stats interval over 1 s
        assert_eq!(moved, 25);
        assert_eq!(stats, 12);
        assert_eq!(session.elapsed_secs(), 1);
    }

    #[test]
    fn test_tick_is_inert_while_paused() {
        let mut session = GameSession::new(1, ARENA);
        let events = session.tick(5.0, Vec2::ZERO);
        assert!(events.is_empty());
        assert_eq!(session.elapsed_secs(), 0);
    }

    #[test]
    fn test_time_limit_ends_round_mid_ticking() {
        let mut session = running_session();
        session.set_time_limit(1);
        // Keep the pointer on the dot so only the clock can end the round;
        // ticking well past the limit must not advance elapsed time further
        for _ in 0..30 {
            session.tick(0.1, on_dot(&session));
        }
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.over_reason(), Some(GameOverReason::TimeLimit));
        assert_eq!(session.elapsed_secs(), 1);
    }

    #[test]
    fn test_score_text_is_fixed_width() {
        let session = GameSession::new(1, ARENA);
        assert_eq!(session.score_text(), "Score:     0");
    }
}
