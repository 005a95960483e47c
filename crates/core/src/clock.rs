//! Simulated time-of-day under a speed multiplier.

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use tramline_transit::ServiceWindow;

use crate::error::ConfigurationError;

/// Source of real-world time
pub trait WallClock: Send + Sync {
    /// Seconds since local midnight
    fn second_of_day(&self) -> f64;

    fn today(&self) -> NaiveDate;
}

/// The machine's local clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn second_of_day(&self) -> f64 {
        f64::from(Local::now().time().num_seconds_from_midnight())
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A wall clock frozen at one instant
#[derive(Clone, Copy, Debug)]
pub struct FixedWallClock {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl WallClock for FixedWallClock {
    fn second_of_day(&self) -> f64 {
        f64::from(self.time.num_seconds_from_midnight())
    }

    fn today(&self) -> NaiveDate {
        self.date
    }
}

/// Simulated second-of-day, playback flag and speed.
///
/// Time is saturated into the service window after every mutation. Running
/// past the end parks the clock at the window end with `running` still set.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    now: f64,
    running: bool,
    base_speed: f64,
    speed_multiplier: f64,
    window: ServiceWindow,
}

impl SimulationClock {
    pub fn new(
        window: ServiceWindow,
        base_speed: f64,
        speed_multiplier: f64,
    ) -> Result<Self, ConfigurationError> {
        let mut clock = Self {
            now: window.start,
            running: false,
            base_speed: 1.0,
            speed_multiplier: 1.0,
            window,
        };
        if !(base_speed.is_finite() && base_speed > 0.0) {
            return Err(ConfigurationError::NonPositive {
                field: "base_speed",
                value: base_speed,
            });
        }
        clock.base_speed = base_speed;
        clock.set_speed(speed_multiplier)?;
        Ok(clock)
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Simulated seconds per real second
    pub fn rate(&self) -> f64 {
        self.base_speed * self.speed_multiplier
    }

    pub fn window(&self) -> ServiceWindow {
        self.window
    }

    /// Replace the service window and re-clamp the current time into it
    pub fn set_window(&mut self, window: ServiceWindow) {
        self.window = window;
        self.clamp();
    }

    pub fn advance(&mut self, dt_real: f64) {
        if self.running && dt_real.is_finite() {
            self.now += dt_real * self.rate();
        }
        self.clamp();
    }

    pub fn jump_to_wall_clock(&mut self, wall: &dyn WallClock) {
        self.now = wall.second_of_day();
        self.clamp();
    }

    pub fn jump_to_service_start(&mut self) {
        self.now = self.window.start;
    }

    pub fn jump_to(&mut self, second: f64) {
        if second.is_finite() {
            self.now = second;
        }
        self.clamp();
    }

    pub fn skip(&mut self, delta_seconds: f64) {
        if delta_seconds.is_finite() {
            self.now += delta_seconds;
        }
        self.clamp();
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), ConfigurationError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(ConfigurationError::InvalidSpeed(multiplier));
        }
        self.speed_multiplier = multiplier;
        Ok(())
    }

    fn clamp(&mut self) {
        self.now = self.window.clamp(self.now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WINDOW: ServiceWindow = ServiceWindow {
        start: 19_800.0,
        end: 83_400.0,
    };

    fn clock() -> SimulationClock {
        SimulationClock::new(WINDOW, 1.0, 1.0).unwrap()
    }

    fn wall(h: u32, m: u32, s: u32) -> FixedWallClock {
        FixedWallClock {
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            time: NaiveTime::from_hms_opt(h, m, s).unwrap(),
        }
    }

    #[test]
    fn test_advance_only_while_running() {
        let mut clock = clock();
        clock.jump_to(30_000.0);

        clock.advance(10.0);
        assert_eq!(clock.now(), 30_000.0);

        clock.set_running(true);
        clock.set_speed(0.5).unwrap();
        clock.advance(10.0);
        assert_relative_eq!(clock.now(), 30_005.0, epsilon = 1e-9);

        clock.advance(0.016);
        assert_relative_eq!(clock.now(), 30_005.008, epsilon = 1e-9);
    }

    #[test]
    fn test_advance_parks_at_service_end() {
        let mut clock = clock();
        clock.set_running(true);
        clock.set_speed(60.0).unwrap();
        clock.jump_to(83_000.0);

        clock.advance(3600.0);
        assert_eq!(clock.now(), WINDOW.end);
        assert!(clock.is_running());

        clock.advance(1.0);
        assert_eq!(clock.now(), WINDOW.end);
    }

    #[test]
    fn test_never_leaves_window() {
        let mut clock = clock();
        clock.set_running(true);
        clock.set_speed(7.5).unwrap();

        let deltas = [
            5000.0, -12_000.0, 0.25, 90_000.0, -1e9, 1e9, -3.5, 42.0, f64::NAN, -0.001,
        ];
        for (i, dt) in deltas.iter().cycle().take(200).enumerate() {
            if i % 3 == 0 {
                clock.skip(*dt);
            } else {
                clock.advance(*dt);
            }
            assert!(WINDOW.contains(clock.now()), "left window at step {i}: {}", clock.now());
        }
    }

    #[test]
    fn test_skip_round_trip_in_bounds() {
        let mut clock = clock();
        clock.jump_to(40_000.0);

        clock.skip(600.0);
        clock.skip(-600.0);
        assert_eq!(clock.now(), 40_000.0);
    }

    #[test]
    fn test_skip_round_trip_saturates_at_bound() {
        let mut clock = clock();
        clock.jump_to(83_000.0);

        clock.skip(600.0);
        assert_eq!(clock.now(), WINDOW.end);
        clock.skip(-600.0);
        assert_eq!(clock.now(), 82_800.0);
    }

    #[test]
    fn test_jumps() {
        let mut clock = clock();

        clock.jump_to_wall_clock(&wall(12, 30, 15));
        assert_eq!(clock.now(), 45_015.0);

        clock.jump_to_wall_clock(&wall(2, 0, 0));
        assert_eq!(clock.now(), WINDOW.start);

        clock.jump_to(50_000.0);
        clock.jump_to_service_start();
        assert_eq!(clock.now(), WINDOW.start);
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let mut clock = clock();
        clock.set_speed(2.0).unwrap();

        assert_eq!(clock.set_speed(0.0), Err(ConfigurationError::InvalidSpeed(0.0)));
        assert!(clock.set_speed(-1.0).is_err());
        assert!(clock.set_speed(f64::INFINITY).is_err());
        assert_eq!(clock.speed_multiplier(), 2.0);

        assert!(SimulationClock::new(WINDOW, 1.0, 0.0).is_err());
        assert!(SimulationClock::new(WINDOW, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_set_window_reclamps() {
        let mut clock = clock();
        clock.jump_to(80_000.0);

        clock.set_window(ServiceWindow::new(20_000.0, 70_000.0));
        assert_eq!(clock.now(), 70_000.0);
    }

    #[test]
    fn test_toggle() {
        let mut clock = clock();
        assert!(clock.toggle());
        assert!(!clock.toggle());
    }
}
