use std::time::Duration;

use crate::config::{SPLASH_SETTLE, SPLASH_STEP_PERCENT, SPLASH_TICK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Active,
}

/// The startup splash. Progress is simulated: it fills by a fixed step per
/// tick regardless of any real work, holds at 100% briefly, then the app
/// becomes active for good.
#[derive(Debug, Default)]
pub struct Splash {
    elapsed: Duration,
}

impl Splash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_duration() -> Duration {
        let ticks = 100 / SPLASH_STEP_PERCENT as u32;
        SPLASH_TICK * ticks + SPLASH_SETTLE
    }

    pub fn advance(&mut self, dt: Duration) -> Screen {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.screen()
    }

    pub fn progress(&self) -> u8 {
        let ticks = self.elapsed.as_millis() / SPLASH_TICK.as_millis();
        (ticks * SPLASH_STEP_PERCENT as u128).min(100) as u8
    }

    pub fn screen(&self) -> Screen {
        if self.elapsed >= Self::total_duration() {
            Screen::Active
        } else {
            Screen::Splash
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_duration() {
        assert_eq!(Splash::total_duration(), Duration::from_millis(2500));
    }

    #[test]
    fn test_progress_fills_then_activates() {
        let mut splash = Splash::new();
        assert_eq!(splash.progress(), 0);
        assert_eq!(splash.screen(), Screen::Splash);

        assert_eq!(splash.advance(Duration::from_millis(400)), Screen::Splash);
        assert_eq!(splash.progress(), 20);

        assert_eq!(splash.advance(Duration::from_millis(1600)), Screen::Splash);
        assert_eq!(splash.progress(), 100);

        assert_eq!(splash.advance(Duration::from_millis(499)), Screen::Splash);
        assert_eq!(splash.advance(Duration::from_millis(1)), Screen::Active);
    }

    #[test]
    fn test_never_returns_to_splash() {
        let mut splash = Splash::new();
        splash.advance(Duration::from_secs(3));
        for _ in 0..10 {
            assert_eq!(splash.advance(Duration::ZERO), Screen::Active);
            assert_eq!(splash.advance(Duration::from_secs(60)), Screen::Active);
        }
        assert_eq!(splash.progress(), 100);
    }
}
