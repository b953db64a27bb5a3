use chrono::Utc;

/// A simple clock abstraction for deterministic time in services and tests.
///
/// The game only ever reasons in whole epoch seconds, so the clock hands out
/// `i64` seconds rather than full timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(i64),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given epoch second.
    #[must_use]
    pub fn fixed(at: i64) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current whole epoch second according to the clock.
    #[must_use]
    pub fn now_epoch(&self) -> i64 {
        match self {
            Clock::Default => Utc::now().timestamp(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given number of seconds.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, secs: i64) {
        if let Clock::Fixed(t) = self {
            *t += secs;
        }
    }

    /// Returns true if this clock represents real time.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(FIXED_TEST_TIMESTAMP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        assert_eq!(clock.now_epoch(), FIXED_TEST_TIMESTAMP);
        clock.advance(30);
        assert_eq!(clock.now_epoch(), FIXED_TEST_TIMESTAMP + 30);
    }

    #[test]
    fn default_clock_ignores_advance() {
        let mut clock = Clock::default_clock();
        assert!(clock.is_default());
        clock.advance(10);
        assert!(clock.is_default());
    }
}
