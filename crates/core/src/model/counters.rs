/// Attempt counters for one session.
///
/// Hot state: bumped on every answer. Accuracy and pace are derived on read
/// and guarded against empty sessions, so callers never see a NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreCounters {
    total: u32,
    correct: u32,
}

impl ScoreCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Record one answer: total always bumps, correct only on a hit.
    pub fn record(&mut self, is_correct: bool) {
        self.total = self.total.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    pub fn reset(&mut self) {
        self.total = 0;
        self.correct = 0;
    }

    /// Percentage of correct answers, rounded; 0 for an empty session.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let ratio = f64::from(self.correct) / f64::from(self.total);
        (ratio * 100.0).round() as u32
    }

    /// Answers per minute over the given elapsed time; 0 until time passes.
    #[must_use]
    pub fn notes_per_minute(&self, elapsed_secs: i64) -> u32 {
        if elapsed_secs <= 0 {
            return 0;
        }
        let per_minute = f64::from(self.total) / elapsed_secs as f64 * 60.0;
        per_minute.round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_never_exceeds_total() {
        let mut counters = ScoreCounters::new();
        for i in 0..50 {
            counters.record(i % 3 == 0);
            assert!(counters.correct() <= counters.total());
        }
    }

    #[test]
    fn accuracy_is_bounded_and_zero_when_empty() {
        let counters = ScoreCounters::new();
        assert_eq!(counters.accuracy(), 0);

        let mut counters = ScoreCounters::new();
        counters.record(true);
        counters.record(false);
        counters.record(true);
        assert_eq!(counters.accuracy(), 67);

        let mut all_correct = ScoreCounters::new();
        for _ in 0..10 {
            all_correct.record(true);
        }
        assert_eq!(all_correct.accuracy(), 100);
    }

    #[test]
    fn pace_guards_zero_elapsed() {
        let mut counters = ScoreCounters::new();
        counters.record(true);
        assert_eq!(counters.notes_per_minute(0), 0);
        assert_eq!(counters.notes_per_minute(-5), 0);
    }

    #[test]
    fn pace_rounds_to_nearest() {
        let mut counters = ScoreCounters::new();
        for _ in 0..3 {
            counters.record(true);
        }
        // 3 answers in 15 seconds is 12 per minute
        assert_eq!(counters.notes_per_minute(15), 12);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut counters = ScoreCounters::new();
        counters.record(true);
        counters.reset();
        let once = counters;
        counters.reset();
        assert_eq!(counters, once);
        assert_eq!(counters.total(), 0);
        assert_eq!(counters.correct(), 0);
    }
}
