use chrono::{Duration, Local, NaiveDateTime};

/// Source of "now" for the rotation
///
/// The simulated clock lets an operator preview any point of the conference
/// by stepping an hour at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Simulated(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Simulated(at) => *at,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Clock::Simulated(_))
    }

    /// Move a simulated clock forward one hour; the system clock is left alone
    pub fn advance_hour(&mut self) {
        self.shift(Duration::hours(1));
    }

    pub fn rewind_hour(&mut self) {
        self.shift(Duration::hours(-1));
    }

    fn shift(&mut self, by: Duration) {
        if let Clock::Simulated(at) = self {
            *at += by;
            log::debug!("Simulated time is now {}", at);
        }
    }
}
