use chrono::NaiveDateTime;

use crate::models::{Presentation, PresentationId, Schedule};

/// How many presentations a screen shows at once
pub const ROTATION_SIZE: usize = 3;

/// The talks to show: the one on now (or next), then the two after it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation<'a> {
    pub first: Option<&'a Presentation>,
    pub second: Option<&'a Presentation>,
    pub third: Option<&'a Presentation>,
}

impl<'a> Rotation<'a> {
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Presentation> {
        [self.first, self.second, self.third].into_iter().flatten()
    }
}

/// Pick the first presentations, in start order, that have not ended by `now`
pub fn select(schedule: &Schedule, now: NaiveDateTime) -> Rotation<'_> {
    let mut live = schedule
        .presentations()
        .iter()
        .filter(|p| !p.has_ended(now))
        .take(ROTATION_SIZE);

    Rotation {
        first: live.next(),
        second: live.next(),
        third: live.next(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    NoCurrent,
    HasCurrent(PresentationId),
}

/// Remembers which presentation is on screen so redraws happen only when
/// the leading talk changes
#[derive(Debug, Default)]
pub struct DisplayTracker {
    state: DisplayState,
}

impl DisplayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Feed the latest selection; true when the screen needs updating
    pub fn observe(&mut self, rotation: &Rotation<'_>) -> bool {
        let next = match rotation.first {
            Some(first) => DisplayState::HasCurrent(first.id.clone()),
            None => DisplayState::NoCurrent,
        };

        if next == self.state {
            return false;
        }

        match &next {
            DisplayState::HasCurrent(id) => log::debug!("New presentation: {}", id),
            DisplayState::NoCurrent => log::debug!("All presentations have ended"),
        }
        self.state = next;
        true
    }
}
