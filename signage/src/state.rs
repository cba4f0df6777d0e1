use crate::models::Schedule;
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the schedule snapshot shown on screen
///
/// Snapshots are never edited in place: a new one is built completely and
/// swapped in, so readers always see either the old or the new schedule.
pub struct ScheduleRepository {
    current: Arc<RwLock<Arc<Schedule>>>,
}

impl ScheduleRepository {
    pub fn new() -> Self {
        Self::with_schedule(Schedule::default())
    }

    pub fn with_schedule(schedule: Schedule) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(schedule))),
        }
    }

    /// Publish a new snapshot
    pub fn replace(&self, schedule: Schedule) {
        let schedule = Arc::new(schedule);
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = schedule;
    }

    /// The snapshot visible right now
    pub fn current(&self) -> Arc<Schedule> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ScheduleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ScheduleRepository {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
        }
    }
}
