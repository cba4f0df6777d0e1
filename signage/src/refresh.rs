use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::Result;
use crate::ingest::ScheduleFetcher;
use crate::state::ScheduleRepository;

/// Run one ingestion cycle and publish the result
///
/// A failed cycle leaves the repository untouched. Returns whether a new
/// snapshot was published.
pub fn refresh_once(fetcher: &ScheduleFetcher, repository: &ScheduleRepository) -> bool {
    match fetcher.fetch_schedule() {
        Ok(schedule) => {
            log::info!(
                "Schedule for {} refreshed: {} presentations",
                schedule.room,
                schedule.len()
            );
            repository.replace(schedule);
            true
        }
        Err(e) => {
            log::error!("Schedule refresh failed, keeping previous data: {}", e);
            false
        }
    }
}

/// Handle to the background feed refresh thread
pub struct RefreshHandle {
    stop_sender: mpsc::Sender<()>,
    thread: JoinHandle<()>,
}

impl RefreshHandle {
    /// Wake the refresh thread and wait for it to finish
    pub fn stop(self) {
        self.stop_sender.send(()).ok();
        if self.thread.join().is_err() {
            log::error!("Schedule refresh thread panicked");
        }
    }
}

/// Refresh the schedule every `period` on a background thread
pub fn spawn_refresher(
    fetcher: ScheduleFetcher,
    repository: ScheduleRepository,
    period: Duration,
) -> Result<RefreshHandle> {
    let (stop_sender, stop_receiver) = mpsc::channel::<()>();

    let thread = thread::Builder::new()
        .name("schedule-refresh".to_string())
        .spawn(move || loop {
            match stop_receiver.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    refresh_once(&fetcher, &repository);
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("Schedule refresh thread stopping");
                    break;
                }
            }
        })?;

    Ok(RefreshHandle {
        stop_sender,
        thread,
    })
}
