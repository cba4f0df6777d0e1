//! Rebuilds a room's schedule from the conference feed.
//!
//! A cycle reads the speaker listing first, then one schedule document per
//! conference day. Losing the speaker listing fails the whole cycle; losing
//! a day only drops that day.

pub mod sessions;
pub mod speakers;

pub use sessions::{PresentationMap, SessionCollector};
pub use speakers::SpeakerCollector;

use chrono::NaiveDate;
use std::sync::Arc;

use crate::calendar::Weekday;
use crate::error::{Result, SignageError};
use crate::feed::stream_events;
use crate::models::{Schedule, SpeakerDirectory};
use crate::photo_cache::PhotoCache;
use crate::transport::Fetcher;

/// Where a room's feed lives and how to date it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub base_url: String,
    pub room: String,
    pub start_date: NaiveDate,
}

impl FeedSource {
    pub fn new(base_url: impl Into<String>, room: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            base_url: base_url.into(),
            room: room.into(),
            start_date,
        }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn speakers_url(&self) -> String {
        format!("{}/speakers", self.base())
    }

    pub fn day_url(&self, day: Weekday) -> String {
        format!("{}/rooms/{}/{}", self.base(), self.room, day.name())
    }
}

/// Runs ingestion cycles for one room
pub struct ScheduleFetcher {
    source: FeedSource,
    fetcher: Arc<dyn Fetcher>,
    photos: PhotoCache,
}

impl ScheduleFetcher {
    pub fn new(source: FeedSource, fetcher: Arc<dyn Fetcher>, photos: PhotoCache) -> Self {
        Self {
            source,
            fetcher,
            photos,
        }
    }

    pub fn photo_cache(&self) -> &PhotoCache {
        &self.photos
    }

    /// Run one full cycle and build a fresh snapshot
    ///
    /// Fails if the speaker listing cannot be read or if no day produced a
    /// single presentation; the caller should keep its previous snapshot.
    pub fn fetch_schedule(&self) -> Result<Schedule> {
        log::debug!("Retrieving data for room {}", self.source.room);

        let speakers = self.fetch_speakers().map_err(|e| {
            log::error!("Failed to retrieve speaker data: {}", e);
            e
        })?;
        log::info!("Found [{}] speakers", speakers.len());

        let mut presentations = PresentationMap::default();
        for day in Weekday::ALL {
            match self.fetch_day(day, &speakers) {
                Ok(day_presentations) => {
                    log::debug!("{}: {} sessions", day, day_presentations.len());
                    presentations.merge(day_presentations);
                }
                Err(e) => log::error!("Failed to retrieve schedule for {}: {}", day, e),
            }
        }

        if presentations.is_empty() {
            log::error!("No presentation data downloaded for room {}", self.source.room);
            return Err(SignageError::EmptySchedule(self.source.room.clone()));
        }

        log::info!("Found [{}] presentations", presentations.len());
        Ok(Schedule::new(
            self.source.room.clone(),
            presentations.into_vec(),
            speakers,
        ))
    }

    /// Speaker pass; photos are cached once per speaker created here
    pub fn fetch_speakers(&self) -> Result<SpeakerDirectory> {
        let url = self.source.speakers_url();
        log::trace!("Retrieving speaker data from {}", url);

        let body = self.fetcher.fetch(&url)?;
        let mut collector = SpeakerCollector::new();
        stream_events(&body, &mut collector)?;

        let created = collector.created().to_vec();
        let speakers = collector.into_directory();

        for id in &created {
            let Some(photo_url) = speakers.get(id).and_then(|s| s.photo_url.as_deref()) else {
                continue;
            };
            if let Err(e) = self.photos.ensure_cached(id, photo_url) {
                log::warn!("Unable to cache photo for {} from {}: {}", id, photo_url, e);
            }
        }

        Ok(speakers)
    }

    /// Session pass for one day, collected in isolation so a failure
    /// part-way through contributes nothing
    pub fn fetch_day(&self, day: Weekday, speakers: &SpeakerDirectory) -> Result<PresentationMap> {
        let url = self.source.day_url(day);
        log::trace!("{} URL = {}", day, url);

        let body = self.fetcher.fetch(&url)?;
        let mut collector = SessionCollector::new(speakers, self.source.start_date);
        stream_events(&body, &mut collector)?;
        Ok(collector.into_presentations())
    }
}
