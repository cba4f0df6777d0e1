pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod ingest;
pub mod models;
pub mod photo_cache;
pub mod refresh;
pub mod rotation;
pub mod state;
pub mod transport;

// Re-export key types for easier access
pub use calendar::Weekday;
pub use clock::Clock;
pub use config::SignageConfig;
pub use error::{Result, SignageError};
pub use feed::{stream_events, EventSink};
pub use ingest::{FeedSource, ScheduleFetcher};
pub use models::{Presentation, PresentationId, Schedule, Speaker, SpeakerDirectory, SpeakerId};
pub use photo_cache::PhotoCache;
pub use refresh::{refresh_once, spawn_refresher, RefreshHandle};
pub use rotation::{select, DisplayState, DisplayTracker, Rotation};
pub use state::ScheduleRepository;
pub use transport::{Fetcher, HttpFetcher};
