use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;

/// Stable speaker key from the feed (the speaker's uuid)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeakerId(String);

impl SpeakerId {
    pub fn new(id: impl Into<String>) -> Self {
        SpeakerId(id.into())
    }

    /// Extract the id from a speaker link such as `.../speakers/<id>`
    pub fn from_link(href: &str) -> Option<Self> {
        let id = href.rsplit('/').next()?.trim();
        if id.is_empty() {
            None
        } else {
            Some(SpeakerId(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feed-assigned presentation key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PresentationId(String);

impl PresentationId {
    pub fn new(id: impl Into<String>) -> Self {
        PresentationId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PresentationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub id: SpeakerId,
    pub name: String,
    pub photo_url: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
}

impl Speaker {
    pub fn new(id: SpeakerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            photo_url: None,
            company: None,
            bio: None,
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

pub type SpeakerDirectory = HashMap<SpeakerId, Speaker>;

/// A scheduled talk in one room
///
/// Speakers are held as ids and resolved against the [`Schedule`] the
/// presentation belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub id: PresentationId,
    pub title: String,
    pub room: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub summary: Option<String>,
    pub speakers: Vec<SpeakerId>,
    pub track: Option<String>,
    pub talk_type: Option<String>,
}

impl Presentation {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True once `now` has reached the end of the talk
    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        now >= self.end
    }
}

impl std::fmt::Display for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Presentation{{id={}, room={}, start={}, speakers={:?}}}",
            self.id,
            self.room.as_deref().unwrap_or("-"),
            self.start,
            self.speakers.iter().map(SpeakerId::as_str).collect::<Vec<_>>()
        )
    }
}

/// Immutable, start-ordered view of one room's presentations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub room: String,
    presentations: Vec<Presentation>,
    speakers: SpeakerDirectory,
}

impl Schedule {
    /// Build a snapshot; presentations are stably sorted by start time
    pub fn new(
        room: impl Into<String>,
        mut presentations: Vec<Presentation>,
        speakers: SpeakerDirectory,
    ) -> Self {
        presentations.sort_by_key(|p| p.start);
        Self {
            room: room.into(),
            presentations,
            speakers,
        }
    }

    pub fn presentations(&self) -> &[Presentation] {
        &self.presentations
    }

    pub fn speakers(&self) -> &SpeakerDirectory {
        &self.speakers
    }

    pub fn get(&self, id: &PresentationId) -> Option<&Presentation> {
        self.presentations.iter().find(|p| &p.id == id)
    }

    /// Speakers of a presentation in reference order
    pub fn speakers_for<'a>(&'a self, presentation: &Presentation) -> Vec<&'a Speaker> {
        presentation
            .speakers
            .iter()
            .filter_map(|id| self.speakers.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.presentations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presentations.is_empty()
    }
}
