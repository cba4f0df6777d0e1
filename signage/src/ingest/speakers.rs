use crate::error::Result;
use crate::feed::EventSink;
use crate::models::{Speaker, SpeakerDirectory, SpeakerId};

/// Depth of each speaker object in the speaker listing
const SPEAKER_DEPTH: usize = 1;
/// Depth of the speaker's scalar attributes
const ATTRIBUTE_DEPTH: usize = SPEAKER_DEPTH + 1;

#[derive(Debug, Default)]
struct SpeakerDraft {
    uuid: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    avatar_url: Option<String>,
    company: Option<String>,
    bio: Option<String>,
}

impl SpeakerDraft {
    fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Event sink for the speaker listing
///
/// The first record seen for an id wins; later records with the same id are
/// ignored rather than merged. `created` keeps the ids in the order they were
/// first seen.
#[derive(Debug, Default)]
pub struct SpeakerCollector {
    draft: SpeakerDraft,
    speakers: SpeakerDirectory,
    created: Vec<SpeakerId>,
}

impl SpeakerCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    /// Ids in first-seen order
    pub fn created(&self) -> &[SpeakerId] {
        &self.created
    }

    pub fn into_directory(self) -> SpeakerDirectory {
        self.speakers
    }

    fn commit(&mut self) {
        let draft = std::mem::take(&mut self.draft);

        let Some(uuid) = draft.uuid.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
            log::warn!("Speaker record without uuid dropped ({})", draft.display_name());
            return;
        };

        let id = SpeakerId::new(uuid);
        if self.speakers.contains_key(&id) {
            log::trace!("Speaker {} already known, ignoring duplicate", id);
            return;
        }

        let speaker = Speaker {
            id: id.clone(),
            name: draft.display_name(),
            photo_url: draft.avatar_url.clone().filter(|u| !u.trim().is_empty()),
            company: draft.company.clone(),
            bio: draft.bio.clone(),
        };
        log::trace!("New speaker: {}", speaker.name);

        self.speakers.insert(id.clone(), speaker);
        self.created.push(id);
    }
}

impl EventSink for SpeakerCollector {
    fn start_object(&mut self, _name: Option<&str>, depth: usize) -> Result<()> {
        if depth == SPEAKER_DEPTH {
            self.draft = SpeakerDraft::default();
        }
        Ok(())
    }

    fn key_value(&mut self, key: &str, value: &str, depth: usize) -> Result<()> {
        if depth != ATTRIBUTE_DEPTH {
            return Ok(());
        }

        let slot = match key {
            "uuid" => &mut self.draft.uuid,
            "firstName" => &mut self.draft.first_name,
            "lastName" => &mut self.draft.last_name,
            "avatarURL" => &mut self.draft.avatar_url,
            "company" => &mut self.draft.company,
            "bio" => &mut self.draft.bio,
            _ => return Ok(()),
        };
        *slot = Some(value.to_string());
        Ok(())
    }

    fn end_object(&mut self, _name: Option<&str>, depth: usize) -> Result<()> {
        if depth == SPEAKER_DEPTH {
            self.commit();
        }
        Ok(())
    }
}
