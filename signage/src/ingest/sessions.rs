use chrono::NaiveDate;
use std::collections::HashMap;

use crate::calendar;
use crate::error::Result;
use crate::feed::EventSink;
use crate::models::{Presentation, PresentationId, SpeakerDirectory, SpeakerId};

/// Depth of each slot object in a room's day schedule
const SESSION_DEPTH: usize = 2;
/// Slot-level scalars: room, times, day
const SLOT_DEPTH: usize = SESSION_DEPTH + 1;
/// Talk-level scalars nested one object below the slot
const TALK_DEPTH: usize = SESSION_DEPTH + 2;
/// `href` of a speaker link inside the talk's speaker list
const SPEAKER_LINK_DEPTH: usize = SESSION_DEPTH + 5;

#[derive(Debug, Default)]
struct SessionDraft {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    track: Option<String>,
    talk_type: Option<String>,
    room: Option<String>,
    from_time: Option<String>,
    to_time: Option<String>,
    day: Option<String>,
    speakers: Vec<SpeakerId>,
}

/// Presentations keyed by id, remembering first insertion order
///
/// Re-inserting an id replaces the stored presentation in place.
#[derive(Debug, Default, Clone)]
pub struct PresentationMap {
    index: HashMap<PresentationId, usize>,
    entries: Vec<Presentation>,
}

impl PresentationMap {
    pub fn insert(&mut self, presentation: Presentation) {
        match self.index.get(&presentation.id) {
            Some(&position) => self.entries[position] = presentation,
            None => {
                self.index.insert(presentation.id.clone(), self.entries.len());
                self.entries.push(presentation);
            }
        }
    }

    /// Fold another map in; its entries win on id collisions
    pub fn merge(&mut self, other: PresentationMap) {
        for presentation in other.entries {
            self.insert(presentation);
        }
    }

    pub fn get(&self, id: &PresentationId) -> Option<&Presentation> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Presentation> {
        self.entries
    }
}

/// Event sink for one room's schedule on one day
///
/// Speaker links are resolved against the directory built by the speaker
/// pass. An unknown day name or unreadable time aborts the pass.
pub struct SessionCollector<'a> {
    speakers: &'a SpeakerDirectory,
    start_date: NaiveDate,
    draft: SessionDraft,
    presentations: PresentationMap,
}

impl<'a> SessionCollector<'a> {
    pub fn new(speakers: &'a SpeakerDirectory, start_date: NaiveDate) -> Self {
        Self {
            speakers,
            start_date,
            draft: SessionDraft::default(),
            presentations: PresentationMap::default(),
        }
    }

    pub fn into_presentations(self) -> PresentationMap {
        self.presentations
    }

    fn link_speaker(&mut self, href: &str) {
        match SpeakerId::from_link(href) {
            Some(id) if self.speakers.contains_key(&id) => self.draft.speakers.push(id),
            Some(id) => log::warn!("Failed to resolve speaker {} for session", id),
            None => log::warn!("Speaker link without id: {}", href),
        }
    }

    fn commit(&mut self) -> Result<()> {
        let draft = std::mem::take(&mut self.draft);

        let Some(title) = draft.title else {
            return Ok(());
        };

        let (Some(id), Some(day), Some(from), Some(to)) =
            (draft.id.filter(|id| !id.is_empty()), draft.day, draft.from_time, draft.to_time)
        else {
            log::warn!("Incomplete session '{}' dropped", title);
            return Ok(());
        };

        let start = calendar::timestamp_for(self.start_date, &day, &from)?;
        let end = calendar::timestamp_for(self.start_date, &day, &to)?;
        if end < start {
            log::warn!("Session {} ends before it starts ({} - {}), dropped", id, start, end);
            return Ok(());
        }

        let presentation = Presentation {
            id: PresentationId::new(id),
            title,
            room: draft.room,
            start,
            end,
            summary: draft.summary,
            speakers: draft.speakers,
            track: draft.track,
            talk_type: draft.talk_type,
        };
        log::trace!("Session: {}", presentation);

        self.presentations.insert(presentation);
        Ok(())
    }
}

impl EventSink for SessionCollector<'_> {
    fn start_object(&mut self, _name: Option<&str>, depth: usize) -> Result<()> {
        if depth == SESSION_DEPTH {
            self.draft = SessionDraft::default();
        }
        Ok(())
    }

    fn key_value(&mut self, key: &str, value: &str, depth: usize) -> Result<()> {
        if depth == SPEAKER_LINK_DEPTH && key == "href" {
            self.link_speaker(value);
            return Ok(());
        }

        let draft = &mut self.draft;
        let slot = match (depth, key) {
            (TALK_DEPTH, "id") => &mut draft.id,
            (TALK_DEPTH, "title") => &mut draft.title,
            (TALK_DEPTH, "summary") => &mut draft.summary,
            (TALK_DEPTH, "track") => &mut draft.track,
            (TALK_DEPTH, "talkType") => &mut draft.talk_type,
            (SLOT_DEPTH, "roomName") => &mut draft.room,
            (SLOT_DEPTH, "fromTime") => &mut draft.from_time,
            (SLOT_DEPTH, "toTime") => &mut draft.to_time,
            (SLOT_DEPTH, "day") => &mut draft.day,
            _ => return Ok(()),
        };
        *slot = Some(value.to_string());
        Ok(())
    }

    fn end_object(&mut self, _name: Option<&str>, depth: usize) -> Result<()> {
        if depth == SESSION_DEPTH {
            self.commit()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignageError;
    use crate::feed::stream_events;
    use crate::models::Speaker;

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn directory(entries: &[(&str, &str)]) -> SpeakerDirectory {
        entries
            .iter()
            .map(|(id, name)| (SpeakerId::new(*id), Speaker::new(SpeakerId::new(*id), *name)))
            .collect()
    }

    fn slot(id: &str, title: &str, day: &str, from: &str, to: &str, speakers: &[&str]) -> String {
        let links: Vec<String> = speakers
            .iter()
            .map(|s| {
                format!(
                    r#"{{"link":{{"href":"http://cfp.example.org/api/speakers/{}","rel":"speaker"}},"name":"{}"}}"#,
                    s, s
                )
            })
            .collect();
        format!(
            r#"{{"roomName":"Room 5","fromTime":"{}","toTime":"{}","day":"{}","talk":{{"id":"{}","title":"{}","summary":"About {}","track":"Java","talkType":"Conference","speakers":[{}]}}}}"#,
            from,
            to,
            day,
            id,
            title,
            title,
            links.join(",")
        )
    }

    fn day_feed(slots: &[String]) -> String {
        format!(r#"{{"slots":[{}]}}"#, slots.join(","))
    }

    fn collect(speakers: &SpeakerDirectory, json: &str) -> Result<PresentationMap> {
        let mut collector = SessionCollector::new(speakers, start_date());
        stream_events(json.as_bytes(), &mut collector)?;
        Ok(collector.into_presentations())
    }

    #[test]
    fn test_reconstructs_tuesday_talk() {
        let speakers = directory(&[("s1", "Ada Lovelace")]);
        let json = day_feed(&[slot("t1", "Talk A", "tuesday", "10:00", "10:50", &["s1"])]);

        let presentations = collect(&speakers, &json).unwrap();
        let talk = presentations.get(&PresentationId::new("t1")).unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        assert_eq!(talk.title, "Talk A");
        assert_eq!(talk.start, day.and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(talk.end, day.and_hms_opt(10, 50, 0).unwrap());
        assert_eq!(talk.speakers, vec![SpeakerId::new("s1")]);
        assert_eq!(talk.room.as_deref(), Some("Room 5"));
        assert_eq!(talk.summary.as_deref(), Some("About Talk A"));
        assert_eq!(talk.track.as_deref(), Some("Java"));
        assert_eq!(talk.talk_type.as_deref(), Some("Conference"));
        assert_eq!(talk.duration_minutes(), 50);
    }

    #[test]
    fn test_unresolved_speakers_are_skipped_in_order() {
        let speakers = directory(&[("s1", "Ada Lovelace"), ("s3", "Grace Hopper")]);
        let json = day_feed(&[slot("t1", "Panel", "monday", "09:00", "10:00", &["s3", "ghost", "s1"])]);

        let presentations = collect(&speakers, &json).unwrap();
        let talk = presentations.get(&PresentationId::new("t1")).unwrap();
        assert_eq!(talk.speakers, vec![SpeakerId::new("s3"), SpeakerId::new("s1")]);
    }

    #[test]
    fn test_session_with_no_resolvable_speakers_is_kept() {
        let speakers = directory(&[]);
        let json = day_feed(&[slot("t1", "Solo", "monday", "09:00", "10:00", &["ghost"])]);

        let presentations = collect(&speakers, &json).unwrap();
        assert!(presentations.get(&PresentationId::new("t1")).unwrap().speakers.is_empty());
    }

    #[test]
    fn test_speaker_lists_are_scoped_to_their_session() {
        let speakers = directory(&[("s1", "Ada Lovelace"), ("s2", "Alan Turing")]);
        let json = day_feed(&[
            slot("t1", "First", "monday", "09:00", "10:00", &["s1"]),
            slot("t2", "Second", "monday", "10:00", "11:00", &["s2"]),
        ]);

        let presentations = collect(&speakers, &json).unwrap();
        assert_eq!(
            presentations.get(&PresentationId::new("t2")).unwrap().speakers,
            vec![SpeakerId::new("s2")]
        );
    }

    #[test]
    fn test_untitled_slots_are_not_finalized() {
        let speakers = directory(&[]);
        let json = format!(
            r#"{{"slots":[{},{{"roomName":"Room 5","fromTime":"12:00","toTime":"13:00","day":"monday","break":{{"id":"lunch","nameEN":"Lunch"}}}}]}}"#,
            slot("t1", "Morning", "monday", "09:00", "10:00", &[])
        );

        let presentations = collect(&speakers, &json).unwrap();
        assert_eq!(presentations.len(), 1);
        assert!(presentations.get(&PresentationId::new("lunch")).is_none());
    }

    #[test]
    fn test_wednesday_sessions_fall_on_start_plus_two() {
        let speakers = directory(&[]);
        let json = day_feed(&[
            slot("w1", "Early", "wednesday", "09:30", "10:20", &[]),
            slot("w2", "Late", "wednesday", "17:00", "17:50", &[]),
        ]);

        let wednesday = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        for talk in collect(&speakers, &json).unwrap().into_vec() {
            assert_eq!(talk.start.date(), wednesday);
            assert_eq!(talk.end.date(), wednesday);
            assert!(talk.start <= talk.end);
        }
    }

    #[test]
    fn test_later_duplicate_id_overwrites_in_place() {
        let speakers = directory(&[]);
        let json = day_feed(&[
            slot("t1", "Original", "monday", "09:00", "10:00", &[]),
            slot("t2", "Other", "monday", "11:00", "12:00", &[]),
            slot("t1", "Rescheduled", "monday", "14:00", "15:00", &[]),
        ]);

        let presentations = collect(&speakers, &json).unwrap().into_vec();
        let titles: Vec<&str> = presentations.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Rescheduled", "Other"]);
    }

    #[test]
    fn test_unknown_day_aborts_the_pass() {
        let speakers = directory(&[]);
        let json = day_feed(&[slot("t1", "Weekend", "saturday", "09:00", "10:00", &[])]);

        match collect(&speakers, &json) {
            Err(SignageError::UnknownDay(day)) => assert_eq!(day, "saturday"),
            other => panic!("expected UnknownDay, got {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_bad_time_aborts_the_pass() {
        let speakers = directory(&[]);
        let json = day_feed(&[slot("t1", "Never", "monday", "noon", "13:00", &[])]);
        assert!(matches!(collect(&speakers, &json), Err(SignageError::InvalidTime(_))));
    }

    #[test]
    fn test_incomplete_or_inverted_sessions_are_dropped() {
        let speakers = directory(&[]);
        let json = format!(
            r#"{{"slots":[{},{},{{"fromTime":"09:00","toTime":"10:00","day":"monday","talk":{{"title":"No id"}}}}]}}"#,
            slot("t1", "Backwards", "monday", "11:00", "10:00", &[]),
            slot("t2", "Fine", "monday", "11:00", "12:00", &[]),
        );

        let presentations = collect(&speakers, &json).unwrap();
        assert_eq!(presentations.len(), 1);
        assert!(presentations.get(&PresentationId::new("t2")).is_some());
    }

    #[test]
    fn test_merge_prefers_incoming_entries() {
        let speakers = directory(&[]);
        let mut monday = collect(
            &speakers,
            &day_feed(&[slot("t1", "Monday version", "monday", "09:00", "10:00", &[])]),
        )
        .unwrap();
        let tuesday = collect(
            &speakers,
            &day_feed(&[slot("t1", "Tuesday version", "tuesday", "09:00", "10:00", &[])]),
        )
        .unwrap();

        monday.merge(tuesday);
        assert_eq!(monday.len(), 1);
        assert_eq!(monday.get(&PresentationId::new("t1")).unwrap().title, "Tuesday version");
    }
}
