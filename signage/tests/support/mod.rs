// Shared fixtures for the integration tests
#![allow(dead_code)]

use signage::{FeedSource, Fetcher, Result, SignageError};
use std::collections::HashMap;
use std::sync::Mutex;

pub const BASE_URL: &str = "http://cfp.example.org/api/conferences/DV24";
pub const ROOM: &str = "room5";

/// In-memory feed keyed by URL that counts every request
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    pub fn with_speakers(self, json: &str) -> Self {
        self.with(format!("{}/speakers", BASE_URL), json)
    }

    pub fn with_day(self, day: &str, json: &str) -> Self {
        self.with(format!("{}/rooms/{}/{}", BASE_URL, ROOM, day), json)
    }

    pub fn requests_for(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|requested| requested.as_str() == url)
            .count()
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| SignageError::Download {
                url: url.to_string(),
                reason: "404 Not Found".to_string(),
            })
    }
}

pub fn source(start_date: chrono::NaiveDate) -> FeedSource {
    FeedSource::new(format!("{}/", BASE_URL), ROOM, start_date)
}

pub fn speaker_listing(entries: &[(&str, &str, &str)]) -> String {
    let records: Vec<String> = entries
        .iter()
        .map(|(uuid, first, last)| {
            format!(
                r#"{{"uuid":"{uuid}","firstName":"{first}","lastName":"{last}","avatarURL":"http://img.example.org/{uuid}.jpg","lang":"en"}}"#
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

pub struct Slot<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub day: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    pub speakers: &'a [&'a str],
}

pub fn day_schedule(slots: &[Slot<'_>]) -> String {
    let slots: Vec<String> = slots
        .iter()
        .map(|slot| {
            let links: Vec<String> = slot
                .speakers
                .iter()
                .map(|id| {
                    format!(
                        r#"{{"link":{{"href":"{}/speakers/{}","rel":"http://cfp.example.org/api/profile/speaker","title":"{}"}},"name":"{}"}}"#,
                        BASE_URL, id, id, id
                    )
                })
                .collect();
            format!(
                r#"{{"roomId":"{room}","roomName":"Room 5","slotId":"{id}_slot","fromTime":"{from}","toTime":"{to}","day":"{day}","notAllocated":false,"talk":{{"id":"{id}","title":"{title}","summary":"Summary of {title}","track":"Methodology","talkType":"Conference","lang":"en","speakers":[{links}]}},"break":null}}"#,
                room = ROOM,
                id = slot.id,
                from = slot.from,
                to = slot.to,
                day = slot.day,
                title = slot.title,
                links = links.join(",")
            )
        })
        .collect();
    format!(r#"{{"slots":[{}]}}"#, slots.join(","))
}
