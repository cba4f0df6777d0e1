//! Depth-tagged event stream over a feed document.
//!
//! Depth counts the objects and arrays that enclose an event. Object events
//! report the containers around the object itself (the root object is depth
//! 0); key/value events count the object that holds the key as well.

pub mod parser;

pub use parser::stream_events;

use crate::error::Result;

/// Receiver for the flat event stream produced while walking a feed
pub trait EventSink {
    /// An object opened; `name` is the key it is the value of, if any
    fn start_object(&mut self, _name: Option<&str>, _depth: usize) -> Result<()> {
        Ok(())
    }

    /// A scalar member in textual form
    fn key_value(&mut self, _key: &str, _value: &str, _depth: usize) -> Result<()> {
        Ok(())
    }

    /// An object closed; `name` and `depth` match the opening event
    fn end_object(&mut self, _name: Option<&str>, _depth: usize) -> Result<()> {
        Ok(())
    }
}

/// One recorded event, mainly useful for inspecting a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    StartObject { name: Option<String>, depth: usize },
    KeyValue { key: String, value: String, depth: usize },
    EndObject { name: Option<String>, depth: usize },
}

/// Sink that records every event in order
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<FeedEvent>,
}

impl EventSink for EventLog {
    fn start_object(&mut self, name: Option<&str>, depth: usize) -> Result<()> {
        self.events.push(FeedEvent::StartObject {
            name: name.map(str::to_string),
            depth,
        });
        Ok(())
    }

    fn key_value(&mut self, key: &str, value: &str, depth: usize) -> Result<()> {
        self.events.push(FeedEvent::KeyValue {
            key: key.to_string(),
            value: value.to_string(),
            depth,
        });
        Ok(())
    }

    fn end_object(&mut self, name: Option<&str>, depth: usize) -> Result<()> {
        self.events.push(FeedEvent::EndObject {
            name: name.map(str::to_string),
            depth,
        });
        Ok(())
    }
}
