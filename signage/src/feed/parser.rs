use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use std::fmt;

use super::EventSink;
use crate::error::{Result, SignageError};

/// Walk a JSON document and report it to `sink` as depth-tagged events
///
/// The document is streamed straight from the deserializer into the sink;
/// no intermediate tree is built. An error returned by the sink stops the
/// walk and is handed back unchanged.
pub fn stream_events<S: EventSink>(json: &[u8], sink: &mut S) -> Result<()> {
    let mut emitter = Emitter {
        sink,
        failure: None,
    };
    let mut deserializer = serde_json::Deserializer::from_slice(json);

    let outcome = ValueSeed {
        emitter: &mut emitter,
        name: None,
        depth: 0,
    }
    .deserialize(&mut deserializer)
    .and_then(|_| deserializer.end());

    match (emitter.failure.take(), outcome) {
        (Some(failure), _) => Err(failure),
        (None, Err(e)) => Err(SignageError::from(e)),
        (None, Ok(())) => Ok(()),
    }
}

struct Emitter<'s, S> {
    sink: &'s mut S,
    failure: Option<SignageError>,
}

impl<S: EventSink> Emitter<'_, S> {
    /// Park a sink error and turn it into a deserializer error to unwind
    fn check<E: de::Error>(&mut self, result: Result<()>) -> std::result::Result<(), E> {
        result.map_err(|failure| {
            let message = failure.to_string();
            self.failure = Some(failure);
            E::custom(message)
        })
    }

    fn scalar<E: de::Error>(
        &mut self,
        name: Option<&str>,
        value: &str,
        depth: usize,
    ) -> std::result::Result<(), E> {
        match name {
            Some(key) => {
                let result = self.sink.key_value(key, value, depth);
                self.check(result)
            }
            None => Ok(()),
        }
    }
}

/// A value about to be read; `depth` is its depth if it is a container and
/// the depth of its key if it is a scalar
struct ValueSeed<'e, 's, S> {
    emitter: &'e mut Emitter<'s, S>,
    name: Option<String>,
    depth: usize,
}

impl<'de, S: EventSink> DeserializeSeed<'de> for ValueSeed<'_, '_, S> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, S: EventSink> Visitor<'de> for ValueSeed<'_, '_, S> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<(), E> {
        self.emitter.scalar(self.name.as_deref(), &v.to_string(), self.depth)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<(), E> {
        self.emitter.scalar(self.name.as_deref(), &v.to_string(), self.depth)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<(), E> {
        self.emitter.scalar(self.name.as_deref(), &v.to_string(), self.depth)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<(), E> {
        self.emitter.scalar(self.name.as_deref(), &v.to_string(), self.depth)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<(), E> {
        self.emitter.scalar(self.name.as_deref(), v, self.depth)
    }

    // null carries no value worth reporting
    fn visit_unit<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let emitter = self.emitter;
        while seq
            .next_element_seed(ValueSeed {
                emitter: &mut *emitter,
                name: None,
                depth: self.depth + 1,
            })?
            .is_some()
        {}
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let emitter = self.emitter;
        let name = self.name;
        let depth = self.depth;

        let started = emitter.sink.start_object(name.as_deref(), depth);
        emitter.check(started)?;

        while let Some(key) = map.next_key::<String>()? {
            map.next_value_seed(ValueSeed {
                emitter: &mut *emitter,
                name: Some(key),
                depth: depth + 1,
            })?;
        }

        let ended = emitter.sink.end_object(name.as_deref(), depth);
        emitter.check(ended)
    }
}
