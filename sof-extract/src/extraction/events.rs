use serde::{Deserialize, Deserializer, Serialize};

/// One port-operation event as returned by the model.
///
/// Serialises with exactly three keys, in the order `event`, `start_time`,
/// `end_time`; absent timestamps serialise as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractedEvent {
    pub event: String,
    #[serde(deserialize_with = "required_nullable")]
    pub start_time: Option<String>,
    #[serde(deserialize_with = "required_nullable")]
    pub end_time: Option<String>,
}

impl ExtractedEvent {
    pub fn new(
        event: impl Into<String>,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Self {
        Self {
            event: event.into(),
            start_time: start_time.map(String::from),
            end_time: end_time.map(String::from),
        }
    }
}

/// Events in the order the model listed them.
pub type EventList = Vec<ExtractedEvent>;

/// Top-level document shape, shared by the model response and the JSON download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsDocument {
    pub events: EventList,
}

// A plain `Option` field would accept a missing key as `None`; routing it
// through a custom deserializer makes the key mandatory while still allowing
// an explicit `null`.
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// Parse a model response body into events.
///
/// The body must be a JSON object with an `events` array whose entries carry
/// exactly `event` (string), `start_time` and `end_time` (string or null).
pub fn parse_events(body: &str) -> serde_json::Result<EventList> {
    let document: EventsDocument = serde_json::from_str(body)?;
    Ok(document.events)
}
