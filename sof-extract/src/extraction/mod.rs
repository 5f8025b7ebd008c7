//! Structured event extraction: turns raw document text into an [`EventList`]
//! by way of a hosted model, and validates what the model sends back.

mod client;
mod events;

pub use client::{EventExtractor, ExtractionError};
pub use events::{parse_events, EventList, EventsDocument, ExtractedEvent};
