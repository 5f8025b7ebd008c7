//! Download renderings of an [`EventList`].

use crate::error::{Result, SofError};
use crate::extraction::{EventsDocument, ExtractedEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Json,
    Csv,
}

impl DownloadFormat {
    /// Parse the `{filetype}` path segment; anything else is unsupported.
    pub fn parse(filetype: &str) -> Option<Self> {
        match filetype {
            "json" => Some(DownloadFormat::Json),
            "csv" => Some(DownloadFormat::Csv),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DownloadFormat::Json => "application/json",
            DownloadFormat::Csv => "text/csv",
        }
    }

    pub fn content_disposition(&self) -> &'static str {
        match self {
            DownloadFormat::Json => "attachment;filename=sof_events.json",
            DownloadFormat::Csv => "attachment;filename=sof_events.csv",
        }
    }

    pub fn render(&self, events: &[ExtractedEvent]) -> Result<String> {
        match self {
            DownloadFormat::Json => to_json(events),
            DownloadFormat::Csv => to_csv(events),
        }
    }
}

/// `{"events": [...]}`, pretty-printed with two-space indentation.
pub fn to_json(events: &[ExtractedEvent]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&EventsDocument {
        events: events.to_vec(),
    })?)
}

/// Header row of field names followed by one row per event.
///
/// `None` timestamps become empty cells. An empty list renders as an empty
/// document with no header.
pub fn to_csv(events: &[ExtractedEvent]) -> Result<String> {
    if events.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for event in events {
        writer.serialize(event)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SofError::Internal(format!("Failed to flush CSV output: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| SofError::Internal(format!("CSV output was not valid UTF-8: {e}")))
}
