//! Prompt text for Statement of Facts extraction
//!
//! The instruction block is fixed; only the document block varies per request.

/// Marker placed in front of the raw document text.
pub const DOCUMENT_TEXT_MARKER: &str = "DOCUMENT TEXT:";

/// Instruction block sent ahead of every document.
///
/// Describes the task, the meaning of each field, how to normalise
/// timestamps, and the exact JSON shape expected back.
pub const SOF_EXTRACTION_PROMPT: &str = r#"You are an assistant that specialises in shipping and logistics paperwork. Extract every port operation event from the Statement of Facts (SoF) text that follows.

Instructions:
1. Find every event. Look for any port activity, vessel movement or cargo handling, for example "Vessel arrived", "Anchored", "Pilot on board", "Commenced loading", "Shifted berth", "Bunkering", "Cargo operations completed".
2. Find the timestamps. For each event give its "start_time" and "end_time". Source documents write times in many ways ("2024-08-20 14:30", "20/08/2024 1430 hrs", "Aug 20, 2024, 2:30 PM"); normalise them to "YYYY-MM-DD HH:MM" where the date and time can be determined.
3. Missing data. When an event has a single timestamp, use it as "start_time" and set "end_time" to null. When a time is unclear or absent, set that field to null.
4. Output. Reply with one JSON object holding a single key, "events", whose value is a list of event objects. Every event object has exactly three keys: "event" (string), "start_time" (string or null) and "end_time" (string or null).
5. Completeness. List every operation that appears in the document, in the order it appears.

Example output:
{
  "events": [
    {
      "event": "Vessel arrived at pilot station",
      "start_time": "2024-08-20 10:00",
      "end_time": null
    },
    {
      "event": "Cargo loading",
      "start_time": "2024-08-20 14:30",
      "end_time": "2024-08-21 02:00"
    }
  ]
}

Analyse the SoF document text below and reply with the JSON object only."#;

/// Wrap raw document text in the block that follows the instructions.
///
/// # Example
/// ```
/// use sof_extract::llm::prompts::document_block;
///
/// let block = document_block("NOR tendered 0800");
/// assert_eq!(block, "DOCUMENT TEXT:\nNOR tendered 0800");
/// ```
pub fn document_block(text: &str) -> String {
    format!("{DOCUMENT_TEXT_MARKER}\n{text}")
}
