//! Statement of Facts event extraction service.
//!
//! Upload a shipping Statement of Facts (PDF or DOCX); its text is sent to a
//! hosted model that lists the port-operation events, which are shown as a
//! table and offered as JSON or CSV downloads.

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod llm;
pub mod processing;
pub mod session;
