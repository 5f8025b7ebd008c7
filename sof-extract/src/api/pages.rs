//! Server-rendered HTML pages.

use axum::http::StatusCode;

use crate::extraction::ExtractedEvent;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <main class="container">
{body}
  </main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|message| format!(r#"    <p class="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default()
}

/// The upload form, optionally annotated with an error.
pub fn upload_form(error: Option<&str>, filename: Option<&str>) -> String {
    let previous = filename
        .filter(|name| !name.is_empty())
        .map(|name| {
            format!(
                r#"    <p class="muted">Last file: {}</p>"#,
                escape_html(name)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"    <h1>Statement of Facts Extractor</h1>
    <p>Upload a Statement of Facts as a PDF or Word document to extract its port operation events.</p>
{error}
{previous}
    <form method="post" action="/" enctype="multipart/form-data">
      <input type="file" name="sof_document" accept=".pdf,.docx" required>
      <button type="submit">Extract events</button>
    </form>"#,
        error = error_banner(error),
    );

    layout("Statement of Facts Extractor", &body)
}

fn cell(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_default()
}

/// Results page listing every event with its two timestamps.
pub fn results_page(filename: &str, events: &[ExtractedEvent]) -> String {
    let rows: String = events
        .iter()
        .map(|event| {
            format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&event.event),
                cell(event.start_time.as_deref()),
                cell(event.end_time.as_deref()),
            )
        })
        .collect();

    // Downloads of an empty list would only redirect back to the form.
    let (table, downloads) = if events.is_empty() {
        (
            r#"    <p class="muted">The model did not find any events in this document.</p>"#
                .to_string(),
            "",
        )
    } else {
        (
            format!(
                r#"    <table>
      <thead>
        <tr><th>Event</th><th>Start time</th><th>End time</th></tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>"#
            ),
            r#"
    <p class="downloads">
      <a href="/download/json">Download JSON</a>
      <a href="/download/csv">Download CSV</a>
    </p>"#,
        )
    };

    let body = format!(
        r#"    <h1>Extracted events</h1>
    <p class="muted">{filename}</p>
{table}{downloads}
    <p><a href="/">Upload another document</a></p>"#,
        filename = escape_html(filename),
    );

    layout("Extracted events", &body)
}

/// Results page for an upload that produced no events.
pub fn results_error_page(filename: &str, error: &str) -> String {
    let body = format!(
        r#"    <h1>Extracted events</h1>
    <p class="muted">{filename}</p>
{error}
    <p><a href="/">Try another document</a></p>"#,
        filename = escape_html(filename),
        error = error_banner(Some(error)),
    );

    layout("Extraction failed", &body)
}

/// Bare page for errors that escape the upload flow.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"    <h1>{status}</h1>
{error}
    <p><a href="/">Back to upload</a></p>"#,
        status = escape_html(&status.to_string()),
        error = error_banner(Some(message)),
    );

    layout(&status.to_string(), &body)
}
