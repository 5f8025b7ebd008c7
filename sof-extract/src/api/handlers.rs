//! Upload, results and download handlers.
//!
//! Per session the flow is `Idle -> Processing -> Ready | ErrorShown`. Every
//! outcome of an upload renders a page with HTTP 200; downloads read the
//! session's events without changing them.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};

use crate::api::pages;
use crate::api::state::AppState;
use crate::error::{Result, SofError};
use crate::export::DownloadFormat;
use crate::extraction::EventList;
use crate::processing::{extract_text_blocking, is_allowed_file, UploadedFile};
use crate::session::{SessionId, SESSION_COOKIE};

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "sof_document";

pub const NO_FILE_PART: &str = "No file part in the request. Please choose a PDF or Word document.";
pub const NO_FILE_SELECTED: &str = "No file selected. Please choose a PDF or Word document.";
pub const INVALID_FILE_TYPE: &str =
    "Invalid file type. Please upload a PDF (.pdf) or Word (.docx) file.";
/// Shown when the multipart body cannot be read, most often because it is
/// over the upload limit.
pub fn upload_unreadable_message(max_upload_bytes: usize) -> String {
    let max_mb = max_upload_bytes.div_ceil(1024 * 1024).max(1);
    format!("The upload could not be read (it may be larger than {max_mb} MB).")
}

pub const NO_TEXT_EXTRACTED: &str = "Could not extract any text from the document. It might be empty, corrupted, or an image-based file.";

/// `GET /`
pub async fn show_form() -> Html<String> {
    Html(pages::upload_form(None, None))
}

/// `POST /`
pub async fn process_upload(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload request was not multipart");
            Ok(None)
        }
    };

    let upload = match upload {
        Ok(Some(upload)) => upload,
        Ok(None) => return Html(pages::upload_form(Some(NO_FILE_PART), None)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read upload");
            let message = upload_unreadable_message(state.config.server.max_upload_bytes);
            return Html(pages::upload_form(Some(&message), None)).into_response();
        }
    };

    if upload.filename.is_empty() {
        return Html(pages::upload_form(Some(NO_FILE_SELECTED), None)).into_response();
    }

    if !is_allowed_file(&upload.filename) {
        tracing::info!(filename = %upload.filename, "Rejected upload with unsupported extension");
        return Html(pages::upload_form(
            Some(INVALID_FILE_TYPE),
            Some(&upload.filename),
        ))
        .into_response();
    }

    let filename = upload.filename.clone();
    tracing::info!(filename = %filename, size = upload.bytes.len(), "Processing uploaded document");

    let text = extract_text_blocking(upload).await;
    if text.is_empty() {
        return Html(pages::results_error_page(&filename, NO_TEXT_EXTRACTED)).into_response();
    }

    match state.extractor.extract(&text).await {
        Ok(events) => {
            let (jar, session_id) = ensure_session(jar);
            let page = pages::results_page(&filename, &events);
            state.sessions.put(session_id, events);
            (jar, Html(page)).into_response()
        }
        Err(e) => Html(pages::results_error_page(&filename, &e.to_string())).into_response(),
    }
}

/// `GET /download/{filetype}`
///
/// Redirects to the form when the session holds no events or the format is
/// not `json`/`csv`.
pub async fn download(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(filetype): Path<String>,
) -> Response {
    let events = session_events(&state, &jar);
    if events.is_empty() {
        return Redirect::to("/").into_response();
    }

    let Some(format) = DownloadFormat::parse(&filetype) else {
        return Redirect::to("/").into_response();
    };

    match format.render(&events) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, format.content_type()),
                (header::CONTENT_DISPOSITION, format.content_disposition()),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, filetype = %filetype, "Failed to render download");
            e.into_response()
        }
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<UploadedFile>> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(SofError::Validation(format!("Failed to read upload: {e}"))),
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| SofError::Validation(format!("Failed to read file: {e}")))?;

        return Ok(Some(UploadedFile::new(filename, bytes.to_vec())));
    }
}

fn session_id(jar: &SignedCookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| SessionId::from(cookie.value().to_string()))
}

fn session_events(state: &AppState, jar: &SignedCookieJar) -> EventList {
    session_id(jar)
        .map(|id| state.sessions.get(&id))
        .unwrap_or_default()
}

fn ensure_session(jar: SignedCookieJar) -> (SignedCookieJar, SessionId) {
    if let Some(id) = session_id(&jar) {
        return (jar, id);
    }

    let id = SessionId::generate();
    let cookie = Cookie::build((SESSION_COOKIE, id.as_str().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}
