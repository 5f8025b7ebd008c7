use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::extraction::EventExtractor;
use crate::llm::CompletionModel;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: EventExtractor,
    pub sessions: Arc<dyn SessionStore>,
    /// Signs the session cookie. Generated per process, so sessions end on restart.
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(
        config: Config,
        model: Arc<dyn CompletionModel>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            extractor: EventExtractor::new(model),
            sessions,
            cookie_key: Key::generate(),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
