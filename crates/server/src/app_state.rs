use game_core::SessionStore;
use tokio::sync::Mutex;

pub(crate) struct AppState {
    pub(crate) sessions: Mutex<SessionStore>,
}

impl AppState {
    pub(crate) fn new(sessions: SessionStore) -> Self {
        Self {
            sessions: Mutex::new(sessions),
        }
    }
}
