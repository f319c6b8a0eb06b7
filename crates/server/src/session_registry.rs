use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pose_stream_core::pipeline::stream_session::StreamSession;
use serde::Serialize;
use uuid::Uuid;

/// Public view of one running stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub id: Uuid,
    pub paused: bool,
}

/// Running streams by id.
///
/// Entries are added when a stream starts and removed by its worker when
/// the stream ends, whatever the reason.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, StreamSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: Uuid, session: StreamSession) {
        self.lock().insert(id, session);
    }

    pub fn get(&self, id: &Uuid) -> Option<StreamSession> {
        self.lock().get(id).cloned()
    }

    pub fn remove(&self, id: &Uuid) -> Option<StreamSession> {
        self.lock().remove(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All sessions, ordered by id.
    pub fn list(&self) -> Vec<SessionStatus> {
        let mut statuses: Vec<SessionStatus> = self
            .lock()
            .iter()
            .map(|(id, session)| SessionStatus {
                id: *id,
                paused: session.is_paused(),
            })
            .collect();
        statuses.sort_by_key(|s| s.id);
        statuses
    }

    /// Cancels every running stream; used on shutdown.
    pub fn cancel_all(&self) {
        for session in self.lock().values() {
            session.cancel();
        }
    }

    // Poisoning is ignored: no operation leaves the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, StreamSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let registry = SessionRegistry::new();
        let id = Uuid::new_v4();
        registry.insert(id, StreamSession::new());

        assert_eq!(registry.len(), 1);
        assert!(registry.get(&id).is_some());
        assert!(registry.remove(&id).is_some());
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_get_returns_shared_handle() {
        let registry = SessionRegistry::new();
        let id = Uuid::new_v4();
        let session = StreamSession::new();
        registry.insert(id, session.clone());

        registry.get(&id).unwrap().pause();
        assert!(session.is_paused());
    }

    #[test]
    fn test_list_reports_pause_state_sorted() {
        let registry = SessionRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let paused = StreamSession::new();
        paused.pause();
        registry.insert(a, paused);
        registry.insert(b, StreamSession::new());

        let list = registry.list();
        assert_eq!(list.len(), 2);
        assert!(list[0].id < list[1].id);
        let status_a = list.iter().find(|s| s.id == a).unwrap();
        let status_b = list.iter().find(|s| s.id == b).unwrap();
        assert!(status_a.paused);
        assert!(!status_b.paused);
    }

    #[test]
    fn test_cancel_all() {
        let registry = SessionRegistry::new();
        let sessions: Vec<StreamSession> = (0..3).map(|_| StreamSession::new()).collect();
        for s in &sessions {
            registry.insert(Uuid::new_v4(), s.clone());
        }
        registry.cancel_all();
        assert!(sessions.iter().all(StreamSession::is_cancelled));
    }
}
