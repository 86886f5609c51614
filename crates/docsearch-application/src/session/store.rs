use docsearch_core::session::{PageSize, Session, SessionPatch};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// In-memory store of per-folder sessions.
///
/// Every mutation is a read-modify-write performed under one write lock, so
/// readers never observe a partially applied patch.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    /// Page size given to freshly created sessions
    default_page_size: PageSize,
}

impl SessionStore {
    /// Creates a new empty SessionStore.
    pub fn new() -> Self {
        Self::with_page_size(PageSize::default())
    }

    pub fn with_page_size(default_page_size: PageSize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            default_page_size,
        }
    }

    fn new_session(&self) -> Session {
        Session::with_page_size(self.default_page_size)
    }

    /// Returns a copy of the stored session, or a fresh default one.
    ///
    /// Reading never inserts into the store.
    pub async fn get(&self, folder_id: &str) -> Session {
        let sessions = self.sessions.read().await;
        sessions
            .get(folder_id)
            .cloned()
            .unwrap_or_else(|| self.new_session())
    }

    pub async fn contains(&self, folder_id: &str) -> bool {
        self.sessions.read().await.contains_key(folder_id)
    }

    /// Folder ids with a stored session, sorted.
    pub async fn folder_ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Merges `patch` into the session for `folder_id`, creating it first if absent.
    pub async fn update(&self, folder_id: &str, patch: SessionPatch) {
        self.update_with(folder_id, |session| session.apply(patch))
            .await;
    }

    /// Applies `updater` to the session for `folder_id`, creating it first if absent.
    ///
    /// The write lock is held for the whole call; `updater` must not block.
    pub async fn update_with<F, R>(&self, folder_id: &str, updater: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(folder_id.to_string())
            .or_insert_with(|| self.new_session());
        updater(session)
    }

    /// Applies `updater` only if a session for `folder_id` exists.
    pub async fn modify_existing<F, R>(&self, folder_id: &str, updater: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(folder_id).map(updater)
    }

    /// Makes the key set equal to `folder_ids`.
    ///
    /// Missing sessions are created with defaults. Sessions whose id is not
    /// in the set are evicted, and `on_evict` is called for each evicted id
    /// while the write lock is still held.
    ///
    /// # Returns
    ///
    /// The evicted folder ids, sorted.
    pub async fn synchronize<I, S, F>(&self, folder_ids: I, mut on_evict: F) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&str),
    {
        let keep: HashSet<String> = folder_ids.into_iter().map(Into::into).collect();
        let mut sessions = self.sessions.write().await;

        let mut evicted: Vec<String> = sessions
            .keys()
            .filter(|id| !keep.contains(*id))
            .cloned()
            .collect();
        evicted.sort();

        for id in &evicted {
            sessions.remove(id);
            on_evict(id);
        }

        for id in keep {
            if !sessions.contains_key(&id) {
                let session = self.new_session();
                sessions.insert(id, session);
            }
        }

        tracing::debug!(
            "[SessionStore] synchronized: {} sessions, evicted {:?}",
            sessions.len(),
            evicted
        );

        evicted
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
