use std::sync::Arc;

use tracing::{debug, info};

use super::role_resolver::resolve_role;
use super::snapshot::read_persisted_record;
use crate::models::{Role, SessionRecord};
use crate::storage::{SessionStorage, StorageError, SESSION_KEY};

/// The in-memory record plus its role, resolved once when the record is set.
#[derive(Debug, Clone)]
struct ActiveSession {
    record: SessionRecord,
    role: Option<String>,
}

impl ActiveSession {
    fn new(record: SessionRecord) -> Self {
        let role = resolve_role(&record);
        Self { record, role }
    }
}

/// Client-side authentication state.
///
/// Mirrors the persisted session record in memory and answers the derived
/// questions (logged in, role, admin, writer). Construction hydrates from
/// storage once; after that only `load` and `set` change the state.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    current: Option<ActiveSession>,
}

impl SessionStore {
    /// Create a store and hydrate it from whatever is already persisted.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let mut store = Self {
            storage,
            current: None,
        };
        store.load();
        store
    }

    /// Re-read the persisted record. Returns whether a valid session was found;
    /// anything else clears the in-memory state.
    pub fn load(&mut self) -> bool {
        match read_persisted_record(self.storage.as_ref()) {
            Some(record) => {
                self.current = Some(ActiveSession::new(record));
                true
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    /// Persist `record` as the current session, or remove it with `None`.
    ///
    /// The record is stored exactly as given. On a storage failure the
    /// in-memory state is left untouched.
    pub fn set(&mut self, record: Option<SessionRecord>) -> Result<(), StorageError> {
        match record {
            Some(record) => {
                let serialized = record.to_json()?;
                self.storage.set_item(SESSION_KEY, &serialized)?;
                let session = ActiveSession::new(record);
                info!(
                    "Session stored (role: {})",
                    session.role.as_deref().unwrap_or("none")
                );
                self.current = Some(session);
            }
            None => {
                self.storage.remove_item(SESSION_KEY)?;
                debug!("Session cleared");
                self.current = None;
            }
        }
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.set(None)
    }

    pub fn current(&self) -> Option<&SessionRecord> {
        self.current.as_ref().map(|session| &session.record)
    }

    /// A `token` key of any value, `null` included, counts as logged in.
    pub fn is_logged_in(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|session| session.record.get("token").is_some())
    }

    pub fn role(&self) -> Option<&str> {
        self.current.as_ref().and_then(|session| session.role.as_deref())
    }

    pub fn privilege(&self) -> Role {
        Role::from_name(self.role())
    }

    pub fn is_admin(&self) -> bool {
        self.privilege().is_admin()
    }

    pub fn is_writer(&self) -> bool {
        self.privilege().is_writer()
    }
}
