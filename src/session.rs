use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::authz::Role;

/// Server-side session state, the second identity store next to the
/// bearer token. Opened at login, removed at logout or when the identity
/// resolver detects a mismatch with the token's principal.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for a freshly authenticated user; returns its id.
    pub fn open(&self, user_id: Uuid, role: Role, name: impl Into<String>) -> Uuid {
        let sid = Uuid::new_v4();
        let session = Session {
            user_id,
            role,
            name: name.into(),
        };
        self.inner
            .write()
            .expect("session store lock poisoned")
            .insert(sid, session);
        sid
    }

    pub fn get(&self, sid: Uuid) -> Option<Session> {
        self.inner
            .read()
            .expect("session store lock poisoned")
            .get(&sid)
            .cloned()
    }

    pub fn close(&self, sid: Uuid) {
        self.inner
            .write()
            .expect("session store lock poisoned")
            .remove(&sid);
    }
}
