// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-wide session state: one writer, many readers.

use crate::models::Session;
use std::sync::Arc;
use tokio::sync::watch;

/// Create the session store. The writer goes to the auth bridge; readers
/// are handed to everything else.
pub fn session_store() -> (SessionWriter, SessionStore) {
    let (tx, rx) = watch::channel(None);
    (SessionWriter { tx }, SessionStore { rx })
}

/// Read handle. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    rx: watch::Receiver<Option<Arc<Session>>>,
}

impl SessionStore {
    pub fn current(&self) -> Option<Arc<Session>> {
        self.rx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait for the next publish or clear.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// The only handle that can change the session. Not `Clone`.
pub struct SessionWriter {
    tx: watch::Sender<Option<Arc<Session>>>,
}

impl SessionWriter {
    pub fn publish(&self, session: Session) {
        tracing::debug!(user_id = session.user_id(), "Publishing session");
        self.tx.send_replace(Some(Arc::new(session)));
    }

    pub fn clear(&self) -> Option<Arc<Session>> {
        self.tx.send_replace(None)
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.tx.borrow().clone()
    }

    pub fn reader(&self) -> SessionStore {
        SessionStore {
            rx: self.tx.subscribe(),
        }
    }
}
