//! Per-browsing-session identity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use herald_core_types::SessionId;
use parking_lot::Mutex;
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub trait SessionIdGenerator: Send + Sync {
    fn generate(&self) -> SessionId;
}

/// `session_<unix-millis>_<9 base-36 chars>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSessionIds;

impl SessionIdGenerator for RandomSessionIds {
    fn generate(&self) -> SessionId {
        SessionId(format!(
            "session_{}_{}",
            Utc::now().timestamp_millis(),
            random_suffix()
        ))
    }
}

fn random_suffix() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(BASE36[(bits % 36) as usize] as char);
        bits /= 36;
    }
    out
}

/// Deterministic `<prefix>-1`, `<prefix>-2`, ... ids.
#[derive(Debug)]
pub struct SequentialSessionIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialSessionIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl SessionIdGenerator for SequentialSessionIds {
    fn generate(&self) -> SessionId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        SessionId(format!("{}-{}", self.prefix, n))
    }
}

/// Session-scoped slot holding the current id. Created lazily on first
/// access, destroyed by [`SessionContext::end`].
pub struct SessionContext {
    generator: Arc<dyn SessionIdGenerator>,
    slot: Mutex<Option<SessionId>>,
}

impl SessionContext {
    pub fn new(generator: Arc<dyn SessionIdGenerator>) -> Self {
        Self {
            generator,
            slot: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> SessionId {
        let mut guard = self.slot.lock();
        guard
            .get_or_insert_with(|| self.generator.generate())
            .clone()
    }

    /// Current id without creating one.
    pub fn current(&self) -> Option<SessionId> {
        self.slot.lock().clone()
    }

    /// Ends the session; the next [`SessionContext::session_id`] call starts a new one.
    pub fn end(&self) -> Option<SessionId> {
        self.slot.lock().take()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(Arc::new(RandomSessionIds))
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("current", &self.current())
            .finish()
    }
}
