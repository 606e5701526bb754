//! Ambient context the tracker reads at submission time.

use std::sync::Arc;

use chrono::{DateTime, Duration, DurationRound, Utc};
use herald_core_types::ActorId;
use parking_lot::{Mutex, RwLock};

/// Resolves the authenticated actor, if any.
pub trait ActorResolver: Send + Sync {
    fn current_actor(&self) -> Option<ActorId>;
}

/// Auth session state as seen by the tracker.
#[derive(Debug, Default)]
pub struct AuthState {
    actor: RwLock<Option<ActorId>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(actor: ActorId) -> Self {
        Self {
            actor: RwLock::new(Some(actor)),
        }
    }

    pub fn sign_in(&self, actor: ActorId) {
        *self.actor.write() = Some(actor);
    }

    pub fn sign_out(&self) {
        *self.actor.write() = None;
    }
}

impl ActorResolver for AuthState {
    fn current_actor(&self) -> Option<ActorId> {
        self.actor
            .read()
            .as_ref()
            .filter(|actor| !actor.as_str().trim().is_empty())
            .cloned()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    pub referrer: String,
    pub user_agent: String,
}

pub trait NavigationContext: Send + Sync {
    fn page(&self) -> PageContext;
}

pub const DEFAULT_USER_AGENT: &str = concat!("herald/", env!("CARGO_PKG_VERSION"));

/// Mutable navigation state driven by the UI router.
#[derive(Debug)]
pub struct BrowserContext {
    state: RwLock<PageContext>,
}

impl BrowserContext {
    pub fn new(user_agent: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(PageContext {
                url: "/".to_string(),
                referrer: referrer.into(),
                user_agent: user_agent.into(),
            }),
        }
    }

    /// Records a route change. The referrer is the document referrer and is
    /// left untouched by in-app navigation.
    pub fn navigate(&self, path: impl Into<String>) {
        self.state.write().url = path.into();
    }

    pub fn set_referrer(&self, referrer: impl Into<String>) {
        self.state.write().referrer = referrer.into();
    }
}

impl Default for BrowserContext {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, String::new())
    }
}

impl NavigationContext for BrowserContext {
    fn page(&self) -> PageContext {
        self.state.read().clone()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Millisecond clock whose readings strictly increase: a reading that would
/// not advance past the previous one is bumped by one millisecond.
pub struct MonotonicClock {
    source: Arc<dyn Clock>,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new(source: Arc<dyn Clock>) -> Self {
        Self {
            source,
            last: Mutex::new(None),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn tick(&self) -> DateTime<Utc> {
        let raw = self.source.now();
        let now = raw
            .duration_trunc(Duration::milliseconds(1))
            .unwrap_or(raw);
        let mut last = self.last.lock();
        let next = match *last {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        *last = Some(next);
        next
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn auth_state_tracks_sign_in_and_out() {
        let auth = AuthState::new();
        assert!(auth.current_actor().is_none());
        auth.sign_in(ActorId("user-1".into()));
        assert_eq!(auth.current_actor(), Some(ActorId("user-1".into())));
        auth.sign_out();
        assert!(auth.current_actor().is_none());
    }

    #[test]
    fn blank_actor_resolves_to_none() {
        let auth = AuthState::signed_in(ActorId(String::new()));
        assert!(auth.current_actor().is_none());
    }

    #[test]
    fn navigation_keeps_document_referrer() {
        let browser = BrowserContext::new("Mozilla/5.0", "https://search.example");
        browser.navigate("/wallet");
        let page = browser.page();
        assert_eq!(page.url, "/wallet");
        assert_eq!(page.referrer, "https://search.example");
        assert_eq!(page.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn default_context_reports_herald_user_agent() {
        let page = BrowserContext::default().page();
        assert_eq!(page.user_agent, DEFAULT_USER_AGENT);
        assert!(page.user_agent.starts_with("herald/"));
        assert_eq!(page.url, "/");
    }

    #[test]
    fn monotonic_clock_bumps_stalled_readings() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap();
        let clock = MonotonicClock::new(Arc::new(FixedClock(instant)));
        let a = clock.tick();
        let b = clock.tick();
        let c = clock.tick();
        assert_eq!(a, instant);
        assert_eq!(b - a, Duration::milliseconds(1));
        assert_eq!(c - b, Duration::milliseconds(1));
    }

    #[test]
    fn monotonic_clock_truncates_to_millis() {
        let instant = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let clock = MonotonicClock::new(Arc::new(FixedClock(instant)));
        assert_eq!(clock.tick().timestamp_subsec_nanos(), 123_000_000);
    }
}
