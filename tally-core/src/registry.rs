//! Session registry and finalized-results cache
//!
//! Sessions live in memory behind a registry map. Each session sits in
//! its own async mutex so concurrent requests against different sessions
//! proceed in parallel while requests against the same session
//! serialize; the registry lock itself is only ever held long enough to
//! clone a handle out of the map.
//!
//! Completed assessments move out of the session map into a share-token
//! keyed cache with its own longer expiry, backing shareable result
//! links. A background sweeper evicts idle sessions and expired cached
//! results.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::CompletedAssessment;
use crate::error::SessionError;
use crate::session::AssessmentSession;

/// Expiry knobs for sessions and cached results
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Idle time after which an unfinished session is evicted
    pub session_ttl: Duration,
    /// How long a finalized result stays retrievable by share token
    pub result_ttl: Duration,
    /// How often the background sweeper runs
    pub sweep_interval: StdDuration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(2),
            result_ttl: Duration::hours(48),
            sweep_interval: StdDuration::from_secs(30 * 60),
        }
    }
}

struct CachedResult {
    result: CompletedAssessment,
    expires_at: DateTime<Utc>,
}

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<AssessmentSession>>;

/// In-memory store of live sessions and finalized results
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    results: RwLock<HashMap<String, CachedResult>>,
    config: RegistryConfig,
}

impl SessionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            results: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a new session, returning its id
    pub async fn insert(&self, session: AssessmentSession) -> String {
        let id = session.id().to_string();
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        debug!(session_id = %id, "session registered");
        id
    }

    /// Handle for an existing session
    pub async fn session(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Drop a session from the registry, returning its handle
    pub async fn remove(&self, session_id: &str) -> Result<SessionHandle, SessionError> {
        self.sessions
            .write()
            .await
            .remove(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Store a finalized result under its share token
    pub async fn cache_result(&self, share_token: &str, result: CompletedAssessment) {
        let expires_at = Utc::now() + self.config.result_ttl;
        self.results.write().await.insert(
            share_token.to_string(),
            CachedResult { result, expires_at },
        );
        debug!(%share_token, %expires_at, "result cached");
    }

    /// Fetch a cached result by share token, honoring its expiry
    pub async fn shared_result(
        &self,
        share_token: &str,
    ) -> Result<CompletedAssessment, SessionError> {
        let results = self.results.read().await;
        match results.get(share_token) {
            Some(cached) if cached.expires_at > Utc::now() => Ok(cached.result.clone()),
            _ => Err(SessionError::SharedResultNotFound(share_token.to_string())),
        }
    }

    /// Evict idle sessions and expired results
    ///
    /// Sessions whose mutex is currently held are in the middle of a
    /// request and are skipped; the next sweep sees their refreshed
    /// timestamp.
    pub async fn sweep(&self) -> (usize, usize) {
        let now = Utc::now();
        let cutoff = now - self.config.session_ttl;

        let mut expired_sessions = Vec::new();
        {
            let sessions = self.sessions.read().await;
            for (id, handle) in sessions.iter() {
                if let Ok(session) = handle.try_lock()
                    && session.last_accessed() < cutoff
                {
                    expired_sessions.push(id.clone());
                }
            }
        }
        if !expired_sessions.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in &expired_sessions {
                sessions.remove(id);
            }
        }

        let mut results = self.results.write().await;
        let before = results.len();
        results.retain(|_, cached| cached.expires_at > now);
        let expired_results = before - results.len();
        drop(results);

        if !expired_sessions.is_empty() || expired_results > 0 {
            info!(
                sessions = expired_sessions.len(),
                results = expired_results,
                "sweep evicted expired entries"
            );
        }
        (expired_sessions.len(), expired_results)
    }

    /// Run `sweep` forever on the configured interval
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        let mut interval = tokio::time::interval(registry.config.sweep_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::spawn(async move {
            loop {
                interval.tick().await;
                registry.sweep().await;
            }
        })
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
