//! In-memory cache connector with scripted connection events.

use crate::orchestration::{
    domain::CacheConfig,
    ports::{
        BackendPortError, BackendPortResult, CacheClient, CacheConnector, CacheEvent, CacheSession,
    },
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Cache client handed out by [`InMemoryCacheConnector`].
#[derive(Debug)]
pub struct InMemoryCacheClient {
    endpoint: String,
    disconnected: AtomicBool,
}

impl InMemoryCacheClient {
    /// Returns whether [`CacheClient::disconnect`] was called.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }
}

impl CacheClient for InMemoryCacheClient {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }
}

/// Cache connector that replays a fixed event script on every open.
///
/// Every scripted event is queued before `open` returns and the sender is
/// then dropped, so an empty script models a client whose event stream
/// closes without ever reporting a state.
#[derive(Debug, Clone)]
pub struct InMemoryCacheConnector {
    state: Arc<RwLock<InMemoryCacheState>>,
}

#[derive(Debug)]
struct InMemoryCacheState {
    script: Vec<CacheEvent>,
    open_error: Option<BackendPortError>,
    clients: Vec<Arc<InMemoryCacheClient>>,
}

impl Default for InMemoryCacheConnector {
    fn default() -> Self {
        Self::with_events(vec![CacheEvent::Connected])
    }
}

impl InMemoryCacheConnector {
    /// Creates a connector whose clients connect immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connector that emits `events`, in order, on every open.
    #[must_use]
    pub fn with_events(events: Vec<CacheEvent>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryCacheState {
                script: events,
                open_error: None,
                clients: Vec::new(),
            })),
        }
    }

    /// Creates a connector whose clients report `error` instead of
    /// connecting.
    #[must_use]
    pub fn refusing(error: BackendPortError) -> Self {
        Self::with_events(vec![CacheEvent::Error(error)])
    }

    /// Makes every subsequent `open` fail synchronously with `error`.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_open(&self, error: BackendPortError) -> BackendPortResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| BackendPortError::runtime(std::io::Error::other(err.to_string())))?;
        state.open_error = Some(error);
        Ok(())
    }

    /// Returns every client opened so far.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn clients(&self) -> BackendPortResult<Vec<Arc<InMemoryCacheClient>>> {
        let state = self
            .state
            .read()
            .map_err(|err| BackendPortError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(state.clients.clone())
    }
}

impl CacheConnector for InMemoryCacheConnector {
    fn open(&self, config: &CacheConfig) -> BackendPortResult<CacheSession> {
        let mut state = self
            .state
            .write()
            .map_err(|err| BackendPortError::runtime(std::io::Error::other(err.to_string())))?;
        if let Some(error) = &state.open_error {
            return Err(error.clone());
        }

        let client = Arc::new(InMemoryCacheClient {
            endpoint: config.endpoint(),
            disconnected: AtomicBool::new(false),
        });
        state.clients.push(Arc::clone(&client));

        let (sender, events) = mpsc::unbounded_channel();
        for event in &state.script {
            if sender.send(event.clone()).is_err() {
                break;
            }
        }
        drop(sender);

        Ok(CacheSession::new(client, events))
    }
}
