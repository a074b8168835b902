//! Key-value cache port.
//!
//! Opening a cache yields a client together with a stream of connection
//! events. The client is usable once a [`CacheEvent::Connected`] arrives; an
//! adapter that gives up instead sends [`CacheEvent::Error`]. Adapters may
//! keep emitting events after the first one, and consumers only honour the
//! first.

use super::{BackendPortError, BackendPortResult};
use crate::orchestration::domain::CacheConfig;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Connection-state event emitted by a cache client.
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// The client finished connecting.
    Connected,
    /// The client failed to connect or lost its connection.
    Error(BackendPortError),
}

/// Live cache client.
pub trait CacheClient: Send + Sync {
    /// Returns the endpoint the client dials.
    fn endpoint(&self) -> String;

    /// Starts closing the connection without waiting for it to finish.
    fn disconnect(&self);
}

/// A freshly opened client and its event stream.
pub struct CacheSession {
    /// The client handle.
    pub client: Arc<dyn CacheClient>,
    /// Connection events in emission order.
    pub events: UnboundedReceiver<CacheEvent>,
}

impl CacheSession {
    /// Bundles a client with its event stream.
    #[must_use]
    pub const fn new(
        client: Arc<dyn CacheClient>,
        events: UnboundedReceiver<CacheEvent>,
    ) -> Self {
        Self { client, events }
    }
}

/// Cache client factory.
pub trait CacheConnector: Send + Sync {
    /// Creates a client for `config` and starts connecting it.
    ///
    /// # Errors
    ///
    /// Returns [`BackendPortError`] when the client cannot be created at all,
    /// for example because the configured URL is malformed.
    fn open(&self, config: &CacheConfig) -> BackendPortResult<CacheSession>;
}
