pub mod prediction;
pub mod state_machine;
pub mod tournament;

use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use futures::future::BoxFuture;
use tokio::sync::{RwLock, watch};
use tokio::time::timeout;
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{bracket_store::BracketStore, storage::StorageResult},
    error::ServiceError,
};

pub use self::prediction::PredictionSession;
pub use self::state_machine::{HostEvent, HostPhase, InvalidTransition};
pub use self::tournament::{HostSession, HostSessionError};

pub type SharedState = Arc<AppState>;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Central application state storing live sessions and the storage handle.
pub struct AppState {
    game_store: RwLock<Option<Arc<dyn BracketStore>>>,
    degraded: watch::Sender<bool>,
    tournaments: DashMap<String, HostSession>,
    predictions: DashMap<Uuid, PredictionSession>,
    config: AppConfig,
    store_timeout: Duration,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_store_timeout(config, DEFAULT_STORE_TIMEOUT)
    }

    /// Same as [`AppState::new`] with a custom bound on every storage call.
    pub fn with_store_timeout(config: AppConfig, store_timeout: Duration) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            game_store: RwLock::new(None),
            degraded: degraded_tx,
            tournaments: DashMap::new(),
            predictions: DashMap::new(),
            config,
            store_timeout,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn game_store(&self) -> Option<Arc<dyn BracketStore>> {
        let guard = self.game_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with [`ServiceError::Degraded`].
    pub async fn require_game_store(&self) -> Result<Arc<dyn BracketStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.game_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a store implementation and leave degraded mode.
    pub async fn set_game_store(&self, store: Arc<dyn BracketStore>) {
        {
            let mut guard = self.game_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_game_store(&self) {
        {
            let mut guard = self.game_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Live host sessions keyed by game id.
    pub fn tournaments(&self) -> &DashMap<String, HostSession> {
        &self.tournaments
    }

    /// Live prediction sessions keyed by prediction id.
    pub fn predictions(&self) -> &DashMap<Uuid, PredictionSession> {
        &self.predictions
    }

    /// Run one storage call against the installed store, bounded by the store timeout.
    pub async fn with_store<T, F>(&self, operation: &'static str, call: F) -> Result<T, ServiceError>
    where
        F: FnOnce(Arc<dyn BracketStore>) -> BoxFuture<'static, StorageResult<T>>,
    {
        let store = self.require_game_store().await?;
        match timeout(self.store_timeout, call(store)).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "storage call timed out"
                );
                Err(ServiceError::Timeout)
            }
        }
    }
}
