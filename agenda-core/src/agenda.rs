//! Root handle wiring the session and event stores to a backend and storage.

use std::sync::Arc;

use crate::auth::{AuthApi, AuthStore, HttpAuthApi};
use crate::calendar::CalendarStore;
use crate::config::AgendaConfig;
use crate::error::AgendaResult;
use crate::storage::{FileStorage, TokenStorage};

#[derive(Clone)]
pub struct Agenda {
    auth: AuthStore,
    calendar: CalendarStore,
}

impl Agenda {
    /// Load configuration and connect to the configured backend and token file.
    pub fn load() -> AgendaResult<Self> {
        Self::from_config(&AgendaConfig::load()?)
    }

    pub fn from_config(config: &AgendaConfig) -> AgendaResult<Self> {
        let api = HttpAuthApi::from_config(config)?;
        let storage = FileStorage::new(config.storage_path());

        Ok(Self::new(Arc::new(api), Arc::new(storage), config))
    }

    pub fn new(
        api: Arc<dyn AuthApi>,
        storage: Arc<dyn TokenStorage>,
        config: &AgendaConfig,
    ) -> Self {
        Agenda {
            auth: AuthStore::new(api, storage, config.error_clear_delay()),
            calendar: CalendarStore::new(),
        }
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn calendar(&self) -> &CalendarStore {
        &self.calendar
    }

    /// End the session and forget every loaded event.
    pub fn start_logout(&self) {
        self.auth.start_logout();
        self.calendar.clear();
    }
}
