//! Session store: runs the login, register and token-check flows.
//!
//! State lives in a `watch` channel and is only ever changed by applying one
//! [`AuthAction`] inside `send_modify`, so a reader never sees a half-applied
//! transition. Every flow records the session generation when it starts and
//! drops the backend's answer if the generation moved on in the meantime
//! (a manual logout during a token check, a second login, ...).

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::api::{AuthApi, AuthResponse, LoginCredentials, RegisterData};
use crate::auth::state::{AuthAction, AuthState, AuthStatus, User};
use crate::error::AgendaResult;
use crate::storage::TokenStorage;

/// Generation counter plus the pending error auto-clear, guarded together.
#[derive(Default)]
struct SessionControl {
    generation: u64,
    error_timer: Option<CancellationToken>,
}

struct Inner {
    state: watch::Sender<AuthState>,
    control: Mutex<SessionControl>,
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    error_clear_delay: Duration,
}

/// Handle to the session store. Clones share the same session.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl AuthStore {
    pub fn new(
        api: Arc<dyn AuthApi>,
        storage: Arc<dyn TokenStorage>,
        error_clear_delay: Duration,
    ) -> Self {
        Self::with_state(api, storage, error_clear_delay, AuthState::new())
    }

    /// Start from a given state instead of `checking`.
    pub fn with_state(
        api: Arc<dyn AuthApi>,
        storage: Arc<dyn TokenStorage>,
        error_clear_delay: Duration,
        initial: AuthState,
    ) -> Self {
        let (state, _) = watch::channel(initial);

        AuthStore {
            inner: Arc::new(Inner {
                state,
                control: Mutex::new(SessionControl::default()),
                api,
                storage,
                error_clear_delay,
            }),
        }
    }

    // READ ACCESSORS:

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> AuthStatus {
        self.inner.state.borrow().status
    }

    pub fn user(&self) -> User {
        self.inner.state.borrow().user.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.inner.state.borrow().error_message.clone()
    }

    /// Receiver notified after every transition.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    // FLOWS:

    pub async fn start_login(&self, credentials: &LoginCredentials) {
        let generation = self.inner.dispatch(AuthAction::Checking);
        let result = self.inner.api.login(credentials).await;
        self.inner.finish_sign_in(generation, result, "login");
    }

    pub async fn start_register(&self, data: &RegisterData) {
        let generation = self.inner.dispatch(AuthAction::Checking);
        let result = self.inner.api.register(data).await;
        self.inner.finish_sign_in(generation, result, "register");
    }

    /// Restore the session from the persisted token, if there is one.
    pub async fn check_auth_token(&self) {
        let token = match self.inner.storage.token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read stored token");
                None
            }
        };

        let Some(token) = token else {
            debug!("No stored token");
            self.inner.dispatch(AuthAction::Logout(None));
            return;
        };

        let generation = self.inner.current_generation();
        let result = self.inner.api.renew(&token).await;
        self.inner.finish_token_check(generation, result);
    }

    /// End the session and forget the stored token. Loaded calendar events are left
    /// alone; callers outside the crate go through `Agenda::start_logout`, which clears both.
    pub(crate) fn start_logout(&self) {
        self.inner.clear_storage();
        self.inner.dispatch(AuthAction::Logout(None));
        info!("Logged out");
    }

    pub fn clear_error_message(&self) {
        self.inner.dispatch(AuthAction::ClearErrorMessage);
    }
}

impl Inner {
    fn lock_control(&self) -> std::sync::MutexGuard<'_, SessionControl> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_generation(&self) -> u64 {
        self.lock_control().generation
    }

    /// Apply `action` as a new transition; returns the generation it leaves behind.
    fn dispatch(&self, action: AuthAction) -> u64 {
        let mut control = self.lock_control();
        self.apply_locked(&mut control, action)
    }

    fn apply_locked(&self, control: &mut SessionControl, action: AuthAction) -> u64 {
        if let Some(timer) = control.error_timer.take() {
            timer.cancel();
        }

        if matches!(action, AuthAction::Checking | AuthAction::Logout(_)) {
            control.generation += 1;
        }

        debug!(?action, generation = control.generation, "Session transition");
        self.state.send_modify(|state| state.apply(action));
        control.generation
    }

    fn finish_sign_in(
        self: &Arc<Self>,
        generation: u64,
        result: AgendaResult<AuthResponse>,
        flow: &'static str,
    ) {
        let mut control = self.lock_control();
        if control.generation != generation {
            debug!(flow, generation, "Discarding superseded response");
            return;
        }

        match result {
            Ok(resp) => {
                self.persist_token(&resp.token);
                self.apply_locked(&mut control, AuthAction::Login(resp.user()));
                info!(flow, uid = %resp.uid, "Authenticated");
            }
            Err(e) => {
                let message = e.user_message();
                warn!(flow, %message, "Authentication failed");
                let generation = self.apply_locked(&mut control, AuthAction::Logout(Some(message)));
                control.error_timer = Some(self.schedule_error_clear(generation));
            }
        }
    }

    fn finish_token_check(&self, generation: u64, result: AgendaResult<AuthResponse>) {
        let mut control = self.lock_control();
        if control.generation != generation {
            debug!(generation, "Discarding superseded token check");
            return;
        }

        match result {
            Ok(resp) => {
                self.persist_token(&resp.token);
                self.apply_locked(&mut control, AuthAction::Login(resp.user()));
                info!(uid = %resp.uid, "Session restored from stored token");
            }
            Err(e) => {
                warn!(error = %e, "Stored token rejected");
                self.clear_storage();
                self.apply_locked(&mut control, AuthAction::Logout(None));
            }
        }
    }

    /// Clear the error after the configured delay unless a later transition cancels it first.
    fn schedule_error_clear(self: &Arc<Self>, generation: u64) -> CancellationToken {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let inner = Arc::clone(self);
        let delay = self.error_clear_delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => inner.expire_error(generation),
            }
        });

        cancel
    }

    fn expire_error(&self, generation: u64) {
        let mut control = self.lock_control();
        if control.generation != generation {
            return;
        }

        control.error_timer = None;
        self.state
            .send_modify(|state| state.apply(AuthAction::ClearErrorMessage));
    }

    // Token writes and clears happen while `control` is held so they are ordered with
    // the transition they belong to; a superseded flow can neither resurrect a token
    // after a logout nor wipe one a later login stored. Each one rewrites a single
    // two-key file.
    //
    // A session that the backend accepted stays usable for this process even if
    // it cannot be persisted.
    fn persist_token(&self, token: &str) {
        if let Err(e) = self.storage.save_token(token) {
            warn!(error = %e, "Could not persist token");
        }
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear_token() {
            warn!(error = %e, "Could not clear stored token");
        }
    }
}
