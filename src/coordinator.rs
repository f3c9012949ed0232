// Re-authentication coordinator
//
// Subscribes to the credentials, reauthentication and session channels and
// drives two reactions: triggering token refresh when the backend signals an
// expired session, and creating a login credential on first sign-in.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::collaborators::{CredentialActions, Network, SessionActions};
use crate::config::CoordinatorConfig;
use crate::keys;
use crate::models::{ReauthSignal, Session, StoredCredentials};
use crate::store::{Handler, StateStore, SubscriptionId};
use crate::utils::guid;

/// Reauthentication status, mirrored from the last signal value acted on.
///
/// The shared signal is renotified with identical content whenever unrelated
/// fields are written, so the coordinator compares against this mirror and
/// only reacts to genuine transitions. A repeated `InProgress` notification
/// means another request hit the expired-session error while a refresh is
/// already underway, and is requeued instead of re-triggering the refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReauthState {
    Idle,
    InProgress,
}

impl ReauthState {
    fn from_flag(in_progress: bool) -> Self {
        if in_progress {
            ReauthState::InProgress
        } else {
            ReauthState::Idle
        }
    }
}

/// Coordinator state shared with the subscription handlers.
struct Shared {
    /// Read-only mirror of the credentials channel.
    credentials: Option<StoredCredentials>,
    reauth: ReauthState,
    /// Set once the first-login bootstrap has been requested, so repeated
    /// session notifications cannot request a second login while the
    /// credentials write is still in flight.
    login_requested: bool,
}

/// Session re-authentication coordinator.
///
/// Construct once at startup, call [`init`](Self::init) before any request
/// traffic, and keep it alive for the process lifetime.
/// [`dispose`](Self::dispose) detaches the subscriptions for clean shutdown
/// in tests.
pub struct ReauthCoordinator {
    store: Arc<dyn StateStore>,
    network: Arc<dyn Network>,
    session_actions: Arc<dyn SessionActions>,
    credential_actions: Arc<dyn CredentialActions>,
    config: CoordinatorConfig,
    shared: Arc<Mutex<Shared>>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl ReauthCoordinator {
    pub fn new(
        store: Arc<dyn StateStore>,
        network: Arc<dyn Network>,
        session_actions: Arc<dyn SessionActions>,
        credential_actions: Arc<dyn CredentialActions>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            store,
            network,
            session_actions,
            credential_actions,
            config,
            shared: Arc::new(Mutex::new(Shared {
                credentials: None,
                reauth: ReauthState::Idle,
                login_requested: false,
            })),
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    /// Attach the three channel subscriptions. Idempotent: a second call is
    /// a logged no-op, so a channel never delivers to duplicate handlers.
    pub fn init(&self) {
        let mut subscriptions = lock(&self.subscriptions);
        if !subscriptions.is_empty() {
            tracing::warn!("init called more than once, keeping existing subscriptions");
            return;
        }

        // Credentials first: the session handler consults the mirror during
        // its subscribe-time delivery.
        subscriptions.push(self.connect_credentials());
        subscriptions.push(self.connect_reauthenticating());
        subscriptions.push(self.connect_session());

        tracing::debug!("reauth coordinator initialized");
    }

    /// Detach all subscriptions.
    pub fn dispose(&self) {
        let mut subscriptions = lock(&self.subscriptions);
        for id in subscriptions.drain(..) {
            self.store.unsubscribe(&id);
        }
        tracing::debug!("reauth coordinator disposed");
    }

    fn connect_credentials(&self) -> SubscriptionId {
        let shared = Arc::clone(&self.shared);
        let handler: Handler = Arc::new(move |value| {
            let credentials = match value {
                // Writers clear the channel either by removing the key or
                // by publishing an explicit null.
                None => None,
                Some(value) if value.is_null() => None,
                Some(value) => match serde_json::from_value::<StoredCredentials>(value.clone()) {
                    Ok(credentials) => Some(credentials),
                    Err(err) => {
                        tracing::warn!("ignoring undecodable credentials payload: {}", err);
                        return;
                    }
                },
            };
            lock(&shared).credentials = credentials;
        });
        self.store.subscribe(keys::CREDENTIALS, handler)
    }

    fn connect_reauthenticating(&self) -> SubscriptionId {
        let shared = Arc::clone(&self.shared);
        let network = Arc::clone(&self.network);
        let session_actions = Arc::clone(&self.session_actions);

        let handler: Handler = Arc::new(move |value| {
            let Some(value) = value else {
                return;
            };
            if value.is_null() {
                return;
            }
            let signal: ReauthSignal = match serde_json::from_value(value.clone()) {
                Ok(signal) => signal,
                Err(err) => {
                    tracing::warn!("ignoring undecodable reauthentication payload: {}", err);
                    return;
                }
            };

            let incoming = ReauthState::from_flag(signal.is_in_progress);
            let mut state = lock(&shared);

            if state.reauth == incoming {
                // Repeated notification, not a transition. While a refresh
                // is underway, other requests that hit the expired-session
                // error land here and get requeued behind it.
                drop(state);
                if signal.is_in_progress {
                    tracing::debug!(
                        command = %signal.original_command,
                        "requeueing request held back by token refresh"
                    );
                    network.post(
                        &signal.original_command,
                        &signal.original_parameters,
                        &signal.original_type,
                    );
                }
                return;
            }

            state.reauth = incoming;
            drop(state);

            if incoming == ReauthState::Idle {
                // Refresh finished. Restarting the request queue is the
                // network layer's job.
                return;
            }

            tracing::info!("session expired, refreshing auth token");
            session_actions.reauthenticate();
        });
        self.store.subscribe(keys::REAUTHENTICATING, handler)
    }

    fn connect_session(&self) -> SubscriptionId {
        let shared = Arc::clone(&self.shared);
        let credential_actions = Arc::clone(&self.credential_actions);
        let login_prefix = self.config.login_prefix.clone();

        let handler: Handler = Arc::new(move |value| {
            let Some(value) = value else {
                return;
            };
            if value.is_null() {
                return;
            }
            let session: Session = match serde_json::from_value(value.clone()) {
                Ok(session) => session,
                Err(err) => {
                    tracing::warn!("ignoring undecodable session payload: {}", err);
                    return;
                }
            };

            // The session channel is renotified for token, loading and error
            // writes alike. A token plus no existing login means this is the
            // user's first sign-in.
            if session.auth_token.is_none() {
                return;
            }
            {
                let mut state = lock(&shared);
                let has_login = state
                    .credentials
                    .as_ref()
                    .and_then(|credentials| credentials.login.as_deref())
                    .is_some();
                if has_login || state.login_requested {
                    return;
                }
                state.login_requested = true;
            }

            let login = guid(&login_prefix);
            let secret = guid("");
            tracing::info!(%login, "first sign-in, creating login credential");
            credential_actions.create_login(&login, &secret);
        });
        self.store.subscribe(keys::SESSION, handler)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reauth_state_from_flag() {
        assert_eq!(ReauthState::from_flag(true), ReauthState::InProgress);
        assert_eq!(ReauthState::from_flag(false), ReauthState::Idle);
    }
}
