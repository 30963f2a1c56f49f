//! Session model and the shared session context

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::auth::{DenyReason, LoginResponse, Role, User};
use crate::error::{Error, Result};
use crate::router::{Navigation, LOGIN_PATH};
use crate::session::profile::ProfileDisplay;
use crate::session::storage::{keys, SessionStorage};

/// The three raw keys the gate looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub token: String,
    pub role: String,
    pub user_id: String,
}

impl StoredCredentials {
    /// Read token, role and user id. Empty values count as absent.
    pub fn read(storage: &dyn SessionStorage) -> std::result::Result<Self, DenyReason> {
        let present = |key: &str| storage.get(key).filter(|value| !value.is_empty());

        let token = present(keys::TOKEN).ok_or(DenyReason::MissingToken)?;
        let role = present(keys::ROLE).ok_or(DenyReason::MissingRole)?;
        let user_id = present(keys::USER_ID).ok_or(DenyReason::MissingUserId)?;

        Ok(Self {
            token,
            role,
            user_id,
        })
    }
}

/// An authenticated session as held in client storage
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub role: Role,
    pub user_id: String,
}

impl Session {
    /// Load a full session from storage
    pub fn from_storage(storage: &dyn SessionStorage) -> std::result::Result<Self, DenyReason> {
        let credentials = StoredCredentials::read(storage)?;
        Self::from_credentials(credentials, storage)
    }

    /// Complete already-read credentials with the stored `user` object.
    ///
    /// An unreadable `user` falls back to a placeholder; a readable one
    /// whose role disagrees with the `role` key invalidates the session.
    pub fn from_credentials(
        credentials: StoredCredentials,
        storage: &dyn SessionStorage,
    ) -> std::result::Result<Self, DenyReason> {
        let role: Role = credentials
            .role
            .parse()
            .map_err(|_| DenyReason::UnknownRole(credentials.role.clone()))?;

        let user = match storage
            .get(keys::USER)
            .map(|raw| serde_json::from_str::<User>(&raw))
        {
            Some(Ok(user)) if user.role != role => {
                return Err(DenyReason::InconsistentUser {
                    stored: role,
                    user: user.role,
                });
            }
            Some(Ok(user)) => user,
            Some(Err(e)) => {
                tracing::debug!("Stored user is unreadable, using placeholder: {}", e);
                User::placeholder(&credentials.user_id, role)
            }
            None => User::placeholder(&credentials.user_id, role),
        };

        Ok(Self {
            token: credentials.token,
            user,
            role,
            user_id: credentials.user_id,
        })
    }
}

/// Change notifications for observers of the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoggedIn(Session),
    LoggedOut,
    /// Storage changed underneath us (another process logged in or out)
    Changed(Option<Session>),
}

/// Injected session object: one per process, shared by `Arc`.
///
/// Storage is the source of truth; the context keeps an in-memory mirror
/// that `refresh` re-synchronizes and announces changes on a broadcast
/// channel.
pub struct SessionContext {
    storage: Arc<dyn SessionStorage>,
    mirror: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let initial = Session::from_storage(storage.as_ref()).ok();
        let (events, _) = broadcast::channel(16);
        Self {
            storage,
            mirror: RwLock::new(initial),
            events,
        }
    }

    pub fn storage(&self) -> Arc<dyn SessionStorage> {
        Arc::clone(&self.storage)
    }

    /// Snapshot of the in-memory mirror
    pub fn current(&self) -> Option<Session> {
        self.mirror
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Bearer token straight from storage
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(keys::TOKEN)
            .filter(|token| !token.is_empty())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Persist a successful login response
    pub fn login(&self, response: LoginResponse) -> Result<Session> {
        let token = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::InvalidResponse("login response has no token".to_string()))?;
        let raw_user = response
            .user
            .ok_or_else(|| Error::InvalidResponse("login response has no user".to_string()))?;

        if let Some(role) = raw_user.get("role").and_then(|r| r.as_str()) {
            role.parse::<Role>()?;
        }
        let user: User = serde_json::from_value(raw_user)
            .map_err(|e| Error::InvalidResponse(format!("login response user: {}", e)))?;

        let user_json = serde_json::to_string(&user)?;
        self.storage.set_many(&[
            (keys::TOKEN, token.as_str()),
            (keys::USER, user_json.as_str()),
            (keys::ROLE, user.role.as_str()),
            (keys::USER_ID, user.id.as_str()),
        ])?;

        let session = Session {
            token,
            role: user.role,
            user_id: user.id.clone(),
            user,
        };
        tracing::info!(role = %session.role, user_id = %session.user_id, "Logged in");

        self.replace_mirror(Some(session.clone()));
        let _ = self.events.send(SessionEvent::LoggedIn(session.clone()));
        Ok(session)
    }

    /// Clear all four keys and hand back the hard navigation to the login screen.
    /// Safe to call without a session.
    pub fn logout(&self) -> Result<Navigation> {
        self.storage.remove_many(&keys::ALL)?;
        self.replace_mirror(None);
        let _ = self.events.send(SessionEvent::LoggedOut);
        tracing::info!("Logged out");
        Ok(Navigation::Redirect(LOGIN_PATH.to_string()))
    }

    /// Re-read storage; announce `Changed` if it no longer matches the mirror
    pub fn refresh(&self) -> Option<Session> {
        let fresh = Session::from_storage(self.storage.as_ref()).ok();
        let previous = self.replace_mirror(fresh.clone());
        if previous != fresh {
            tracing::debug!(logged_in = fresh.is_some(), "Session storage changed");
            let _ = self.events.send(SessionEvent::Changed(fresh.clone()));
        }
        fresh
    }

    /// Poll storage for external changes until the handle is aborted
    pub fn spawn_watcher(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let context = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                context.refresh();
            }
        })
    }

    /// Header text for the layout of `role`, tolerant of a broken `user` value
    pub fn profile(&self, role: Role) -> ProfileDisplay {
        ProfileDisplay::from_stored_user(role, self.storage.get(keys::USER).as_deref())
    }

    fn replace_mirror(&self, next: Option<Session>) -> Option<Session> {
        let mut mirror = self.mirror.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *mirror, next)
    }
}
