use super::*;
use psdb_core::gateways::auth::{AuthProvider, AuthState};
use tokio::sync::watch;

/// Mirrors the sign-in state of the identity provider.
///
/// All changes are published to the listeners that have been
/// obtained by [`AuthStateMirror::subscribe`].
#[derive(Debug)]
pub struct AuthStateMirror {
    tx: watch::Sender<AuthState>,
}

impl AuthStateMirror {
    pub fn new(initial: AuthState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn state(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_signed_in()
    }

    pub fn current_user(&self) -> Option<UserRef> {
        self.tx.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> AuthListener {
        AuthListener {
            rx: self.tx.subscribe(),
        }
    }

    fn publish(&self, state: AuthState) {
        let modified = self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
        if modified {
            debug!("Auth state changed: {:?}", self.tx.borrow());
        }
    }
}

/// Receives sign-in state changes from an [`AuthStateMirror`].
#[derive(Debug)]
pub struct AuthListener {
    rx: watch::Receiver<AuthState>,
}

impl AuthListener {
    pub fn current(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// The new state if it changed since the last call.
    ///
    /// Intermediate states are skipped, only the most recent
    /// state is reported.
    pub fn next_change(&mut self) -> Option<AuthState> {
        // Fails only if the mirror has been dropped
        if !self.rx.has_changed().unwrap_or(false) {
            return None;
        }
        Some(self.rx.borrow_and_update().clone())
    }
}

pub fn sign_in(provider: &dyn AuthProvider, mirror: &AuthStateMirror) -> Result<UserRef> {
    let user = provider.sign_in()?;
    mirror.publish(AuthState::SignedIn(user.clone()));
    Ok(user)
}

pub fn sign_out(provider: &dyn AuthProvider, mirror: &AuthStateMirror) -> Result<()> {
    let Some(user) = mirror.current_user() else {
        debug!("Already signed out");
        return Ok(());
    };
    provider.sign_out(&user)?;
    mirror.publish(AuthState::SignedOut);
    Ok(())
}

/// Apply the most recent auth state change to the session.
///
/// Returns `true` if the session has been updated.
pub fn sync_session(
    connections: &sqlite::Connections,
    listener: &mut AuthListener,
    session: &mut Session<'_>,
) -> Result<bool> {
    let Some(state) = listener.next_change() else {
        return Ok(false);
    };
    let conn = connections.shared()?;
    session.apply_auth_state(&conn, state)?;
    Ok(true)
}
