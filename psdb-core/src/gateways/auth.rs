use anyhow::Result as Fallible;
use psdb_entities::user::UserRef;

/// Sign-in state as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    SignedIn(UserRef),
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    pub fn user(&self) -> Option<&UserRef> {
        match self {
            Self::SignedOut => None,
            Self::SignedIn(user) => Some(user),
        }
    }
}

impl From<Option<UserRef>> for AuthState {
    fn from(from: Option<UserRef>) -> Self {
        from.map(Self::SignedIn).unwrap_or_default()
    }
}

/// A single external identity provider.
pub trait AuthProvider {
    fn sign_in(&self) -> Fallible<UserRef>;
    fn sign_out(&self, user: &UserRef) -> Fallible<()>;
}
